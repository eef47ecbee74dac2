#![allow(dead_code)]

use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
};

use common_enums::{Currency, ProcessorKind, RecurrenceInterval};
use common_utils::{errors::CustomResult, types::MajorUnit};
use domain_types::{
    catalog::{Offer, OfferRemoteLinks, Price, TermDetails},
    customer::CustomerProfile,
    errors::GatewayError,
    gateway_types::{
        ChargePayload, CouponPayload, CustomerPayload, GatewayCharge, GatewayCoupon,
        GatewayCustomer, GatewayPaymentMethod, GatewayPrice, GatewayProduct, GatewaySetupIntent,
        GatewaySubscription, Metadata, PaymentMethodPayload, PricePayload, ProductPayload,
        SetupIntentPayload, SubscriptionPayload,
    },
    invoice::Invoice,
    types::Site,
};
use interfaces::gateway::GatewayApi;
use payment_integration::configs::{Config, GatewayConfig};
use rust_decimal::Decimal;
use secrecy::SecretString;
use time::{Duration, OffsetDateTime};

pub fn site() -> Site {
    Site {
        id: 1,
        domain: "example.com".to_string(),
        name: "Example".to_string(),
    }
}

pub fn config() -> Config {
    Config {
        default_processor: ProcessorKind::Stripe,
        gateway: GatewayConfig {
            fallback_secret_key: Some(SecretString::new("sk_test".into())),
            ..GatewayConfig::default()
        },
        sites: HashMap::new(),
    }
}

pub fn offer_with_price(id: u64, amount: i64) -> Offer {
    let now = OffsetDateTime::now_utc();
    Offer {
        id,
        site_id: 1,
        name: format!("offer-{id}"),
        available: true,
        prices: vec![Price {
            id: 1,
            offer_id: id,
            amount: MajorUnit::new(Decimal::from(amount)),
            currency: Currency::USD,
            priority: 0,
            start_date: now - Duration::days(1),
            end_date: None,
            remote_price_id: None,
        }],
        term_details: Some(TermDetails {
            trial_days: 0,
            interval: RecurrenceInterval::Month,
            interval_count: 1,
        }),
        discount: None,
        remote: OfferRemoteLinks::default(),
        deleted: false,
    }
}

pub fn checked_out_invoice(total_item_price: i64) -> Invoice {
    let mut invoice = Invoice::new_cart(1, 10, 1, Currency::USD);
    let offer = offer_with_price(1, total_item_price);
    invoice
        .add_offer(&offer, OffsetDateTime::now_utc())
        .expect("offer carries an active price");
    invoice
        .transition_to_checkout()
        .expect("cart is not empty");
    invoice
}

pub fn profile(id: u64, email: &str) -> CustomerProfile {
    CustomerProfile {
        id,
        site_id: 1,
        email: email.to_string(),
        name: format!("Customer {id}"),
        remote_customer_id: None,
        addresses: Vec::new(),
        deleted: false,
    }
}

#[derive(Default)]
struct MockState {
    counter: u64,
    customers: Vec<GatewayCustomer>,
    products: Vec<GatewayProduct>,
    prices: Vec<GatewayPrice>,
    coupons: Vec<GatewayCoupon>,
    charges: Vec<GatewayCharge>,
    cancel_calls: u64,
    fail_charges: Option<GatewayError>,
    fail_coupon_deletes: bool,
    fail_customer_emails: Vec<String>,
}

/// In-memory gateway double. Ids are assigned sequentially per object
/// kind; search calls ignore the query string and return everything.
#[derive(Default)]
pub struct MockGateway {
    state: Mutex<MockState>,
}

impl MockGateway {
    pub fn shared() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn fail_charges_with(&self, error: GatewayError) {
        self.lock().fail_charges = Some(error);
    }

    pub fn fail_coupon_deletes(&self) {
        self.lock().fail_coupon_deletes = true;
    }

    pub fn fail_customers_with_email(&self, email: &str) {
        self.lock().fail_customer_emails.push(email.to_string());
    }

    pub fn seed_customer(&self, email: &str, metadata: Metadata) -> String {
        let mut state = self.lock();
        state.counter += 1;
        let id = format!("cus_{}", state.counter);
        state.customers.push(GatewayCustomer {
            id: id.clone(),
            email: email.to_string(),
            name: None,
            metadata,
        });
        id
    }

    pub fn seed_coupon(&self, percent_off: i64, metadata: Metadata) -> String {
        let mut state = self.lock();
        state.counter += 1;
        let id = format!("co_{}", state.counter);
        state.coupons.push(GatewayCoupon {
            id: id.clone(),
            percent_off: Decimal::from(percent_off),
            duration: common_enums::CouponDuration::Once,
            duration_in_months: None,
            metadata,
        });
        id
    }

    pub fn customers(&self) -> Vec<GatewayCustomer> {
        self.lock().customers.clone()
    }

    pub fn products(&self) -> Vec<GatewayProduct> {
        self.lock().products.clone()
    }

    pub fn coupons(&self) -> Vec<GatewayCoupon> {
        self.lock().coupons.clone()
    }

    pub fn charge_count(&self) -> usize {
        self.lock().charges.len()
    }

    pub fn cancel_calls(&self) -> u64 {
        self.lock().cancel_calls
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, MockState> {
        self.state.lock().expect("mock state lock")
    }

    fn next_id(state: &mut MockState, prefix: &str) -> String {
        state.counter += 1;
        format!("{prefix}_{}", state.counter)
    }
}

#[async_trait::async_trait]
impl GatewayApi for MockGateway {
    async fn create_customer(
        &self,
        payload: CustomerPayload,
    ) -> CustomResult<GatewayCustomer, GatewayError> {
        let mut state = self.lock();
        if state.fail_customer_emails.contains(&payload.email) {
            return Err(error_stack::report!(GatewayError::InvalidRequest {
                message: format!("rejected customer {}", payload.email),
            }));
        }
        let customer = GatewayCustomer {
            id: Self::next_id(&mut state, "cus"),
            email: payload.email,
            name: Some(payload.name),
            metadata: payload.metadata,
        };
        state.customers.push(customer.clone());
        Ok(customer)
    }

    async fn update_customer(
        &self,
        id: &str,
        payload: CustomerPayload,
    ) -> CustomResult<GatewayCustomer, GatewayError> {
        let mut state = self.lock();
        if state.fail_customer_emails.contains(&payload.email) {
            return Err(error_stack::report!(GatewayError::InvalidRequest {
                message: format!("rejected customer {}", payload.email),
            }));
        }
        let customer = state
            .customers
            .iter_mut()
            .find(|customer| customer.id == id)
            .ok_or_else(|| {
                error_stack::report!(GatewayError::InvalidRequest {
                    message: format!("no such customer {id}"),
                })
            })?;
        customer.email = payload.email;
        customer.name = Some(payload.name);
        customer.metadata = payload.metadata;
        Ok(customer.clone())
    }

    async fn search_customers(
        &self,
        _query: &str,
    ) -> CustomResult<Vec<GatewayCustomer>, GatewayError> {
        Ok(self.lock().customers.clone())
    }

    async fn create_product(
        &self,
        payload: ProductPayload,
    ) -> CustomResult<GatewayProduct, GatewayError> {
        let mut state = self.lock();
        let product = GatewayProduct {
            id: Self::next_id(&mut state, "prod"),
            name: payload.name,
            active: payload.active,
            metadata: payload.metadata,
        };
        state.products.push(product.clone());
        Ok(product)
    }

    async fn update_product(
        &self,
        id: &str,
        payload: ProductPayload,
    ) -> CustomResult<GatewayProduct, GatewayError> {
        let mut state = self.lock();
        let product = state
            .products
            .iter_mut()
            .find(|product| product.id == id)
            .ok_or_else(|| {
                error_stack::report!(GatewayError::InvalidRequest {
                    message: format!("no such product {id}"),
                })
            })?;
        product.name = payload.name;
        product.active = payload.active;
        product.metadata = payload.metadata;
        Ok(product.clone())
    }

    async fn search_products(
        &self,
        _query: &str,
    ) -> CustomResult<Vec<GatewayProduct>, GatewayError> {
        Ok(self.lock().products.clone())
    }

    async fn create_price(
        &self,
        payload: PricePayload,
    ) -> CustomResult<GatewayPrice, GatewayError> {
        let mut state = self.lock();
        let price = GatewayPrice {
            id: Self::next_id(&mut state, "price"),
            product_id: Some(payload.product_id),
            unit_amount: payload.unit_amount,
            metadata: payload.metadata,
        };
        state.prices.push(price.clone());
        Ok(price)
    }

    async fn search_prices(&self, _query: &str) -> CustomResult<Vec<GatewayPrice>, GatewayError> {
        Ok(self.lock().prices.clone())
    }

    async fn create_coupon(
        &self,
        payload: CouponPayload,
    ) -> CustomResult<GatewayCoupon, GatewayError> {
        let mut state = self.lock();
        let coupon = GatewayCoupon {
            id: Self::next_id(&mut state, "co"),
            percent_off: payload.percent_off,
            duration: payload.duration,
            duration_in_months: payload.duration_in_months,
            metadata: payload.metadata,
        };
        state.coupons.push(coupon.clone());
        Ok(coupon)
    }

    async fn update_coupon(
        &self,
        id: &str,
        payload: CouponPayload,
    ) -> CustomResult<GatewayCoupon, GatewayError> {
        let mut state = self.lock();
        let coupon = state
            .coupons
            .iter_mut()
            .find(|coupon| coupon.id == id)
            .ok_or_else(|| {
                error_stack::report!(GatewayError::InvalidRequest {
                    message: format!("no such coupon {id}"),
                })
            })?;
        coupon.percent_off = payload.percent_off;
        coupon.duration = payload.duration;
        coupon.duration_in_months = payload.duration_in_months;
        coupon.metadata = payload.metadata;
        Ok(coupon.clone())
    }

    async fn delete_coupon(&self, id: &str) -> CustomResult<(), GatewayError> {
        let mut state = self.lock();
        if state.fail_coupon_deletes {
            return Err(error_stack::report!(GatewayError::Unknown {
                message: "delete rejected".to_string(),
            }));
        }
        state.coupons.retain(|coupon| coupon.id != id);
        Ok(())
    }

    async fn list_coupons(&self) -> CustomResult<Vec<GatewayCoupon>, GatewayError> {
        Ok(self.lock().coupons.clone())
    }

    async fn create_payment_method(
        &self,
        payload: PaymentMethodPayload,
    ) -> CustomResult<GatewayPaymentMethod, GatewayError> {
        let mut state = self.lock();
        Ok(GatewayPaymentMethod {
            id: Self::next_id(&mut state, "pm"),
            customer_id: payload.customer_id,
            metadata: Metadata::new(),
        })
    }

    async fn create_setup_intent(
        &self,
        _payload: SetupIntentPayload,
    ) -> CustomResult<GatewaySetupIntent, GatewayError> {
        let mut state = self.lock();
        Ok(GatewaySetupIntent {
            id: Self::next_id(&mut state, "seti"),
            status: "succeeded".to_string(),
            client_secret: Some("seti_secret".to_string()),
            metadata: Metadata::new(),
        })
    }

    async fn create_subscription(
        &self,
        payload: SubscriptionPayload,
    ) -> CustomResult<GatewaySubscription, GatewayError> {
        let mut state = self.lock();
        Ok(GatewaySubscription {
            id: Self::next_id(&mut state, "sub"),
            status: "active".to_string(),
            metadata: payload.metadata,
        })
    }

    async fn cancel_subscription(
        &self,
        id: &str,
    ) -> CustomResult<GatewaySubscription, GatewayError> {
        let mut state = self.lock();
        state.cancel_calls += 1;
        Ok(GatewaySubscription {
            id: id.to_string(),
            status: "canceled".to_string(),
            metadata: Metadata::new(),
        })
    }

    async fn create_charge(
        &self,
        payload: ChargePayload,
    ) -> CustomResult<GatewayCharge, GatewayError> {
        let mut state = self.lock();
        if let Some(error) = state.fail_charges.clone() {
            return Err(error_stack::report!(error));
        }
        let charge = GatewayCharge {
            id: Self::next_id(&mut state, "ch"),
            status: "succeeded".to_string(),
            captured: payload.capture,
            amount: payload.amount,
            metadata: payload.metadata,
        };
        state.charges.push(charge.clone());
        Ok(charge)
    }
}
