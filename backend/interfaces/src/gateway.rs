//! Outbound gateway primitives the core requires.
//!
//! Every object type exposes create/update/search (plus delete where
//! the sync engine needs it); every response carries an `id` and a
//! `metadata` map. Implementations classify transport failures into
//! [`GatewayError`] before returning.

use std::sync::Arc;

use common_utils::errors::CustomResult;
use domain_types::{
    errors::GatewayError,
    gateway_types::{
        ChargePayload, CouponPayload, CustomerPayload, GatewayCharge, GatewayCoupon,
        GatewayCustomer, GatewayPaymentMethod, GatewayPrice, GatewayProduct, GatewaySetupIntent,
        GatewaySubscription, PaymentMethodPayload, PricePayload, ProductPayload,
        SetupIntentPayload, SubscriptionPayload,
    },
};

/// Shared handle to a gateway implementation.
pub type SharedGateway = Arc<dyn GatewayApi>;

/// The gateway surface the processor and sync engine are written
/// against. Search queries are strings produced by the query builder.
#[async_trait::async_trait]
pub trait GatewayApi: Send + Sync {
    // Customers
    async fn create_customer(
        &self,
        payload: CustomerPayload,
    ) -> CustomResult<GatewayCustomer, GatewayError>;
    async fn update_customer(
        &self,
        id: &str,
        payload: CustomerPayload,
    ) -> CustomResult<GatewayCustomer, GatewayError>;
    async fn search_customers(
        &self,
        query: &str,
    ) -> CustomResult<Vec<GatewayCustomer>, GatewayError>;

    // Products
    async fn create_product(
        &self,
        payload: ProductPayload,
    ) -> CustomResult<GatewayProduct, GatewayError>;
    async fn update_product(
        &self,
        id: &str,
        payload: ProductPayload,
    ) -> CustomResult<GatewayProduct, GatewayError>;
    async fn search_products(
        &self,
        query: &str,
    ) -> CustomResult<Vec<GatewayProduct>, GatewayError>;

    // Prices
    async fn create_price(&self, payload: PricePayload)
        -> CustomResult<GatewayPrice, GatewayError>;
    async fn search_prices(&self, query: &str) -> CustomResult<Vec<GatewayPrice>, GatewayError>;

    // Coupons
    async fn create_coupon(
        &self,
        payload: CouponPayload,
    ) -> CustomResult<GatewayCoupon, GatewayError>;
    async fn update_coupon(
        &self,
        id: &str,
        payload: CouponPayload,
    ) -> CustomResult<GatewayCoupon, GatewayError>;
    async fn delete_coupon(&self, id: &str) -> CustomResult<(), GatewayError>;
    async fn list_coupons(&self) -> CustomResult<Vec<GatewayCoupon>, GatewayError>;

    // Payment methods and setup intents
    async fn create_payment_method(
        &self,
        payload: PaymentMethodPayload,
    ) -> CustomResult<GatewayPaymentMethod, GatewayError>;
    async fn create_setup_intent(
        &self,
        payload: SetupIntentPayload,
    ) -> CustomResult<GatewaySetupIntent, GatewayError>;

    // Subscriptions
    async fn create_subscription(
        &self,
        payload: SubscriptionPayload,
    ) -> CustomResult<GatewaySubscription, GatewayError>;
    async fn cancel_subscription(
        &self,
        id: &str,
    ) -> CustomResult<GatewaySubscription, GatewayError>;

    // Charges
    async fn create_charge(
        &self,
        payload: ChargePayload,
    ) -> CustomResult<GatewayCharge, GatewayError>;
}
