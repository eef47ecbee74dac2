//! Stripe-style gateway processor.

pub mod transformers;

use std::str::FromStr;

use common_enums::{EventKind, PaymentStatus, ReceiptStatus, SubscriptionStatus};
use common_utils::{errors::CustomResult, types::convert_decimal_to_integer};
use domain_types::{
    catalog::{Offer, TermDetails},
    customer::CustomerProfile,
    errors::{ConfigurationError, GatewayError},
    gateway_types::{PaymentMethodPayload, SetupIntentPayload},
    invoice::Invoice,
    payment::{Payment, Receipt, Subscription, TransactionInfo},
    types::{CheckoutContext, Site},
};
use error_stack::ResultExt;
use interfaces::{
    events::{BoxedEvents, EventInterface},
    gateway::SharedGateway,
    processor::PaymentProcessor,
};
use time::OffsetDateTime;

use crate::{
    configs::{Config, FeeSettings},
    mapper,
};

/// Processor bound to one (site, invoice) pair.
///
/// Construction is the `setup` step of the contract: it verifies that
/// credentials exist for the site (its own key or the global
/// fallback), aborting with
/// [`ConfigurationError::MissingCredentials`] otherwise. The resolved
/// key itself lives with the transport; see
/// [`HttpGateway::new`](crate::client::HttpGateway::new).
pub struct StripeProcessor {
    site: Site,
    invoice: Invoice,
    /// Tokenized payment source handed over by the checkout page.
    source: Option<String>,
    publishable_key: Option<String>,
    fees: FeeSettings,
    gateway: SharedGateway,
    events: BoxedEvents,
    transaction_succeeded: bool,
    transaction_info: TransactionInfo,
    payment: Option<Payment>,
    receipts: Vec<Receipt>,
}

impl StripeProcessor {
    pub const NAME: &'static str = "stripe";

    /// Check gateway credentials for `site` and take ownership of the
    /// invoice being charged.
    pub fn setup(
        site: Site,
        invoice: Invoice,
        source: Option<String>,
        config: &Config,
        gateway: SharedGateway,
        events: BoxedEvents,
    ) -> CustomResult<Self, ConfigurationError> {
        if config.resolve_secret_key(&site.domain).is_none() {
            return Err(error_stack::report!(
                ConfigurationError::MissingCredentials {
                    domain: site.domain.clone(),
                }
            ));
        }

        Ok(Self {
            publishable_key: config
                .publishable_key(&site.domain)
                .map(str::to_string),
            fees: config.fee_settings(&site.domain),
            site,
            invoice,
            source,
            gateway,
            events,
            transaction_succeeded: false,
            transaction_info: TransactionInfo::default(),
            payment: None,
            receipts: Vec::new(),
        })
    }

    /// The invoice in its post-attempt state.
    pub fn invoice(&self) -> &Invoice {
        &self.invoice
    }

    /// The payment record of the last attempt, if one was made.
    pub fn payment(&self) -> Option<&Payment> {
        self.payment.as_ref()
    }

    /// Entitlement receipts minted by the last successful charge, one
    /// per order item.
    pub fn receipts(&self) -> &[Receipt] {
        &self.receipts
    }

    /// Hand the invoice back to the caller for persistence.
    pub fn into_invoice(self) -> Invoice {
        self.invoice
    }

    /// Ensure the profile exists remotely, then build the payment
    /// method, confirm a setup intent and create the subscription.
    /// When `replacing` is given, the old agreement is canceled only
    /// after the new one exists; a customer never ends up with zero
    /// active subscriptions because creation failed.
    pub async fn create_subscription(
        &mut self,
        profile: &mut CustomerProfile,
        offer: &Offer,
        payment_token: &str,
        replacing: Option<&mut Subscription>,
    ) -> CustomResult<Subscription, GatewayError> {
        let customer_id = match &profile.remote_customer_id {
            Some(id) => id.clone(),
            None => {
                let created = self
                    .gateway
                    .create_customer(mapper::build_customer_payload(profile, &self.site))
                    .await?;
                profile.remote_customer_id = Some(created.id.clone());
                created.id
            }
        };

        let method = self
            .gateway
            .create_payment_method(PaymentMethodPayload {
                token: payment_token.to_string(),
                customer_id: Some(customer_id.clone()),
            })
            .await?;
        self.gateway
            .create_setup_intent(SetupIntentPayload {
                customer_id: customer_id.clone(),
                payment_method_id: method.id,
                confirm: true,
            })
            .await?;

        let price_id = offer.remote.price_id.clone().ok_or_else(|| {
            error_stack::report!(GatewayError::InvalidRequest {
                message: format!("offer {} has no synchronized price", offer.id),
            })
        })?;
        let created = self
            .gateway
            .create_subscription(mapper::build_subscription_payload(
                &customer_id,
                &price_id,
                offer,
                &self.site,
            ))
            .await?;

        if let Some(old) = replacing {
            if let Err(report) = self.subscription_cancel(old).await {
                tracing::warn!(
                    subscription_id = old.id,
                    error = ?report,
                    "failed to cancel replaced subscription; new agreement is active"
                );
            }
        }

        Ok(Subscription {
            id: 0,
            status: SubscriptionStatus::from_str(&created.status)
                .unwrap_or(SubscriptionStatus::Incomplete),
            gateway_id: Some(created.id),
            profile_id: profile.id,
            offer_id: offer.id,
            payments: Vec::new(),
            receipts: Vec::new(),
            deleted: false,
        })
    }
}

#[async_trait::async_trait]
impl PaymentProcessor for StripeProcessor {
    fn name(&self) -> &'static str {
        Self::NAME
    }

    fn invoice_id(&self) -> u64 {
        self.invoice.id
    }

    fn events(&self) -> &dyn EventInterface {
        self.events.as_ref()
    }

    fn transaction_succeeded(&self) -> bool {
        self.transaction_succeeded
    }

    fn transaction_info(&self) -> &TransactionInfo {
        &self.transaction_info
    }

    fn set_transaction_outcome(&mut self, succeeded: bool, info: TransactionInfo) {
        self.transaction_succeeded = succeeded;
        self.transaction_info = info;
    }

    async fn authorization(&mut self) -> CustomResult<TransactionInfo, GatewayError> {
        // Re-check the cart before charging: it may have been emptied
        // while the customer sat on the checkout page. The invoice is
        // left where it is so the caller can redirect back to it.
        if self.invoice.is_empty() {
            return Err(error_stack::report!(GatewayError::InvalidRequest {
                message: "cannot charge an invoice with no items".to_string(),
            }));
        }
        let source = self.source.clone().ok_or_else(|| {
            error_stack::report!(GatewayError::InvalidRequest {
                message: "no payment source supplied".to_string(),
            })
        })?;

        let amount = convert_decimal_to_integer(self.invoice.total, self.invoice.currency)
            .change_context(GatewayError::InvalidRequest {
                message: "invoice total is not expressible in minor units".to_string(),
            })?;
        let application_fee = transformers::application_fee_amount(amount, &self.fees)
            .change_context(GatewayError::InvalidRequest {
                message: "commission is not expressible in minor units".to_string(),
            })?;
        let payload = mapper::build_charge_payload(
            &self.invoice,
            &self.site,
            &source,
            None,
            application_fee,
            None,
        )
        .change_context(GatewayError::InvalidRequest {
            message: "invoice cannot be charged".to_string(),
        })?;

        // The invoice flips to processing only once a charge is in
        // flight; every earlier failure leaves it where it was.
        self.invoice.mark_processing();

        let now = OffsetDateTime::now_utc();
        let charge = match self.gateway.create_charge(payload).await {
            Ok(charge) => charge,
            Err(report) => {
                // The failed attempt must leave the invoice retryable.
                self.invoice.return_to_checkout();
                self.payment = Some(Payment {
                    id: 0,
                    invoice_id: self.invoice.id,
                    subscription_id: None,
                    transaction_id: None,
                    provider: Self::NAME.to_string(),
                    amount: self.invoice.total,
                    currency: self.invoice.currency,
                    billing_address: self.invoice.shipping_address.clone(),
                    result: None,
                    success: false,
                    status: PaymentStatus::Declined,
                    submitted_at: now,
                    deleted: false,
                });
                return Err(report);
            }
        };

        let status = transformers::charge_payment_status(charge.captured);
        if charge.captured {
            self.invoice.mark_complete(now);
        }
        let raw_response = serde_json::to_value(&charge).ok();
        self.payment = Some(Payment {
            id: 0,
            invoice_id: self.invoice.id,
            subscription_id: None,
            transaction_id: Some(charge.id.clone()),
            provider: Self::NAME.to_string(),
            amount: self.invoice.total,
            currency: self.invoice.currency,
            billing_address: self.invoice.shipping_address.clone(),
            result: raw_response.clone(),
            success: true,
            status,
            submitted_at: now,
            deleted: false,
        });
        self.receipts = self
            .invoice
            .items
            .iter()
            .map(|item| Receipt {
                id: 0,
                profile_id: self.invoice.profile_id,
                order_item_id: Some(item.id),
                offer_id: item.offer_id,
                subscription_id: None,
                start_date: now,
                end_date: None,
                auto_renew: false,
                status: ReceiptStatus::Active,
                transaction_id: Some(charge.id.clone()),
            })
            .collect();

        self.notify(EventKind::PaymentProcessed).await;

        Ok(TransactionInfo::success(
            "Transaction approved",
            charge.id,
            raw_response,
        ))
    }

    fn get_checkout_context(&self, mut context: CheckoutContext) -> CheckoutContext {
        context.insert("payment_provider", Self::NAME);
        context.insert("invoice_total", self.invoice.total.to_string());
        context.insert("currency", self.invoice.currency.to_string());
        if let Some(key) = &self.publishable_key {
            context.insert("publishable_key", key.as_str());
        }
        context
    }

    async fn renew_subscription(
        &mut self,
        subscription: &mut Subscription,
        term: Option<&TermDetails>,
        transaction_id: &str,
        status: PaymentStatus,
        submitted_at: OffsetDateTime,
    ) -> CustomResult<(), GatewayError> {
        if subscription.has_transaction(transaction_id) {
            tracing::info!(
                subscription_id = subscription.id,
                transaction_id,
                "renewal already recorded, skipping"
            );
            return Ok(());
        }

        let success = matches!(status, PaymentStatus::Captured | PaymentStatus::Settled);
        subscription.payments.push(Payment {
            id: 0,
            invoice_id: self.invoice.id,
            subscription_id: Some(subscription.id),
            transaction_id: Some(transaction_id.to_string()),
            provider: Self::NAME.to_string(),
            amount: self.invoice.total,
            currency: self.invoice.currency,
            billing_address: None,
            result: None,
            success,
            status,
            submitted_at,
            deleted: false,
        });

        if success {
            subscription.status = SubscriptionStatus::Active;
            let window_end = term.map(|term| term.window_end(submitted_at));
            match subscription.receipts.last_mut() {
                Some(receipt) => {
                    receipt.status = ReceiptStatus::Active;
                    receipt.transaction_id = Some(transaction_id.to_string());
                    if window_end.is_some() {
                        receipt.end_date = window_end;
                    }
                }
                None => subscription.receipts.push(Receipt {
                    id: 0,
                    profile_id: subscription.profile_id,
                    order_item_id: None,
                    offer_id: subscription.offer_id,
                    subscription_id: Some(subscription.id),
                    start_date: submitted_at,
                    end_date: window_end,
                    auto_renew: true,
                    status: ReceiptStatus::Active,
                    transaction_id: Some(transaction_id.to_string()),
                }),
            }
        } else {
            subscription.status = SubscriptionStatus::PastDue;
        }

        Ok(())
    }

    async fn subscription_cancel(
        &mut self,
        subscription: &mut Subscription,
    ) -> CustomResult<(), GatewayError> {
        if subscription.is_canceled() {
            tracing::info!(
                subscription_id = subscription.id,
                "subscription already canceled, skipping"
            );
            return Ok(());
        }

        if let Some(gateway_id) = subscription.gateway_id.clone() {
            self.gateway.cancel_subscription(&gateway_id).await?;
        }
        subscription.status = SubscriptionStatus::Canceled;
        for receipt in &mut subscription.receipts {
            receipt.auto_renew = false;
        }

        self.notify(EventKind::SubscriptionCanceled).await;
        Ok(())
    }
}
