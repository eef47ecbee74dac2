//! Payments, receipts and subscriptions.

use common_enums::{Currency, PaymentStatus, ReceiptStatus, SubscriptionStatus};
use common_utils::{types::MajorUnit, CustomResult};
use time::OffsetDateTime;

use crate::{customer::Address, errors::InvariantViolation};

/// The audit record a processor exposes after `authorize_payment`.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
pub struct TransactionInfo {
    pub message: String,
    pub transaction_id: Option<String>,
    /// Reference to the raw gateway response, for audit trails.
    pub raw_response: Option<serde_json::Value>,
}

impl TransactionInfo {
    pub fn success(
        message: impl Into<String>,
        transaction_id: impl Into<String>,
        raw_response: Option<serde_json::Value>,
    ) -> Self {
        Self {
            message: message.into(),
            transaction_id: Some(transaction_id.into()),
            raw_response,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            transaction_id: None,
            raw_response: None,
        }
    }
}

/// An immutable record of one attempt to charge.
///
/// Once `success` is set and the status is terminal the record is
/// frozen; refund and void are modeled as status transitions, never
/// field edits.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Payment {
    pub id: u64,
    pub invoice_id: u64,
    pub subscription_id: Option<u64>,
    /// Gateway-assigned transaction id.
    pub transaction_id: Option<String>,
    pub provider: String,
    pub amount: MajorUnit,
    pub currency: Currency,
    pub billing_address: Option<Address>,
    /// Raw result payload as returned by the gateway.
    pub result: Option<serde_json::Value>,
    pub success: bool,
    pub status: PaymentStatus,
    pub submitted_at: OffsetDateTime,
    pub deleted: bool,
}

impl Payment {
    /// Transition to `Refunded`. Legal only from captured/settled.
    pub fn refund(&mut self) -> CustomResult<(), InvariantViolation> {
        self.transition(PaymentStatus::Refunded, &[PaymentStatus::Captured, PaymentStatus::Settled])
    }

    /// Transition to `Void`. Legal only from authorized/captured.
    pub fn void(&mut self) -> CustomResult<(), InvariantViolation> {
        self.transition(PaymentStatus::Void, &[PaymentStatus::Authorized, PaymentStatus::Captured])
    }

    fn transition(
        &mut self,
        to: PaymentStatus,
        allowed_from: &[PaymentStatus],
    ) -> CustomResult<(), InvariantViolation> {
        if !allowed_from.contains(&self.status) {
            return Err(error_stack::report!(
                InvariantViolation::IllegalPaymentTransition {
                    payment_id: self.id,
                    from: self.status,
                    to,
                }
            ));
        }
        self.status = to;
        Ok(())
    }
}

/// Proof of entitlement to a purchased offer for a time window.
/// Created only after a payment reaches a successful settled state.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct Receipt {
    pub id: u64,
    pub profile_id: u64,
    /// Originating order item; renewal receipts have none.
    pub order_item_id: Option<u64>,
    pub offer_id: u64,
    pub subscription_id: Option<u64>,
    pub start_date: OffsetDateTime,
    pub end_date: Option<OffsetDateTime>,
    pub auto_renew: bool,
    pub status: ReceiptStatus,
    /// Transaction that paid for this window.
    pub transaction_id: Option<String>,
}

/// A recurring gateway-side agreement.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Subscription {
    pub id: u64,
    /// Gateway-assigned subscription id, once created remotely.
    pub gateway_id: Option<String>,
    pub status: SubscriptionStatus,
    pub profile_id: u64,
    pub offer_id: u64,
    pub payments: Vec<Payment>,
    pub receipts: Vec<Receipt>,
    pub deleted: bool,
}

impl Subscription {
    /// Whether a renewal for `transaction_id` was already recorded.
    /// Renewal hooks key their idempotency off this.
    pub fn has_transaction(&self, transaction_id: &str) -> bool {
        self.payments
            .iter()
            .any(|payment| payment.transaction_id.as_deref() == Some(transaction_id))
    }

    pub fn is_canceled(&self) -> bool {
        self.status == SubscriptionStatus::Canceled
    }
}
