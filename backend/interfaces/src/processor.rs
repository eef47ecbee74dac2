//! The polymorphic processor contract.

use common_enums::{EventKind, PaymentStatus};
use common_utils::errors::CustomResult;
use domain_types::{
    catalog::TermDetails,
    errors::GatewayError,
    payment::{Subscription, TransactionInfo},
    types::CheckoutContext,
};
use time::OffsetDateTime;

use crate::events::{EventInterface, ProcessorEvent};

/// Boxed processor as handed to callers by the registry.
pub type BoxedPaymentProcessor = Box<dyn PaymentProcessor>;

/// Contract every concrete gateway processor implements.
///
/// A processor is constructed bound to one (site, invoice) pair; the
/// fallible constructor lives with each implementation and the
/// registry, since credential lookup happens there. After
/// [`authorize_payment`](Self::authorize_payment) returns, callers
/// branch solely on [`transaction_succeeded`](Self::transaction_succeeded)
/// and read the audit record from
/// [`transaction_info`](Self::transaction_info).
#[async_trait::async_trait]
pub trait PaymentProcessor: Send + Sync {
    /// Stable implementation name, recorded on payments and events.
    fn name(&self) -> &'static str;

    /// Invoice this processor instance is bound to.
    fn invoice_id(&self) -> u64;

    /// The sink lifecycle notifications are delivered to.
    fn events(&self) -> &dyn EventInterface;

    /// Whether the last `authorize_payment` call succeeded.
    fn transaction_succeeded(&self) -> bool;

    /// Audit record of the last `authorize_payment` call.
    fn transaction_info(&self) -> &TransactionInfo;

    /// Store the outcome of an authorization attempt. Implementations
    /// keep this trivial; the orchestration in `authorize_payment`
    /// owns when it is called.
    fn set_transaction_outcome(&mut self, succeeded: bool, info: TransactionInfo);

    /// The actual gateway charge/capture call. Implemented per
    /// gateway; returns the audit record on success and a classified
    /// error otherwise. The pre/post authorization pair is emitted by
    /// [`authorize_payment`](Self::authorize_payment), never here.
    async fn authorization(&mut self) -> CustomResult<TransactionInfo, GatewayError>;

    /// Pure context augmentation for the checkout page. No side
    /// effects.
    fn get_checkout_context(&self, context: CheckoutContext) -> CheckoutContext;

    /// Record a renewal observed for `subscription`. The entitlement
    /// window is derived from `term` when present. Idempotent on
    /// `transaction_id`: replaying the same transaction must not
    /// double-charge.
    async fn renew_subscription(
        &mut self,
        subscription: &mut Subscription,
        term: Option<&TermDetails>,
        transaction_id: &str,
        status: PaymentStatus,
        submitted_at: OffsetDateTime,
    ) -> CustomResult<(), GatewayError>;

    /// Cancel `subscription` remotely and locally. Idempotent: a
    /// second cancellation is a no-op.
    async fn subscription_cancel(
        &mut self,
        subscription: &mut Subscription,
    ) -> CustomResult<(), GatewayError>;

    /// Orchestrates one authorization attempt. The ordering is fixed:
    /// the pre-authorization event, then the gateway call, then the
    /// post-authorization event; both events fire exactly once per
    /// call regardless of outcome so listeners can rely on the
    /// pairing. Gateway failures are folded into the transaction
    /// outcome and never propagated.
    async fn authorize_payment(&mut self) {
        self.notify(EventKind::PreAuthorization).await;

        match self.authorization().await {
            Ok(info) => {
                self.set_transaction_outcome(true, info);
            }
            Err(report) => {
                tracing::error!(
                    invoice_id = self.invoice_id(),
                    processor = self.name(),
                    error = ?report,
                    "authorization failed"
                );
                let message = report.current_context().to_string();
                self.set_transaction_outcome(false, TransactionInfo::failure(message));
            }
        }

        self.notify(EventKind::PostAuthorization).await;
    }

    /// Deliver one lifecycle event; sink failures are logged and
    /// swallowed.
    async fn notify(&self, kind: EventKind) {
        let event = ProcessorEvent::new(kind, self.name(), self.invoice_id());
        if let Err(error) = self.events().emit(&event).await {
            tracing::warn!(kind = %event.kind, error = ?error, "event sink failed");
        }
    }
}
