//! Error taxonomy for the payment core.
//!
//! Gateway failures are classified once, at the transport boundary,
//! and surfaced through `transaction_info`; they never cross the
//! processor boundary as errors. Configuration problems are the one
//! fatal class, raised at processor setup.

use common_enums::GatewayObjectKind;

/// Fatal setup-time failures. Aborts the request.
#[derive(Debug, thiserror::Error)]
pub enum ConfigurationError {
    /// Neither the site nor the global fallback carries a gateway key.
    #[error("No gateway credentials configured for site {domain}")]
    MissingCredentials {
        /// Domain of the site being charged against
        domain: String,
    },
    /// The configured processor kind has no registered factory.
    #[error("No processor registered for kind {kind}")]
    UnknownProcessor {
        /// The unrecognized configuration value
        kind: String,
    },
    /// The configuration sources could not be read or deserialized.
    #[error("Failed to load configuration")]
    ConfigLoadFailure,
}

/// Classified gateway failures. Non-fatal at the processor boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GatewayError {
    /// The gateway throttled the call.
    #[error("Gateway rate limit exceeded")]
    RateLimited,
    /// The gateway rejected the request shape or parameters.
    #[error("Gateway rejected the request: {message}")]
    InvalidRequest {
        /// Gateway-supplied rejection detail
        message: String,
    },
    /// The credentials were rejected.
    #[error("Gateway authentication failed")]
    AuthFailure,
    /// The gateway could not be reached or timed out.
    #[error("Network failure while reaching the gateway")]
    NetworkFailure,
    /// The card itself was declined.
    #[error("Card declined: {message}")]
    CardDeclined {
        /// Decline reason, suitable for display
        message: String,
    },
    /// Anything the classifier could not place.
    #[error("Unclassified gateway failure: {message}")]
    Unknown {
        /// Raw failure detail
        message: String,
    },
}

/// Per-object synchronization failure. Never aborts the batch.
#[derive(Debug, Clone, thiserror::Error)]
pub enum ReconciliationError {
    /// Creating or updating one remote object failed.
    #[error("Failed to synchronize {kind} for local id {local_id}")]
    ObjectSyncFailure {
        /// Remote object kind being reconciled
        kind: GatewayObjectKind,
        /// Primary key of the local entity
        local_id: u64,
    },
    /// Deleting a surplus duplicate failed.
    #[error("Failed to remove duplicate {kind} {remote_id}")]
    DuplicateRemovalFailure {
        /// Remote object kind being deduplicated
        kind: GatewayObjectKind,
        /// Remote id of the surplus object
        remote_id: String,
    },
}

/// Caller-side guard violations. The caller redirects instead of
/// charging; nothing is raised across the processor boundary.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum InvariantViolation {
    /// Checkout or charge was attempted on an invoice with no items.
    #[error("Invoice {invoice_id} has no order items")]
    EmptyCart {
        /// The offending invoice
        invoice_id: u64,
    },
    /// The offer has no active price row for the invoice currency.
    #[error("Offer {offer_id} has no active price for {currency}")]
    NoActivePrice {
        /// The offer being added
        offer_id: u64,
        /// The invoice currency
        currency: common_enums::Currency,
    },
    /// A terminal, successful payment was asked to change outside the
    /// refund/void transitions.
    #[error("Payment {payment_id} is settled and cannot be modified")]
    TerminalPayment {
        /// The frozen payment
        payment_id: u64,
    },
    /// A refund or void was requested from a status that does not
    /// permit it.
    #[error("Payment {payment_id} cannot move from {from} to {to}")]
    IllegalPaymentTransition {
        /// The payment in question
        payment_id: u64,
        /// Current status
        from: common_enums::PaymentStatus,
        /// Requested status
        to: common_enums::PaymentStatus,
    },
}
