//! Typed registry mapping processor kinds to implementations.
//!
//! Selection is a match on [`ProcessorKind`], so an unhandled kind is
//! a compile error, not a runtime lookup miss.

use common_enums::ProcessorKind;
use common_utils::errors::CustomResult;
use domain_types::{errors::ConfigurationError, invoice::Invoice, types::Site};
use interfaces::{events::BoxedEvents, gateway::SharedGateway, processor::BoxedPaymentProcessor};

use crate::{configs::Config, stripe::StripeProcessor};

/// Construct the processor registered for `kind`, bound to
/// `(site, invoice)`. Credential resolution happens here; a site with
/// no usable key fails with
/// [`ConfigurationError::MissingCredentials`].
pub fn build_processor(
    kind: ProcessorKind,
    site: Site,
    invoice: Invoice,
    source: Option<String>,
    config: &Config,
    gateway: SharedGateway,
    events: BoxedEvents,
) -> CustomResult<BoxedPaymentProcessor, ConfigurationError> {
    match kind {
        ProcessorKind::Stripe => Ok(Box::new(StripeProcessor::setup(
            site, invoice, source, config, gateway, events,
        )?)),
    }
}

/// Construct the configured default processor.
pub fn build_default_processor(
    site: Site,
    invoice: Invoice,
    source: Option<String>,
    config: &Config,
    gateway: SharedGateway,
    events: BoxedEvents,
) -> CustomResult<BoxedPaymentProcessor, ConfigurationError> {
    build_processor(
        config.default_processor,
        site,
        invoice,
        source,
        config,
        gateway,
        events,
    )
}
