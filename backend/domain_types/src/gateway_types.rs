//! Wire-facing payload and response shapes for gateway objects.
//!
//! Every remote object carries at least an `id` and a `metadata` map;
//! the metadata tags (`site`, `pk`, `fingerprint`) are what the
//! synchronization engine searches on.

use std::collections::HashMap;

use common_enums::{CouponDuration, Currency, RecurrenceInterval};
use common_utils::types::MinorUnit;
use rust_decimal::Decimal;

/// Free-form key/value tags attached to remote objects.
pub type Metadata = HashMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct CustomerPayload {
    pub email: String,
    pub name: String,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ProductPayload {
    pub name: String,
    pub active: bool,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct RecurringTerms {
    pub interval: RecurrenceInterval,
    pub interval_count: u32,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PricePayload {
    pub product_id: String,
    pub unit_amount: MinorUnit,
    pub currency: Currency,
    /// Present for subscription prices only.
    pub recurring: Option<RecurringTerms>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct CouponPayload {
    pub name: String,
    pub percent_off: Decimal,
    pub duration: CouponDuration,
    pub duration_in_months: Option<u32>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct PaymentMethodPayload {
    /// Gateway token for the underlying card or bank source.
    pub token: String,
    pub customer_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SetupIntentPayload {
    pub customer_id: String,
    pub payment_method_id: String,
    pub confirm: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct SubscriptionPayload {
    pub customer_id: String,
    pub price_id: String,
    pub trial_period_days: Option<u32>,
    pub coupon_id: Option<String>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ChargePayload {
    pub amount: MinorUnit,
    pub currency: Currency,
    /// Tokenized payment source supplied by the checkout page.
    pub source: String,
    pub customer_id: Option<String>,
    pub description: String,
    /// Marketplace commission collected on top of the base fee.
    pub application_fee_amount: Option<MinorUnit>,
    pub capture: bool,
    /// Caller-supplied key; the only sanctioned way to retry a charge.
    pub idempotency_key: Option<String>,
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GatewayCustomer {
    pub id: String,
    pub email: String,
    pub name: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GatewayProduct {
    pub id: String,
    pub name: String,
    pub active: bool,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GatewayPrice {
    pub id: String,
    pub product_id: Option<String>,
    pub unit_amount: MinorUnit,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GatewayCoupon {
    pub id: String,
    pub percent_off: Decimal,
    pub duration: CouponDuration,
    pub duration_in_months: Option<u32>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GatewayPaymentMethod {
    pub id: String,
    pub customer_id: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GatewaySetupIntent {
    pub id: String,
    pub status: String,
    /// Handed to the checkout page for client-side confirmation.
    pub client_secret: Option<String>,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GatewaySubscription {
    pub id: String,
    pub status: String,
    #[serde(default)]
    pub metadata: Metadata,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct GatewayCharge {
    pub id: String,
    pub status: String,
    pub captured: bool,
    pub amount: MinorUnit,
    #[serde(default)]
    pub metadata: Metadata,
}
