/// The three-letter ISO 4217 currency code for an amount.
#[allow(clippy::upper_case_acronyms)]
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "UPPERCASE")]
#[strum(serialize_all = "UPPERCASE")]
pub enum Currency {
    AUD,
    BHD,
    BIF,
    BRL,
    CAD,
    CHF,
    CLP,
    CNY,
    DKK,
    EUR,
    GBP,
    HKD,
    INR,
    JOD,
    JPY,
    KRW,
    KWD,
    MXN,
    NOK,
    NZD,
    OMR,
    PLN,
    SEK,
    SGD,
    TND,
    #[default]
    USD,
    VND,
    ZAR,
}

impl Currency {
    /// Currencies whose minor unit equals the major unit.
    pub fn is_zero_decimal_currency(self) -> bool {
        matches!(
            self,
            Self::BIF | Self::CLP | Self::JPY | Self::KRW | Self::VND
        )
    }

    /// Currencies with a thousandth minor unit.
    pub fn is_three_decimal_currency(self) -> bool {
        matches!(
            self,
            Self::BHD | Self::JOD | Self::KWD | Self::OMR | Self::TND
        )
    }

    /// Number of fractional digits in the major-unit representation.
    pub fn exponent(self) -> u32 {
        if self.is_zero_decimal_currency() {
            0
        } else if self.is_three_decimal_currency() {
            3
        } else {
            2
        }
    }

    /// Minor units per major unit (10^exponent).
    pub fn minor_unit_factor(self) -> i64 {
        10_i64.pow(self.exponent())
    }
}

/// Lifecycle of an invoice, from open cart to settled order.
///
/// Discriminants are persisted as-is; the gaps leave room for
/// intermediate states without renumbering.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    Ord,
    PartialEq,
    PartialOrd,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum InvoiceStatus {
    #[default]
    Cart = 0,
    Checkout = 10,
    Processing = 20,
    Failed = 30,
    Complete = 40,
}

/// The status of a single charge attempt.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum PaymentStatus {
    #[default]
    Queued = 0,
    Active = 10,
    Authorized = 20,
    Captured = 30,
    Settled = 40,
    Canceled = 50,
    Refunded = 60,
    Declined = 70,
    Void = 80,
}

impl PaymentStatus {
    /// Terminal states freeze the payment record; only the explicit
    /// refund/void transitions may follow.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            Self::Captured
                | Self::Settled
                | Self::Canceled
                | Self::Refunded
                | Self::Declined
                | Self::Void
        )
    }
}

/// The status of an entitlement receipt.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ReceiptStatus {
    #[default]
    Pending,
    Active,
    Expired,
    Canceled,
}

/// The status of a recurring gateway-side agreement.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SubscriptionStatus {
    #[default]
    Incomplete,
    Trialing,
    Active,
    PastDue,
    Canceled,
}

/// Remote object kinds the gateway exposes CRUD and search for.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
    strum::EnumIter,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum GatewayObjectKind {
    Customer,
    Product,
    Price,
    Coupon,
    PaymentMethod,
    SetupIntent,
    Subscription,
    Charge,
}

/// Observable processor lifecycle notifications.
#[derive(
    Clone,
    Copy,
    Debug,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum EventKind {
    PreAuthorization,
    PostAuthorization,
    PaymentProcessed,
    SubscriptionCanceled,
}

/// Concrete processor implementations selectable through configuration.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum ProcessorKind {
    #[default]
    Stripe,
}

/// Interval units for recurring offers.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum RecurrenceInterval {
    Day,
    Week,
    #[default]
    Month,
    Year,
}

/// Coupon duration semantics on the gateway side.
#[derive(
    Clone,
    Copy,
    Debug,
    Default,
    Eq,
    Hash,
    PartialEq,
    serde::Deserialize,
    serde::Serialize,
    strum::Display,
    strum::EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum CouponDuration {
    #[default]
    Once,
    Repeating,
    Forever,
}
