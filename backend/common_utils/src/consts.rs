//! Crate-wide constants.

/// Default tax percentage applied to an order subtotal when the site
/// has no override configured.
pub const DEFAULT_TAX_PERCENT: f64 = 10.0;

/// Default flat shipping amount in major units.
pub const DEFAULT_SHIPPING_FLAT: f64 = 0.0;

/// Default gateway base-fee percentage of the charged amount.
pub const DEFAULT_BASE_FEE_PERCENT: f64 = 2.9;

/// Default gateway fixed fee in minor units.
pub const DEFAULT_BASE_FEE_FIXED_MINOR_UNITS: i64 = 30;

/// Default marketplace commission percentage; zero means no
/// application fee is collected.
pub const DEFAULT_COMMISSION_PERCENT: f64 = 0.0;

/// Upper bound on a single outbound gateway call.
pub const GATEWAY_CALL_TIMEOUT_SECS: u64 = 20;

/// Retry cap for idempotent gateway reads (searches, retrieves).
/// Charge creation is never retried automatically.
pub const GATEWAY_READ_RETRY_LIMIT: u32 = 1;

/// Metadata key carrying the owning site domain on remote objects.
pub const METADATA_SITE_KEY: &str = "site";

/// Metadata key carrying the local primary key on remote objects.
pub const METADATA_PK_KEY: &str = "pk";

/// Metadata key carrying a coupon's discount/duration fingerprint.
pub const METADATA_FINGERPRINT_KEY: &str = "fingerprint";

/// Error code wasn't received in the gateway response.
pub const NO_ERROR_CODE: &str = "No error code";

/// Error message wasn't received in the gateway response.
pub const NO_ERROR_MESSAGE: &str = "No error message available";
