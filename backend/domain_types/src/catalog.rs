//! Sellable offers, their prioritized price rows and discount terms.

use common_enums::{CouponDuration, Currency, RecurrenceInterval};
use common_utils::types::MajorUnit;
use rust_decimal::Decimal;
use time::OffsetDateTime;

/// One price row for an offer. An offer may carry several rows per
/// currency with different validity windows and priorities.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Price {
    pub id: u64,
    pub offer_id: u64,
    pub amount: MajorUnit,
    pub currency: Currency,
    /// Lower number wins when several rows are active.
    pub priority: u16,
    pub start_date: OffsetDateTime,
    pub end_date: Option<OffsetDateTime>,
    /// Remote price object, once synchronized.
    pub remote_price_id: Option<String>,
}

impl Price {
    pub fn is_active(&self, now: OffsetDateTime) -> bool {
        self.start_date <= now && self.end_date.map_or(true, |end| now < end)
    }
}

/// Trial and recurrence metadata for subscription offers.
#[derive(Debug, Clone, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct TermDetails {
    pub trial_days: u32,
    pub interval: RecurrenceInterval,
    pub interval_count: u32,
}

impl TermDetails {
    /// End of the entitlement window opened at `start`. Months and
    /// years use fixed-length approximations (30 and 365 days).
    pub fn window_end(&self, start: OffsetDateTime) -> OffsetDateTime {
        let days_per_interval = match self.interval {
            RecurrenceInterval::Day => 1,
            RecurrenceInterval::Week => 7,
            RecurrenceInterval::Month => 30,
            RecurrenceInterval::Year => 365,
        };
        start + time::Duration::days(days_per_interval * i64::from(self.interval_count))
    }
}

/// Discount terms feeding coupon synchronization.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Discount {
    pub percent_off: Decimal,
    pub duration: CouponDuration,
    pub duration_in_months: Option<u32>,
}

impl Discount {
    /// Stable identity of the discount terms. Remote coupons carrying
    /// the same fingerprint are duplicates of each other.
    pub fn fingerprint(&self) -> String {
        format!(
            "{}:{}:{}",
            self.percent_off.normalize(),
            self.duration,
            self.duration_in_months.unwrap_or(0)
        )
    }
}

/// Remote object ids cached after synchronization. Presence of an id
/// signals the object is already synced; absence marks it for the
/// next pass.
#[derive(Debug, Clone, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct OfferRemoteLinks {
    pub product_id: Option<String>,
    pub price_id: Option<String>,
    pub coupon_id: Option<String>,
}

/// A sellable arrangement of products with term and price metadata.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Offer {
    pub id: u64,
    pub site_id: u64,
    pub name: String,
    pub available: bool,
    pub prices: Vec<Price>,
    /// Present only on subscription offers.
    pub term_details: Option<TermDetails>,
    pub discount: Option<Discount>,
    pub remote: OfferRemoteLinks,
    pub deleted: bool,
}

impl Offer {
    /// The price row in effect: lowest priority number among rows
    /// active now for the requested currency, ties broken by row id.
    pub fn current_price(&self, currency: Currency, now: OffsetDateTime) -> Option<&Price> {
        self.prices
            .iter()
            .filter(|price| price.currency == currency && price.is_active(now))
            .min_by_key(|price| (price.priority, price.id))
    }

    pub fn is_synced(&self) -> bool {
        self.remote.product_id.is_some()
    }
}
