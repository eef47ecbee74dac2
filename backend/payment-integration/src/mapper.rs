//! Builders for gateway-side payload shapes from local entities.
//!
//! Pure functions; every payload is tagged with the owning site and
//! the local primary key so the sync engine can find it again.

use common_enums::Currency;
use common_utils::{
    consts,
    errors::{CustomResult, ValidationError},
    types::{convert_decimal_to_integer, MinorUnit},
};
use domain_types::{
    catalog::Offer,
    customer::CustomerProfile,
    gateway_types::{
        ChargePayload, CouponPayload, CustomerPayload, Metadata, PricePayload, ProductPayload,
        RecurringTerms, SubscriptionPayload,
    },
    invoice::Invoice,
    types::Site,
};
use error_stack::ResultExt;
use time::OffsetDateTime;

/// The `site` + `pk` tag pair present on every synced object.
pub fn base_metadata(site: &Site, pk: u64) -> Metadata {
    Metadata::from([
        (consts::METADATA_SITE_KEY.to_string(), site.domain.clone()),
        (consts::METADATA_PK_KEY.to_string(), pk.to_string()),
    ])
}

pub fn build_customer_payload(profile: &CustomerProfile, site: &Site) -> CustomerPayload {
    CustomerPayload {
        email: profile.email.clone(),
        name: profile.name.clone(),
        metadata: base_metadata(site, profile.id),
    }
}

pub fn build_product_payload(offer: &Offer, site: &Site) -> ProductPayload {
    ProductPayload {
        name: offer.name.clone(),
        active: offer.available && !offer.deleted,
        metadata: base_metadata(site, offer.id),
    }
}

/// Price payload for the offer's current price row. Fails when no row
/// is active for `currency` or the amount cannot be expressed in
/// minor units.
pub fn build_price_payload(
    offer: &Offer,
    product_id: &str,
    site: &Site,
    currency: Currency,
    now: OffsetDateTime,
) -> CustomResult<PricePayload, ValidationError> {
    let price = offer.current_price(currency, now).ok_or_else(|| {
        error_stack::report!(ValidationError::MissingRequiredField {
            field_name: "current_price",
        })
    })?;
    let unit_amount = convert_decimal_to_integer(price.amount, currency).change_context(
        ValidationError::IncorrectValueProvided {
            field_name: "unit_amount",
        },
    )?;

    Ok(PricePayload {
        product_id: product_id.to_string(),
        unit_amount,
        currency,
        recurring: offer.term_details.as_ref().map(|terms| RecurringTerms {
            interval: terms.interval,
            interval_count: terms.interval_count,
        }),
        metadata: base_metadata(site, offer.id),
    })
}

/// Coupon payload for a discounted offer; `None` when the offer has
/// no discount. The fingerprint tag is what duplicate resolution
/// matches on.
pub fn build_coupon_payload(offer: &Offer, site: &Site) -> Option<CouponPayload> {
    let discount = offer.discount.as_ref()?;
    let mut metadata = base_metadata(site, offer.id);
    metadata.insert(
        consts::METADATA_FINGERPRINT_KEY.to_string(),
        discount.fingerprint(),
    );

    Some(CouponPayload {
        name: format!("{} discount", offer.name),
        percent_off: discount.percent_off,
        duration: discount.duration,
        duration_in_months: discount.duration_in_months,
        metadata,
    })
}

pub fn build_subscription_payload(
    customer_id: &str,
    price_id: &str,
    offer: &Offer,
    site: &Site,
) -> SubscriptionPayload {
    SubscriptionPayload {
        customer_id: customer_id.to_string(),
        price_id: price_id.to_string(),
        trial_period_days: offer
            .term_details
            .as_ref()
            .map(|terms| terms.trial_days)
            .filter(|days| *days > 0),
        coupon_id: offer.remote.coupon_id.clone(),
        metadata: base_metadata(site, offer.id),
    }
}

/// Charge payload for the invoice total. The idempotency key is the
/// caller's; without one the charge is never retried.
pub fn build_charge_payload(
    invoice: &Invoice,
    site: &Site,
    source: &str,
    customer_id: Option<String>,
    application_fee_amount: Option<MinorUnit>,
    idempotency_key: Option<String>,
) -> CustomResult<ChargePayload, ValidationError> {
    let amount = convert_decimal_to_integer(invoice.total, invoice.currency).change_context(
        ValidationError::IncorrectValueProvided {
            field_name: "amount",
        },
    )?;

    Ok(ChargePayload {
        amount,
        currency: invoice.currency,
        source: source.to_string(),
        customer_id,
        description: format!("{} invoice {}", site.domain, invoice.id),
        application_fee_amount,
        capture: true,
        idempotency_key,
        metadata: base_metadata(site, invoice.id),
    })
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use common_enums::{CouponDuration, RecurrenceInterval};
    use domain_types::catalog::{Discount, OfferRemoteLinks, Price, TermDetails};
    use common_utils::types::MajorUnit;
    use rust_decimal::Decimal;
    use time::Duration;

    use super::*;

    fn site() -> Site {
        Site {
            id: 1,
            domain: "example.com".to_string(),
            name: "Example".to_string(),
        }
    }

    fn subscription_offer() -> Offer {
        let now = OffsetDateTime::now_utc();
        Offer {
            id: 7,
            site_id: 1,
            name: "Monthly Plan".to_string(),
            available: true,
            prices: vec![Price {
                id: 1,
                offer_id: 7,
                amount: MajorUnit::new(Decimal::new(1055, 2)),
                currency: Currency::USD,
                priority: 0,
                start_date: now - Duration::days(1),
                end_date: None,
                remote_price_id: None,
            }],
            term_details: Some(TermDetails {
                trial_days: 14,
                interval: RecurrenceInterval::Month,
                interval_count: 1,
            }),
            discount: Some(Discount {
                percent_off: Decimal::from(25),
                duration: CouponDuration::Repeating,
                duration_in_months: Some(3),
            }),
            remote: OfferRemoteLinks::default(),
            deleted: false,
        }
    }

    #[test]
    fn price_payload_converts_to_minor_units() {
        let offer = subscription_offer();
        let payload = build_price_payload(
            &offer,
            "prod_1",
            &site(),
            Currency::USD,
            OffsetDateTime::now_utc(),
        )
        .unwrap();

        assert_eq!(payload.unit_amount, MinorUnit::new(1055));
        assert_eq!(
            payload.recurring.as_ref().map(|r| r.interval),
            Some(RecurrenceInterval::Month)
        );
        assert_eq!(payload.metadata.get("site").map(String::as_str), Some("example.com"));
        assert_eq!(payload.metadata.get("pk").map(String::as_str), Some("7"));
    }

    #[test]
    fn price_payload_requires_an_active_row() {
        let mut offer = subscription_offer();
        offer.prices.clear();
        assert!(build_price_payload(
            &offer,
            "prod_1",
            &site(),
            Currency::USD,
            OffsetDateTime::now_utc()
        )
        .is_err());
    }

    #[test]
    fn coupon_payload_carries_fingerprint() {
        let offer = subscription_offer();
        let payload = build_coupon_payload(&offer, &site()).unwrap();
        assert_eq!(payload.percent_off, Decimal::from(25));
        assert_eq!(
            payload.metadata.get("fingerprint").map(String::as_str),
            Some("25:repeating:3")
        );
    }

    #[test]
    fn coupon_payload_is_none_without_discount() {
        let mut offer = subscription_offer();
        offer.discount = None;
        assert!(build_coupon_payload(&offer, &site()).is_none());
    }

    #[test]
    fn subscription_payload_skips_zero_trials() {
        let mut offer = subscription_offer();
        offer.term_details = Some(TermDetails {
            trial_days: 0,
            interval: RecurrenceInterval::Month,
            interval_count: 1,
        });
        let payload = build_subscription_payload("cus_1", "price_1", &offer, &site());
        assert_eq!(payload.trial_period_days, None);
    }
}
