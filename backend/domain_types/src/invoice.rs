//! The invoice/order state machine and totals computation.

use common_enums::{Currency, InvoiceStatus};
use common_utils::{types::MajorUnit, CustomResult};
use rust_decimal::Decimal;
use time::OffsetDateTime;

use crate::{catalog::Offer, customer::Address, errors::InvariantViolation};

/// A line item linking an invoice to an offer.
///
/// `unit_price` is snapshotted from `offer.current_price()` whenever
/// the item is touched through [`Invoice::add_offer`], so totals stay
/// stable between edits.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct OrderItem {
    pub id: u64,
    pub invoice_id: u64,
    pub offer_id: u64,
    pub name: String,
    pub quantity: u16,
    pub unit_price: MajorUnit,
}

impl OrderItem {
    pub fn total(&self) -> MajorUnit {
        self.unit_price.times(self.quantity)
    }
}

/// Pluggable totals policy: flat shipping plus a tax percentage of
/// the subtotal.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TotalsPolicy {
    pub tax_percent: Decimal,
    pub shipping_flat: MajorUnit,
}

impl Default for TotalsPolicy {
    fn default() -> Self {
        Self {
            tax_percent: Decimal::from(10),
            shipping_flat: MajorUnit::zero(),
        }
    }
}

/// An order in progress or completed; doubles as the cart while
/// status is `Cart`. Never hard-deleted.
#[derive(Debug, Clone, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Invoice {
    pub id: u64,
    pub profile_id: u64,
    pub site_id: u64,
    pub status: InvoiceStatus,
    /// Set once on completion; a cart has none.
    pub ordered_date: Option<OffsetDateTime>,
    pub subtotal: MajorUnit,
    pub tax: MajorUnit,
    pub shipping: MajorUnit,
    pub total: MajorUnit,
    pub currency: Currency,
    pub shipping_address: Option<Address>,
    pub customer_notes: String,
    pub vendor_notes: String,
    pub deleted: bool,
    pub items: Vec<OrderItem>,
    pub policy: TotalsPolicy,
}

impl Invoice {
    /// A fresh cart for (profile, site). Callers enforce at most one
    /// non-deleted cart per pair.
    pub fn new_cart(id: u64, profile_id: u64, site_id: u64, currency: Currency) -> Self {
        Self {
            id,
            profile_id,
            site_id,
            status: InvoiceStatus::Cart,
            ordered_date: None,
            subtotal: MajorUnit::zero(),
            tax: MajorUnit::zero(),
            shipping: MajorUnit::zero(),
            total: MajorUnit::zero(),
            currency,
            shipping_address: None,
            customer_notes: String::new(),
            vendor_notes: String::new(),
            deleted: false,
            items: Vec::new(),
            policy: TotalsPolicy::default(),
        }
    }

    /// Get-or-create the item for `offer` and bump its quantity,
    /// refreshing the unit price snapshot. Recomputes totals. Editing
    /// a checked-out cart drops it back to `Cart`.
    pub fn add_offer(
        &mut self,
        offer: &Offer,
        now: OffsetDateTime,
    ) -> CustomResult<&OrderItem, InvariantViolation> {
        let price = offer.current_price(self.currency, now).ok_or_else(|| {
            error_stack::report!(InvariantViolation::NoActivePrice {
                offer_id: offer.id,
                currency: self.currency,
            })
        })?;

        let index = match self.items.iter().position(|item| item.offer_id == offer.id) {
            Some(index) => {
                let item = &mut self.items[index];
                item.quantity += 1;
                item.unit_price = price.amount;
                index
            }
            None => {
                let id = self.items.iter().map(|item| item.id).max().unwrap_or(0) + 1;
                self.items.push(OrderItem {
                    id,
                    invoice_id: self.id,
                    offer_id: offer.id,
                    name: offer.name.clone(),
                    quantity: 1,
                    unit_price: price.amount,
                });
                self.items.len() - 1
            }
        };

        self.revert_to_cart_on_edit();
        self.update_totals();
        Ok(&self.items[index])
    }

    /// Decrement the quantity for `offer`; the row is deleted at zero.
    /// Recomputes totals. Editing a checked-out cart drops it back to
    /// `Cart`.
    pub fn remove_offer(&mut self, offer: &Offer) {
        if let Some(index) = self.items.iter().position(|item| item.offer_id == offer.id) {
            let item = &mut self.items[index];
            if item.quantity > 1 {
                item.quantity -= 1;
            } else {
                self.items.remove(index);
            }
            self.revert_to_cart_on_edit();
            self.update_totals();
        }
    }

    /// Recompute subtotal, tax, shipping and total from the current
    /// items. Idempotent.
    pub fn update_totals(&mut self) {
        self.subtotal = self.items.iter().map(OrderItem::total).sum();
        self.shipping = self.policy.shipping_flat;
        self.tax = self.subtotal.percent(self.policy.tax_percent);
        self.total = self.subtotal + self.tax + self.shipping;
    }

    /// Move the cart to checkout. Legal only with at least one item;
    /// an empty cart is left untouched.
    pub fn transition_to_checkout(&mut self) -> CustomResult<(), InvariantViolation> {
        if self.items.is_empty() {
            return Err(error_stack::report!(InvariantViolation::EmptyCart {
                invoice_id: self.id,
            }));
        }
        self.status = InvoiceStatus::Checkout;
        Ok(())
    }

    pub fn mark_processing(&mut self) {
        self.status = InvoiceStatus::Processing;
    }

    /// Settle the invoice; `ordered_date` is recorded exactly once.
    pub fn mark_complete(&mut self, now: OffsetDateTime) {
        self.status = InvoiceStatus::Complete;
        if self.ordered_date.is_none() {
            self.ordered_date = Some(now);
        }
    }

    pub fn mark_failed(&mut self) {
        self.status = InvoiceStatus::Failed;
    }

    /// A declined charge returns the invoice to checkout so the same
    /// invoice can be retried.
    pub fn return_to_checkout(&mut self) {
        self.status = InvoiceStatus::Checkout;
    }

    pub fn soft_delete(&mut self) {
        self.deleted = true;
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    fn revert_to_cart_on_edit(&mut self) {
        if self.status == InvoiceStatus::Checkout {
            self.status = InvoiceStatus::Cart;
        }
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use std::sync::{Arc, Mutex};

    use common_enums::Currency;
    use rust_decimal::Decimal;
    use time::{Duration, OffsetDateTime};

    use super::*;
    use crate::catalog::{OfferRemoteLinks, Price};

    fn offer_with_price(id: u64, amount: i64) -> Offer {
        let now = OffsetDateTime::now_utc();
        Offer {
            id,
            site_id: 1,
            name: format!("offer-{id}"),
            available: true,
            prices: vec![Price {
                id: 1,
                offer_id: id,
                amount: MajorUnit::new(Decimal::from(amount)),
                currency: Currency::USD,
                priority: 0,
                start_date: now - Duration::days(1),
                end_date: None,
                remote_price_id: None,
            }],
            term_details: None,
            discount: None,
            remote: OfferRemoteLinks::default(),
            deleted: false,
        }
    }

    fn cart() -> Invoice {
        Invoice::new_cart(1, 10, 1, Currency::USD)
    }

    #[test]
    fn add_offer_creates_then_increments() {
        let mut invoice = cart();
        let offer = offer_with_price(1, 25);
        let now = OffsetDateTime::now_utc();

        invoice.add_offer(&offer, now).unwrap();
        invoice.add_offer(&offer, now).unwrap();

        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].quantity, 2);
        assert_eq!(invoice.subtotal, MajorUnit::new(Decimal::from(50)));
        // 10% default tax
        assert_eq!(invoice.tax, MajorUnit::new(Decimal::from(5)));
        assert_eq!(invoice.total, MajorUnit::new(Decimal::from(55)));
    }

    #[test]
    fn remove_offer_decrements_and_deletes_at_zero() {
        let mut invoice = cart();
        let offer = offer_with_price(1, 25);
        let now = OffsetDateTime::now_utc();
        invoice.add_offer(&offer, now).unwrap();
        invoice.add_offer(&offer, now).unwrap();

        invoice.remove_offer(&offer);
        assert_eq!(invoice.items[0].quantity, 1);

        invoice.remove_offer(&offer);
        assert!(invoice.items.is_empty());
        assert_eq!(invoice.total, MajorUnit::zero());
    }

    #[test]
    fn update_totals_is_idempotent() {
        let mut invoice = cart();
        let offer = offer_with_price(1, 33);
        invoice.add_offer(&offer, OffsetDateTime::now_utc()).unwrap();

        let before = (invoice.subtotal, invoice.tax, invoice.shipping, invoice.total);
        invoice.update_totals();
        invoice.update_totals();
        let after = (invoice.subtotal, invoice.tax, invoice.shipping, invoice.total);
        assert_eq!(before, after);
    }

    #[test]
    fn totals_honor_policy_overrides() {
        let mut invoice = cart();
        invoice.policy = TotalsPolicy {
            tax_percent: Decimal::from(20),
            shipping_flat: MajorUnit::new(Decimal::new(499, 2)),
        };
        let offer = offer_with_price(1, 100);
        invoice.add_offer(&offer, OffsetDateTime::now_utc()).unwrap();

        assert_eq!(invoice.tax, MajorUnit::new(Decimal::from(20)));
        assert_eq!(invoice.shipping, MajorUnit::new(Decimal::new(499, 2)));
        assert_eq!(invoice.total, MajorUnit::new(Decimal::new(12499, 2)));
    }

    #[test]
    fn empty_cart_cannot_reach_checkout() {
        let mut invoice = cart();
        assert!(invoice.transition_to_checkout().is_err());
        assert_eq!(invoice.status, InvoiceStatus::Cart);
    }

    #[test]
    fn editing_a_checked_out_cart_reverts_to_cart() {
        let mut invoice = cart();
        let offer = offer_with_price(1, 10);
        let now = OffsetDateTime::now_utc();
        invoice.add_offer(&offer, now).unwrap();
        invoice.transition_to_checkout().unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Checkout);

        invoice.add_offer(&offer, now).unwrap();
        assert_eq!(invoice.status, InvoiceStatus::Cart);
    }

    #[test]
    fn add_offer_fails_without_active_price() {
        let mut invoice = cart();
        let mut offer = offer_with_price(1, 10);
        offer.prices.clear();
        assert!(invoice.add_offer(&offer, OffsetDateTime::now_utc()).is_err());
        assert!(invoice.items.is_empty());
    }

    #[test]
    fn completion_records_ordered_date_once() {
        let mut invoice = cart();
        let offer = offer_with_price(1, 10);
        invoice.add_offer(&offer, OffsetDateTime::now_utc()).unwrap();
        invoice.transition_to_checkout().unwrap();

        let first = OffsetDateTime::now_utc();
        invoice.mark_complete(first);
        invoice.mark_complete(first + Duration::hours(1));
        assert_eq!(invoice.ordered_date, Some(first));
    }

    #[test]
    fn concurrent_add_offer_converges_to_one_row() {
        let invoice = Arc::new(Mutex::new(cart()));
        let offer = Arc::new(offer_with_price(1, 5));
        let now = OffsetDateTime::now_utc();

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let invoice = Arc::clone(&invoice);
                let offer = Arc::clone(&offer);
                std::thread::spawn(move || {
                    invoice.lock().unwrap().add_offer(&offer, now).unwrap();
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let invoice = invoice.lock().unwrap();
        assert_eq!(invoice.items.len(), 1);
        assert_eq!(invoice.items[0].quantity, 8);
        assert_eq!(invoice.subtotal, MajorUnit::new(Decimal::from(40)));
    }
}
