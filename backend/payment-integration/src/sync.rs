//! Reconciliation of local entities against the gateway.
//!
//! One direction only: local is authoritative, the gateway is made to
//! match. Each object is reconciled independently; a failure is
//! recorded in the report and never aborts the pass.

use common_enums::GatewayObjectKind;
use common_utils::consts;
use domain_types::{
    catalog::Offer,
    customer::CustomerProfile,
    errors::ReconciliationError,
    gateway_types::GatewayCoupon,
    types::Site,
};
use error_stack::ResultExt;
use time::OffsetDateTime;

use crate::{
    mapper,
    query::{build_search_query, QueryClause, QueryOperator},
};
use interfaces::gateway::SharedGateway;

/// Outcome of one reconciliation pass.
#[derive(Debug, Default)]
pub struct SyncReport {
    pub created: usize,
    pub updated: usize,
    pub removed_duplicates: usize,
    pub errors: Vec<error_stack::Report<ReconciliationError>>,
}

impl SyncReport {
    pub fn is_clean(&self) -> bool {
        self.errors.is_empty()
    }
}

/// Pushes local customers and offers to the gateway for one site.
pub struct SyncEngine {
    gateway: SharedGateway,
    site: Site,
}

impl SyncEngine {
    pub fn new(gateway: SharedGateway, site: Site) -> Self {
        Self { gateway, site }
    }

    /// Reconcile customer profiles. Linked profiles are updated in
    /// place; unlinked ones are matched by email against the site's
    /// remote customers before a create, so a rerun never duplicates.
    /// Remote ids are written back onto the profiles.
    pub async fn update_customers(&self, profiles: &mut [CustomerProfile]) -> SyncReport {
        let mut report = SyncReport::default();

        let query = build_search_query(
            GatewayObjectKind::Customer,
            &[QueryClause::metadata(
                consts::METADATA_SITE_KEY,
                QueryOperator::ExactMatch,
                self.site.domain.as_str(),
            )],
        );
        let remote = match self.gateway.search_customers(&query).await {
            Ok(remote) => remote,
            Err(error) => {
                report.errors.push(error.change_context(
                    ReconciliationError::ObjectSyncFailure {
                        kind: GatewayObjectKind::Customer,
                        local_id: 0,
                    },
                ));
                return report;
            }
        };

        for profile in profiles.iter_mut().filter(|profile| !profile.deleted) {
            if let Err(error) = self.sync_customer(profile, &remote, &mut report).await {
                tracing::warn!(profile_id = profile.id, error = ?error, "customer sync failed");
                report.errors.push(error);
            }
        }

        report
    }

    async fn sync_customer(
        &self,
        profile: &mut CustomerProfile,
        remote: &[domain_types::gateway_types::GatewayCustomer],
        report: &mut SyncReport,
    ) -> Result<(), error_stack::Report<ReconciliationError>> {
        let context = ReconciliationError::ObjectSyncFailure {
            kind: GatewayObjectKind::Customer,
            local_id: profile.id,
        };
        let payload = mapper::build_customer_payload(profile, &self.site);

        // A cached remote id can go stale when the remote object was
        // deleted out of band; fall back to the email match then.
        let linked = profile
            .remote_customer_id
            .as_deref()
            .filter(|id| remote.iter().any(|customer| customer.id == *id))
            .map(str::to_string);

        match linked {
            Some(id) => {
                self.gateway
                    .update_customer(&id, payload)
                    .await
                    .change_context(context)?;
                report.updated += 1;
            }
            None => match remote
                .iter()
                .find(|customer| customer.email == profile.email)
            {
                Some(existing) => {
                    self.gateway
                        .update_customer(&existing.id, payload)
                        .await
                        .change_context(context)?;
                    profile.remote_customer_id = Some(existing.id.clone());
                    report.updated += 1;
                }
                None => {
                    let created = self
                        .gateway
                        .create_customer(payload)
                        .await
                        .change_context(context)?;
                    profile.remote_customer_id = Some(created.id);
                    report.created += 1;
                }
            },
        }

        Ok(())
    }

    /// Reconcile offers: product, current price and coupon per offer.
    /// Duplicate coupons sharing a discount fingerprint are resolved
    /// down to one surviving object carrying the latest data.
    pub async fn update_offers(
        &self,
        offers: &mut [Offer],
        now: OffsetDateTime,
    ) -> SyncReport {
        let mut report = SyncReport::default();

        let coupons = match self.gateway.list_coupons().await {
            Ok(coupons) => coupons,
            Err(error) => {
                report.errors.push(error.change_context(
                    ReconciliationError::ObjectSyncFailure {
                        kind: GatewayObjectKind::Coupon,
                        local_id: 0,
                    },
                ));
                return report;
            }
        };

        for offer in offers.iter_mut().filter(|offer| !offer.deleted) {
            if let Err(error) = self.sync_product(offer, &mut report).await {
                tracing::warn!(offer_id = offer.id, error = ?error, "product sync failed");
                report.errors.push(error);
                continue;
            }
            if let Err(error) = self.sync_price(offer, now, &mut report).await {
                tracing::warn!(offer_id = offer.id, error = ?error, "price sync failed");
                report.errors.push(error);
            }
            if let Err(error) = self.sync_coupon(offer, &coupons, &mut report).await {
                tracing::warn!(offer_id = offer.id, error = ?error, "coupon sync failed");
                report.errors.push(error);
            }
        }

        report
    }

    async fn sync_product(
        &self,
        offer: &mut Offer,
        report: &mut SyncReport,
    ) -> Result<(), error_stack::Report<ReconciliationError>> {
        let context = ReconciliationError::ObjectSyncFailure {
            kind: GatewayObjectKind::Product,
            local_id: offer.id,
        };
        let payload = mapper::build_product_payload(offer, &self.site);

        match &offer.remote.product_id {
            Some(id) => {
                self.gateway
                    .update_product(id, payload)
                    .await
                    .change_context(context)?;
                report.updated += 1;
            }
            None => {
                let created = self
                    .gateway
                    .create_product(payload)
                    .await
                    .change_context(context)?;
                offer.remote.product_id = Some(created.id);
                report.created += 1;
            }
        }
        Ok(())
    }

    async fn sync_price(
        &self,
        offer: &mut Offer,
        now: OffsetDateTime,
        report: &mut SyncReport,
    ) -> Result<(), error_stack::Report<ReconciliationError>> {
        // Prices are immutable remotely; an existing link is reused.
        if offer.remote.price_id.is_some() {
            return Ok(());
        }
        let context = ReconciliationError::ObjectSyncFailure {
            kind: GatewayObjectKind::Price,
            local_id: offer.id,
        };
        let Some(product_id) = offer.remote.product_id.clone() else {
            return Err(error_stack::report!(context));
        };
        let Some(currency) = offer
            .prices
            .iter()
            .find(|price| price.is_active(now))
            .map(|price| price.currency)
        else {
            // Offers without an active price row have nothing to push.
            return Ok(());
        };

        let payload = mapper::build_price_payload(offer, &product_id, &self.site, currency, now)
            .change_context(context.clone())?;
        let created = self
            .gateway
            .create_price(payload)
            .await
            .change_context(context)?;
        offer.remote.price_id = Some(created.id);
        report.created += 1;
        Ok(())
    }

    async fn sync_coupon(
        &self,
        offer: &mut Offer,
        coupons: &[GatewayCoupon],
        report: &mut SyncReport,
    ) -> Result<(), error_stack::Report<ReconciliationError>> {
        let Some(payload) = mapper::build_coupon_payload(offer, &self.site) else {
            return Ok(());
        };
        let context = ReconciliationError::ObjectSyncFailure {
            kind: GatewayObjectKind::Coupon,
            local_id: offer.id,
        };

        let fingerprint = offer
            .discount
            .as_ref()
            .map(|discount| discount.fingerprint())
            .unwrap_or_default();
        let matches: Vec<&GatewayCoupon> = coupons
            .iter()
            .filter(|coupon| {
                coupon.metadata.get(consts::METADATA_SITE_KEY) == Some(&self.site.domain)
                    && coupon.metadata.get(consts::METADATA_FINGERPRINT_KEY)
                        == Some(&fingerprint)
            })
            .collect();

        match matches.split_first() {
            Some((survivor, duplicates)) => {
                for duplicate in duplicates {
                    match self.gateway.delete_coupon(&duplicate.id).await {
                        Ok(()) => report.removed_duplicates += 1,
                        Err(error) => report.errors.push(error.change_context(
                            ReconciliationError::DuplicateRemovalFailure {
                                kind: GatewayObjectKind::Coupon,
                                remote_id: duplicate.id.clone(),
                            },
                        )),
                    }
                }
                self.gateway
                    .update_coupon(&survivor.id, payload)
                    .await
                    .change_context(context)?;
                offer.remote.coupon_id = Some(survivor.id.clone());
                report.updated += 1;
            }
            None => {
                let created = self
                    .gateway
                    .create_coupon(payload)
                    .await
                    .change_context(context)?;
                offer.remote.coupon_id = Some(created.id);
                report.created += 1;
            }
        }
        Ok(())
    }
}
