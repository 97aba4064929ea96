use log::debug;
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::tiers::{PriceTier, TierRepositoryTrait};
use crate::Result;

use super::matrix_model::{TierPriceLink, VariantPrice};
use super::matrix_traits::{MatrixRepositoryTrait, MatrixServiceTrait};

/// Keeps the tier x variant-price join complete.
///
/// The matrix is a sparse join keyed by id pairs: neither side holds a
/// back-reference to the other, and completeness is reached by an explicit
/// seeding pass from whichever side was created last. Insert collisions
/// between the two entry points are absorbed by the storage-level unique
/// constraint, so no application lock is required.
pub struct MatrixService {
    matrix_repository: Arc<dyn MatrixRepositoryTrait>,
    tier_repository: Arc<dyn TierRepositoryTrait>,
}

impl MatrixService {
    /// Creates a new MatrixService instance with injected dependencies
    pub fn new(
        matrix_repository: Arc<dyn MatrixRepositoryTrait>,
        tier_repository: Arc<dyn TierRepositoryTrait>,
    ) -> Self {
        Self {
            matrix_repository,
            tier_repository,
        }
    }
}

#[async_trait]
impl MatrixServiceTrait for MatrixService {
    /// Seeds a link for every existing variant price when a tier is created.
    async fn on_tier_created(&self, tier: &PriceTier) -> Result<()> {
        let variant_prices = self.matrix_repository.get_variant_prices()?;
        let mut seeded = 0usize;

        for variant_price in &variant_prices {
            let link = TierPriceLink::seeded(&variant_price.id, &tier.id, variant_price.base_price);
            if self.matrix_repository.insert_link(link).await? {
                seeded += 1;
            } else {
                debug!(
                    "Link for variant price {} / tier {} already present, absorbed",
                    variant_price.id, tier.id
                );
            }
        }

        debug!(
            "Tier '{}' seeded {} of {} variant prices",
            tier.name,
            seeded,
            variant_prices.len()
        );
        Ok(())
    }

    /// Completes the matrix row for a freshly created variant price.
    async fn on_variant_price_ready(&self, variant_price: &VariantPrice) -> Result<()> {
        let tiers = self.tier_repository.get_tiers()?;
        let existing: HashSet<String> = self
            .matrix_repository
            .get_links_for_variant_price(&variant_price.id)?
            .into_iter()
            .map(|link| link.tier_id)
            .collect();

        for tier in tiers.iter().filter(|t| !existing.contains(&t.id)) {
            let link = TierPriceLink::seeded(&variant_price.id, &tier.id, variant_price.base_price);
            // A tier created between the load above and this insert seeds the
            // same cell concurrently; the collision is absorbed, not an error.
            if !self.matrix_repository.insert_link(link).await? {
                debug!(
                    "Link for variant price {} / tier {} raced with tier seeding, absorbed",
                    variant_price.id, tier.id
                );
            }
        }

        Ok(())
    }

    /// Overrides the price of one matrix cell.
    async fn set_link_price(
        &self,
        variant_price_id: &str,
        tier_id: &str,
        price: f64,
    ) -> Result<()> {
        self.matrix_repository
            .set_link_price(variant_price_id, tier_id, price)
            .await
    }
}
