use log::debug;
use std::sync::Arc;

use async_trait::async_trait;

use crate::matrix::MatrixServiceTrait;
use crate::Result;

use super::tiers_model::{NewPriceTier, PriceTier, TierSearchResponse, TierSort, TierUpdate};
use super::tiers_traits::{TierRepositoryTrait, TierServiceTrait};

/// Service for managing price tiers
pub struct TierService {
    tier_repository: Arc<dyn TierRepositoryTrait>,
    matrix_service: Arc<dyn MatrixServiceTrait>,
}

impl TierService {
    /// Creates a new TierService instance with injected dependencies
    pub fn new(
        tier_repository: Arc<dyn TierRepositoryTrait>,
        matrix_service: Arc<dyn MatrixServiceTrait>,
    ) -> Self {
        Self {
            tier_repository,
            matrix_service,
        }
    }
}

#[async_trait]
impl TierServiceTrait for TierService {
    fn get_tier(&self, tier_id: &str) -> Result<Option<PriceTier>> {
        self.tier_repository.get_tier(tier_id)
    }

    /// Retrieves all price tiers
    fn get_tiers(&self) -> Result<Vec<PriceTier>> {
        self.tier_repository.get_tiers()
    }

    /// Searches price tiers with name filtering and pagination
    fn search_tiers(
        &self,
        page: i64,
        page_size: i64,
        name_filter: Option<String>,
        sort: Option<TierSort>,
    ) -> Result<TierSearchResponse> {
        self.tier_repository
            .search_tiers(page, page_size, name_filter, sort)
    }

    /// Creates a new price tier and seeds the price matrix for it
    async fn create_tier(&self, new_tier: NewPriceTier) -> Result<PriceTier> {
        let tier = self.tier_repository.create_tier(new_tier).await?;
        debug!("Created price tier '{}' ({})", tier.name, tier.id);
        self.matrix_service.on_tier_created(&tier).await?;
        Ok(tier)
    }

    /// Updates an existing price tier
    async fn update_tier(&self, update: TierUpdate) -> Result<PriceTier> {
        self.tier_repository.update_tier(update).await
    }
}
