use async_trait::async_trait;

use super::tiers_model::{NewPriceTier, PriceTier, TierSearchResponse, TierSort, TierUpdate};
use crate::Result;

/// Trait defining the contract for price tier repository operations.
#[async_trait]
pub trait TierRepositoryTrait: Send + Sync {
    fn get_tier(&self, tier_id: &str) -> Result<Option<PriceTier>>;
    fn get_tiers(&self) -> Result<Vec<PriceTier>>;
    fn search_tiers(
        &self,
        page: i64,
        page_size: i64,
        name_filter: Option<String>,
        sort: Option<TierSort>,
    ) -> Result<TierSearchResponse>;
    async fn create_tier(&self, new_tier: NewPriceTier) -> Result<PriceTier>;
    async fn update_tier(&self, update: TierUpdate) -> Result<PriceTier>;
}

/// Trait defining the contract for price tier service operations.
#[async_trait]
pub trait TierServiceTrait: Send + Sync {
    fn get_tier(&self, tier_id: &str) -> Result<Option<PriceTier>>;
    fn get_tiers(&self) -> Result<Vec<PriceTier>>;
    fn search_tiers(
        &self,
        page: i64,
        page_size: i64,
        name_filter: Option<String>,
        sort: Option<TierSort>,
    ) -> Result<TierSearchResponse>;
    /// Creates a tier and seeds a link row for every existing variant price.
    async fn create_tier(&self, new_tier: NewPriceTier) -> Result<PriceTier>;
    async fn update_tier(&self, update: TierUpdate) -> Result<PriceTier>;
}
