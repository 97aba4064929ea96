use async_trait::async_trait;

use super::matrix_model::{TierPriceLink, VariantPrice};
use crate::tiers::PriceTier;
use crate::Result;

/// Trait defining the contract for price matrix repository operations.
#[async_trait]
pub trait MatrixRepositoryTrait: Send + Sync {
    fn get_variant_prices(&self) -> Result<Vec<VariantPrice>>;
    fn get_variant_price(
        &self,
        variant_id: &str,
        channel_id: &str,
    ) -> Result<Option<VariantPrice>>;
    fn get_links_for_variant_price(&self, variant_price_id: &str) -> Result<Vec<TierPriceLink>>;
    fn get_link(&self, variant_price_id: &str, tier_id: &str) -> Result<Option<TierPriceLink>>;
    fn count_links_for_variant_price(&self, variant_price_id: &str) -> Result<i64>;
    fn count_links_for_tier(&self, tier_id: &str) -> Result<i64>;
    async fn create_variant_price(
        &self,
        variant_id: &str,
        channel_id: &str,
        base_price: f64,
    ) -> Result<VariantPrice>;
    async fn update_base_price(&self, variant_price_id: &str, base_price: f64) -> Result<()>;
    /// Inserts a link unless one already exists for the same matrix cell.
    /// Returns `false` when the insert collided with a concurrent one and
    /// was absorbed.
    async fn insert_link(&self, link: TierPriceLink) -> Result<bool>;
    async fn set_link_price(
        &self,
        variant_price_id: &str,
        tier_id: &str,
        price: f64,
    ) -> Result<()>;
}

/// Trait defining the contract for price matrix synchronization.
///
/// Both entry points converge to the same final state regardless of the
/// order in which tiers and variant prices are created.
#[async_trait]
pub trait MatrixServiceTrait: Send + Sync {
    async fn on_tier_created(&self, tier: &PriceTier) -> Result<()>;
    async fn on_variant_price_ready(&self, variant_price: &VariantPrice) -> Result<()>;
    async fn set_link_price(
        &self,
        variant_price_id: &str,
        tier_id: &str,
        price: f64,
    ) -> Result<()>;
}
