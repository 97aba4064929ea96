use async_trait::async_trait;
use std::collections::HashSet;

use super::products_model::{AppliedRow, ApplyOutcome, Product, ProductUpsert};
use crate::Result;

/// Trait defining the contract for product storage operations.
#[async_trait]
pub trait ProductRepositoryTrait: Send + Sync {
    fn get_product(&self, product_id: &str) -> Result<Option<Product>>;
    /// Returns the subset of the given ids that exist in storage.
    fn find_existing_product_ids(&self, ids: &[String]) -> Result<HashSet<String>>;
    /// Applies one chunk of upserts inside a single transaction.
    async fn apply_chunk(&self, chunk: &[ProductUpsert]) -> Result<Vec<AppliedRow>>;
}

/// Boundary operations the reconciliation pipeline consumes from the
/// catalog subsystem.
#[async_trait]
pub trait ProductCatalogTrait: Send + Sync {
    fn find_existing_product_ids(&self, ids: &[String]) -> Result<HashSet<String>>;
    async fn batch_create_or_update(&self, batch: Vec<ProductUpsert>) -> Result<ApplyOutcome>;
}
