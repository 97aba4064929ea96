use log::info;
use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;

use crate::constants::{APPLY_CHUNK_SIZE, DEFAULT_CHANNEL_ID};
use crate::matrix::{MatrixRepositoryTrait, MatrixServiceTrait, VariantPrice};
use crate::Result;

use super::products_model::{ApplyOutcome, Product, ProductUpsert};
use super::products_traits::{ProductCatalogTrait, ProductRepositoryTrait};

/// Service applying classified catalog batches.
///
/// Product and variant rows are written in chunked transactions; each
/// variant price is then pushed through the matrix synchronizer so the
/// tier join stays complete, and staged per-tier overrides land last.
pub struct ProductService {
    product_repository: Arc<dyn ProductRepositoryTrait>,
    matrix_repository: Arc<dyn MatrixRepositoryTrait>,
    matrix_service: Arc<dyn MatrixServiceTrait>,
}

impl ProductService {
    /// Creates a new ProductService instance with injected dependencies
    pub fn new(
        product_repository: Arc<dyn ProductRepositoryTrait>,
        matrix_repository: Arc<dyn MatrixRepositoryTrait>,
        matrix_service: Arc<dyn MatrixServiceTrait>,
    ) -> Self {
        Self {
            product_repository,
            matrix_repository,
            matrix_service,
        }
    }

    pub fn get_product(&self, product_id: &str) -> Result<Option<Product>> {
        self.product_repository.get_product(product_id)
    }

    async fn sync_variant_price(&self, variant_id: &str, upsert: &ProductUpsert) -> Result<()> {
        let price = upsert
            .variant
            .as_ref()
            .map(|v| v.price)
            .unwrap_or_default();

        let variant_price = match self
            .matrix_repository
            .get_variant_price(variant_id, DEFAULT_CHANNEL_ID)?
        {
            Some(vp) => {
                self.matrix_repository
                    .update_base_price(&vp.id, price)
                    .await?;
                VariantPrice {
                    base_price: price,
                    ..vp
                }
            }
            None => {
                self.matrix_repository
                    .create_variant_price(variant_id, DEFAULT_CHANNEL_ID, price)
                    .await?
            }
        };

        self.matrix_service
            .on_variant_price_ready(&variant_price)
            .await?;

        for tier_override in &upsert.tier_overrides {
            self.matrix_service
                .set_link_price(&variant_price.id, &tier_override.tier_id, tier_override.price)
                .await?;
        }

        Ok(())
    }
}

#[async_trait]
impl ProductCatalogTrait for ProductService {
    fn find_existing_product_ids(&self, ids: &[String]) -> Result<HashSet<String>> {
        self.product_repository.find_existing_product_ids(ids)
    }

    async fn batch_create_or_update(&self, batch: Vec<ProductUpsert>) -> Result<ApplyOutcome> {
        let mut outcome = ApplyOutcome::default();

        for chunk in batch.chunks(APPLY_CHUNK_SIZE) {
            let applied = self.product_repository.apply_chunk(chunk).await?;

            for (upsert, row) in chunk.iter().zip(applied.iter()) {
                if row.created {
                    outcome.created += 1;
                } else {
                    outcome.updated += 1;
                }
                if let Some(variant_id) = &row.variant_id {
                    self.sync_variant_price(variant_id, upsert).await?;
                }
            }
        }

        info!(
            "Applied catalog batch: {} created, {} updated",
            outcome.created, outcome.updated
        );
        Ok(outcome)
    }
}
