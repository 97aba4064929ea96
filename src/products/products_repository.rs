use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::Error as DieselError;
use diesel::sqlite::SqliteConnection;
use std::collections::HashSet;
use std::sync::Arc;
use uuid::Uuid;

use async_trait::async_trait;

use crate::db::get_connection;
use crate::errors::Result;
use crate::schema::{product_variants, products};

use super::products_model::{
    AppliedRow, Product, ProductUpsert, ProductVariant, UpsertDecision,
};
use super::products_traits::ProductRepositoryTrait;

pub struct ProductRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl ProductRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        ProductRepository { pool }
    }
}

fn join_ids(ids: &[String]) -> Option<String> {
    if ids.is_empty() {
        None
    } else {
        Some(ids.join(","))
    }
}

/// Inserts or renames the variant matching the upsert's SKU within the
/// transaction; returns its id.
fn upsert_variant(
    conn: &mut SqliteConnection,
    product_id: &str,
    upsert: &ProductUpsert,
) -> std::result::Result<Option<String>, DieselError> {
    let variant = match &upsert.variant {
        Some(variant) => variant,
        None => return Ok(None),
    };

    let now = chrono::Utc::now().naive_utc();
    let existing: Option<String> = product_variants::table
        .filter(product_variants::product_id.eq(product_id))
        .filter(product_variants::sku.eq(&variant.sku))
        .select(product_variants::id)
        .first(conn)
        .optional()?;

    match existing {
        Some(variant_id) => {
            diesel::update(product_variants::table.find(&variant_id))
                .set((
                    product_variants::name.eq(&variant.name),
                    product_variants::updated_at.eq(now),
                ))
                .execute(conn)?;
            Ok(Some(variant_id))
        }
        None => {
            let row = ProductVariant {
                id: Uuid::new_v4().to_string(),
                product_id: product_id.to_string(),
                name: variant.name.clone(),
                sku: variant.sku.clone(),
                created_at: now,
                updated_at: now,
            };
            diesel::insert_into(product_variants::table)
                .values(&row)
                .execute(conn)?;
            Ok(Some(row.id))
        }
    }
}

#[async_trait]
impl ProductRepositoryTrait for ProductRepository {
    fn get_product(&self, product_id: &str) -> Result<Option<Product>> {
        let mut conn = get_connection(&self.pool)?;
        products::table
            .find(product_id)
            .first(&mut conn)
            .optional()
            .map_err(crate::Error::from)
    }

    fn find_existing_product_ids(&self, ids: &[String]) -> Result<HashSet<String>> {
        if ids.is_empty() {
            return Ok(HashSet::new());
        }
        let mut conn = get_connection(&self.pool)?;
        let found: Vec<String> = products::table
            .filter(products::id.eq_any(ids))
            .select(products::id)
            .load(&mut conn)
            .map_err(crate::Error::from)?;
        Ok(found.into_iter().collect())
    }

    async fn apply_chunk(&self, chunk: &[ProductUpsert]) -> Result<Vec<AppliedRow>> {
        let mut conn = get_connection(&self.pool)?;

        conn.transaction::<Vec<AppliedRow>, DieselError, _>(|conn| {
            let mut applied = Vec::with_capacity(chunk.len());
            let now = chrono::Utc::now().naive_utc();

            for upsert in chunk {
                match &upsert.decision {
                    UpsertDecision::Update(product_id) => {
                        diesel::update(products::table.find(product_id))
                            .set((
                                products::name.eq(&upsert.name),
                                products::slug.eq(&upsert.slug),
                                products::enabled.eq(upsert.enabled),
                                products::description.eq(&upsert.description),
                                products::featured_asset_id.eq(&upsert.featured_asset_id),
                                products::asset_ids.eq(join_ids(&upsert.asset_ids)),
                                products::facet_value_ids.eq(join_ids(&upsert.facet_value_ids)),
                                products::updated_at.eq(now),
                            ))
                            .execute(conn)?;
                        let variant_id = upsert_variant(conn, product_id, upsert)?;
                        applied.push(AppliedRow {
                            product_id: product_id.clone(),
                            variant_id,
                            created: false,
                        });
                    }
                    UpsertDecision::Create => {
                        let product = Product {
                            id: Uuid::new_v4().to_string(),
                            name: upsert.name.clone(),
                            slug: upsert.slug.clone(),
                            enabled: upsert.enabled,
                            description: upsert.description.clone(),
                            featured_asset_id: upsert.featured_asset_id.clone(),
                            asset_ids: join_ids(&upsert.asset_ids),
                            facet_value_ids: join_ids(&upsert.facet_value_ids),
                            created_at: now,
                            updated_at: now,
                        };
                        diesel::insert_into(products::table)
                            .values(&product)
                            .execute(conn)?;
                        let variant_id = upsert_variant(conn, &product.id, upsert)?;
                        applied.push(AppliedRow {
                            product_id: product.id,
                            variant_id,
                            created: true,
                        });
                    }
                }
            }

            Ok(applied)
        })
        .map_err(crate::Error::from)
    }
}
