use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use async_trait::async_trait;

use crate::db::get_connection;
use crate::errors::Result;
use crate::schema::{tier_price_links, variant_prices};

use super::matrix_model::{TierPriceLink, VariantPrice};
use super::matrix_traits::MatrixRepositoryTrait;

pub struct MatrixRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl MatrixRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        MatrixRepository { pool }
    }
}

#[async_trait]
impl MatrixRepositoryTrait for MatrixRepository {
    fn get_variant_prices(&self) -> Result<Vec<VariantPrice>> {
        let mut conn = get_connection(&self.pool)?;
        variant_prices::table
            .load(&mut conn)
            .map_err(crate::Error::from)
    }

    fn get_variant_price(
        &self,
        variant_id: &str,
        channel_id: &str,
    ) -> Result<Option<VariantPrice>> {
        let mut conn = get_connection(&self.pool)?;
        variant_prices::table
            .filter(variant_prices::variant_id.eq(variant_id))
            .filter(variant_prices::channel_id.eq(channel_id))
            .first(&mut conn)
            .optional()
            .map_err(crate::Error::from)
    }

    fn get_links_for_variant_price(&self, variant_price_id: &str) -> Result<Vec<TierPriceLink>> {
        let mut conn = get_connection(&self.pool)?;
        tier_price_links::table
            .filter(tier_price_links::variant_price_id.eq(variant_price_id))
            .load(&mut conn)
            .map_err(crate::Error::from)
    }

    fn get_link(&self, variant_price_id: &str, tier_id: &str) -> Result<Option<TierPriceLink>> {
        let mut conn = get_connection(&self.pool)?;
        tier_price_links::table
            .filter(tier_price_links::variant_price_id.eq(variant_price_id))
            .filter(tier_price_links::tier_id.eq(tier_id))
            .first(&mut conn)
            .optional()
            .map_err(crate::Error::from)
    }

    fn count_links_for_variant_price(&self, variant_price_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        tier_price_links::table
            .filter(tier_price_links::variant_price_id.eq(variant_price_id))
            .count()
            .get_result(&mut conn)
            .map_err(crate::Error::from)
    }

    fn count_links_for_tier(&self, tier_id: &str) -> Result<i64> {
        let mut conn = get_connection(&self.pool)?;
        tier_price_links::table
            .filter(tier_price_links::tier_id.eq(tier_id))
            .count()
            .get_result(&mut conn)
            .map_err(crate::Error::from)
    }

    async fn create_variant_price(
        &self,
        variant_id: &str,
        channel_id: &str,
        base_price: f64,
    ) -> Result<VariantPrice> {
        let mut conn = get_connection(&self.pool)?;
        let now = chrono::Utc::now().naive_utc();
        let variant_price = VariantPrice {
            id: Uuid::new_v4().to_string(),
            variant_id: variant_id.to_string(),
            channel_id: channel_id.to_string(),
            base_price,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(variant_prices::table)
            .values(&variant_price)
            .get_result(&mut conn)
            .map_err(crate::Error::from)
    }

    async fn update_base_price(&self, variant_price_id: &str, base_price: f64) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::update(variant_prices::table.find(variant_price_id))
            .set((
                variant_prices::base_price.eq(base_price),
                variant_prices::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .execute(&mut conn)
            .map_err(crate::Error::from)
            .map(|_| ())
    }

    async fn insert_link(&self, link: TierPriceLink) -> Result<bool> {
        let mut conn = get_connection(&self.pool)?;
        // The unique index on (variant_price_id, tier_id) absorbs the insert
        // when the other synchronization entry point got there first.
        let inserted = diesel::insert_into(tier_price_links::table)
            .values(&link)
            .on_conflict((
                tier_price_links::variant_price_id,
                tier_price_links::tier_id,
            ))
            .do_nothing()
            .execute(&mut conn)
            .map_err(crate::Error::from)?;
        Ok(inserted > 0)
    }

    async fn set_link_price(
        &self,
        variant_price_id: &str,
        tier_id: &str,
        price: f64,
    ) -> Result<()> {
        let mut conn = get_connection(&self.pool)?;
        diesel::update(
            tier_price_links::table
                .filter(tier_price_links::variant_price_id.eq(variant_price_id))
                .filter(tier_price_links::tier_id.eq(tier_id)),
        )
        .set((
            tier_price_links::price.eq(price),
            tier_price_links::updated_at.eq(chrono::Utc::now().naive_utc()),
        ))
        .execute(&mut conn)
        .map_err(crate::Error::from)
        .map(|_| ())
    }
}
