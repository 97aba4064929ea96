use diesel::prelude::*;
use diesel::r2d2::{ConnectionManager, Pool};
use diesel::result::{DatabaseErrorKind, Error as DieselError};
use diesel::sqlite::SqliteConnection;
use std::sync::Arc;
use uuid::Uuid;

use async_trait::async_trait;

use crate::db::get_connection;
use crate::errors::Result;
use crate::schema::price_tiers;

use super::tiers_errors::TierError;
use super::tiers_model::{NewPriceTier, PriceTier, TierSearchResponse, TierSort, TierUpdate};
use super::tiers_traits::TierRepositoryTrait;

pub struct TierRepository {
    pool: Arc<Pool<ConnectionManager<SqliteConnection>>>,
}

impl TierRepository {
    pub fn new(pool: Arc<Pool<ConnectionManager<SqliteConnection>>>) -> Self {
        TierRepository { pool }
    }
}

#[async_trait]
impl TierRepositoryTrait for TierRepository {
    fn get_tier(&self, tier_id: &str) -> Result<Option<PriceTier>> {
        let mut conn = get_connection(&self.pool)?;
        price_tiers::table
            .find(tier_id)
            .first(&mut conn)
            .optional()
            .map_err(|e| TierError::from(e).into())
    }

    fn get_tiers(&self) -> Result<Vec<PriceTier>> {
        let mut conn = get_connection(&self.pool)?;
        price_tiers::table
            .order(price_tiers::name.asc())
            .load(&mut conn)
            .map_err(|e| TierError::from(e).into())
    }

    fn search_tiers(
        &self,
        page: i64,
        page_size: i64,
        name_filter: Option<String>,
        sort: Option<TierSort>,
    ) -> Result<TierSearchResponse> {
        let mut conn = get_connection(&self.pool)?;

        let mut query = price_tiers::table.into_boxed();
        let mut count_query = price_tiers::table.into_boxed();

        if let Some(term) = name_filter.filter(|t| !t.is_empty()) {
            let pattern = format!("%{}%", term);
            query = query.filter(price_tiers::name.like(pattern.clone()));
            count_query = count_query.filter(price_tiers::name.like(pattern));
        }

        query = match sort {
            Some(TierSort {
                ref order_by,
                ascending,
            }) if order_by == "name" => {
                if ascending {
                    query.order(price_tiers::name.asc())
                } else {
                    query.order(price_tiers::name.desc())
                }
            }
            Some(TierSort {
                ref order_by,
                ascending,
            }) if order_by == "updatedAt" => {
                if ascending {
                    query.order(price_tiers::updated_at.asc())
                } else {
                    query.order(price_tiers::updated_at.desc())
                }
            }
            Some(TierSort { ascending, .. }) => {
                if ascending {
                    query.order(price_tiers::created_at.asc())
                } else {
                    query.order(price_tiers::created_at.desc())
                }
            }
            None => query.order(price_tiers::created_at.desc()),
        };

        let total_items: i64 = count_query
            .count()
            .get_result(&mut conn)
            .map_err(TierError::from)?;

        let page = page.max(1);
        let page_size = page_size.max(1);
        let items = query
            .limit(page_size)
            .offset((page - 1) * page_size)
            .load::<PriceTier>(&mut conn)
            .map_err(TierError::from)?;

        Ok(TierSearchResponse { items, total_items })
    }

    async fn create_tier(&self, new_tier: NewPriceTier) -> Result<PriceTier> {
        let mut conn = get_connection(&self.pool)?;
        let now = chrono::Utc::now().naive_utc();
        let tier = PriceTier {
            id: Uuid::new_v4().to_string(),
            name: new_tier.name,
            created_at: now,
            updated_at: now,
        };

        diesel::insert_into(price_tiers::table)
            .values(&tier)
            .get_result(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    TierError::DuplicateName(tier.name.clone()).into()
                }
                other => TierError::from(other).into(),
            })
    }

    async fn update_tier(&self, update: TierUpdate) -> Result<PriceTier> {
        let mut conn = get_connection(&self.pool)?;

        let current: Option<PriceTier> = price_tiers::table
            .find(&update.id)
            .first(&mut conn)
            .optional()
            .map_err(TierError::from)?;
        let current = current.ok_or_else(|| TierError::NotFound(update.id.clone()))?;

        let name = match update.name {
            Some(name) => name,
            // No name supplied: field update is a no-op
            None => return Ok(current),
        };

        diesel::update(price_tiers::table.find(&update.id))
            .set((
                price_tiers::name.eq(&name),
                price_tiers::updated_at.eq(chrono::Utc::now().naive_utc()),
            ))
            .get_result(&mut conn)
            .map_err(|e| match e {
                DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
                    TierError::DuplicateName(name.clone()).into()
                }
                other => TierError::from(other).into(),
            })
    }
}
