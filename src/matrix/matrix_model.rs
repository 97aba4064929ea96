use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{tier_price_links, variant_prices};

/// A product variant's base price scoped to one sales channel.
///
/// Owned by the variant/channel subsystem; the matrix treats it as the
/// anchor of the tier join.
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Insertable,
    AsChangeset,
    PartialEq,
    Debug,
    Clone,
    Serialize,
    Deserialize,
)]
#[diesel(table_name = variant_prices)]
#[serde(rename_all = "camelCase")]
pub struct VariantPrice {
    pub id: String,
    pub variant_id: String,
    pub channel_id: String,
    pub base_price: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Join row pricing one tier for one variant price; unit of the
/// completeness invariant. Unique on `(variant_price_id, tier_id)`.
#[derive(
    Queryable,
    Selectable,
    Identifiable,
    Insertable,
    AsChangeset,
    PartialEq,
    Debug,
    Clone,
    Serialize,
    Deserialize,
)]
#[diesel(table_name = tier_price_links)]
#[serde(rename_all = "camelCase")]
pub struct TierPriceLink {
    pub id: String,
    pub variant_price_id: String,
    pub tier_id: String,
    pub price: f64,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl TierPriceLink {
    /// Builds a fresh link seeded from the owning variant price.
    pub fn seeded(variant_price_id: &str, tier_id: &str, price: f64) -> Self {
        let now = chrono::Utc::now().naive_utc();
        TierPriceLink {
            id: uuid::Uuid::new_v4().to_string(),
            variant_price_id: variant_price_id.to_string(),
            tier_id: tier_id.to_string(),
            price,
            created_at: now,
            updated_at: now,
        }
    }
}
