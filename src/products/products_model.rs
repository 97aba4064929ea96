use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::{product_variants, products};

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
#[diesel(table_name = products)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    pub id: String,
    pub name: String,
    pub slug: String,
    pub enabled: bool,
    pub description: String,
    pub featured_asset_id: Option<String>,
    pub asset_ids: Option<String>,
    pub facet_value_ids: Option<String>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

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
#[diesel(table_name = product_variants)]
#[serde(rename_all = "camelCase")]
pub struct ProductVariant {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub sku: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

/// Variant payload attached to an import row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VariantInput {
    pub name: String,
    pub sku: String,
    pub price: f64,
}

/// Per-tier override extracted from a dynamic import column.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TierPriceOverride {
    pub tier_id: String,
    pub tier_name: String,
    pub price: f64,
}

/// Create-or-update decision computed once during classification and
/// carried forward; downstream code never re-inspects the raw id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", tag = "kind", content = "id")]
pub enum UpsertDecision {
    Create,
    Update(String),
}

/// One fully classified, tier-annotated catalog row ready to apply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProductUpsert {
    pub decision: UpsertDecision,
    pub name: String,
    pub slug: String,
    pub enabled: bool,
    pub description: String,
    pub featured_asset_id: Option<String>,
    pub asset_ids: Vec<String>,
    pub facet_value_ids: Vec<String>,
    pub variant: Option<VariantInput>,
    pub tier_overrides: Vec<TierPriceOverride>,
}

/// Result of one batch apply.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ApplyOutcome {
    pub created: usize,
    pub updated: usize,
}

/// Per-row result of a chunk transaction, aligned with the input order.
#[derive(Debug, Clone, PartialEq)]
pub struct AppliedRow {
    pub product_id: String,
    pub variant_id: Option<String>,
    pub created: bool,
}
