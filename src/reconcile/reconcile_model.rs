use std::collections::BTreeMap;

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

use crate::products::ProductUpsert;

/// A single data row of the import file, mapped from the fixed columns.
/// Columns not in the fixed set land in `extras`, keyed by header name;
/// tier price columns are resolved from there at staging time.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatalogRow {
    /// 1-based position among the parsed data rows.
    pub row_number: usize,
    pub id: Option<String>,
    pub name: String,
    pub slug: String,
    pub enabled: String,
    pub asset_ids: String,
    pub description: String,
    pub facet_value_ids: String,
    pub featured_asset_id: String,
    pub variant_name: String,
    pub variant_sku: String,
    pub variant_price: String,
    pub extras: BTreeMap<String, String>,
}

impl CatalogRow {
    pub fn from_cells(row_number: usize, headers: &[String], cells: &[String]) -> Self {
        let mut row = CatalogRow {
            row_number,
            id: None,
            name: String::new(),
            slug: String::new(),
            enabled: String::new(),
            asset_ids: String::new(),
            description: String::new(),
            facet_value_ids: String::new(),
            featured_asset_id: String::new(),
            variant_name: String::new(),
            variant_sku: String::new(),
            variant_price: String::new(),
            extras: BTreeMap::new(),
        };

        for (header, cell) in headers.iter().zip(cells.iter()) {
            let value = cell.trim().to_string();
            match header.as_str() {
                "id" => {
                    if !value.is_empty() {
                        row.id = Some(value);
                    }
                }
                "name" => row.name = value,
                "slug" => row.slug = value,
                "enabled" => row.enabled = value,
                "assetIds" => row.asset_ids = value,
                "description" => row.description = value,
                "facetValueIds" => row.facet_value_ids = value,
                "featuredAssetId" => row.featured_asset_id = value,
                "productVariantName" => row.variant_name = value,
                "productVariantSKU" => row.variant_sku = value,
                "productVariantPrice" => row.variant_price = value,
                _ => {
                    row.extras.insert(header.clone(), value);
                }
            }
        }

        row
    }

    /// A row carries a variant payload when the variant name column is
    /// non-empty.
    pub fn has_variant(&self) -> bool {
        !self.variant_name.trim().is_empty()
    }

    /// Identity used for duplicate collapsing: the id when present,
    /// otherwise the product name.
    pub fn dedup_key(&self) -> String {
        match &self.id {
            Some(id) => id.clone(),
            None => self.name.clone(),
        }
    }
}

/// Counters reported back after staging an import.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StageSummary {
    pub total_rows: usize,
    pub staged: usize,
    pub creates: usize,
    pub updates: usize,
    pub duplicates_dropped: usize,
}

/// A validated, deduplicated batch held in memory until it is applied
/// or discarded.
#[derive(Debug, Clone)]
pub struct StagedBatch {
    pub upserts: Vec<ProductUpsert>,
    pub summary: StageSummary,
    pub staged_at: NaiveDateTime,
}
