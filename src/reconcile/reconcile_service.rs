use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use log::{debug, info};
use tokio::sync::RwLock;

use crate::constants::{MAX_IMPORT_ROWS, REQUIRED_IMPORT_COLUMNS};
use crate::errors::{Error, Result, ValidationError};
use crate::products::{
    ApplyOutcome, ProductCatalogTrait, ProductUpsert, TierPriceOverride, UpsertDecision,
    VariantInput,
};
use crate::tiers::{PriceTier, TierRepositoryTrait};

use super::csv_parser;
use super::reconcile_errors::ImportError;
use super::reconcile_model::{CatalogRow, StageSummary, StagedBatch};
use super::reconcile_traits::ReconcileServiceTrait;

/// Service running the bulk import pipeline: parse, validate,
/// deduplicate, classify against the live catalog, and hold the result
/// staged in memory until it is applied or discarded.
pub struct ReconcileService {
    tier_repository: Arc<dyn TierRepositoryTrait>,
    catalog: Arc<dyn ProductCatalogTrait>,
    staged: RwLock<Option<StagedBatch>>,
}

impl ReconcileService {
    /// Creates a new ReconcileService instance with injected dependencies
    pub fn new(
        tier_repository: Arc<dyn TierRepositoryTrait>,
        catalog: Arc<dyn ProductCatalogTrait>,
    ) -> Self {
        Self {
            tier_repository,
            catalog,
            staged: RwLock::new(None),
        }
    }

    /// Every fixed column must be present in the header row. Reported
    /// in column declaration order, first missing wins.
    fn validate_headers(headers: &[String]) -> Result<()> {
        for column in REQUIRED_IMPORT_COLUMNS {
            if !headers.iter().any(|h| h == column) {
                return Err(ImportError::MissingColumn(column.to_string()).into());
            }
        }
        Ok(())
    }

    /// Whole-file validation; the first bad row aborts the run before
    /// anything is staged.
    fn validate_rows(rows: &[CatalogRow]) -> Result<()> {
        for row in rows {
            if row.name.trim().is_empty() {
                return Err(ImportError::InvalidRow {
                    row: row.row_number,
                    column: "name".to_string(),
                }
                .into());
            }
            if row.has_variant() {
                if row.variant_price.trim().is_empty() {
                    return Err(ImportError::InvalidRow {
                        row: row.row_number,
                        column: "productVariantPrice".to_string(),
                    }
                    .into());
                }
                if row.variant_sku.trim().is_empty() {
                    return Err(ImportError::InvalidRow {
                        row: row.row_number,
                        column: "productVariantSKU".to_string(),
                    }
                    .into());
                }
            }
        }
        Ok(())
    }

    /// Collapses duplicate rows keyed by id when present, name
    /// otherwise. The first occurrence wins; later ones are dropped.
    fn dedupe_rows(rows: Vec<CatalogRow>) -> Vec<CatalogRow> {
        let mut seen: HashSet<String> = HashSet::new();
        rows.into_iter()
            .filter(|row| seen.insert(row.dedup_key()))
            .collect()
    }

    /// Classifies one row and resolves its tier override columns
    /// against the tier snapshot taken at the start of the run.
    fn build_upsert(
        row: &CatalogRow,
        tiers: &[PriceTier],
        existing_ids: &HashSet<String>,
    ) -> Result<ProductUpsert> {
        let decision = match &row.id {
            Some(id) if existing_ids.contains(id) => UpsertDecision::Update(id.clone()),
            Some(id) => {
                debug!(
                    "Row {}: product id '{}' not found in catalog, reclassifying as create",
                    row.row_number, id
                );
                UpsertDecision::Create
            }
            None => UpsertDecision::Create,
        };

        let variant = if row.has_variant() {
            // f64::parse accepts "NaN" and "inf"; those are not prices.
            let price = row
                .variant_price
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|p| p.is_finite())
                .ok_or_else(|| ImportError::InvalidRow {
                    row: row.row_number,
                    column: "productVariantPrice".to_string(),
                })?;
            Some(VariantInput {
                name: row.variant_name.clone(),
                sku: row.variant_sku.clone(),
                price,
            })
        } else {
            None
        };

        // Tier columns are matched by tier name among the non-fixed
        // columns. Cells that do not parse as a finite number, or parse
        // to zero, carry no override.
        let tier_overrides: Vec<TierPriceOverride> = tiers
            .iter()
            .filter_map(|tier| {
                row.extras
                    .get(&tier.name)
                    .and_then(|cell| cell.trim().parse::<f64>().ok())
                    .filter(|price| price.is_finite() && *price != 0.0)
                    .map(|price| TierPriceOverride {
                        tier_id: tier.id.clone(),
                        tier_name: tier.name.clone(),
                        price,
                    })
            })
            .collect();

        Ok(ProductUpsert {
            decision,
            name: row.name.clone(),
            slug: row.slug.clone(),
            enabled: row.enabled.trim().eq_ignore_ascii_case("true"),
            description: row.description.clone(),
            featured_asset_id: non_empty(&row.featured_asset_id),
            asset_ids: split_id_list(&row.asset_ids),
            facet_value_ids: split_id_list(&row.facet_value_ids),
            variant,
            tier_overrides,
        })
    }
}

fn non_empty(value: &str) -> Option<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}

// Id-list cells are comma-joined inside the (quoted) cell.
fn split_id_list(value: &str) -> Vec<String> {
    value
        .split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

#[async_trait]
impl ReconcileServiceTrait for ReconcileService {
    async fn stage_import(&self, content: &[u8]) -> Result<StageSummary> {
        let table = csv_parser::parse_table(content)?;
        Self::validate_headers(&table.headers)?;

        if table.rows.len() > MAX_IMPORT_ROWS {
            return Err(ImportError::TooManyRows {
                rows: table.rows.len(),
                limit: MAX_IMPORT_ROWS,
            }
            .into());
        }

        let rows: Vec<CatalogRow> = table
            .rows
            .iter()
            .enumerate()
            .map(|(idx, cells)| CatalogRow::from_cells(idx + 1, &table.headers, cells))
            .collect();
        Self::validate_rows(&rows)?;

        let total_rows = rows.len();
        let rows = Self::dedupe_rows(rows);
        let duplicates_dropped = total_rows - rows.len();

        // One tier snapshot for the whole run; a tier created while an
        // import is being staged is not picked up mid-batch.
        let tiers = self.tier_repository.get_tiers()?;

        let candidate_ids: Vec<String> = rows.iter().filter_map(|r| r.id.clone()).collect();
        let existing_ids = self.catalog.find_existing_product_ids(&candidate_ids)?;

        let upserts: Vec<ProductUpsert> = rows
            .iter()
            .map(|row| Self::build_upsert(row, &tiers, &existing_ids))
            .collect::<Result<_>>()?;

        let creates = upserts
            .iter()
            .filter(|u| matches!(u.decision, UpsertDecision::Create))
            .count();
        let updates = upserts.len() - creates;

        let summary = StageSummary {
            total_rows,
            staged: upserts.len(),
            creates,
            updates,
            duplicates_dropped,
        };

        info!(
            "Staged import batch: {} rows in, {} staged ({} creates, {} updates), {} duplicates dropped",
            summary.total_rows,
            summary.staged,
            summary.creates,
            summary.updates,
            summary.duplicates_dropped
        );

        let mut staged = self.staged.write().await;
        *staged = Some(StagedBatch {
            upserts,
            summary: summary.clone(),
            staged_at: chrono::Utc::now().naive_utc(),
        });

        Ok(summary)
    }

    async fn apply_staged(&self) -> Result<ApplyOutcome> {
        let batch = {
            let staged = self.staged.read().await;
            staged.clone().ok_or(ImportError::NothingStaged)?
        };

        // A failed apply leaves the stage in place so the caller can
        // retry or discard.
        let outcome = self.catalog.batch_create_or_update(batch.upserts).await?;

        // The lock is not held across the catalog write; a batch staged
        // in the meantime must not be swept away with the applied one.
        let mut staged = self.staged.write().await;
        if staged
            .as_ref()
            .is_some_and(|held| held.staged_at == batch.staged_at)
        {
            *staged = None;
        }

        info!(
            "Applied staged batch: {} created, {} updated",
            outcome.created, outcome.updated
        );
        Ok(outcome)
    }

    async fn discard_staged(&self) -> Result<()> {
        let mut staged = self.staged.write().await;
        if staged.take().is_some() {
            info!("Discarded staged import batch");
        }
        Ok(())
    }

    async fn staged_batch(&self) -> Option<StagedBatch> {
        self.staged.read().await.clone()
    }

    fn export_template(&self) -> Result<String> {
        let tiers = self.tier_repository.get_tiers()?;

        let mut headers: Vec<String> = REQUIRED_IMPORT_COLUMNS
            .iter()
            .map(|c| c.to_string())
            .collect();
        headers.extend(tiers.into_iter().map(|t| t.name));

        let mut writer = csv::Writer::from_writer(Vec::new());
        writer
            .write_record(&headers)
            .map_err(|e| Error::Validation(ValidationError::InvalidInput(e.to_string())))?;
        let bytes = writer
            .into_inner()
            .map_err(|e| Error::Validation(ValidationError::InvalidInput(e.to_string())))?;
        String::from_utf8(bytes)
            .map_err(|e| Error::Validation(ValidationError::InvalidInput(e.to_string())))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::{create_pool, run_migrations, DbPool};
    use crate::matrix::{MatrixRepository, MatrixRepositoryTrait, MatrixService};
    use crate::products::{ProductRepository, ProductService};
    use crate::tiers::{NewPriceTier, TierRepository};
    use tempfile::tempdir;

    const HEADER: &str = "id,name,slug,enabled,assetIds,description,facetValueIds,featuredAssetId,productVariantName,productVariantSKU,productVariantPrice";

    fn create_test_pool() -> (Arc<DbPool>, tempfile::TempDir) {
        let temp_dir = tempdir().expect("Failed to create temp directory");
        let db_path = temp_dir.path().join("test.db");
        let db_path_str = db_path.to_string_lossy().to_string();

        crate::db::init(&db_path_str).expect("Failed to init database");
        let pool = create_pool(&db_path_str).expect("Failed to create pool");
        run_migrations(&pool).expect("Failed to run migrations");
        (pool, temp_dir)
    }

    struct Fixture {
        service: ReconcileService,
        tier_repository: Arc<TierRepository>,
        matrix_repository: Arc<MatrixRepository>,
    }

    fn create_fixture(pool: &Arc<DbPool>) -> Fixture {
        let tier_repository = Arc::new(TierRepository::new(pool.clone()));
        let matrix_repository = Arc::new(MatrixRepository::new(pool.clone()));
        let matrix_service = Arc::new(MatrixService::new(
            matrix_repository.clone(),
            tier_repository.clone(),
        ));
        let product_repository = Arc::new(ProductRepository::new(pool.clone()));
        let catalog = Arc::new(ProductService::new(
            product_repository,
            matrix_repository.clone(),
            matrix_service,
        ));
        let service = ReconcileService::new(tier_repository.clone(), catalog);
        Fixture {
            service,
            tier_repository,
            matrix_repository,
        }
    }

    fn row(id: &str, name: &str, variant_name: &str, sku: &str, price: &str) -> String {
        format!(
            "{},{},{},true,,,,,{},{},{}",
            id,
            name,
            name.to_lowercase().replace(' ', "-"),
            variant_name,
            sku,
            price
        )
    }

    fn csv_of(rows: &[String]) -> Vec<u8> {
        let mut content = String::from(HEADER);
        for r in rows {
            content.push('\n');
            content.push_str(r);
        }
        content.into_bytes()
    }

    #[tokio::test]
    async fn test_missing_required_column_aborts() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        let content = b"id,name,enabled\n1,Chair,true".to_vec();
        let err = fixture.service.stage_import(&content).await.unwrap_err();

        match err {
            Error::Import(ImportError::MissingColumn(column)) => assert_eq!(column, "slug"),
            other => panic!("Unexpected error: {:?}", other),
        }
        assert!(fixture.service.staged_batch().await.is_none());
    }

    #[tokio::test]
    async fn test_row_without_name_aborts_whole_run() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        let rows = vec![row("", "Chair", "", "", ""), row("", "", "", "", "")];
        let err = fixture
            .service
            .stage_import(&csv_of(&rows))
            .await
            .unwrap_err();

        match err {
            Error::Import(ImportError::InvalidRow { row, column }) => {
                assert_eq!(row, 2);
                assert_eq!(column, "name");
            }
            other => panic!("Unexpected error: {:?}", other),
        }
        assert!(fixture.service.staged_batch().await.is_none());
    }

    #[tokio::test]
    async fn test_variant_row_without_price_reports_price_column() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        // Variant name set, both SKU and price blank. The price column
        // is reported, not the SKU.
        let rows = vec![row("", "Chair", "Chair Basic", "", "")];
        let err = fixture
            .service
            .stage_import(&csv_of(&rows))
            .await
            .unwrap_err();

        match err {
            Error::Import(ImportError::InvalidRow { row, column }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "productVariantPrice");
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_non_numeric_variant_price_aborts() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        let rows = vec![row("", "Chair", "Chair Basic", "CH-1", "abc")];
        let err = fixture
            .service
            .stage_import(&csv_of(&rows))
            .await
            .unwrap_err();

        match err {
            Error::Import(ImportError::InvalidRow { row, column }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "productVariantPrice");
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_duplicates_collapse_first_wins() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        let rows = vec![
            row("7", "Alpha", "Alpha V", "AL-1", "10"),
            row("7", "Beta", "Beta V", "BE-1", "20"),
            row("", "Gamma", "Gamma V", "GA-1", "30"),
            row("", "Gamma", "Gamma V2", "GA-2", "40"),
        ];
        let summary = fixture
            .service
            .stage_import(&csv_of(&rows))
            .await
            .expect("Stage failed");

        assert_eq!(summary.total_rows, 4);
        assert_eq!(summary.staged, 2);
        assert_eq!(summary.duplicates_dropped, 2);

        let batch = fixture.service.staged_batch().await.expect("No batch");
        let names: Vec<&str> = batch.upserts.iter().map(|u| u.name.as_str()).collect();
        assert_eq!(names, vec!["Alpha", "Gamma"]);
    }

    #[tokio::test]
    async fn test_unknown_id_is_reclassified_as_create() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        let rows = vec![row("999", "Phantom", "Phantom V", "PH-1", "10")];
        let summary = fixture
            .service
            .stage_import(&csv_of(&rows))
            .await
            .expect("Stage failed");

        assert_eq!(summary.creates, 1);
        assert_eq!(summary.updates, 0);

        let batch = fixture.service.staged_batch().await.expect("No batch");
        assert_eq!(batch.upserts[0].decision, UpsertDecision::Create);
    }

    #[tokio::test]
    async fn test_known_id_is_classified_as_update() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        fixture
            .service
            .stage_import(&csv_of(&[row("", "Chair", "Chair V", "CH-1", "50")]))
            .await
            .expect("Stage failed");
        fixture.service.apply_staged().await.expect("Apply failed");

        let product_id = {
            let batch_rows = fixture
                .matrix_repository
                .get_variant_prices()
                .expect("Query failed");
            assert_eq!(batch_rows.len(), 1);
            // Resolve the created product id through its variant price
            let variant_id = batch_rows[0].variant_id.clone();
            let variant: crate::products::ProductVariant = {
                use crate::schema::product_variants::dsl::*;
                use diesel::prelude::*;
                let mut conn = pool.get().expect("No connection");
                product_variants
                    .filter(id.eq(&variant_id))
                    .first(&mut conn)
                    .expect("Variant not found")
            };
            variant.product_id
        };

        let rows = vec![row(&product_id, "Chair Renamed", "Chair V", "CH-1", "60")];
        let summary = fixture
            .service
            .stage_import(&csv_of(&rows))
            .await
            .expect("Stage failed");

        assert_eq!(summary.updates, 1);
        assert_eq!(summary.creates, 0);
        let batch = fixture.service.staged_batch().await.expect("No batch");
        assert_eq!(
            batch.upserts[0].decision,
            UpsertDecision::Update(product_id)
        );
    }

    #[tokio::test]
    async fn test_tier_columns_extract_non_zero_numeric_cells() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        let vip = fixture
            .tier_repository
            .create_tier(NewPriceTier {
                name: "VIP".to_string(),
            })
            .await
            .expect("Tier creation failed");
        fixture
            .tier_repository
            .create_tier(NewPriceTier {
                name: "Wholesale".to_string(),
            })
            .await
            .expect("Tier creation failed");

        let header = format!("{},VIP,Wholesale", HEADER);
        let content = format!(
            "{}\n,Chair,chair,true,,,,,Chair V,CH-1,50,12.5,0\n,Desk,desk,true,,,,,Desk V,DK-1,100,abc,",
            header
        );
        let summary = fixture
            .service
            .stage_import(content.as_bytes())
            .await
            .expect("Stage failed");
        assert_eq!(summary.staged, 2);

        let batch = fixture.service.staged_batch().await.expect("No batch");
        let chair = &batch.upserts[0];
        assert_eq!(chair.tier_overrides.len(), 1);
        assert_eq!(chair.tier_overrides[0].tier_id, vip.id);
        assert_eq!(chair.tier_overrides[0].price, 12.5);

        // Non-numeric and empty tier cells carry no override
        let desk = &batch.upserts[1];
        assert!(desk.tier_overrides.is_empty());
    }

    #[tokio::test]
    async fn test_non_finite_tier_cells_carry_no_override() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        fixture
            .tier_repository
            .create_tier(NewPriceTier {
                name: "VIP".to_string(),
            })
            .await
            .expect("Tier creation failed");

        let header = format!("{},VIP", HEADER);
        let content = format!(
            "{}\n,Chair,chair,true,,,,,Chair V,CH-1,50,NaN\n,Desk,desk,true,,,,,Desk V,DK-1,100,inf",
            header
        );
        fixture
            .service
            .stage_import(content.as_bytes())
            .await
            .expect("Stage failed");

        let batch = fixture.service.staged_batch().await.expect("No batch");
        for upsert in &batch.upserts {
            assert!(
                upsert.tier_overrides.is_empty(),
                "non-finite cell must not become an override for {}",
                upsert.name
            );
        }
    }

    #[tokio::test]
    async fn test_non_finite_variant_price_aborts() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        let rows = vec![row("", "Chair", "Chair Basic", "CH-1", "NaN")];
        let err = fixture
            .service
            .stage_import(&csv_of(&rows))
            .await
            .unwrap_err();

        match err {
            Error::Import(ImportError::InvalidRow { row, column }) => {
                assert_eq!(row, 1);
                assert_eq!(column, "productVariantPrice");
            }
            other => panic!("Unexpected error: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_apply_clears_stage_and_writes_catalog() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        let rows = vec![
            row("", "Chair", "Chair V", "CH-1", "50"),
            row("", "Desk", "Desk V", "DK-1", "200"),
        ];
        fixture
            .service
            .stage_import(&csv_of(&rows))
            .await
            .expect("Stage failed");

        let outcome = fixture.service.apply_staged().await.expect("Apply failed");
        assert_eq!(outcome.created, 2);
        assert_eq!(outcome.updated, 0);
        assert!(fixture.service.staged_batch().await.is_none());

        let prices = fixture
            .matrix_repository
            .get_variant_prices()
            .expect("Query failed");
        assert_eq!(prices.len(), 2);
    }

    #[tokio::test]
    async fn test_apply_without_stage_is_an_error() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        let err = fixture.service.apply_staged().await.unwrap_err();
        assert!(matches!(err, Error::Import(ImportError::NothingStaged)));
    }

    #[tokio::test]
    async fn test_failed_apply_retains_stage() {
        struct FailingCatalog;

        #[async_trait]
        impl ProductCatalogTrait for FailingCatalog {
            fn find_existing_product_ids(&self, _ids: &[String]) -> Result<HashSet<String>> {
                Ok(HashSet::new())
            }

            async fn batch_create_or_update(
                &self,
                _batch: Vec<ProductUpsert>,
            ) -> Result<ApplyOutcome> {
                Err(Error::Validation(ValidationError::InvalidInput(
                    "storage unavailable".to_string(),
                )))
            }
        }

        let (pool, _temp_dir) = create_test_pool();
        let tier_repository = Arc::new(TierRepository::new(pool.clone()));
        let service = ReconcileService::new(tier_repository, Arc::new(FailingCatalog));

        service
            .stage_import(&csv_of(&[row("", "Chair", "Chair V", "CH-1", "50")]))
            .await
            .expect("Stage failed");

        let err = service.apply_staged().await.unwrap_err();
        assert!(matches!(err, Error::Validation(_)));

        let batch = service.staged_batch().await;
        assert!(batch.is_some(), "Stage must survive a failed apply");

        service.discard_staged().await.expect("Discard failed");
        assert!(service.staged_batch().await.is_none());
    }

    #[tokio::test]
    async fn test_batch_staged_during_apply_survives() {
        use tokio::sync::Notify;

        struct PausingCatalog {
            started: Notify,
            resume: Notify,
        }

        #[async_trait]
        impl ProductCatalogTrait for PausingCatalog {
            fn find_existing_product_ids(&self, _ids: &[String]) -> Result<HashSet<String>> {
                Ok(HashSet::new())
            }

            async fn batch_create_or_update(
                &self,
                batch: Vec<ProductUpsert>,
            ) -> Result<ApplyOutcome> {
                self.started.notify_one();
                self.resume.notified().await;
                Ok(ApplyOutcome {
                    created: batch.len(),
                    updated: 0,
                })
            }
        }

        let (pool, _temp_dir) = create_test_pool();
        let tier_repository = Arc::new(TierRepository::new(pool.clone()));
        let catalog = Arc::new(PausingCatalog {
            started: Notify::new(),
            resume: Notify::new(),
        });
        let service = Arc::new(ReconcileService::new(tier_repository, catalog.clone()));

        service
            .stage_import(&csv_of(&[row("", "Chair", "Chair V", "CH-1", "50")]))
            .await
            .expect("Stage failed");

        let apply_service = service.clone();
        let apply = tokio::spawn(async move { apply_service.apply_staged().await });

        // Restage while the catalog write is in flight
        catalog.started.notified().await;
        service
            .stage_import(&csv_of(&[row("", "Desk", "Desk V", "DK-1", "200")]))
            .await
            .expect("Stage failed");
        catalog.resume.notify_one();

        let outcome = apply
            .await
            .expect("Apply task panicked")
            .expect("Apply failed");
        assert_eq!(outcome.created, 1);

        let batch = service
            .staged_batch()
            .await
            .expect("Batch staged mid-apply must survive the apply");
        assert_eq!(batch.upserts[0].name, "Desk");
    }

    #[tokio::test]
    async fn test_discard_without_stage_is_a_no_op() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        fixture
            .service
            .discard_staged()
            .await
            .expect("Discard must not fail");
    }

    #[tokio::test]
    async fn test_restaging_replaces_previous_batch() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        fixture
            .service
            .stage_import(&csv_of(&[row("", "Chair", "Chair V", "CH-1", "50")]))
            .await
            .expect("Stage failed");
        fixture
            .service
            .stage_import(&csv_of(&[row("", "Desk", "Desk V", "DK-1", "200")]))
            .await
            .expect("Stage failed");

        let batch = fixture.service.staged_batch().await.expect("No batch");
        assert_eq!(batch.upserts.len(), 1);
        assert_eq!(batch.upserts[0].name, "Desk");
    }

    #[tokio::test]
    async fn test_oversize_import_is_rejected() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        let rows: Vec<String> = (0..=MAX_IMPORT_ROWS)
            .map(|i| row("", &format!("Product {}", i), "", "", ""))
            .collect();
        let err = fixture
            .service
            .stage_import(&csv_of(&rows))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            Error::Import(ImportError::TooManyRows { .. })
        ));
    }

    #[tokio::test]
    async fn test_template_lists_fixed_columns_then_tiers() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        fixture
            .tier_repository
            .create_tier(NewPriceTier {
                name: "VIP".to_string(),
            })
            .await
            .expect("Tier creation failed");
        fixture
            .tier_repository
            .create_tier(NewPriceTier {
                name: "Wholesale".to_string(),
            })
            .await
            .expect("Tier creation failed");

        let template = fixture.service.export_template().expect("Template failed");
        let expected = format!("{},VIP,Wholesale\n", HEADER);
        assert_eq!(template, expected);
    }

    #[tokio::test]
    async fn test_asset_lists_and_flags_are_parsed() {
        let (pool, _temp_dir) = create_test_pool();
        let fixture = create_fixture(&pool);

        let content = format!(
            "{}\n,Chair,chair,TRUE,\"a1,a2\",Nice chair,f1,fa1,Chair V,CH-1,50\n,Desk,desk,no,,,,,Desk V,DK-1,100",
            HEADER
        );
        fixture
            .service
            .stage_import(content.as_bytes())
            .await
            .expect("Stage failed");

        let batch = fixture.service.staged_batch().await.expect("No batch");
        let chair = &batch.upserts[0];
        assert!(chair.enabled);
        assert_eq!(chair.asset_ids, vec!["a1", "a2"]);
        assert_eq!(chair.facet_value_ids, vec!["f1"]);
        assert_eq!(chair.featured_asset_id.as_deref(), Some("fa1"));
        assert_eq!(chair.description, "Nice chair");

        let desk = &batch.upserts[1];
        assert!(!desk.enabled);
        assert!(desk.asset_ids.is_empty());
        assert!(desk.featured_asset_id.is_none());
    }
}
