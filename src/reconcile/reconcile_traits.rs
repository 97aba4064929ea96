use async_trait::async_trait;

use crate::errors::Result;
use crate::products::ApplyOutcome;

use super::reconcile_model::{StageSummary, StagedBatch};

/// Stages, applies, and discards bulk catalog imports.
#[async_trait]
pub trait ReconcileServiceTrait: Send + Sync {
    /// Parses and validates an import file, holding the resulting batch
    /// in memory. Replaces any previously staged batch.
    async fn stage_import(&self, content: &[u8]) -> Result<StageSummary>;

    /// Applies the staged batch to the catalog. The stage is cleared
    /// only after the whole batch succeeds, so a failed apply can be
    /// retried or discarded.
    async fn apply_staged(&self) -> Result<ApplyOutcome>;

    /// Drops the staged batch without touching the catalog.
    async fn discard_staged(&self) -> Result<()>;

    /// Returns a copy of the currently staged batch, if any.
    async fn staged_batch(&self) -> Option<StagedBatch>;

    /// Renders an empty import template: the fixed columns followed by
    /// one column per price tier, in tier listing order.
    fn export_template(&self) -> Result<String>;
}
