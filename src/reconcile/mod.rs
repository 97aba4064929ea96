pub(crate) mod csv_parser;
pub(crate) mod reconcile_errors;
pub(crate) mod reconcile_model;
pub(crate) mod reconcile_service;
pub(crate) mod reconcile_traits;

pub use csv_parser::{parse_table, ParsedTable};
pub use reconcile_errors::ImportError;
pub use reconcile_model::{CatalogRow, StageSummary, StagedBatch};
pub use reconcile_service::ReconcileService;
pub use reconcile_traits::ReconcileServiceTrait;
