use thiserror::Error;

#[derive(Debug, Error)]
pub enum ImportError {
    #[error("Import file contains no data")]
    Empty,

    #[error("Required column '{0}' is missing from the header row")]
    MissingColumn(String),

    #[error("Row {row}: column '{column}' is missing or invalid")]
    InvalidRow { row: usize, column: String },

    #[error("Import has {rows} rows, exceeding the limit of {limit}")]
    TooManyRows { rows: usize, limit: usize },

    #[error("No import batch is staged")]
    NothingStaged,
}
