//! Error types for table operations

use arrow::datatypes::DataType;
use arrow::error::ArrowError;
use thiserror::Error;

/// Errors raised while parsing, filtering or encoding a table
#[derive(Debug, Error)]
pub enum TableError {
    /// A column referenced by name is not part of the table
    #[error("column '{0}' not found")]
    ColumnNotFound(String),

    /// A numeric predicate was applied to a column holding non-numeric data
    #[error("column '{column}' is not numeric (found {data_type})")]
    NonNumericColumn { column: String, data_type: DataType },

    /// The input had no header fields at all
    #[error("no columns to parse from input")]
    EmptyHeader,

    /// CSV decoding, casting or filtering failed inside arrow
    #[error(transparent)]
    Arrow(#[from] ArrowError),

    /// Encoded rows could not be turned into JSON records
    #[error("failed to encode records: {0}")]
    Json(#[from] serde_json::Error),
}
