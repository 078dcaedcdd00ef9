//! Error types for the dataset store

use crate::table::TableError;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while reading or replacing the working file
#[derive(Debug, Error)]
pub enum StoreError {
    /// Uploaded content could not be decoded or parsed as a table
    #[error("{0}")]
    BadInput(String),

    /// The working file (or the bundled default) does not exist
    #[error("dataset file not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The working file exists but is not a well-formed table
    #[error("dataset file is malformed: {0}")]
    Parse(#[from] TableError),

    /// The working file is not valid UTF-8
    #[error("dataset file is not valid utf-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),

    /// Reading or writing the file failed
    #[error("dataset io failed: {0}")]
    Io(#[from] std::io::Error),
}
