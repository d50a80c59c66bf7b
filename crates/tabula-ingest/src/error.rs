//! Error types for CSV ingestion.

use std::path::PathBuf;

use tabula_model::TableError;
use thiserror::Error;

/// Errors raised while loading tables from the filesystem.
#[derive(Debug, Error)]
pub enum IngestError {
    #[error("file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("directory not found: {path}")]
    DirectoryNotFound { path: PathBuf },

    #[error("failed to read directory {path}: {source}")]
    DirectoryRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse csv {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    /// A structural table error surfaced while appending loaded rows.
    #[error(transparent)]
    Table(#[from] TableError),

    /// No schema is registered under the requested name.
    #[error("no schema registered for table {name:?}")]
    UnknownTable { name: String },
}

/// Result type alias for ingestion.
pub type Result<T> = std::result::Result<T, IngestError>;
