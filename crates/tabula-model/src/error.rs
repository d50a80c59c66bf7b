//! Error types for table operations.

use thiserror::Error;

/// Errors raised by table construction, mutation, and lookup.
///
/// These are the fatal failures: programming or structural mistakes that
/// reject an operation outright. Data-quality findings discovered during
/// coercion are accumulated separately and never surface here.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TableError {
    /// A row's width does not match the width established by the first row.
    #[error("invalid column count in row {row} ({expected} expected, but has {actual})")]
    InvalidColumnCount {
        row: usize,
        expected: usize,
        actual: usize,
    },

    /// No column carries the requested accessor.
    #[error("no column with accessor :{accessor}")]
    NoSuchAccessor { accessor: String },

    /// No header cell matches the requested header name.
    #[error("no column with header {header:?}")]
    NoSuchHeader { header: String },

    /// Header lookup on a table without a header row.
    #[error("table has no headers")]
    NoHeaders,

    /// Column index past the table width.
    #[error("column index {index} out of bounds ({count} columns)")]
    ColumnOutOfBounds { index: usize, count: usize },

    /// Absolute row index past the data.
    #[error("row index {index} out of bounds ({rows} rows)")]
    RowOutOfBounds { index: usize, rows: usize },
}

/// Result type alias for table operations.
pub type Result<T> = std::result::Result<T, TableError>;

impl TableError {
    /// Create an InvalidColumnCount error.
    pub fn invalid_column_count(row: usize, expected: usize, actual: usize) -> Self {
        Self::InvalidColumnCount {
            row,
            expected,
            actual,
        }
    }

    /// Create a NoSuchAccessor error.
    pub fn no_such_accessor(accessor: impl Into<String>) -> Self {
        Self::NoSuchAccessor {
            accessor: accessor.into(),
        }
    }

    /// Create a NoSuchHeader error.
    pub fn no_such_header(header: impl Into<String>) -> Self {
        Self::NoSuchHeader {
            header: header.into(),
        }
    }

    /// Create a ColumnOutOfBounds error.
    pub fn column_out_of_bounds(index: usize, count: usize) -> Self {
        Self::ColumnOutOfBounds { index, count }
    }

    /// Create a RowOutOfBounds error.
    pub fn row_out_of_bounds(index: usize, rows: usize) -> Self {
        Self::RowOutOfBounds { index, rows }
    }
}
