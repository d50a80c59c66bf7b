//! Fatal schema configuration errors.

use thiserror::Error;

use crate::processors::ColumnType;

/// Errors raised while declaring or freezing a schema.
///
/// These are programmer mistakes and fail fast at definition time, long
/// before any row is coerced.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum SchemaError {
    /// An option was set that the declared column type cannot use.
    #[error("option {option:?} does not apply to {column_type} column :{accessor}")]
    InapplicableOption {
        accessor: String,
        option: &'static str,
        column_type: ColumnType,
    },

    #[error("duplicate accessor :{accessor}")]
    DuplicateAccessor { accessor: String },

    #[error("source index {index} is already claimed by another column")]
    DuplicateSourceIndex { index: usize },

    #[error("target index {index} is already claimed by another column")]
    DuplicateTargetIndex { index: usize },

    /// Explicit target indices left a hole; the target index set must be
    /// exactly `0..N`.
    #[error("no column declared for target index {index}")]
    TargetIndexGap { index: usize },

    #[error("calculated column :{accessor} has no calculator")]
    MissingCalculator { accessor: String },

    /// A calculator was supplied both in the options and as an argument.
    #[error("column :{accessor} was given two calculators")]
    AmbiguousCalculator { accessor: String },

    #[error("schema {name:?} defines no columns")]
    EmptySchema { name: String },
}

/// Result type alias for schema construction.
pub type Result<T> = std::result::Result<T, SchemaError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_display() {
        let err = SchemaError::InapplicableOption {
            accessor: "age".into(),
            option: "pattern",
            column_type: ColumnType::Integer,
        };
        assert_eq!(
            format!("{err}"),
            "option \"pattern\" does not apply to integer column :age"
        );
    }
}
