//! Accumulated coercion findings.
//!
//! Cell errors are data, not control flow: coercion records them and keeps
//! going, so one bad cell never blocks the rest of a row. Fatal
//! configuration mistakes live in [`crate::SchemaError`] instead.

use std::fmt;

use serde::{Deserialize, Serialize};
use tabula_model::Value;

/// One finding recorded while coercing a single cell.
///
/// Each variant corresponds to one error code and carries the structured
/// details for that code, so callers can render or localize findings
/// without parsing message strings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "code", rename_all = "snake_case")]
pub enum CellError {
    /// The raw value was rejected by a pre-validator or is not something
    /// the column's processor can work with.
    InvalidInput {
        value: Value,
        /// The tokens a boolean column would have accepted.
        #[serde(skip_serializing_if = "Option::is_none")]
        acceptable: Option<Vec<Value>>,
    },
    TooShort {
        min_length: usize,
        actual: usize,
    },
    TooLong {
        max_length: usize,
        actual: usize,
    },
    InvalidFormat {
        pattern: String,
    },
    NotAnInteger {
        value: String,
    },
    /// A numeric value was rounded to an integer and the rounding delta
    /// exceeded machine epsilon.
    NotAnIntegralNumber {
        rounded: i64,
        unrounded: f64,
        difference: f64,
        absolute_difference: f64,
    },
    TooSmall {
        min: Value,
        actual: Value,
    },
    TooBig {
        max: Value,
        actual: Value,
    },
    /// A date column received a value with a non-midnight time component.
    NotADate {
        value: Value,
    },
    /// The user validator rejected the final value.
    InvalidValue,
    /// The final value is nil but the column disallows nil.
    InvalidNilValue,
    /// The adaptor hook failed.
    Exception {
        message: String,
    },
}

impl CellError {
    /// Plain invalid-input finding, no acceptable-token list.
    pub fn invalid_input(value: Value) -> Self {
        CellError::InvalidInput {
            value,
            acceptable: None,
        }
    }

    /// The snake_case error code.
    pub fn code(&self) -> &'static str {
        match self {
            CellError::InvalidInput { .. } => "invalid_input",
            CellError::TooShort { .. } => "too_short",
            CellError::TooLong { .. } => "too_long",
            CellError::InvalidFormat { .. } => "invalid_format",
            CellError::NotAnInteger { .. } => "not_an_integer",
            CellError::NotAnIntegralNumber { .. } => "not_an_integral_number",
            CellError::TooSmall { .. } => "too_small",
            CellError::TooBig { .. } => "too_big",
            CellError::NotADate { .. } => "not_a_date",
            CellError::InvalidValue => "invalid_value",
            CellError::InvalidNilValue => "invalid_nil_value",
            CellError::Exception { .. } => "exception",
        }
    }
}

impl fmt::Display for CellError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellError::InvalidInput {
                value,
                acceptable: Some(tokens),
            } => {
                let tokens: Vec<String> = tokens.iter().map(ToString::to_string).collect();
                write!(
                    f,
                    "invalid_input: {value} (acceptable: {})",
                    tokens.join(", ")
                )
            }
            CellError::InvalidInput { value, .. } => write!(f, "invalid_input: {value}"),
            CellError::TooShort { min_length, actual } => {
                write!(f, "too_short: {actual} < {min_length}")
            }
            CellError::TooLong { max_length, actual } => {
                write!(f, "too_long: {actual} > {max_length}")
            }
            CellError::InvalidFormat { pattern } => {
                write!(f, "invalid_format: does not match /{pattern}/")
            }
            CellError::NotAnInteger { value } => write!(f, "not_an_integer: {value:?}"),
            CellError::NotAnIntegralNumber {
                unrounded, rounded, ..
            } => write!(f, "not_an_integral_number: {unrounded} rounded to {rounded}"),
            CellError::TooSmall { min, actual } => write!(f, "too_small: {actual} < {min}"),
            CellError::TooBig { max, actual } => write!(f, "too_big: {actual} > {max}"),
            CellError::NotADate { value } => write!(f, "not_a_date: {value}"),
            CellError::InvalidValue => f.write_str("invalid_value"),
            CellError::InvalidNilValue => f.write_str("invalid_nil_value"),
            CellError::Exception { message } => write!(f, "exception: {message}"),
        }
    }
}

/// A named finding from a row- or table-level validator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Issue {
    /// Validator-chosen name, e.g. `"end_before_start"`.
    pub name: String,
    /// Positional context for rendering the finding.
    pub params: Vec<Value>,
}

/// Ordered collector handed to row and table validators.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Issues {
    issues: Vec<Issue>,
}

impl Issues {
    pub fn new() -> Self {
        Issues::default()
    }

    /// Records a finding without parameters.
    pub fn add(&mut self, name: impl Into<String>) {
        self.add_with(name, Vec::new());
    }

    /// Records a finding with positional parameters.
    pub fn add_with(&mut self, name: impl Into<String>, params: Vec<Value>) {
        self.issues.push(Issue {
            name: name.into(),
            params,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Issue> {
        self.issues.iter()
    }
}

impl<'a> IntoIterator for &'a Issues {
    type Item = &'a Issue;
    type IntoIter = std::slice::Iter<'a, Issue>;

    fn into_iter(self) -> Self::IntoIter {
        self.issues.iter()
    }
}
