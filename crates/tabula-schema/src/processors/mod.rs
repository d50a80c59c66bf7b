//! Per-type coercion processors.
//!
//! One processor exists per scalar column type; each is built once from
//! the column's options and turns a single adapted value into the target
//! type, appending findings to the caller's error list. Processors never
//! fail hard: every path yields a value, `Nil` when nothing sensible can
//! be produced.

mod binary;
mod boolean;
mod float;
mod integer;
mod string;
mod temporal;

use std::fmt;

use serde::{Deserialize, Serialize};
use tabula_model::Value;

use crate::cell_error::CellError;

pub use boolean::BooleanRules;
pub use float::FloatRules;
pub use integer::IntegerRules;
pub use string::StringRules;

/// Declared type of a column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ColumnType {
    String,
    Integer,
    Float,
    Date,
    DateTime,
    Boolean,
    Binary,
    /// No source position; the value is derived from the rest of the row.
    Calculated,
}

impl ColumnType {
    pub fn as_str(self) -> &'static str {
        match self {
            ColumnType::String => "string",
            ColumnType::Integer => "integer",
            ColumnType::Float => "float",
            ColumnType::Date => "date",
            ColumnType::DateTime => "datetime",
            ColumnType::Boolean => "boolean",
            ColumnType::Binary => "binary",
            ColumnType::Calculated => "calculated",
        }
    }
}

impl fmt::Display for ColumnType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A type processor with its frozen configuration.
///
/// A fixed enumeration rather than trait objects: the set of column types
/// is closed, and a single `match` keeps dispatch explicit.
#[derive(Debug, Clone)]
pub enum Processor {
    String(StringRules),
    Integer(IntegerRules),
    Float(FloatRules),
    Date,
    DateTime,
    Boolean(BooleanRules),
    Binary,
}

impl Processor {
    /// Coerces one adapted value into the processor's target type.
    ///
    /// Findings are appended to `errors`; the returned value is the best
    /// available result even when findings were recorded (a rounded
    /// integer, a truncated date).
    pub fn process(&self, value: Value, errors: &mut Vec<CellError>) -> Value {
        match self {
            Processor::String(rules) => string::process(rules, value, errors),
            Processor::Integer(rules) => integer::process(rules, value, errors),
            Processor::Float(rules) => float::process(rules, value, errors),
            Processor::Date => temporal::process_date(value, errors),
            Processor::DateTime => temporal::process_datetime(value, errors),
            Processor::Boolean(rules) => boolean::process(rules, value, errors),
            Processor::Binary => binary::process(value, errors),
        }
    }
}
