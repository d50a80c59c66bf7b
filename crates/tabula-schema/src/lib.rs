//! Column schemas and the coercion/validation engine.
//!
//! A [`TableSchema`] is an ordered set of typed [`ColumnDef`]s built
//! through [`SchemaBuilder`]. Binding a schema to raw rows yields a
//! [`BoundTable`]: every appended row is coerced column by column, with
//! data-quality findings accumulated as [`CellError`]s and validator
//! [`Issues`] instead of being raised. Only configuration mistakes fail
//! hard, as [`SchemaError`].

pub mod bound;
pub mod builder;
pub mod cell_error;
pub mod column;
pub mod error;
pub mod processors;

pub use bound::{BoundOptions, BoundTable, CoercedRow, RowSnapshot};
pub use builder::{RowValidateFn, SchemaBuilder, TableSchema, TableValidateFn};
pub use cell_error::{CellError, Issue, Issues};
pub use column::{
    AdaptFn, CalculateFn, ColumnDef, ColumnOptions, PreValidateFn, PresentFn, ValidateFn,
};
pub use error::SchemaError;
pub use processors::{BooleanRules, ColumnType, FloatRules, IntegerRules, Processor, StringRules};
