//! CSV source adapter.
//!
//! Loads untyped CSV files into [`tabula_model::Table`]s, guessing the
//! delimiter when none is configured, and binds files to registered
//! schemas by name to produce coerced
//! [`tabula_schema::BoundTable`]s.

pub mod error;
pub mod reader;
pub mod registry;

pub use error::{IngestError, Result};
pub use reader::{LoadOptions, guess_delimiter, read_table, read_table_from_reader};
pub use registry::{LoadedTable, SchemaRegistry, read_bound_table, read_tables};
