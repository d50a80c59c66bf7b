pub mod column;
pub mod error;
pub mod row;
pub mod specifier;
pub mod table;
pub mod value;

pub use column::Column;
pub use error::{Result, TableError};
pub use row::{Row, RowMut};
pub use specifier::ColumnSpecifier;
pub use table::{AccessorSpec, Table, TableOptions, TableParts};
pub use value::Value;
