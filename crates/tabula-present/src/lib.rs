//! Presenter adapters.
//!
//! The [`Present`] trait is the seam between the table core and output
//! backends: a presenter source exposes its backing [`Table`] and a
//! per-cell render hook keyed by [`Medium`]. Plain tables render their
//! cells as-is; [`BoundTable`]s route body cells through their columns'
//! present hooks.

pub mod csv;
pub mod html;

use std::fmt;
use std::str::FromStr;

use tabula_model::{Table, Value};
use tabula_schema::BoundTable;

pub use crate::csv::{to_csv, write_csv};
pub use crate::html::{to_html, write_html};

/// An output medium identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Medium {
    Csv,
    /// Semicolon-separated, CRLF-terminated CSV as Excel expects it.
    ExcelCsv,
    Tab,
    Html,
}

impl Medium {
    /// The identifier handed to per-column present hooks.
    pub fn id(self) -> &'static str {
        match self {
            Medium::Csv => "csv",
            Medium::ExcelCsv => "excel_csv",
            Medium::Tab => "tab",
            Medium::Html => "html",
        }
    }
}

impl fmt::Display for Medium {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.id())
    }
}

impl FromStr for Medium {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "csv" => Ok(Medium::Csv),
            "excel_csv" => Ok(Medium::ExcelCsv),
            "tab" => Ok(Medium::Tab),
            "html" => Ok(Medium::Html),
            other => Err(format!("unknown medium {other:?}")),
        }
    }
}

/// A source of presentable tabular data.
pub trait Present {
    /// The table whose rows and layout drive the output.
    fn table(&self) -> &Table;

    /// Renders one cell for the given medium. The default renders the
    /// stored value unchanged.
    fn render_cell(&self, row: usize, column: usize, medium: Medium) -> Value {
        let _ = medium;
        self.table()
            .cell(row, column)
            .cloned()
            .unwrap_or(Value::Nil)
    }
}

impl Present for Table {
    fn table(&self) -> &Table {
        self
    }
}

impl Present for BoundTable {
    fn table(&self) -> &Table {
        BoundTable::table(self)
    }

    /// Body cells go through their column's present hook; header and
    /// footer rows render raw.
    fn render_cell(&self, row: usize, column: usize, medium: Medium) -> Value {
        let table = BoundTable::table(self);
        let value = table.cell(row, column).cloned().unwrap_or(Value::Nil);
        let is_header = table.has_headers() && row == 0;
        let is_footer = table.footer().is_some_and(|footer| footer.index() == row);
        if is_header || is_footer {
            return value;
        }
        match self.schema().column(column) {
            Some(def) => def.present(&value, medium.id()),
            None => value,
        }
    }
}
