//! Column views.

use crate::table::Table;
use crate::value::Value;

/// A borrowed view of one table column.
#[derive(Debug, Clone, Copy)]
pub struct Column<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Column<'a> {
    pub(crate) fn new(table: &'a Table, index: usize) -> Self {
        Self { table, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// This column's header cell, when the table has a header row.
    pub fn header(&self) -> Option<&'a Value> {
        self.table.headers().and_then(|row| row.at(self.index))
    }

    /// Accessor mapped to this column, if any.
    pub fn accessor(&self) -> Option<&'a str> {
        self.table.accessor_at(self.index)
    }

    /// Cell by body-relative row index.
    pub fn get(&self, index: usize) -> Option<&'a Value> {
        self.table.body_row(index).and_then(|row| row.at(self.index))
    }

    /// Iterates the body cells of this column.
    pub fn iter(self) -> impl Iterator<Item = &'a Value> {
        let index = self.index;
        self.table.body().filter_map(move |row| row.at(index))
    }

    /// Collects the column's cells, optionally including the header and
    /// footer cells.
    pub fn to_vec(&self, include_header: bool, include_footer: bool) -> Vec<&'a Value> {
        let mut cells = Vec::new();
        if include_header {
            if let Some(value) = self.header() {
                cells.push(value);
            }
        }
        cells.extend(self.iter());
        if include_footer {
            if let Some(value) = self.table.footer().and_then(|row| row.at(self.index)) {
                cells.push(value);
            }
        }
        cells
    }
}
