//! Row views.

use std::collections::BTreeMap;

use crate::error::{Result, TableError};
use crate::specifier::ColumnSpecifier;
use crate::table::Table;
use crate::value::Value;

/// A borrowed view of one table row.
///
/// Rows do not own their cells; they resolve accessor and header
/// specifiers through the table they belong to.
#[derive(Debug, Clone, Copy)]
pub struct Row<'a> {
    table: &'a Table,
    index: usize,
}

impl<'a> Row<'a> {
    pub(crate) fn new(table: &'a Table, index: usize) -> Self {
        Self { table, index }
    }

    /// Absolute row index; the header row, when present, is 0.
    pub fn index(&self) -> usize {
        self.index
    }

    pub fn table(&self) -> &'a Table {
        self.table
    }

    /// The row's cells.
    pub fn values(&self) -> &'a [Value] {
        self.table.data()[self.index].as_slice()
    }

    pub fn len(&self) -> usize {
        self.values().len()
    }

    pub fn is_empty(&self) -> bool {
        self.values().is_empty()
    }

    /// Cell by column index.
    pub fn at(&self, index: usize) -> Option<&'a Value> {
        self.values().get(index)
    }

    /// Cell by specifier; accessor and header lookups resolve through
    /// the table.
    pub fn get(&self, spec: ColumnSpecifier<'_>) -> Result<&'a Value> {
        let column = self.table.index_of(spec)?;
        self.at(column)
            .ok_or_else(|| TableError::column_out_of_bounds(column, self.len()))
    }

    pub fn iter(&self) -> std::slice::Iter<'a, Value> {
        self.values().iter()
    }

    pub fn to_vec(&self) -> Vec<Value> {
        self.values().to_vec()
    }

    /// Accessor-to-value map over the mapped columns only.
    pub fn to_map(&self) -> BTreeMap<&'a str, &'a Value> {
        self.table
            .column_accessors()
            .iter()
            .filter_map(|(&index, name)| self.at(index).map(|value| (name.as_str(), value)))
            .collect()
    }
}

impl<'a> IntoIterator for Row<'a> {
    type Item = &'a Value;
    type IntoIter = std::slice::Iter<'a, Value>;

    fn into_iter(self) -> Self::IntoIter {
        self.values().iter()
    }
}

impl PartialEq for Row<'_> {
    fn eq(&self, other: &Self) -> bool {
        self.values() == other.values()
    }
}

/// A mutable view of one table row.
#[derive(Debug)]
pub struct RowMut<'a> {
    table: &'a mut Table,
    index: usize,
}

impl<'a> RowMut<'a> {
    pub(crate) fn new(table: &'a mut Table, index: usize) -> Self {
        Self { table, index }
    }

    pub fn index(&self) -> usize {
        self.index
    }

    /// Read-only view of the same row.
    pub fn as_row(&self) -> Row<'_> {
        Row::new(self.table, self.index)
    }

    /// Replaces one cell. Routes through the table so header lookup
    /// caches stay coherent.
    pub fn set(&mut self, spec: ColumnSpecifier<'_>, value: Value) -> Result<()> {
        let column = self.table.index_of(spec)?;
        self.table.set_cell(self.index, column, value)
    }
}
