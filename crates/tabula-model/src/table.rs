//! The table data model.
//!
//! A [`Table`] owns a rectangular matrix of [`Value`] cells together with
//! layout flags (header row, footer row) and an accessor mapping that
//! names columns. Rows appended after the first must match its width;
//! header and footer participate in absolute indexing but are excluded
//! from "body" iteration and from [`Table::size`].

use std::cell::OnceCell;
use std::collections::{BTreeMap, HashMap};
use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::column::Column;
use crate::error::{Result, TableError};
use crate::row::{Row, RowMut};
use crate::specifier::ColumnSpecifier;
use crate::value::Value;

/// Construction options for [`Table`].
///
/// The header flag defaults to `true`: most tabular sources carry a
/// header row, and the flag must be switched off explicitly for
/// headerless data.
#[derive(Debug, Clone)]
pub struct TableOptions {
    pub name: String,
    pub has_headers: bool,
    pub has_footer: bool,
    pub accessors: Option<AccessorSpec>,
}

impl Default for TableOptions {
    fn default() -> Self {
        Self {
            name: String::new(),
            has_headers: true,
            has_footer: false,
            accessors: None,
        }
    }
}

/// Accessor assignment for a table's columns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub enum AccessorSpec {
    /// Positional names; `None` leaves the column unmapped.
    List(Vec<Option<String>>),
    /// Explicit name-to-column mapping.
    Map(BTreeMap<String, usize>),
}

impl AccessorSpec {
    /// Positional spec mapping every listed name in order, no gaps.
    pub fn names<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        AccessorSpec::List(names.into_iter().map(|n| Some(n.into())).collect())
    }
}

/// Header/body/footer decomposition for [`Table::from_parts`].
///
/// Layout flags are implied: a table built from parts has a header row
/// exactly when `header` is given, and a footer row exactly when
/// `footer` is given.
#[derive(Debug, Clone, Default)]
pub struct TableParts {
    pub header: Option<Vec<Value>>,
    pub body: Vec<Vec<Value>>,
    pub footer: Option<Vec<Value>>,
}

/// An owned, growable table of cell values.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Table {
    name: String,
    has_headers: bool,
    has_footer: bool,
    data: Vec<Vec<Value>>,
    accessor_columns: BTreeMap<String, usize>,
    column_accessors: BTreeMap<usize, String>,
    #[serde(skip)]
    header_index: OnceCell<HashMap<String, usize>>,
}

impl Table {
    /// Creates an empty table.
    pub fn new(options: TableOptions) -> Table {
        let mut table = Table {
            name: options.name,
            has_headers: options.has_headers,
            has_footer: options.has_footer,
            data: Vec::new(),
            accessor_columns: BTreeMap::new(),
            column_accessors: BTreeMap::new(),
            header_index: OnceCell::new(),
        };
        table.set_accessors(options.accessors);
        table
    }

    /// Creates a table seeded with `rows`.
    ///
    /// The first row establishes the width; any later row with a
    /// different width fails with [`TableError::InvalidColumnCount`].
    pub fn from_rows(rows: Vec<Vec<Value>>, options: TableOptions) -> Result<Table> {
        let mut table = Table::new(options);
        for row in rows {
            table.push(row)?;
        }
        Ok(table)
    }

    /// Creates a table from a header/body/footer decomposition.
    ///
    /// The layout flags in `options` are overridden by which parts are
    /// present, so a round trip through parts always reproduces the
    /// same layout.
    pub fn from_parts(parts: TableParts, options: TableOptions) -> Result<Table> {
        let TableParts {
            header,
            body,
            footer,
        } = parts;
        let mut options = options;
        options.has_headers = header.is_some();
        options.has_footer = footer.is_some();

        let mut table = Table::new(options);
        if let Some(row) = header {
            table.push(row)?;
        }
        for row in body {
            table.push(row)?;
        }
        if let Some(row) = footer {
            table.push(row)?;
        }
        Ok(table)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn set_name(&mut self, name: impl Into<String>) {
        self.name = name.into();
    }

    pub fn has_headers(&self) -> bool {
        self.has_headers
    }

    pub fn has_footer(&self) -> bool {
        self.has_footer
    }

    /// Appends a row, enforcing the width established by the first row.
    ///
    /// On rejection the table is left untouched.
    pub fn push(&mut self, row: Vec<Value>) -> Result<()> {
        if let Some(expected) = self.column_count() {
            if row.len() != expected {
                tracing::debug!(
                    row = self.data.len(),
                    expected,
                    actual = row.len(),
                    "Rejecting row with mismatched width"
                );
                return Err(TableError::invalid_column_count(
                    self.data.len(),
                    expected,
                    row.len(),
                ));
            }
        } else {
            // The first row may become the header row.
            self.header_index = OnceCell::new();
        }
        self.data.push(row);
        Ok(())
    }

    /// Number of body rows: all rows minus header and footer, never
    /// negative.
    pub fn size(&self) -> usize {
        self.body_range().len()
    }

    /// Total number of rows, header and footer included.
    pub fn row_count(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Width of the table, taken from the first row. `None` while the
    /// table has no rows.
    pub fn column_count(&self) -> Option<usize> {
        self.data.first().map(Vec::len)
    }

    /// Row by absolute index; the header row, when present, is row 0.
    pub fn row(&self, index: usize) -> Option<Row<'_>> {
        (index < self.data.len()).then(|| Row::new(self, index))
    }

    /// Row by body-relative index: 0 is the first row after the header.
    pub fn body_row(&self, index: usize) -> Option<Row<'_>> {
        self.row(index.checked_add(usize::from(self.has_headers))?)
    }

    pub fn row_mut(&mut self, index: usize) -> Option<RowMut<'_>> {
        (index < self.data.len()).then(move || RowMut::new(self, index))
    }

    /// Cell by absolute row index and column index.
    pub fn cell(&self, row: usize, column: usize) -> Option<&Value> {
        self.data.get(row).and_then(|cells| cells.get(column))
    }

    /// Replaces one cell.
    pub fn set_cell(&mut self, row: usize, column: usize, value: Value) -> Result<()> {
        let rows = self.data.len();
        let cells = self
            .data
            .get_mut(row)
            .ok_or(TableError::RowOutOfBounds { index: row, rows })?;
        let count = cells.len();
        let cell = cells
            .get_mut(column)
            .ok_or(TableError::ColumnOutOfBounds { index: column, count })?;
        *cell = value;
        if row == 0 {
            // Header text may have changed.
            self.header_index = OnceCell::new();
        }
        Ok(())
    }

    /// The header row, when the table has one and is non-empty.
    pub fn headers(&self) -> Option<Row<'_>> {
        (self.has_headers && !self.data.is_empty()).then(|| Row::new(self, 0))
    }

    /// The footer row. With a header row present, a single-row table has
    /// no footer: that row is the header.
    pub fn footer(&self) -> Option<Row<'_>> {
        if !self.has_footer || self.data.is_empty() {
            return None;
        }
        if self.has_headers && self.data.len() < 2 {
            return None;
        }
        Some(Row::new(self, self.data.len() - 1))
    }

    fn body_range(&self) -> Range<usize> {
        let len = self.data.len();
        let start = usize::from(self.has_headers).min(len);
        let end = len.saturating_sub(usize::from(self.has_footer)).max(start);
        start..end
    }

    /// Iterates all rows, header and footer included.
    pub fn rows(&self) -> impl Iterator<Item = Row<'_>> {
        (0..self.data.len()).map(move |index| Row::new(self, index))
    }

    /// Iterates body rows only.
    pub fn body(&self) -> impl Iterator<Item = Row<'_>> {
        self.body_range().map(move |index| Row::new(self, index))
    }

    /// Iterates the table's columns.
    pub fn columns(&self) -> impl Iterator<Item = Column<'_>> {
        (0..self.column_count().unwrap_or(0)).map(move |index| Column::new(self, index))
    }

    /// Column view by specifier.
    pub fn column(&self, spec: ColumnSpecifier<'_>) -> Result<Column<'_>> {
        let index = self.index_of(spec)?;
        Ok(Column::new(self, index))
    }

    /// Resolves a column specifier to a column index.
    pub fn index_of(&self, spec: ColumnSpecifier<'_>) -> Result<usize> {
        match spec {
            ColumnSpecifier::Index(index) => {
                let count = self.column_count().unwrap_or(0);
                if index < count {
                    Ok(index)
                } else {
                    Err(TableError::column_out_of_bounds(index, count))
                }
            }
            ColumnSpecifier::Accessor(name) => self
                .accessor_columns
                .get(name)
                .copied()
                .ok_or_else(|| TableError::no_such_accessor(name)),
            ColumnSpecifier::Header(name) => {
                if !self.has_headers {
                    return Err(TableError::NoHeaders);
                }
                self.header_position(name)
                    .ok_or_else(|| TableError::no_such_header(name))
            }
        }
    }

    /// Column position for a header cell. The header-to-position index
    /// is built on first use and kept until a mutation can change the
    /// header row. Only text cells participate.
    fn header_position(&self, name: &str) -> Option<usize> {
        let index = self.header_index.get_or_init(|| {
            let mut map = HashMap::new();
            if let Some(row) = self.data.first() {
                for (position, cell) in row.iter().enumerate() {
                    if let Value::Text(text) = cell {
                        map.insert(text.clone(), position);
                    }
                }
            }
            map
        });
        index.get(name).copied()
    }

    /// Replaces the accessor mapping. `None` clears it.
    ///
    /// Both directions are rebuilt; with duplicate names in a list the
    /// last occurrence wins, keeping the two maps inverse to each other.
    pub fn set_accessors(&mut self, accessors: Option<AccessorSpec>) {
        let forward: BTreeMap<String, usize> = match accessors {
            None => BTreeMap::new(),
            Some(AccessorSpec::List(names)) => {
                let mut map = BTreeMap::new();
                for (index, name) in names.into_iter().enumerate() {
                    if let Some(name) = name {
                        map.insert(name, index);
                    }
                }
                map
            }
            Some(AccessorSpec::Map(map)) => map,
        };
        self.column_accessors = forward
            .iter()
            .map(|(name, &index)| (index, name.clone()))
            .collect();
        self.accessor_columns = forward;
    }

    /// Derives accessors from the header row: text is lowercased and
    /// runs of non-word characters become underscores. Headers without
    /// any word character leave their column unmapped.
    pub fn accessors_from_headers(&mut self) -> Result<()> {
        let headers = self.headers().ok_or(TableError::NoHeaders)?;
        let names: Vec<Option<String>> = headers
            .values()
            .iter()
            .map(|cell| match cell {
                Value::Text(text) => accessorize(text),
                _ => None,
            })
            .collect();
        self.set_accessors(Some(AccessorSpec::List(names)));
        Ok(())
    }

    pub fn accessor_columns(&self) -> &BTreeMap<String, usize> {
        &self.accessor_columns
    }

    pub fn column_accessors(&self) -> &BTreeMap<usize, String> {
        &self.column_accessors
    }

    pub fn has_accessors(&self) -> bool {
        !self.accessor_columns.is_empty()
    }

    /// Accessor name mapped to the given column, if any.
    pub fn accessor_at(&self, index: usize) -> Option<&str> {
        self.column_accessors.get(&index).map(String::as_str)
    }

    /// Positional accessor list from column 0 through the highest mapped
    /// column. Unmapped positions are `None`.
    pub fn accessors(&self) -> Vec<Option<&str>> {
        match self.column_accessors.last_key_value() {
            None => Vec::new(),
            Some((&max, _)) => (0..=max).map(|index| self.accessor_at(index)).collect(),
        }
    }

    /// Borrow of the underlying row matrix.
    pub fn data(&self) -> &[Vec<Value>] {
        &self.data
    }

    /// Deep copy of all rows, header and footer included.
    pub fn to_rows(&self) -> Vec<Vec<Value>> {
        self.data.clone()
    }
}

/// Compares layout, accessors, and cell data; lookup caches are ignored.
impl PartialEq for Table {
    fn eq(&self, other: &Self) -> bool {
        self.name == other.name
            && self.has_headers == other.has_headers
            && self.has_footer == other.has_footer
            && self.accessor_columns == other.accessor_columns
            && self.data == other.data
    }
}

fn accessorize(header: &str) -> Option<String> {
    if !header.chars().any(|c| c.is_alphanumeric() || c == '_') {
        return None;
    }
    let mut name = String::with_capacity(header.len());
    let mut gap = false;
    for c in header.to_lowercase().chars() {
        if c.is_alphanumeric() || c == '_' {
            name.push(c);
            gap = false;
        } else if !gap {
            name.push('_');
            gap = true;
        }
    }
    Some(name)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn text_row(cells: &[&str]) -> Vec<Value> {
        cells.iter().map(|c| Value::from(*c)).collect()
    }

    #[test]
    fn test_push_enforces_width() {
        let mut table = Table::new(TableOptions::default());
        table.push(text_row(&["a", "b", "c"])).unwrap();
        let err = table.push(text_row(&["a", "b"])).unwrap_err();
        assert_eq!(err, TableError::invalid_column_count(1, 3, 2));
        assert_eq!(table.row_count(), 1);
    }

    #[test]
    fn test_accessorize() {
        assert_eq!(accessorize("Weird%Chars"), Some("weird_chars".into()));
        assert_eq!(accessorize("Age"), Some("age".into()));
        assert_eq!(accessorize(""), None);
        assert_eq!(accessorize("%!"), None);
        assert_eq!(accessorize("First Name!"), Some("first_name_".into()));
    }

    #[test]
    fn test_accessor_list_duplicates_keep_bijection() {
        let mut table = Table::new(TableOptions {
            has_headers: false,
            ..TableOptions::default()
        });
        table.set_accessors(Some(AccessorSpec::List(vec![
            Some("a".into()),
            Some("a".into()),
        ])));
        assert_eq!(table.accessor_columns().get("a"), Some(&1));
        assert_eq!(table.column_accessors().len(), 1);
    }

    #[test]
    fn test_header_index_invalidated_by_set_cell() {
        let mut table = Table::new(TableOptions::default());
        table.push(text_row(&["One", "Two"])).unwrap();
        table.push(text_row(&["1", "2"])).unwrap();
        assert_eq!(table.index_of(ColumnSpecifier::Header("Two")), Ok(1));

        table.set_cell(0, 1, Value::from("Renamed")).unwrap();
        assert_eq!(table.index_of(ColumnSpecifier::Header("Renamed")), Ok(1));
        assert_eq!(
            table.index_of(ColumnSpecifier::Header("Two")),
            Err(TableError::no_such_header("Two"))
        );
    }
}
