//! Schema-bound tables.
//!
//! A [`BoundTable`] routes every appended raw row through its schema's
//! column definitions, keeping the uncoerced originals alongside the
//! coerced result and recording per-cell errors, per-row issues, and
//! table-wide issues. One invalid cell never blocks the rest of the row,
//! and one invalid row never blocks later rows.

use std::collections::BTreeMap;
use std::sync::Arc;

use tabula_model::{AccessorSpec, Result, Row, Table, TableError, TableOptions, Value};

use crate::builder::TableSchema;
use crate::cell_error::{CellError, Issues};
use crate::column::ColumnDef;

/// Construction options for [`BoundTable`].
///
/// Accessors always come from the schema; the table name falls back to
/// the schema name when unset.
#[derive(Debug, Clone)]
pub struct BoundOptions {
    pub name: Option<String>,
    pub has_headers: bool,
    pub has_footer: bool,
}

impl Default for BoundOptions {
    fn default() -> Self {
        BoundOptions {
            name: None,
            has_headers: true,
            has_footer: false,
        }
    }
}

/// Findings recorded for one appended row.
#[derive(Debug, Clone, Default, PartialEq)]
struct RowFindings {
    /// Accessor to cell errors; only non-empty lists are stored.
    column_errors: BTreeMap<String, Vec<CellError>>,
    issues: Issues,
}

impl RowFindings {
    fn is_valid(&self) -> bool {
        self.column_errors.is_empty() && self.issues.is_empty()
    }
}

/// A table whose rows are coerced through a [`TableSchema`].
pub struct BoundTable {
    schema: Arc<TableSchema>,
    table: Table,
    original: Table,
    row_findings: Vec<RowFindings>,
    table_issues: Issues,
}

impl BoundTable {
    /// Creates an empty bound table.
    pub fn new(schema: Arc<TableSchema>, options: BoundOptions) -> BoundTable {
        let name = options
            .name
            .unwrap_or_else(|| schema.name().to_string());
        let table = Table::new(TableOptions {
            name: name.clone(),
            has_headers: options.has_headers,
            has_footer: options.has_footer,
            accessors: Some(AccessorSpec::List(schema.accessors())),
        });
        let original = Table::new(TableOptions {
            name,
            has_headers: options.has_headers,
            has_footer: options.has_footer,
            accessors: None,
        });
        BoundTable {
            schema,
            table,
            original,
            row_findings: Vec::new(),
            table_issues: Issues::new(),
        }
    }

    /// Creates a bound table and appends every raw row, then runs the
    /// table validators.
    pub fn from_rows(
        schema: Arc<TableSchema>,
        raw_rows: Vec<Vec<Value>>,
        options: BoundOptions,
    ) -> Result<BoundTable> {
        let mut bound = BoundTable::new(schema, options);
        for row in raw_rows {
            bound.push(row)?;
        }
        bound.validate_table();
        Ok(bound)
    }

    /// Appends one raw input row.
    ///
    /// Sourced cells are mapped from their source index to their target
    /// index and coerced; calculated cells are then evaluated in target
    /// order against the row built so far. When the table expects
    /// headers and this is the first row, sourced cells pass through
    /// uncoerced and calculated cells take their declared header label.
    ///
    /// Width mismatches are rejected before any mutation: the first row
    /// must cover every sourced column, later rows must match the first.
    pub fn push(&mut self, raw: Vec<Value>) -> Result<()> {
        let row_index = self.original.row_count();
        match self.original.column_count() {
            Some(expected) => {
                if raw.len() != expected {
                    return Err(TableError::invalid_column_count(
                        row_index,
                        expected,
                        raw.len(),
                    ));
                }
            }
            None => {
                let needed = self.schema.source_width();
                if raw.len() < needed {
                    tracing::debug!(
                        table = self.table.name(),
                        needed,
                        actual = raw.len(),
                        "First raw row does not cover the schema's sourced columns"
                    );
                    return Err(TableError::invalid_column_count(0, needed, raw.len()));
                }
            }
        }

        let is_header = self.table.has_headers() && self.table.is_empty();
        let mut findings = RowFindings::default();
        let coerced = if is_header {
            self.header_cells(&raw)
        } else {
            self.coerce_cells(&raw, &mut findings)
        };

        self.table.push(coerced)?;
        self.original.push(raw)?;
        self.row_findings.push(findings);
        // Table-level findings are stale once a row arrives.
        self.table_issues = Issues::new();
        Ok(())
    }

    fn header_cells(&self, raw: &[Value]) -> Vec<Value> {
        self.schema
            .columns()
            .iter()
            .map(|column| match column.source_index() {
                Some(source) => raw.get(source).cloned().unwrap_or(Value::Nil),
                None => column
                    .header()
                    .map_or(Value::Nil, |label| Value::Text(label.to_string())),
            })
            .collect()
    }

    fn coerce_cells(&self, raw: &[Value], findings: &mut RowFindings) -> Vec<Value> {
        let mut cells: Vec<Value> = Vec::with_capacity(self.schema.len());
        for column in self.schema.columns() {
            let value = match column.source_index() {
                Some(source) => {
                    let raw_cell = raw.get(source).cloned().unwrap_or(Value::Nil);
                    let (value, errors) = column.coerce(raw_cell);
                    if !errors.is_empty() {
                        findings
                            .column_errors
                            .insert(column.accessor().to_string(), errors);
                    }
                    value
                }
                None => {
                    let snapshot = RowSnapshot::new(&self.schema, &cells);
                    column.calculate(&snapshot)
                }
            };
            cells.push(value);
        }

        let snapshot = RowSnapshot::new(&self.schema, &cells);
        for validator in self.schema.row_validators() {
            validator(&snapshot, &mut findings.issues);
        }
        cells
    }

    /// Runs the registered table validators over the current state,
    /// replacing any previous table-level findings.
    pub fn validate_table(&mut self) {
        let schema = Arc::clone(&self.schema);
        let mut issues = Issues::new();
        for validator in schema.table_validators() {
            validator(self, &mut issues);
        }
        self.table_issues = issues;
    }

    /// True when no table-level findings exist and every row is valid.
    pub fn is_valid(&self) -> bool {
        self.table_issues.is_empty() && self.row_findings.iter().all(RowFindings::is_valid)
    }

    pub fn schema(&self) -> &Arc<TableSchema> {
        &self.schema
    }

    /// The coerced table.
    pub fn table(&self) -> &Table {
        &self.table
    }

    /// The raw rows exactly as they were appended.
    pub fn original(&self) -> &Table {
        &self.original
    }

    /// Table-level validator findings.
    pub fn table_issues(&self) -> &Issues {
        &self.table_issues
    }

    /// Coerced row by absolute index.
    pub fn row(&self, index: usize) -> Option<CoercedRow<'_>> {
        (index < self.table.row_count()).then(|| CoercedRow { bound: self, index })
    }

    /// Iterates coerced body rows.
    pub fn body(&self) -> impl Iterator<Item = CoercedRow<'_>> {
        self.table
            .body()
            .map(|row| CoercedRow {
                bound: self,
                index: row.index(),
            })
    }

    pub fn size(&self) -> usize {
        self.table.size()
    }

    pub fn column_count(&self) -> Option<usize> {
        self.table.column_count()
    }

    pub fn headers(&self) -> Option<Row<'_>> {
        self.table.headers()
    }

    /// Every row's findings for one accessor, keyed by absolute row
    /// index.
    pub fn column_errors_for(&self, accessor: &str) -> BTreeMap<usize, &[CellError]> {
        self.row_findings
            .iter()
            .enumerate()
            .filter_map(|(index, findings)| {
                findings
                    .column_errors
                    .get(accessor)
                    .map(|errors| (index, errors.as_slice()))
            })
            .collect()
    }

    /// Total number of recorded findings: cell errors, row issues, and
    /// table issues.
    pub fn error_count(&self) -> usize {
        let row_errors: usize = self
            .row_findings
            .iter()
            .map(|findings| {
                findings
                    .column_errors
                    .values()
                    .map(Vec::len)
                    .sum::<usize>()
                    + findings.issues.len()
            })
            .sum();
        row_errors + self.table_issues.len()
    }
}

impl std::fmt::Debug for BoundTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BoundTable")
            .field("schema", &self.schema.name())
            .field("rows", &self.table.row_count())
            .field("error_count", &self.error_count())
            .finish()
    }
}

/// A coerced row together with its findings.
#[derive(Clone, Copy)]
pub struct CoercedRow<'a> {
    bound: &'a BoundTable,
    index: usize,
}

impl<'a> CoercedRow<'a> {
    pub fn index(&self) -> usize {
        self.index
    }

    fn row(&self) -> Row<'a> {
        self.bound
            .table
            .row(self.index)
            .expect("coerced row index is in range")
    }

    pub fn values(&self) -> &'a [Value] {
        self.row().values()
    }

    pub fn at(&self, index: usize) -> Option<&'a Value> {
        self.row().at(index)
    }

    /// Cell by specifier, resolved through the coerced table.
    pub fn get(&self, spec: tabula_model::ColumnSpecifier<'_>) -> Result<&'a Value> {
        self.row().get(spec)
    }

    /// The raw row as it was appended.
    pub fn original(&self) -> Row<'a> {
        self.bound
            .original
            .row(self.index)
            .expect("original row index is in range")
    }

    /// Cell errors keyed by accessor; only columns with findings appear.
    pub fn column_errors(&self) -> &'a BTreeMap<String, Vec<CellError>> {
        &self.bound.row_findings[self.index].column_errors
    }

    /// Row-level validator findings.
    pub fn row_issues(&self) -> &'a Issues {
        &self.bound.row_findings[self.index].issues
    }

    pub fn is_valid(&self) -> bool {
        self.bound.row_findings[self.index].is_valid()
    }

    /// Renders every cell through its column's presenter for `medium`.
    /// Header rows render their raw cells.
    pub fn present(&self, medium: &str) -> Vec<Value> {
        let is_header = self.bound.table.has_headers() && self.index == 0;
        self.values()
            .iter()
            .zip(self.bound.schema.columns())
            .map(|(value, column)| {
                if is_header {
                    value.clone()
                } else {
                    column.present(value, medium)
                }
            })
            .collect()
    }
}

impl std::fmt::Debug for CoercedRow<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoercedRow")
            .field("index", &self.index)
            .field("values", &self.values())
            .field("is_valid", &self.is_valid())
            .finish()
    }
}

/// Read-only view of a row under construction, handed to calculators and
/// row validators.
///
/// During calculated-column evaluation only cells at lower target
/// indices exist yet; `get` and `at` return `None` past that point.
pub struct RowSnapshot<'a> {
    schema: &'a TableSchema,
    cells: &'a [Value],
}

impl<'a> RowSnapshot<'a> {
    pub(crate) fn new(schema: &'a TableSchema, cells: &'a [Value]) -> RowSnapshot<'a> {
        RowSnapshot { schema, cells }
    }

    /// Cell by accessor name.
    pub fn get(&self, accessor: &str) -> Option<&'a Value> {
        let column = self.schema.column_by_accessor(accessor)?;
        self.cells.get(column.target_index())
    }

    /// Cell by target index.
    pub fn at(&self, target_index: usize) -> Option<&'a Value> {
        self.cells.get(target_index)
    }

    pub fn values(&self) -> &'a [Value] {
        self.cells
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }
}
