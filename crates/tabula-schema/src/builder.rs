//! Declarative schema construction.
//!
//! A [`SchemaBuilder`] accumulates column definitions through chained
//! calls and freezes them into an immutable [`TableSchema`]. Source and
//! target indices auto-increment independently, each skipping indices
//! another column claimed explicitly; `skip_columns` advances only the
//! source cursor, which is how intentionally-ignored input columns are
//! modeled.

use std::collections::BTreeSet;
use std::sync::Arc;

use crate::bound::{BoundTable, RowSnapshot};
use crate::cell_error::Issues;
use crate::column::{CalculateFn, ColumnDef, ColumnOptions, verify_options};
use crate::error::{Result, SchemaError};
use crate::processors::ColumnType;

/// Validates one fully coerced row.
pub type RowValidateFn = Arc<dyn Fn(&RowSnapshot<'_>, &mut Issues) + Send + Sync>;
/// Validates a whole bound table.
pub type TableValidateFn = Arc<dyn Fn(&BoundTable, &mut Issues) + Send + Sync>;

/// Builder for [`TableSchema`].
pub struct SchemaBuilder {
    name: String,
    defaults: ColumnOptions,
    columns: Vec<ColumnDef>,
    row_validators: Vec<RowValidateFn>,
    table_validators: Vec<TableValidateFn>,
    accessors: BTreeSet<String>,
    claimed_sources: BTreeSet<usize>,
    claimed_targets: BTreeSet<usize>,
    next_source: usize,
    next_target: usize,
}

impl SchemaBuilder {
    /// Starts a schema named `name`; the name is the identifier external
    /// loaders match sheet or file names against.
    pub fn new(name: impl Into<String>) -> SchemaBuilder {
        SchemaBuilder {
            name: name.into(),
            defaults: ColumnOptions::default(),
            columns: Vec::new(),
            row_validators: Vec::new(),
            table_validators: Vec::new(),
            accessors: BTreeSet::new(),
            claimed_sources: BTreeSet::new(),
            claimed_targets: BTreeSet::new(),
            next_source: 0,
            next_target: 0,
        }
    }

    /// Options merged beneath every later column declaration. Per-column
    /// options win field by field.
    pub fn column_defaults(mut self, defaults: ColumnOptions) -> Self {
        self.defaults = defaults;
        self
    }

    /// Declares one column of the given type.
    pub fn column(
        mut self,
        column_type: ColumnType,
        accessor: impl Into<String>,
        options: ColumnOptions,
    ) -> Result<Self> {
        let accessor = accessor.into();
        let options = options.merged(&self.defaults);
        verify_options(column_type, &accessor, &options)?;
        if self.accessors.contains(&accessor) {
            return Err(SchemaError::DuplicateAccessor { accessor });
        }
        if column_type == ColumnType::Calculated && options.calculator.is_none() {
            return Err(SchemaError::MissingCalculator { accessor });
        }

        let source_index = if column_type == ColumnType::Calculated {
            None
        } else {
            Some(self.take_source_index(options.source_index)?)
        };
        let target_index = self.take_target_index(options.target_index)?;

        self.accessors.insert(accessor.clone());
        self.columns.push(ColumnDef::new(
            column_type,
            accessor,
            options,
            source_index,
            target_index,
        ));
        Ok(self)
    }

    pub fn string(self, accessor: impl Into<String>, options: ColumnOptions) -> Result<Self> {
        self.column(ColumnType::String, accessor, options)
    }

    pub fn integer(self, accessor: impl Into<String>, options: ColumnOptions) -> Result<Self> {
        self.column(ColumnType::Integer, accessor, options)
    }

    pub fn float(self, accessor: impl Into<String>, options: ColumnOptions) -> Result<Self> {
        self.column(ColumnType::Float, accessor, options)
    }

    pub fn date(self, accessor: impl Into<String>, options: ColumnOptions) -> Result<Self> {
        self.column(ColumnType::Date, accessor, options)
    }

    pub fn datetime(self, accessor: impl Into<String>, options: ColumnOptions) -> Result<Self> {
        self.column(ColumnType::DateTime, accessor, options)
    }

    pub fn boolean(self, accessor: impl Into<String>, options: ColumnOptions) -> Result<Self> {
        self.column(ColumnType::Boolean, accessor, options)
    }

    pub fn binary(self, accessor: impl Into<String>, options: ColumnOptions) -> Result<Self> {
        self.column(ColumnType::Binary, accessor, options)
    }

    /// Declares a calculated column whose calculator arrives in the
    /// options.
    pub fn calculated(self, accessor: impl Into<String>, options: ColumnOptions) -> Result<Self> {
        self.column(ColumnType::Calculated, accessor, options)
    }

    /// Declares a calculated column with the calculator as an argument;
    /// supplying one in the options as well is ambiguous and rejected.
    pub fn calculated_with(
        self,
        accessor: impl Into<String>,
        mut options: ColumnOptions,
        calculator: CalculateFn,
    ) -> Result<Self> {
        let accessor = accessor.into();
        if options.calculator.is_some() {
            return Err(SchemaError::AmbiguousCalculator { accessor });
        }
        options.calculator = Some(calculator);
        self.column(ColumnType::Calculated, accessor, options)
    }

    /// Skips one input column.
    pub fn skip_column(self) -> Self {
        self.skip_columns(1)
    }

    /// Advances the source auto-increment cursor by `n` without consuming
    /// a target index.
    pub fn skip_columns(mut self, n: usize) -> Self {
        self.next_source += n;
        self
    }

    /// Registers a validator invoked once per fully coerced body row.
    pub fn validate_row(mut self, validator: RowValidateFn) -> Self {
        self.row_validators.push(validator);
        self
    }

    /// Registers a validator invoked over the whole bound table.
    pub fn validate_table(mut self, validator: TableValidateFn) -> Self {
        self.table_validators.push(validator);
        self
    }

    /// Freezes the schema: columns are sorted by target index and the
    /// target index set must be dense.
    pub fn build(self) -> Result<TableSchema> {
        if self.columns.is_empty() {
            return Err(SchemaError::EmptySchema { name: self.name });
        }
        let mut columns = self.columns;
        columns.sort_by_key(ColumnDef::target_index);
        for (index, column) in columns.iter().enumerate() {
            if column.target_index() != index {
                return Err(SchemaError::TargetIndexGap { index });
            }
        }
        tracing::debug!(
            name = %self.name,
            columns = columns.len(),
            "Froze table schema"
        );
        Ok(TableSchema {
            name: self.name,
            columns,
            row_validators: self.row_validators,
            table_validators: self.table_validators,
        })
    }

    fn take_source_index(&mut self, explicit: Option<usize>) -> Result<usize> {
        match explicit {
            Some(index) => {
                if !self.claimed_sources.insert(index) {
                    return Err(SchemaError::DuplicateSourceIndex { index });
                }
                Ok(index)
            }
            None => {
                while self.claimed_sources.contains(&self.next_source) {
                    self.next_source += 1;
                }
                let index = self.next_source;
                self.claimed_sources.insert(index);
                self.next_source += 1;
                Ok(index)
            }
        }
    }

    fn take_target_index(&mut self, explicit: Option<usize>) -> Result<usize> {
        match explicit {
            Some(index) => {
                if !self.claimed_targets.insert(index) {
                    return Err(SchemaError::DuplicateTargetIndex { index });
                }
                Ok(index)
            }
            None => {
                while self.claimed_targets.contains(&self.next_target) {
                    self.next_target += 1;
                }
                let index = self.next_target;
                self.claimed_targets.insert(index);
                self.next_target += 1;
                Ok(index)
            }
        }
    }
}

/// An immutable, ordered collection of column definitions.
///
/// Shared via [`Arc`] between bound tables.
pub struct TableSchema {
    name: String,
    columns: Vec<ColumnDef>,
    row_validators: Vec<RowValidateFn>,
    table_validators: Vec<TableValidateFn>,
}

impl TableSchema {
    /// Identifier used to match external sheet or file names.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Columns in target-index order.
    pub fn columns(&self) -> &[ColumnDef] {
        &self.columns
    }

    pub fn column(&self, target_index: usize) -> Option<&ColumnDef> {
        self.columns.get(target_index)
    }

    pub fn column_by_accessor(&self, accessor: &str) -> Option<&ColumnDef> {
        self.columns
            .iter()
            .find(|column| column.accessor() == accessor)
    }

    /// Positional accessor list in target order.
    pub fn accessors(&self) -> Vec<Option<String>> {
        self.columns
            .iter()
            .map(|column| Some(column.accessor().to_string()))
            .collect()
    }

    /// Width a raw input row must have to cover every sourced column.
    pub fn source_width(&self) -> usize {
        self.columns
            .iter()
            .filter_map(ColumnDef::source_index)
            .max()
            .map_or(0, |max| max + 1)
    }

    pub fn len(&self) -> usize {
        self.columns.len()
    }

    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    pub(crate) fn row_validators(&self) -> &[RowValidateFn] {
        &self.row_validators
    }

    pub(crate) fn table_validators(&self) -> &[TableValidateFn] {
        &self.table_validators
    }
}

impl std::fmt::Debug for SchemaBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SchemaBuilder")
            .field("name", &self.name)
            .field("defaults", &self.defaults)
            .field("columns", &self.columns)
            .field("row_validators", &self.row_validators.len())
            .field("table_validators", &self.table_validators.len())
            .field("accessors", &self.accessors)
            .field("claimed_sources", &self.claimed_sources)
            .field("claimed_targets", &self.claimed_targets)
            .field("next_source", &self.next_source)
            .field("next_target", &self.next_target)
            .finish()
    }
}

impl std::fmt::Debug for TableSchema {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("TableSchema")
            .field("name", &self.name)
            .field("columns", &self.columns)
            .field("row_validators", &self.row_validators.len())
            .field("table_validators", &self.table_validators.len())
            .finish()
    }
}
