//! Schema registry and name-based table binding.

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use tabula_model::Table;
use tabula_schema::{BoundOptions, BoundTable, TableSchema};

use crate::error::{IngestError, Result};
use crate::reader::{LoadOptions, file_stem, load_raw};

/// An explicit collection of schemas, matched against source names.
///
/// Passed by reference to loading functions; there is no process-wide
/// registry. Matching is case-insensitive.
#[derive(Debug, Default)]
pub struct SchemaRegistry {
    schemas: BTreeMap<String, Arc<TableSchema>>,
}

impl SchemaRegistry {
    pub fn new() -> SchemaRegistry {
        SchemaRegistry::default()
    }

    /// Registers a schema under its own name. A later registration with
    /// the same name replaces the earlier one.
    pub fn register(&mut self, schema: Arc<TableSchema>) {
        self.schemas
            .insert(schema.name().to_lowercase(), schema);
    }

    pub fn get(&self, name: &str) -> Option<&Arc<TableSchema>> {
        self.schemas.get(&name.to_lowercase())
    }

    /// Registered schema names, in registration key order.
    pub fn names(&self) -> Vec<&str> {
        self.schemas.values().map(|schema| schema.name()).collect()
    }

    pub fn len(&self) -> usize {
        self.schemas.len()
    }

    pub fn is_empty(&self) -> bool {
        self.schemas.is_empty()
    }
}

/// A table loaded from disk, bound to a schema when one matched.
#[derive(Debug)]
pub enum LoadedTable {
    Plain(Table),
    Bound(BoundTable),
}

/// Reads a CSV file and appends every row through `schema`.
///
/// Coercion findings land in the returned [`BoundTable`]; only
/// structural problems (unreadable file, width mismatch) fail.
pub fn read_bound_table(
    path: &Path,
    schema: Arc<TableSchema>,
    options: &LoadOptions,
) -> Result<BoundTable> {
    let (name, rows) = load_raw(path, options)?;
    let bound = BoundTable::from_rows(
        schema,
        rows,
        BoundOptions {
            name: Some(name),
            has_headers: options.has_headers,
            has_footer: options.has_footer,
        },
    )?;
    Ok(bound)
}

/// Loads every `*.csv` file in `dir`, binding files whose stem matches a
/// registered schema name and loading the rest plain.
///
/// Files are processed in filename order; the result is keyed by file
/// stem.
pub fn read_tables(
    dir: &Path,
    registry: &SchemaRegistry,
    options: &LoadOptions,
) -> Result<BTreeMap<String, LoadedTable>> {
    let mut tables = BTreeMap::new();
    for path in list_csv_files(dir)? {
        let stem = file_stem(&path);
        let file_options = LoadOptions {
            name: Some(stem.clone()),
            ..options.clone()
        };
        let loaded = match registry.get(&stem) {
            Some(schema) => {
                tracing::debug!(file = %path.display(), schema = schema.name(), "Binding table");
                LoadedTable::Bound(read_bound_table(&path, Arc::clone(schema), &file_options)?)
            }
            None => LoadedTable::Plain(crate::reader::read_table(&path, &file_options)?),
        };
        tables.insert(stem, loaded);
    }
    Ok(tables)
}

/// Lists the `*.csv` files in a directory, sorted by filename.
fn list_csv_files(dir: &Path) -> Result<Vec<PathBuf>> {
    if !dir.is_dir() {
        return Err(IngestError::DirectoryNotFound {
            path: dir.to_path_buf(),
        });
    }
    let entries = std::fs::read_dir(dir).map_err(|source| IngestError::DirectoryRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let entry = entry.map_err(|source| IngestError::DirectoryRead {
            path: dir.to_path_buf(),
            source,
        })?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let is_csv = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("csv"));
        if is_csv {
            files.push(path);
        }
    }
    files.sort_by(|a, b| a.file_name().cmp(&b.file_name()));
    Ok(files)
}
