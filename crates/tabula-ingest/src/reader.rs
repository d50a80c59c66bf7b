//! CSV reading and cell normalization.

use std::io::Read;
use std::path::Path;

use csv::ReaderBuilder;
use tabula_model::{Table, TableOptions, Value};

use crate::error::{IngestError, Result};

/// Candidate delimiters, in tie-breaking order.
const DELIMITER_CANDIDATES: [u8; 3] = [b',', b';', b'\t'];

/// How much of a file the delimiter guess looks at.
const SNIFF_WINDOW: usize = 10 * 1024;

/// Options for loading a table from a CSV source.
#[derive(Debug, Clone)]
pub struct LoadOptions {
    /// Table name; defaults to the file stem when loading from a path.
    pub name: Option<String>,
    pub has_headers: bool,
    pub has_footer: bool,
    /// Field delimiter; guessed from the file content when unset.
    pub delimiter: Option<u8>,
    /// Map empty cells to `Nil` instead of empty text.
    pub empty_as_nil: bool,
    /// Trim surrounding whitespace from every cell.
    pub trim: bool,
}

impl Default for LoadOptions {
    fn default() -> Self {
        LoadOptions {
            name: None,
            has_headers: true,
            has_footer: false,
            delimiter: None,
            empty_as_nil: true,
            trim: true,
        }
    }
}

/// Reads a CSV file into a [`Table`].
///
/// Rows are appended through [`Table::push`], so the first row
/// establishes the width and mismatched rows fail with
/// [`tabula_model::TableError::InvalidColumnCount`].
pub fn read_table(path: &Path, options: &LoadOptions) -> Result<Table> {
    let (name, rows) = load_raw(path, options)?;
    build_table(rows, name, options)
}

/// Reads CSV from an in-memory source.
pub fn read_table_from_reader<R: Read>(reader: R, options: &LoadOptions) -> Result<Table> {
    let rows = raw_rows_from_reader(reader, options)?;
    let name = options.name.clone().unwrap_or_default();
    build_table(rows, name, options)
}

/// Picks the most frequent candidate delimiter (comma, semicolon, tab)
/// over the leading sample; comma wins ties.
pub fn guess_delimiter(sample: &[u8]) -> u8 {
    let window = &sample[..sample.len().min(SNIFF_WINDOW)];
    let mut best = DELIMITER_CANDIDATES[0];
    let mut best_count = 0;
    for candidate in DELIMITER_CANDIDATES {
        let count = window.iter().filter(|&&b| b == candidate).count();
        if count > best_count {
            best = candidate;
            best_count = count;
        }
    }
    best
}

/// Loads the raw cell rows of a CSV file, normalized but not yet shaped
/// into a table. Returns the resolved table name alongside.
pub(crate) fn load_raw(path: &Path, options: &LoadOptions) -> Result<(String, Vec<Vec<Value>>)> {
    if !path.is_file() {
        return Err(IngestError::FileNotFound {
            path: path.to_path_buf(),
        });
    }
    let bytes = std::fs::read(path).map_err(|source| IngestError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let name = options.name.clone().unwrap_or_else(|| file_stem(path));
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| guess_delimiter(&bytes));
    tracing::debug!(path = %path.display(), name = %name, delimiter, "Loading csv table");
    let rows = parse_rows(&bytes, delimiter, options, path)?;
    Ok((name, rows))
}

fn raw_rows_from_reader<R: Read>(mut reader: R, options: &LoadOptions) -> Result<Vec<Vec<Value>>> {
    let context = Path::new("<reader>");
    let mut bytes = Vec::new();
    reader.read_to_end(&mut bytes).map_err(|source| IngestError::Read {
        path: context.to_path_buf(),
        source,
    })?;
    let delimiter = options
        .delimiter
        .unwrap_or_else(|| guess_delimiter(&bytes));
    parse_rows(&bytes, delimiter, options, context)
}

fn parse_rows(
    bytes: &[u8],
    delimiter: u8,
    options: &LoadOptions,
    context: &Path,
) -> Result<Vec<Vec<Value>>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(false)
        .flexible(true)
        .delimiter(delimiter)
        .from_reader(bytes);

    let mut rows = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record.map_err(|source| IngestError::Csv {
            path: context.to_path_buf(),
            source,
        })?;
        let mut row = Vec::with_capacity(record.len());
        for (column, field) in record.iter().enumerate() {
            let field = if index == 0 && column == 0 {
                field.trim_start_matches('\u{feff}')
            } else {
                field
            };
            row.push(normalize_cell(field, options));
        }
        rows.push(row);
    }
    Ok(rows)
}

fn normalize_cell(raw: &str, options: &LoadOptions) -> Value {
    let text = if options.trim { raw.trim() } else { raw };
    if text.is_empty() && options.empty_as_nil {
        Value::Nil
    } else {
        Value::Text(text.to_string())
    }
}

fn build_table(rows: Vec<Vec<Value>>, name: String, options: &LoadOptions) -> Result<Table> {
    let table = Table::from_rows(
        rows,
        TableOptions {
            name,
            has_headers: options.has_headers,
            has_footer: options.has_footer,
            accessors: None,
        },
    )?;
    Ok(table)
}

pub(crate) fn file_stem(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}
