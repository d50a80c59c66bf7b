//! CSV rendering in three dialects.

use std::io::Write;

use ::csv::{Terminator, WriterBuilder};
use anyhow::{Result, bail};

use crate::{Medium, Present};

/// Writes every row of `source` — header, body, and footer — as CSV in
/// the given dialect. `Medium::Html` is not a CSV dialect and fails.
pub fn write_csv<P, W>(source: &P, writer: W, medium: Medium) -> Result<()>
where
    P: Present + ?Sized,
    W: Write,
{
    let (delimiter, terminator) = match medium {
        Medium::Csv => (b',', Terminator::Any(b'\n')),
        Medium::ExcelCsv => (b';', Terminator::CRLF),
        Medium::Tab => (b'\t', Terminator::Any(b'\n')),
        Medium::Html => bail!("html is not a csv dialect"),
    };
    let mut out = WriterBuilder::new()
        .delimiter(delimiter)
        .terminator(terminator)
        .from_writer(writer);

    let table = source.table();
    let width = table.column_count().unwrap_or(0);
    for row in 0..table.row_count() {
        let record: Vec<String> = (0..width)
            .map(|column| source.render_cell(row, column, medium).to_string())
            .collect();
        out.write_record(&record)?;
    }
    out.flush()?;
    Ok(())
}

/// Renders `source` to a CSV string.
pub fn to_csv<P: Present + ?Sized>(source: &P, medium: Medium) -> Result<String> {
    let mut buffer = Vec::new();
    write_csv(source, &mut buffer, medium)?;
    Ok(String::from_utf8(buffer)?)
}
