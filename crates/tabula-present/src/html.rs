//! HTML table rendering.

use std::io::Write;

use anyhow::Result;
use quick_xml::Writer;
use quick_xml::events::{BytesEnd, BytesStart, BytesText, Event};

use crate::{Medium, Present};

/// Writes `source` as an HTML `<table>`: header cells as `<th>` inside
/// `<thead>`, body rows as `<td>` inside `<tbody>`, with a footer row as
/// the final `<tbody>` row. Cell text is escaped by the writer.
pub fn write_html<P, W>(source: &P, writer: W) -> Result<()>
where
    P: Present + ?Sized,
    W: Write,
{
    let mut xml = Writer::new(writer);
    let table = source.table();
    let width = table.column_count().unwrap_or(0);

    xml.write_event(Event::Start(BytesStart::new("table")))?;
    if let Some(header) = table.headers() {
        xml.write_event(Event::Start(BytesStart::new("thead")))?;
        write_row(&mut xml, source, header.index(), width, "th")?;
        xml.write_event(Event::End(BytesEnd::new("thead")))?;
    }
    xml.write_event(Event::Start(BytesStart::new("tbody")))?;
    let body_rows: Vec<usize> = table.body().map(|row| row.index()).collect();
    for row in body_rows {
        write_row(&mut xml, source, row, width, "td")?;
    }
    if let Some(footer) = table.footer() {
        write_row(&mut xml, source, footer.index(), width, "td")?;
    }
    xml.write_event(Event::End(BytesEnd::new("tbody")))?;
    xml.write_event(Event::End(BytesEnd::new("table")))?;
    Ok(())
}

/// Renders `source` to an HTML string.
pub fn to_html<P: Present + ?Sized>(source: &P) -> Result<String> {
    let mut buffer = Vec::new();
    write_html(source, &mut buffer)?;
    Ok(String::from_utf8(buffer)?)
}

fn write_row<P, W>(
    xml: &mut Writer<W>,
    source: &P,
    row: usize,
    width: usize,
    cell_tag: &str,
) -> Result<()>
where
    P: Present + ?Sized,
    W: Write,
{
    xml.write_event(Event::Start(BytesStart::new("tr")))?;
    for column in 0..width {
        let text = source.render_cell(row, column, Medium::Html).to_string();
        xml.write_event(Event::Start(BytesStart::new(cell_tag)))?;
        xml.write_event(Event::Text(BytesText::new(&text)))?;
        xml.write_event(Event::End(BytesEnd::new(cell_tag)))?;
    }
    xml.write_event(Event::End(BytesEnd::new("tr")))?;
    Ok(())
}
