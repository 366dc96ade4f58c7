//! Textual rendering of CSV, JSON, XML and plain text.

use quick_xml::events::Event;
use quick_xml::{Reader, Writer};

use crate::error::ExtractionError;

/// Route structured content by MIME type. Anything else is read as UTF-8 text.
pub fn process_structured_data(bytes: &[u8], mime_type: &str) -> Result<String, ExtractionError> {
    match mime_type {
        "text/csv" => csv_table(bytes),
        "application/json" => pretty_json(bytes),
        "application/xml" => canonical_xml(bytes),
        _ => decode_text(bytes),
    }
}

/// Render CSV as a right-aligned table with a numeric row index.
///
/// ```text
///     name  score
/// 0    ana     91
/// 1  berto      7
/// ```
pub fn csv_table(bytes: &[u8]) -> Result<String, ExtractionError> {
    let mut reader = csv::Reader::from_reader(bytes);
    let headers: Vec<String> = reader
        .headers()
        .map_err(structured_err)?
        .iter()
        .map(str::to_string)
        .collect();
    if headers.is_empty() || headers.iter().all(String::is_empty) {
        return Err(ExtractionError::StructuredData(
            "No columns to parse from file".into(),
        ));
    }

    let mut rows: Vec<Vec<String>> = Vec::new();
    for record in reader.records() {
        let record = record.map_err(structured_err)?;
        rows.push(record.iter().map(str::to_string).collect());
    }

    if rows.is_empty() {
        return Ok(format!(
            "Empty DataFrame\nColumns: [{}]\nIndex: []",
            headers.join(", ")
        ));
    }

    let index_width = (rows.len() - 1).to_string().len();
    let widths: Vec<usize> = headers
        .iter()
        .enumerate()
        .map(|(col, header)| {
            rows.iter()
                .map(|row| row[col].chars().count())
                .chain(std::iter::once(header.chars().count()))
                .max()
                .unwrap_or(0)
        })
        .collect();

    let mut lines = Vec::with_capacity(rows.len() + 1);
    let mut header_line = " ".repeat(index_width);
    for (header, width) in headers.iter().zip(&widths) {
        header_line.push_str(&format!("  {:>w$}", header, w = *width));
    }
    lines.push(header_line);

    for (index, row) in rows.iter().enumerate() {
        let mut line = format!("{:>w$}", index, w = index_width);
        for (cell, width) in row.iter().zip(&widths) {
            line.push_str(&format!("  {:>w$}", cell, w = *width));
        }
        lines.push(line);
    }

    Ok(lines.join("\n"))
}

/// Pretty-print JSON with two-space indentation, preserving key order.
pub fn pretty_json(bytes: &[u8]) -> Result<String, ExtractionError> {
    let value: serde_json::Value = serde_json::from_slice(bytes).map_err(structured_err)?;
    serde_json::to_string_pretty(&value).map_err(structured_err)
}

/// Re-serialize XML without the declaration, comments, processing
/// instructions or inter-element whitespace. Text content is trimmed.
pub fn canonical_xml(bytes: &[u8]) -> Result<String, ExtractionError> {
    let source = std::str::from_utf8(bytes).map_err(structured_err)?;
    let mut reader = Reader::from_str(source);
    reader.trim_text(true);
    let mut writer = Writer::new(Vec::new());
    let mut buf = Vec::new();
    let mut depth: usize = 0;
    let mut saw_root = false;

    loop {
        match reader.read_event_into(&mut buf).map_err(|e| {
            ExtractionError::StructuredData(format!(
                "malformed XML at position {}: {}",
                reader.buffer_position(),
                e
            ))
        })? {
            Event::Eof => break,
            Event::Decl(_) | Event::Comment(_) | Event::PI(_) | Event::DocType(_) => {}
            event @ Event::Start(_) => {
                if depth == 0 && saw_root {
                    return Err(ExtractionError::StructuredData(
                        "junk after document element".into(),
                    ));
                }
                depth += 1;
                saw_root = true;
                writer.write_event(event).map_err(structured_err)?;
            }
            event @ Event::Empty(_) => {
                if depth == 0 && saw_root {
                    return Err(ExtractionError::StructuredData(
                        "junk after document element".into(),
                    ));
                }
                saw_root = true;
                writer.write_event(event).map_err(structured_err)?;
            }
            event @ Event::End(_) => {
                depth = depth.saturating_sub(1);
                writer.write_event(event).map_err(structured_err)?;
            }
            other => {
                if depth == 0 {
                    return Err(ExtractionError::StructuredData(
                        "text outside of document element".into(),
                    ));
                }
                writer.write_event(other).map_err(structured_err)?;
            }
        }
        buf.clear();
    }

    if !saw_root {
        return Err(ExtractionError::StructuredData("no element found".into()));
    }
    if depth != 0 {
        return Err(ExtractionError::StructuredData(
            "unclosed element at end of input".into(),
        ));
    }

    String::from_utf8(writer.into_inner()).map_err(structured_err)
}

/// Strict UTF-8 decode.
pub fn decode_text(bytes: &[u8]) -> Result<String, ExtractionError> {
    String::from_utf8(bytes.to_vec()).map_err(structured_err)
}

fn structured_err(e: impl std::fmt::Display) -> ExtractionError {
    ExtractionError::StructuredData(e.to_string())
}
