//! Text and JSON rendering of decoded records.
//!
//! Everything renders to a `String` so callers decide where it goes.

use std::collections::BTreeMap;
use std::fmt::Write as _;

use anyhow::Result;
use elfpeek::{Field, FieldValue, HeaderField, Record};
use serde::Serialize;

/// Output format selected by `--json`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Format {
    Text,
    Json,
}

/// One line of the `sections` listing.
#[derive(Debug, Serialize)]
pub struct SectionRow {
    pub index: usize,
    pub name: String,
    #[serde(rename = "type")]
    pub kind: FieldValue,
    pub size: u64,
}

/// A table entry tagged with its index, for JSON output.
#[derive(Serialize)]
#[serde(bound(serialize = "F: Field"))]
struct Indexed<'a, F> {
    index: usize,
    #[serde(flatten)]
    fields: &'a Record<F>,
}

fn json<T: Serialize + ?Sized>(value: &T) -> Result<String> {
    let mut out = serde_json::to_string_pretty(value)?;
    out.push('\n');
    Ok(out)
}

/// Aligned `NAME value` lines, skipping fields absent under the file's class.
fn text_record<F: Field>(record: &Record<F>, indent: &str) -> String {
    let width = record
        .iter()
        .filter(|(_, value)| value.is_some())
        .map(|(field, _)| field.name().len())
        .max()
        .unwrap_or(0);
    let mut out = String::new();
    for (field, value) in record.iter() {
        if let Some(value) = value {
            let _ = writeln!(out, "{indent}{:<width$}  {value}", field.name());
        }
    }
    out
}

/// Renders a whole record.
pub fn record<F: Field>(record: &Record<F>, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(text_record(record, "")),
        Format::Json => json(record),
    }
}

/// Renders a single header field.
pub fn field(field: HeaderField, value: &FieldValue, format: Format) -> Result<String> {
    match format {
        Format::Text => Ok(format!("{field}  {value}\n")),
        Format::Json => json(&BTreeMap::from([(field.name(), value)])),
    }
}

/// Renders indexed table entries under a per-entry `title` heading.
pub fn table<F: Field>(title: &str, entries: &[(usize, Record<F>)], format: Format) -> Result<String> {
    match format {
        Format::Text => {
            let mut out = String::new();
            for (i, (index, record)) in entries.iter().enumerate() {
                if i > 0 {
                    out.push('\n');
                }
                let _ = writeln!(out, "{title} {index}");
                out.push_str(&text_record(record, "  "));
            }
            Ok(out)
        }
        Format::Json => {
            let entries: Vec<_> = entries
                .iter()
                .map(|(index, fields)| Indexed { index: *index, fields })
                .collect();
            json(&entries)
        }
    }
}

/// Renders the `sections` listing.
pub fn sections(rows: &[SectionRow], format: Format) -> Result<String> {
    if format == Format::Json {
        return json(rows);
    }
    let width = rows.iter().map(|row| row.name.len()).max().unwrap_or(0).max(4);
    let mut out = String::new();
    let _ = writeln!(out, "  Nr  {:<width$}  {:<18}  Size", "Name", "Type");
    for row in rows {
        let kind = match row.kind.symbol() {
            Some(name) => name.to_owned(),
            None => format!("{:#x}", row.kind.raw()),
        };
        let _ = writeln!(out, "{:>4}  {:<width$}  {kind:<18}  {:#x}", row.index, row.name, row.size);
    }
    Ok(out)
}
