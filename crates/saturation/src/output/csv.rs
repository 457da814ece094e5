//! CSV export for [`Table`]s.

use std::io::{self, Write};

use super::Table;

fn escape(field: &str) -> String {
    if field.contains([',', '"', '\n']) {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_string()
    }
}

fn cell(value: Option<f64>) -> String {
    match value {
        Some(v) if v.is_finite() => v.to_string(),
        _ => String::new(),
    }
}

/// Render `table` as CSV: a header of labels, then one line per row.
///
/// Gaps and non-finite values are written as empty cells.
pub fn to_csv_string(table: &Table) -> String {
    let mut out = String::new();

    // Header
    let header: Vec<String> = std::iter::once(table.x_label.as_str())
        .chain(table.columns.iter().map(String::as_str))
        .map(escape)
        .collect();
    out.push_str(&header.join(","));
    out.push('\n');

    // Data rows
    for row in &table.rows {
        out.push_str(&cell(Some(row.x)));
        for &value in &row.cells {
            out.push(',');
            out.push_str(&cell(value));
        }
        out.push('\n');
    }

    out
}

/// Write `table` as CSV to `writer`.
pub fn write_csv<W: Write>(table: &Table, mut writer: W) -> io::Result<()> {
    writer.write_all(to_csv_string(table).as_bytes())?;
    writer.flush()
}
