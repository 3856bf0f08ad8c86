//! Markdown rendering of Genie answers.
//!
//! Tables get a header row, a `---` separator and one line per data row.
//! Numeric columns are grouped with thousands separators; floating types get
//! two decimals. Null cells render as `NULL` whatever the column type.

use std::fmt::Write as _;

use serde_json::Value;

use genie_types::answer::{Answer, TableAnswer};
use genie_types::genie::ColumnInfo;

pub const NO_DATA: &str = "No data available.\n\n";

const DECIMAL_TYPES: &[&str] = &["DECIMAL", "DOUBLE", "FLOAT"];
const INTEGER_TYPES: &[&str] = &["INT", "BIGINT", "LONG", "SHORT", "BYTE"];

/// Render an answer as chat markdown.
pub fn render_answer(answer: &Answer) -> String {
    match answer {
        Answer::Table(table) => render_table(table),
        Answer::Message { text } | Answer::Error { text } if !text.is_empty() => {
            format!("{text}\n\n")
        }
        Answer::Clarification { text } if !text.is_empty() => {
            format!("## Clarification\n\n{text}\n\n")
        }
        _ => NO_DATA.to_string(),
    }
}

fn render_table(table: &TableAnswer) -> String {
    let mut out = String::new();

    if let Some(description) = table.query_description.as_deref().filter(|d| !d.is_empty()) {
        let _ = write!(out, "## Query Description\n\n{description}\n\n");
    }

    out.push_str("## Query Results\n\n");

    let Some(columns) = table.schema.columns.as_deref() else {
        let schema = serde_json::to_string(&table.schema).unwrap_or_default();
        let _ = write!(out, "Unexpected column format: {schema}\n\n");
        return out;
    };

    let header: Vec<String> = columns.iter().map(|c| escape_cell(&c.name)).collect();
    let _ = writeln!(out, "| {} |", header.join(" | "));
    let _ = writeln!(out, "|{}|", vec!["---"; columns.len()].join("|"));

    for row in &table.rows {
        let cells: Vec<String> = row
            .iter()
            .zip(columns)
            .map(|(value, column)| format_cell(value, column))
            .collect();
        let _ = writeln!(out, "| {} |", cells.join(" | "));
    }

    out
}

/// Format one cell according to its column's type name.
pub fn format_cell(value: &Value, column: &ColumnInfo) -> String {
    if value.is_null() {
        return "NULL".to_string();
    }

    let type_name = column
        .type_name
        .as_deref()
        .map(str::to_ascii_uppercase)
        .unwrap_or_default();

    let formatted = if DECIMAL_TYPES.contains(&type_name.as_str()) {
        as_f64(value).map(format_decimal)
    } else if INTEGER_TYPES.contains(&type_name.as_str()) {
        as_i128(value).map(format_integer)
    } else {
        None
    };

    formatted.unwrap_or_else(|| escape_cell(&plain_text(value)))
}

/// `1234.5` -> `1,234.50`.
pub fn format_decimal(value: f64) -> String {
    if !value.is_finite() {
        return value.to_string().to_lowercase();
    }
    let fixed = format!("{value:.2}");
    let (int_part, frac_part) = fixed.split_once('.').unwrap_or((fixed.as_str(), "00"));
    format!("{}.{}", group_thousands(int_part), frac_part)
}

/// `1234567` -> `1,234,567`.
pub fn format_integer(value: i128) -> String {
    group_thousands(&value.to_string())
}

/// Insert a comma every three digits of an optionally signed digit string.
fn group_thousands(digits: &str) -> String {
    let (sign, digits) = match digits.strip_prefix('-') {
        Some(rest) => ("-", rest),
        None => ("", digits),
    };

    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    format!("{sign}{grouped}")
}

fn as_f64(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn as_i128(value: &Value) -> Option<i128> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .map(i128::from)
            .or_else(|| n.as_u64().map(i128::from))
            .or_else(|| n.as_f64().filter(|f| f.is_finite()).map(|f| f.trunc() as i128)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

fn plain_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        other => other.to_string(),
    }
}

fn escape_cell(text: &str) -> String {
    text.replace('|', "\\|").replace('\n', " ")
}
