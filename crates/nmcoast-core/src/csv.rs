//! CSV encoding for metadata exports.
//!
//! The encoding is defined over JSON records rather than a fixed schema: the
//! header is the union of all keys across records in first-encountered order,
//! values are stringified, and null/missing values render as empty fields.
//! A field containing a comma, double quote, or newline is wrapped in double
//! quotes with embedded quotes doubled.

use serde_json::Value;

use crate::counters::Counter;

/// Encode a set of JSON object records as CSV.
///
/// Non-object records are skipped. Rows end with `\n`; the output for an
/// empty record set is an empty string.
#[must_use]
pub fn records_to_csv(records: &[Value]) -> String {
    let mut columns: Vec<String> = Vec::new();
    for record in records {
        if let Value::Object(map) = record {
            for key in map.keys() {
                if !columns.iter().any(|c| c == key) {
                    columns.push(key.clone());
                }
            }
        }
    }

    if columns.is_empty() {
        return String::new();
    }

    let mut out = String::new();
    out.push_str(
        &columns
            .iter()
            .map(|c| escape_field(c))
            .collect::<Vec<_>>()
            .join(","),
    );
    out.push('\n');

    for record in records {
        let Value::Object(map) = record else { continue };
        let row = columns
            .iter()
            .map(|col| escape_field(&stringify(map.get(col))))
            .collect::<Vec<_>>()
            .join(",");
        out.push_str(&row);
        out.push('\n');
    }

    out
}

/// Encode the counter list as CSV.
///
/// # Errors
///
/// Returns `serde_json::Error` if a counter fails to serialize (does not
/// happen for well-formed records).
pub fn counters_to_csv(counters: &[Counter]) -> Result<String, serde_json::Error> {
    let records = counters
        .iter()
        .map(serde_json::to_value)
        .collect::<Result<Vec<_>, _>>()?;
    Ok(records_to_csv(&records))
}

fn stringify(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

fn escape_field(field: &str) -> String {
    if field.contains(',') || field.contains('"') || field.contains('\n') || field.contains('\r') {
        format!("\"{}\"", field.replace('"', "\"\""))
    } else {
        field.to_owned()
    }
}
