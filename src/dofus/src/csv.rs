//! JSON to CSV conversion for exports.

use serde_json::{Map, Value};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CsvError {
    #[error("Expected an array or an object of records, got {0}")]
    NotTabular(&'static str),

    #[error("No records to export")]
    Empty,

    #[error("Record {0} is not an object")]
    NotARecord(usize),
}

/// Quote a field if it contains a comma, quote or newline
pub fn escape_csv(s: &str) -> String {
    if s.contains(',') || s.contains('"') || s.contains('\n') {
        format!("\"{}\"", s.replace('"', "\"\""))
    } else {
        s.to_string()
    }
}

/// Convert a JSON record set to CSV.
///
/// Accepts an array of objects, or an object mapping ids to objects, in
/// which case each record gets a leading `id` column. Columns are the keys
/// of the first record in document order; later records missing a column
/// leave it empty.
pub fn json_to_csv(data: &Value) -> Result<String, CsvError> {
    let records = records(data)?;
    let first = records.first().ok_or(CsvError::Empty)?;
    let headers: Vec<&String> = first.keys().collect();

    let mut lines = Vec::with_capacity(records.len() + 1);
    lines.push(
        headers
            .iter()
            .map(|h| escape_csv(h))
            .collect::<Vec<_>>()
            .join(","),
    );

    for record in &records {
        let row: Vec<String> = headers
            .iter()
            .map(|h| escape_csv(&field_text(record.get(h.as_str()))))
            .collect();
        lines.push(row.join(","));
    }

    Ok(lines.join("\n"))
}

fn records(data: &Value) -> Result<Vec<Map<String, Value>>, CsvError> {
    match data {
        Value::Array(values) => values
            .iter()
            .enumerate()
            .map(|(i, v)| v.as_object().cloned().ok_or(CsvError::NotARecord(i)))
            .collect(),
        Value::Object(map) => map
            .iter()
            .enumerate()
            .map(|(i, (id, v))| {
                let fields = v.as_object().ok_or(CsvError::NotARecord(i))?;
                let mut record = Map::new();
                record.insert("id".to_string(), Value::String(id.clone()));
                record.extend(fields.iter().map(|(k, v)| (k.clone(), v.clone())));
                Ok(record)
            })
            .collect(),
        Value::Null => Err(CsvError::NotTabular("null")),
        Value::Bool(_) => Err(CsvError::NotTabular("a boolean")),
        Value::Number(_) => Err(CsvError::NotTabular("a number")),
        Value::String(_) => Err(CsvError::NotTabular("a string")),
    }
}

fn field_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}
