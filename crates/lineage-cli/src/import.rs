//! Spreadsheet export (CSV) to the `family_data.json` record array.
//!
//! Every column becomes a string field keyed by its header, in header order. The loader does the
//! normalisation (numeric ids, comma-joined lists, empty cells), so cells are copied as-is.

use serde_json::{Map, Value};
use std::io::Read;

const ID_COLUMN: &str = "PersonID";

#[derive(Debug)]
pub(crate) enum ImportError {
    Csv(csv::Error),
    Json(serde_json::Error),
    MissingColumn(&'static str),
}

impl std::fmt::Display for ImportError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ImportError::Csv(err) => write!(f, "invalid CSV: {err}"),
            ImportError::Json(err) => write!(f, "{err}"),
            ImportError::MissingColumn(name) => write!(f, "CSV has no {name:?} column"),
        }
    }
}

impl From<csv::Error> for ImportError {
    fn from(value: csv::Error) -> Self {
        Self::Csv(value)
    }
}

pub(crate) fn csv_to_records(input: impl Read) -> Result<Vec<Value>, ImportError> {
    let mut reader = csv::ReaderBuilder::new().flexible(true).from_reader(input);
    let headers = reader.headers()?.clone();
    if !headers.iter().any(|h| h.trim() == ID_COLUMN) {
        return Err(ImportError::MissingColumn(ID_COLUMN));
    }

    let mut records = Vec::new();
    for row in reader.records() {
        let row = row?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        let mut record = Map::new();
        for (i, header) in headers.iter().enumerate() {
            let cell = row.get(i).unwrap_or_default();
            record.insert(header.trim().to_string(), Value::from(cell));
        }
        records.push(Value::Object(record));
    }
    tracing::debug!(rows = records.len(), "csv rows converted");
    Ok(records)
}

/// Converts a CSV export to pretty-printed JSON with a trailing newline.
pub(crate) fn csv_to_json(input: impl Read) -> Result<String, ImportError> {
    let records = csv_to_records(input)?;
    let mut json = serde_json::to_string_pretty(&records).map_err(ImportError::Json)?;
    json.push('\n');
    Ok(json)
}
