//! Curated per-generation tables: left-to-right order and final x-coordinates.
//!
//! Both ship as small script files (`const manualOrderFull = { "1": ["51"], ... };`) with line
//! comments. The object literal is extracted and read as JSON5, so plain JSON works as well.

use crate::person::{PersonId, loose_string};
use crate::{Error, Result};
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;

/// Rows keyed by generation number, in ascending generation order.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct GenerationTable<T> {
    rows: BTreeMap<i64, Vec<T>>,
}

/// Left-to-right person order per generation.
pub type GenerationOrderTable = GenerationTable<PersonId>;

/// Final x-coordinates per generation, aligned index-for-index with the order table.
pub type CoordinateTable = GenerationTable<f64>;

impl<T> Default for GenerationTable<T> {
    fn default() -> Self {
        Self {
            rows: BTreeMap::new(),
        }
    }
}

impl<T> GenerationTable<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, generation: i64, row: Vec<T>) {
        self.rows.insert(generation, row);
    }

    pub fn with_row(mut self, generation: i64, row: impl IntoIterator<Item = T>) -> Self {
        self.insert(generation, row.into_iter().collect());
        self
    }

    pub fn get(&self, generation: i64) -> Option<&[T]> {
        self.rows.get(&generation).map(Vec::as_slice)
    }

    pub fn contains(&self, generation: i64) -> bool {
        self.rows.contains_key(&generation)
    }

    pub fn iter(&self) -> impl Iterator<Item = (i64, &[T])> {
        self.rows.iter().map(|(g, row)| (*g, row.as_slice()))
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }
}

impl CoordinateTable {
    /// Global `(min, max)` over every finite value in every generation.
    pub fn extent(&self) -> Option<(f64, f64)> {
        self.rows
            .values()
            .flatten()
            .copied()
            .filter(|v| v.is_finite())
            .fold(None, |acc, v| match acc {
                None => Some((v, v)),
                Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
            })
    }
}

/// Returns the first top-level `{ ... }` of a script-like resource. Braces inside string literals
/// and comments do not count.
fn object_literal<'a>(name: &str, text: &'a str) -> Result<&'a str> {
    let bytes = text.as_bytes();
    let mut depth = 0usize;
    let mut start = None;
    let mut i = 0;
    while i < bytes.len() {
        match bytes[i] {
            b'"' | b'\'' | b'`' => {
                let quote = bytes[i];
                i += 1;
                while i < bytes.len() && bytes[i] != quote {
                    if bytes[i] == b'\\' {
                        i += 1;
                    }
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'/') => {
                while i < bytes.len() && bytes[i] != b'\n' {
                    i += 1;
                }
            }
            b'/' if bytes.get(i + 1) == Some(&b'*') => {
                i += 2;
                while i < bytes.len() && !(bytes[i] == b'*' && bytes.get(i + 1) == Some(&b'/')) {
                    i += 1;
                }
                i += 1;
            }
            b'{' => {
                if depth == 0 {
                    start = Some(i);
                }
                depth += 1;
            }
            b'}' if depth > 0 => {
                depth -= 1;
                if let (0, Some(s)) = (depth, start) {
                    return Ok(&text[s..=i]);
                }
            }
            _ => {}
        }
        i += 1;
    }
    Err(Error::TableSyntax {
        name: name.to_string(),
        message: if start.is_some() {
            "unterminated object literal".to_string()
        } else {
            "no object literal found".to_string()
        },
    })
}

fn parse_rows(name: &str, text: &str) -> Result<Vec<(i64, Vec<Value>)>> {
    let literal = object_literal(name, text)?;
    let value: Value = json5::from_str(literal).map_err(|e| Error::TableSyntax {
        name: name.to_string(),
        message: e.to_string(),
    })?;
    let Value::Object(map) = value else {
        return Err(Error::TableSyntax {
            name: name.to_string(),
            message: "expected an object keyed by generation".to_string(),
        });
    };

    let mut rows = Vec::with_capacity(map.len());
    for (key, row) in map {
        let generation = key.trim().parse::<i64>().map_err(|_| Error::TableSyntax {
            name: name.to_string(),
            message: format!("generation key {key:?} is not an integer"),
        })?;
        let Value::Array(items) = row else {
            return Err(Error::TableSyntax {
                name: name.to_string(),
                message: format!("generation {generation} is not a list"),
            });
        };
        rows.push((generation, items));
    }
    Ok(rows)
}

pub fn parse_order_table(name: &str, text: &str) -> Result<GenerationOrderTable> {
    let mut table = GenerationOrderTable::new();
    for (generation, items) in parse_rows(name, text)? {
        // Blank entries are placeholders in the curated files; they still occupy a slot so the
        // coordinate alignment is preserved.
        let ids = items
            .iter()
            .map(|v| PersonId::new(loose_string(v).unwrap_or_default()))
            .collect();
        table.insert(generation, ids);
    }
    Ok(table)
}

pub fn parse_coordinate_table(name: &str, text: &str) -> Result<CoordinateTable> {
    let mut table = CoordinateTable::new();
    for (generation, items) in parse_rows(name, text)? {
        let mut row = Vec::with_capacity(items.len());
        for v in &items {
            let x = match v {
                Value::Number(n) => n.as_f64(),
                Value::String(s) => s.trim().parse::<f64>().ok(),
                _ => None,
            };
            let Some(x) = x else {
                return Err(Error::TableSyntax {
                    name: name.to_string(),
                    message: format!("generation {generation}: {v} is not a number"),
                });
            };
            row.push(x);
        }
        table.insert(generation, row);
    }
    Ok(table)
}
