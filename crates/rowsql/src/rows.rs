//! Row input parsing.
//!
//! Rows may be given as JSON (one object, or an array of objects) or as plain
//! text. Plain text is resolved against the already-parsed structure:
//!
//! - newline-delimited JSON objects, one row per line
//! - blank-line separated groups, one value per line in column order
//! - tab-separated lines, one row per line
//! - a flat list of values (one per line) chunked by the column count
//!
//! Plain values are decoded loosely: `null`, `true` and `false` (any case) map to
//! their SQL counterparts, everything else stays text. Numeric columns turn
//! numeric-looking text into bare literals later, in [`crate::value`].

use crate::error::{GenError, GenResult, InputKind};
use crate::structure::Column;
use serde::Deserialize;
use serde_json::{Map, Value as JsonValue};
use std::collections::BTreeMap;

/// A single row value.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Null,
    Bool(bool),
    /// A number taken from JSON input.
    Number(serde_json::Number),
    /// A number built in code. May be non-finite, which fails formatting.
    Float(f64),
    Text(String),
    /// A JSON object or array.
    Json(JsonValue),
}

impl Value {
    /// Decode a plain-text token.
    pub fn from_token(raw: &str) -> Self {
        let token = raw.trim();
        if token.eq_ignore_ascii_case("null") {
            Self::Null
        } else if token.eq_ignore_ascii_case("true") {
            Self::Bool(true)
        } else if token.eq_ignore_ascii_case("false") {
            Self::Bool(false)
        } else {
            Self::Text(token.to_string())
        }
    }
}

impl From<JsonValue> for Value {
    fn from(v: JsonValue) -> Self {
        match v {
            JsonValue::Null => Self::Null,
            JsonValue::Bool(b) => Self::Bool(b),
            JsonValue::Number(n) => Self::Number(n),
            JsonValue::String(s) => Self::Text(s),
            other => Self::Json(other),
        }
    }
}

impl From<&str> for Value {
    fn from(v: &str) -> Self {
        Self::Text(v.to_string())
    }
}

impl From<String> for Value {
    fn from(v: String) -> Self {
        Self::Text(v)
    }
}

impl From<bool> for Value {
    fn from(v: bool) -> Self {
        Self::Bool(v)
    }
}

impl From<i64> for Value {
    fn from(v: i64) -> Self {
        Self::Number(v.into())
    }
}

impl From<f64> for Value {
    fn from(v: f64) -> Self {
        Self::Float(v)
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(v: Option<T>) -> Self {
        v.map_or(Self::Null, Into::into)
    }
}

/// One record: column name to value.
///
/// Rows may be sparse, and keys outside the structure are kept but ignored when
/// building statements.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Row {
    values: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Set a value, returning `self` for chaining.
    pub fn with(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.values.insert(name.into(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.values.get(name)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.values.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.values.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Map positional tokens onto the columns. Missing trailing tokens decode as
    /// empty text.
    pub fn from_tokens(columns: &[Column], tokens: &[&str]) -> Self {
        columns
            .iter()
            .enumerate()
            .map(|(i, col)| {
                let token = tokens.get(i).copied().unwrap_or("");
                (col.name.clone(), Value::from_token(token))
            })
            .collect()
    }
}

impl From<Map<String, JsonValue>> for Row {
    fn from(map: Map<String, JsonValue>) -> Self {
        map.into_iter().map(|(k, v)| (k, Value::from(v))).collect()
    }
}

impl FromIterator<(String, Value)> for Row {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        Self {
            values: iter.into_iter().collect(),
        }
    }
}

/// Which row input shapes are accepted.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RowFormat {
    /// JSON first, then the plain-text strategies.
    #[default]
    Auto,
    /// JSON object or array of objects only.
    Json,
}

impl RowFormat {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "auto" => Some(Self::Auto),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Parse row input into records, preserving input order.
///
/// `columns` is used only to align plain-text values; JSON rows are taken as-is.
pub fn parse_rows(text: &str, columns: &[Column], format: RowFormat) -> GenResult<Vec<Row>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenError::EmptyInput(InputKind::Rows));
    }

    match serde_json::from_str::<JsonValue>(trimmed) {
        Ok(JsonValue::Array(items)) => return rows_from_json_array(items),
        Ok(JsonValue::Object(map)) => {
            tracing::debug!(target: "rowsql", strategy = "json_object", rows = 1, "parsed rows");
            return Ok(vec![Row::from(map)]);
        }
        _ if format == RowFormat::Json => return Err(GenError::RowsMustBeJson),
        // Scalars and non-JSON fall through to the plain-text strategies.
        _ => {}
    }

    if columns.is_empty() {
        return Err(GenError::EmptyInput(InputKind::Structure));
    }
    parse_plain_rows(trimmed, columns)
}

fn rows_from_json_array(items: Vec<JsonValue>) -> GenResult<Vec<Row>> {
    if items.is_empty() {
        return Err(GenError::EmptyRowsArray);
    }
    let rows = items
        .into_iter()
        .enumerate()
        .map(|(index, item)| match item {
            JsonValue::Object(map) => Ok(Row::from(map)),
            _ => Err(GenError::InvalidRowAtIndex { index }),
        })
        .collect::<GenResult<Vec<_>>>()?;
    tracing::debug!(target: "rowsql", strategy = "json_array", rows = rows.len(), "parsed rows");
    Ok(rows)
}

fn parse_plain_rows(text: &str, columns: &[Column]) -> GenResult<Vec<Row>> {
    let width = columns.len();
    let lines: Vec<&str> = text.lines().map(str::trim).collect();
    let non_empty: Vec<&str> = lines.iter().copied().filter(|l| !l.is_empty()).collect();

    if let Some(rows) = ndjson_rows(&non_empty) {
        tracing::debug!(target: "rowsql", strategy = "ndjson", rows = rows.len(), "parsed rows");
        return Ok(rows);
    }

    let groups = group_by_blank_lines(&lines);
    if groups.len() > 1 && groups.iter().all(|g| g.len() == width) {
        tracing::debug!(target: "rowsql", strategy = "blank_line_groups", rows = groups.len(), "parsed rows");
        return Ok(groups
            .iter()
            .map(|g| Row::from_tokens(columns, g))
            .collect());
    }

    let tab_rows: Vec<Vec<&str>> = non_empty
        .iter()
        .map(|line| line.split('\t').map(str::trim).collect())
        .collect();
    if tab_rows.iter().all(|parts| parts.len() == width) {
        tracing::debug!(target: "rowsql", strategy = "tab_separated", rows = tab_rows.len(), "parsed rows");
        return Ok(tab_rows
            .iter()
            .map(|parts| Row::from_tokens(columns, parts))
            .collect());
    }

    if non_empty.len() % width != 0 {
        return Err(GenError::MisalignedRows {
            expected_multiple: width,
        });
    }

    let rows: Vec<Row> = non_empty
        .chunks(width)
        .map(|chunk| Row::from_tokens(columns, chunk))
        .collect();
    tracing::debug!(target: "rowsql", strategy = "flat_values", rows = rows.len(), "parsed rows");
    Ok(rows)
}

/// `Some` only when every line is a standalone JSON object.
fn ndjson_rows(lines: &[&str]) -> Option<Vec<Row>> {
    lines
        .iter()
        .map(|line| match serde_json::from_str::<JsonValue>(line) {
            Ok(JsonValue::Object(map)) => Some(Row::from(map)),
            _ => None,
        })
        .collect()
}

fn group_by_blank_lines<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut groups = Vec::new();
    let mut current = Vec::new();
    for line in lines {
        if line.is_empty() {
            if !current.is_empty() {
                groups.push(std::mem::take(&mut current));
            }
            continue;
        }
        current.push(*line);
    }
    if !current.is_empty() {
        groups.push(current);
    }
    groups
}
