//! Table structure parsing.
//!
//! A structure is supplied in one of three shapes, tried in order:
//!
//! 1. a JSON array of `{"name": ..., "type": ..., "primaryKey": ...}` objects
//! 2. a bare list of names separated by whitespace or commas (`id name email`)
//! 3. one `name[:type[:pk|primary]]` declaration per line

use crate::error::{GenError, GenResult, InputKind};
use crate::ident::normalize_identifier;
use crate::value::is_numeric_type;
use regex::Regex;
use serde_json::Value as JsonValue;
use std::sync::OnceLock;

const DEFAULT_TYPE: &str = "text";

/// A declared column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Column {
    /// Normalized, unquoted name. Never empty.
    pub name: String,
    /// Lower-cased free-form SQL type (`text`, `bigint`, `jsonb`, ...).
    pub data_type: String,
    pub primary_key: bool,
}

impl Column {
    pub fn new(name: impl Into<String>, data_type: impl Into<String>, primary_key: bool) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into().to_lowercase(),
            primary_key,
        }
    }

    /// A `text` column that is not part of the primary key.
    pub fn text(name: impl Into<String>) -> Self {
        Self::new(name, DEFAULT_TYPE, false)
    }

    pub fn is_numeric(&self) -> bool {
        is_numeric_type(&self.data_type)
    }
}

/// Parse structure text into columns, preserving declaration order.
pub fn parse_structure(text: &str) -> GenResult<Vec<Column>> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(GenError::EmptyInput(InputKind::Structure));
    }

    if trimmed.starts_with('[') {
        let columns = parse_json_structure(trimmed)?;
        tracing::debug!(target: "rowsql", format = "json", columns = columns.len(), "parsed table structure");
        return Ok(columns);
    }

    let lines: Vec<&str> = trimmed
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let columns = if lines.iter().any(|line| line.contains(':')) {
        tracing::debug!(target: "rowsql", format = "lines", "parsing table structure");
        lines
            .iter()
            .enumerate()
            .map(|(i, line)| parse_line(i + 1, line))
            .collect::<GenResult<Vec<_>>>()?
    } else {
        tracing::debug!(target: "rowsql", format = "names", "parsing table structure");
        parse_name_list(trimmed)?
    };

    Ok(columns)
}

fn parse_json_structure(text: &str) -> GenResult<Vec<Column>> {
    let parsed: JsonValue = serde_json::from_str(text)
        .map_err(|e| GenError::invalid_structure(format!("Table structure JSON is invalid: {e}")))?;

    let items = match parsed {
        JsonValue::Array(items) if !items.is_empty() => items,
        _ => {
            return Err(GenError::invalid_structure(
                "Table structure JSON must be a non-empty array.",
            ));
        }
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let JsonValue::Object(obj) = item else {
                return Err(GenError::InvalidColumnAtIndex { index });
            };
            let raw_name = match obj.get("name") {
                Some(JsonValue::String(s)) => s.clone(),
                Some(JsonValue::Number(n)) => n.to_string(),
                _ => return Err(GenError::InvalidColumnAtIndex { index }),
            };
            let name = normalize_identifier(&raw_name);
            if name.is_empty() {
                return Err(GenError::InvalidColumnAtIndex { index });
            }

            let data_type = match obj.get("type") {
                Some(JsonValue::String(s)) if !s.is_empty() => s.clone(),
                Some(JsonValue::Number(n)) => n.to_string(),
                _ => DEFAULT_TYPE.to_string(),
            };

            let primary_key = ["primaryKey", "pk", "isPrimaryKey"]
                .iter()
                .any(|key| is_truthy(obj.get(*key)));

            Ok(Column::new(name, data_type, primary_key))
        })
        .collect()
}

/// Loose truthiness for primary-key flags: `true`, `1`, `"yes"` all count.
fn is_truthy(value: Option<&JsonValue>) -> bool {
    match value {
        None | Some(JsonValue::Null) => false,
        Some(JsonValue::Bool(b)) => *b,
        Some(JsonValue::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
        Some(JsonValue::String(s)) => !s.is_empty(),
        Some(JsonValue::Array(_)) | Some(JsonValue::Object(_)) => true,
    }
}

fn name_separator() -> &'static Regex {
    static SEP: OnceLock<Regex> = OnceLock::new();
    SEP.get_or_init(|| Regex::new(r"[\s,]+").expect("invalid built-in separator regex"))
}

fn parse_name_list(text: &str) -> GenResult<Vec<Column>> {
    let mut columns = Vec::new();
    for raw in name_separator().split(text).filter(|s| !s.is_empty()) {
        let name = normalize_identifier(raw);
        if name.is_empty() {
            return Err(GenError::invalid_structure(format!(
                "Empty column name in table structure: {raw}"
            )));
        }
        columns.push(Column::text(name));
    }

    if columns.is_empty() {
        return Err(GenError::invalid_structure(
            "Table structure must include at least one column name.",
        ));
    }
    Ok(columns)
}

fn parse_line(line_no: usize, line: &str) -> GenResult<Column> {
    let parts: Vec<&str> = line.split(':').map(str::trim).collect();
    let name = normalize_identifier(parts[0]);
    if name.is_empty() {
        return Err(GenError::invalid_structure(format!(
            "Missing column name in structure line {line_no}."
        )));
    }

    let data_type = parts
        .get(1)
        .copied()
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_TYPE);
    // Marker is case-sensitive: `PK` is not a primary key.
    let primary_key = matches!(parts.get(2).copied(), Some("pk" | "primary"));

    Ok(Column::new(name, data_type, primary_key))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bare_names_default_to_text() {
        let cols = parse_structure("a b c").unwrap();
        assert_eq!(
            cols,
            vec![Column::text("a"), Column::text("b"), Column::text("c")]
        );
    }

    #[test]
    fn bare_names_accept_commas_and_newlines() {
        let cols = parse_structure("id, \"Name\"\n  email").unwrap();
        let names: Vec<_> = cols.iter().map(|c| c.name.as_str()).collect();
        assert_eq!(names, ["id", "Name", "email"]);
    }

    #[test]
    fn line_format_with_types_and_pk() {
        let cols = parse_structure("id:BIGINT:pk\nname:text\n\nmeta:jsonb\nflag").unwrap();
        assert_eq!(cols.len(), 4);
        assert_eq!(cols[0], Column::new("id", "bigint", true));
        assert_eq!(cols[1], Column::new("name", "text", false));
        assert_eq!(cols[2].data_type, "jsonb");
        assert_eq!(cols[3], Column::text("flag"));
    }

    #[test]
    fn line_format_pk_marker_is_case_sensitive() {
        let cols = parse_structure("a:int:primary\nb:int:PK").unwrap();
        assert!(cols[0].primary_key);
        assert!(!cols[1].primary_key);
    }

    #[test]
    fn line_format_missing_name_cites_line() {
        let err = parse_structure("id:int\n:text").unwrap_err();
        assert_eq!(
            err,
            GenError::invalid_structure("Missing column name in structure line 2.")
        );
    }

    #[test]
    fn json_structure() {
        let cols = parse_structure(
            r#"[{"name":"id","type":"INTEGER","pk":true},{"name":"`tags`"},{"name":"x","isPrimaryKey":1}]"#,
        )
        .unwrap();
        assert_eq!(cols[0], Column::new("id", "integer", true));
        assert_eq!(cols[1], Column::text("tags"));
        assert!(cols[2].primary_key);
    }

    #[test]
    fn json_structure_rejects_empty_array() {
        assert!(matches!(
            parse_structure("[]"),
            Err(GenError::InvalidStructure(_))
        ));
    }

    #[test]
    fn json_structure_rejects_nameless_column() {
        let err = parse_structure(r#"[{"name":"a"},{"type":"int"}]"#).unwrap_err();
        assert_eq!(err, GenError::InvalidColumnAtIndex { index: 1 });
    }

    #[test]
    fn json_structure_rejects_malformed_json() {
        assert!(matches!(
            parse_structure("[{\"name\":"),
            Err(GenError::InvalidStructure(_))
        ));
    }

    #[test]
    fn empty_structure_fails() {
        assert_eq!(
            parse_structure("  \n "),
            Err(GenError::EmptyInput(InputKind::Structure))
        );
    }

    #[test]
    fn numeric_detection() {
        assert!(Column::new("n", "BIGSERIAL", false).is_numeric());
        assert!(Column::new("n", "double precision", false).is_numeric());
        assert!(!Column::text("n").is_numeric());
    }
}
