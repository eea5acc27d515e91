//! SQL literal rendering.

use crate::dialect::Dialect;
use crate::error::{GenError, GenResult};
use crate::rows::Value;
use crate::structure::Column;
use regex::Regex;
use std::sync::OnceLock;

/// Returns `true` if a column type should receive bare numeric literals.
pub fn is_numeric_type(data_type: &str) -> bool {
    static NUMERIC_TYPE_RE: OnceLock<Regex> = OnceLock::new();
    NUMERIC_TYPE_RE
        .get_or_init(|| {
            Regex::new(r"(?i)int|serial|numeric|decimal|real|double|float|money")
                .expect("invalid built-in numeric type regex")
        })
        .is_match(data_type)
}

fn is_numeric_literal(text: &str) -> bool {
    static NUMERIC_LITERAL_RE: OnceLock<Regex> = OnceLock::new();
    NUMERIC_LITERAL_RE
        .get_or_init(|| {
            Regex::new(r"^-?[0-9]+(\.[0-9]+)?$").expect("invalid built-in numeric literal regex")
        })
        .is_match(text)
}

/// Escape a string for use inside a single-quoted SQL literal.
pub fn escape_sql_string(s: &str) -> String {
    s.replace('\'', "''")
}

fn invalid_numeric(column: &Column) -> GenError {
    GenError::InvalidNumeric {
        column: column.name.clone(),
    }
}

fn quote_sql_string(s: &str) -> String {
    format!("'{}'", escape_sql_string(s))
}

/// Render `value` as a SQL literal for `column`. `None` (absent) renders as `NULL`.
///
/// - JSON objects/arrays are serialized and quoted; on PostgreSQL a `json`/`jsonb`
///   column type adds the matching cast
/// - text destined for a numeric column is emitted bare when it looks like an
///   integer or decimal
pub fn format_value(value: Option<&Value>, column: &Column, dialect: Dialect) -> GenResult<String> {
    let Some(value) = value else {
        return Ok("NULL".to_string());
    };

    match value {
        Value::Null => Ok("NULL".to_string()),
        Value::Bool(true) => Ok("TRUE".to_string()),
        Value::Bool(false) => Ok("FALSE".to_string()),
        // Numbers keep their source text, so `1e400` arrives here intact.
        Value::Number(n) => match n.as_f64() {
            Some(f) if f.is_finite() => Ok(n.to_string()),
            _ => Err(invalid_numeric(column)),
        },
        Value::Float(f) => {
            if !f.is_finite() {
                return Err(invalid_numeric(column));
            }
            Ok(f.to_string())
        }
        Value::Json(json) => {
            let literal = quote_sql_string(&json.to_string());
            if dialect == Dialect::Postgresql {
                if column.data_type.contains("jsonb") {
                    return Ok(format!("{literal}::jsonb"));
                }
                if column.data_type.contains("json") {
                    return Ok(format!("{literal}::json"));
                }
            }
            Ok(literal)
        }
        Value::Text(s) => {
            if column.is_numeric() {
                let numeric = s.trim();
                if is_numeric_literal(numeric) {
                    return Ok(numeric.to_string());
                }
            }
            Ok(quote_sql_string(s))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn text_col() -> Column {
        Column::text("c")
    }

    fn fmt(value: impl Into<Value>, column: &Column) -> String {
        format_value(Some(&value.into()), column, Dialect::Postgresql).unwrap()
    }

    #[test]
    fn null_and_absent() {
        assert_eq!(format_value(None, &text_col(), Dialect::Mysql).unwrap(), "NULL");
        assert_eq!(fmt(Value::Null, &text_col()), "NULL");
    }

    #[test]
    fn booleans() {
        assert_eq!(fmt(true, &text_col()), "TRUE");
        assert_eq!(fmt(false, &text_col()), "FALSE");
    }

    #[test]
    fn numbers() {
        assert_eq!(fmt(42i64, &text_col()), "42");
        assert_eq!(fmt(Value::from(json!(-1.25)), &text_col()), "-1.25");
        assert_eq!(fmt(0.5f64, &text_col()), "0.5");
    }

    #[test]
    fn non_finite_float_fails() {
        let col = Column::new("price", "numeric", false);
        let err = format_value(Some(&Value::Float(f64::NAN)), &col, Dialect::Postgresql).unwrap_err();
        assert_eq!(
            err,
            GenError::InvalidNumeric {
                column: "price".into()
            }
        );
        assert!(format_value(Some(&Value::Float(f64::INFINITY)), &col, Dialect::Mysql).is_err());
    }

    #[test]
    fn overflowing_json_number_fails() {
        let col = Column::new("price", "numeric", false);
        let n: serde_json::Number = serde_json::from_str("1e400").unwrap();
        let err = format_value(Some(&Value::Number(n)), &col, Dialect::Postgresql).unwrap_err();
        assert!(matches!(err, GenError::InvalidNumeric { column } if column == "price"));

        let big: serde_json::Number = serde_json::from_str("123456789012345678901234567890").unwrap();
        assert_eq!(
            format_value(Some(&Value::Number(big)), &col, Dialect::Postgresql).unwrap(),
            "123456789012345678901234567890"
        );
    }

    #[test]
    fn strings_are_quoted_and_escaped() {
        assert_eq!(fmt("O'Brien", &text_col()), "'O''Brien'");
        assert_eq!(fmt("''", &text_col()), "''''''");
        assert_eq!(fmt("plain", &text_col()), "'plain'");
    }

    #[test]
    fn numeric_column_unquotes_numeric_text() {
        let col = Column::new("n", "integer", false);
        assert_eq!(fmt("42", &col), "42");
        assert_eq!(fmt(" -3.50 ", &col), "-3.50");
        assert_eq!(fmt("42abc", &col), "'42abc'");
        assert_eq!(fmt("1e3", &col), "'1e3'");
        assert_eq!(fmt("42", &text_col()), "'42'");
    }

    #[test]
    fn json_casts_on_postgres_only() {
        let jsonb = Column::new("meta", "jsonb", false);
        let json_col = Column::new("meta", "JSON", false);
        let value = Value::from(json!({"name": "O'Hara", "tags": [1, 2]}));

        assert_eq!(
            format_value(Some(&value), &jsonb, Dialect::Postgresql).unwrap(),
            r#"'{"name":"O''Hara","tags":[1,2]}'::jsonb"#
        );
        assert_eq!(
            format_value(Some(&value), &json_col, Dialect::Postgresql).unwrap(),
            r#"'{"name":"O''Hara","tags":[1,2]}'::json"#
        );
        assert_eq!(
            format_value(Some(&value), &jsonb, Dialect::Mysql).unwrap(),
            r#"'{"name":"O''Hara","tags":[1,2]}'"#
        );
    }

    #[test]
    fn json_key_order_is_preserved() {
        let value = Value::from(json!({"z": 1, "a": 2}));
        assert_eq!(fmt(value, &text_col()), r#"'{"z":1,"a":2}'"#);
    }

    #[test]
    fn numeric_type_pattern() {
        for t in ["int", "bigint", "smallserial", "NUMERIC(10,2)", "real", "money", "float8"] {
            assert!(is_numeric_type(t), "{t}");
        }
        for t in ["text", "varchar(20)", "jsonb", "uuid", "date"] {
            assert!(!is_numeric_type(t), "{t}");
        }
    }
}
