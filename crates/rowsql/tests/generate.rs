use rowsql::{
    Column, Dialect, GenError, GenerateRequest, IdentQuoting, RowFormat, Value, format_value,
    generate_statement, parse_structure,
};
use serde_json::json;

#[test]
fn insert_from_json_rows() {
    let req = GenerateRequest::insert("table", "id:bigint:pk\nname:text", r#"[{"id":1,"name":"x"}]"#);
    let stmt = generate_statement(&req).unwrap();
    assert_eq!(stmt.sql, "INSERT INTO \"table\" (\"id\", \"name\") VALUES\n(1, 'x');");
}

#[test]
fn update_from_json_object() {
    let req = GenerateRequest::update("table", "id:bigint:pk\nname:text", r#"{"id":1,"name":"y"}"#);
    let stmt = generate_statement(&req).unwrap();
    assert_eq!(stmt.sql, "UPDATE \"table\" SET \"name\" = 'y' WHERE \"id\" = 1;");
}

#[test]
fn insert_json_structure_with_jsonb_column() {
    let structure = r#"[
        {"name": "id", "type": "serial", "primaryKey": true},
        {"name": "payload", "type": "JSONB"}
    ]"#;
    let rows = r#"[{"id": 1, "payload": {"k": "it's"}}, {"id": 2, "payload": null}]"#;
    let stmt = generate_statement(&GenerateRequest::insert("public.events", structure, rows)).unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO \"public\".\"events\" (\"id\", \"payload\") VALUES\n\
         (1, '{\"k\":\"it''s\"}'::jsonb),\n\
         (2, NULL);"
    );
}

#[test]
fn mysql_dialect_skips_json_cast_and_uses_backticks() {
    let req = GenerateRequest::insert("events", "id:int\nmeta:json", r#"{"id":"3","meta":[1,2]}"#)
        .dialect(Dialect::Mysql);
    let stmt = generate_statement(&req).unwrap();
    assert_eq!(stmt.sql, "INSERT INTO `events` (`id`, `meta`) VALUES\n(3, '[1,2]');");
}

#[test]
fn pass_through_quoting() {
    let req = GenerateRequest::update("users", "id name", "1\tAda\n2\tGrace")
        .quoting(IdentQuoting::Never);
    let stmt = generate_statement(&req).unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE users SET name = 'Ada' WHERE id = '1';\nUPDATE users SET name = 'Grace' WHERE id = '2';"
    );
}

#[test]
fn blank_line_grouped_rows() {
    let rows = "1\nAda\ntrue\n\n2\nGrace\nNULL\n";
    let req = GenerateRequest::insert("users", "id:int\nname\nactive:boolean", rows);
    let stmt = generate_statement(&req).unwrap();
    assert_eq!(
        stmt.sql,
        "INSERT INTO \"users\" (\"id\", \"name\", \"active\") VALUES\n(1, 'Ada', TRUE),\n(2, 'Grace', NULL);"
    );
    assert_eq!(stmt.row_count, 2);
}

#[test]
fn misaligned_flat_values() {
    let req = GenerateRequest::insert("t", "a b c", "1\n2\n3\n4");
    assert_eq!(
        generate_statement(&req).unwrap_err(),
        GenError::MisalignedRows {
            expected_multiple: 3
        }
    );
}

#[test]
fn overflowing_json_number_is_invalid_numeric() {
    let req = GenerateRequest::insert("t", "data", r#"{"data": 1e400}"#);
    assert_eq!(
        generate_statement(&req).unwrap_err(),
        GenError::InvalidNumeric {
            column: "data".into()
        }
    );

    let req = GenerateRequest::insert("t", "id:int:pk\nname", r#"[{"id": 1e400, "name": "x"}]"#);
    assert_eq!(
        generate_statement(&req).unwrap_err(),
        GenError::InvalidNumeric {
            column: "id".into()
        }
    );

    let req = GenerateRequest::update("t", "id:int:pk\nname", r#"{"id": 1, "name": -1e400}"#);
    assert_eq!(
        generate_statement(&req).unwrap_err(),
        GenError::InvalidNumeric {
            column: "name".into()
        }
    );
}

#[test]
fn strict_json_mode() {
    let req = GenerateRequest::insert("t", "a b", "1\n2").row_format(RowFormat::Json);
    assert_eq!(generate_statement(&req).unwrap_err(), GenError::RowsMustBeJson);
}

#[test]
fn update_without_key_like_column_uses_first_available() {
    let req = GenerateRequest::update("people", "email name", r#"{"email":"a@b.c","name":"A"}"#);
    let stmt = generate_statement(&req).unwrap();
    assert_eq!(
        stmt.sql,
        "UPDATE \"people\" SET \"name\" = 'A' WHERE \"email\" = 'a@b.c';"
    );
}

#[test]
fn failure_produces_no_partial_output() {
    let rows = r#"[{"id":1,"name":"a"},{"id":2}]"#;
    let req = GenerateRequest::update("t", "id:int:pk\nname", rows);
    assert_eq!(
        generate_statement(&req).unwrap_err(),
        GenError::NoUpdatableColumns { row: 2 }
    );
}

#[test]
fn numeric_column_text_values() {
    let col = Column::new("n", "integer", false);
    let fmt = |v: &str| format_value(Some(&Value::from(v)), &col, Dialect::Postgresql).unwrap();
    assert_eq!(fmt("42"), "42");
    assert_eq!(fmt("42abc"), "'42abc'");
}

/// Read a literal produced by `format_value` back into a value.
fn parse_literal(sql: &str) -> serde_json::Value {
    let sql = sql
        .strip_suffix("::jsonb")
        .or_else(|| sql.strip_suffix("::json"))
        .unwrap_or(sql);
    match sql {
        "NULL" => serde_json::Value::Null,
        "TRUE" => json!(true),
        "FALSE" => json!(false),
        quoted if quoted.starts_with('\'') => {
            let inner = &quoted[1..quoted.len() - 1];
            serde_json::Value::String(inner.replace("''", "'"))
        }
        number => serde_json::from_str(number).unwrap(),
    }
}

#[test]
fn literals_read_back_to_original_values() {
    let text = Column::text("c");
    let jsonb = Column::new("c", "jsonb", false);

    for original in [
        json!(null),
        json!(true),
        json!(false),
        json!(42),
        json!(-7.25),
        json!("plain"),
        json!("O'Brien"),
        json!("''"),
    ] {
        let sql = format_value(Some(&Value::from(original.clone())), &text, Dialect::Postgresql).unwrap();
        assert_eq!(parse_literal(&sql), original, "{sql}");
    }

    let object = json!({"name": "O'Brien", "n": [1, 2.5, null]});
    let sql = format_value(Some(&Value::from(object.clone())), &jsonb, Dialect::Postgresql).unwrap();
    let serde_json::Value::String(inner) = parse_literal(&sql) else {
        panic!("expected quoted literal: {sql}");
    };
    assert_eq!(serde_json::from_str::<serde_json::Value>(&inner).unwrap(), object);
}

#[test]
fn escaping_doubles_each_apostrophe_once() {
    let sql = format_value(Some(&Value::from("O'Brien")), &Column::text("c"), Dialect::Mysql).unwrap();
    assert_eq!(sql, "'O''Brien'");
    assert_eq!(sql.matches('\'').count(), 4);
}

#[test]
fn bare_name_structure() {
    let cols = parse_structure("a b c").unwrap();
    assert_eq!(cols.len(), 3);
    assert!(cols.iter().all(|c| c.data_type == "text" && !c.primary_key));
    assert_eq!(
        cols.iter().map(|c| c.name.as_str()).collect::<Vec<_>>(),
        ["a", "b", "c"]
    );
}
