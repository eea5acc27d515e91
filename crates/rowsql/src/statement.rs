//! INSERT and UPDATE statement building.

use crate::error::{GenError, GenResult};
use crate::generate::GenerateOptions;
use crate::ident::{quote_ident, quote_table_name};
use crate::rows::Row;
use crate::structure::Column;
use crate::value::format_value;
use serde::Deserialize;
use std::fmt;

/// Kind of statement to generate.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QueryType {
    #[default]
    Insert,
    Update,
}

impl QueryType {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "insert" => Some(Self::Insert),
            "update" => Some(Self::Update),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Insert => "insert",
            Self::Update => "update",
        }
    }
}

impl fmt::Display for QueryType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Why a set of key columns was chosen for an UPDATE row.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeySource {
    /// Columns declared as primary key.
    PrimaryKey,
    /// A column named `id`.
    IdColumn,
    /// A column whose name ends in `id`.
    IdSuffix,
    /// No better candidate: the first column present in the row.
    ///
    /// The WHERE clause may match more than one row if that column is not unique.
    FirstAvailable,
}

/// Key columns for one UPDATE row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct KeyColumns<'a> {
    pub columns: Vec<&'a Column>,
    pub source: KeySource,
}

/// Infer the WHERE columns for `row`. Only columns present in the row qualify.
///
/// Tried in order: declared primary keys, `id`, `*id`, first present column.
pub fn pick_key_columns<'a>(columns: &'a [Column], row: &Row) -> Option<KeyColumns<'a>> {
    let present = move || columns.iter().filter(move |c| row.contains(&c.name));

    let primary: Vec<&Column> = present().filter(|c| c.primary_key).collect();
    if !primary.is_empty() {
        return Some(KeyColumns {
            columns: primary,
            source: KeySource::PrimaryKey,
        });
    }

    if let Some(col) = present().find(|c| c.name.trim().eq_ignore_ascii_case("id")) {
        return Some(KeyColumns {
            columns: vec![col],
            source: KeySource::IdColumn,
        });
    }

    if let Some(col) = present().find(|c| c.name.trim().to_ascii_lowercase().ends_with("id")) {
        return Some(KeyColumns {
            columns: vec![col],
            source: KeySource::IdSuffix,
        });
    }

    present().next().map(|col| KeyColumns {
        columns: vec![col],
        source: KeySource::FirstAvailable,
    })
}

/// Build one multi-row `INSERT`.
///
/// The column list holds every structure column that at least one row defines,
/// in structure order. Rows missing one of those columns get `NULL`.
pub fn build_insert_query(
    table: &str,
    columns: &[Column],
    rows: &[Row],
    options: &GenerateOptions,
) -> GenResult<String> {
    let present: Vec<&Column> = columns
        .iter()
        .filter(|c| rows.iter().any(|row| row.contains(&c.name)))
        .collect();
    if present.is_empty() {
        return Err(GenError::NoMatchingColumns);
    }

    let table_sql = quote_table_name(table, options.dialect, options.quoting);
    let column_sql = present
        .iter()
        .map(|c| quote_ident(&c.name, options.dialect, options.quoting))
        .collect::<Vec<_>>()
        .join(", ");

    let mut tuples = Vec::with_capacity(rows.len());
    for row in rows {
        let values = present
            .iter()
            .map(|c| format_value(row.get(&c.name), c, options.dialect))
            .collect::<GenResult<Vec<_>>>()?;
        tuples.push(format!("({})", values.join(", ")));
    }

    Ok(format!(
        "INSERT INTO {table_sql} ({column_sql}) VALUES\n{};",
        tuples.join(",\n")
    ))
}

/// Build one `UPDATE` per row, joined by newlines.
pub fn build_update_query(
    table: &str,
    columns: &[Column],
    rows: &[Row],
    options: &GenerateOptions,
) -> GenResult<String> {
    let table_sql = quote_table_name(table, options.dialect, options.quoting);
    let mut statements = Vec::with_capacity(rows.len());

    for (index, row) in rows.iter().enumerate() {
        let row_no = index + 1;

        let available: Vec<&Column> = columns.iter().filter(|c| row.contains(&c.name)).collect();
        if available.is_empty() {
            return Err(GenError::NoColumnsInRow { row: row_no });
        }

        let Some(keys) = pick_key_columns(columns, row) else {
            return Err(GenError::MissingKeyColumn { row: row_no });
        };
        if keys.source == KeySource::FirstAvailable {
            tracing::warn!(
                target: "rowsql",
                row = row_no,
                column = %keys.columns[0].name,
                "no primary key or id column; using first available column as UPDATE key"
            );
        } else {
            tracing::debug!(target: "rowsql", row = row_no, source = ?keys.source, "picked UPDATE key columns");
        }

        let set_columns: Vec<&Column> = available
            .into_iter()
            .filter(|c| !keys.columns.iter().any(|k| k.name == c.name))
            .collect();
        if set_columns.is_empty() {
            return Err(GenError::NoUpdatableColumns { row: row_no });
        }

        let set_sql = assignments(&set_columns, row, options)?.join(", ");
        let where_sql = assignments(&keys.columns, row, options)?.join(" AND ");
        statements.push(format!("UPDATE {table_sql} SET {set_sql} WHERE {where_sql};"));
    }

    Ok(statements.join("\n"))
}

fn assignments(columns: &[&Column], row: &Row, options: &GenerateOptions) -> GenResult<Vec<String>> {
    columns
        .iter()
        .map(|c| {
            let value = format_value(row.get(&c.name), c, options.dialect)?;
            Ok(format!(
                "{} = {value}",
                quote_ident(&c.name, options.dialect, options.quoting)
            ))
        })
        .collect()
}
