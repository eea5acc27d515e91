//! Single-call generation: structure text + row text -> SQL.

use crate::dialect::Dialect;
use crate::error::{GenError, GenResult, InputKind};
use crate::ident::IdentQuoting;
use crate::rows::{RowFormat, parse_rows};
use crate::statement::{QueryType, build_insert_query, build_update_query};
use crate::structure::parse_structure;

/// Rendering and parsing knobs.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct GenerateOptions {
    pub dialect: Dialect,
    pub quoting: IdentQuoting,
    pub row_format: RowFormat,
}

/// Everything needed to generate one statement batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GenerateRequest {
    pub query_type: QueryType,
    pub table_name: String,
    pub structure: String,
    pub rows: String,
    pub options: GenerateOptions,
}

impl GenerateRequest {
    pub fn new(
        query_type: QueryType,
        table_name: impl Into<String>,
        structure: impl Into<String>,
        rows: impl Into<String>,
    ) -> Self {
        Self {
            query_type,
            table_name: table_name.into(),
            structure: structure.into(),
            rows: rows.into(),
            options: GenerateOptions::default(),
        }
    }

    pub fn insert(
        table_name: impl Into<String>,
        structure: impl Into<String>,
        rows: impl Into<String>,
    ) -> Self {
        Self::new(QueryType::Insert, table_name, structure, rows)
    }

    pub fn update(
        table_name: impl Into<String>,
        structure: impl Into<String>,
        rows: impl Into<String>,
    ) -> Self {
        Self::new(QueryType::Update, table_name, structure, rows)
    }

    pub fn dialect(mut self, dialect: Dialect) -> Self {
        self.options.dialect = dialect;
        self
    }

    pub fn quoting(mut self, quoting: IdentQuoting) -> Self {
        self.options.quoting = quoting;
        self
    }

    pub fn row_format(mut self, row_format: RowFormat) -> Self {
        self.options.row_format = row_format;
        self
    }
}

/// Generated SQL plus what went into it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Statement {
    pub sql: String,
    pub query_type: QueryType,
    pub row_count: usize,
    pub column_count: usize,
}

/// Parse, validate and render in one call. Any failure aborts the whole batch.
pub fn generate_statement(request: &GenerateRequest) -> GenResult<Statement> {
    let table = request.table_name.trim();
    if table.is_empty() {
        return Err(GenError::EmptyInput(InputKind::TableName));
    }

    let columns = parse_structure(&request.structure)?;
    let rows = parse_rows(&request.rows, &columns, request.options.row_format)?;

    let sql = match request.query_type {
        QueryType::Insert => build_insert_query(table, &columns, &rows, &request.options)?,
        QueryType::Update => build_update_query(table, &columns, &rows, &request.options)?,
    };

    tracing::debug!(
        target: "rowsql",
        query_type = %request.query_type,
        dialect = %request.options.dialect,
        rows = rows.len(),
        columns = columns.len(),
        "generated statement"
    );

    Ok(Statement {
        sql,
        query_type: request.query_type,
        row_count: rows.len(),
        column_count: columns.len(),
    })
}
