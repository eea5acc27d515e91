//! # rowsql
//!
//! Turn a hand-written column structure and ad hoc row data into `INSERT` or
//! `UPDATE` statement text. No database connection is involved.
//!
//! ## Inputs
//!
//! - **Structure**: a JSON array of column objects, a bare list of names, or one
//!   `name:type:pk` declaration per line
//! - **Rows**: JSON (object, array, or one object per line), blank-line separated
//!   groups, tab-separated lines, or a flat list of values
//!
//! ## Example
//!
//! ```
//! use rowsql::{GenerateRequest, generate_statement};
//!
//! let req = GenerateRequest::update(
//!     "users",
//!     "id:bigint:pk\nname:text",
//!     r#"{"id": 1, "name": "O'Brien"}"#,
//! );
//! let stmt = generate_statement(&req)?;
//! assert_eq!(stmt.sql, r#"UPDATE "users" SET "name" = 'O''Brien' WHERE "id" = 1;"#);
//! # Ok::<(), rowsql::GenError>(())
//! ```

pub mod clipboard;
pub mod dialect;
pub mod error;
pub mod generate;
pub mod history;
pub mod ident;
pub mod rows;
pub mod statement;
pub mod structure;
pub mod value;
pub mod workflow;

pub use clipboard::{Clipboard, ClipboardError, NoClipboard};
pub use dialect::Dialect;
pub use error::{GenError, GenResult, InputKind};
pub use generate::{GenerateOptions, GenerateRequest, Statement, generate_statement};
pub use history::{History, HistoryStore, MemoryStore, StoreError, Suggestion};
pub use ident::{IdentQuoting, normalize_identifier, quote_ident, quote_table_name};
pub use rows::{Row, RowFormat, Value, parse_rows};
pub use statement::{
    KeyColumns, KeySource, QueryType, build_insert_query, build_update_query, pick_key_columns,
};
pub use structure::{Column, parse_structure};
pub use value::{escape_sql_string, format_value, is_numeric_type};
pub use workflow::{Outcome, Status, Workflow};
