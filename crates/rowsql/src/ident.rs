//! SQL identifier normalization and quoting.
//!
//! Names read from user input may arrive wrapped in `'…'`, `"…"` or `` `…` ``;
//! [`normalize_identifier`] strips one matching pair. Rendering is controlled by
//! [`IdentQuoting`]:
//!
//! - `Always`: wrap each part in the dialect quote character (`"` for PostgreSQL,
//!   `` ` `` for MySQL) and escape embedded quotes by doubling them
//! - `Never`: emit the normalized name as-is
//!
//! # Example
//! ```
//! use rowsql::{Dialect, IdentQuoting, quote_table_name};
//!
//! let t = quote_table_name("public.users", Dialect::Postgresql, IdentQuoting::Always);
//! assert_eq!(t, r#""public"."users""#);
//! ```

use crate::dialect::Dialect;
use serde::Deserialize;

/// How identifiers are rendered in generated SQL.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum IdentQuoting {
    /// Quote every identifier part.
    #[default]
    Always,
    /// Pass normalized names through unquoted.
    Never,
}

impl IdentQuoting {
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "always" => Some(Self::Always),
            "never" | "none" => Some(Self::Never),
            _ => None,
        }
    }
}

const QUOTE_CHARS: [char; 3] = ['\'', '"', '`'];

/// Trim `raw` and strip one surrounding pair of matching quote characters.
pub fn normalize_identifier(raw: &str) -> &str {
    let trimmed = raw.trim();
    let mut chars = trimmed.chars();
    let (Some(first), Some(last)) = (chars.next(), chars.next_back()) else {
        // Zero or one character. A lone quote character is an empty quoted name.
        return if trimmed.len() == 1 && trimmed.starts_with(&QUOTE_CHARS[..]) {
            ""
        } else {
            trimmed
        };
    };
    if first == last && QUOTE_CHARS.contains(&first) {
        chars.as_str().trim()
    } else {
        trimmed
    }
}

/// Render a single identifier part.
pub fn quote_ident(name: &str, dialect: Dialect, quoting: IdentQuoting) -> String {
    match quoting {
        IdentQuoting::Never => name.to_string(),
        IdentQuoting::Always => {
            let q = dialect.quote_char();
            let mut out = String::with_capacity(name.len() + 2);
            out.push(q);
            for ch in name.chars() {
                if ch == q {
                    out.push(q);
                }
                out.push(ch);
            }
            out.push(q);
            out
        }
    }
}

/// Render a possibly schema-qualified table name (`schema.table`).
///
/// Each dot-separated part is trimmed and normalized before quoting.
pub fn quote_table_name(name: &str, dialect: Dialect, quoting: IdentQuoting) -> String {
    name.split('.')
        .map(|part| quote_ident(normalize_identifier(part), dialect, quoting))
        .collect::<Vec<_>>()
        .join(".")
}
