use serde::Deserialize;
use std::fmt;

/// Target SQL flavor.
///
/// Controls the identifier quote character and whether JSON values get a
/// `::json`/`::jsonb` cast.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Dialect {
    #[default]
    #[serde(alias = "postgres")]
    Postgresql,
    Mysql,
}

impl Dialect {
    /// Parse a dialect name as accepted on the command line and in config files.
    pub fn from_name(name: &str) -> Option<Self> {
        match name.trim().to_ascii_lowercase().as_str() {
            "postgresql" | "postgres" | "pg" => Some(Self::Postgresql),
            "mysql" => Some(Self::Mysql),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Postgresql => "postgresql",
            Self::Mysql => "mysql",
        }
    }

    pub(crate) fn quote_char(self) -> char {
        match self {
            Self::Postgresql => '"',
            Self::Mysql => '`',
        }
    }
}

impl fmt::Display for Dialect {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_name_accepts_aliases() {
        assert_eq!(Dialect::from_name("PostgreSQL"), Some(Dialect::Postgresql));
        assert_eq!(Dialect::from_name("pg"), Some(Dialect::Postgresql));
        assert_eq!(Dialect::from_name(" mysql "), Some(Dialect::Mysql));
        assert_eq!(Dialect::from_name("sqlite"), None);
    }
}
