//! Error types for rowsql

use std::fmt;
use thiserror::Error;

/// Result type alias for rowsql operations
pub type GenResult<T> = Result<T, GenError>;

/// Which user-supplied input was missing.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputKind {
    TableName,
    Structure,
    Rows,
}

impl fmt::Display for InputKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::TableName => "Table name",
            Self::Structure => "Table structure",
            Self::Rows => "Rows input",
        })
    }
}

/// Errors raised while turning structure and row input into SQL.
///
/// Every variant is caused by malformed input; nothing here is transient.
/// Row numbers are 1-based.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GenError {
    /// A required input was blank
    #[error("{0} is required.")]
    EmptyInput(InputKind),

    /// The structure text could not be understood
    #[error("{0}")]
    InvalidStructure(String),

    /// An element of a JSON structure array has no usable name
    #[error("Invalid column at index {index} in table structure.")]
    InvalidColumnAtIndex { index: usize },

    /// Strict JSON row parsing was requested and the input is not JSON
    #[error("Rows input must be a JSON object or a JSON array of objects.")]
    RowsMustBeJson,

    /// The rows JSON array is empty
    #[error("Rows array must contain at least one object.")]
    EmptyRowsArray,

    /// An element of the rows JSON array is not an object
    #[error("Row at index {index} must be a JSON object.")]
    InvalidRowAtIndex { index: usize },

    /// Plain-text values do not divide evenly into rows
    #[error(
        "Rows input does not align with table structure. Expected values in multiples of {expected_multiple}."
    )]
    MisalignedRows { expected_multiple: usize },

    /// No row mentions any structure column
    #[error("No row columns match the provided table structure.")]
    NoMatchingColumns,

    /// An UPDATE row mentions no structure column
    #[error("Row {row}: no columns from table structure found.")]
    NoColumnsInRow { row: usize },

    /// No key column could be chosen for an UPDATE row
    #[error("Row {row}: missing key column. Add primaryKey in structure or include \"id\".")]
    MissingKeyColumn { row: usize },

    /// Every column of an UPDATE row is a key column
    #[error("Row {row}: no updatable column found besides key column.")]
    NoUpdatableColumns { row: usize },

    /// A number that has no SQL literal form (NaN or infinite)
    #[error("Invalid numeric value for column \"{column}\".")]
    InvalidNumeric { column: String },
}

impl GenError {
    /// Create a structure error from a message
    pub fn invalid_structure(message: impl Into<String>) -> Self {
        Self::InvalidStructure(message.into())
    }

    /// The 1-based row number this error refers to, if any.
    pub fn row(&self) -> Option<usize> {
        match self {
            Self::NoColumnsInRow { row }
            | Self::MissingKeyColumn { row }
            | Self::NoUpdatableColumns { row } => Some(*row),
            _ => None,
        }
    }
}
