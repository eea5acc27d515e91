//! Generate-and-remember workflow over injected collaborators.
//!
//! [`Workflow`] ties [`generate_statement`] to a [`HistoryStore`] and a
//! [`Clipboard`], and reports a user-facing [`Status`] for each action. History is
//! written only after a generation fully succeeds.

use crate::clipboard::Clipboard;
use crate::error::GenResult;
use crate::generate::{GenerateRequest, Statement, generate_statement};
use crate::history::{History, HistoryStore};

pub const GENERATED_MESSAGE: &str = "Query generated successfully.";
pub const NOTHING_TO_COPY_MESSAGE: &str = "Generate a query before copying.";
pub const COPIED_MESSAGE: &str = "Query copied to clipboard.";
pub const COPY_FAILED_MESSAGE: &str = "Clipboard permission denied. Copy manually from output box.";

/// A one-line result message for the user.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Status {
    pub message: String,
    pub is_error: bool,
}

impl Status {
    pub fn success(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: false,
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
            is_error: true,
        }
    }
}

/// Result of [`Workflow::generate`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome {
    pub result: GenResult<Statement>,
    pub status: Status,
}

impl Outcome {
    /// Generated SQL, or `None` if generation failed.
    pub fn sql(&self) -> Option<&str> {
        self.result.as_ref().ok().map(|s| s.sql.as_str())
    }
}

pub struct Workflow<S, C> {
    history: History<S>,
    clipboard: C,
    record_history: bool,
}

impl<S: HistoryStore, C: Clipboard> Workflow<S, C> {
    pub fn new(store: S, clipboard: C) -> Self {
        Self {
            history: History::new(store),
            clipboard,
            record_history: true,
        }
    }

    /// Turn history recording on or off (reads still work).
    pub fn record_history(mut self, enabled: bool) -> Self {
        self.record_history = enabled;
        self
    }

    pub fn history(&self) -> &History<S> {
        &self.history
    }

    pub fn generate(&mut self, request: &GenerateRequest) -> Outcome {
        match generate_statement(request) {
            Ok(statement) => {
                if self.record_history {
                    self.history.remember_table_name(&request.table_name);
                    self.history.remember_structure(&request.structure);
                }
                Outcome {
                    result: Ok(statement),
                    status: Status::success(GENERATED_MESSAGE),
                }
            }
            Err(e) => {
                tracing::debug!(target: "rowsql", error = %e, "generation failed");
                Outcome {
                    status: Status::error(e.to_string()),
                    result: Err(e),
                }
            }
        }
    }

    /// Copy previously generated SQL. Failure only changes the status.
    pub fn copy(&mut self, sql: &str) -> Status {
        let sql = sql.trim();
        if sql.is_empty() {
            return Status::error(NOTHING_TO_COPY_MESSAGE);
        }
        match self.clipboard.write_text(sql) {
            Ok(()) => Status::success(COPIED_MESSAGE),
            Err(e) => {
                tracing::debug!(target: "rowsql", error = %e, "clipboard write failed");
                Status::error(COPY_FAILED_MESSAGE)
            }
        }
    }
}
