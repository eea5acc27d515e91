//! Recently used table names and structures.
//!
//! Entries live in a [`HistoryStore`] as JSON arrays of strings, newest first,
//! de-duplicated and capped. Storage problems never fail a generation: unreadable
//! data reads as an empty list and write failures are logged and dropped.

use std::collections::HashMap;
use thiserror::Error;

pub const TABLE_NAME_HISTORY_KEY: &str = "rowsql.tableNameHistory";
pub const TABLE_STRUCTURE_HISTORY_KEY: &str = "rowsql.tableStructureHistory";
pub const MAX_TABLE_NAME_HISTORY: usize = 10;
pub const MAX_TABLE_STRUCTURE_HISTORY: usize = 10;
pub const MAX_STRUCTURE_SUGGESTIONS: usize = 5;
pub const MAX_SUGGESTION_LABEL_LENGTH: usize = 50;

/// History store write failure.
#[derive(Debug, Error)]
#[error("history store error: {0}")]
pub struct StoreError(pub String);

impl StoreError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// A string key-value store.
pub trait HistoryStore {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError>;
}

impl<T: HistoryStore + ?Sized> HistoryStore for &mut T {
    fn get(&self, key: &str) -> Option<String> {
        (**self).get(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        (**self).set(key, value)
    }
}

/// In-process store, used by tests and embedders that persist elsewhere.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl HistoryStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// A remembered structure, ready for display.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Suggestion {
    /// Possibly truncated text for display.
    pub label: String,
    /// Full structure text.
    pub value: String,
}

/// Shorten `value` to [`MAX_SUGGESTION_LABEL_LENGTH`] characters plus `...`.
pub fn truncate_label(value: &str) -> String {
    match value.char_indices().nth(MAX_SUGGESTION_LABEL_LENGTH) {
        Some((cut, _)) => format!("{}...", &value[..cut]),
        None => value.to_string(),
    }
}

#[derive(Debug, Clone)]
pub struct History<S> {
    store: S,
}

impl<S: HistoryStore> History<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_inner(self) -> S {
        self.store
    }

    pub fn table_names(&self) -> Vec<String> {
        self.read_list(TABLE_NAME_HISTORY_KEY, MAX_TABLE_NAME_HISTORY)
    }

    pub fn structures(&self) -> Vec<String> {
        self.read_list(TABLE_STRUCTURE_HISTORY_KEY, MAX_TABLE_STRUCTURE_HISTORY)
    }

    /// The most recent structures with display labels.
    pub fn structure_suggestions(&self) -> Vec<Suggestion> {
        self.structures()
            .into_iter()
            .take(MAX_STRUCTURE_SUGGESTIONS)
            .map(|value| Suggestion {
                label: truncate_label(&value),
                value,
            })
            .collect()
    }

    /// Record a table name, returning the updated list.
    pub fn remember_table_name(&mut self, name: &str) -> Vec<String> {
        self.remember(TABLE_NAME_HISTORY_KEY, MAX_TABLE_NAME_HISTORY, name)
    }

    /// Record structure text, returning the updated list.
    pub fn remember_structure(&mut self, structure: &str) -> Vec<String> {
        self.remember(TABLE_STRUCTURE_HISTORY_KEY, MAX_TABLE_STRUCTURE_HISTORY, structure)
    }

    fn read_list(&self, key: &str, cap: usize) -> Vec<String> {
        let Some(raw) = self.store.get(key).filter(|raw| !raw.is_empty()) else {
            return Vec::new();
        };
        let Ok(serde_json::Value::Array(items)) = serde_json::from_str::<serde_json::Value>(&raw) else {
            tracing::debug!(target: "rowsql", key, "ignoring malformed history entry");
            return Vec::new();
        };
        items
            .into_iter()
            .filter_map(|item| match item {
                serde_json::Value::String(s) => Some(s.trim().to_string()),
                serde_json::Value::Number(n) => Some(n.to_string()),
                _ => None,
            })
            .filter(|s| !s.is_empty())
            .take(cap)
            .collect()
    }

    fn remember(&mut self, key: &str, cap: usize, value: &str) -> Vec<String> {
        let value = value.trim();
        let current = self.read_list(key, cap);
        if value.is_empty() {
            return current;
        }

        let mut list = Vec::with_capacity(cap);
        list.push(value.to_string());
        list.extend(current.into_iter().filter(|item| item != value));
        list.truncate(cap);

        match serde_json::to_string(&list) {
            Ok(raw) => {
                if let Err(e) = self.store.set(key, &raw) {
                    tracing::warn!(target: "rowsql", key, error = %e, "ignoring history write failure");
                }
            }
            Err(e) => {
                tracing::warn!(target: "rowsql", key, error = %e, "failed to encode history");
            }
        }
        list
    }
}
