use rowsql::{HistoryStore, StoreError};
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

/// History store backed by one JSON object file (`{"key": "value", ...}`).
///
/// The file is read on every access and rewritten atomically on every write.
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> BTreeMap<String, String> {
        let Ok(raw) = std::fs::read_to_string(&self.path) else {
            return BTreeMap::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            tracing::warn!(path = %self.path.display(), error = %e, "ignoring unreadable history file");
            BTreeMap::new()
        })
    }
}

impl HistoryStore for FileStore {
    fn get(&self, key: &str) -> Option<String> {
        self.read_all().remove(key)
    }

    fn set(&mut self, key: &str, value: &str) -> Result<(), StoreError> {
        let mut entries = self.read_all();
        entries.insert(key.to_string(), value.to_string());
        let content = serde_json::to_string_pretty(&entries)
            .map_err(|e| StoreError::new(format!("failed to encode history: {e}")))?;
        write_atomic(&self.path, &content)
    }
}

fn write_atomic(path: &Path, content: &str) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent).map_err(|e| {
            StoreError::new(format!("failed to create directory {}: {e}", parent.display()))
        })?;
    }

    let tmp = tmp_path(path);
    std::fs::write(&tmp, content)
        .map_err(|e| StoreError::new(format!("failed to write {}: {e}", tmp.display())))?;
    std::fs::rename(&tmp, path).map_err(|e| {
        StoreError::new(format!(
            "failed to rename {} -> {}: {e}",
            tmp.display(),
            path.display()
        ))
    })?;
    Ok(())
}

fn tmp_path(path: &Path) -> PathBuf {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => path.with_extension(format!("{ext}.tmp")),
        None => path.with_extension("tmp"),
    }
}
