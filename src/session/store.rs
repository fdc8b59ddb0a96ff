use std::path::{Path, PathBuf};

use anyhow::Context as _;

use crate::foundation::error::{LoopError, LoopResult};
use crate::session::snapshot::SessionSnapshot;

/// A named, timestamped snapshot as kept in a store.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SessionRecord {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub timestamp_ms: u64,
    #[serde(flatten)]
    pub snapshot: SessionSnapshot,
}

impl SessionRecord {
    /// New record stamped with the current wall-clock time.
    pub fn new(id: impl Into<String>, name: impl Into<String>, snapshot: SessionSnapshot) -> Self {
        let timestamp_ms = std::time::SystemTime::now()
            .duration_since(std::time::UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0);
        Self {
            id: id.into(),
            name: name.into(),
            timestamp_ms,
            snapshot,
        }
    }
}

/// Key-value persistence for sessions, keyed by id.
pub trait SessionStore {
    fn get(&self, id: &str) -> LoopResult<Option<SessionRecord>>;
    /// Insert or replace the record with the same id.
    fn put(&mut self, record: SessionRecord) -> LoopResult<()>;
    /// Returns whether a record was removed.
    fn delete(&mut self, id: &str) -> LoopResult<bool>;
    fn list(&self) -> LoopResult<Vec<SessionRecord>>;
}

/// Store backed by a `Vec`, in insertion order.
#[derive(Clone, Debug, Default)]
pub struct MemorySessionStore {
    records: Vec<SessionRecord>,
}

impl MemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self, id: &str) -> LoopResult<Option<SessionRecord>> {
        Ok(self.records.iter().find(|r| r.id == id).cloned())
    }

    fn put(&mut self, record: SessionRecord) -> LoopResult<()> {
        match self.records.iter_mut().find(|r| r.id == record.id) {
            Some(existing) => *existing = record,
            None => self.records.push(record),
        }
        Ok(())
    }

    fn delete(&mut self, id: &str) -> LoopResult<bool> {
        let before = self.records.len();
        self.records.retain(|r| r.id != id);
        Ok(self.records.len() != before)
    }

    fn list(&self) -> LoopResult<Vec<SessionRecord>> {
        Ok(self.records.clone())
    }
}

/// One pretty-printed JSON file per session in a directory.
#[derive(Clone, Debug)]
pub struct JsonDirStore {
    dir: PathBuf,
}

impl JsonDirStore {
    pub fn open(dir: impl Into<PathBuf>) -> LoopResult<Self> {
        let dir = dir.into();
        std::fs::create_dir_all(&dir)
            .with_context(|| format!("failed to create session directory '{}'", dir.display()))?;
        Ok(Self { dir })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    fn path_for(&self, id: &str) -> LoopResult<PathBuf> {
        let valid = !id.is_empty()
            && id
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_');
        if !valid {
            return Err(LoopError::validation(format!("invalid session id '{id}'")));
        }
        Ok(self.dir.join(format!("{id}.json")))
    }

    fn read(path: &Path) -> LoopResult<SessionRecord> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("failed to read session '{}'", path.display()))?;
        let mut record: SessionRecord = serde_json::from_str(&text)?;
        record.snapshot = record.snapshot.normalized();
        Ok(record)
    }
}

impl SessionStore for JsonDirStore {
    fn get(&self, id: &str) -> LoopResult<Option<SessionRecord>> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(None);
        }
        Self::read(&path).map(Some)
    }

    fn put(&mut self, record: SessionRecord) -> LoopResult<()> {
        let path = self.path_for(&record.id)?;
        let json = serde_json::to_string_pretty(&record)?;
        std::fs::write(&path, json)
            .with_context(|| format!("failed to write session '{}'", path.display()))?;
        tracing::debug!(id = %record.id, path = %path.display(), "session saved");
        Ok(())
    }

    fn delete(&mut self, id: &str) -> LoopResult<bool> {
        let path = self.path_for(id)?;
        if !path.exists() {
            return Ok(false);
        }
        std::fs::remove_file(&path)
            .with_context(|| format!("failed to delete session '{}'", path.display()))?;
        Ok(true)
    }

    /// Oldest first; unreadable files are skipped with a warning.
    fn list(&self) -> LoopResult<Vec<SessionRecord>> {
        let entries = std::fs::read_dir(&self.dir)
            .with_context(|| format!("failed to list '{}'", self.dir.display()))?;
        let mut out = Vec::new();
        for entry in entries {
            let path = entry.context("failed to read directory entry")?.path();
            if path.extension().and_then(|e| e.to_str()) != Some("json") {
                continue;
            }
            match Self::read(&path) {
                Ok(record) => out.push(record),
                Err(err) => tracing::warn!(path = %path.display(), %err, "skipping session file"),
            }
        }
        out.sort_by(|a, b| a.timestamp_ms.cmp(&b.timestamp_ms).then_with(|| a.id.cmp(&b.id)));
        Ok(out)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/session/store.rs"]
mod tests;
