use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use anyhow::{Context, Result, anyhow};
use serde_json::{Map, Value};

/// Key every notes record is stored under.
pub const NOTES_KEY: &str = "graph-notes";

/// Key/value blob store behind the notes server.
pub trait RecordStorage: Send + Sync {
    fn get(&self, key: &str) -> Result<Option<Value>>;
    fn put(&self, key: &str, value: Value) -> Result<()>;
}

/// One JSON document on disk mapping keys to blobs. Writes go through a
/// sibling temp file that is renamed over the original.
pub struct FileStorage {
    path: PathBuf,
    lock: Mutex<()>,
}

impl FileStorage {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let storage = Self {
            path: path.into(),
            lock: Mutex::new(()),
        };
        storage.read_all()?;
        Ok(storage)
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_all(&self) -> Result<Map<String, Value>> {
        if !self.path.exists() {
            return Ok(Map::new());
        }

        let raw = fs::read_to_string(&self.path)
            .with_context(|| format!("failed to read {}", self.path.display()))?;
        if raw.trim().is_empty() {
            return Ok(Map::new());
        }
        serde_json::from_str(&raw)
            .with_context(|| format!("{} is not a JSON object", self.path.display()))
    }

    fn write_all(&self, records: &Map<String, Value>) -> Result<()> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        fs::create_dir_all(dir)
            .with_context(|| format!("failed to create {}", dir.display()))?;

        let mut file = tempfile::NamedTempFile::new_in(dir)
            .with_context(|| format!("failed to create a temp file in {}", dir.display()))?;
        serde_json::to_writer_pretty(&mut file, records).context("failed to encode records")?;
        file.flush().context("failed to flush records")?;
        file.persist(&self.path)
            .with_context(|| format!("failed to replace {}", self.path.display()))?;
        Ok(())
    }
}

impl RecordStorage for FileStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("storage lock poisoned"))?;
        Ok(self.read_all()?.remove(key))
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        let _guard = self.lock.lock().map_err(|_| anyhow!("storage lock poisoned"))?;
        let mut records = self.read_all()?;
        records.insert(key.to_owned(), value);
        self.write_all(&records)
    }
}

/// Process-lifetime storage; nothing survives a restart.
#[derive(Default)]
pub struct MemoryStorage {
    records: Mutex<HashMap<String, Value>>,
}

impl RecordStorage for MemoryStorage {
    fn get(&self, key: &str) -> Result<Option<Value>> {
        let records = self.records.lock().map_err(|_| anyhow!("storage lock poisoned"))?;
        Ok(records.get(key).cloned())
    }

    fn put(&self, key: &str, value: Value) -> Result<()> {
        let mut records = self.records.lock().map_err(|_| anyhow!("storage lock poisoned"))?;
        records.insert(key.to_owned(), value);
        Ok(())
    }
}
