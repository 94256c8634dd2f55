use std::{
    collections::BTreeMap,
    fs,
    path::{Path, PathBuf},
    sync::Mutex,
};

use crate::{
    errors::PropFlowError,
    utils::paths::{ensure_dir, write_atomic, PathResolver},
};

use super::{KeyValueStore, Result};

type Entries = BTreeMap<String, String>;

/// File-backed store: one pretty-printed JSON object holding every key.
///
/// Each mutation rewrites the whole file through a temp file and rename. A file
/// that does not parse is treated as empty and replaced on the next write.
pub struct JsonStorage {
    path: PathBuf,
    write_lock: Mutex<()>,
}

impl JsonStorage {
    pub fn new(root: Option<PathBuf>) -> Result<Self> {
        let base = PathResolver::resolve_base(root);
        ensure_dir(&base)?;
        Ok(Self::at_path(PathResolver::local_storage_file_in(&base)))
    }

    pub fn new_default() -> Result<Self> {
        Self::new(None)
    }

    pub fn at_path(path: PathBuf) -> Self {
        Self {
            path,
            write_lock: Mutex::new(()),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read_entries(&self) -> Result<Entries> {
        if !self.path.exists() {
            return Ok(Entries::new());
        }
        let data = fs::read_to_string(&self.path)?;
        if data.trim().is_empty() {
            return Ok(Entries::new());
        }
        match serde_json::from_str(&data) {
            Ok(entries) => Ok(entries),
            Err(err) => {
                tracing::warn!(
                    path = %self.path.display(),
                    error = %err,
                    "local storage file is unreadable; starting empty"
                );
                Ok(Entries::new())
            }
        }
    }

    fn write_entries(&self, entries: &Entries) -> Result<()> {
        let json = serde_json::to_string_pretty(entries)?;
        write_atomic(&self.path, &json)
    }

    fn mutate(&self, apply: impl FnOnce(&mut Entries)) -> Result<()> {
        let _guard = self
            .write_lock
            .lock()
            .map_err(|_| PropFlowError::Storage("local storage lock poisoned".into()))?;
        let mut entries = self.read_entries()?;
        apply(&mut entries);
        self.write_entries(&entries)
    }
}

impl KeyValueStore for JsonStorage {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(self.read_entries()?.remove(key))
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.insert(key.to_string(), value.to_string());
        })
    }

    fn remove(&self, key: &str) -> Result<()> {
        self.mutate(|entries| {
            entries.remove(key);
        })
    }

    fn clear(&self) -> Result<()> {
        self.mutate(Entries::clear)
    }
}
