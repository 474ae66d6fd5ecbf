// Key-value storage backends for the snapshot cache.
// The file store keeps one JSON file per key and replaces it atomically.

use std::collections::HashMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::error::Result;

use super::paths;

/// String key-value storage the cache gate reads from and writes to.
pub trait KeyValueStore {
    /// Value stored under `key`, or `None` when unset.
    fn get(&self, key: &str) -> Result<Option<String>>;

    /// Replace the value stored under `key`.
    fn set(&mut self, key: &str, value: &str) -> Result<()>;
}

/// Stores each key as `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStore {
    dir: PathBuf,
}

impl FileStore {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Store rooted at the platform cache directory, if the platform has one.
    pub fn open_default() -> Option<Self> {
        paths::cache_dir().map(Self::new)
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<String>> {
        read_text(&paths::entry_path(&self.dir, key))
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        write_text(&paths::entry_path(&self.dir, key), value)
    }
}

impl KeyValueStore for HashMap<String, String> {
    fn get(&self, key: &str) -> Result<Option<String>> {
        Ok(HashMap::get(self, key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> Result<()> {
        self.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

/// Write text to a file, replacing any previous content in one step.
pub fn write_text(path: &Path, text: &str) -> Result<()> {
    // Ensure parent directory exists
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)?;
    }

    // Write atomically via temp file
    let temp_path = path.with_extension("tmp");
    let mut file = fs::File::create(&temp_path)?;
    file.write_all(text.as_bytes())?;
    file.sync_all()?;
    fs::rename(&temp_path, path)?;

    Ok(())
}

/// Read text from a file, `None` if it does not exist.
pub fn read_text(path: &Path) -> Result<Option<String>> {
    if !path.exists() {
        return Ok(None);
    }

    let contents = fs::read_to_string(path)?;
    Ok(Some(contents))
}
