//! Persistent key-value storage backends.
//!
//! The store serializes the whole task collection to a single string and
//! writes it under one fixed key. This module defines that contract and two
//! backends: a JSON file per key for normal use, and an in-memory map for
//! tests.

use std::collections::HashMap;
use std::fs::{self, File};
use std::io::{self, Read, Write};
use std::path::{Path, PathBuf};

/// String key-value store. One fixed key holds the serialized collection.
pub trait Storage {
    /// Read the value stored under `key`, or `None` if it was never written.
    fn get(&self, key: &str) -> io::Result<Option<String>>;

    /// Write `value` under `key`, replacing any previous value.
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

/// File-backed storage: each key maps to `<dir>/<key>.json`.
#[derive(Debug, Clone)]
pub struct FileStorage {
    dir: PathBuf,
}

impl FileStorage {
    pub fn new(dir: &Path) -> Self {
        FileStorage {
            dir: dir.to_path_buf(),
        }
    }

    /// Path of the file backing `key`.
    pub fn path_for(&self, key: &str) -> PathBuf {
        self.dir.join(format!("{key}.json"))
    }
}

impl Storage for FileStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        let path = self.path_for(key);
        if !path.exists() {
            return Ok(None);
        }
        let mut buf = String::new();
        File::open(&path)?.read_to_string(&mut buf)?;
        Ok(Some(buf))
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        fs::create_dir_all(&self.dir)?;
        // Atomic-ish write via temp + rename.
        let path = self.path_for(key);
        let tmp = path.with_extension("json.tmp");
        let mut f = File::create(&tmp)?;
        f.write_all(value.as_bytes())?;
        f.flush()?;
        fs::rename(tmp, path)?;
        Ok(())
    }
}

/// In-memory storage used by tests and scripted runs.
#[derive(Debug, Default, Clone)]
pub struct MemoryStorage {
    entries: HashMap<String, String>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        MemoryStorage::default()
    }

    /// Seed a value before the store loads, e.g. to simulate a prior session.
    pub fn with_entry(key: &str, value: &str) -> Self {
        let mut s = MemoryStorage::new();
        s.entries.insert(key.to_string(), value.to_string());
        s
    }
}

impl Storage for MemoryStorage {
    fn get(&self, key: &str) -> io::Result<Option<String>> {
        Ok(self.entries.get(key).cloned())
    }

    fn set(&mut self, key: &str, value: &str) -> io::Result<()> {
        self.entries.insert(key.to_string(), value.to_string());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn scratch_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!(
            "taskflow-storage-{}-{}",
            tag,
            std::process::id()
        ));
        let _ = fs::remove_dir_all(&dir);
        dir
    }

    #[test]
    fn file_storage_round_trip() {
        let dir = scratch_dir("roundtrip");
        let mut storage = FileStorage::new(&dir);
        assert_eq!(storage.get("tasks").unwrap(), None);
        storage.set("tasks", "[1,2,3]").unwrap();
        assert_eq!(storage.get("tasks").unwrap().as_deref(), Some("[1,2,3]"));
        storage.set("tasks", "[]").unwrap();
        assert_eq!(storage.get("tasks").unwrap().as_deref(), Some("[]"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn file_storage_keys_are_independent() {
        let dir = scratch_dir("keys");
        let mut storage = FileStorage::new(&dir);
        storage.set("a", "one").unwrap();
        storage.set("b", "two").unwrap();
        assert_eq!(storage.get("a").unwrap().as_deref(), Some("one"));
        assert_eq!(storage.get("b").unwrap().as_deref(), Some("two"));
        let _ = fs::remove_dir_all(&dir);
    }

    #[test]
    fn memory_storage_round_trip() {
        let mut storage = MemoryStorage::new();
        assert_eq!(storage.get("tasks").unwrap(), None);
        storage.set("tasks", "hello").unwrap();
        assert_eq!(storage.get("tasks").unwrap().as_deref(), Some("hello"));
    }
}
