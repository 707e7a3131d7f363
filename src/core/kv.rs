//! Key-value backends.
//!
//! Every store in this crate reads and writes whole JSON documents under a
//! handful of fixed keys. The backend only has to move bytes around; the
//! [`JsonStore`] extension adds the serde layer on top of any backend.

use std::cell::RefCell;
use std::collections::BTreeMap;
use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::core::errors::StoreError;

/// One write inside a [`KeyValueStore::commit`] batch.
#[derive(Debug, Clone, PartialEq)]
pub enum BatchOp {
    Set(String, Vec<u8>),
    Delete(String),
}

impl BatchOp {
    pub fn set_json<T: Serialize + ?Sized>(key: &str, value: &T) -> Result<Self, StoreError> {
        Ok(BatchOp::Set(key.to_string(), serde_json::to_vec(value)?))
    }
}

pub trait KeyValueStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>>;

    fn set(&self, key: &str, value: &[u8]) -> Result<()>;

    fn delete(&self, key: &str) -> Result<()>;

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Applies the writes in order. Backends that can swap their whole state
    /// at once override this so the batch lands together or not at all.
    fn commit(&self, batch: Vec<BatchOp>) -> Result<()> {
        for op in batch {
            match op {
                BatchOp::Set(key, value) => self.set(&key, &value)?,
                BatchOp::Delete(key) => self.delete(&key)?,
            }
        }
        Ok(())
    }
}

pub trait JsonStore: KeyValueStore {
    fn get_json<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, StoreError> {
        match self.get(key)? {
            Some(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            None => Ok(None),
        }
    }

    fn set_json<T: Serialize + ?Sized>(&self, key: &str, value: &T) -> Result<(), StoreError> {
        let bytes = serde_json::to_vec(value)?;
        self.set(key, &bytes)?;
        Ok(())
    }
}

impl<S: KeyValueStore + ?Sized> JsonStore for S {}

// === In-memory backend ===

#[derive(Debug, Default)]
pub struct MemoryStore {
    entries: RefCell<BTreeMap<String, Vec<u8>>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn keys(&self) -> Vec<String> {
        self.entries.borrow().keys().cloned().collect()
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.entries
            .borrow_mut()
            .insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.entries.borrow_mut().remove(key);
        Ok(())
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.borrow().contains_key(key))
    }

    fn commit(&self, batch: Vec<BatchOp>) -> Result<()> {
        let mut entries = self.entries.borrow_mut();
        for op in batch {
            match op {
                BatchOp::Set(key, value) => {
                    entries.insert(key, value);
                }
                BatchOp::Delete(key) => {
                    entries.remove(&key);
                }
            }
        }
        Ok(())
    }
}

// === File backend ===

/// Keeps the whole namespace as one JSON object on disk. The file is read
/// once on open and rewritten after every write.
#[derive(Debug)]
pub struct FileStore {
    path: PathBuf,
    entries: RefCell<BTreeMap<String, serde_json::Value>>,
}

impl FileStore {
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let entries = if path.exists() {
            let data = fs::read_to_string(&path)
                .with_context(|| format!("Failed to read data file {}", path.display()))?;
            if data.trim().is_empty() {
                BTreeMap::new()
            } else {
                serde_json::from_str(&data)
                    .with_context(|| format!("Failed to parse data file {}", path.display()))?
            }
        } else {
            BTreeMap::new()
        };

        Ok(Self {
            path,
            entries: RefCell::new(entries),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn apply(entries: &mut BTreeMap<String, serde_json::Value>, op: BatchOp) -> Result<()> {
        match op {
            BatchOp::Set(key, value) => {
                let value: serde_json::Value = serde_json::from_slice(&value)
                    .with_context(|| format!("Value for {} is not JSON", key))?;
                entries.insert(key, value);
            }
            BatchOp::Delete(key) => {
                entries.remove(&key);
            }
        }
        Ok(())
    }

    fn save_to_disk(&self, entries: &BTreeMap<String, serde_json::Value>) -> Result<()> {
        let json = serde_json::to_string_pretty(entries).context("Failed to serialize data")?;
        fs::write(&self.path, json)
            .with_context(|| format!("Failed to write data file {}", self.path.display()))?;
        Ok(())
    }
}

impl KeyValueStore for FileStore {
    fn get(&self, key: &str) -> Result<Option<Vec<u8>>> {
        match self.entries.borrow().get(key) {
            Some(value) => Ok(Some(serde_json::to_vec(value)?)),
            None => Ok(None),
        }
    }

    fn set(&self, key: &str, value: &[u8]) -> Result<()> {
        self.commit(vec![BatchOp::Set(key.to_string(), value.to_vec())])
    }

    fn delete(&self, key: &str) -> Result<()> {
        self.commit(vec![BatchOp::Delete(key.to_string())])
    }

    fn exists(&self, key: &str) -> Result<bool> {
        Ok(self.entries.borrow().contains_key(key))
    }

    fn commit(&self, batch: Vec<BatchOp>) -> Result<()> {
        // Staged on a copy so a failed write leaves memory and disk in step.
        let mut staged = self.entries.borrow().clone();
        for op in batch {
            Self::apply(&mut staged, op)?;
        }
        self.save_to_disk(&staged)?;
        *self.entries.borrow_mut() = staged;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!(
            "devhub-kv-{}-{}-{}.json",
            name,
            std::process::id(),
            chrono::Utc::now().timestamp_nanos_opt().unwrap_or_default()
        ))
    }

    #[test]
    fn memory_store_round_trips_json() {
        let store = MemoryStore::new();
        store.set_json("k", &vec!["a", "b"]).unwrap();

        let value: Option<Vec<String>> = store.get_json("k").unwrap();
        assert_eq!(value, Some(vec!["a".to_string(), "b".to_string()]));
        assert!(store.exists("k").unwrap());

        store.delete("k").unwrap();
        assert!(!store.exists("k").unwrap());
        assert_eq!(store.get_json::<Vec<String>>("k").unwrap(), None);
    }

    #[test]
    fn corrupt_value_is_a_codec_error() {
        let store = MemoryStore::new();
        store.set("k", b"not json").unwrap();

        let err = store.get_json::<Vec<String>>("k").unwrap_err();
        assert!(matches!(err, StoreError::Codec(_)));
    }

    #[test]
    fn memory_commit_applies_every_op() {
        let store = MemoryStore::new();
        store.set("gone", b"1").unwrap();

        store
            .commit(vec![
                BatchOp::set_json("a", &1).unwrap(),
                BatchOp::set_json("b", &2).unwrap(),
                BatchOp::Delete("gone".to_string()),
            ])
            .unwrap();

        assert_eq!(store.keys(), vec!["a".to_string(), "b".to_string()]);
    }

    #[test]
    fn file_store_persists_across_reopen() {
        let path = temp_path("reopen");
        {
            let store = FileStore::open(&path).unwrap();
            store.set_json("users", &vec![1, 2, 3]).unwrap();
        }

        let reopened = FileStore::open(&path).unwrap();
        assert_eq!(
            reopened.get_json::<Vec<u32>>("users").unwrap(),
            Some(vec![1, 2, 3])
        );
        let _ = fs::remove_file(&path);
    }

    #[test]
    fn file_store_rejects_batch_with_non_json_value() {
        let path = temp_path("reject");
        let store = FileStore::open(&path).unwrap();
        store.set_json("a", &1).unwrap();

        let result = store.commit(vec![
            BatchOp::set_json("a", &2).unwrap(),
            BatchOp::Set("b".to_string(), b"{broken".to_vec()),
        ]);

        assert!(result.is_err());
        assert_eq!(store.get_json::<u32>("a").unwrap(), Some(1));
        assert!(!store.exists("b").unwrap());
        let _ = fs::remove_file(&path);
    }
}
