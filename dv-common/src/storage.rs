//! Key-value persistence backends
//!
//! The site keeps two kinds of client state: a durable key-value store (the
//! browser's local storage) and cookies. Both implement [`KeyValueStore`] so
//! consent and theme code can treat them uniformly.

use std::collections::BTreeMap;
use std::sync::Mutex;

use crate::{Error, Result};

/// Minimal string-to-string store
///
/// Every method may fail with [`Error::StorageUnavailable`] when the backend
/// is disabled or full; callers decide whether that matters.
pub trait KeyValueStore: Send + Sync {
    /// Backend name for log messages
    fn name(&self) -> &str;

    fn get(&self, key: &str) -> Result<Option<String>>;

    fn set(&self, key: &str, value: &str) -> Result<()>;
}

/// In-process durable store
///
/// Stands in for browser local storage. Can be created disabled (every call
/// fails) or with an entry quota to reproduce quota errors.
#[derive(Debug)]
pub struct MemoryStore {
    entries: Mutex<BTreeMap<String, String>>,
    available: bool,
    max_entries: Option<usize>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self {
            entries: Mutex::new(BTreeMap::new()),
            available: true,
            max_entries: None,
        }
    }

    /// Store pre-populated from a snapshot (e.g. reported by a client)
    pub fn with_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        let store = Self::new();
        if let Ok(mut map) = store.entries.lock() {
            map.extend(entries.into_iter().map(|(k, v)| (k.into(), v.into())));
        }
        store
    }

    /// Store whose every operation fails, like storage disabled by the user
    pub fn unavailable() -> Self {
        Self {
            available: false,
            ..Self::new()
        }
    }

    /// Store that rejects new keys beyond `max_entries`
    pub fn with_quota(max_entries: usize) -> Self {
        Self {
            max_entries: Some(max_entries),
            ..Self::new()
        }
    }

    pub fn is_available(&self) -> bool {
        self.available
    }

    /// Copy of all entries, in key order
    pub fn entries(&self) -> Vec<(String, String)> {
        self.entries
            .lock()
            .map(|map| map.iter().map(|(k, v)| (k.clone(), v.clone())).collect())
            .unwrap_or_default()
    }

    fn check_available(&self) -> Result<()> {
        if self.available {
            Ok(())
        } else {
            Err(Error::storage(self.name(), "storage is disabled"))
        }
    }
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl KeyValueStore for MemoryStore {
    fn name(&self) -> &str {
        "local-storage"
    }

    fn get(&self, key: &str) -> Result<Option<String>> {
        self.check_available()?;
        let map = self
            .entries
            .lock()
            .map_err(|_| Error::storage(self.name(), "lock poisoned"))?;
        Ok(map.get(key).cloned())
    }

    fn set(&self, key: &str, value: &str) -> Result<()> {
        self.check_available()?;
        let mut map = self
            .entries
            .lock()
            .map_err(|_| Error::storage(self.name(), "lock poisoned"))?;

        if let Some(max) = self.max_entries {
            if !map.contains_key(key) && map.len() >= max {
                return Err(Error::storage(self.name(), "quota exceeded"));
            }
        }

        map.insert(key.to_string(), value.to_string());
        Ok(())
    }
}
