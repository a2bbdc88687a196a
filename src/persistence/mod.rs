//! Key-value persistence
//!
//! The game persists two string values (high score and mute flag). They are
//! read once at startup and written through immediately on change. Browser
//! builds back this with LocalStorage (see `platform::storage`).

use std::collections::HashMap;

/// String-valued key-value store
pub trait KeyValueStore {
    /// Read a value. Missing keys and read failures both yield `None`.
    fn get(&self, key: &str) -> Option<String>;

    /// Write a value. Failures are logged by the implementation, never surfaced.
    fn set(&mut self, key: &str, value: &str);
}

/// In-memory store for native runs and tests
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    entries: HashMap<String, String>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-seeded store
    pub fn with_entries<'a>(entries: impl IntoIterator<Item = (&'a str, &'a str)>) -> Self {
        Self {
            entries: entries
                .into_iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        }
    }
}

impl KeyValueStore for MemoryStore {
    fn get(&self, key: &str) -> Option<String> {
        self.entries.get(key).cloned()
    }

    fn set(&mut self, key: &str, value: &str) {
        self.entries.insert(key.to_string(), value.to_string());
    }
}
