/// Storage model and the key-value capability behind chrome.storage.local

use crate::error::HostError;
use crate::tab_data::SavedItem;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::cell::RefCell;
use std::collections::HashMap;

/// Key the whole collection is persisted under
pub const STORAGE_KEY: &str = "savedItems";

/// Insertion-ordered collection of saved items, persisted as a bare array
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SavedItems {
    pub items: Vec<SavedItem>,
}

impl SavedItems {
    pub fn new() -> Self {
        SavedItems { items: Vec::new() }
    }

    pub fn add_item(&mut self, item: SavedItem) {
        self.items.push(item);
    }

    /// Drops every item with this id. Returns whether anything was removed.
    pub fn remove_item(&mut self, item_id: &str) -> bool {
        let original_len = self.items.len();
        self.items.retain(|item| item.id != item_id);
        self.items.len() < original_len
    }

    /// Persisted items first, then local items the persisted list doesn't know about.
    pub fn merge_loaded(&mut self, loaded: SavedItems) {
        let mut merged = loaded.items;
        for item in self.items.drain(..) {
            if !merged.iter().any(|existing| existing.id == item.id) {
                merged.push(item);
            }
        }
        self.items = merged;
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn to_vec(&self) -> Vec<SavedItem> {
        self.items.clone()
    }
}

/// Durable key-value capability provided by the host
#[async_trait(?Send)]
pub trait StorageBackend {
    /// `Ok(None)` when nothing is stored under `key`.
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError>;
}

/// Storage that lives as long as the popup does
#[derive(Debug, Default)]
pub struct MemoryStorage {
    entries: RefCell<HashMap<String, Value>>,
}

impl MemoryStorage {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait(?Send)]
impl StorageBackend for MemoryStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        Ok(self.entries.borrow().get(key).cloned())
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        self.entries.borrow_mut().insert(key.to_string(), value);
        Ok(())
    }
}
