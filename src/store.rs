/// Item store: owns the saved items and writes every change through to storage

use crate::storage::{STORAGE_KEY, SavedItems, StorageBackend};
use crate::tab_data::SavedItem;
use std::cell::{Cell, RefCell};
use std::rc::Rc;
use uuid::Uuid;

pub struct ItemStore {
    backend: Rc<dyn StorageBackend>,
    items: RefCell<SavedItems>,
    clock: fn() -> i64,
    loaded: Cell<bool>,
    // Mutations made before the initial load resolved, not yet written
    dirty: Cell<bool>,
}

impl ItemStore {
    pub fn new(backend: Rc<dyn StorageBackend>) -> Self {
        Self::with_clock(backend, now_millis)
    }

    pub fn with_clock(backend: Rc<dyn StorageBackend>, clock: fn() -> i64) -> Self {
        ItemStore {
            backend,
            items: RefCell::new(SavedItems::new()),
            clock,
            loaded: Cell::new(false),
            dirty: Cell::new(false),
        }
    }

    /// Read-only copy of the current items
    pub fn snapshot(&self) -> Vec<SavedItem> {
        self.items.borrow().to_vec()
    }

    /// Load the persisted collection. Missing or unreadable data counts as empty.
    ///
    /// Items saved before this resolves are kept after the persisted ones,
    /// and the merged list is written back.
    pub async fn load(&self) -> Vec<SavedItem> {
        let loaded = match self.backend.get(STORAGE_KEY).await {
            Ok(Some(value)) => match serde_json::from_value::<SavedItems>(value) {
                Ok(items) => items,
                Err(e) => {
                    log::warn!("Ignoring unreadable {}: {}", STORAGE_KEY, e);
                    SavedItems::new()
                }
            },
            Ok(None) => SavedItems::new(),
            Err(e) => {
                log::warn!("Failed to read {}: {}", STORAGE_KEY, e);
                SavedItems::new()
            }
        };

        log::debug!("Loaded {} saved items", loaded.len());

        let merged = {
            let mut items = self.items.borrow_mut();
            if self.dirty.get() {
                items.merge_loaded(loaded);
            } else {
                *items = loaded;
            }
            items.clone()
        };
        self.loaded.set(true);

        if self.dirty.replace(false) {
            log::debug!("Writing {} items merged with early saves", merged.len());
            self.write_through(&merged).await;
        }
        merged.items
    }

    /// Append a new item for this page and note, then persist the full list.
    pub async fn append(&self, url: &str, title: &str, note: &str) -> SavedItem {
        let item = SavedItem::new(
            Uuid::new_v4().to_string(),
            url.to_string(),
            title.to_string(),
            note.to_string(),
            (self.clock)(),
        );

        let updated = {
            let mut items = self.items.borrow_mut();
            items.add_item(item.clone());
            items.clone()
        };

        log::debug!("Saved item {} ({} total)", item.id, updated.len());
        self.persist(&updated).await;
        item
    }

    /// Remove every item with this id, then persist the full list.
    /// An unknown id rewrites the unchanged list.
    pub async fn remove(&self, item_id: &str) -> Vec<SavedItem> {
        let updated = {
            let mut items = self.items.borrow_mut();
            if !items.remove_item(item_id) {
                log::debug!("No saved item with id {}", item_id);
            }
            items.clone()
        };

        self.persist(&updated).await;
        updated.items
    }

    // Before the first load, writing would clobber the persisted list
    async fn persist(&self, items: &SavedItems) {
        if self.loaded.get() {
            self.write_through(items).await;
        } else {
            log::debug!("Deferring write of {} items until load completes", items.len());
            self.dirty.set(true);
        }
    }

    async fn write_through(&self, items: &SavedItems) {
        let value = match serde_json::to_value(items) {
            Ok(value) => value,
            Err(e) => {
                log::error!("Failed to serialize saved items: {}", e);
                return;
            }
        };

        if let Err(e) = self.backend.set(STORAGE_KEY, value).await {
            log::error!("Failed to write {}: {}", STORAGE_KEY, e);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn now_millis() -> i64 {
    js_sys::Date::now() as i64
}

#[cfg(not(target_arch = "wasm32"))]
fn now_millis() -> i64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_millis() as i64)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::HostError;
    use crate::storage::MemoryStorage;
    use async_trait::async_trait;
    use futures::channel::oneshot;
    use futures::executor::block_on;
    use futures::future::join;
    use serde_json::{Value, json};

    fn fixed_clock() -> i64 {
        1698508200000
    }

    fn new_store() -> (Rc<MemoryStorage>, ItemStore) {
        let backend = Rc::new(MemoryStorage::new());
        let store = ItemStore::with_clock(backend.clone(), fixed_clock);
        (backend, store)
    }

    fn persisted(backend: &MemoryStorage) -> Vec<SavedItem> {
        let value = block_on(backend.get(STORAGE_KEY)).unwrap().unwrap();
        serde_json::from_value(value).unwrap()
    }

    fn seed(backend: &MemoryStorage, items: &[(&str, &str)]) {
        let items: Vec<SavedItem> = items
            .iter()
            .map(|(id, note)| {
                SavedItem::new(
                    id.to_string(),
                    String::new(),
                    String::new(),
                    note.to_string(),
                    0,
                )
            })
            .collect();
        block_on(backend.set(STORAGE_KEY, serde_json::to_value(items).unwrap())).unwrap();
    }

    fn ids(items: &[SavedItem]) -> Vec<&str> {
        items.iter().map(|item| item.id.as_str()).collect()
    }

    /// Backend whose every call fails
    struct BrokenStorage;

    #[async_trait(?Send)]
    impl StorageBackend for BrokenStorage {
        async fn get(&self, _key: &str) -> Result<Option<Value>, HostError> {
            Err(HostError::Bridge("storage unavailable".to_string()))
        }

        async fn set(&self, _key: &str, _value: Value) -> Result<(), HostError> {
            Err(HostError::Bridge("storage unavailable".to_string()))
        }
    }

    /// Backend whose `get` reads the stored value when called but
    /// resolves only once released, like chrome.storage.local.get
    struct SlowReadStorage {
        inner: MemoryStorage,
        release: RefCell<Option<oneshot::Receiver<()>>>,
    }

    #[async_trait(?Send)]
    impl StorageBackend for SlowReadStorage {
        async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
            let value = self.inner.get(key).await?;
            let release = self.release.borrow_mut().take();
            if let Some(release) = release {
                let _ = release.await;
            }
            Ok(value)
        }

        async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
            self.inner.set(key, value).await
        }
    }

    #[test]
    fn test_load_empty() {
        let (_, store) = new_store();

        assert!(block_on(store.load()).is_empty());
        assert!(store.snapshot().is_empty());
    }

    #[test]
    fn test_append_to_empty_store() {
        let (backend, store) = new_store();
        block_on(store.load());

        let item = block_on(store.append("https://example.com", "Example", "check later"));

        let items = store.snapshot();
        assert_eq!(items.len(), 1);
        assert_eq!(items[0], item);
        assert_eq!(item.url, "https://example.com");
        assert_eq!(item.title, "Example");
        assert_eq!(item.note, "check later");
        assert_eq!(item.created_at, 1698508200000);
        assert_eq!(persisted(&backend), items);
    }

    #[test]
    fn test_appends_preserve_order_and_count() {
        let (backend, store) = new_store();
        block_on(store.load());

        let notes = ["one", "two", "three", "four", "five"];
        let created: Vec<SavedItem> = notes
            .iter()
            .map(|note| block_on(store.append("", "", note)))
            .collect();

        let items = store.snapshot();
        assert_eq!(items.len(), notes.len());
        assert_eq!(items, created);
        assert_eq!(persisted(&backend), items);
    }

    #[test]
    fn test_same_tick_appends_get_distinct_ids() {
        let (_, store) = new_store();

        let first = block_on(store.append("https://example.com", "", "a"));
        let second = block_on(store.append("https://example.com", "", "b"));

        assert_eq!(first.created_at, second.created_at);
        assert_ne!(first.id, second.id);
    }

    #[test]
    fn test_remove_middle_item() {
        let (backend, store) = new_store();
        seed(&backend, &[("1", "A"), ("2", "B"), ("3", "C")]);
        block_on(store.load());

        let result = block_on(store.remove("2"));

        assert_eq!(ids(&result), vec!["1", "3"]);
        assert_eq!(result[0].note, "A");
        assert_eq!(result[1].note, "C");
        assert_eq!(persisted(&backend), result);
    }

    #[test]
    fn test_remove_unknown_id_is_noop_write() {
        let (backend, store) = new_store();
        seed(&backend, &[("1", "A"), ("2", "B")]);
        let before = block_on(store.load());

        let result = block_on(store.remove("missing"));

        assert_eq!(result, before);
        assert_eq!(persisted(&backend), before);
    }

    #[test]
    fn test_remove_twice_matches_remove_once() {
        let (backend, store) = new_store();
        seed(&backend, &[("1", "A"), ("2", "B"), ("3", "C")]);
        block_on(store.load());

        let once = block_on(store.remove("1"));
        let twice = block_on(store.remove("1"));

        assert_eq!(once, twice);
    }

    #[test]
    fn test_reload_returns_last_written_state() {
        let (backend, store) = new_store();
        block_on(store.load());
        let first = block_on(store.append("https://a.example", "A", ""));
        block_on(store.append("https://b.example", "B", "note"));
        block_on(store.append("", "", "standalone"));
        block_on(store.remove(&first.id));
        let expected = store.snapshot();

        let reopened = ItemStore::with_clock(backend.clone(), fixed_clock);
        let loaded = block_on(reopened.load());

        assert_eq!(loaded, expected);
        assert_eq!(reopened.snapshot(), expected);
    }

    #[test]
    fn test_load_legacy_blob() {
        let backend = Rc::new(MemoryStorage::new());
        let legacy = json!([
            {"id": "1698508200000", "url": "https://rust-lang.org", "title": "Rust", "note": "", "createdAt": 1698508200000.0},
            {"id": "1698508260000", "url": "", "title": "", "note": "todo", "createdAt": 1698508260000.0}
        ]);
        block_on(backend.set(STORAGE_KEY, legacy)).unwrap();
        let store = ItemStore::new(backend);

        let items = block_on(store.load());

        assert_eq!(ids(&items), vec!["1698508200000", "1698508260000"]);
        assert_eq!(items[1].created_at, 1698508260000);
    }

    #[test]
    fn test_load_unreadable_blob_as_empty() {
        let backend = Rc::new(MemoryStorage::new());
        block_on(backend.set(STORAGE_KEY, json!({"not": "a list"}))).unwrap();
        let store = ItemStore::new(backend);

        assert!(block_on(store.load()).is_empty());
    }

    #[test]
    fn test_load_corrupt_timestamp_as_empty() {
        let backend = Rc::new(MemoryStorage::new());
        block_on(backend.set(STORAGE_KEY, json!([{"id": "1", "createdAt": 1e300}]))).unwrap();
        let store = ItemStore::new(backend);

        assert!(block_on(store.load()).is_empty());
    }

    #[test]
    fn test_save_before_load_resolves_is_kept() {
        let (backend, store) = new_store();
        seed(&backend, &[("1", "A")]);

        let early = block_on(store.append("", "", "typed fast"));
        assert_eq!(ids(&persisted(&backend)), vec!["1"]);

        let items = block_on(store.load());

        assert_eq!(ids(&items), vec!["1", early.id.as_str()]);
        assert_eq!(persisted(&backend), items);
    }

    #[test]
    fn test_save_while_read_in_flight_is_persisted_with_old_items() {
        let (release_tx, release_rx) = oneshot::channel();
        let backend = Rc::new(SlowReadStorage {
            inner: MemoryStorage::new(),
            release: RefCell::new(Some(release_rx)),
        });
        seed(&backend.inner, &[("A", "older note")]);
        let store = ItemStore::with_clock(backend.clone(), fixed_clock);

        let (items, early) = block_on(join(store.load(), async {
            let early = store.append("", "", "typed fast").await;
            let _ = release_tx.send(());
            early
        }));

        assert_eq!(ids(&items), vec!["A", early.id.as_str()]);
        assert_eq!(store.snapshot(), items);
        assert_eq!(persisted(&backend.inner), items);
    }

    #[test]
    fn test_writes_resume_after_load() {
        let (backend, store) = new_store();
        seed(&backend, &[("1", "A")]);
        block_on(store.load());

        let item = block_on(store.append("https://example.com", "", ""));

        assert_eq!(ids(&persisted(&backend)), vec!["1", item.id.as_str()]);
    }

    #[test]
    fn test_broken_backend_keeps_memory_state() {
        let store = ItemStore::with_clock(Rc::new(BrokenStorage), fixed_clock);

        assert!(block_on(store.load()).is_empty());
        let item = block_on(store.append("https://example.com", "", ""));
        assert_eq!(store.snapshot(), vec![item.clone()]);

        let result = block_on(store.remove(&item.id));
        assert!(result.is_empty());
    }
}
