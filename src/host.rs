/// Host capabilities: chrome.storage / chrome.tabs through the JS bridge,
/// with in-memory fallbacks when the popup runs outside an extension.

use crate::error::HostError;
use crate::storage::{MemoryStorage, StorageBackend};
use crate::tab_data::TabContext;
use async_trait::async_trait;
use serde::Serialize;
use serde_json::Value;
use std::rc::Rc;
use wasm_bindgen::prelude::*;

// Import JS bridge functions
#[wasm_bindgen(module = "/popup.js")]
extern "C" {
    fn hasStorageApi() -> bool;

    fn hasTabsApi() -> bool;

    #[wasm_bindgen(catch)]
    async fn getStorage(key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setStorage(key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn getActiveTab() -> Result<JsValue, JsValue>;
}

/// Source of the focused tab's metadata
#[async_trait(?Send)]
pub trait TabSource {
    async fn active_tab(&self) -> Result<Option<TabContext>, HostError>;
}

/// chrome.storage.local
pub struct HostStorage;

#[async_trait(?Send)]
impl StorageBackend for HostStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        let value_js = getStorage(key).await.map_err(HostError::bridge)?;

        if value_js.is_null() || value_js.is_undefined() {
            Ok(None)
        } else {
            Ok(Some(serde_wasm_bindgen::from_value(value_js)?))
        }
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        // Plain objects, not Maps: chrome.storage can't persist a Map
        let serializer = serde_wasm_bindgen::Serializer::json_compatible();
        let value_js = value.serialize(&serializer)?;

        setStorage(key, value_js).await.map_err(HostError::bridge)
    }
}

/// chrome.tabs, active tab of the current window
pub struct HostTabs;

#[async_trait(?Send)]
impl TabSource for HostTabs {
    async fn active_tab(&self) -> Result<Option<TabContext>, HostError> {
        let tab_js = getActiveTab().await.map_err(HostError::bridge)?;

        if tab_js.is_null() || tab_js.is_undefined() {
            return Ok(None);
        }

        let tab: TabContext = serde_wasm_bindgen::from_value(tab_js)?;
        if tab.url.is_empty() {
            Ok(None)
        } else {
            Ok(Some(tab))
        }
    }
}

/// No tab information available
pub struct NoTabs;

#[async_trait(?Send)]
impl TabSource for NoTabs {
    async fn active_tab(&self) -> Result<Option<TabContext>, HostError> {
        Ok(None)
    }
}

/// The storage and tab capabilities picked for this popup
#[derive(Clone)]
pub struct Capabilities {
    pub storage: Rc<dyn StorageBackend>,
    pub tabs: Rc<dyn TabSource>,
}

impl Capabilities {
    /// Probe the host once. Missing APIs fall back to memory storage / no tabs.
    pub fn detect() -> Self {
        let has_storage = hasStorageApi();
        let has_tabs = has_storage && hasTabsApi();
        log::info!("Host capabilities: storage={}, tabs={}", has_storage, has_tabs);

        Self::select(has_storage, has_tabs)
    }

    pub fn select(has_storage: bool, has_tabs: bool) -> Self {
        let storage: Rc<dyn StorageBackend> = if has_storage {
            Rc::new(HostStorage)
        } else {
            Rc::new(MemoryStorage::new())
        };
        let tabs: Rc<dyn TabSource> = if has_tabs {
            Rc::new(HostTabs)
        } else {
            Rc::new(NoTabs)
        };

        Capabilities { storage, tabs }
    }
}

/// Query the focused tab, degrading to `None` on any failure.
pub async fn current_tab(tabs: &dyn TabSource) -> Option<TabContext> {
    match tabs.active_tab().await {
        Ok(tab) => tab,
        Err(e) => {
            log::warn!("Failed to query active tab: {}", e);
            None
        }
    }
}
