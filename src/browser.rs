/// WebExtension bindings for the collaborator traits
use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;

use crate::error::HostError;
use crate::events::Message;
use crate::host::{KeyValueStore, RefreshChannel, TabRegistry};
use crate::tab_data::TabInfo;

// Import JS bridge functions
#[wasm_bindgen(module = "/extension.js")]
extern "C" {
    #[wasm_bindgen(catch)]
    async fn storageGet(area: &str, key: &str) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn storageSet(area: &str, key: &str, value: JsValue) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryTabs() -> Result<JsValue, JsValue>;

    /// Resolves to null when the tab is gone
    #[wasm_bindgen(catch)]
    async fn getTab(tab_id: i32) -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn setTabMuted(tab_id: i32, muted: bool) -> Result<(), JsValue>;

    #[wasm_bindgen(catch)]
    async fn queryActiveTab() -> Result<JsValue, JsValue>;

    #[wasm_bindgen(catch)]
    async fn sendRuntimeMessage(message: JsValue) -> Result<JsValue, JsValue>;

    pub(crate) fn addInstalledListener(callback: &js_sys::Function);

    pub(crate) fn addStartupListener(callback: &js_sys::Function);

    pub(crate) fn addTabUpdatedListener(callback: &js_sys::Function);

    pub(crate) fn addTabCreatedListener(callback: &js_sys::Function);

    pub(crate) fn addStorageChangedListener(callback: &js_sys::Function);

    pub(crate) fn addMessageListener(callback: &js_sys::Function);
}

pub(crate) fn js_error(e: &JsValue) -> String {
    e.as_string().unwrap_or_else(|| format!("{:?}", e))
}

/// Serialize with plain JS objects rather than `Map`s
pub(crate) fn to_js<T: Serialize + ?Sized>(value: &T) -> Result<JsValue, String> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| format!("Failed to serialize: {:?}", e))
}

fn is_missing(value: &JsValue) -> bool {
    value.is_null() || value.is_undefined()
}

/// `storage.<area>` as a key-value store
#[derive(Debug, Clone)]
pub struct BrowserStorage {
    area: String,
}

impl BrowserStorage {
    pub fn new(area: &str) -> Self {
        BrowserStorage {
            area: area.to_string(),
        }
    }
}

impl KeyValueStore for BrowserStorage {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        let value_js = storageGet(&self.area, key)
            .await
            .map_err(|e| HostError::StoreUnavailable(js_error(&e)))?;

        if is_missing(&value_js) {
            return Ok(None);
        }
        serde_wasm_bindgen::from_value(value_js)
            .map(Some)
            .map_err(|e| HostError::Malformed(format!("{}: {:?}", key, e)))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        let value_js = to_js(&value).map_err(HostError::Malformed)?;
        storageSet(&self.area, key, value_js)
            .await
            .map_err(|e| HostError::StoreUnavailable(js_error(&e)))
    }
}

/// The `tabs` API
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserTabs;

fn parse_tab(tab_js: JsValue) -> Result<TabInfo, HostError> {
    serde_wasm_bindgen::from_value(tab_js)
        .map_err(|e| HostError::Malformed(format!("Failed to parse tab: {:?}", e)))
}

impl TabRegistry for BrowserTabs {
    async fn query_all(&self) -> Result<Vec<TabInfo>, HostError> {
        let tabs_js = queryTabs()
            .await
            .map_err(|e| HostError::TabQuery(js_error(&e)))?;
        serde_wasm_bindgen::from_value(tabs_js)
            .map_err(|e| HostError::Malformed(format!("Failed to parse tabs: {:?}", e)))
    }

    async fn get(&self, tab_id: i32) -> Result<TabInfo, HostError> {
        let tab_js = getTab(tab_id)
            .await
            .map_err(|e| HostError::TabQuery(js_error(&e)))?;
        if is_missing(&tab_js) {
            return Err(HostError::TabNotFound(tab_id));
        }
        parse_tab(tab_js)
    }

    async fn set_muted(&self, tab_id: i32, muted: bool) -> Result<(), HostError> {
        setTabMuted(tab_id, muted).await.map_err(|e| {
            let message = js_error(&e);
            if message.contains("Invalid tab ID") || message.contains("No tab with id") {
                HostError::TabNotFound(tab_id)
            } else {
                HostError::TabUpdate(message)
            }
        })
    }

    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError> {
        let tab_js = queryActiveTab()
            .await
            .map_err(|e| HostError::TabQuery(js_error(&e)))?;
        if is_missing(&tab_js) {
            return Ok(None);
        }
        parse_tab(tab_js).map(Some)
    }
}

/// `runtime.sendMessage` to the background page
#[derive(Debug, Clone, Copy, Default)]
pub struct RuntimeChannel;

impl RefreshChannel for RuntimeChannel {
    async fn request_refresh(&self) -> Result<(), HostError> {
        let message = to_js(&Message::RefreshTabs).map_err(HostError::Malformed)?;
        sendRuntimeMessage(message)
            .await
            .map(|_| ())
            .map_err(|e| HostError::Messaging(js_error(&e)))
    }
}
