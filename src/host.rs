/// Seams to the browser: storage, tabs and the runtime message channel
use serde_json::Value;

use crate::error::HostError;
use crate::tab_data::TabInfo;

/// Asynchronous key-value storage (`storage.local`)
#[allow(async_fn_in_trait)]
pub trait KeyValueStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError>;

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError>;
}

/// Tab enumeration and the mute primitive
#[allow(async_fn_in_trait)]
pub trait TabRegistry {
    async fn query_all(&self) -> Result<Vec<TabInfo>, HostError>;

    /// Fails with `HostError::TabNotFound` once the tab has closed
    async fn get(&self, tab_id: i32) -> Result<TabInfo, HostError>;

    async fn set_muted(&self, tab_id: i32, muted: bool) -> Result<(), HostError>;

    /// Active tab of the current window
    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError>;
}

/// Lets the editor ask the background engine for a full pass
#[allow(async_fn_in_trait)]
pub trait RefreshChannel {
    async fn request_refresh(&self) -> Result<(), HostError>;
}
