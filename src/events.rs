/// Triggers that start a reconciliation pass
use std::collections::HashMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::tab_data::TabInfo;

/// Runtime messages accepted by the background engine
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "action")]
pub enum Message {
    #[serde(rename = "refreshTabs")]
    RefreshTabs,
}

impl Message {
    /// Parse an inbound message; unknown actions yield `None`
    pub fn parse(value: &Value) -> Option<Message> {
        Message::deserialize(value).ok()
    }
}

/// Changed fields of a `tabs.onUpdated` event
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TabChange {
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub status: Option<String>,
}

impl TabChange {
    /// A new url, or a finished load, may change the verdict
    pub fn affects_verdict(&self) -> bool {
        self.url.is_some() || self.status.as_deref() == Some("complete")
    }
}

/// One entry of a `storage.onChanged` event
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StorageChange {
    #[serde(default)]
    pub old_value: Option<Value>,
    #[serde(default)]
    pub new_value: Option<Value>,
}

pub type StorageChanges = HashMap<String, StorageChange>;

#[derive(Debug, Clone, PartialEq)]
pub enum Trigger {
    /// Extension installed or browser started
    Startup,
    TabUpdated {
        tab_id: i32,
        change: TabChange,
        tab: TabInfo,
    },
    TabCreated(TabInfo),
    StorageChanged {
        area: String,
        changes: StorageChanges,
    },
    Message(Message),
}
