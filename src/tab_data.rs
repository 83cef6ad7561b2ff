/// Browser tab data as reported by the tabs API
use serde::{Deserialize, Serialize};

/// Id the host uses for tabs outside a normal window (devtools etc.)
pub const TAB_ID_NONE: i32 = -1;

fn no_tab_id() -> i32 {
    TAB_ID_NONE
}

/// Information about a browser tab
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TabInfo {
    #[serde(default = "no_tab_id")]
    pub id: i32,
    /// Missing for privileged pages the extension can't see
    #[serde(default)]
    pub url: Option<String>,
    #[serde(default)]
    pub muted_info: Option<MutedInfo>,
    #[serde(default)]
    pub active: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutedInfo {
    pub muted: bool,
}

impl TabInfo {
    pub fn new(id: i32, url: &str, muted: bool) -> TabInfo {
        TabInfo {
            id,
            url: Some(url.to_string()),
            muted_info: Some(MutedInfo { muted }),
            active: false,
        }
    }

    pub fn is_muted(&self) -> Option<bool> {
        self.muted_info.map(|info| info.muted)
    }

    /// The url, if present and non-empty
    pub fn known_url(&self) -> Option<&str> {
        self.url.as_deref().filter(|url| !url.is_empty())
    }

    pub fn has_id(&self) -> bool {
        self.id != TAB_ID_NONE
    }
}
