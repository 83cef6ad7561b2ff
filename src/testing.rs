/// In-memory collaborators for unit tests
use std::cell::{Cell, RefCell};
use std::collections::{HashMap, HashSet};
use std::rc::Rc;

use serde_json::Value;

use crate::error::HostError;
use crate::host::{KeyValueStore, RefreshChannel, TabRegistry};
use crate::rules::Rule;
use crate::tab_data::TabInfo;

#[derive(Clone, Default)]
pub struct MemoryStore {
    values: Rc<RefCell<HashMap<String, Value>>>,
    unavailable: Rc<Cell<bool>>,
    writes: Rc<Cell<usize>>,
}

impl MemoryStore {
    pub fn with_rules(rules: &[Rule]) -> Self {
        let store = MemoryStore::default();
        store.put_rules(rules);
        store
    }

    /// Replace the stored rules without counting a write
    pub fn put_rules(&self, rules: &[Rule]) {
        self.insert("prefixes", serde_json::to_value(rules).unwrap());
    }

    pub fn insert(&self, key: &str, value: Value) {
        self.values.borrow_mut().insert(key.to_string(), value);
    }

    pub fn raw(&self, key: &str) -> Option<Value> {
        self.values.borrow().get(key).cloned()
    }

    pub fn writes(&self) -> usize {
        self.writes.get()
    }

    pub fn set_unavailable(&self, unavailable: bool) {
        self.unavailable.set(unavailable);
    }

    fn check(&self) -> Result<(), HostError> {
        if self.unavailable.get() {
            Err(HostError::StoreUnavailable("storage offline".to_string()))
        } else {
            Ok(())
        }
    }
}

impl KeyValueStore for MemoryStore {
    async fn get(&self, key: &str) -> Result<Option<Value>, HostError> {
        self.check()?;
        Ok(self.raw(key))
    }

    async fn set(&self, key: &str, value: Value) -> Result<(), HostError> {
        self.check()?;
        self.writes.set(self.writes.get() + 1);
        self.insert(key, value);
        Ok(())
    }
}

#[derive(Clone, Default)]
pub struct FakeTabs {
    tabs: Rc<RefCell<Vec<TabInfo>>>,
    calls: Rc<RefCell<Vec<(i32, bool)>>>,
    fail_queries: Rc<Cell<bool>>,
    denied: Rc<RefCell<HashSet<i32>>>,
    vanishing: Rc<RefCell<HashSet<i32>>>,
}

impl FakeTabs {
    pub fn with_tabs(tabs: Vec<TabInfo>) -> Self {
        let fake = FakeTabs::default();
        *fake.tabs.borrow_mut() = tabs;
        fake
    }

    pub fn open(&self, tab: TabInfo) {
        self.tabs.borrow_mut().push(tab);
    }

    pub fn close(&self, tab_id: i32) {
        self.tabs.borrow_mut().retain(|t| t.id != tab_id);
    }

    /// Every successful `set_muted` call so far
    pub fn mute_calls(&self) -> Vec<(i32, bool)> {
        self.calls.borrow().clone()
    }

    pub fn clear_calls(&self) {
        self.calls.borrow_mut().clear();
    }

    pub fn muted(&self, tab_id: i32) -> Option<bool> {
        self.find(tab_id).and_then(|t| t.is_muted())
    }

    pub fn fail_queries(&self, fail: bool) {
        self.fail_queries.set(fail);
    }

    /// `set_muted` on this tab fails with a permission error
    pub fn deny_updates(&self, tab_id: i32) {
        self.denied.borrow_mut().insert(tab_id);
    }

    /// The tab closes right before `set_muted` reaches it
    pub fn vanish_on_update(&self, tab_id: i32) {
        self.vanishing.borrow_mut().insert(tab_id);
    }

    fn find(&self, tab_id: i32) -> Option<TabInfo> {
        self.tabs.borrow().iter().find(|t| t.id == tab_id).cloned()
    }
}

impl TabRegistry for FakeTabs {
    async fn query_all(&self) -> Result<Vec<TabInfo>, HostError> {
        if self.fail_queries.get() {
            return Err(HostError::TabQuery("tabs API unavailable".to_string()));
        }
        Ok(self.tabs.borrow().clone())
    }

    async fn get(&self, tab_id: i32) -> Result<TabInfo, HostError> {
        self.find(tab_id).ok_or(HostError::TabNotFound(tab_id))
    }

    async fn set_muted(&self, tab_id: i32, muted: bool) -> Result<(), HostError> {
        if self.vanishing.borrow().contains(&tab_id) {
            self.close(tab_id);
            return Err(HostError::TabNotFound(tab_id));
        }
        if self.denied.borrow().contains(&tab_id) {
            return Err(HostError::TabUpdate(format!("permission denied for tab {}", tab_id)));
        }

        let mut tabs = self.tabs.borrow_mut();
        let tab = tabs
            .iter_mut()
            .find(|t| t.id == tab_id)
            .ok_or(HostError::TabNotFound(tab_id))?;
        if let Some(info) = tab.muted_info.as_mut() {
            info.muted = muted;
        }
        self.calls.borrow_mut().push((tab_id, muted));
        Ok(())
    }

    async fn active_tab(&self) -> Result<Option<TabInfo>, HostError> {
        if self.fail_queries.get() {
            return Err(HostError::TabQuery("tabs API unavailable".to_string()));
        }
        Ok(self.tabs.borrow().iter().find(|t| t.active).cloned())
    }
}

#[derive(Clone, Default)]
pub struct RecordingRefresh {
    requests: Rc<Cell<usize>>,
    fail: Rc<Cell<bool>>,
}

impl RecordingRefresh {
    pub fn requests(&self) -> usize {
        self.requests.get()
    }

    pub fn fail(&self, fail: bool) {
        self.fail.set(fail);
    }
}

impl RefreshChannel for RecordingRefresh {
    async fn request_refresh(&self) -> Result<(), HostError> {
        if self.fail.get() {
            return Err(HostError::Messaging("no receiving end".to_string()));
        }
        self.requests.set(self.requests.get() + 1);
        Ok(())
    }
}
