/// Rule list persistence on top of a key-value store
use serde_json::Value;

use crate::error::HostError;
use crate::host::KeyValueStore;
use crate::rules::RuleList;

pub struct RuleStore<K> {
    kv: K,
    key: String,
}

impl<K: KeyValueStore> RuleStore<K> {
    pub fn new(kv: K, key: impl Into<String>) -> Self {
        RuleStore { kv, key: key.into() }
    }

    pub fn key(&self) -> &str {
        &self.key
    }

    /// Current rule list; an absent key reads as empty
    pub async fn load(&self) -> Result<RuleList, HostError> {
        match self.kv.get(&self.key).await? {
            None | Some(Value::Null) => Ok(RuleList::new()),
            Some(value) => serde_json::from_value(value)
                .map_err(|e| HostError::Malformed(format!("{}: {}", self.key, e))),
        }
    }

    pub async fn save(&self, rules: &RuleList) -> Result<(), HostError> {
        let value =
            serde_json::to_value(rules).map_err(|e| HostError::Malformed(e.to_string()))?;
        self.kv.set(&self.key, value).await
    }

    /// Write an empty list if nothing is stored yet. Returns true if written.
    pub async fn ensure_initialized(&self) -> Result<bool, HostError> {
        match self.kv.get(&self.key).await? {
            None | Some(Value::Null) => {
                self.save(&RuleList::new()).await?;
                Ok(true)
            }
            Some(_) => Ok(false),
        }
    }

    pub async fn enabled_prefixes(&self) -> Result<Vec<String>, HostError> {
        Ok(self.load().await?.enabled_prefixes())
    }
}
