/// Prefix rules as persisted under the `prefixes` storage key
use serde::{Deserialize, Serialize};

/// A single mute rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    pub url: String,
    pub enabled: bool,
}

impl Rule {
    pub fn new(url: String) -> Rule {
        Rule { url, enabled: true }
    }
}

/// Ordered rule list; serializes as a bare JSON array
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RuleList {
    rules: Vec<Rule>,
}

impl RuleList {
    pub fn new() -> Self {
        RuleList { rules: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Rule> {
        self.rules.iter()
    }

    pub fn get(&self, url: &str) -> Option<&Rule> {
        self.rules.iter().find(|r| r.url == url)
    }

    pub fn contains(&self, url: &str) -> bool {
        self.get(url).is_some()
    }

    /// Append a rule unless one with the same url exists
    pub fn add_rule(&mut self, rule: Rule) -> bool {
        if self.contains(&rule.url) {
            return false;
        }
        self.rules.push(rule);
        true
    }

    pub fn remove_rule(&mut self, url: &str) -> bool {
        let original_len = self.rules.len();
        self.rules.retain(|r| r.url != url);
        self.rules.len() < original_len
    }

    /// Flip `enabled` and return the new value
    pub fn toggle_rule(&mut self, url: &str) -> Option<bool> {
        self.rules.iter_mut().find(|r| r.url == url).map(|rule| {
            rule.enabled = !rule.enabled;
            rule.enabled
        })
    }

    /// Urls of enabled rules, in stored order
    pub fn enabled_prefixes(&self) -> Vec<String> {
        self.rules
            .iter()
            .filter(|r| r.enabled)
            .map(|r| r.url.clone())
            .collect()
    }

    /// Rules sorted for the popup: case-insensitive, then exact
    pub fn display_order(&self) -> Vec<Rule> {
        let mut sorted = self.rules.clone();
        sorted.sort_by(|a, b| {
            a.url
                .to_lowercase()
                .cmp(&b.url.to_lowercase())
                .then_with(|| a.url.cmp(&b.url))
        });
        sorted
    }
}

impl From<Vec<Rule>> for RuleList {
    fn from(rules: Vec<Rule>) -> Self {
        RuleList { rules }
    }
}
