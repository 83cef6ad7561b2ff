/// Rule editing operations behind the popup
use log::{info, warn};
use url::Url;

use crate::config::MuterConfig;
use crate::error::EditorError;
use crate::host::{KeyValueStore, RefreshChannel, TabRegistry};
use crate::rules::{Rule, RuleList};
use crate::store::RuleStore;

/// Trim the input, default its scheme and check that it parses as a URL.
///
/// The returned string is the trimmed input (plus scheme), not the parser's
/// serialization, so `https://example.com` stays without a trailing slash.
pub fn normalize_prefix(input: &str, config: &MuterConfig) -> Result<String, EditorError> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return Err(EditorError::EmptyPrefix);
    }

    let url = if config.has_accepted_scheme(trimmed) {
        trimmed.to_string()
    } else {
        format!("{}{}", config.default_scheme, trimmed)
    };

    Url::parse(&url).map_err(|e| EditorError::InvalidUrl(format!("{}: {}", url, e)))?;
    Ok(url)
}

/// Origin (scheme, host, port) of a tab url usable as a rule
pub fn origin_prefix(tab_url: Option<&str>, config: &MuterConfig) -> Result<String, EditorError> {
    let tab_url = match tab_url {
        Some(url) if !url.is_empty() && !config.is_unsupported_page(url) => url,
        other => return Err(EditorError::UnsupportedPage(other.unwrap_or_default().to_string())),
    };

    let parsed = Url::parse(tab_url).map_err(|e| EditorError::InvalidUrl(e.to_string()))?;
    let origin = parsed.origin();
    if !origin.is_tuple() {
        return Err(EditorError::UnsupportedPage(tab_url.to_string()));
    }
    Ok(origin.ascii_serialization())
}

pub struct RuleEditor<K, T, R> {
    rules: RuleStore<K>,
    tabs: T,
    refresh: R,
    config: MuterConfig,
}

impl<K, T, R> RuleEditor<K, T, R>
where
    K: KeyValueStore,
    T: TabRegistry,
    R: RefreshChannel,
{
    pub fn new(kv: K, tabs: T, refresh: R, config: MuterConfig) -> Self {
        RuleEditor {
            rules: RuleStore::new(kv, config.storage_key.clone()),
            tabs,
            refresh,
            config,
        }
    }

    /// Rules in display order
    pub async fn list(&self) -> Result<Vec<Rule>, EditorError> {
        Ok(self.rules.load().await?.display_order())
    }

    pub async fn add_prefix(&self, input: &str) -> Result<Rule, EditorError> {
        let url = normalize_prefix(input, &self.config)?;

        let mut rules = self.rules.load().await?;
        let rule = Rule::new(url);
        if !rules.add_rule(rule.clone()) {
            return Err(EditorError::DuplicatePrefix(rule.url));
        }

        self.commit(&rules).await?;
        info!("Added prefix {}", rule.url);
        Ok(rule)
    }

    /// Flip a rule on or off; returns the new `enabled` value
    pub async fn toggle_prefix(&self, url: &str) -> Result<bool, EditorError> {
        let mut rules = self.rules.load().await?;
        let enabled = rules
            .toggle_rule(url)
            .ok_or_else(|| EditorError::UnknownPrefix(url.to_string()))?;

        self.commit(&rules).await?;
        Ok(enabled)
    }

    pub async fn remove_prefix(&self, url: &str) -> Result<(), EditorError> {
        let mut rules = self.rules.load().await?;
        if !rules.remove_rule(url) {
            return Err(EditorError::UnknownPrefix(url.to_string()));
        }

        self.commit(&rules).await?;
        info!("Removed prefix {}", url);
        Ok(())
    }

    /// Add the active tab's origin as a rule
    pub async fn add_current_tab(&self) -> Result<Rule, EditorError> {
        let tab = self
            .tabs
            .active_tab()
            .await?
            .ok_or(EditorError::NoActiveTab)?;

        let origin = origin_prefix(tab.url.as_deref(), &self.config)?;
        self.add_prefix(&origin).await
    }

    /// Persist, then nudge the background engine
    async fn commit(&self, rules: &RuleList) -> Result<(), EditorError> {
        self.rules.save(rules).await?;

        // The storage change event triggers a pass anyway
        if let Err(e) = self.refresh.request_refresh().await {
            warn!("Refresh request failed: {}", e);
        }
        Ok(())
    }
}
