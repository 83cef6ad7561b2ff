/// Tab synchronizer: keeps each tab's mute flag in line with the rules
///
/// Level-triggered: every pass re-reads the rules, recomputes the verdict
/// for each tab and only calls the mute primitive where the tab's current
/// flag disagrees. Running a pass twice with no change in between issues
/// no commands the second time.
use log::{debug, error, info, warn};
use serde::Serialize;

use crate::config::MuterConfig;
use crate::error::HostError;
use crate::events::{Message, Trigger};
use crate::host::{KeyValueStore, TabRegistry};
use crate::matcher::url_matches_prefix;
use crate::store::RuleStore;
use crate::tab_data::TabInfo;

/// What a single tab reconciliation did
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TabOutcome {
    Muted,
    Unmuted,
    /// Flag already agreed with the verdict
    Unchanged,
    /// No id, no known url, or no mute info
    Skipped,
    /// Tab closed while being processed
    Vanished,
    Failed,
}

/// Aggregate result of a full pass
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ReconcileReport {
    pub examined: usize,
    pub muted: usize,
    pub unmuted: usize,
    pub unchanged: usize,
    pub skipped: usize,
    pub vanished: usize,
    pub failed: usize,
    /// Rules couldn't be read; the pass ran fail-open
    pub degraded: bool,
    /// The tab query failed and nothing was processed
    pub enumeration_failed: bool,
}

impl ReconcileReport {
    fn record(&mut self, outcome: TabOutcome) {
        self.examined += 1;
        match outcome {
            TabOutcome::Muted => self.muted += 1,
            TabOutcome::Unmuted => self.unmuted += 1,
            TabOutcome::Unchanged => self.unchanged += 1,
            TabOutcome::Skipped => self.skipped += 1,
            TabOutcome::Vanished => self.vanished += 1,
            TabOutcome::Failed => self.failed += 1,
        }
    }

    pub fn commands_issued(&self) -> usize {
        self.muted + self.unmuted
    }
}

/// Result of dispatching a trigger
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dispatched {
    Tab(TabOutcome),
    All(ReconcileReport),
}

/// Enabled prefixes for one pass
struct Resolved {
    prefixes: Vec<String>,
    degraded: bool,
}

/// Mute command to send for a tab, if any.
///
/// A degraded pass resolved no prefixes because the rules were unreadable,
/// so it must not unmute what a real rule may have muted.
fn mute_command(currently_muted: Option<bool>, should_mute: bool, degraded: bool) -> Option<bool> {
    match currently_muted {
        None => None,
        Some(muted) if muted == should_mute => None,
        Some(true) if degraded => None,
        Some(_) => Some(should_mute),
    }
}

pub struct SyncEngine<K, T> {
    rules: RuleStore<K>,
    tabs: T,
    config: MuterConfig,
}

impl<K: KeyValueStore, T: TabRegistry> SyncEngine<K, T> {
    pub fn new(kv: K, tabs: T, config: MuterConfig) -> Self {
        SyncEngine {
            rules: RuleStore::new(kv, config.storage_key.clone()),
            tabs,
            config,
        }
    }

    /// Enabled prefixes, failing open to none when the store can't be read
    async fn resolve_prefixes(&self) -> Resolved {
        match self.rules.enabled_prefixes().await {
            Ok(prefixes) => Resolved {
                prefixes,
                degraded: false,
            },
            Err(e) => {
                warn!("Rules unavailable, not muting anything: {}", e);
                Resolved {
                    prefixes: Vec::new(),
                    degraded: true,
                }
            }
        }
    }

    /// Bring one tab into agreement with the rules
    pub async fn reconcile(&self, tab_id: i32, url: Option<&str>) -> TabOutcome {
        let resolved = self.resolve_prefixes().await;
        let should_mute = url_matches_prefix(url, &resolved.prefixes);

        let tab = match self.tabs.get(tab_id).await {
            Ok(tab) => tab,
            Err(HostError::TabNotFound(_)) => {
                debug!("Tab {} closed before it could be checked", tab_id);
                return TabOutcome::Vanished;
            }
            Err(e) => {
                debug!("Error processing tab {}: {}", tab_id, e);
                return TabOutcome::Failed;
            }
        };

        self.apply(tab_id, tab.is_muted(), should_mute, resolved.degraded)
            .await
    }

    /// Bring every open tab into agreement with the rules
    pub async fn reconcile_all(&self) -> ReconcileReport {
        let mut report = ReconcileReport::default();

        let tabs = match self.tabs.query_all().await {
            Ok(tabs) => tabs,
            Err(e) => {
                error!("Error checking all tabs: {}", e);
                report.enumeration_failed = true;
                return report;
            }
        };

        let resolved = self.resolve_prefixes().await;
        report.degraded = resolved.degraded;

        for tab in &tabs {
            let outcome = self.reconcile_listed(tab, &resolved).await;
            report.record(outcome);
        }

        info!(
            "Checked {} tabs: {} muted, {} unmuted, {} failed",
            report.examined, report.muted, report.unmuted, report.failed
        );
        report
    }

    async fn reconcile_listed(&self, tab: &TabInfo, resolved: &Resolved) -> TabOutcome {
        if !tab.has_id() {
            return TabOutcome::Skipped;
        }
        let Some(url) = tab.known_url() else {
            return TabOutcome::Skipped;
        };

        let should_mute = url_matches_prefix(Some(url), &resolved.prefixes);
        self.apply(tab.id, tab.is_muted(), should_mute, resolved.degraded)
            .await
    }

    async fn apply(
        &self,
        tab_id: i32,
        currently_muted: Option<bool>,
        should_mute: bool,
        degraded: bool,
    ) -> TabOutcome {
        let Some(muted) = mute_command(currently_muted, should_mute, degraded) else {
            return match currently_muted {
                None => TabOutcome::Skipped,
                Some(_) => TabOutcome::Unchanged,
            };
        };

        match self.tabs.set_muted(tab_id, muted).await {
            Ok(()) => {
                debug!("Tab {} {}", tab_id, if muted { "muted" } else { "unmuted" });
                if muted {
                    TabOutcome::Muted
                } else {
                    TabOutcome::Unmuted
                }
            }
            Err(HostError::TabNotFound(_)) => {
                debug!("Tab {} closed before it could be updated", tab_id);
                TabOutcome::Vanished
            }
            Err(e) => {
                warn!("Could not update tab {}: {}", tab_id, e);
                TabOutcome::Failed
            }
        }
    }

    /// Install/startup: make sure a rule list exists, then check every tab
    pub async fn startup(&self) -> ReconcileReport {
        match self.rules.ensure_initialized().await {
            Ok(true) => info!("Initialized empty rule list"),
            Ok(false) => {}
            Err(e) => warn!("Could not initialize rule list: {}", e),
        }
        self.reconcile_all().await
    }

    /// Run whichever reconciliation a trigger calls for
    pub async fn dispatch(&self, trigger: Trigger) -> Option<Dispatched> {
        match trigger {
            Trigger::Startup => Some(Dispatched::All(self.startup().await)),
            Trigger::TabUpdated { tab_id, change, tab } => {
                if !change.affects_verdict() {
                    return None;
                }
                let outcome = self.reconcile(tab_id, tab.url.as_deref()).await;
                Some(Dispatched::Tab(outcome))
            }
            Trigger::TabCreated(tab) => {
                let url = tab.known_url()?;
                Some(Dispatched::Tab(self.reconcile(tab.id, Some(url)).await))
            }
            Trigger::StorageChanged { area, changes } => {
                if area != self.config.storage_area
                    || !changes.contains_key(&self.config.storage_key)
                {
                    return None;
                }
                Some(Dispatched::All(self.reconcile_all().await))
            }
            Trigger::Message(Message::RefreshTabs) => {
                Some(Dispatched::All(self.reconcile_all().await))
            }
        }
    }
}
