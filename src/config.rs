/// Runtime settings shared by the background engine and the rule editor
use serde::{Deserialize, Serialize};

/// Storage key holding the rule list
pub const PREFIXES_KEY: &str = "prefixes";

/// Storage area the rule list lives in
pub const LOCAL_AREA: &str = "local";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct MuterConfig {
    pub storage_key: String,
    pub storage_area: String,
    /// Prepended to editor input that carries no accepted scheme
    pub default_scheme: String,
    pub accepted_schemes: Vec<String>,
    /// Pages whose origin can't be added as a rule
    pub unsupported_pages: Vec<String>,
}

impl MuterConfig {
    pub fn has_accepted_scheme(&self, url: &str) -> bool {
        self.accepted_schemes
            .iter()
            .any(|scheme| url.starts_with(scheme.as_str()))
    }

    pub fn is_unsupported_page(&self, url: &str) -> bool {
        self.unsupported_pages
            .iter()
            .any(|page| url.starts_with(page.as_str()))
    }
}

impl Default for MuterConfig {
    fn default() -> Self {
        MuterConfig {
            storage_key: PREFIXES_KEY.to_string(),
            storage_area: LOCAL_AREA.to_string(),
            default_scheme: "https://".to_string(),
            accepted_schemes: vec!["http://".to_string(), "https://".to_string()],
            unsupported_pages: vec!["about:".to_string(), "moz-extension:".to_string()],
        }
    }
}
