/// Error types for host calls and rule editing
use thiserror::Error;

/// Failures reported by the browser collaborators
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum HostError {
    #[error("tab {0} no longer exists")]
    TabNotFound(i32),
    #[error("storage unavailable: {0}")]
    StoreUnavailable(String),
    #[error("tab query failed: {0}")]
    TabQuery(String),
    #[error("tab update failed: {0}")]
    TabUpdate(String),
    #[error("message channel failed: {0}")]
    Messaging(String),
    #[error("malformed data: {0}")]
    Malformed(String),
}

/// Failures shown to the user by the rule editor
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EditorError {
    #[error("Please enter a URL prefix")]
    EmptyPrefix,
    #[error("Invalid URL format: {0}")]
    InvalidUrl(String),
    #[error("This prefix already exists: {0}")]
    DuplicatePrefix(String),
    #[error("No such prefix: {0}")]
    UnknownPrefix(String),
    #[error("No active tab found")]
    NoActiveTab,
    #[error("Cannot add this type of page: {0}")]
    UnsupportedPage(String),
    #[error(transparent)]
    Host(#[from] HostError),
}
