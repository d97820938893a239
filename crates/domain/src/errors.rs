use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    #[error("Network unavailable: {0}")]
    NetworkUnavailable(String),

    #[error("Upstream returned non-success status {0}")]
    NonSuccessStatus(u16),

    #[error("Cache unavailable: {0}")]
    CacheUnavailable(String),

    #[error("Failed to seed {url}: {reason}")]
    ManifestFetchFailure { url: String, reason: String },

    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    #[error("Invalid lifecycle transition from {from} to {to}")]
    InvalidLifecycleTransition {
        from: &'static str,
        to: &'static str,
    },

    #[error("Database error: {0}")]
    DatabaseError(String),
}
