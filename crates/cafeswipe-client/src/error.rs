use std::path::PathBuf;

use thiserror::Error;

/// Failures of a discovery request. None of them change session state.
#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// No position could be obtained (no provider, or permission denied).
    #[error("location unavailable: {0}")]
    LocationUnavailable(String),

    /// The relay could not be reached.
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The configured relay base URL does not parse.
    #[error("invalid relay URL '{url}': {reason}")]
    InvalidRelayUrl { url: String, reason: String },

    /// The relay answered with a non-success status or an unreadable payload.
    #[error("relay returned HTTP {status}: {message}")]
    Upstream { status: u16, message: String },
}

/// Durable saved-list storage failures.
#[derive(Debug, Error)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("saved list at {path} is not valid JSON: {source}")]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("could not replace {path}: {source}")]
    Persist {
        path: PathBuf,
        #[source]
        source: tempfile::PersistError,
    },
}
