use thiserror::Error;

/// Errors returned by the Places API client.
#[derive(Debug, Error)]
pub enum PlacesError {
    /// Network or TLS failure from the underlying HTTP client.
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Upstream answered with a non-success status and a JSON error body.
    #[error("Places API returned HTTP {status}")]
    Upstream {
        status: u16,
        body: serde_json::Value,
    },

    /// Upstream body was not JSON. Carries the raw text for relaying.
    #[error("Places API returned a non-JSON body (HTTP {status})")]
    NonJson { status: u16, body: String },

    /// Photo media request failed upstream. Carries the raw text body.
    #[error("photo fetch failed with HTTP {status}")]
    PhotoUpstream { status: u16, body: String },

    /// JSON body did not match the expected response shape.
    #[error("JSON deserialization error for {context}: {source}")]
    Deserialize {
        context: String,
        #[source]
        source: serde_json::Error,
    },

    /// Photo name is not a `places/{id}/photos/{ref}` resource name.
    #[error("invalid photo reference: {0}")]
    InvalidPhotoName(String),

    #[error("invalid base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },
}
