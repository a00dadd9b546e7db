//! HTTP client for the CafeSwipe relay's `/places/nearby` endpoint.

use std::time::Duration;

use cafeswipe_core::{Candidate, ClientConfig, Coordinates};
use reqwest::{Client, Url};
use serde::Deserialize;

use crate::error::DiscoveryError;

/// Fixed search parameters sent with every discovery request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchParams {
    pub radius_m: u32,
    pub place_type: String,
    pub max_results: u32,
}

impl Default for SearchParams {
    fn default() -> Self {
        Self {
            radius_m: 4500,
            place_type: "cafe".to_string(),
            max_results: 20,
        }
    }
}

impl SearchParams {
    #[must_use]
    pub fn from_config(config: &ClientConfig) -> Self {
        Self {
            radius_m: config.search_radius_m,
            place_type: config.place_type.clone(),
            max_results: config.max_results,
        }
    }
}

#[derive(Debug, Deserialize)]
struct NearbyEnvelope {
    #[serde(default)]
    results: Vec<Candidate>,
    #[serde(default)]
    status: Option<String>,
}

pub struct RelayClient {
    client: Client,
    base_url: Url,
}

impl RelayClient {
    /// # Errors
    ///
    /// Returns [`DiscoveryError::Network`] if the HTTP client cannot be built,
    /// or [`DiscoveryError::InvalidRelayUrl`] if `base_url` is not a URL.
    pub fn new(base_url: &str, timeout_secs: u64) -> Result<Self, DiscoveryError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(5))
            .user_agent("cafeswipe-cli/0.1")
            .build()?;

        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| DiscoveryError::InvalidRelayUrl {
            url: base_url.to_string(),
            reason: e.to_string(),
        })?;

        Ok(Self { client, base_url })
    }

    /// Resolves a relay-relative path such as `/places/photo?name=...`.
    #[must_use]
    pub fn absolute(&self, path: &str) -> String {
        self.base_url
            .join(path)
            .map_or_else(|_| path.to_owned(), |u| u.to_string())
    }

    /// Fetches nearby candidates around `coords`.
    ///
    /// # Errors
    ///
    /// - [`DiscoveryError::Network`] if the relay cannot be reached.
    /// - [`DiscoveryError::Upstream`] on a non-success status, a payload that
    ///   does not parse, or a payload whose `status` is not `"OK"`.
    pub async fn nearby(
        &self,
        coords: Coordinates,
        params: &SearchParams,
    ) -> Result<Vec<Candidate>, DiscoveryError> {
        let url = self.nearby_url(coords, params);
        let response = self.client.get(url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(DiscoveryError::Upstream {
                status: status.as_u16(),
                message: error_message(&body),
            });
        }

        let envelope: NearbyEnvelope =
            serde_json::from_str(&body).map_err(|e| DiscoveryError::Upstream {
                status: status.as_u16(),
                message: format!("malformed nearby payload: {e}"),
            })?;

        match envelope.status.as_deref() {
            Some("OK") => Ok(envelope.results),
            other => Err(DiscoveryError::Upstream {
                status: status.as_u16(),
                message: format!("unexpected payload status {other:?}"),
            }),
        }
    }

    fn nearby_url(&self, coords: Coordinates, params: &SearchParams) -> Url {
        let mut url = self
            .base_url
            .join("places/nearby")
            .unwrap_or_else(|_| self.base_url.clone());
        url.query_pairs_mut()
            .append_pair("lat", &coords.latitude.to_string())
            .append_pair("lng", &coords.longitude.to_string())
            .append_pair("radius", &params.radius_m.to_string())
            .append_pair("type", &params.place_type)
            .append_pair("maxResults", &params.max_results.to_string());
        url
    }
}

/// Pulls a human-readable message out of an error body.
///
/// Understands both the relay's `{"error":{"message"}}` shape and the
/// upstream `{"error":{"message"}}` shape it passes through; anything else
/// is returned as (truncated) text.
fn error_message(body: &str) -> String {
    const MAX_LEN: usize = 200;

    if let Ok(value) = serde_json::from_str::<serde_json::Value>(body) {
        let message = value
            .get("error")
            .and_then(|e| e.get("message").or(Some(e)))
            .and_then(serde_json::Value::as_str);
        if let Some(message) = message {
            return message.to_owned();
        }
    }

    let trimmed = body.trim();
    if trimmed.is_empty() {
        return "empty response body".to_owned();
    }
    trimmed.chars().take(MAX_LEN).collect()
}
