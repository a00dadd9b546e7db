//! HTTP client for the Places API (v1).
//!
//! Wraps `reqwest` with API key management, the nearby-search field mask, and
//! typed error mapping. Non-success responses are surfaced with their status
//! and body intact so the relay can pass them through to its callers.

use std::time::Duration;

use cafeswipe_core::{Candidate, Coordinates};
use reqwest::{Client, Url};

use crate::error::PlacesError;
use crate::normalize::normalize_places;
use crate::types::{Circle, LatLng, LocationRestriction, SearchNearbyRequest, SearchNearbyResponse};

const DEFAULT_BASE_URL: &str = "https://places.googleapis.com/v1/";

/// Fields requested from `places:searchNearby`. Requesting anything outside
/// this list is billed at a higher SKU.
pub const FIELD_MASK: &str =
    "places.id,places.displayName.text,places.formattedAddress,places.rating,places.photos";

const DEFAULT_CONTENT_TYPE: &str = "image/jpeg";

/// Parameters for one nearby search.
#[derive(Debug, Clone, PartialEq)]
pub struct NearbySearch {
    pub center: Coordinates,
    /// Search circle radius in metres.
    pub radius_m: f64,
    /// Place type filter, e.g. `cafe`.
    pub place_type: String,
    pub max_results: u32,
}

/// A successful photo media response, not yet read.
///
/// The body is left on `response` so callers can stream it.
#[derive(Debug)]
pub struct PhotoMedia {
    pub content_type: String,
    pub response: reqwest::Response,
}

/// Client for the Places API.
///
/// Use [`PlacesClient::new`] for production or [`PlacesClient::with_base_url`]
/// to point at a mock server in tests.
pub struct PlacesClient {
    client: Client,
    api_key: String,
    base_url: Url,
    photo_max_width_px: u32,
}

impl PlacesClient {
    /// Creates a client pointed at the production Places API.
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the underlying `reqwest::Client`
    /// cannot be constructed.
    pub fn new(api_key: &str, timeout_secs: u64, user_agent: &str) -> Result<Self, PlacesError> {
        Self::with_base_url(api_key, timeout_secs, user_agent, DEFAULT_BASE_URL)
    }

    /// Creates a client with a custom base URL (for testing with wiremock).
    ///
    /// # Errors
    ///
    /// Returns [`PlacesError::Http`] if the `reqwest::Client` cannot be built,
    /// or [`PlacesError::InvalidBaseUrl`] if `base_url` does not parse.
    pub fn with_base_url(
        api_key: &str,
        timeout_secs: u64,
        user_agent: &str,
        base_url: &str,
    ) -> Result<Self, PlacesError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs))
            .connect_timeout(Duration::from_secs(10))
            .user_agent(user_agent)
            .build()?;

        // Exactly one trailing slash, so relative joins append to the path
        // instead of replacing its last segment.
        let normalised = format!("{}/", base_url.trim_end_matches('/'));
        let base_url = Url::parse(&normalised).map_err(|e| PlacesError::InvalidBaseUrl {
            url: base_url.to_owned(),
            reason: e.to_string(),
        })?;

        Ok(Self {
            client,
            api_key: api_key.to_owned(),
            base_url,
            photo_max_width_px: 400,
        })
    }

    /// Sets the `maxWidthPx` requested for photo media.
    #[must_use]
    pub fn with_photo_max_width(mut self, max_width_px: u32) -> Self {
        self.photo_max_width_px = max_width_px;
        self
    }

    /// Runs a `places:searchNearby` query and returns normalized candidates.
    ///
    /// Places without an id are dropped during normalization.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::Http`] on network failure.
    /// - [`PlacesError::NonJson`] if the body is not JSON, whatever the status.
    /// - [`PlacesError::Upstream`] on a non-2xx status with a JSON body.
    /// - [`PlacesError::Deserialize`] if a 2xx JSON body has the wrong shape.
    pub async fn search_nearby(
        &self,
        search: &NearbySearch,
    ) -> Result<Vec<Candidate>, PlacesError> {
        let url = self.endpoint("places:searchNearby")?;
        let body = Self::request_body(search);

        tracing::debug!(
            request = %serde_json::to_string(&body).unwrap_or_default(),
            "places nearby request body"
        );

        let response = self
            .client
            .post(url)
            .header("X-Goog-Api-Key", &self.api_key)
            .header("X-Goog-FieldMask", FIELD_MASK)
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        let Ok(value) = serde_json::from_str::<serde_json::Value>(&text) else {
            tracing::error!(status = status.as_u16(), body = %text, "places API returned non-JSON body");
            return Err(PlacesError::NonJson {
                status: status.as_u16(),
                body: text,
            });
        };

        if !status.is_success() {
            tracing::error!(status = status.as_u16(), body = %value, "places API error");
            return Err(PlacesError::Upstream {
                status: status.as_u16(),
                body: value,
            });
        }

        let parsed: SearchNearbyResponse =
            serde_json::from_value(value).map_err(|e| PlacesError::Deserialize {
                context: "places:searchNearby".to_owned(),
                source: e,
            })?;

        Ok(normalize_places(parsed.places))
    }

    /// Requests the media for a photo resource name.
    ///
    /// # Errors
    ///
    /// - [`PlacesError::InvalidPhotoName`] if `name` is not a
    ///   `places/{id}/photos/{ref}` resource name (no request is sent).
    /// - [`PlacesError::PhotoUpstream`] on a non-2xx status.
    /// - [`PlacesError::Http`] on network failure.
    pub async fn fetch_photo(&self, name: &str) -> Result<PhotoMedia, PlacesError> {
        let url = self.photo_url(name)?;
        tracing::debug!(photo = name, "fetching photo media");

        let response = self.client.get(url).send().await?;
        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            tracing::error!(status = status.as_u16(), photo = name, body = %body, "photo fetch failed");
            return Err(PlacesError::PhotoUpstream {
                status: status.as_u16(),
                body,
            });
        }

        let content_type = response
            .headers()
            .get(reqwest::header::CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .unwrap_or(DEFAULT_CONTENT_TYPE)
            .to_owned();

        Ok(PhotoMedia {
            content_type,
            response,
        })
    }

    fn request_body(search: &NearbySearch) -> SearchNearbyRequest {
        SearchNearbyRequest {
            location_restriction: LocationRestriction {
                circle: Circle {
                    center: LatLng {
                        latitude: search.center.latitude,
                        longitude: search.center.longitude,
                    },
                    radius: search.radius_m,
                },
            },
            included_types: vec![search.place_type.clone()],
            max_result_count: search.max_results,
        }
    }

    /// Resolves `path` against the base URL. The `./` prefix keeps paths such
    /// as `places:searchNearby` from being read as a URL scheme.
    fn endpoint(&self, path: &str) -> Result<Url, PlacesError> {
        self.base_url
            .join(&format!("./{path}"))
            .map_err(|e| PlacesError::InvalidBaseUrl {
                url: self.base_url.to_string(),
                reason: e.to_string(),
            })
    }

    fn photo_url(&self, name: &str) -> Result<Url, PlacesError> {
        if !is_valid_photo_name(name) {
            return Err(PlacesError::InvalidPhotoName(name.to_owned()));
        }

        let mut url = self.endpoint(&format!("{name}/media"))?;
        url.query_pairs_mut()
            .append_pair("maxWidthPx", &self.photo_max_width_px.to_string())
            .append_pair("key", &self.api_key);
        Ok(url)
    }
}

/// Checks that `name` has the shape `places/{place_id}/photos/{photo_ref}`
/// with URL-safe segments.
#[must_use]
pub fn is_valid_photo_name(name: &str) -> bool {
    let segments: Vec<&str> = name.split('/').collect();
    let safe = |s: &str| {
        !s.is_empty()
            && s
                .chars()
                .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_')
    };

    matches!(
        segments.as_slice(),
        ["places", place_id, "photos", photo_ref] if safe(place_id) && safe(photo_ref)
    )
}

#[cfg(test)]
#[path = "client_test.rs"]
mod tests;
