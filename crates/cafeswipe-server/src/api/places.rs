use axum::{
    body::Body,
    extract::{Query, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Extension, Json,
};
use cafeswipe_core::{Candidate, Coordinates};
use cafeswipe_places::{NearbySearch, PlacesError};
use serde::{Deserialize, Serialize};

use crate::middleware::RequestId;

use super::{ApiError, AppState};

const DEFAULT_RADIUS_M: u32 = 1500;
const MAX_RADIUS_M: u32 = 50_000;
const DEFAULT_PLACE_TYPE: &str = "cafe";
const DEFAULT_MAX_RESULTS: u32 = 20;

/// Raw `/places/nearby` query. Everything arrives as text so malformed
/// numbers produce our own 400 body instead of an extractor rejection.
#[derive(Debug, Default, Deserialize)]
pub(super) struct NearbyParams {
    lat: Option<String>,
    lng: Option<String>,
    radius: Option<String>,
    #[serde(rename = "type")]
    place_type: Option<String>,
    #[serde(rename = "maxResults")]
    max_results: Option<String>,
}

#[derive(Debug, Serialize)]
pub(super) struct NearbyResponse {
    pub results: Vec<Candidate>,
    pub status: &'static str,
}

#[derive(Debug, Default, Deserialize)]
pub(super) struct PhotoParams {
    name: Option<String>,
}

fn present(value: Option<&String>) -> Option<&str> {
    value.map(|s| s.trim()).filter(|s| !s.is_empty())
}

impl NearbyParams {
    /// Validates the query into a [`NearbySearch`], returning `(code, message)`
    /// on failure.
    pub(super) fn to_search(&self) -> Result<NearbySearch, (&'static str, String)> {
        let (Some(lat), Some(lng)) = (present(self.lat.as_ref()), present(self.lng.as_ref()))
        else {
            return Err(("bad_request", "lat & lng required".to_string()));
        };

        let parse_coord = |name: &str, raw: &str| {
            raw.parse::<f64>()
                .map_err(|_| ("validation_error", format!("{name} must be a number")))
        };
        let center = Coordinates::new(parse_coord("lat", lat)?, parse_coord("lng", lng)?)
            .map_err(|e| ("validation_error", e.to_string()))?;

        let radius_m = match present(self.radius.as_ref()) {
            None => DEFAULT_RADIUS_M,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|r| (1..=MAX_RADIUS_M).contains(r))
                .ok_or((
                    "validation_error",
                    format!("radius must be an integer between 1 and {MAX_RADIUS_M}"),
                ))?,
        };

        let max_results = match present(self.max_results.as_ref()) {
            None => DEFAULT_MAX_RESULTS,
            Some(raw) => raw
                .parse::<u32>()
                .ok()
                .filter(|n| (1..=DEFAULT_MAX_RESULTS).contains(n))
                .ok_or((
                    "validation_error",
                    format!("maxResults must be an integer between 1 and {DEFAULT_MAX_RESULTS}"),
                ))?,
        };

        let place_type = present(self.place_type.as_ref())
            .unwrap_or(DEFAULT_PLACE_TYPE)
            .to_string();

        Ok(NearbySearch {
            center,
            radius_m: f64::from(radius_m),
            place_type,
            max_results,
        })
    }
}

pub(super) async fn nearby(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<NearbyParams>,
) -> Response {
    let search = match params.to_search() {
        Ok(search) => search,
        Err((code, message)) => return ApiError::new(req_id.0, code, message).into_response(),
    };

    match state.places.search_nearby(&search).await {
        Ok(results) => {
            tracing::info!(
                request_id = %req_id.0,
                count = results.len(),
                "nearby search relayed"
            );
            Json(NearbyResponse {
                results,
                status: "OK",
            })
            .into_response()
        }
        Err(err) => map_places_error(req_id.0, err, "Server error"),
    }
}

pub(super) async fn photo(
    State(state): State<AppState>,
    Extension(req_id): Extension<RequestId>,
    Query(params): Query<PhotoParams>,
) -> Response {
    let Some(name) = present(params.name.as_ref()) else {
        return ApiError::new(req_id.0, "bad_request", "Missing photo name").into_response();
    };

    match state.places.fetch_photo(name).await {
        Ok(media) => (
            [(header::CONTENT_TYPE, media.content_type)],
            Body::from_stream(media.response.bytes_stream()),
        )
            .into_response(),
        Err(err) => map_places_error(req_id.0, err, "Photo proxy error"),
    }
}

/// Maps a client error onto the relay's HTTP contract: upstream statuses and
/// bodies pass through, everything else becomes an [`ApiError`].
fn map_places_error(request_id: String, err: PlacesError, internal_message: &str) -> Response {
    match err {
        PlacesError::Upstream { status, body } => (relayed_status(status), Json(body)).into_response(),
        PlacesError::PhotoUpstream { status, body } => (relayed_status(status), body).into_response(),
        PlacesError::NonJson { body, .. } => (StatusCode::BAD_GATEWAY, body).into_response(),
        PlacesError::InvalidPhotoName(name) => ApiError::new(
            request_id,
            "invalid_photo_reference",
            format!("photo name must look like places/{{id}}/photos/{{ref}}, got '{name}'"),
        )
        .into_response(),
        PlacesError::Deserialize { .. } => {
            tracing::error!(request_id = %request_id, error = %err, "malformed upstream payload");
            ApiError::new(request_id, "bad_gateway", "malformed upstream response").into_response()
        }
        PlacesError::Http(_) | PlacesError::InvalidBaseUrl { .. } => {
            tracing::error!(request_id = %request_id, error = %err, "relay request failed");
            ApiError::new(request_id, "internal_error", internal_message).into_response()
        }
    }
}

fn relayed_status(status: u16) -> StatusCode {
    StatusCode::from_u16(status).unwrap_or(StatusCode::BAD_GATEWAY)
}
