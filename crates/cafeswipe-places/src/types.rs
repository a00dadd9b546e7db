//! Places API (v1) request and response types.
//!
//! Only the fields selected by the nearby-search field mask are modelled.

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// places:searchNearby request
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SearchNearbyRequest {
    pub location_restriction: LocationRestriction,
    pub included_types: Vec<String>,
    pub max_result_count: u32,
}

#[derive(Debug, Serialize)]
pub struct LocationRestriction {
    pub circle: Circle,
}

#[derive(Debug, Serialize)]
pub struct Circle {
    pub center: LatLng,
    pub radius: f64,
}

#[derive(Debug, Serialize)]
pub struct LatLng {
    pub latitude: f64,
    pub longitude: f64,
}

// ---------------------------------------------------------------------------
// places:searchNearby response
// ---------------------------------------------------------------------------

/// Body of a successful nearby search. An area with no matches returns `{}`.
#[derive(Debug, Deserialize)]
pub struct SearchNearbyResponse {
    #[serde(default)]
    pub places: Vec<UpstreamPlace>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPlace {
    #[serde(default)]
    pub id: Option<String>,
    #[serde(default)]
    pub display_name: Option<LocalizedText>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub photos: Vec<UpstreamPhoto>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LocalizedText {
    #[serde(default)]
    pub text: Option<String>,
    #[serde(default)]
    pub language_code: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpstreamPhoto {
    pub name: String,
    #[serde(default)]
    pub width_px: Option<u32>,
    #[serde(default)]
    pub height_px: Option<u32>,
}
