//! Canonical café candidate record shared by the relay and the client.
//!
//! The same JSON shape is used on the relay wire (`/places/nearby` results)
//! and in the client's durable saved list.

use serde::{Deserialize, Serialize};

use crate::CoreError;

/// A single discoverable location returned by a nearby search.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candidate {
    /// Upstream place identifier; the deduplication key.
    pub place_id: String,
    #[serde(default)]
    pub display_name: Option<String>,
    #[serde(default)]
    pub formatted_address: Option<String>,
    #[serde(default)]
    pub rating: Option<f64>,
    #[serde(default)]
    pub photos: Vec<PhotoRef>,
}

/// Reference to an upstream photo resource (`places/{id}/photos/{ref}`).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PhotoRef {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width_px: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height_px: Option<u32>,
}

impl Candidate {
    /// Bare candidate with only an identifier; display fields left empty.
    #[must_use]
    pub fn with_id(place_id: impl Into<String>) -> Self {
        Self {
            place_id: place_id.into(),
            display_name: None,
            formatted_address: None,
            rating: None,
            photos: Vec::new(),
        }
    }
}

/// A validated WGS84 coordinate pair.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinates {
    pub latitude: f64,
    pub longitude: f64,
}

impl Coordinates {
    /// Builds a coordinate pair, rejecting non-finite or out-of-range values.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidCoordinates`] when latitude is outside
    /// `[-90, 90]`, longitude is outside `[-180, 180]`, or either is NaN/infinite.
    pub fn new(latitude: f64, longitude: f64) -> Result<Self, CoreError> {
        let valid = latitude.is_finite()
            && longitude.is_finite()
            && (-90.0..=90.0).contains(&latitude)
            && (-180.0..=180.0).contains(&longitude);

        if !valid {
            return Err(CoreError::InvalidCoordinates {
                latitude,
                longitude,
            });
        }

        Ok(Self {
            latitude,
            longitude,
        })
    }
}
