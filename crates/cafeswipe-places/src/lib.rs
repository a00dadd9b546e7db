//! Places API (v1) client used by the CafeSwipe relay.
//!
//! Covers nearby search and photo media fetches; responses are normalized into
//! [`cafeswipe_core::Candidate`] records.

pub mod client;
pub mod error;
pub mod normalize;
pub mod types;

pub use client::{is_valid_photo_name, NearbySearch, PhotoMedia, PlacesClient, FIELD_MASK};
pub use error::PlacesError;
pub use normalize::{normalize_place, normalize_places};
