//! Normalization of Places API records into [`Candidate`]s.

use cafeswipe_core::{Candidate, PhotoRef};

use crate::types::UpstreamPlace;

/// Converts an upstream place into a [`Candidate`].
///
/// Returns `None` when the place carries no usable id, since the id is the
/// only dedup key the client has. Blank text fields collapse to `None`.
#[must_use]
pub fn normalize_place(place: UpstreamPlace) -> Option<Candidate> {
    let place_id = non_blank(place.id)?;
    let display_name = non_blank(place.display_name.and_then(|d| d.text));
    let formatted_address = non_blank(place.formatted_address);

    let photos = place
        .photos
        .into_iter()
        .filter(|p| !p.name.trim().is_empty())
        .map(|p| PhotoRef {
            name: p.name,
            width_px: p.width_px,
            height_px: p.height_px,
        })
        .collect();

    Some(Candidate {
        place_id,
        display_name,
        formatted_address,
        rating: place.rating,
        photos,
    })
}

/// Normalizes every place in a response, skipping the ones without an id.
#[must_use]
pub fn normalize_places(places: Vec<UpstreamPlace>) -> Vec<Candidate> {
    places.into_iter().filter_map(normalize_place).collect()
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|s| !s.trim().is_empty())
}
