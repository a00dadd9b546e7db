//! Presentation of candidates as cards.
//!
//! [`View`] is what every session action produces. It can be turned into the
//! card-container HTML fragment or consumed field by field by a terminal UI.

use cafeswipe_core::Candidate;
use percent_encoding::{utf8_percent_encode, AsciiSet, NON_ALPHANUMERIC};

pub const PLACEHOLDER_IMAGE: &str = "https://via.placeholder.com/400x280?text=No+Image";
pub const UNKNOWN_NAME: &str = "Unknown";
pub const RATING_UNAVAILABLE: &str = "N/A";

pub const NO_NEW_MESSAGE: &str = "No new cafes ☕";
pub const EXHAUSTED_MESSAGE: &str = "No more cafes 🎉";
pub const NO_SAVED_MESSAGE: &str = "No saved cafes yet ☕";

/// Characters left unescaped by JavaScript's `encodeURIComponent`.
const COMPONENT: &AsciiSet = &NON_ALPHANUMERIC
    .remove(b'-')
    .remove(b'_')
    .remove(b'.')
    .remove(b'!')
    .remove(b'~')
    .remove(b'*')
    .remove(b'\'')
    .remove(b'(')
    .remove(b')');

/// Display fields derived from one candidate.
#[derive(Debug, Clone, PartialEq)]
pub struct CardView {
    pub place_id: String,
    pub name: String,
    pub image_src: String,
    pub rating: String,
}

#[derive(Debug, Clone, PartialEq)]
pub enum View {
    /// The candidate under the cursor.
    Card(CardView),
    /// A fetch succeeded but every result had been seen already.
    NoNewCandidates,
    /// The cursor reached the end of the batch.
    Exhausted,
    /// The saved list, in insertion order.
    Saved(Vec<CardView>),
    /// Saved view with nothing saved.
    NoSaved,
}

/// Name shown for a candidate: the first non-blank of display name and
/// formatted address, else [`UNKNOWN_NAME`].
#[must_use]
pub fn display_name(candidate: &Candidate) -> &str {
    [
        candidate.display_name.as_deref(),
        candidate.formatted_address.as_deref(),
    ]
    .into_iter()
    .flatten()
    .map(str::trim)
    .find(|s| !s.is_empty())
    .unwrap_or(UNKNOWN_NAME)
}

/// Image URL for a candidate: the relay photo proxy for the first named
/// photo, else [`PLACEHOLDER_IMAGE`].
#[must_use]
pub fn image_source(candidate: &Candidate) -> String {
    candidate
        .photos
        .iter()
        .map(|p| p.name.trim())
        .find(|name| !name.is_empty())
        .map_or_else(
            || PLACEHOLDER_IMAGE.to_string(),
            |name| format!("/places/photo?name={}", utf8_percent_encode(name, COMPONENT)),
        )
}

#[must_use]
pub fn rating_label(candidate: &Candidate) -> String {
    match candidate.rating {
        Some(r) if r.is_finite() && r > 0.0 => r.to_string(),
        _ => RATING_UNAVAILABLE.to_string(),
    }
}

/// Escapes text for insertion into HTML element content or a quoted attribute.
#[must_use]
pub fn escape_html(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    for c in input.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

impl CardView {
    #[must_use]
    pub fn from_candidate(candidate: &Candidate) -> Self {
        Self {
            place_id: candidate.place_id.clone(),
            name: display_name(candidate).to_string(),
            image_src: image_source(candidate),
            rating: rating_label(candidate),
        }
    }

    /// `<div class="location-card">` fragment; every field is escaped.
    #[must_use]
    pub fn to_html(&self) -> String {
        let name = escape_html(&self.name);
        format!(
            "<div class=\"location-card\">\n  \
             <img src=\"{src}\" alt=\"{name}\" onerror=\"this.src='{placeholder}'\"/>\n  \
             <h3>{name}</h3>\n  \
             <p>⭐ {rating}</p>\n\
             </div>",
            src = escape_html(&self.image_src),
            placeholder = PLACEHOLDER_IMAGE,
            rating = escape_html(&self.rating),
        )
    }
}

impl View {
    /// Contents of the `.cards` container.
    #[must_use]
    pub fn to_html(&self) -> String {
        match self {
            View::Card(card) => card.to_html(),
            View::NoNewCandidates => empty_message(NO_NEW_MESSAGE),
            View::Exhausted => empty_message(EXHAUSTED_MESSAGE),
            View::NoSaved => empty_message(NO_SAVED_MESSAGE),
            View::Saved(cards) => cards
                .iter()
                .map(CardView::to_html)
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    /// The message shown instead of cards, if this view has one.
    #[must_use]
    pub fn message(&self) -> Option<&'static str> {
        match self {
            View::NoNewCandidates => Some(NO_NEW_MESSAGE),
            View::Exhausted => Some(EXHAUSTED_MESSAGE),
            View::NoSaved => Some(NO_SAVED_MESSAGE),
            View::Card(_) | View::Saved(_) => None,
        }
    }
}

fn empty_message(text: &str) -> String {
    format!("<p class='empty'>{}</p>", escape_html(text))
}
