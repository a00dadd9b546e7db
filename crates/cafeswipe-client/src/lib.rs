//! Client side of CafeSwipe: discovery, dedup, and saving of nearby cafés.
//!
//! A [`Session`] fetches candidates through the relay ([`RelayClient`]),
//! filters out everything the [`Registry`] has already seen, walks the
//! resulting [`CandidateBatch`] one card at a time, and persists saves
//! through a [`SavedStore`].

pub mod batch;
pub mod error;
pub mod location;
pub mod registry;
pub mod relay;
pub mod render;
pub mod session;
pub mod store;

pub use batch::CandidateBatch;
pub use error::{DiscoveryError, StoreError};
pub use location::{FixedLocation, LocationProvider};
pub use registry::{Registry, SaveOutcome};
pub use relay::{RelayClient, SearchParams};
pub use render::{display_name, escape_html, CardView, View};
pub use session::{Mode, Session};
pub use store::{JsonFileStore, MemoryStore, SavedStore};
