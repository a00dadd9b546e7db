//! Discovery session: the mode state machine over a batch and a registry.
//!
//! All mutating operations take `&mut self`, so a session can only have one
//! discovery fetch in flight; a second fetch cannot start until the first
//! one has either replaced the batch or failed.

use std::collections::HashSet;

use cafeswipe_core::Candidate;

use crate::batch::CandidateBatch;
use crate::error::{DiscoveryError, StoreError};
use crate::location::LocationProvider;
use crate::registry::{Registry, SaveOutcome};
use crate::relay::{RelayClient, SearchParams};
use crate::render::{CardView, View};
use crate::store::SavedStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    Discovering,
    ViewingSaved,
}

pub struct Session<S> {
    relay: RelayClient,
    params: SearchParams,
    registry: Registry<S>,
    batch: CandidateBatch,
    mode: Mode,
}

impl<S: SavedStore> Session<S> {
    /// Opens a session, loading the saved list from `store`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the saved list cannot be read.
    pub fn open(relay: RelayClient, params: SearchParams, store: S) -> Result<Self, StoreError> {
        Ok(Self {
            relay,
            params,
            registry: Registry::open(store)?,
            batch: CandidateBatch::default(),
            mode: Mode::Discovering,
        })
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.mode
    }

    #[must_use]
    pub fn batch(&self) -> &CandidateBatch {
        &self.batch
    }

    #[must_use]
    pub fn registry(&self) -> &Registry<S> {
        &self.registry
    }

    #[must_use]
    pub fn relay(&self) -> &RelayClient {
        &self.relay
    }

    /// Fetches candidates near the provider's position, replaces the batch
    /// with the unseen ones, and presents the first.
    ///
    /// # Errors
    ///
    /// Any [`DiscoveryError`]. On error the batch, cursor, and mode are left
    /// exactly as they were.
    pub async fn discover(
        &mut self,
        location: &impl LocationProvider,
    ) -> Result<View, DiscoveryError> {
        let coords = location.current_position()?;
        let fetched = self.relay.nearby(coords, &self.params).await?;
        let fetched_count = fetched.len();
        let fresh = self.unseen(fetched);

        tracing::info!(
            latitude = coords.latitude,
            longitude = coords.longitude,
            fetched = fetched_count,
            fresh = fresh.len(),
            "discovery batch loaded"
        );

        let empty = fresh.is_empty();
        self.batch.replace(fresh);
        self.mode = Mode::Discovering;

        if empty {
            return Ok(View::NoNewCandidates);
        }
        Ok(self.present())
    }

    /// Skips the current candidate. Ignored (returns `None`) outside
    /// discover mode or once the batch is exhausted.
    pub fn skip(&mut self) -> Option<View> {
        if !self.can_act("skip") {
            return None;
        }
        self.batch.advance();
        Some(self.present())
    }

    /// Saves the current candidate and moves to the next one. Ignored
    /// (returns `Ok(None)`) outside discover mode or once exhausted.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if persisting fails; the cursor does not move.
    pub fn save(&mut self) -> Result<Option<View>, StoreError> {
        if !self.can_act("save") {
            return Ok(None);
        }
        if let Some(current) = self.batch.current().cloned() {
            if self.registry.save(&current)? == SaveOutcome::AlreadySaved {
                tracing::debug!(place_id = %current.place_id, "candidate already saved");
            }
        }
        self.batch.advance();
        Ok(Some(self.present()))
    }

    /// Switches to the saved view and renders the whole saved list.
    pub fn show_saved(&mut self) -> View {
        self.mode = Mode::ViewingSaved;
        self.present()
    }

    /// Renders the current state. In discover mode the shown candidate is
    /// marked seen.
    pub fn present(&mut self) -> View {
        match self.mode {
            Mode::ViewingSaved => {
                let saved = self.registry.saved();
                if saved.is_empty() {
                    View::NoSaved
                } else {
                    View::Saved(saved.iter().map(CardView::from_candidate).collect())
                }
            }
            Mode::Discovering => match self.batch.current() {
                Some(candidate) => {
                    let card = CardView::from_candidate(candidate);
                    self.registry.mark_seen(&card.place_id);
                    View::Card(card)
                }
                None if self.batch.is_empty() => View::NoNewCandidates,
                None => View::Exhausted,
            },
        }
    }

    fn can_act(&self, action: &str) -> bool {
        if self.mode != Mode::Discovering {
            tracing::debug!(action, mode = ?self.mode, "action ignored outside discover mode");
            return false;
        }
        if self.batch.is_exhausted() {
            tracing::debug!(action, "action ignored on exhausted batch");
            return false;
        }
        true
    }

    /// Drops blank ids, ids already seen, and repeats within the response.
    fn unseen(&self, fetched: Vec<Candidate>) -> Vec<Candidate> {
        let mut in_batch = HashSet::new();
        fetched
            .into_iter()
            .filter(|c| !c.place_id.trim().is_empty())
            .filter(|c| !self.registry.is_seen(&c.place_id))
            .filter(|c| in_batch.insert(c.place_id.clone()))
            .collect()
    }
}
