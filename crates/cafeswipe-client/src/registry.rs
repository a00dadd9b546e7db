//! Seen/saved registry: the dedup set plus the durable saved list.

use std::collections::HashSet;

use cafeswipe_core::Candidate;

use crate::error::StoreError;
use crate::store::SavedStore;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    Saved,
    AlreadySaved,
}

/// Tracks every place id the user has been shown or has saved.
///
/// The seen-set is seeded from the saved list when the registry is opened
/// and only grows afterwards. Every id saved through [`Registry::save`] is
/// in the durable list before it is added to the seen-set.
pub struct Registry<S> {
    store: S,
    saved: Vec<Candidate>,
    seen: HashSet<String>,
}

impl<S: SavedStore> Registry<S> {
    /// Loads the saved list from `store` and seeds the seen-set from it.
    ///
    /// # Errors
    ///
    /// Returns the store's [`StoreError`] if the saved list cannot be read.
    pub fn open(store: S) -> Result<Self, StoreError> {
        let saved = store.load()?;
        let seen = saved.iter().map(|c| c.place_id.clone()).collect();
        tracing::debug!(saved = saved.len(), "registry opened");
        Ok(Self { store, saved, seen })
    }

    #[must_use]
    pub fn is_seen(&self, place_id: &str) -> bool {
        self.seen.contains(place_id)
    }

    #[must_use]
    pub fn is_saved(&self, place_id: &str) -> bool {
        self.saved.iter().any(|c| c.place_id == place_id)
    }

    /// Records that `place_id` has been presented.
    pub fn mark_seen(&mut self, place_id: &str) {
        if !self.seen.contains(place_id) {
            self.seen.insert(place_id.to_owned());
        }
    }

    /// Saved candidates in insertion order.
    #[must_use]
    pub fn saved(&self) -> &[Candidate] {
        &self.saved
    }

    #[must_use]
    pub fn seen_count(&self) -> usize {
        self.seen.len()
    }

    /// Appends `candidate` to the saved list and persists it, unless a record
    /// with the same id is already saved.
    ///
    /// # Errors
    ///
    /// Returns the store's [`StoreError`] if persisting fails. In that case
    /// neither the in-memory list nor the seen-set is modified.
    pub fn save(&mut self, candidate: &Candidate) -> Result<SaveOutcome, StoreError> {
        if self.is_saved(&candidate.place_id) {
            return Ok(SaveOutcome::AlreadySaved);
        }

        let mut next = Vec::with_capacity(self.saved.len() + 1);
        next.extend_from_slice(&self.saved);
        next.push(candidate.clone());
        self.store.store(&next)?;

        self.saved = next;
        self.mark_seen(&candidate.place_id);
        tracing::info!(place_id = %candidate.place_id, "candidate saved");
        Ok(SaveOutcome::Saved)
    }
}
