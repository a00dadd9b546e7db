//! The current batch of discovered candidates and the cursor into it.

use cafeswipe_core::Candidate;

/// Candidates from the latest discovery fetch.
///
/// Invariant: `0 <= cursor <= items.len()`; `cursor == items.len()` means the
/// batch is exhausted.
#[derive(Debug, Default)]
pub struct CandidateBatch {
    items: Vec<Candidate>,
    cursor: usize,
}

impl CandidateBatch {
    /// Swaps in a new batch and rewinds the cursor.
    pub fn replace(&mut self, items: Vec<Candidate>) {
        self.items = items;
        self.cursor = 0;
    }

    /// Candidate under the cursor, or `None` once exhausted.
    #[must_use]
    pub fn current(&self) -> Option<&Candidate> {
        self.items.get(self.cursor)
    }

    /// Moves past the current candidate. Returns `false` (and does nothing)
    /// if the batch is already exhausted.
    pub fn advance(&mut self) -> bool {
        if self.is_exhausted() {
            return false;
        }
        self.cursor += 1;
        true
    }

    #[must_use]
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    #[must_use]
    pub fn is_exhausted(&self) -> bool {
        self.cursor >= self.items.len()
    }

    #[must_use]
    pub fn items(&self) -> &[Candidate] {
        &self.items
    }
}
