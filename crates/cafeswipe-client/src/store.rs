//! Durable storage for the saved-candidate list.
//!
//! The list is a single JSON document that is read once and overwritten
//! wholesale on every save.

use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::{Mutex, PoisonError};

use cafeswipe_core::Candidate;
use tempfile::NamedTempFile;

use crate::error::StoreError;

/// Backing store for the ordered saved list.
pub trait SavedStore {
    /// Reads the whole saved list. A store that was never written is empty.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the list exists but cannot be read or parsed.
    fn load(&self) -> Result<Vec<Candidate>, StoreError>;

    /// Replaces the saved list with `saved`.
    ///
    /// # Errors
    ///
    /// Returns a [`StoreError`] if the write does not complete; the previous
    /// contents must then still be intact.
    fn store(&self, saved: &[Candidate]) -> Result<(), StoreError>;
}

/// Saved list kept in one JSON file.
///
/// Writes go to a temp file in the same directory which is then renamed over
/// the target, so readers only ever see a complete document.
#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    #[must_use]
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_err(&self, source: std::io::Error) -> StoreError {
        StoreError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl SavedStore for JsonFileStore {
    fn load(&self) -> Result<Vec<Candidate>, StoreError> {
        let raw = match std::fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Vec::new()),
            Err(e) => return Err(self.io_err(e)),
        };

        if raw.trim().is_empty() {
            return Ok(Vec::new());
        }

        serde_json::from_str(&raw).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })
    }

    fn store(&self, saved: &[Candidate]) -> Result<(), StoreError> {
        let dir = match self.path.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent,
            _ => Path::new("."),
        };
        std::fs::create_dir_all(dir).map_err(|e| self.io_err(e))?;

        let json = serde_json::to_vec_pretty(saved).map_err(|source| StoreError::Json {
            path: self.path.clone(),
            source,
        })?;

        let mut tmp = NamedTempFile::new_in(dir).map_err(|e| self.io_err(e))?;
        tmp.write_all(&json).map_err(|e| self.io_err(e))?;
        tmp.as_file().sync_all().map_err(|e| self.io_err(e))?;
        tmp.persist(&self.path)
            .map_err(|source| StoreError::Persist {
                path: self.path.clone(),
                source,
            })?;

        tracing::debug!(path = %self.path.display(), count = saved.len(), "saved list written");
        Ok(())
    }
}

/// In-process store, for tests and throwaway sessions.
#[derive(Debug, Default)]
pub struct MemoryStore {
    saved: Mutex<Vec<Candidate>>,
}

impl MemoryStore {
    #[must_use]
    pub fn with_saved(saved: Vec<Candidate>) -> Self {
        Self {
            saved: Mutex::new(saved),
        }
    }

    /// Current durable contents.
    #[must_use]
    pub fn snapshot(&self) -> Vec<Candidate> {
        self.saved
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

impl SavedStore for MemoryStore {
    fn load(&self) -> Result<Vec<Candidate>, StoreError> {
        Ok(self.snapshot())
    }

    fn store(&self, saved: &[Candidate]) -> Result<(), StoreError> {
        *self.saved.lock().unwrap_or_else(PoisonError::into_inner) = saved.to_vec();
        Ok(())
    }
}
