use cafeswipe_core::Coordinates;

use crate::error::DiscoveryError;

/// Source of the user's current position.
pub trait LocationProvider {
    /// # Errors
    ///
    /// Returns [`DiscoveryError::LocationUnavailable`] when no position can
    /// be obtained.
    fn current_position(&self) -> Result<Coordinates, DiscoveryError>;
}

/// A position supplied up front (command-line flags, environment), or none.
#[derive(Debug, Clone, Copy, Default)]
pub struct FixedLocation(pub Option<Coordinates>);

impl FixedLocation {
    #[must_use]
    pub fn at(coords: Coordinates) -> Self {
        Self(Some(coords))
    }

    #[must_use]
    pub fn unavailable() -> Self {
        Self(None)
    }
}

impl LocationProvider for FixedLocation {
    fn current_position(&self) -> Result<Coordinates, DiscoveryError> {
        self.0.ok_or_else(|| {
            DiscoveryError::LocationUnavailable("no position was provided".to_string())
        })
    }
}
