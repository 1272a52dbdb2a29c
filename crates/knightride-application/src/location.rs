use async_trait::async_trait;
use knightride_core::Location;

/// Source of the rider's position at the moment an alert fires.
#[async_trait]
pub trait LocationProvider: Send + Sync {
    /// Returns `None` when no fix is available.
    async fn current_location(&self) -> Option<Location>;
}

/// Provider that always reports the same position.
#[derive(Debug, Clone, Copy)]
pub struct FixedLocation(pub Location);

#[async_trait]
impl LocationProvider for FixedLocation {
    async fn current_location(&self) -> Option<Location> {
        Some(self.0)
    }
}
