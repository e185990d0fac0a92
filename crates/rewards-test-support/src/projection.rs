//! Test projector — recording `Projector` implementation for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use rewards_core::error::DomainError;
use rewards_core::projection::Projector;
use rewards_core::repository::StoredEvent;

/// A projector that records every event it is handed, in order, without
/// touching any read model.
#[derive(Debug, Default)]
pub struct RecordingProjector {
    handled: Mutex<Vec<StoredEvent>>,
}

impl RecordingProjector {
    /// Create a new recording projector.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all events handled so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn handled_events(&self) -> Vec<StoredEvent> {
        self.handled.lock().unwrap().clone()
    }
}

#[async_trait]
impl Projector for RecordingProjector {
    async fn handle(&self, event: &StoredEvent) -> Result<(), DomainError> {
        self.handled.lock().unwrap().push(event.clone());
        Ok(())
    }
}
