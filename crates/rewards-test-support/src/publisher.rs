//! Test publishers — mock `EventPublisher` implementations for tests.

use std::sync::Mutex;

use async_trait::async_trait;
use rewards_core::error::DomainError;
use rewards_core::publisher::EventPublisher;
use rewards_core::repository::StoredEvent;

/// A publisher that records every event it is handed, in order.
#[derive(Debug, Default)]
pub struct RecordingPublisher {
    published: Mutex<Vec<StoredEvent>>,
}

impl RecordingPublisher {
    /// Create a new recording publisher.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of all events published so far, in order.
    ///
    /// # Panics
    ///
    /// Panics if the internal mutex is poisoned.
    pub fn published_events(&self) -> Vec<StoredEvent> {
        self.published.lock().unwrap().clone()
    }
}

#[async_trait]
impl EventPublisher for RecordingPublisher {
    async fn publish(&self, event: &StoredEvent) -> Result<(), DomainError> {
        self.published.lock().unwrap().push(event.clone());
        Ok(())
    }
}

/// A publisher that always fails. Useful for asserting that publication is
/// fire-and-forget.
#[derive(Debug)]
pub struct FailingPublisher;

#[async_trait]
impl EventPublisher for FailingPublisher {
    async fn publish(&self, _event: &StoredEvent) -> Result<(), DomainError> {
        Err(DomainError::Infrastructure("bus unavailable".into()))
    }
}
