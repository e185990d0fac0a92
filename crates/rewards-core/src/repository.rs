//! Event repository abstraction.

use async_trait::async_trait;

use crate::error::DomainError;

/// Stored representation of a domain event.
#[derive(Debug, Clone)]
pub struct StoredEvent {
    /// Unique event identifier.
    pub event_id: uuid::Uuid,
    /// Account stream this event belongs to.
    pub aggregate_id: String,
    /// Event type name (interop only; payload decoding is enum-driven).
    pub event_type: String,
    /// Serialized event payload.
    pub payload: serde_json::Value,
    /// Version within the aggregate stream. For one aggregate the committed
    /// versions are exactly `{1..N}`, gap-free.
    pub version: i64,
    /// Timestamp of event creation.
    pub occurred_at: chrono::DateTime<chrono::Utc>,
}

/// Repository trait for loading and appending domain events.
#[async_trait]
pub trait EventRepository: Send + Sync {
    /// Load all events for a given aggregate, ordered by version ascending.
    async fn load_events(&self, aggregate_id: &str) -> Result<Vec<StoredEvent>, DomainError>;

    /// Append new events to an aggregate stream with optimistic concurrency.
    ///
    /// `expected_version` is the last version the writer observed; the batch
    /// must occupy versions `expected_version + 1 ..= expected_version + N`.
    /// The append is all-or-nothing: on `ConcurrencyConflict` no event from
    /// the batch is persisted. An empty batch is a no-op.
    async fn append_events(
        &self,
        aggregate_id: &str,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError>;
}
