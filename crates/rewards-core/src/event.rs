//! Domain event abstractions.

use chrono::{DateTime, Utc};
use uuid::Uuid;

/// Trait that all domain events implement.
///
/// Events carry their identity and creation time; the stream version is
/// assigned by the event store at append time, not at creation.
pub trait DomainEvent: Send + Sync + std::fmt::Debug {
    /// Returns the event type name (stored for interop, never used for
    /// dispatch).
    fn event_type(&self) -> &'static str;

    /// Serializes the event payload to JSON.
    fn to_payload(&self) -> serde_json::Value;

    /// Globally unique event identifier, assigned at creation.
    fn event_id(&self) -> Uuid;

    /// Timestamp of event creation.
    fn occurred_at(&self) -> DateTime<Utc>;
}
