//! Downstream event publication abstraction.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::repository::StoredEvent;

/// Trait for forwarding persisted events to an external notification
/// channel.
///
/// Publication is fire-and-forget from the core's perspective: no domain
/// invariant depends on it succeeding, and delivery downstream is
/// at-least-once.
#[async_trait]
pub trait EventPublisher: Send + Sync {
    /// Forward one persisted event downstream.
    async fn publish(&self, event: &StoredEvent) -> Result<(), DomainError>;
}
