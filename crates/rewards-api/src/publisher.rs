//! Tracing-backed event publication.

use async_trait::async_trait;
use rewards_core::error::DomainError;
use rewards_core::publisher::EventPublisher;
use rewards_core::repository::StoredEvent;

/// Publishes persisted events as structured tracing records.
///
/// Stands in for the external notification channel at the publication
/// seam; swapping in a real bus client only touches this type.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingEventPublisher;

#[async_trait]
impl EventPublisher for TracingEventPublisher {
    async fn publish(&self, event: &StoredEvent) -> Result<(), DomainError> {
        tracing::info!(
            event_id = %event.event_id,
            aggregate_id = %event.aggregate_id,
            event_type = %event.event_type,
            version = event.version,
            "domain event published"
        );
        Ok(())
    }
}
