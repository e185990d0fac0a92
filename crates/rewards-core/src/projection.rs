//! Read-model projection abstraction.

use async_trait::async_trait;

use crate::error::DomainError;
use crate::repository::StoredEvent;

/// Trait for projectors that fold persisted events into read models.
///
/// Events for the same aggregate must be handed over in ascending version
/// order; the read models are running accumulators, not recomputed per event.
#[async_trait]
pub trait Projector: Send + Sync {
    /// Apply one already-persisted event to every read model it affects.
    ///
    /// Implementations must be idempotent under redelivery: handling the
    /// same event twice must not double-count.
    async fn handle(&self, event: &StoredEvent) -> Result<(), DomainError>;
}
