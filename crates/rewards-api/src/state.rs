//! Shared application state.

use std::sync::Arc;

use rewards_core::clock::Clock;
use rewards_core::projection::Projector;
use rewards_core::publisher::EventPublisher;
use rewards_core::repository::EventRepository;
use sqlx::PgPool;

/// Application state shared across all request handlers.
#[derive(Clone)]
pub struct AppState {
    /// PostgreSQL connection pool (read-model queries).
    pub db_pool: PgPool,
    /// Clock used to stamp new events.
    pub clock: Arc<dyn Clock>,
    /// Event stream persistence.
    pub repository: Arc<dyn EventRepository>,
    /// Read-model projector fed after each append.
    pub projector: Arc<dyn Projector>,
    /// Downstream event publication.
    pub publisher: Arc<dyn EventPublisher>,
}

impl AppState {
    /// Create new application state.
    #[must_use]
    pub fn new(
        db_pool: PgPool,
        clock: Arc<dyn Clock>,
        repository: Arc<dyn EventRepository>,
        projector: Arc<dyn Projector>,
        publisher: Arc<dyn EventPublisher>,
    ) -> Self {
        Self {
            db_pool,
            clock,
            repository,
            projector,
            publisher,
        }
    }
}
