//! `PostgreSQL` implementation of the `EventRepository` trait.

use async_trait::async_trait;
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Postgres, QueryBuilder, Row};

use rewards_core::error::DomainError;
use rewards_core::repository::{EventRepository, StoredEvent};

/// PostgreSQL-backed event repository.
///
/// Appends are all-or-nothing: the batch is inserted inside one
/// transaction, guarded twice — an explicit expected-version check (which
/// also catches stale writers whose version ranges would not collide), and
/// the `(aggregate_id, version)` uniqueness constraint, which is what
/// actually serializes two writers racing past the check.
#[derive(Debug, Clone)]
pub struct PgEventRepository {
    pool: PgPool,
}

impl PgEventRepository {
    /// Creates a new `PgEventRepository`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Current stream version: the highest committed version for the
    /// aggregate, or 0 for a stream with no events.
    async fn current_version<'e, E>(executor: E, aggregate_id: &str) -> Result<i64, DomainError>
    where
        E: sqlx::Executor<'e, Database = Postgres>,
    {
        sqlx::query_scalar(
            r"SELECT COALESCE(MAX(version), 0) FROM reward_events WHERE aggregate_id = $1",
        )
        .bind(aggregate_id)
        .fetch_one(executor)
        .await
        .map_err(|e| DomainError::Infrastructure(e.to_string()))
    }
}

fn row_to_stored_event(row: &PgRow) -> Result<StoredEvent, DomainError> {
    let read = |e: sqlx::Error| DomainError::Infrastructure(e.to_string());
    Ok(StoredEvent {
        event_id: row.try_get("event_id").map_err(read)?,
        aggregate_id: row.try_get("aggregate_id").map_err(read)?,
        event_type: row.try_get("event_type").map_err(read)?,
        payload: row.try_get("payload").map_err(read)?,
        version: row.try_get("version").map_err(read)?,
        occurred_at: row.try_get("occurred_at").map_err(read)?,
    })
}

fn is_unique_violation(error: &sqlx::Error) -> bool {
    error
        .as_database_error()
        .is_some_and(sqlx::error::DatabaseError::is_unique_violation)
}

#[async_trait]
impl EventRepository for PgEventRepository {
    #[tracing::instrument(skip(self))]
    async fn load_events(&self, aggregate_id: &str) -> Result<Vec<StoredEvent>, DomainError> {
        let rows = sqlx::query(
            r"
            SELECT event_id, aggregate_id, event_type, payload, version, occurred_at
            FROM reward_events
            WHERE aggregate_id = $1
            ORDER BY version ASC
            ",
        )
        .bind(aggregate_id)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(e.to_string()))?;

        rows.iter().map(row_to_stored_event).collect()
    }

    #[tracing::instrument(skip(self, events), fields(events_len = events.len()))]
    async fn append_events(
        &self,
        aggregate_id: &str,
        expected_version: i64,
        events: &[StoredEvent],
    ) -> Result<(), DomainError> {
        if events.is_empty() {
            return Ok(());
        }

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;

        let actual = Self::current_version(&mut *tx, aggregate_id).await?;
        if actual != expected_version {
            return Err(DomainError::ConcurrencyConflict {
                aggregate_id: aggregate_id.to_owned(),
                expected: expected_version,
                actual,
            });
        }

        let mut qb = QueryBuilder::<Postgres>::new(
            "INSERT INTO reward_events (event_id, aggregate_id, event_type, payload, version, occurred_at) ",
        );
        qb.push_values(events, |mut b, event| {
            b.push_bind(event.event_id);
            b.push_bind(&event.aggregate_id);
            b.push_bind(&event.event_type);
            b.push_bind(&event.payload);
            b.push_bind(event.version);
            b.push_bind(event.occurred_at);
        });

        let inserted = qb.build().execute(&mut *tx).await;
        match inserted {
            Ok(_) => {}
            Err(error) if is_unique_violation(&error) => {
                // Another writer committed between the version check and the
                // insert; the constraint is the arbiter. Re-read the stream
                // version outside the aborted transaction to report it.
                drop(tx);
                let actual = Self::current_version(&self.pool, aggregate_id).await?;
                return Err(DomainError::ConcurrencyConflict {
                    aggregate_id: aggregate_id.to_owned(),
                    expected: expected_version,
                    actual,
                });
            }
            Err(error) => return Err(DomainError::Infrastructure(error.to_string())),
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;

        Ok(())
    }
}
