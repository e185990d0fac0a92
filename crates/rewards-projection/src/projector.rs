//! Read-model projector for reward point events.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres, Transaction};

use rewards_core::error::DomainError;
use rewards_core::projection::Projector;
use rewards_core::repository::StoredEvent;
use rewards_ledger::domain::events::RewardEventKind;

/// Projects persisted reward events into all three read models.
///
/// Every event is handled inside one transaction guarded by a
/// per-aggregate checkpoint: an event whose version does not advance the
/// checkpoint is skipped entirely, so redelivery and replay-after-crash
/// cannot double-count. Events for one aggregate must arrive in ascending
/// version order.
#[derive(Debug, Clone)]
pub struct PointProjector {
    pool: PgPool,
}

impl PointProjector {
    /// Creates a new `PointProjector`.
    #[must_use]
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    /// Rebuilds all read models from scratch by replaying every persisted
    /// event in `(aggregate_id, version)` order.
    ///
    /// Not safe to run concurrently with live projection.
    ///
    /// # Errors
    ///
    /// Returns `Infrastructure` if truncation, loading, or re-projection
    /// fails.
    pub async fn rebuild(&self) -> Result<(), DomainError> {
        sqlx::query(
            r"
            TRUNCATE reward_balances, review_reward_summary, review_point_history,
                     projection_checkpoints
            ",
        )
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(e.to_string()))?;

        let events = sqlx::query_as::<_, StoredEventRow>(
            r"
            SELECT event_id, aggregate_id, event_type, payload, version, occurred_at
            FROM reward_events
            ORDER BY aggregate_id ASC, version ASC
            ",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::Infrastructure(e.to_string()))?;

        tracing::info!(events_len = events.len(), "rebuilding read models");
        for row in events {
            self.handle(&row.into()).await?;
        }
        Ok(())
    }

    /// Advances the aggregate's checkpoint to `version`.
    ///
    /// Returns `false` without modifying anything if the checkpoint is
    /// already at or past `version` (the event was projected before).
    async fn advance_checkpoint(
        tx: &mut Transaction<'_, Postgres>,
        aggregate_id: &str,
        version: i64,
    ) -> Result<bool, DomainError> {
        let result = sqlx::query(
            r"
            INSERT INTO projection_checkpoints (aggregate_id, last_version)
            VALUES ($1, $2)
            ON CONFLICT (aggregate_id) DO UPDATE
            SET last_version = EXCLUDED.last_version
            WHERE projection_checkpoints.last_version < EXCLUDED.last_version
            ",
        )
        .bind(aggregate_id)
        .bind(version)
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::Infrastructure(e.to_string()))?;

        Ok(result.rows_affected() > 0)
    }

    /// Upserts the user's total balance with the event's signed delta.
    async fn project_user_total_balance(
        tx: &mut Transaction<'_, Postgres>,
        kind: &RewardEventKind,
        occurred_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r"
            INSERT INTO reward_balances (user_id, balance, last_updated_at)
            VALUES ($1, $2, $3)
            ON CONFLICT (user_id) DO UPDATE
            SET balance = reward_balances.balance + EXCLUDED.balance,
                last_updated_at = EXCLUDED.last_updated_at
            ",
        )
        .bind(kind.user_id())
        .bind(kind.points_delta())
        .bind(occurred_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::Infrastructure(e.to_string()))?;
        Ok(())
    }

    /// Upserts the review's net points with the event's signed delta.
    async fn project_review_summary(
        tx: &mut Transaction<'_, Postgres>,
        review_id: &str,
        kind: &RewardEventKind,
        occurred_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r"
            INSERT INTO review_reward_summary (review_id, user_id, net_points, last_updated_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (review_id) DO UPDATE
            SET net_points = review_reward_summary.net_points + EXCLUDED.net_points,
                last_updated_at = EXCLUDED.last_updated_at
            ",
        )
        .bind(review_id)
        .bind(kind.user_id())
        .bind(kind.points_delta())
        .bind(occurred_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::Infrastructure(e.to_string()))?;
        Ok(())
    }

    /// Appends a row to the review's point history. History rows are only
    /// ever inserted, never updated.
    async fn project_review_history(
        tx: &mut Transaction<'_, Postgres>,
        review_id: &str,
        kind: &RewardEventKind,
        occurred_at: DateTime<Utc>,
    ) -> Result<(), DomainError> {
        sqlx::query(
            r"
            INSERT INTO review_point_history (user_id, review_id, points_change, reason, occurred_at)
            VALUES ($1, $2, $3, $4, $5)
            ",
        )
        .bind(kind.user_id())
        .bind(review_id)
        .bind(kind.points_delta())
        .bind(kind.reason())
        .bind(occurred_at)
        .execute(&mut **tx)
        .await
        .map_err(|e| DomainError::Infrastructure(e.to_string()))?;
        Ok(())
    }
}

#[async_trait]
impl Projector for PointProjector {
    #[tracing::instrument(
        skip(self, event),
        fields(aggregate_id = %event.aggregate_id, version = event.version)
    )]
    async fn handle(&self, event: &StoredEvent) -> Result<(), DomainError> {
        let kind: RewardEventKind = serde_json::from_value(event.payload.clone())
            .map_err(|e| DomainError::Infrastructure(format!("undecodable event payload: {e}")))?;

        let mut tx = self
            .pool
            .begin()
            .await
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;

        if !Self::advance_checkpoint(&mut tx, &event.aggregate_id, event.version).await? {
            tracing::debug!("event already projected; skipping");
            return Ok(());
        }

        Self::project_user_total_balance(&mut tx, &kind, event.occurred_at).await?;

        // Review-scoped models only see review-linked events; refunds carry
        // an order_id and are excluded.
        if let Some(review_id) = kind.review_id() {
            Self::project_review_summary(&mut tx, review_id, &kind, event.occurred_at).await?;
            Self::project_review_history(&mut tx, review_id, &kind, event.occurred_at).await?;
        }

        tx.commit()
            .await
            .map_err(|e| DomainError::Infrastructure(e.to_string()))?;
        Ok(())
    }
}

/// Row mapping for replaying the event log during a rebuild.
#[derive(sqlx::FromRow)]
struct StoredEventRow {
    event_id: uuid::Uuid,
    aggregate_id: String,
    event_type: String,
    payload: serde_json::Value,
    version: i64,
    occurred_at: DateTime<Utc>,
}

impl From<StoredEventRow> for StoredEvent {
    fn from(row: StoredEventRow) -> Self {
        Self {
            event_id: row.event_id,
            aggregate_id: row.aggregate_id,
            event_type: row.event_type,
            payload: row.payload,
            version: row.version,
            occurred_at: row.occurred_at,
        }
    }
}
