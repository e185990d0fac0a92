//! Query handlers for the read models.
//!
//! These serve the query side of the ledger: denormalized, eventually
//! consistent with the event log.

use chrono::{DateTime, Utc};
use serde::Serialize;
use sqlx::PgPool;

use rewards_core::error::DomainError;

/// A user's total reward balance.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct RewardBalanceView {
    /// The account identifier.
    pub user_id: String,
    /// Total balance across all events.
    pub balance: i64,
    /// Timestamp of the last event that touched this row.
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// Net points accumulated by a single review.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ReviewRewardSummaryView {
    /// The review identifier.
    pub review_id: String,
    /// The account the review belongs to.
    pub user_id: String,
    /// Net points for this review (grants minus revocations).
    pub net_points: i64,
    /// Timestamp of the last event that touched this row.
    pub last_updated_at: Option<DateTime<Utc>>,
}

/// One row of a review's point history.
#[derive(Debug, Serialize, sqlx::FromRow)]
pub struct ReviewPointHistoryView {
    /// The account the review belongs to.
    pub user_id: String,
    /// The review identifier.
    pub review_id: String,
    /// Signed point change of the event.
    pub points_change: i64,
    /// Free-text reason supplied with the command.
    pub reason: Option<String>,
    /// Timestamp of the underlying event.
    pub occurred_at: DateTime<Utc>,
}

/// Fetches a user's total balance.
///
/// # Errors
///
/// Returns `Infrastructure` if the query fails.
pub async fn get_balance(
    pool: &PgPool,
    user_id: &str,
) -> Result<Option<RewardBalanceView>, DomainError> {
    sqlx::query_as(
        r"
        SELECT user_id, balance, last_updated_at
        FROM reward_balances
        WHERE user_id = $1
        ",
    )
    .bind(user_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| DomainError::Infrastructure(e.to_string()))
}

/// Fetches the net-points summary for a review.
///
/// # Errors
///
/// Returns `Infrastructure` if the query fails.
pub async fn get_review_summary(
    pool: &PgPool,
    review_id: &str,
) -> Result<Option<ReviewRewardSummaryView>, DomainError> {
    sqlx::query_as(
        r"
        SELECT review_id, user_id, net_points, last_updated_at
        FROM review_reward_summary
        WHERE review_id = $1
        ",
    )
    .bind(review_id)
    .fetch_optional(pool)
    .await
    .map_err(|e| DomainError::Infrastructure(e.to_string()))
}

/// Fetches a review's full point history in insertion order.
///
/// # Errors
///
/// Returns `Infrastructure` if the query fails.
pub async fn get_review_history(
    pool: &PgPool,
    review_id: &str,
) -> Result<Vec<ReviewPointHistoryView>, DomainError> {
    sqlx::query_as(
        r"
        SELECT user_id, review_id, points_change, reason, occurred_at
        FROM review_point_history
        WHERE review_id = $1
        ORDER BY id ASC
        ",
    )
    .bind(review_id)
    .fetch_all(pool)
    .await
    .map_err(|e| DomainError::Infrastructure(e.to_string()))
}
