//! Query handlers for the reward points context.
//!
//! These reconstitute the aggregate from its event stream. Read-model
//! queries (balances, review summaries, history) live with the projections.

use rewards_core::error::DomainError;
use rewards_core::repository::EventRepository;
use serde::Serialize;

use super::account_store::RewardAccountStore;

/// Read-only view of a reward account aggregate.
#[derive(Debug, Serialize)]
pub struct RewardAccountView {
    /// The account identifier.
    pub user_id: String,
    /// Current balance derived from the event stream.
    pub balance: i64,
    /// Current version (event count).
    pub version: i64,
}

/// Retrieves a reward account by replaying its event stream.
///
/// # Errors
///
/// Returns `AccountNotFound` if no events exist for `user_id`, and
/// `Infrastructure` if a persisted payload fails to decode.
pub async fn get_reward_account(
    user_id: &str,
    repository: &dyn EventRepository,
) -> Result<RewardAccountView, DomainError> {
    let account = RewardAccountStore::new(repository).load(user_id).await?;
    Ok(RewardAccountView {
        user_id: account.user_id,
        balance: account.balance,
        version: account.version,
    })
}

#[cfg(test)]
mod tests {
    use chrono::{TimeZone, Utc};
    use rewards_core::repository::StoredEvent;
    use rewards_test_support::{EmptyEventRepository, RecordingEventRepository};
    use uuid::Uuid;

    use super::*;
    use crate::domain::events::{PointsGranted, PointsRevoked, RewardEventKind};

    const USER_ID: &str = "user-123";

    fn stored(version: i64, kind: &RewardEventKind) -> StoredEvent {
        StoredEvent {
            event_id: Uuid::new_v4(),
            aggregate_id: USER_ID.to_owned(),
            event_type: "PointsGranted".to_owned(),
            payload: serde_json::to_value(kind).unwrap(),
            version,
            occurred_at: Utc.with_ymd_and_hms(2026, 1, 15, 10, 0, 0).unwrap(),
        }
    }

    #[tokio::test]
    async fn test_get_reward_account_returns_replayed_view() {
        // Arrange: grant 50, revoke 20.
        let granted = RewardEventKind::PointsGranted(PointsGranted {
            user_id: USER_ID.to_owned(),
            review_id: "review-abc".to_owned(),
            points: 50,
            reason: String::new(),
        });
        let revoked = RewardEventKind::PointsRevoked(PointsRevoked {
            user_id: USER_ID.to_owned(),
            review_id: "review-abc".to_owned(),
            points: 20,
            reason: String::new(),
        });
        let repo =
            RecordingEventRepository::new(Ok(vec![stored(1, &granted), stored(2, &revoked)]));

        // Act
        let view = get_reward_account(USER_ID, &repo).await.unwrap();

        // Assert
        assert_eq!(view.user_id, USER_ID);
        assert_eq!(view.balance, 30);
        assert_eq!(view.version, 2);
    }

    #[tokio::test]
    async fn test_get_reward_account_returns_not_found_when_no_events() {
        let repo = EmptyEventRepository;

        let result = get_reward_account(USER_ID, &repo).await;

        match result {
            Err(DomainError::AccountNotFound(user_id)) => assert_eq!(user_id, USER_ID),
            other => panic!("expected AccountNotFound, got {other:?}"),
        }
    }
}
