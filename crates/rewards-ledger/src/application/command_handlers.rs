//! Command handlers for the reward points context.
//!
//! Each handler runs one load-mutate-append cycle against the event store,
//! then hands the persisted events to the projector in commit order and
//! forwards them downstream. Handlers never retry: a `ConcurrencyConflict`
//! is returned to the caller, who must reload and re-validate from fresh
//! state.

use rewards_core::clock::Clock;
use rewards_core::error::DomainError;
use rewards_core::projection::Projector;
use rewards_core::publisher::EventPublisher;
use rewards_core::repository::{EventRepository, StoredEvent};

use crate::domain::aggregates::RewardAccount;
use crate::domain::commands::{GrantPoints, RefundPoints, RevokePoints};

use super::account_store::RewardAccountStore;

/// Handles the `GrantPoints` command.
///
/// A missing account is not an error here: the first grant creates the
/// stream, so `AccountNotFound` on load falls back to a fresh zero-state
/// account.
///
/// # Errors
///
/// Returns `DomainError` if validation, persistence, or projection fails.
#[tracing::instrument(skip_all, fields(user_id = %command.user_id, correlation_id = %command.correlation_id))]
pub async fn handle_grant_points(
    command: &GrantPoints,
    clock: &dyn Clock,
    repository: &dyn EventRepository,
    projector: &dyn Projector,
    publisher: &dyn EventPublisher,
) -> Result<Vec<StoredEvent>, DomainError> {
    let store = RewardAccountStore::new(repository);
    let mut account = match store.load(&command.user_id).await {
        Ok(account) => account,
        Err(DomainError::AccountNotFound(_)) => RewardAccount::new(command.user_id.clone()),
        Err(error) => return Err(error),
    };

    account.grant_points(
        command.points,
        command.reason.clone(),
        command.review_id.clone(),
        clock,
    )?;

    let stored = store.append(&mut account).await?;
    dispatch_downstream(&stored, projector, publisher).await?;
    Ok(stored)
}

/// Handles the `RefundPoints` command.
///
/// Refunds mutate an existing account, so `AccountNotFound` propagates.
///
/// # Errors
///
/// Returns `DomainError` if validation, persistence, or projection fails.
#[tracing::instrument(skip_all, fields(user_id = %command.user_id, correlation_id = %command.correlation_id))]
pub async fn handle_refund_points(
    command: &RefundPoints,
    clock: &dyn Clock,
    repository: &dyn EventRepository,
    projector: &dyn Projector,
    publisher: &dyn EventPublisher,
) -> Result<Vec<StoredEvent>, DomainError> {
    let store = RewardAccountStore::new(repository);
    let mut account = store.load(&command.user_id).await?;

    account.refund_points(
        command.points,
        command.reason.clone(),
        command.order_id.clone(),
        clock,
    )?;

    let stored = store.append(&mut account).await?;
    dispatch_downstream(&stored, projector, publisher).await?;
    Ok(stored)
}

/// Handles the `RevokePoints` command.
///
/// Revocations mutate an existing account, so `AccountNotFound` propagates.
///
/// # Errors
///
/// Returns `DomainError` if validation, persistence, or projection fails.
#[tracing::instrument(skip_all, fields(user_id = %command.user_id, correlation_id = %command.correlation_id))]
pub async fn handle_revoke_points(
    command: &RevokePoints,
    clock: &dyn Clock,
    repository: &dyn EventRepository,
    projector: &dyn Projector,
    publisher: &dyn EventPublisher,
) -> Result<Vec<StoredEvent>, DomainError> {
    let store = RewardAccountStore::new(repository);
    let mut account = store.load(&command.user_id).await?;

    account.revoke_points(
        command.points,
        command.reason.clone(),
        command.review_id.clone(),
        clock,
    )?;

    let stored = store.append(&mut account).await?;
    dispatch_downstream(&stored, projector, publisher).await?;
    Ok(stored)
}

/// Projects and publishes a freshly persisted batch, in commit order.
///
/// Projection failures propagate: the event log already holds the batch, so
/// the caller sees the error while the read models stay rebuildable.
/// Publication is fire-and-forget; failures are logged and swallowed.
async fn dispatch_downstream(
    events: &[StoredEvent],
    projector: &dyn Projector,
    publisher: &dyn EventPublisher,
) -> Result<(), DomainError> {
    for event in events {
        projector.handle(event).await?;
        if let Err(error) = publisher.publish(event).await {
            tracing::warn!(
                event_id = %event.event_id,
                aggregate_id = %event.aggregate_id,
                %error,
                "event publication failed; continuing"
            );
        }
    }
    Ok(())
}
