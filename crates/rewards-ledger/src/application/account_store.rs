//! Event-store facade for `RewardAccount` streams.

use rewards_core::aggregate::AggregateRoot;
use rewards_core::error::DomainError;
use rewards_core::event::DomainEvent;
use rewards_core::repository::{EventRepository, StoredEvent};

use crate::domain::aggregates::RewardAccount;
use crate::domain::events::RewardEvent;

/// Persists and reconstructs `RewardAccount` aggregates over an
/// [`EventRepository`].
///
/// The store itself never retries: on `ConcurrencyConflict` the caller must
/// reload the aggregate, re-validate its command against fresh state, and
/// retry from scratch.
pub struct RewardAccountStore<'a> {
    repository: &'a dyn EventRepository,
}

impl<'a> RewardAccountStore<'a> {
    /// Creates a store over the given repository.
    #[must_use]
    pub fn new(repository: &'a dyn EventRepository) -> Self {
        Self { repository }
    }

    /// Persists the account's uncommitted events as one atomic batch.
    ///
    /// Each pending event occupies the version immediately following the
    /// account's last persisted version: with N pending events the batch
    /// fills `(version - N) + 1 ..= version`. On success the uncommitted
    /// list is cleared and the persisted events are returned for projection
    /// and publication. A no-op returning an empty list when nothing is
    /// pending.
    ///
    /// # Errors
    ///
    /// Returns `ConcurrencyConflict` if another writer committed against
    /// the same base version first; no events are persisted in that case.
    pub async fn append(
        &self,
        account: &mut RewardAccount,
    ) -> Result<Vec<StoredEvent>, DomainError> {
        let pending = account.uncommitted_events();
        if pending.is_empty() {
            return Ok(Vec::new());
        }

        #[allow(clippy::cast_possible_wrap)]
        let base_version = account.version() - pending.len() as i64;

        #[allow(clippy::cast_possible_wrap)]
        let stored: Vec<StoredEvent> = pending
            .iter()
            .enumerate()
            .map(|(i, event)| StoredEvent {
                event_id: event.event_id,
                aggregate_id: account.user_id.clone(),
                event_type: event.event_type().to_owned(),
                payload: event.to_payload(),
                version: base_version + i as i64 + 1,
                occurred_at: event.occurred_at,
            })
            .collect();

        self.repository
            .append_events(&account.user_id, base_version, &stored)
            .await?;

        account.clear_uncommitted_events();
        Ok(stored)
    }

    /// Reconstructs an account by replaying its full persisted history.
    ///
    /// # Errors
    ///
    /// Returns `AccountNotFound` if no events exist for `user_id`, and
    /// `Infrastructure` if a persisted payload fails to decode.
    pub async fn load(&self, user_id: &str) -> Result<RewardAccount, DomainError> {
        let stored = self.repository.load_events(user_id).await?;
        if stored.is_empty() {
            return Err(DomainError::AccountNotFound(user_id.to_owned()));
        }

        let history = stored
            .iter()
            .map(RewardEvent::try_from)
            .collect::<Result<Vec<_>, _>>()?;

        RewardAccount::replay_from_events(history)
    }
}
