//! Aggregate root for the reward points context.

use rewards_core::aggregate::AggregateRoot;
use rewards_core::clock::Clock;
use rewards_core::error::DomainError;

use super::events::{PointsGranted, PointsRefunded, PointsRevoked, RewardEvent, RewardEventKind};

/// The aggregate root for a user's reward account.
///
/// There is no stored snapshot of current balance: the balance is always
/// derived by folding the account's event history.
#[derive(Debug)]
pub struct RewardAccount {
    /// Account identity; doubles as the event stream key.
    pub user_id: String,
    /// Current balance. Signed: revocations may drive it negative.
    pub balance: i64,
    /// Number of events ever applied (persisted + uncommitted).
    pub version: i64,
    /// Events produced since the last load, pending persistence.
    uncommitted_events: Vec<RewardEvent>,
}

impl RewardAccount {
    /// Creates a brand-new account with zero state.
    #[must_use]
    pub fn new(user_id: String) -> Self {
        Self {
            user_id,
            balance: 0,
            version: 0,
            uncommitted_events: Vec::new(),
        }
    }

    /// Grants points for a review.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCommand` if `points` is not positive. State is
    /// untouched on failure.
    pub fn grant_points(
        &mut self,
        points: i64,
        reason: String,
        review_id: String,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if points <= 0 {
            return Err(DomainError::InvalidCommand(
                "points to grant must be positive".to_owned(),
            ));
        }

        self.apply_and_record(RewardEvent::new(
            RewardEventKind::PointsGranted(PointsGranted {
                user_id: self.user_id.clone(),
                review_id,
                points,
                reason,
            }),
            clock,
        ));
        Ok(())
    }

    /// Refunds (spends) points against an order.
    ///
    /// The balance check runs against the in-memory balance, so uncommitted
    /// events already folded in this session count.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCommand` if `points` is not positive and
    /// `InsufficientBalance` if `points` exceeds the current balance. State
    /// is untouched on failure.
    pub fn refund_points(
        &mut self,
        points: i64,
        reason: String,
        order_id: String,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if points <= 0 {
            return Err(DomainError::InvalidCommand(
                "points to refund must be positive".to_owned(),
            ));
        }
        if points > self.balance {
            return Err(DomainError::InsufficientBalance {
                requested: points,
                available: self.balance,
            });
        }

        self.apply_and_record(RewardEvent::new(
            RewardEventKind::PointsRefunded(PointsRefunded {
                user_id: self.user_id.clone(),
                order_id,
                points,
                reason,
            }),
            clock,
        ));
        Ok(())
    }

    /// Revokes previously granted points (clawback for e.g. a fraudulent
    /// review). No balance floor: the balance may go negative.
    ///
    /// # Errors
    ///
    /// Returns `InvalidCommand` if `points` is not positive. State is
    /// untouched on failure.
    pub fn revoke_points(
        &mut self,
        points: i64,
        reason: String,
        review_id: String,
        clock: &dyn Clock,
    ) -> Result<(), DomainError> {
        if points <= 0 {
            return Err(DomainError::InvalidCommand(
                "points to revoke must be positive".to_owned(),
            ));
        }

        self.apply_and_record(RewardEvent::new(
            RewardEventKind::PointsRevoked(PointsRevoked {
                user_id: self.user_id.clone(),
                review_id,
                points,
                reason,
            }),
            clock,
        ));
        Ok(())
    }

    /// Reconstructs an account by folding its entire event history in
    /// order. This is the only way to load persisted account state.
    ///
    /// # Errors
    ///
    /// Returns `EmptyHistory` if `history` is empty.
    pub fn replay_from_events(history: Vec<RewardEvent>) -> Result<Self, DomainError> {
        let first = history.first().ok_or(DomainError::EmptyHistory)?;
        let mut account = Self::new(first.kind.user_id().to_owned());
        for event in &history {
            account.apply(event);
        }
        Ok(account)
    }

    fn apply_and_record(&mut self, event: RewardEvent) {
        self.apply(&event);
        self.uncommitted_events.push(event);
    }
}

impl AggregateRoot for RewardAccount {
    type Event = RewardEvent;

    fn aggregate_id(&self) -> &str {
        &self.user_id
    }

    fn version(&self) -> i64 {
        self.version
    }

    fn apply(&mut self, event: &Self::Event) {
        self.balance += event.kind.points_delta();
        self.version += 1;
    }

    fn uncommitted_events(&self) -> &[Self::Event] {
        &self.uncommitted_events
    }

    fn clear_uncommitted_events(&mut self) {
        self.uncommitted_events.clear();
    }
}
