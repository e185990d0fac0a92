//! Domain events for the reward points context.

use chrono::{DateTime, Utc};
use rewards_core::clock::Clock;
use rewards_core::error::DomainError;
use rewards_core::event::DomainEvent;
use rewards_core::repository::StoredEvent;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Emitted when points are granted for a review.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsGranted {
    /// The account that received the points.
    pub user_id: String,
    /// The review that triggered the grant.
    pub review_id: String,
    /// Number of points granted (always positive).
    pub points: i64,
    /// Free-text reason supplied by the command source.
    pub reason: String,
}

/// Emitted when points are refunded (spent against an order).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsRefunded {
    /// The account the points were spent from.
    pub user_id: String,
    /// The order the points were used on. Refunds are order-scoped, not
    /// review-scoped.
    pub order_id: String,
    /// Number of points refunded (always positive).
    pub points: i64,
    /// Free-text reason supplied by the command source.
    pub reason: String,
}

/// Emitted when previously granted points are clawed back (e.g. a
/// fraudulent review).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PointsRevoked {
    /// The account the points were revoked from.
    pub user_id: String,
    /// The review that caused the revocation.
    pub review_id: String,
    /// Number of points revoked (always positive).
    pub points: i64,
    /// Free-text reason supplied by the command source.
    pub reason: String,
}

/// Event type identifier for [`PointsGranted`].
pub const POINTS_GRANTED_EVENT_TYPE: &str = "PointsGranted";

/// Event type identifier for [`PointsRefunded`].
pub const POINTS_REFUNDED_EVENT_TYPE: &str = "PointsRefunded";

/// Event type identifier for [`PointsRevoked`].
pub const POINTS_REVOKED_EVENT_TYPE: &str = "PointsRevoked";

/// Event payload variants for the reward points context.
///
/// A closed union: decoding a persisted payload goes through this enum, so
/// an unhandled variant is a compile-time error rather than a runtime
/// lookup failure.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub enum RewardEventKind {
    /// Points were granted for a review.
    PointsGranted(PointsGranted),
    /// Points were refunded against an order.
    PointsRefunded(PointsRefunded),
    /// Points were revoked from a review.
    PointsRevoked(PointsRevoked),
}

impl RewardEventKind {
    /// The account this event belongs to.
    #[must_use]
    pub fn user_id(&self) -> &str {
        match self {
            Self::PointsGranted(e) => &e.user_id,
            Self::PointsRefunded(e) => &e.user_id,
            Self::PointsRevoked(e) => &e.user_id,
        }
    }

    /// Signed balance contribution: grants add points, refunds and
    /// revocations subtract them. This is the single sign convention used
    /// by both the aggregate fold and every read-model projection.
    #[must_use]
    pub fn points_delta(&self) -> i64 {
        match self {
            Self::PointsGranted(e) => e.points,
            Self::PointsRefunded(e) => -e.points,
            Self::PointsRevoked(e) => -e.points,
        }
    }

    /// The review this event is linked to, if any.
    ///
    /// Refunds carry an `order_id` instead and are excluded from
    /// review-scoped projections.
    #[must_use]
    pub fn review_id(&self) -> Option<&str> {
        match self {
            Self::PointsGranted(e) => Some(&e.review_id),
            Self::PointsRevoked(e) => Some(&e.review_id),
            Self::PointsRefunded(_) => None,
        }
    }

    /// Free-text reason supplied by the command source.
    #[must_use]
    pub fn reason(&self) -> &str {
        match self {
            Self::PointsGranted(e) => &e.reason,
            Self::PointsRefunded(e) => &e.reason,
            Self::PointsRevoked(e) => &e.reason,
        }
    }
}

/// Domain event envelope for the reward points context.
///
/// Identity and creation time are assigned when the event is constructed
/// and never change; the stream version is assigned by the event store at
/// append time.
#[derive(Debug, Clone)]
pub struct RewardEvent {
    /// Unique event identifier.
    pub event_id: Uuid,
    /// Timestamp of event creation.
    pub occurred_at: DateTime<Utc>,
    /// Event-specific payload.
    pub kind: RewardEventKind,
}

impl RewardEvent {
    /// Creates a new event, stamping identity and creation time.
    #[must_use]
    pub fn new(kind: RewardEventKind, clock: &dyn Clock) -> Self {
        Self {
            event_id: Uuid::new_v4(),
            occurred_at: clock.now(),
            kind,
        }
    }
}

impl DomainEvent for RewardEvent {
    fn event_type(&self) -> &'static str {
        match &self.kind {
            RewardEventKind::PointsGranted(_) => POINTS_GRANTED_EVENT_TYPE,
            RewardEventKind::PointsRefunded(_) => POINTS_REFUNDED_EVENT_TYPE,
            RewardEventKind::PointsRevoked(_) => POINTS_REVOKED_EVENT_TYPE,
        }
    }

    fn to_payload(&self) -> serde_json::Value {
        // Serialization of derived Serialize types to Value is infallible.
        serde_json::to_value(&self.kind).expect("RewardEventKind serialization is infallible")
    }

    fn event_id(&self) -> Uuid {
        self.event_id
    }

    fn occurred_at(&self) -> DateTime<Utc> {
        self.occurred_at
    }
}

impl TryFrom<&StoredEvent> for RewardEvent {
    type Error = DomainError;

    fn try_from(stored: &StoredEvent) -> Result<Self, Self::Error> {
        let kind: RewardEventKind = serde_json::from_value(stored.payload.clone())
            .map_err(|e| DomainError::Infrastructure(format!("undecodable event payload: {e}")))?;
        Ok(Self {
            event_id: stored.event_id,
            occurred_at: stored.occurred_at,
            kind,
        })
    }
}
