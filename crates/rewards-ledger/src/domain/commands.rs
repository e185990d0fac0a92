//! Commands for the reward points context.

use rewards_core::command::Command;
use uuid::Uuid;

/// Command to grant points for a review.
#[derive(Debug, Clone)]
pub struct GrantPoints {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The account to grant points to.
    pub user_id: String,
    /// The review that triggered the grant.
    pub review_id: String,
    /// Number of points to grant.
    pub points: i64,
    /// Free-text reason.
    pub reason: String,
}

impl Command for GrantPoints {
    fn command_type(&self) -> &'static str {
        "rewards.grant_points"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to refund (spend) points against an order.
#[derive(Debug, Clone)]
pub struct RefundPoints {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The account to refund points from.
    pub user_id: String,
    /// The order the points are used on.
    pub order_id: String,
    /// Number of points to refund.
    pub points: i64,
    /// Free-text reason.
    pub reason: String,
}

impl Command for RefundPoints {
    fn command_type(&self) -> &'static str {
        "rewards.refund_points"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}

/// Command to revoke previously granted points.
#[derive(Debug, Clone)]
pub struct RevokePoints {
    /// The correlation ID for tracing.
    pub correlation_id: Uuid,
    /// The account to revoke points from.
    pub user_id: String,
    /// The review that caused the revocation.
    pub review_id: String,
    /// Number of points to revoke.
    pub points: i64,
    /// Free-text reason.
    pub reason: String,
}

impl Command for RevokePoints {
    fn command_type(&self) -> &'static str {
        "rewards.revoke_points"
    }

    fn correlation_id(&self) -> Uuid {
        self.correlation_id
    }
}
