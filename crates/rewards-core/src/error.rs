//! Domain error types.

use thiserror::Error;

/// Top-level domain error type.
#[derive(Debug, Error)]
pub enum DomainError {
    /// No event history exists for the requested account.
    #[error("account not found: {0}")]
    AccountNotFound(String),

    /// Optimistic concurrency conflict on append.
    #[error(
        "concurrency conflict on account {aggregate_id}: expected version {expected}, found {actual}"
    )]
    ConcurrencyConflict {
        /// The account stream that had the conflict.
        aggregate_id: String,
        /// The version the writer appended against.
        expected: i64,
        /// The version actually committed in the store.
        actual: i64,
    },

    /// A command argument violated its contract (e.g. non-positive points).
    #[error("invalid command: {0}")]
    InvalidCommand(String),

    /// A refund exceeded the account's current balance.
    #[error("insufficient balance: requested {requested}, available {available}")]
    InsufficientBalance {
        /// Points the command tried to refund.
        requested: i64,
        /// Balance at the time the command was validated.
        available: i64,
    },

    /// Replay was invoked with an empty event history.
    #[error("cannot replay an account from an empty event history")]
    EmptyHistory,

    /// An infrastructure/persistence error.
    #[error("infrastructure error: {0}")]
    Infrastructure(String),
}
