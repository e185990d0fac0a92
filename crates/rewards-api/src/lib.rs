//! Axum HTTP boundary for the reward points service.
//!
//! Thin I/O glue over the ledger: routes construct commands, hand them to
//! the application layer, and map domain errors to HTTP statuses. No
//! business invariant lives here.

pub mod error;
pub mod publisher;
pub mod routes;
pub mod state;
