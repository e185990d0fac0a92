//! CQRS read-model projections for the reward points service.
//!
//! Three independent read models are derived from the event log: the total
//! balance per user, the net points per review, and an append-only point
//! history per review. All of them are rebuildable from scratch; none is a
//! source of truth.

pub mod projector;
pub mod query_handlers;
