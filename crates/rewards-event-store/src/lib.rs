//! PostgreSQL-backed event store for the reward points service.
//!
//! The `reward_events` table is append-only and is the source of truth;
//! the `(aggregate_id, version)` uniqueness constraint serializes
//! concurrent writers to the same stream.

pub mod pg_event_repository;
