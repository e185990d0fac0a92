//! Reward points bounded context.
//!
//! Event-sourced ledger for user reward points: the `RewardAccount`
//! aggregate validates grants, refunds, and revocations; its event history
//! is the source of truth, and current balance is always a derived value.

pub mod application;
pub mod domain;
