//! Shared test mocks and utilities for the reward points service.

mod clock;
mod projection;
mod publisher;
mod repository;

pub use clock::FixedClock;
pub use projection::RecordingProjector;
pub use publisher::{FailingPublisher, RecordingPublisher};
pub use repository::{
    ConflictingEventRepository, EmptyEventRepository, FailingEventRepository,
    RecordingEventRepository,
};
