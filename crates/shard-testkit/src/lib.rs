//! Test doubles and fixtures for the shard workspace.
//!
//! - [`TallyEngine`]: analysis engine that records what reaches it
//! - [`Fleet`]: every shard of one snapshot initialized side by side
//! - event record builders

mod engine;
mod fleet;
mod records;

pub use engine::TallyEngine;
pub use fleet::{Fleet, FleetMember};
pub use records::{sample_aux, sample_header, sample_tracks};
