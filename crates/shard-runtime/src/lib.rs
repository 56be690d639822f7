//! shard-runtime
//!
//! Per-shard task: runs the reconciliation once at init, then feeds events
//! through the event converter into the analysis engine.
//!
//! Both collaborators are traits. The analysis engine always comes from
//! outside; [`RecordConverter`] assembles native records directly.

mod collaborators;
mod converter;
mod mode;
mod task;

pub use collaborators::{AnalysisEngine, EventConverter};
pub use converter::RecordConverter;
pub use mode::{EntryPoint, ProcessingMode};
pub use task::{ProcessOutcome, ShardTask, ShardTaskStats, SkipReason};
