//! shard-reconcile
//!
//! Cross-shard configuration reconciliation.
//!
//! Architectural decisions:
//! - Leader = relevant shard with the byte-wise smallest suffix
//! - A single relevant shard is trivially Leader and never reconciles
//! - Followers only clear their analysis list; nothing else is checked
//! - Leader folds every sibling's declared defaults into a fresh config
//! - Any strict or tolerance violation is fatal; there is no negotiation
//!
//! Deterministic, pure logic. No IO. No inter-process calls.

mod election;
mod engine;
mod orchestrator;
mod severity;
mod tolerance;
mod types;

pub use election::{elect, Election};
pub use engine::{reconcile_options, Reconciliation};
pub use orchestrator::{initialize, InitOutcome};
pub use severity::{LogLevelLookup, SeverityTable};
pub use tolerance::{is_close, Tolerance};
pub use types::*;
