//! Initialization sequence: election, reconciliation, role application.
//!
//! Runs once per process before any event is processed:
//!
//! 1. **Election** over the snapshot's relevant shards.
//! 2. **Follower**: the analysis list is cleared and the routine returns.
//!    No sibling option is inspected.
//! 3. **Trivial Leader** (one relevant shard): local config is kept as is.
//! 4. **Leader**: every sibling's declared defaults are folded into the
//!    local config; any violation is returned as a fatal error.
//!
//! The returned config is final for the rest of the process lifetime.

use shard_config::catalogue::ANALYSES;
use shard_config::ReconciledConfig;
use shard_topology::{ShardDescriptor, TopologyProvider};
use tracing::info;

use crate::{
    elect, reconcile_options, LogLevelLookup, OptionChange, ReconcileError, ShardIdentity,
    ShardRole,
};

#[derive(Clone, Debug, PartialEq)]
pub struct InitOutcome {
    pub role: ShardRole,
    pub config: ReconciledConfig,
    pub own_suffix: Option<String>,
    pub leader_suffix: Option<String>,
    /// Number of devices sharing this task's base name.
    pub relevant_shards: usize,
    /// `true` only when sibling options were folded in.
    pub reconciled: bool,
    pub changes: Vec<OptionChange>,
    pub absorbed: Vec<ShardDescriptor>,
}

/// Decide this process's role and final configuration.
pub fn initialize(
    topology: &dyn TopologyProvider,
    identity: &ShardIdentity,
    local: ReconciledConfig,
    levels: &dyn LogLevelLookup,
) -> Result<InitOutcome, ReconcileError> {
    let devices = topology.sibling_devices();
    let election = elect(devices, identity)?;

    info!(
        device = %identity.device_name,
        role = %election.role,
        leader = ?election.leader_suffix,
        relevant = election.shards.len(),
        "shard election"
    );

    let mut outcome = InitOutcome {
        role: election.role,
        config: local,
        own_suffix: election.own_suffix.clone(),
        leader_suffix: election.leader_suffix.clone(),
        relevant_shards: election.shards.len(),
        reconciled: false,
        changes: Vec::new(),
        absorbed: Vec::new(),
    };

    if election.role == ShardRole::Follower {
        // Suppress the local contribution; the leader covers the finalize step.
        outcome.config.reset(ANALYSES);
        return Ok(outcome);
    }

    if !election.requires_reconcile() {
        return Ok(outcome);
    }

    let own_suffix = election.own_suffix.as_deref().unwrap_or_default();
    let merged = reconcile_options(&outcome.config, &election.shards, own_suffix, levels)?;

    info!(
        device = %identity.device_name,
        adopted = merged.changes.len(),
        siblings = merged.absorbed.len(),
        "reconciliation complete"
    );

    outcome.config = merged.config;
    outcome.changes = merged.changes;
    outcome.absorbed = merged.absorbed;
    outcome.reconciled = true;
    Ok(outcome)
}
