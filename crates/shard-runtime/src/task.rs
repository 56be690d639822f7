use anyhow::{Context, Result};
use serde::Serialize;
use shard_config::ReconciledConfig;
use shard_reconcile::{initialize, InitOutcome, ShardIdentity, ShardRole};
use shard_schemas::{AuxRecords, EventHeader, Track};
use shard_topology::TopologyProvider;
use tracing::{debug, info, warn};

use crate::{AnalysisEngine, EntryPoint, EventConverter, ProcessingMode};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum SkipReason {
    /// Event arrived through the entry point the mode does not use.
    InactiveEntryPoint,
    /// Engine has nothing registered (always the case on a Follower).
    NoAnalyses,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub enum ProcessOutcome {
    Processed,
    Skipped(SkipReason),
}

impl ProcessOutcome {
    pub fn is_processed(&self) -> bool {
        matches!(self, ProcessOutcome::Processed)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
pub struct ShardTaskStats {
    pub processed: u64,
    pub skipped_inactive: u64,
    pub skipped_no_analyses: u64,
}

/// One shard's analysis task.
///
/// The configuration is decided in [`ShardTask::init`] and only read after.
pub struct ShardTask<C, E> {
    init: InitOutcome,
    mode: ProcessingMode,
    converter: C,
    engine: E,
    stats: ShardTaskStats,
}

impl<C: EventConverter, E: AnalysisEngine> ShardTask<C, E> {
    /// Elect, reconcile, then hand the final config to both collaborators.
    ///
    /// A reconciliation failure is returned before any collaborator is
    /// configured; callers must end the process on it.
    pub fn init(
        topology: &dyn TopologyProvider,
        identity: &ShardIdentity,
        local: ReconciledConfig,
        mut converter: C,
        mut engine: E,
    ) -> Result<Self> {
        let init = initialize(topology, identity, local, &engine)
            .with_context(|| format!("shard initialization failed for {}", identity.device_name))?;

        converter
            .configure(&init.config)
            .context("event converter rejected configuration")?;
        engine
            .configure(&init.config)
            .context("analysis engine rejected configuration")?;

        let mode = ProcessingMode::from_config(&init.config);
        info!(
            device = %identity.device_name,
            role = %init.role,
            mode = %mode,
            analyses = engine.registered_analyses().len(),
            "shard task ready"
        );

        Ok(Self {
            init,
            mode,
            converter,
            engine,
            stats: ShardTaskStats::default(),
        })
    }

    pub fn role(&self) -> ShardRole {
        self.init.role
    }

    pub fn config(&self) -> &ReconciledConfig {
        &self.init.config
    }

    pub fn init_outcome(&self) -> &InitOutcome {
        &self.init
    }

    pub fn mode(&self) -> ProcessingMode {
        self.mode
    }

    pub fn stats(&self) -> ShardTaskStats {
        self.stats
    }

    pub fn converter(&self) -> &C {
        &self.converter
    }

    pub fn engine(&self) -> &E {
        &self.engine
    }

    pub fn into_parts(self) -> (C, E) {
        (self.converter, self.engine)
    }

    /// Entry point for header, tracks and auxiliary records.
    pub fn process_full(
        &mut self,
        header: &EventHeader,
        aux: &AuxRecords,
        tracks: &[Track],
    ) -> Result<ProcessOutcome> {
        self.run(EntryPoint::Full, header, Some(aux), tracks)
    }

    /// Entry point for header and tracks only.
    pub fn process_plain(
        &mut self,
        header: &EventHeader,
        tracks: &[Track],
    ) -> Result<ProcessOutcome> {
        self.run(EntryPoint::Plain, header, None, tracks)
    }

    fn run(
        &mut self,
        entry: EntryPoint,
        header: &EventHeader,
        aux: Option<&AuxRecords>,
        tracks: &[Track],
    ) -> Result<ProcessOutcome> {
        // The same event reaches both entry points; forwarding it twice would
        // double count it downstream.
        if !self.mode.accepts(entry) {
            self.stats.skipped_inactive += 1;
            return Ok(ProcessOutcome::Skipped(SkipReason::InactiveEntryPoint));
        }

        if self.engine.registered_analyses().is_empty() {
            warn!(event = header.event_number, "no analysis registered");
            self.stats.skipped_no_analyses += 1;
            return Ok(ProcessOutcome::Skipped(SkipReason::NoAnalyses));
        }

        debug!(event = header.event_number, mode = %self.mode, "processing event");

        self.converter.start_event();
        self.converter.submit_header(header);
        if let Some(aux) = aux {
            self.converter.submit_aux(aux);
        }
        self.converter.submit_tracks(tracks);
        let event = self.converter.end_event();

        self.engine
            .process(&event)
            .with_context(|| format!("analysis engine failed on event {}", header.event_number))?;
        self.stats.processed += 1;
        Ok(ProcessOutcome::Processed)
    }
}
