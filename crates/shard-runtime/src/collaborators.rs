use anyhow::Result;
use shard_config::ReconciledConfig;
use shard_reconcile::LogLevelLookup;
use shard_schemas::{AuxRecords, EventHeader, IntermediateEvent, Track};

/// Turns native per-event records into an [`IntermediateEvent`].
///
/// Call sequence per event: `start_event`, any `submit_*`, `end_event`.
pub trait EventConverter {
    fn configure(&mut self, _config: &ReconciledConfig) -> Result<()> {
        Ok(())
    }

    fn start_event(&mut self);
    fn submit_header(&mut self, header: &EventHeader);
    fn submit_aux(&mut self, aux: &AuxRecords);
    fn submit_tracks(&mut self, tracks: &[Track]);
    fn end_event(&mut self) -> IntermediateEvent;
}

/// Runs the registered analyses over intermediate events.
///
/// Also supplies the log-level ranking used when reconciling the
/// analysis log level across shards.
pub trait AnalysisEngine: LogLevelLookup {
    /// Receives the final, reconciled configuration exactly once.
    fn configure(&mut self, config: &ReconciledConfig) -> Result<()>;

    fn registered_analyses(&self) -> &[String];

    fn process(&mut self, event: &IntermediateEvent) -> Result<()>;
}
