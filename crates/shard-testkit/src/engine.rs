use anyhow::{bail, Result};
use shard_config::ReconciledConfig;
use shard_reconcile::{LogLevelLookup, SeverityTable};
use shard_runtime::AnalysisEngine;
use shard_schemas::IntermediateEvent;

/// Analysis engine double: registers the configured analyses and records
/// every event it is asked to process.
#[derive(Debug, Default)]
pub struct TallyEngine {
    analyses: Vec<String>,
    configured: Option<ReconciledConfig>,
    configure_calls: usize,
    events: Vec<IntermediateEvent>,
    fail_on_event: Option<u64>,
}

impl TallyEngine {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `process` fail when it sees this event number.
    pub fn failing_on(event_number: u64) -> Self {
        Self {
            fail_on_event: Some(event_number),
            ..Self::default()
        }
    }

    pub fn events(&self) -> &[IntermediateEvent] {
        &self.events
    }

    pub fn event_numbers(&self) -> Vec<u64> {
        self.events.iter().filter_map(IntermediateEvent::event_number).collect()
    }

    pub fn configured(&self) -> Option<&ReconciledConfig> {
        self.configured.as_ref()
    }

    pub fn configure_calls(&self) -> usize {
        self.configure_calls
    }
}

impl LogLevelLookup for TallyEngine {
    fn find_log_level(&self, level: &str) -> Option<u32> {
        SeverityTable.find_log_level(level)
    }
}

impl AnalysisEngine for TallyEngine {
    fn configure(&mut self, config: &ReconciledConfig) -> Result<()> {
        self.configure_calls += 1;
        self.analyses = config.analyses().into_iter().map(str::to_string).collect();
        self.configured = Some(config.clone());
        Ok(())
    }

    fn registered_analyses(&self) -> &[String] {
        &self.analyses
    }

    fn process(&mut self, event: &IntermediateEvent) -> Result<()> {
        if let (Some(bad), Some(n)) = (self.fail_on_event, event.event_number()) {
            if bad == n {
                bail!("TallyEngine: injected failure on event {n}");
            }
        }
        self.events.push(event.clone());
        Ok(())
    }
}
