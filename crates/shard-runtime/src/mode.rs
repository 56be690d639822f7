use serde::Serialize;
use shard_config::catalogue::NO_AUX;
use shard_config::ReconciledConfig;
use std::fmt;

/// Which ingestion entry point is live for this process.
///
/// Resolved once from config; every event is visible to both entry points,
/// so exactly one of them may forward it.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ProcessingMode {
    /// Header + tracks only.
    Plain,
    /// Header + tracks + cross-section, PDF and heavy-ion records.
    Full,
}

/// The entry point an event arrived through.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EntryPoint {
    Plain,
    Full,
}

impl ProcessingMode {
    pub fn from_config(config: &ReconciledConfig) -> Self {
        if config.flag(NO_AUX).unwrap_or(false) {
            ProcessingMode::Plain
        } else {
            ProcessingMode::Full
        }
    }

    pub fn accepts(&self, entry: EntryPoint) -> bool {
        matches!(
            (self, entry),
            (ProcessingMode::Plain, EntryPoint::Plain) | (ProcessingMode::Full, EntryPoint::Full)
        )
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            ProcessingMode::Plain => "PLAIN",
            ProcessingMode::Full => "FULL",
        }
    }
}

impl fmt::Display for ProcessingMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
