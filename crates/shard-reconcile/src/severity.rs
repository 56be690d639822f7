/// Maps a symbolic log level to a rank; lower rank = more verbose.
///
/// `None` means the level is not recognised and never wins a merge.
pub trait LogLevelLookup {
    fn find_log_level(&self, level: &str) -> Option<u32>;
}

/// Fixed level table used when the analysis engine brings none of its own.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct SeverityTable;

const LEVELS: &[(&str, u32)] = &[
    ("debug", 0),
    ("info", 1),
    ("warning", 2),
    ("warn", 2),
    ("error", 3),
    ("critical", 4),
    ("fatal", 4),
];

impl LogLevelLookup for SeverityTable {
    fn find_log_level(&self, level: &str) -> Option<u32> {
        let level = level.trim();
        LEVELS
            .iter()
            .find(|(name, _)| name.eq_ignore_ascii_case(level))
            .map(|(_, rank)| *rank)
    }
}
