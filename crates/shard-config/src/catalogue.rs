//! Option catalogue
//!
//! Every option that takes part in cross-shard reconciliation is listed here
//! together with its merge policy. Options not listed are unknown: sibling
//! declarations of them are ignored, local config keys for them are reported.

use serde::Serialize;

use crate::{OptionValue, ValueType};

pub const CROSS_SECTION: &str = "analysis-cross-section";
pub const MERGE_EQUIVALENT: &str = "analysis-merge-equivalent";
pub const RECENTER: &str = "event-recenter";
pub const ONLY_GENERATED: &str = "event-only-generated";
pub const IGNORE_BEAMS: &str = "analysis-ignore-beams";
pub const ECHO_PWD: &str = "analysis-pwd";
pub const FINALIZE: &str = "analysis-finalize";
pub const ANALYSES: &str = "analysis-names";
pub const SEARCH_PATHS: &str = "analysis-paths";
pub const PRELOADS: &str = "analysis-preloads";
pub const SOURCES: &str = "analysis-sources";
pub const FLAGS: &str = "analysis-flags";
pub const LOG_LEVEL: &str = "analysis-log";
pub const NO_AUX: &str = "event-no-aux";

/// How a sibling's declared value is folded into the local value.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum MergePolicy {
    /// All positive values, local and sibling, must agree within tolerance.
    TolerantNumeric,
    /// Sibling value must equal the local value.
    StrictBool,
    /// A sibling value different from `false` is adopted.
    AdoptIfSet,
    /// Non-empty sibling lists are appended to the local list.
    ///
    /// With `absorb`, only entries not yet present are appended and the
    /// sibling's copy is cleared once merged.
    Accumulate { separator: char, absorb: bool },
    /// The most verbose recognised level wins.
    SeverityRanked,
    /// Local-only switch; never reconciled.
    Local,
}

impl MergePolicy {
    pub fn expected_type(&self) -> ValueType {
        match self {
            MergePolicy::TolerantNumeric => ValueType::Number,
            MergePolicy::StrictBool | MergePolicy::AdoptIfSet | MergePolicy::Local => {
                ValueType::Bool
            }
            MergePolicy::Accumulate { .. } | MergePolicy::SeverityRanked => ValueType::Text,
        }
    }

    /// Unset value for this policy.
    pub fn default_value(&self) -> OptionValue {
        match self.expected_type() {
            ValueType::Bool => OptionValue::Bool(false),
            ValueType::Number => OptionValue::Number(0.0),
            ValueType::Text => OptionValue::Text(String::new()),
        }
    }

    pub fn is_reconciled(&self) -> bool {
        !matches!(self, MergePolicy::Local)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct OptionSpec {
    pub name: &'static str,
    pub policy: MergePolicy,
    pub help: &'static str,
}

const fn list(separator: char) -> MergePolicy {
    MergePolicy::Accumulate {
        separator,
        absorb: false,
    }
}

pub static CATALOGUE: &[OptionSpec] = &[
    OptionSpec {
        name: CROSS_SECTION,
        policy: MergePolicy::TolerantNumeric,
        help: "Cross-section of the processed sample (0 = take from events)",
    },
    OptionSpec {
        name: MERGE_EQUIVALENT,
        policy: MergePolicy::StrictBool,
        help: "Allow merging of equivalent beam configurations",
    },
    OptionSpec {
        name: RECENTER,
        policy: MergePolicy::StrictBool,
        help: "Recenter events on the primary vertex",
    },
    OptionSpec {
        name: ONLY_GENERATED,
        policy: MergePolicy::StrictBool,
        help: "Only convert particles from the generator",
    },
    OptionSpec {
        name: IGNORE_BEAMS,
        policy: MergePolicy::AdoptIfSet,
        help: "Ignore beam requirements of analyses",
    },
    OptionSpec {
        name: ECHO_PWD,
        policy: MergePolicy::AdoptIfSet,
        help: "Add the working directory to the search paths",
    },
    OptionSpec {
        name: FINALIZE,
        policy: MergePolicy::AdoptIfSet,
        help: "Run the finalize step of the analyses at end of run",
    },
    OptionSpec {
        name: ANALYSES,
        policy: MergePolicy::Accumulate {
            separator: ',',
            absorb: true,
        },
        help: "Comma separated analyses to run",
    },
    OptionSpec {
        name: SEARCH_PATHS,
        policy: list(':'),
        help: "Colon separated analysis search paths",
    },
    OptionSpec {
        name: PRELOADS,
        policy: list(','),
        help: "Comma separated data files to preload",
    },
    OptionSpec {
        name: SOURCES,
        policy: list(','),
        help: "Comma separated analysis sources to build",
    },
    OptionSpec {
        name: FLAGS,
        policy: list(','),
        help: "Comma separated extra build flags",
    },
    OptionSpec {
        name: LOG_LEVEL,
        policy: MergePolicy::SeverityRanked,
        help: "Analysis log level",
    },
    OptionSpec {
        name: NO_AUX,
        policy: MergePolicy::Local,
        help: "Do not process auxiliary event information",
    },
];

pub fn lookup(name: &str) -> Option<&'static OptionSpec> {
    CATALOGUE.iter().find(|spec| spec.name == name)
}
