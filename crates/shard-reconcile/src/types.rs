use serde::Serialize;
use shard_config::{OptionValue, ValueType};
use shard_topology::TopologyError;
use std::fmt;

/// Role of this process for the pipeline-wide finalize step.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ShardRole {
    Leader,
    Follower,
}

impl ShardRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            ShardRole::Leader => "LEADER",
            ShardRole::Follower => "FOLLOWER",
        }
    }

    pub fn is_leader(&self) -> bool {
        matches!(self, ShardRole::Leader)
    }
}

impl fmt::Display for ShardRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Who this process is: its full device name and the task's base name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ShardIdentity {
    pub device_name: String,
    pub base_name: String,
}

impl ShardIdentity {
    pub fn new(device_name: impl Into<String>, base_name: impl Into<String>) -> Self {
        Self {
            device_name: device_name.into(),
            base_name: base_name.into(),
        }
    }
}

/// One value adopted from a sibling during reconciliation.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct OptionChange {
    pub option: String,
    pub sibling: String,
    pub from: OptionValue,
    pub to: OptionValue,
}

/// Fatal reconciliation outcome. The process must not consume any event.
#[derive(Clone, Debug, PartialEq)]
pub enum ReconcileError {
    Topology(TopologyError),

    /// Tolerant numeric values spread beyond tolerance. `reference` names
    /// the sibling holding the opposite extreme, `None` for the local value.
    NumericInconsistent {
        option: String,
        sibling: String,
        sibling_value: f64,
        reference: Option<String>,
        reference_value: f64,
    },

    /// Strict option differs at all.
    StrictInconsistent {
        option: String,
        sibling: String,
        sibling_value: OptionValue,
        local_value: OptionValue,
    },

    /// Sibling declared a catalogued option with a value of the wrong type.
    TypeMismatch {
        option: String,
        sibling: String,
        expected: ValueType,
        found: ValueType,
    },
}

impl ReconcileError {
    /// Option the error is about, if any.
    pub fn option(&self) -> Option<&str> {
        match self {
            ReconcileError::NumericInconsistent { option, .. }
            | ReconcileError::StrictInconsistent { option, .. }
            | ReconcileError::TypeMismatch { option, .. } => Some(option.as_str()),
            ReconcileError::Topology(_) => None,
        }
    }
}

impl fmt::Display for ReconcileError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ReconcileError::Topology(e) => write!(f, "{e}"),
            ReconcileError::NumericInconsistent {
                option,
                sibling,
                sibling_value,
                reference,
                reference_value,
            } => {
                write!(
                    f,
                    "RECONCILE_INCONSISTENT_NUMERIC: inconsistent {option} settings: \
                     {sibling_value} (declared by {sibling}) versus {reference_value} "
                )?;
                match reference {
                    Some(other) => write!(f, "(declared by {other})"),
                    None => f.write_str("(local)"),
                }
            }
            ReconcileError::StrictInconsistent {
                option,
                sibling,
                sibling_value,
                local_value,
            } => write!(
                f,
                "RECONCILE_INCONSISTENT_STRICT: inconsistent {option} settings: \
                 {sibling_value} (declared by {sibling}) versus {local_value} (local)"
            ),
            ReconcileError::TypeMismatch {
                option,
                sibling,
                expected,
                found,
            } => write!(
                f,
                "RECONCILE_TYPE_MISMATCH: {option} declared by {sibling} is {found}, \
                 expected {expected}"
            ),
        }
    }
}

impl std::error::Error for ReconcileError {}

impl From<TopologyError> for ReconcileError {
    fn from(e: TopologyError) -> Self {
        ReconcileError::Topology(e)
    }
}
