//! shard-topology
//!
//! Read-only view of the pipeline topology as seen by one shard:
//! - Sibling device descriptors with their declared option defaults
//! - Shard suffix derivation from device names
//! - Suffix-keyed map of the shards that share this task's base name
//!
//! Pure data. The host runtime materialises the snapshot before any of
//! this code runs; nothing here talks to other processes.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use shard_config::{lookup, ConfigValueError, OptionValue, ReconciledConfig};
use std::collections::BTreeMap;
use std::fmt;
use std::fs;

/// One `(name, default)` pair as configured on a sibling at startup.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DeclaredOption {
    pub name: String,
    #[serde(rename = "default")]
    pub default_value: OptionValue,
}

/// A sibling process as described by the topology snapshot.
///
/// `declared_options` are configured defaults, never the sibling's live values.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ShardDescriptor {
    pub name: String,
    #[serde(rename = "options", default)]
    pub declared_options: Vec<DeclaredOption>,
}

impl ShardDescriptor {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            declared_options: Vec::new(),
        }
    }

    pub fn declare(mut self, option: impl Into<String>, value: impl Into<OptionValue>) -> Self {
        self.declared_options.push(DeclaredOption {
            name: option.into(),
            default_value: value.into(),
        });
        self
    }

    /// First declaration of `option`; `None` means "not declared".
    pub fn declared(&self, option: &str) -> Option<&OptionValue> {
        self.declared_options
            .iter()
            .find(|o| o.name == option)
            .map(|o| &o.default_value)
    }

    /// Catalogue defaults overlaid with this descriptor's own declarations.
    /// Declarations outside the catalogue are skipped.
    pub fn to_local_config(&self) -> Result<ReconciledConfig, ConfigValueError> {
        let mut config = ReconciledConfig::from_catalogue();
        for o in &self.declared_options {
            if lookup(&o.name).is_some() {
                config.set(&o.name, o.default_value.clone())?;
            }
        }
        Ok(config)
    }

    /// Copy with every declaration of `option` replaced by an empty string.
    pub fn with_cleared(&self, option: &str) -> Self {
        let mut out = self.clone();
        for o in out.declared_options.iter_mut().filter(|o| o.name == option) {
            o.default_value = OptionValue::Text(String::new());
        }
        out
    }
}

/// Capability to list sibling devices, valid for the duration of initialization.
pub trait TopologyProvider {
    fn sibling_devices(&self) -> &[ShardDescriptor];
}

/// A topology snapshot held in memory.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct StaticTopology {
    pub devices: Vec<ShardDescriptor>,
}

impl StaticTopology {
    pub fn new(devices: Vec<ShardDescriptor>) -> Self {
        Self { devices }
    }

    pub fn from_json_str(raw: &str) -> Result<Self> {
        serde_json::from_str(raw).context("parse topology snapshot json")
    }

    pub fn load_json(path: &str) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read topology snapshot: {path}"))?;
        Self::from_json_str(&raw).with_context(|| format!("topology snapshot: {path}"))
    }
}

impl TopologyProvider for StaticTopology {
    fn sibling_devices(&self) -> &[ShardDescriptor] {
        &self.devices
    }
}

/// Suffix of `device_name` after the task's `base_name`.
///
/// `None` when the device belongs to another task. An empty suffix is a
/// valid, distinct value.
pub fn shard_suffix<'a>(device_name: &'a str, base_name: &str) -> Option<&'a str> {
    device_name.strip_prefix(base_name)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TopologyError {
    /// Two relevant devices map to the same suffix.
    DuplicateSuffix {
        suffix: String,
        first: String,
        second: String,
    },
    /// The local device is not one of the relevant shards.
    SelfNotInTopology {
        device_name: String,
        base_name: String,
    },
}

impl fmt::Display for TopologyError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TopologyError::DuplicateSuffix {
                suffix,
                first,
                second,
            } => write!(
                f,
                "TOPOLOGY_DUPLICATE_SUFFIX suffix={suffix:?} devices={first:?},{second:?}"
            ),
            TopologyError::SelfNotInTopology {
                device_name,
                base_name,
            } => write!(
                f,
                "TOPOLOGY_SELF_MISSING device={device_name:?} base={base_name:?}"
            ),
        }
    }
}

impl std::error::Error for TopologyError {}

/// Devices sharing the task's base name, keyed and ordered by suffix.
#[derive(Clone, Debug)]
pub struct RelevantShards<'a> {
    by_suffix: BTreeMap<&'a str, &'a ShardDescriptor>,
}

impl<'a> RelevantShards<'a> {
    /// Duplicate suffixes are rejected rather than resolved, so every
    /// process fails the same way on the same snapshot.
    pub fn collect(devices: &'a [ShardDescriptor], base_name: &str) -> Result<Self, TopologyError> {
        let mut by_suffix: BTreeMap<&'a str, &'a ShardDescriptor> = BTreeMap::new();
        for device in devices {
            let Some(suffix) = shard_suffix(&device.name, base_name) else {
                continue;
            };
            if let Some(prev) = by_suffix.insert(suffix, device) {
                return Err(TopologyError::DuplicateSuffix {
                    suffix: suffix.to_string(),
                    first: prev.name.clone(),
                    second: device.name.clone(),
                });
            }
        }
        Ok(Self { by_suffix })
    }

    pub fn len(&self) -> usize {
        self.by_suffix.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_suffix.is_empty()
    }

    /// Smallest suffix in byte-wise order.
    pub fn first_suffix(&self) -> Option<&'a str> {
        self.by_suffix.keys().next().copied()
    }

    pub fn contains(&self, suffix: &str) -> bool {
        self.by_suffix.contains_key(suffix)
    }

    pub fn get(&self, suffix: &str) -> Option<&'a ShardDescriptor> {
        self.by_suffix.get(suffix).copied()
    }

    /// All relevant shards in ascending suffix order.
    pub fn iter(&self) -> impl Iterator<Item = (&'a str, &'a ShardDescriptor)> + '_ {
        self.by_suffix.iter().map(|(s, d)| (*s, *d))
    }

    pub fn suffixes(&self) -> Vec<&'a str> {
        self.by_suffix.keys().copied().collect()
    }
}
