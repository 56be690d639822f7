use anyhow::{Context, Result};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;

use crate::catalogue::{self, MergePolicy, CATALOGUE};
use crate::{sha256_hex, OptionValue, ValueType};

/// One effective option: its value and the policy it is reconciled under.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct ConfigEntry {
    pub value: OptionValue,
    pub policy: MergePolicy,
}

/// Rejected attempt to set a config value.
#[derive(Clone, Debug, PartialEq)]
pub enum ConfigValueError {
    UnknownOption {
        option: String,
    },
    TypeMismatch {
        option: String,
        expected: ValueType,
        found: ValueType,
    },
}

impl fmt::Display for ConfigValueError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValueError::UnknownOption { option } => {
                write!(f, "CONFIG_UNKNOWN_OPTION option={option}")
            }
            ConfigValueError::TypeMismatch {
                option,
                expected,
                found,
            } => write!(
                f,
                "CONFIG_TYPE_MISMATCH option={option} expected={expected} found={found}"
            ),
        }
    }
}

impl std::error::Error for ConfigValueError {}

/// The shard's effective option set.
///
/// Seeded from the catalogue defaults, overlaid with the local configuration,
/// and finally folded with sibling declarations during initialization. After
/// initialization it is only handed out by shared reference.
#[derive(Clone, Debug, PartialEq)]
pub struct ReconciledConfig {
    entries: BTreeMap<String, ConfigEntry>,
}

impl Default for ReconciledConfig {
    fn default() -> Self {
        Self::from_catalogue()
    }
}

impl ReconciledConfig {
    pub fn from_catalogue() -> Self {
        let entries = CATALOGUE
            .iter()
            .map(|spec| {
                (
                    spec.name.to_string(),
                    ConfigEntry {
                        value: spec.policy.default_value(),
                        policy: spec.policy,
                    },
                )
            })
            .collect();
        Self { entries }
    }

    /// Builder form of [`set`][ReconciledConfig::set].
    pub fn with(
        mut self,
        option: &str,
        value: impl Into<OptionValue>,
    ) -> Result<Self, ConfigValueError> {
        self.set(option, value.into())?;
        Ok(self)
    }

    /// Replace an option value, returning the previous one.
    ///
    /// The value type must match the policy's expected type.
    pub fn set(
        &mut self,
        option: &str,
        value: OptionValue,
    ) -> Result<OptionValue, ConfigValueError> {
        let entry = self
            .entries
            .get_mut(option)
            .ok_or_else(|| ConfigValueError::UnknownOption {
                option: option.to_string(),
            })?;

        let expected = entry.policy.expected_type();
        if value.value_type() != expected {
            return Err(ConfigValueError::TypeMismatch {
                option: option.to_string(),
                expected,
                found: value.value_type(),
            });
        }
        Ok(std::mem::replace(&mut entry.value, value))
    }

    /// Put an option back to its catalogue default, returning the previous
    /// value. `None` for a name outside the catalogue.
    pub fn reset(&mut self, option: &str) -> Option<OptionValue> {
        let entry = self.entries.get_mut(option)?;
        let default = entry.policy.default_value();
        Some(std::mem::replace(&mut entry.value, default))
    }

    pub fn entry(&self, option: &str) -> Option<&ConfigEntry> {
        self.entries.get(option)
    }

    pub fn value(&self, option: &str) -> Option<&OptionValue> {
        self.entries.get(option).map(|e| &e.value)
    }

    pub fn policy(&self, option: &str) -> Option<MergePolicy> {
        self.entries.get(option).map(|e| e.policy)
    }

    pub fn number(&self, option: &str) -> Option<f64> {
        self.value(option).and_then(OptionValue::as_f64)
    }

    pub fn flag(&self, option: &str) -> Option<bool> {
        self.value(option).and_then(OptionValue::as_bool)
    }

    pub fn text(&self, option: &str) -> Option<&str> {
        self.value(option).and_then(OptionValue::as_text)
    }

    /// Analyses registered for this shard, in declaration order.
    pub fn analyses(&self) -> Vec<&str> {
        self.text(catalogue::ANALYSES)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .collect()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &ConfigEntry)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    /// Deterministic JSON rendering (sorted option names).
    pub fn canonical_json(&self) -> Result<String> {
        serde_json::to_string(&self.entries).context("canonical config serialize failed")
    }

    /// SHA-256 hex digest of [`canonical_json`][ReconciledConfig::canonical_json].
    pub fn config_hash(&self) -> Result<String> {
        Ok(sha256_hex(self.canonical_json()?.as_bytes()))
    }
}
