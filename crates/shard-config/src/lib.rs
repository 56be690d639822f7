//! shard-config
//!
//! Local shard configuration: typed option values, the option catalogue,
//! layered YAML loading and the effective [`ReconciledConfig`].
//!
//! Layout of a config document:
//!
//! ```yaml
//! shard:
//!   base_name: "analysis-task"
//!   device_name: "analysis-task-2"
//! options:
//!   analysis-names: "A"
//!   analysis-cross-section: 10.0
//! ```

use anyhow::{anyhow, bail, Context, Result};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use sha2::{Digest, Sha256};
use std::collections::BTreeSet;
use std::fs;
use tracing::warn;

pub mod catalogue;
mod reconciled;
mod value;

pub use catalogue::{lookup, MergePolicy, OptionSpec, CATALOGUE};
pub use reconciled::{ConfigEntry, ConfigValueError, ReconciledConfig};
pub use value::{OptionValue, ValueType};

const SHARD_BASE_NAME: &str = "/shard/base_name";
const SHARD_DEVICE_NAME: &str = "/shard/device_name";
const OPTIONS: &str = "/options";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnknownKeyPolicy {
    Warn,
    Fail,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UnknownKeyReport {
    /// Recognised JSON-pointer prefixes (sorted, unique)
    pub consumed_prefixes: Vec<String>,
    /// Leaf pointers not under any recognised prefix (sorted)
    pub unknown_leaf_pointers: Vec<String>,
}

impl UnknownKeyReport {
    pub fn is_clean(&self) -> bool {
        self.unknown_leaf_pointers.is_empty()
    }
}

/// Every pointer the loader actually reads: the shard identity plus one
/// `/options/<name>` per catalogued option.
pub fn consumed_pointers() -> Vec<String> {
    let mut out = vec![SHARD_BASE_NAME.to_string(), SHARD_DEVICE_NAME.to_string()];
    for spec in CATALOGUE {
        out.push(format!("{OPTIONS}/{}", escape_pointer_token(spec.name)));
    }
    out
}

/// Report config leaves nothing reads.
/// `Fail` turns a non-clean report into an error; `Warn` logs and returns it.
pub fn report_unknown_keys(
    config_json: &Value,
    policy: UnknownKeyPolicy,
) -> Result<UnknownKeyReport> {
    let consumed: BTreeSet<String> = consumed_pointers()
        .iter()
        .map(|p| normalize_pointer(p))
        .collect();
    let consumed_prefixes: Vec<String> = consumed.into_iter().collect();

    let mut leaves: Vec<String> = Vec::new();
    collect_leaf_pointers(config_json, "", &mut leaves);

    let mut unknown: Vec<String> = leaves
        .into_iter()
        .filter(|leaf| !consumed_prefixes.iter().any(|cp| is_prefix_pointer(cp, leaf)))
        .collect();
    unknown.sort();
    unknown.dedup();

    let report = UnknownKeyReport {
        consumed_prefixes,
        unknown_leaf_pointers: unknown,
    };

    if !report.is_clean() {
        match policy {
            UnknownKeyPolicy::Fail => bail!(
                "CONFIG_UNKNOWN_KEYS: {} unknown config leaf key(s) detected. First few: {}",
                report.unknown_leaf_pointers.len(),
                preview_list(&report.unknown_leaf_pointers, 12)
            ),
            UnknownKeyPolicy::Warn => {
                for leaf in &report.unknown_leaf_pointers {
                    warn!(leaf = %leaf, "unknown config key ignored");
                }
            }
        }
    }

    Ok(report)
}

fn normalize_pointer(p: &str) -> String {
    let mut s = p.trim().to_string();
    if s.is_empty() {
        return "/".to_string();
    }
    if !s.starts_with('/') {
        s.insert(0, '/');
    }
    while s.len() > 1 && s.ends_with('/') {
        s.pop();
    }
    s
}

/// "/a/b" covers "/a/b" and "/a/b/c" but not "/a/bc".
fn is_prefix_pointer(prefix: &str, leaf: &str) -> bool {
    if prefix == "/" || leaf == prefix {
        return true;
    }
    leaf.strip_prefix(prefix)
        .map(|rest| rest.starts_with('/'))
        .unwrap_or(false)
}

fn collect_leaf_pointers(v: &Value, prefix: &str, out: &mut Vec<String>) {
    match v {
        Value::Object(map) => {
            for (k, vv) in map {
                collect_leaf_pointers(vv, &format!("{prefix}/{}", escape_pointer_token(k)), out);
            }
        }
        Value::Array(arr) => {
            for (i, vv) in arr.iter().enumerate() {
                collect_leaf_pointers(vv, &format!("{prefix}/{i}"), out);
            }
        }
        _ if prefix.is_empty() => out.push("/".to_string()),
        _ => out.push(prefix.to_string()),
    }
}

fn escape_pointer_token(s: &str) -> String {
    s.replace('~', "~0").replace('/', "~1")
}

fn preview_list(items: &[String], n: usize) -> String {
    format!("{:?}", items.iter().take(n).collect::<Vec<_>>())
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config_hash: String,
    pub canonical_json: String,
    pub config_json: Value,
}

impl LoadedConfig {
    /// Catalogue defaults overlaid with `/options`.
    pub fn local_options(&self) -> Result<ReconciledConfig> {
        local_config_from_json(&self.config_json)
    }

    pub fn identity(&self) -> ShardSection {
        ShardSection::from_config_json(&self.config_json)
    }
}

/// Optional shard identity carried in the config (`/shard`).
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ShardSection {
    pub base_name: Option<String>,
    pub device_name: Option<String>,
}

impl ShardSection {
    pub fn from_config_json(cfg: &Value) -> Self {
        let read = |ptr: &str| cfg.pointer(ptr).and_then(Value::as_str).map(str::to_string);
        Self {
            base_name: read(SHARD_BASE_NAME),
            device_name: read(SHARD_DEVICE_NAME),
        }
    }
}

pub fn load_layered_yaml(paths: &[&str]) -> Result<LoadedConfig> {
    let mut docs: Vec<String> = Vec::new();
    for p in paths {
        let raw = fs::read_to_string(p).with_context(|| format!("failed to read yaml path: {p}"))?;
        docs.push(raw);
    }
    let doc_refs: Vec<&str> = docs.iter().map(|s| s.as_str()).collect();
    load_layered_yaml_from_strings(&doc_refs)
}

/// Merge YAML docs in order: earlier docs are base, later docs override.
pub fn load_layered_yaml_from_strings(yaml_docs: &[&str]) -> Result<LoadedConfig> {
    let mut merged = serde_json::json!({});
    for raw in yaml_docs {
        let v_yaml: serde_yaml::Value = serde_yaml::from_str(raw).context("invalid yaml")?;
        let v_json = serde_json::to_value(v_yaml).context("yaml->json conversion failed")?;
        merged = deep_merge(merged, v_json);
    }

    // serde_json::Map is key-sorted, so this rendering is canonical.
    let canonical_json = serde_json::to_string(&merged).context("canonical json serialize failed")?;
    let config_hash = sha256_hex(canonical_json.as_bytes());
    Ok(LoadedConfig {
        config_hash,
        canonical_json,
        config_json: merged,
    })
}

/// Build the local option set from `/options`.
///
/// Unknown option names are skipped with a warning; a catalogued option
/// with a value of the wrong type is an error.
pub fn local_config_from_json(cfg: &Value) -> Result<ReconciledConfig> {
    let mut config = ReconciledConfig::from_catalogue();

    let options = match cfg.pointer(OPTIONS) {
        None | Some(Value::Null) => return Ok(config),
        Some(Value::Object(map)) => map,
        Some(other) => bail!("config options must be a mapping (got {other})"),
    };

    for (name, raw) in options {
        if lookup(name).is_none() {
            warn!(option = %name, "unknown option in local config ignored");
            continue;
        }
        let value = OptionValue::from_json(raw)
            .ok_or_else(|| anyhow!("option {name} has no scalar value (got {raw})"))?;
        config
            .set(name, value)
            .with_context(|| format!("invalid local value for option {name}"))?;
    }
    Ok(config)
}

fn deep_merge(a: Value, b: Value) -> Value {
    match (a, b) {
        (Value::Object(mut a_map), Value::Object(b_map)) => {
            for (k, b_val) in b_map {
                let a_val = a_map.remove(&k).unwrap_or(Value::Null);
                a_map.insert(k, deep_merge(a_val, b_val));
            }
            Value::Object(a_map)
        }
        (_, b_other) => b_other,
    }
}

pub(crate) fn sha256_hex(bytes: &[u8]) -> String {
    let mut hasher = Sha256::new();
    hasher.update(bytes);
    hex::encode(hasher.finalize())
}
