use anyhow::{Context, Result};
use shard_reconcile::{initialize, InitOutcome, ReconcileError, SeverityTable, ShardIdentity};
use shard_topology::{shard_suffix, ShardDescriptor, StaticTopology};

/// Every process of one task, initialized against one shared snapshot.
///
/// Stands in for the host runtime: each relevant device runs `initialize`
/// with its own declared options as local config. No processes are spawned.
#[derive(Clone, Debug)]
pub struct Fleet {
    pub base_name: String,
    pub topology: StaticTopology,
}

#[derive(Clone, Debug)]
pub struct FleetMember {
    pub device_name: String,
    pub outcome: Result<InitOutcome, ReconcileError>,
}

impl FleetMember {
    pub fn is_leader(&self) -> bool {
        matches!(&self.outcome, Ok(o) if o.role.is_leader())
    }
}

impl Fleet {
    pub fn new(base_name: impl Into<String>, devices: Vec<ShardDescriptor>) -> Self {
        Self {
            base_name: base_name.into(),
            topology: StaticTopology::new(devices),
        }
    }

    /// Devices that belong to this task, in snapshot order.
    pub fn members(&self) -> Vec<&ShardDescriptor> {
        self.topology
            .devices
            .iter()
            .filter(|d| shard_suffix(&d.name, &self.base_name).is_some())
            .collect()
    }

    pub fn identity(&self, device_name: &str) -> ShardIdentity {
        ShardIdentity::new(device_name, self.base_name.as_str())
    }

    pub fn initialize_all(&self) -> Result<Vec<FleetMember>> {
        self.members()
            .into_iter()
            .map(|d| {
                let local = d
                    .to_local_config()
                    .with_context(|| format!("local config of {}", d.name))?;
                Ok(FleetMember {
                    device_name: d.name.clone(),
                    outcome: initialize(
                        &self.topology,
                        &self.identity(&d.name),
                        local,
                        &SeverityTable,
                    ),
                })
            })
            .collect()
    }

    pub fn leaders(&self) -> Result<Vec<String>> {
        Ok(self
            .initialize_all()?
            .into_iter()
            .filter(FleetMember::is_leader)
            .map(|m| m.device_name)
            .collect())
    }
}
