use shard_topology::{shard_suffix, RelevantShards, ShardDescriptor, TopologyError};

use crate::{ShardIdentity, ShardRole};

/// Outcome of the leader election for one process.
#[derive(Clone, Debug)]
pub struct Election<'a> {
    pub role: ShardRole,
    /// This process's suffix; `None` only for a trivial election where the
    /// device does not carry the base name.
    pub own_suffix: Option<String>,
    pub leader_suffix: Option<String>,
    pub shards: RelevantShards<'a>,
}

impl Election<'_> {
    /// At most one relevant shard: nothing to agree on.
    pub fn is_trivial(&self) -> bool {
        self.shards.len() <= 1
    }

    /// Only a Leader among several shards folds sibling options.
    pub fn requires_reconcile(&self) -> bool {
        self.role.is_leader() && !self.is_trivial()
    }
}

/// Elect the leader among the devices sharing `identity.base_name`.
///
/// Every process sees the same snapshot and applies the same total order, so
/// all of them agree on one leader without exchanging a message:
/// - no or one relevant shard => this process is Leader
/// - otherwise the smallest suffix (byte-wise) is Leader, the rest Follower
pub fn elect<'a>(
    devices: &'a [ShardDescriptor],
    identity: &ShardIdentity,
) -> Result<Election<'a>, TopologyError> {
    let shards = RelevantShards::collect(devices, &identity.base_name)?;
    let own_suffix = shard_suffix(&identity.device_name, &identity.base_name);

    if shards.len() <= 1 {
        return Ok(Election {
            role: ShardRole::Leader,
            own_suffix: own_suffix.map(str::to_string),
            leader_suffix: own_suffix.or(shards.first_suffix()).map(str::to_string),
            shards,
        });
    }

    let own = match own_suffix {
        Some(s) if shards.contains(s) => s,
        _ => {
            return Err(TopologyError::SelfNotInTopology {
                device_name: identity.device_name.clone(),
                base_name: identity.base_name.clone(),
            })
        }
    };

    let leader = shards.first_suffix().unwrap_or(own);
    let role = if leader == own {
        ShardRole::Leader
    } else {
        ShardRole::Follower
    };

    Ok(Election {
        role,
        own_suffix: Some(own.to_string()),
        leader_suffix: Some(leader.to_string()),
        shards,
    })
}
