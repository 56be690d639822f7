//! Leader election
//!
//! GREEN when:
//! - A single relevant shard is always Leader and never reconciles.
//! - Among N > 1 distinct suffixes exactly one shard is Leader: the one with
//!   the byte-wise smallest suffix, for every ordering of the snapshot.
//! - Devices of other tasks neither vote nor count.
//! - A device missing from a multi-shard snapshot cannot elect itself.

use shard_reconcile::*;
use shard_topology::{ShardDescriptor, TopologyError};

const BASE: &str = "analysis-task";

fn devices(names: &[&str]) -> Vec<ShardDescriptor> {
    names.iter().map(|n| ShardDescriptor::new(*n)).collect()
}

fn permutations(items: &[&'static str]) -> Vec<Vec<&'static str>> {
    if items.len() <= 1 {
        return vec![items.to_vec()];
    }
    let mut out = Vec::new();
    for i in 0..items.len() {
        let mut rest = items.to_vec();
        let head = rest.remove(i);
        for mut tail in permutations(&rest) {
            tail.insert(0, head);
            out.push(tail);
        }
    }
    out
}

#[test]
fn single_relevant_shard_is_trivial_leader() {
    let devs = devices(&["reader", "analysis-task-7", "writer"]);
    let e = elect(&devs, &ShardIdentity::new("analysis-task-7", BASE)).unwrap();

    assert_eq!(e.role, ShardRole::Leader);
    assert!(e.is_trivial());
    assert!(!e.requires_reconcile(), "trivial leader must skip reconciliation");
    assert_eq!(e.own_suffix.as_deref(), Some("-7"));
}

#[test]
fn empty_snapshot_is_trivial_leader() {
    let e = elect(&[], &ShardIdentity::new("analysis-task-0", BASE)).unwrap();
    assert_eq!(e.role, ShardRole::Leader);
    assert!(e.is_trivial());
}

#[test]
fn exactly_one_leader_for_every_snapshot_order() {
    let names = ["analysis-task-c", "analysis-task-a", "analysis-task-b", "analysis-task-aa"];

    for order in permutations(&names) {
        let devs = devices(&order);
        let leaders: Vec<&str> = names
            .iter()
            .filter(|me| {
                elect(&devs, &ShardIdentity::new(**me, BASE))
                    .unwrap()
                    .role
                    .is_leader()
            })
            .copied()
            .collect();

        assert_eq!(leaders, vec!["analysis-task-a"], "snapshot order {order:?}");
    }
}

#[test]
fn empty_suffix_sorts_first() {
    let devs = devices(&["analysis-task-1", "analysis-task"]);

    let plain = elect(&devs, &ShardIdentity::new("analysis-task", BASE)).unwrap();
    assert_eq!(plain.role, ShardRole::Leader);
    assert_eq!(plain.leader_suffix.as_deref(), Some(""));

    let one = elect(&devs, &ShardIdentity::new("analysis-task-1", BASE)).unwrap();
    assert_eq!(one.role, ShardRole::Follower);
    assert_eq!(one.leader_suffix.as_deref(), Some(""));
    assert!(!one.requires_reconcile());
}

#[test]
fn other_tasks_do_not_take_part() {
    // "aaa" would sort before every suffix if it were relevant.
    let devs = devices(&["aaa", "analysis-task-x", "analysis-task-y"]);
    let e = elect(&devs, &ShardIdentity::new("analysis-task-x", BASE)).unwrap();
    assert_eq!(e.role, ShardRole::Leader);
    assert_eq!(e.shards.len(), 2);
}

#[test]
fn self_missing_from_multi_shard_snapshot_is_rejected() {
    let devs = devices(&["analysis-task-a", "analysis-task-b"]);

    let err = elect(&devs, &ShardIdentity::new("analysis-task-z", BASE)).unwrap_err();
    assert_eq!(
        err,
        TopologyError::SelfNotInTopology {
            device_name: "analysis-task-z".to_string(),
            base_name: BASE.to_string(),
        }
    );

    let err = elect(&devs, &ShardIdentity::new("unrelated", BASE)).unwrap_err();
    assert!(matches!(err, TopologyError::SelfNotInTopology { .. }));
}

#[test]
fn duplicate_suffix_fails_every_shard() {
    let devs = devices(&["analysis-task-a", "analysis-task-b", "analysis-task-a"]);
    for me in ["analysis-task-a", "analysis-task-b"] {
        let err = elect(&devs, &ShardIdentity::new(me, BASE)).unwrap_err();
        assert!(matches!(err, TopologyError::DuplicateSuffix { .. }), "{me}");
    }
}
