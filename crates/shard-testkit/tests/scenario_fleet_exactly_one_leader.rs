//! Fleet-wide election + agreement
//!
//! Every relevant device of the snapshot is initialized independently, the
//! way separate processes would be.
//!
//! GREEN when:
//! - Exactly one device reports Leader, for fleets of 1..=6 shards and for
//!   every rotation of the snapshot.
//! - The Leader's reconciled analysis list is the union of all shards', and
//!   every Follower's is empty.
//! - Devices of other tasks are never initialized.

use shard_config::catalogue::{ANALYSES, LOG_LEVEL};
use shard_testkit::Fleet;
use shard_topology::ShardDescriptor;

const BASE: &str = "analysis-task";

fn fleet_of(n: usize) -> Vec<ShardDescriptor> {
    let mut devices: Vec<ShardDescriptor> = (0..n)
        .map(|i| {
            ShardDescriptor::new(format!("{BASE}_{i:02}"))
                .declare(ANALYSES, format!("ANA_{i}"))
                .declare(LOG_LEVEL, "info")
        })
        .collect();
    devices.push(ShardDescriptor::new("aod-producer").declare(ANALYSES, "NOT_MINE"));
    devices
}

#[test]
fn one_leader_for_every_fleet_size_and_rotation() {
    for n in 1..=6 {
        let base = fleet_of(n);
        for r in 0..base.len() {
            let mut devices = base.clone();
            devices.rotate_left(r);
            let fleet = Fleet::new(BASE, devices);

            let leaders = fleet.leaders().unwrap();
            assert_eq!(
                leaders,
                vec![format!("{BASE}_00")],
                "n={n} rotation={r}: smallest suffix must lead alone"
            );
        }
    }
}

#[test]
fn leader_holds_union_followers_hold_nothing() {
    let fleet = Fleet::new(BASE, fleet_of(4));
    let members = fleet.initialize_all().unwrap();
    assert_eq!(members.len(), 4, "aod-producer is not a member");

    for m in &members {
        let out = m.outcome.as_ref().unwrap();
        if m.is_leader() {
            assert_eq!(out.config.analyses(), vec!["ANA_0", "ANA_1", "ANA_2", "ANA_3"]);
            assert!(out.reconciled);
        } else {
            assert!(out.config.analyses().is_empty(), "{} must be inert", m.device_name);
            assert!(!out.reconciled);
        }
    }
}

#[test]
fn single_member_fleet_never_reconciles() {
    let fleet = Fleet::new(BASE, fleet_of(1));
    let members = fleet.initialize_all().unwrap();
    assert_eq!(members.len(), 1);

    let out = members[0].outcome.as_ref().unwrap();
    assert!(out.role.is_leader());
    assert!(!out.reconciled);
    assert!(out.changes.is_empty());
    assert_eq!(out.config.analyses(), vec!["ANA_0"]);
}
