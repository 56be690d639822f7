//! `shard elect` and `shard config-hash`
//!
//! Validates:
//! - Election output is the same whichever device asks, apart from the role.
//! - A duplicate suffix fails with the topology diagnostic.
//! - The config hash depends on merged content, not on file formatting.

use assert_cmd::Command;
use predicates::prelude::*;
use std::fs;
use tempfile::TempDir;

const SNAPSHOT: &str = r#"{"devices":[
  {"name":"task_b"},{"name":"task_a"},{"name":"task_c"},{"name":"other"}
]}"#;

fn elect(topo: &str, device: &str) -> assert_cmd::assert::Assert {
    Command::cargo_bin("shard")
        .unwrap()
        .env("RUST_LOG", "warn")
        .args(["elect", "--topology", topo, "--device", device, "--base", "task_"])
        .assert()
}

#[test]
fn smallest_suffix_leads() {
    let tmp = TempDir::new().unwrap();
    let topo = tmp.path().join("t.json");
    fs::write(&topo, SNAPSHOT).unwrap();
    let topo = topo.to_string_lossy().to_string();

    elect(&topo, "task_a")
        .success()
        .stdout(predicate::str::contains("role=LEADER"))
        .stdout(predicate::str::contains("leader_suffix=a"))
        .stdout(predicate::str::contains("relevant_shards=3"))
        .stdout(predicate::str::contains(r#"suffixes=["a","b","c"]"#));

    for follower in ["task_b", "task_c"] {
        elect(&topo, follower)
            .success()
            .stdout(predicate::str::contains("role=FOLLOWER"))
            .stdout(predicate::str::contains("leader_suffix=a"));
    }
}

#[test]
fn duplicate_suffix_fails() {
    let tmp = TempDir::new().unwrap();
    let topo = tmp.path().join("t.json");
    fs::write(&topo, r#"{"devices":[{"name":"task_a"},{"name":"task_a"}]}"#).unwrap();

    elect(&topo.to_string_lossy(), "task_a")
        .failure()
        .stderr(predicate::str::contains("TOPOLOGY_DUPLICATE_SUFFIX"));
}

#[test]
fn config_hash_ignores_formatting() {
    let tmp = TempDir::new().unwrap();
    let a = tmp.path().join("a.yaml");
    let b = tmp.path().join("b.yaml");
    fs::write(&a, "options:\n  analysis-names: A\n  event-recenter: true\n").unwrap();
    fs::write(&b, "# same content\noptions: {event-recenter: true, analysis-names: A}\n").unwrap();

    let hash_of = |p: &std::path::Path| -> String {
        let out = Command::cargo_bin("shard")
            .unwrap()
            .args(["config-hash", &p.to_string_lossy()])
            .output()
            .unwrap();
        assert!(out.status.success());
        String::from_utf8(out.stdout)
            .unwrap()
            .lines()
            .find_map(|l| l.strip_prefix("config_hash=").map(str::to_string))
            .unwrap()
    };

    assert_eq!(hash_of(&a), hash_of(&b));
    assert_eq!(hash_of(&a).len(), 64);
}
