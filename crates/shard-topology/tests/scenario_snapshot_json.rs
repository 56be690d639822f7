use shard_config::OptionValue;
use shard_topology::{ShardDescriptor, StaticTopology, TopologyProvider};

const SNAPSHOT: &str = r#"
{
  "devices": [
    {
      "name": "analysis-task-a",
      "options": [
        { "name": "analysis-names", "default": "A" },
        { "name": "analysis-cross-section", "default": 10.0 },
        { "name": "event-recenter", "default": true }
      ]
    },
    { "name": "reader" }
  ]
}
"#;

#[test]
fn snapshot_parses_typed_defaults() {
    let topo = StaticTopology::from_json_str(SNAPSHOT).unwrap();
    let devices = topo.sibling_devices();
    assert_eq!(devices.len(), 2);

    let a = &devices[0];
    assert_eq!(a.declared("analysis-names"), Some(&OptionValue::text("A")));
    assert_eq!(a.declared("analysis-cross-section"), Some(&OptionValue::Number(10.0)));
    assert_eq!(a.declared("event-recenter"), Some(&OptionValue::Bool(true)));
    assert_eq!(a.declared("analysis-log"), None, "undeclared option is simply absent");

    assert!(devices[1].declared_options.is_empty(), "options default to empty");
}

#[test]
fn malformed_snapshot_is_an_error() {
    let err = StaticTopology::from_json_str("{\"devices\": [{\"options\": []}]}").unwrap_err();
    assert!(format!("{err:#}").contains("parse topology snapshot json"));
}

#[test]
fn load_json_names_the_path() {
    let err = StaticTopology::load_json("/definitely/not/here.json").unwrap_err();
    assert!(format!("{err:#}").contains("/definitely/not/here.json"));
}

#[test]
fn cleared_copy_leaves_original_untouched() {
    let d = ShardDescriptor::new("task-a")
        .declare("analysis-names", "A,B")
        .declare("analysis-flags", "-O2");
    let cleared = d.with_cleared("analysis-names");

    assert_eq!(cleared.declared("analysis-names"), Some(&OptionValue::text("")));
    assert_eq!(cleared.declared("analysis-flags"), Some(&OptionValue::text("-O2")));
    assert_eq!(d.declared("analysis-names"), Some(&OptionValue::text("A,B")));
}

#[test]
fn own_declarations_seed_local_config() {
    let topo = StaticTopology::from_json_str(SNAPSHOT).unwrap();
    let cfg = topo.sibling_devices()[0].to_local_config().unwrap();
    assert_eq!(cfg.analyses(), vec!["A"]);
    assert_eq!(cfg.number("analysis-cross-section"), Some(10.0));
    assert_eq!(cfg.flag("event-recenter"), Some(true));
    assert_eq!(cfg.text("analysis-log"), Some(""), "undeclared option keeps its default");

    let bad = ShardDescriptor::new("task-x")
        .declare("bogus", 1.0)
        .declare("event-recenter", 1.0);
    let err = bad.to_local_config().unwrap_err();
    assert!(err.to_string().contains("option=event-recenter"));
}
