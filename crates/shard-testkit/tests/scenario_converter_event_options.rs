//! Event options reach the converter
//!
//! GREEN when:
//! - `event-only-generated` drops non-generator tracks before the engine.
//! - `event-recenter` moves production vertices onto the header vertex.
//! - With both off, tracks arrive untouched.
//! - A Leader applies the event options its siblings agreed on.

use shard_config::catalogue::{ANALYSES, ONLY_GENERATED, RECENTER};
use shard_config::ReconciledConfig;
use shard_reconcile::ShardIdentity;
use shard_runtime::{RecordConverter, ShardTask};
use shard_testkit::{sample_aux, sample_header, sample_tracks, TallyEngine};
use shard_topology::{ShardDescriptor, StaticTopology};

fn solo(local: ReconciledConfig) -> ShardTask<RecordConverter, TallyEngine> {
    let topo = StaticTopology::new(vec![ShardDescriptor::new("conv")]);
    ShardTask::init(
        &topo,
        &ShardIdentity::new("conv", "conv"),
        local,
        RecordConverter::new(),
        TallyEngine::new(),
    )
    .unwrap()
}

fn base() -> ReconciledConfig {
    ReconciledConfig::from_catalogue().with(ANALYSES, "A").unwrap()
}

#[test]
fn defaults_pass_tracks_through() {
    let mut t = solo(base());
    t.process_full(&sample_header(0), &sample_aux(), &sample_tracks())
        .unwrap();

    let ev = &t.engine().events()[0];
    assert_eq!(ev.tracks, sample_tracks());
    assert_eq!(ev.header, Some(sample_header(0)));
}

#[test]
fn only_generated_drops_transport_products() {
    let mut t = solo(base().with(ONLY_GENERATED, true).unwrap());
    t.process_full(&sample_header(0), &sample_aux(), &sample_tracks())
        .unwrap();

    let ev = &t.engine().events()[0];
    assert_eq!(ev.tracks.len(), 2);
    assert!(ev.tracks.iter().all(|tr| tr.from_generator));
}

#[test]
fn recenter_shifts_production_vertex() {
    let mut t = solo(base().with(RECENTER, true).unwrap());
    t.process_full(&sample_header(0), &sample_aux(), &sample_tracks())
        .unwrap();

    let ev = &t.engine().events()[0];
    assert_eq!(ev.tracks[0].production_vertex, [0.0, 0.0, 0.0, 0.0]);
    let photon = &ev.tracks[2].production_vertex;
    let expected = [1.0, 1.0, 2.0, 0.2];
    for (got, want) in photon.iter().zip(expected) {
        assert!((got - want).abs() < 1e-12, "{photon:?}");
    }
}

#[test]
fn leader_applies_agreed_event_options() {
    let topo = StaticTopology::new(vec![
        ShardDescriptor::new("conv-1")
            .declare(ANALYSES, "A")
            .declare(ONLY_GENERATED, true),
        ShardDescriptor::new("conv-2")
            .declare(ANALYSES, "B")
            .declare(ONLY_GENERATED, true),
    ]);
    let local = topo.devices[0].to_local_config().unwrap();
    let mut t = ShardTask::init(
        &topo,
        &ShardIdentity::new("conv-1", "conv"),
        local,
        RecordConverter::new(),
        TallyEngine::new(),
    )
    .unwrap();

    t.process_full(&sample_header(7), &sample_aux(), &sample_tracks())
        .unwrap();
    assert_eq!(t.engine().event_numbers(), vec![7]);
    assert_eq!(t.engine().events()[0].tracks.len(), 2);
    assert_eq!(t.config().analyses(), vec!["A", "B"]);
}
