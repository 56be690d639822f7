//! Processing mode selection
//!
//! GREEN when:
//! - `event-no-aux` unset or false selects Full, true selects Plain.
//! - Each mode accepts exactly one entry point.

use shard_config::catalogue::NO_AUX;
use shard_config::ReconciledConfig;
use shard_runtime::{EntryPoint, ProcessingMode};

#[test]
fn default_config_selects_full() {
    let cfg = ReconciledConfig::from_catalogue();
    assert_eq!(ProcessingMode::from_config(&cfg), ProcessingMode::Full);
}

#[test]
fn no_aux_selects_plain() {
    let cfg = ReconciledConfig::from_catalogue().with(NO_AUX, true).unwrap();
    assert_eq!(ProcessingMode::from_config(&cfg), ProcessingMode::Plain);

    let cfg = ReconciledConfig::from_catalogue().with(NO_AUX, false).unwrap();
    assert_eq!(ProcessingMode::from_config(&cfg), ProcessingMode::Full);
}

#[test]
fn each_mode_accepts_one_entry_point() {
    assert!(ProcessingMode::Full.accepts(EntryPoint::Full));
    assert!(!ProcessingMode::Full.accepts(EntryPoint::Plain));
    assert!(ProcessingMode::Plain.accepts(EntryPoint::Plain));
    assert!(!ProcessingMode::Plain.accepts(EntryPoint::Full));
    assert_eq!(ProcessingMode::Plain.to_string(), "PLAIN");
}
