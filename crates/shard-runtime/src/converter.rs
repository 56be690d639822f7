use anyhow::Result;
use shard_config::catalogue::{ONLY_GENERATED, RECENTER};
use shard_config::ReconciledConfig;
use shard_schemas::{AuxRecords, EventHeader, IntermediateEvent, Track};

use crate::EventConverter;

/// Assembles native records into an [`IntermediateEvent`].
///
/// Honours the two strict event options: `event-only-generated` drops
/// tracks not produced by the generator, `event-recenter` shifts track
/// production vertices onto the header vertex.
#[derive(Debug, Default)]
pub struct RecordConverter {
    recenter: bool,
    only_generated: bool,
    current: IntermediateEvent,
    events_built: u64,
}

impl RecordConverter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events_built(&self) -> u64 {
        self.events_built
    }
}

impl EventConverter for RecordConverter {
    fn configure(&mut self, config: &ReconciledConfig) -> Result<()> {
        self.recenter = config.flag(RECENTER).unwrap_or(false);
        self.only_generated = config.flag(ONLY_GENERATED).unwrap_or(false);
        Ok(())
    }

    fn start_event(&mut self) {
        self.current = IntermediateEvent::default();
    }

    fn submit_header(&mut self, header: &EventHeader) {
        self.current.header = Some(header.clone());
    }

    fn submit_aux(&mut self, aux: &AuxRecords) {
        self.current.aux = Some(aux.clone());
    }

    fn submit_tracks(&mut self, tracks: &[Track]) {
        // Header must be submitted first for recentering.
        let origin = self
            .current
            .header
            .as_ref()
            .filter(|_| self.recenter)
            .map(|h| h.vertex);

        for track in tracks {
            if self.only_generated && !track.from_generator {
                continue;
            }
            let mut track = track.clone();
            if let Some(origin) = origin {
                for (v, o) in track.production_vertex.iter_mut().zip(origin) {
                    *v -= o;
                }
            }
            self.current.tracks.push(track);
        }
    }

    fn end_event(&mut self) -> IntermediateEvent {
        self.events_built += 1;
        std::mem::take(&mut self.current)
    }
}
