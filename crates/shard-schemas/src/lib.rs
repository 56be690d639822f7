use serde::{Deserialize, Serialize};

/// Per-event header record (one row per collision).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EventHeader {
    pub event_number: u64,
    pub run_number: u32,
    pub weight: f64,
    pub vertex: [f64; 4],
    pub impact_parameter: f64,
    pub generator_id: u16,
}

/// Per-particle record attached to an event header.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Track {
    pub pdg_code: i32,
    pub status_code: i32,
    pub momentum: [f64; 4],
    pub production_vertex: [f64; 4],
    pub mothers: Vec<i64>,
    pub daughters: Vec<i64>,
    pub from_generator: bool,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CrossSection {
    pub accepted: u64,
    pub attempted: u64,
    pub value: f64,
    pub error: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PdfInfo {
    pub ids: [i32; 2],
    pub x: [f64; 2],
    pub scale: f64,
    pub xf: [f64; 2],
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeavyIon {
    pub n_coll_hard: i32,
    pub n_part_proj: i32,
    pub n_part_targ: i32,
    pub n_coll: i32,
    pub impact_parameter: f64,
    pub event_plane_angle: f64,
    pub centrality: f64,
}

/// Auxiliary per-event metadata, only forwarded in full processing mode.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AuxRecords {
    pub cross_section: Option<CrossSection>,
    pub pdf_info: Option<PdfInfo>,
    pub heavy_ion: Option<HeavyIon>,
}

impl AuxRecords {
    pub fn is_empty(&self) -> bool {
        self.cross_section.is_none() && self.pdf_info.is_none() && self.heavy_ion.is_none()
    }
}

/// Intermediate event object handed from the event converter to the analysis engine.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct IntermediateEvent {
    pub header: Option<EventHeader>,
    pub tracks: Vec<Track>,
    pub aux: Option<AuxRecords>,
}

impl IntermediateEvent {
    pub fn event_number(&self) -> Option<u64> {
        self.header.as_ref().map(|h| h.event_number)
    }
}
