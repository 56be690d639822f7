use shard_schemas::{AuxRecords, CrossSection, EventHeader, HeavyIon, PdfInfo, Track};

pub fn sample_header(event_number: u64) -> EventHeader {
    EventHeader {
        event_number,
        run_number: 520_259,
        weight: 1.0,
        vertex: [0.1, -0.2, 1.5, 0.0],
        impact_parameter: 4.2,
        generator_id: 1,
    }
}

/// Two generator particles and one transport product.
pub fn sample_tracks() -> Vec<Track> {
    vec![
        Track {
            pdg_code: 211,
            status_code: 1,
            momentum: [0.3, 0.1, 2.0, 2.03],
            production_vertex: [0.1, -0.2, 1.5, 0.0],
            mothers: vec![],
            daughters: vec![],
            from_generator: true,
        },
        Track {
            pdg_code: -211,
            status_code: 1,
            momentum: [-0.2, 0.4, -1.1, 1.2],
            production_vertex: [0.1, -0.2, 1.5, 0.0],
            mothers: vec![],
            daughters: vec![],
            from_generator: true,
        },
        Track {
            pdg_code: 22,
            status_code: 1,
            momentum: [0.05, 0.0, 0.3, 0.3041],
            production_vertex: [1.1, 0.8, 3.5, 0.2],
            mothers: vec![0],
            daughters: vec![],
            from_generator: false,
        },
    ]
}

pub fn sample_aux() -> AuxRecords {
    AuxRecords {
        cross_section: Some(CrossSection {
            accepted: 1,
            attempted: 1,
            value: 67.6,
            error: 0.0,
        }),
        pdf_info: Some(PdfInfo {
            ids: [21, 21],
            x: [0.01, 0.02],
            scale: 10.0,
            xf: [0.5, 0.4],
        }),
        heavy_ion: Some(HeavyIon {
            n_coll_hard: 2,
            n_part_proj: 10,
            n_part_targ: 12,
            n_coll: 20,
            impact_parameter: 4.2,
            event_plane_angle: 0.7,
            centrality: 35.0,
        }),
    }
}
