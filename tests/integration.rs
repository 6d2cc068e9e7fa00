use std::collections::HashMap;
use std::io::{Cursor, Read};

use frame_engine::FrameEngine;
use frame_engine::app::AppState;
use frame_engine::config::parse_frame_config;
use frame_engine::export::{
    HEADER_SIZE, StlFormat, TRIANGLE_RECORD_SIZE, export_archive, export_files,
};
use frame_engine::frame::{FrameParameters, FrameStyle, RawFrameInput, assemble_frame, normalize};

fn read_f32(bytes: &[u8], offset: usize) -> f32 {
    f32::from_le_bytes([
        bytes[offset],
        bytes[offset + 1],
        bytes[offset + 2],
        bytes[offset + 3],
    ])
}

/// Triangles of a binary STL with coordinates quantized so shared corners
/// compare equal.
fn stl_triangles(bytes: &[u8]) -> Vec<[[i64; 3]; 3]> {
    let count = u32::from_le_bytes([bytes[80], bytes[81], bytes[82], bytes[83]]) as usize;
    assert_eq!(bytes.len(), HEADER_SIZE + 4 + count * TRIANGLE_RECORD_SIZE);

    (0..count)
        .map(|i| {
            let record = HEADER_SIZE + 4 + i * TRIANGLE_RECORD_SIZE;
            let mut tri = [[0i64; 3]; 3];
            for (v, corner) in tri.iter_mut().enumerate() {
                for (axis, value) in corner.iter_mut().enumerate() {
                    let offset = record + 12 + v * 12 + axis * 4;
                    *value = (f64::from(read_f32(bytes, offset)) * 1e4).round() as i64;
                }
            }
            tri
        })
        .collect()
}

#[test]
fn engine_initializes() {
    let mut engine = FrameEngine::new().expect("default frame");
    assert!(!engine.has_pending());
    assert!(!engine.poll(0.0).expect("nothing to do"));
}

#[test]
fn default_dimensions() {
    let frame = assemble_frame(FrameParameters::default()).expect("build");
    let dims = frame.dimensions();
    let expected = [
        (dims.inner_width, 600.8),
        (dims.inner_height, 400.8),
        (dims.horizontal_length, 608.8),
        (dims.vertical_length, 408.8),
        (dims.outer_width, 640.8),
        (dims.outer_height, 440.8),
    ];
    for (actual, value) in expected {
        assert!((actual - value).abs() < 1e-9, "{actual} != {value}");
    }
}

#[test]
fn lip_that_does_not_fit_is_pulled_inside_the_face() {
    let params = normalize(FrameParameters {
        face_width: 3.0,
        lip_width: 10.0,
        ..FrameParameters::default()
    });
    assert_eq!(params.lip_width, 2.0);
    assert!(params.lip_width < params.face_width);
    assert!(assemble_frame(params).is_ok());
}

#[test]
fn structural_payloads_are_closed_manifolds() {
    for style in FrameStyle::ALL {
        let params = FrameParameters {
            style,
            ..FrameParameters::default()
        };
        let files = export_files(params, StlFormat::Binary).expect("export");
        assert!(files.len() >= 4);

        let rails = &files[..4];
        for (i, a) in rails.iter().enumerate() {
            for b in &rails[i + 1..] {
                assert_ne!(a.bytes, b.bytes, "{} vs {}", a.name, b.name);
            }
        }

        for file in &files {
            let triangles = stl_triangles(&file.bytes);
            assert!(!triangles.is_empty(), "{}", file.name);

            let mut edges: HashMap<([i64; 3], [i64; 3]), usize> = HashMap::new();
            for tri in &triangles {
                for k in 0..3 {
                    let (a, b) = (tri[k], tri[(k + 1) % 3]);
                    let key = if a < b { (a, b) } else { (b, a) };
                    *edges.entry(key).or_default() += 1;
                }
            }
            let bad = edges.values().filter(|count| **count != 2).count();
            assert_eq!(bad, 0, "{style}: {} has {bad} edges not shared by two triangles", file.name);
        }
    }
}

#[test]
fn archive_contains_the_export_set() {
    let params = FrameParameters {
        style: FrameStyle::Bold,
        ..FrameParameters::default()
    };
    let bytes = export_archive(params, StlFormat::Binary).expect("archive");
    let files = export_files(params, StlFormat::Binary).expect("files");

    let mut archive = zip::ZipArchive::new(Cursor::new(bytes)).expect("zip");
    assert_eq!(archive.len(), 8);
    for file in &files {
        let mut entry = archive.by_name(&file.name).expect("entry");
        let mut content = Vec::new();
        entry.read_to_end(&mut content).expect("read");
        assert_eq!(content, file.bytes);
    }
}

#[test]
fn config_and_flags_feed_the_same_pipeline() {
    let from_config = parse_frame_config(
        r#"
        [frame]
        width = 300
        height = "200"
        style = "wood"
        "#,
    )
    .expect("config");
    let overrides = RawFrameInput {
        height: Some("250".into()),
        ..RawFrameInput::default()
    };
    let params = from_config.merged_with(overrides).to_parameters();

    assert_eq!(params.width, 300.0);
    assert_eq!(params.height, 250.0);
    assert_eq!(params.style, FrameStyle::Wood);

    let frame = assemble_frame(params).expect("build");
    assert!((frame.dimensions().inner_height - 250.8).abs() < 1e-9);
}

#[test]
fn debounced_edits_rebuild_once() {
    let mut state = AppState::new().expect("state");
    let edit = |width: f64| RawFrameInput {
        width: Some(width.into()),
        ..RawFrameInput::default()
    };

    state.request_rebuild(edit(500.0), 1_000.0);
    state.request_rebuild(edit(510.0), 1_100.0);
    assert!(!state.poll(1_250.0).expect("poll"));
    assert!(state.poll(1_300.0).expect("poll"));

    assert_eq!(state.rebuild_count(), 1);
    assert_eq!(state.frame().parameters().width, 510.0);
}
