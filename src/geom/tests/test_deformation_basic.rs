//! Tests for the end taper.

use crate::geom::{
    DeformationError, EndTaperOptions, GeomMesh, Tolerance, apply_end_taper, extrude_profile,
};

fn centered_bar(length: f64, stations: usize) -> GeomMesh {
    let ring = [[-1.0, -1.0], [1.0, -1.0], [1.0, 1.0], [-1.0, 1.0]];
    let zs: Vec<f64> = (0..=stations)
        .map(|i| -length / 2.0 + length * i as f64 / stations as f64)
        .collect();
    extrude_profile(&ring, &zs, None, Tolerance::default_geom())
        .unwrap()
        .0
}

#[test]
fn offset_is_zero_outside_the_span() {
    let options = EndTaperOptions::new(50.0, 10.0, 5.0);
    assert_eq!(options.offset_at(0.0), (0.0, 0.0));
    assert_eq!(options.offset_at(40.0), (0.0, 0.0));
    assert_eq!(options.offset_at(-40.0), (0.0, 0.0));
}

#[test]
fn offset_grows_monotonically_toward_each_end() {
    let options = EndTaperOptions::new(50.0, 10.0, 5.0);

    let mut previous = 0.0;
    for step in 0..=20 {
        let z = 40.0 + step as f64 * 0.5;
        let (dx, dy) = options.offset_at(z);
        assert!(dx >= previous);
        assert!((dy - 0.55 * dx).abs() < 1e-12);
        previous = dx;
    }
    assert!((options.offset_at(50.0).0 - 5.0).abs() < 1e-12);

    // Mirrored with opposite sign at the other end.
    let (dx_neg, _) = options.offset_at(-50.0);
    assert!((dx_neg + 5.0).abs() < 1e-12);
}

#[test]
fn taper_moves_only_end_vertices_and_keeps_topology() {
    let mesh = centered_bar(100.0, 20);
    let (tapered, diag) = apply_end_taper(&mesh, EndTaperOptions::new(50.0, 10.0, 5.0)).unwrap();

    assert_eq!(tapered.indices, mesh.indices);
    assert!(tapered.normals.is_some());
    assert!(diag.displaced_vertex_count > 0);
    assert!(diag.displaced_vertex_count < mesh.vertex_count());

    for (before, after) in mesh.positions.iter().zip(tapered.positions.iter()) {
        assert_eq!(before[2], after[2]);
        if 50.0 - before[2].abs() >= 10.0 {
            assert_eq!(before, after);
        }
    }
    assert_eq!(tapered.edge_topology(), (0, 0));
}

#[test]
fn invalid_taper_options_are_rejected() {
    let mesh = centered_bar(10.0, 2);
    assert!(matches!(
        apply_end_taper(&mesh, EndTaperOptions::new(5.0, 0.0, 1.0)),
        Err(DeformationError::InvalidTaperSpan(_))
    ));
    assert!(matches!(
        apply_end_taper(&mesh, EndTaperOptions::new(5.0, 1.0, f64::NAN)),
        Err(DeformationError::InvalidParameters)
    ));
    assert!(matches!(
        apply_end_taper(&GeomMesh::default(), EndTaperOptions::new(5.0, 1.0, 1.0)),
        Err(DeformationError::EmptyMesh)
    ));
}
