use crate::geom::mesh::{count_edge_topology, finalize_mesh, fix_triangle_winding_consistency};
use crate::geom::{Point3, Tolerance, Transform, Vec3};

fn tetra_soup() -> (Vec<Point3>, Vec<u32>) {
    // Every face carries its own copies of the corners.
    let a = Point3::new(0.0, 0.0, 0.0);
    let b = Point3::new(1.0, 0.0, 0.0);
    let c = Point3::new(0.0, 1.0, 0.0);
    let d = Point3::new(0.0, 0.0, 1.0);
    let points = vec![a, c, b, a, b, d, b, c, d, c, a, d];
    let indices = (0..12).collect();
    (points, indices)
}

#[test]
fn finalize_welds_soup_into_closed_solid() {
    let (points, indices) = tetra_soup();
    let (mesh, diag) = finalize_mesh(points, indices, Tolerance::default_geom());

    mesh.validate().expect("mesh validate");
    assert_eq!(mesh.vertex_count(), 4);
    assert_eq!(diag.welded_vertex_count, 8);
    assert!(diag.is_valid_solid(), "{diag}");
    assert!(mesh.signed_volume() > 0.0);
    assert_eq!(mesh.normals.as_ref().map(Vec::len), Some(4));
}

#[test]
fn finalize_flips_inward_meshes() {
    let (points, mut indices) = tetra_soup();
    for tri in indices.chunks_exact_mut(3) {
        tri.swap(1, 2);
    }

    let (mesh, diag) = finalize_mesh(points, indices, Tolerance::default_geom());
    assert!(mesh.signed_volume() > 0.0);
    assert!(diag.has_warnings());
}

#[test]
fn finalize_culls_degenerate_triangles_and_reports_open_edges() {
    let points = vec![
        Point3::new(0.0, 0.0, 0.0),
        Point3::new(1.0, 0.0, 0.0),
        Point3::new(0.0, 1.0, 0.0),
        Point3::new(2.0, 0.0, 0.0),
    ];
    let indices = vec![0, 1, 2, 0, 1, 3];

    let (mesh, diag) = finalize_mesh(points, indices, Tolerance::default_geom());
    assert_eq!(mesh.triangle_count(), 1);
    assert_eq!(diag.degenerate_triangle_count, 1);
    assert_eq!(diag.open_edge_count, 3);
    assert!(!diag.is_valid_solid());
}

#[test]
fn winding_fix_aligns_neighbours() {
    // Two triangles sharing edge (1, 2), the second wound the same way.
    let mut indices = vec![0, 1, 2, 1, 2, 3];
    let flipped = fix_triangle_winding_consistency(&mut indices);
    assert_eq!(flipped, 1);
    assert_eq!(count_edge_topology(&indices), (4, 0));
}

#[test]
fn transformed_mesh_keeps_topology_and_rotates_normals() {
    let (points, indices) = tetra_soup();
    let (mesh, _) = finalize_mesh(points, indices, Tolerance::default_geom());

    let moved = mesh
        .transformed(Transform::rotate_z(std::f64::consts::FRAC_PI_2))
        .translated(Vec3::new(10.0, 0.0, 0.0));
    assert_eq!(moved.indices, mesh.indices);
    assert!((moved.signed_volume() - mesh.signed_volume()).abs() < 1e-12);

    let bbox = moved.bbox().unwrap();
    assert!((bbox.min.x - 9.0).abs() < 1e-12);
    assert!((bbox.max.x - 10.0).abs() < 1e-12);
    assert!((bbox.max.y - 1.0).abs() < 1e-12);
}
