//! Geometry kernel: vector math, triangle meshes and the mesh operations the
//! frame pipeline is built from.

mod core;
mod deformation;
mod diagnostics;
mod displacement;
mod extrusion;
mod mesh;
mod triangulation;

pub use core::{BBox, Point3, Tolerance, Transform, Vec3};
pub use deformation::{DeformationDiagnostics, DeformationError, EndTaperOptions, apply_end_taper};
pub use diagnostics::GeomMeshDiagnostics;
pub use displacement::{
    DisplacementDiagnostics, DisplacementError, WoodgrainOptions, apply_woodgrain,
};
pub use extrusion::{
    BevelOptions, ExtrusionError, extrude_profile, offset_polygon_inward, shortest_edge,
};
pub use mesh::GeomMesh;
pub use triangulation::{signed_area, triangulate_polygon};

#[cfg(test)]
mod tests;
