//! Corner connector inserts.

use std::sync::Arc;

use super::FrameError;
use super::profile::Profile2D;
use crate::geom::{GeomMesh, GeomMeshDiagnostics, Tolerance, Vec3, extrude_profile};

/// One connector solid, shared by all four corners of a frame.
#[derive(Debug, Clone)]
pub struct CornerInsert {
    pub mesh: Arc<GeomMesh>,
    pub diagnostics: GeomMeshDiagnostics,
    pub leg: f64,
    pub taper: f64,
    pub depth: f64,
    /// Z offset that puts the insert flush against the rear face of the rails.
    pub seat_z: f64,
}

/// L-shaped outline with chamfered inner edges, anchored at its center.
#[must_use]
pub fn corner_insert_profile(face_width: f64) -> Profile2D {
    let leg = (1.4 * face_width).max(24.0);
    let taper = (0.4 * face_width).max(6.0);
    Profile2D::new(
        vec![
            [0.0, 0.0],
            [leg, 0.0],
            [leg - taper, taper],
            [taper, taper],
            [taper, leg - taper],
            [0.0, leg],
        ],
        [leg / 2.0, leg / 2.0],
    )
}

/// Build the insert for a rail section. Its size does not depend on the
/// rail lengths.
///
/// # Errors
/// Returns [`FrameError`] when the extrusion fails.
pub fn build_corner_insert(
    face_width: f64,
    profile_depth: f64,
    lip_depth: f64,
    clearance: f64,
) -> Result<CornerInsert, FrameError> {
    let profile = corner_insert_profile(face_width);
    let leg = (1.4 * face_width).max(24.0);
    let taper = (0.4 * face_width).max(6.0);
    let depth = (1.1 * lip_depth + clearance).max(6.0);

    let (mesh, diagnostics) =
        extrude_profile(profile.points(), &[0.0, depth], None, Tolerance::default_geom())?;
    let [au, av] = profile.anchor();
    let mesh = mesh.translated(Vec3::new(-au, -av, -depth / 2.0));

    if !diagnostics.is_valid_solid() {
        log::warn!("corner insert is not a closed solid: {diagnostics}");
    }
    log::debug!("corner insert leg={leg} taper={taper} depth={depth}");

    Ok(CornerInsert {
        mesh: Arc::new(mesh),
        diagnostics,
        leg,
        taper,
        depth,
        seat_z: -(profile_depth - depth) / 2.0,
    })
}
