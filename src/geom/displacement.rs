//! Procedural surface displacement.
//!
//! The woodgrain field perturbs the cross-section of an extruded piece with
//! two interfering sine waves. It is a pure function of vertex position, so
//! the same mesh always displaces the same way.

use super::mesh::GeomMesh;

/// Options for the woodgrain displacement.
///
/// For a vertex `(x, y, z)` with `z` along the length axis:
/// `grain = sin(grain_z * z + grain_x * x)`,
/// `ripple = sin(ripple_z * z + ripple_y * y)` and
/// `d = amplitude * (grain + ripple_weight * ripple)`. The vertex moves by
/// `(d, depth_ratio * d)` across the section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct WoodgrainOptions {
    pub amplitude: f64,
    pub grain_z: f64,
    pub grain_x: f64,
    pub ripple_z: f64,
    pub ripple_y: f64,
    pub ripple_weight: f64,
    pub depth_ratio: f64,
    /// Whether to recompute normals after displacement.
    pub recompute_normals: bool,
}

impl Default for WoodgrainOptions {
    fn default() -> Self {
        Self {
            amplitude: 0.12,
            grain_z: 0.18,
            grain_x: 0.35,
            ripple_z: 0.045,
            ripple_y: 0.25,
            ripple_weight: 0.5,
            depth_ratio: 0.5,
            recompute_normals: true,
        }
    }
}

impl WoodgrainOptions {
    /// Displacement `(dx, dy)` for a vertex.
    #[must_use]
    pub fn offset_at(&self, p: [f64; 3]) -> (f64, f64) {
        let grain = (self.grain_z * p[2] + self.grain_x * p[0]).sin();
        let ripple = (self.ripple_z * p[2] + self.ripple_y * p[1]).sin();
        let d = self.amplitude * (grain + self.ripple_weight * ripple);
        (d, self.depth_ratio * d)
    }

    fn is_finite(&self) -> bool {
        [
            self.amplitude,
            self.grain_z,
            self.grain_x,
            self.ripple_z,
            self.ripple_y,
            self.ripple_weight,
            self.depth_ratio,
        ]
        .iter()
        .all(|v| v.is_finite())
    }
}

/// Errors that can occur during displacement operations.
#[derive(Debug, thiserror::Error)]
pub enum DisplacementError {
    /// The input mesh has no triangles.
    #[error("input mesh has no triangles")]
    EmptyMesh,

    /// The input mesh contains invalid geometry (NaN/Inf values).
    #[error("input mesh contains invalid geometry (NaN/Inf values)")]
    InvalidGeometry,

    /// Displacement parameters contain NaN or Inf.
    #[error("displacement parameters contain NaN or Inf")]
    InvalidDisplacementValues,
}

/// Diagnostics specific to displacement operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DisplacementDiagnostics {
    /// Number of vertices in the mesh.
    pub vertex_count: usize,
    /// Minimum signed displacement value applied.
    pub min_displacement_applied: f64,
    /// Maximum signed displacement value applied.
    pub max_displacement_applied: f64,
}

/// Perturb every vertex of `mesh` with the woodgrain field.
///
/// # Errors
/// Returns an error if the mesh is empty, contains invalid geometry, or if
/// the options are not finite.
pub fn apply_woodgrain(
    mesh: &GeomMesh,
    options: WoodgrainOptions,
) -> Result<(GeomMesh, DisplacementDiagnostics), DisplacementError> {
    if mesh.indices.is_empty() || mesh.positions.is_empty() {
        return Err(DisplacementError::EmptyMesh);
    }
    if mesh.has_invalid_vertices() {
        return Err(DisplacementError::InvalidGeometry);
    }
    if !options.is_finite() {
        return Err(DisplacementError::InvalidDisplacementValues);
    }

    let mut min_d = f64::INFINITY;
    let mut max_d = f64::NEG_INFINITY;

    let positions: Vec<[f64; 3]> = mesh
        .positions
        .iter()
        .map(|p| {
            let (dx, dy) = options.offset_at(*p);
            min_d = min_d.min(dx);
            max_d = max_d.max(dx);
            [p[0] + dx, p[1] + dy, p[2]]
        })
        .collect();

    let result = if options.recompute_normals {
        mesh.with_positions(positions)
    } else {
        GeomMesh {
            positions,
            indices: mesh.indices.clone(),
            normals: mesh.normals.clone(),
        }
    };

    let diagnostics = DisplacementDiagnostics {
        vertex_count: result.vertex_count(),
        min_displacement_applied: min_d,
        max_displacement_applied: max_d,
    };

    Ok((result, diagnostics))
}
