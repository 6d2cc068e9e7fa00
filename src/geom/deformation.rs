//! Deformation fields for mesh transformations.
//!
//! Only one field lives here: the end taper, a shear of the cross-section
//! that ramps up over a fixed span near both ends of an extruded piece. It is
//! what gives each rail its approximate miter.
//!
//! Deformations move vertices only. Topology is kept as is and normals are
//! recomputed afterwards, so a closed input stays closed.
//!
//! # Example
//!
//! ```ignore
//! use frame_engine::geom::{apply_end_taper, EndTaperOptions};
//!
//! let options = EndTaperOptions::new(length / 2.0, span, amplitude);
//! let (tapered, diag) = apply_end_taper(&mesh, options)?;
//! ```

use super::mesh::GeomMesh;

// ============================================================================
// Error types
// ============================================================================

/// Errors that can occur during deformation operations.
#[derive(Debug, thiserror::Error)]
pub enum DeformationError {
    /// The input mesh has no triangles.
    #[error("input mesh has no triangles")]
    EmptyMesh,

    /// The input mesh contains invalid geometry (NaN/Inf values).
    #[error("input mesh contains invalid geometry (NaN/Inf values)")]
    InvalidGeometry,

    /// Deformation parameters contain NaN or Inf.
    #[error("deformation parameters contain NaN or Inf")]
    InvalidParameters,

    /// Taper span must be strictly positive.
    #[error("taper span must be positive, got {0}")]
    InvalidTaperSpan(f64),
}

// ============================================================================
// Diagnostics
// ============================================================================

/// Diagnostics specific to deformation operations.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct DeformationDiagnostics {
    /// Number of vertices in the mesh.
    pub vertex_count: usize,
    /// Number of vertices that actually moved.
    pub displaced_vertex_count: usize,
    /// Largest displacement distance applied.
    pub max_displacement: f64,
    /// Average displacement over the displaced vertices.
    pub avg_displacement: f64,
    /// Warnings generated during the operation.
    pub warnings: Vec<String>,
}

// ============================================================================
// End taper
// ============================================================================

/// Options for the end taper.
///
/// The mesh is expected to be centered on its length axis (local Z), spanning
/// `[-half_length, half_length]`. A vertex at axial coordinate `z` has
/// `distance = half_length - |z|` to its nearest end; inside the span the
/// cross-section is sheared by `amplitude * t * sign(z)` along X and by
/// `depth_ratio` of that along Y, with `t = 1 - distance / span`.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EndTaperOptions {
    /// Half of the piece length.
    pub half_length: f64,
    /// Axial distance from each end over which the shear ramps up.
    pub span: f64,
    /// Shear along X at the very end of the piece.
    pub amplitude: f64,
    /// Ratio of the Y shear to the X shear.
    pub depth_ratio: f64,
    /// Whether to recompute normals after deformation.
    pub recompute_normals: bool,
}

impl EndTaperOptions {
    pub const DEFAULT_DEPTH_RATIO: f64 = 0.55;

    #[must_use]
    pub const fn new(half_length: f64, span: f64, amplitude: f64) -> Self {
        Self {
            half_length,
            span,
            amplitude,
            depth_ratio: Self::DEFAULT_DEPTH_RATIO,
            recompute_normals: true,
        }
    }

    /// Shear `(dx, dy)` for a vertex at axial coordinate `z`.
    #[must_use]
    pub fn offset_at(&self, z: f64) -> (f64, f64) {
        let distance = self.half_length - z.abs();
        if !(0.0..self.span).contains(&distance) {
            return (0.0, 0.0);
        }

        let t = 1.0 - distance / self.span;
        let sign = if z > 0.0 {
            1.0
        } else if z < 0.0 {
            -1.0
        } else {
            0.0
        };
        let skew = self.amplitude * t * sign;
        (skew, self.depth_ratio * skew)
    }
}

/// Shear both ends of a centered extrusion.
///
/// # Errors
/// Returns an error if the mesh is empty, contains invalid geometry, or if the
/// options are not finite or the span is not positive.
pub fn apply_end_taper(
    mesh: &GeomMesh,
    options: EndTaperOptions,
) -> Result<(GeomMesh, DeformationDiagnostics), DeformationError> {
    validate_mesh(mesh)?;

    if !options.half_length.is_finite()
        || !options.span.is_finite()
        || !options.amplitude.is_finite()
        || !options.depth_ratio.is_finite()
    {
        return Err(DeformationError::InvalidParameters);
    }
    if options.span <= 0.0 {
        return Err(DeformationError::InvalidTaperSpan(options.span));
    }

    let mut displaced_vertex_count = 0usize;
    let mut max_displacement = 0.0f64;
    let mut total_displacement = 0.0f64;

    let positions: Vec<[f64; 3]> = mesh
        .positions
        .iter()
        .map(|p| {
            let (dx, dy) = options.offset_at(p[2]);
            if dx != 0.0 || dy != 0.0 {
                let d = dx.hypot(dy);
                displaced_vertex_count += 1;
                max_displacement = max_displacement.max(d);
                total_displacement += d;
            }
            [p[0] + dx, p[1] + dy, p[2]]
        })
        .collect();

    let mut warnings = Vec::new();
    if displaced_vertex_count == 0 {
        warnings.push("no vertex lies inside the taper span".to_string());
    }

    let result = if options.recompute_normals {
        mesh.with_positions(positions)
    } else {
        GeomMesh {
            positions,
            indices: mesh.indices.clone(),
            normals: mesh.normals.clone(),
        }
    };

    let diagnostics = DeformationDiagnostics {
        vertex_count: result.vertex_count(),
        displaced_vertex_count,
        max_displacement,
        avg_displacement: if displaced_vertex_count > 0 {
            total_displacement / displaced_vertex_count as f64
        } else {
            0.0
        },
        warnings,
    };

    Ok((result, diagnostics))
}

fn validate_mesh(mesh: &GeomMesh) -> Result<(), DeformationError> {
    if mesh.indices.is_empty() || mesh.positions.is_empty() {
        return Err(DeformationError::EmptyMesh);
    }
    if mesh.has_invalid_vertices() {
        return Err(DeformationError::InvalidGeometry);
    }
    Ok(())
}
