//! Mesh diagnostics for the geometry kernel.
//!
//! Diagnostics are collected while a mesh is finalized and tell the caller
//! whether the result is a printable solid:
//!
//! - Validating mesh quality (watertight, manifold, no degenerates)
//! - Tracking repair operations (welding, winding fixes)
//!
//! # Example
//!
//! ```ignore
//! use frame_engine::geom::{extrude_profile, Tolerance};
//!
//! let (mesh, diagnostics) = extrude_profile(&ring, &[0.0, 10.0], None, Tolerance::default_geom())?;
//! assert!(diagnostics.is_valid_solid());
//! ```

use std::fmt;

/// Topology and repair statistics for a finalized mesh.
///
/// - `open_edge_count`: edges with only one adjacent triangle (holes in mesh)
/// - `non_manifold_edge_count`: edges with more than two adjacent triangles
#[derive(Debug, Default, Clone, PartialEq)]
pub struct GeomMeshDiagnostics {
    /// Total number of vertices in the final mesh.
    pub vertex_count: usize,

    /// Total number of triangles in the final mesh.
    pub triangle_count: usize,

    /// Number of vertices merged during tolerance-based welding.
    pub welded_vertex_count: usize,

    /// Number of triangles whose winding order was corrected for consistency.
    pub flipped_triangle_count: usize,

    /// Number of degenerate (zero-area) triangles removed.
    pub degenerate_triangle_count: usize,

    /// Number of open (boundary) edges. A closed solid has none.
    pub open_edge_count: usize,

    /// Number of edges shared by more than two triangles.
    pub non_manifold_edge_count: usize,

    /// Human-readable notes about repairs performed.
    pub warnings: Vec<String>,
}

impl GeomMeshDiagnostics {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_watertight(&self) -> bool {
        self.open_edge_count == 0
    }

    #[must_use]
    pub fn is_manifold(&self) -> bool {
        self.non_manifold_edge_count == 0
    }

    /// Watertight and manifold: the minimum requirement for a printable solid.
    #[must_use]
    pub fn is_valid_solid(&self) -> bool {
        self.is_watertight() && self.is_manifold()
    }

    #[must_use]
    pub fn has_warnings(&self) -> bool {
        !self.warnings.is_empty()
    }

    pub fn add_warning(&mut self, warning: impl Into<String>) {
        self.warnings.push(warning.into());
    }

    /// One-line summary for CLI output and logs.
    #[must_use]
    pub fn summary(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for GeomMeshDiagnostics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "open_edges={} non_manifold_edges={} welded={} flipped={} degenerate={}",
            self.open_edge_count,
            self.non_manifold_edge_count,
            self.welded_vertex_count,
            self.flipped_triangle_count,
            self.degenerate_triangle_count
        )?;
        if !self.warnings.is_empty() {
            write!(f, " warnings=[{}]", self.warnings.join("; "))?;
        }
        Ok(())
    }
}
