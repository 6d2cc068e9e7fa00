//! The parametric frame: parameters, styles, rail sections and the assembly
//! of rails, lip overlays and corner inserts into one scene.

mod assemble;
mod insert;
mod params;
mod piece;
mod profile;
mod style;

pub use assemble::{CameraFit, Frame, assemble_frame};
pub use insert::{CornerInsert, build_corner_insert, corner_insert_profile};
pub use params::{
    DEFAULT_CLEARANCE, DEFAULT_FACE_WIDTH, DEFAULT_HEIGHT, DEFAULT_LIP_DEPTH, DEFAULT_LIP_WIDTH,
    DEFAULT_PROFILE_DEPTH, DEFAULT_WIDTH, FrameDimensions, FrameParameters, MAX_DIMENSION,
    MIN_DIMENSION, MIN_SECTION, RawFrameInput, RawNumber, normalize,
};
pub use piece::{
    Corner, Orientation, Piece, PieceRole, Placement, Side, TaperSpec, extrude_piece,
    piece_stations,
};
pub use profile::{Profile2D, build_lip_overlay_profile, build_rail_profile};
pub use style::{BevelPolicy, FrameStyle, StyleMaterial, StylePolicy};

use crate::geom::{DeformationError, DisplacementError, ExtrusionError};

/// Failures of the geometry kernel while building a frame.
///
/// Normalized parameters always describe buildable pieces, so these only
/// surface when the kernel itself misbehaves.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("extrusion failed: {0}")]
    Extrusion(#[from] ExtrusionError),
    #[error("end taper failed: {0}")]
    Deformation(#[from] DeformationError),
    #[error("woodgrain failed: {0}")]
    Displacement(#[from] DisplacementError),
}
