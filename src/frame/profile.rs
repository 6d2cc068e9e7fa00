//! Cross-sections of the rails.
//!
//! Profiles live in a (u, v) plane: u runs across the visible face, v runs
//! into the depth of the frame.

use serde::Serialize;

use crate::geom::signed_area;

/// A closed counter-clockwise polygon plus the point that becomes the local
/// origin of anything extruded from it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Profile2D {
    points: Vec<[f64; 2]>,
    anchor: [f64; 2],
}

impl Profile2D {
    #[must_use]
    pub fn new(points: Vec<[f64; 2]>, anchor: [f64; 2]) -> Self {
        Self { points, anchor }
    }

    #[must_use]
    pub fn points(&self) -> &[[f64; 2]] {
        &self.points
    }

    #[must_use]
    pub fn anchor(&self) -> [f64; 2] {
        self.anchor
    }

    #[must_use]
    pub fn area(&self) -> f64 {
        signed_area(&self.points)
    }
}

/// L-shaped rail section: a face plate of depth `lip_depth` and a lip bar of
/// width `lip_width` reaching back to `profile_depth`.
#[must_use]
pub fn build_rail_profile(
    face_width: f64,
    profile_depth: f64,
    lip_width: f64,
    lip_depth: f64,
) -> Profile2D {
    let inner = face_width - lip_width;
    Profile2D::new(
        vec![
            [0.0, 0.0],
            [face_width, 0.0],
            [face_width, profile_depth],
            [inner, profile_depth],
            [inner, lip_depth],
            [0.0, lip_depth],
        ],
        [face_width / 2.0, profile_depth / 2.0],
    )
}

/// The lip bar alone with its inner rear corner chamfered, expressed around
/// the center of the rail section.
#[must_use]
pub fn build_lip_overlay_profile(
    face_width: f64,
    profile_depth: f64,
    lip_width: f64,
    lip_depth: f64,
) -> Profile2D {
    let inner = face_width - lip_width;
    let chamfer = 0.35 * lip_width.min(profile_depth - lip_depth);
    let (du, dv) = (-face_width / 2.0, -profile_depth / 2.0);

    let points = [
        [inner, lip_depth],
        [face_width, lip_depth],
        [face_width, profile_depth],
        [inner + chamfer, profile_depth],
        [inner, profile_depth - chamfer],
    ]
    .into_iter()
    .map(|[u, v]| [u + du, v + dv])
    .collect();

    Profile2D::new(points, [0.0, 0.0])
}
