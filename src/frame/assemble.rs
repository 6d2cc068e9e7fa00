use std::sync::Arc;

use serde::Serialize;

use super::FrameError;
use super::insert::build_corner_insert;
use super::params::{FrameDimensions, FrameParameters, normalize};
use super::piece::{Corner, Orientation, Piece, PieceRole, Placement, Side, TaperSpec, extrude_piece};
use super::profile::{Profile2D, build_lip_overlay_profile, build_rail_profile};
use crate::geom::{BBox, GeomMesh, GeomMeshDiagnostics, Vec3};

const DEFAULT_FOV_DEGREES: f64 = 45.0;
const CAMERA_MARGIN: f64 = 1.35;

/// A fully built frame. Rebuilt from scratch for every parameter change.
#[derive(Debug, Clone)]
pub struct Frame {
    parameters: FrameParameters,
    dimensions: FrameDimensions,
    pieces: Vec<Piece>,
}

impl Frame {
    #[must_use]
    pub fn parameters(&self) -> &FrameParameters {
        &self.parameters
    }

    #[must_use]
    pub fn dimensions(&self) -> &FrameDimensions {
        &self.dimensions
    }

    #[must_use]
    pub fn pieces(&self) -> &[Piece] {
        &self.pieces
    }

    #[must_use]
    pub fn piece(&self, role: PieceRole) -> Option<&Piece> {
        self.pieces.iter().find(|piece| piece.role == role)
    }

    /// Rails and corner inserts, without the lip overlays.
    pub fn structural_pieces(&self) -> impl Iterator<Item = &Piece> {
        self.pieces.iter().filter(|piece| piece.role.is_structural())
    }

    /// Union of all placed pieces.
    #[must_use]
    pub fn bounding_box(&self) -> Option<BBox> {
        self.pieces
            .iter()
            .filter_map(Piece::placed_bbox)
            .reduce(BBox::union)
    }

    #[must_use]
    pub fn camera_fit(&self, fov_degrees: f64) -> Option<CameraFit> {
        self.bounding_box()
            .map(|bbox| CameraFit::from_bbox(bbox, fov_degrees))
    }

    #[must_use]
    pub fn vertex_count(&self) -> usize {
        self.pieces.iter().map(|piece| piece.mesh.vertex_count()).sum()
    }

    #[must_use]
    pub fn triangle_count(&self) -> usize {
        self.pieces.iter().map(|piece| piece.mesh.triangle_count()).sum()
    }
}

/// Where to aim a perspective camera and how far back to put it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct CameraFit {
    pub target: [f64; 3],
    pub distance: f64,
}

impl CameraFit {
    /// Half the largest extent over `tan(fov / 2)`, with a margin. An
    /// unusable field of view falls back to 45 degrees.
    #[must_use]
    pub fn from_bbox(bbox: BBox, fov_degrees: f64) -> Self {
        let fov = if fov_degrees.is_finite() && fov_degrees > 0.0 && fov_degrees < 180.0 {
            fov_degrees
        } else {
            DEFAULT_FOV_DEGREES
        };
        let half = bbox.size().max_component() / 2.0;
        let distance = half / (fov.to_radians() / 2.0).tan() * CAMERA_MARGIN;
        Self {
            target: bbox.center().to_array(),
            distance,
        }
    }
}

/// Normalize `params` and build every piece of the frame.
///
/// # Errors
/// Returns [`FrameError`] if a kernel stage fails on a piece.
pub fn assemble_frame(params: FrameParameters) -> Result<Frame, FrameError> {
    let params = normalize(params);
    let dims = params.dimensions();
    let policy = params.style.policy();
    let taper = TaperSpec::for_section(params.face_width, params.profile_depth);

    let rail = build_rail_profile(
        params.face_width,
        params.profile_depth,
        params.lip_width,
        params.lip_depth,
    );
    let lip = build_lip_overlay_profile(
        params.face_width,
        params.profile_depth,
        params.lip_width,
        params.lip_depth,
    );

    let build = |profile: &Profile2D,
                 length: f64,
                 orientation: Orientation|
     -> Result<(Arc<GeomMesh>, GeomMeshDiagnostics), FrameError> {
        let (mesh, diagnostics) = extrude_piece(profile, length, orientation, params.style, taper)?;
        Ok((Arc::new(mesh), diagnostics))
    };

    // Opposite rails are identical at their local origin.
    let horizontal = build(&rail, dims.horizontal_length, Orientation::Horizontal)?;
    let vertical = build(&rail, dims.vertical_length, Orientation::Vertical)?;
    let horizontal_lip = build(&lip, dims.horizontal_length, Orientation::Horizontal)?;
    let vertical_lip = build(&lip, dims.vertical_length, Orientation::Vertical)?;

    let shift = (params.face_width - params.lip_width) / 2.0;
    let mut pieces = Vec::with_capacity(12);

    let sets = [
        (false, &horizontal, &vertical),
        (true, &horizontal_lip, &vertical_lip),
    ];
    for (overlay, along_x, along_y) in sets {
        for side in Side::ALL {
            let orientation = side.orientation();
            let ((mesh, diagnostics), length) = match orientation {
                Orientation::Horizontal => (along_x, dims.horizontal_length),
                Orientation::Vertical => (along_y, dims.vertical_length),
            };
            let translation = match side {
                Side::Bottom => Vec3::new(0.0, -(dims.offset_y + shift), 0.0),
                Side::Top => Vec3::new(0.0, dims.offset_y + shift, 0.0),
                Side::Left => Vec3::new(-(dims.offset_x + shift), 0.0, 0.0),
                Side::Right => Vec3::new(dims.offset_x + shift, 0.0, 0.0),
            };
            let role = if overlay {
                PieceRole::LipOverlay(side)
            } else {
                PieceRole::Rail(side)
            };

            pieces.push(Piece {
                role,
                orientation: Some(orientation),
                length,
                mesh: Arc::clone(mesh),
                placement: Placement::new(translation, side.rotation_z()),
                diagnostics: diagnostics.clone(),
            });
        }
    }

    if policy.corner_inserts {
        let insert = build_corner_insert(
            params.face_width,
            params.profile_depth,
            params.lip_depth,
            params.clearance,
        )?;
        let inset = 0.25 * dims.inner_width.min(dims.inner_height);

        for corner in Corner::ALL {
            let (sx, sy) = corner.signs();
            let translation = Vec3::new(
                sx * (dims.offset_x - inset),
                sy * (dims.offset_y - inset),
                insert.seat_z,
            );
            pieces.push(Piece {
                role: PieceRole::CornerInsert(corner),
                orientation: None,
                length: insert.depth,
                mesh: Arc::clone(&insert.mesh),
                placement: Placement::new(translation, corner.rotation_z()),
                diagnostics: insert.diagnostics.clone(),
            });
        }
    }

    log::debug!(
        "assembled {} frame: {} pieces, outer {:.1} x {:.1}",
        params.style,
        pieces.len(),
        dims.outer_width,
        dims.outer_height
    );

    Ok(Frame {
        parameters: params,
        dimensions: dims,
        pieces,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::style::FrameStyle;
    use crate::geom::Point3;

    fn bold() -> FrameParameters {
        FrameParameters {
            style: FrameStyle::Bold,
            ..FrameParameters::default()
        }
    }

    #[test]
    fn default_frame_has_rails_and_overlays_only() {
        let frame = assemble_frame(FrameParameters::default()).unwrap();

        assert_eq!(frame.pieces().len(), 8);
        assert_eq!(frame.structural_pieces().count(), 4);
        assert!((frame.dimensions().outer_width - 640.8).abs() < 1e-9);
        assert!((frame.dimensions().outer_height - 440.8).abs() < 1e-9);

        for side in Side::ALL {
            let rail = frame.piece(PieceRole::Rail(side)).unwrap();
            let lip = frame.piece(PieceRole::LipOverlay(side)).unwrap();
            assert_eq!(rail.placement, lip.placement);
            assert!(rail.diagnostics.is_valid_solid());
        }
    }

    #[test]
    fn rails_sit_around_the_opening() {
        let frame = assemble_frame(FrameParameters::default()).unwrap();
        let shift = (20.0 - 4.0) / 2.0;

        let bottom = frame.piece(PieceRole::Rail(Side::Bottom)).unwrap();
        assert_eq!(bottom.placement.translation, Vec3::new(0.0, -(200.4 + shift), 0.0));
        assert_eq!(bottom.placement.rotation_z, 0.0);
        assert!((bottom.length - 608.8).abs() < 1e-9);

        let right = frame.piece(PieceRole::Rail(Side::Right)).unwrap();
        assert_eq!(right.placement.translation, Vec3::new(300.4 + shift, 0.0, 0.0));
        assert_eq!(right.orientation, Some(Orientation::Vertical));
        assert!((right.length - 408.8).abs() < 1e-9);

        let top = frame.piece(PieceRole::Rail(Side::Top)).unwrap();
        assert!(Arc::ptr_eq(&top.mesh, &bottom.mesh));
    }

    #[test]
    fn lips_face_the_opening_on_every_side() {
        let frame = assemble_frame(FrameParameters::default()).unwrap();
        let lip_z = -7.0 + 4.0 + 1e-6;
        // Rings at the inner edge of the taper span are not sheared.
        let span = 22.0;

        for side in Side::ALL {
            let rail = frame.piece(PieceRole::Rail(side)).unwrap();
            let center = rail.placement.translation;
            let mesh = rail.placed_mesh();

            // Across-face offset of lip vertices, measured toward the opening.
            let inward: Vec<f64> = mesh
                .positions
                .iter()
                .filter(|p| p[2] > lip_z)
                .filter(|p| match side.orientation() {
                    Orientation::Horizontal => p[0].abs() <= 304.4 - span + 1e-3,
                    Orientation::Vertical => p[1].abs() <= 204.4 - span + 1e-3,
                })
                .map(|p| match side {
                    Side::Bottom => p[1] - center.y,
                    Side::Top => center.y - p[1],
                    Side::Left => p[0] - center.x,
                    Side::Right => center.x - p[0],
                })
                .collect();

            assert!(!inward.is_empty(), "{side:?}");
            assert!(inward.iter().all(|d| *d >= 6.0 - 1e-9), "{side:?}");
        }
    }

    #[test]
    fn bold_frame_adds_four_shared_inserts() {
        let frame = assemble_frame(bold()).unwrap();
        assert_eq!(frame.pieces().len(), 12);
        assert_eq!(frame.structural_pieces().count(), 8);

        let inset = 0.25 * 400.8;
        let bl = frame.piece(PieceRole::CornerInsert(Corner::BottomLeft)).unwrap();
        assert_eq!(
            bl.placement.translation,
            Vec3::new(-(300.4 - inset), -(200.4 - inset), -4.0)
        );

        let tr = frame.piece(PieceRole::CornerInsert(Corner::TopRight)).unwrap();
        assert_eq!(tr.placement.rotation_z, std::f64::consts::PI);
        assert!(Arc::ptr_eq(&bl.mesh, &tr.mesh));
        assert_eq!(tr.orientation, None);
    }

    #[test]
    fn unknown_style_builds_a_minimal_frame() {
        let input = crate::frame::RawFrameInput {
            style: Some("neon".to_string()),
            ..Default::default()
        };
        let frame = assemble_frame(input.to_parameters()).unwrap();
        assert_eq!(frame.parameters().style, FrameStyle::Minimal);
        assert_eq!(frame.pieces().len(), 8);
    }

    #[test]
    fn tiny_sections_still_build_a_frame() {
        let params = FrameParameters {
            face_width: 3e-5,
            profile_depth: 3e-5,
            ..FrameParameters::default()
        };
        let frame = assemble_frame(params).unwrap();
        assert_eq!(frame.parameters().face_width, crate::frame::DEFAULT_FACE_WIDTH);
        assert!(frame.structural_pieces().all(|p| p.diagnostics.is_valid_solid()));
    }

    #[test]
    fn smallest_accepted_section_builds_in_every_style() {
        for style in FrameStyle::ALL {
            let params = FrameParameters {
                face_width: crate::frame::MIN_SECTION,
                profile_depth: crate::frame::MIN_SECTION,
                style,
                ..FrameParameters::default()
            };
            let frame = assemble_frame(params).unwrap();
            assert_eq!(frame.parameters().face_width, crate::frame::MIN_SECTION);
            for piece in frame.pieces() {
                assert!(piece.diagnostics.is_valid_solid(), "{style} {}", piece.role);
            }
        }
    }

    #[test]
    fn very_long_wood_frame_has_bounded_geometry() {
        let params = FrameParameters {
            width: 1e12,
            style: FrameStyle::Wood,
            ..FrameParameters::default()
        };
        let frame = assemble_frame(params).unwrap();
        assert_eq!(frame.parameters().width, crate::frame::MAX_DIMENSION);
        assert!(frame.vertex_count() < 200_000, "{}", frame.vertex_count());
        assert!(frame.bounding_box().is_some_and(|b| b.size().x.is_finite()));
    }

    #[test]
    fn assembling_twice_gives_identical_frames() {
        for style in FrameStyle::ALL {
            let params = FrameParameters {
                style,
                width: 120.0,
                height: 90.0,
                ..FrameParameters::default()
            };
            let a = assemble_frame(params).unwrap();
            let b = assemble_frame(params).unwrap();

            assert_eq!(a.pieces().len(), b.pieces().len());
            assert_eq!(a.vertex_count(), b.vertex_count());
            for (pa, pb) in a.pieces().iter().zip(b.pieces()) {
                assert_eq!(pa.role, pb.role);
                assert_eq!(pa.mesh.positions, pb.mesh.positions);
            }
        }
    }

    #[test]
    fn bounding_box_and_camera_fit() {
        let frame = assemble_frame(FrameParameters::default()).unwrap();
        let bbox = frame.bounding_box().unwrap();
        assert!(bbox.size().x > 600.0 && bbox.size().y > 400.0);
        assert!(bbox.contains_point(Point3::ORIGIN));

        let fit = frame.camera_fit(50.0).unwrap();
        assert!(fit.distance > bbox.size().x / 2.0);

        let unit = BBox::new(Point3::new(-1.0, -1.0, -1.0), Point3::new(1.0, 1.0, 1.0));
        let fit = CameraFit::from_bbox(unit, 90.0);
        assert!((fit.distance - 1.35).abs() < 1e-9);
        assert_eq!(fit.target, [0.0, 0.0, 0.0]);
        assert_eq!(CameraFit::from_bbox(unit, f64::NAN), CameraFit::from_bbox(unit, 45.0));
    }
}
