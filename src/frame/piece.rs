//! Longitudinal pieces: extrude a section, recenter it, taper its ends,
//! apply the style surface and turn it into its run direction.

use std::f64::consts::{FRAC_PI_2, PI};
use std::fmt;
use std::sync::Arc;

use super::FrameError;
use super::profile::Profile2D;
use super::style::{BevelPolicy, FrameStyle};
use crate::geom::{
    BBox, BevelOptions, EndTaperOptions, ExtrusionError, GeomMesh, GeomMeshDiagnostics, Tolerance,
    Transform, Vec3, WoodgrainOptions, apply_end_taper, apply_woodgrain, extrude_profile,
    shortest_edge,
};

/// Segments per taper span.
const TAPER_SEGMENTS: usize = 8;
/// Stations closer than this are merged.
const STATION_EPS: f64 = 1e-6;
/// Upper bound on body subdivisions; longer pieces get a wider spacing.
const MAX_BODY_STATIONS: usize = 1024;

/// Run direction of a rail within the frame plane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Orientation {
    /// Runs along X.
    Horizontal,
    /// Runs along Y.
    Vertical,
}

impl Orientation {
    /// Maps the extrusion frame (u across the face, v into the depth, length
    /// along Z) onto the frame plane. Depth always ends up on Z.
    #[must_use]
    pub fn transform(self) -> Transform {
        match self {
            // (u, v, l) -> (l, u, v)
            Self::Horizontal => Transform::rotate_y(FRAC_PI_2) * Transform::rotate_z(FRAC_PI_2),
            // (u, v, l) -> (u, -l, v)
            Self::Vertical => Transform::rotate_x(FRAC_PI_2),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Side {
    Top,
    Bottom,
    Left,
    Right,
}

impl Side {
    pub const ALL: [Side; 4] = [Side::Top, Side::Bottom, Side::Left, Side::Right];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Top => "top",
            Self::Bottom => "bottom",
            Self::Left => "left",
            Self::Right => "right",
        }
    }

    #[must_use]
    pub const fn orientation(self) -> Orientation {
        match self {
            Self::Top | Self::Bottom => Orientation::Horizontal,
            Self::Left | Self::Right => Orientation::Vertical,
        }
    }

    /// Top and right are turned half a turn so their lip faces the opening.
    #[must_use]
    pub const fn rotation_z(self) -> f64 {
        match self {
            Self::Bottom | Self::Left => 0.0,
            Self::Top | Self::Right => PI,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Corner {
    BottomLeft,
    BottomRight,
    TopLeft,
    TopRight,
}

impl Corner {
    pub const ALL: [Corner; 4] = [
        Corner::BottomLeft,
        Corner::BottomRight,
        Corner::TopLeft,
        Corner::TopRight,
    ];

    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::BottomLeft => "bottom_left",
            Self::BottomRight => "bottom_right",
            Self::TopLeft => "top_left",
            Self::TopRight => "top_right",
        }
    }

    /// Signs of the corner position along X and Y.
    #[must_use]
    pub const fn signs(self) -> (f64, f64) {
        match self {
            Self::BottomLeft => (-1.0, -1.0),
            Self::BottomRight => (1.0, -1.0),
            Self::TopLeft => (-1.0, 1.0),
            Self::TopRight => (1.0, 1.0),
        }
    }

    #[must_use]
    pub const fn rotation_z(self) -> f64 {
        match self {
            Self::BottomLeft => 0.0,
            Self::BottomRight => FRAC_PI_2,
            Self::TopLeft => -FRAC_PI_2,
            Self::TopRight => PI,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PieceRole {
    Rail(Side),
    LipOverlay(Side),
    CornerInsert(Corner),
}

impl PieceRole {
    /// Structural pieces are the ones that get printed.
    #[must_use]
    pub const fn is_structural(self) -> bool {
        !matches!(self, Self::LipOverlay(_))
    }

    /// STL file name for structural pieces.
    #[must_use]
    pub fn export_name(self) -> Option<String> {
        match self {
            Self::Rail(side) => Some(format!("{}.stl", side.name())),
            Self::CornerInsert(corner) => Some(format!("corner_{}.stl", corner.name())),
            Self::LipOverlay(_) => None,
        }
    }
}

impl fmt::Display for PieceRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Rail(side) => write!(f, "{} rail", side.name()),
            Self::LipOverlay(side) => write!(f, "{} lip", side.name()),
            Self::CornerInsert(corner) => write!(f, "{} corner insert", corner.name()),
        }
    }
}

/// Position of a piece in the frame: a turn about Z, then a translation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub translation: Vec3,
    pub rotation_z: f64,
}

impl Placement {
    #[must_use]
    pub const fn new(translation: Vec3, rotation_z: f64) -> Self {
        Self {
            translation,
            rotation_z,
        }
    }

    #[must_use]
    pub fn transform(&self) -> Transform {
        Transform::translate(self.translation) * Transform::rotate_z(self.rotation_z)
    }
}

/// One part of an assembled frame. The mesh sits at its local origin; the
/// placement puts it into the frame.
#[derive(Debug, Clone)]
pub struct Piece {
    pub role: PieceRole,
    /// `None` for corner inserts, which have no run direction.
    pub orientation: Option<Orientation>,
    pub length: f64,
    pub mesh: Arc<GeomMesh>,
    pub placement: Placement,
    pub diagnostics: GeomMeshDiagnostics,
}

impl Piece {
    /// The mesh moved into frame coordinates.
    #[must_use]
    pub fn placed_mesh(&self) -> GeomMesh {
        self.mesh.transformed(self.placement.transform())
    }

    #[must_use]
    pub fn placed_bbox(&self) -> Option<BBox> {
        let transform = self.placement.transform();
        self.mesh
            .positions
            .iter()
            .map(|p| transform.apply_point((*p).into()))
            .fold(None, |acc: Option<BBox>, p| {
                Some(acc.map_or(BBox::new(p, p), |bbox| bbox.expand_point(p)))
            })
    }
}

/// End taper sizing for a rail section.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TaperSpec {
    pub span: f64,
    pub amplitude: f64,
}

impl TaperSpec {
    #[must_use]
    pub fn for_section(face_width: f64, profile_depth: f64) -> Self {
        Self {
            span: 1.1 * face_width.max(profile_depth),
            amplitude: face_width + 0.8 * profile_depth,
        }
    }
}

/// Axial stations in `[end_inset, length - end_inset]`.
///
/// Each end gets [`TAPER_SEGMENTS`] rings over the taper span, measured from
/// the true ends at 0 and `length`. With `body_spacing` the rest of the body
/// is subdivided so no gap exceeds it, up to [`MAX_BODY_STATIONS`] gaps.
#[must_use]
pub fn piece_stations(
    length: f64,
    taper_span: f64,
    end_inset: f64,
    body_spacing: Option<f64>,
) -> Vec<f64> {
    let start = end_inset.max(0.0);
    let end = length - start;
    if !end.is_finite() || end - start <= STATION_EPS {
        return vec![0.0, length];
    }

    let mut inner = Vec::new();
    if taper_span.is_finite() && taper_span > 0.0 {
        for i in 1..=TAPER_SEGMENTS {
            let d = taper_span * i as f64 / TAPER_SEGMENTS as f64;
            inner.push(d);
            inner.push(length - d);
        }
    }
    if let Some(spacing) = body_spacing.filter(|s| s.is_finite() && *s > 0.0) {
        let count = ((end - start) / spacing)
            .ceil()
            .min(MAX_BODY_STATIONS as f64) as usize;
        for k in 1..count {
            inner.push(start + (end - start) * k as f64 / count as f64);
        }
    }

    inner.retain(|z| *z > start + STATION_EPS && *z < end - STATION_EPS);
    inner.sort_by(f64::total_cmp);

    let mut stations = Vec::with_capacity(inner.len() + 2);
    stations.push(start);
    for z in inner {
        if stations.last().is_some_and(|last| z - last > STATION_EPS) {
            stations.push(z);
        }
    }
    stations.push(end);
    stations
}

/// Build one longitudinal piece at its local origin, already turned into its
/// run direction.
///
/// # Errors
/// Returns [`FrameError`] when a kernel stage rejects its input.
pub fn extrude_piece(
    profile: &Profile2D,
    length: f64,
    orientation: Orientation,
    style: FrameStyle,
    taper: TaperSpec,
) -> Result<(GeomMesh, GeomMeshDiagnostics), FrameError> {
    let policy = style.policy();
    let tol = Tolerance::default_geom();

    let bevel = policy
        .bevel
        .and_then(|bevel| resolve_bevel(bevel, profile, length));
    let (mesh, diagnostics) = match extrude_along(profile, length, taper, bevel, policy.body_spacing, tol) {
        Err(ExtrusionError::BevelTooLarge { size }) => {
            log::warn!("bevel of {size} does not fit the section, extruding without it");
            extrude_along(profile, length, taper, None, policy.body_spacing, tol)?
        }
        other => other?,
    };

    let [au, av] = profile.anchor();
    let centered = mesh.translated(Vec3::new(-au, -av, -length / 2.0));

    let (tapered, taper_diag) = apply_end_taper(
        &centered,
        EndTaperOptions::new(length / 2.0, taper.span, taper.amplitude),
    )?;
    log::debug!(
        "end taper moved {} of {} vertices (max {:.3})",
        taper_diag.displaced_vertex_count,
        taper_diag.vertex_count,
        taper_diag.max_displacement
    );

    let surfaced = if policy.woodgrain {
        apply_woodgrain(&tapered, WoodgrainOptions::default())?.0
    } else {
        tapered
    };

    if !diagnostics.is_valid_solid() {
        log::warn!("piece of length {length} is not a closed solid: {diagnostics}");
    }

    Ok((surfaced.transformed(orientation.transform()), diagnostics))
}

fn extrude_along(
    profile: &Profile2D,
    length: f64,
    taper: TaperSpec,
    bevel: Option<BevelOptions>,
    body_spacing: Option<f64>,
    tol: Tolerance,
) -> Result<(GeomMesh, GeomMeshDiagnostics), ExtrusionError> {
    let inset = bevel.map_or(0.0, |b| b.thickness);
    let stations = piece_stations(length, taper.span, inset, body_spacing);
    extrude_profile(profile.points(), &stations, bevel, tol)
}

fn resolve_bevel(policy: BevelPolicy, profile: &Profile2D, length: f64) -> Option<BevelOptions> {
    let size = policy
        .size
        .min(shortest_edge(profile.points()) * policy.max_edge_ratio);
    let thickness = policy.thickness.min(length * policy.max_length_ratio);
    (size > 0.0 && thickness > 0.0).then(|| BevelOptions::new(size, thickness, policy.segments))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::frame::profile::{build_lip_overlay_profile, build_rail_profile};
    use crate::geom::Point3;

    fn rail() -> Profile2D {
        build_rail_profile(20.0, 14.0, 4.0, 4.0)
    }

    fn taper() -> TaperSpec {
        TaperSpec::for_section(20.0, 14.0)
    }

    #[test]
    fn orientation_keeps_depth_on_z() {
        let h = Orientation::Horizontal.transform();
        assert_eq!(h.apply_point(Point3::new(1.0, 2.0, 3.0)), Point3::new(3.0, 1.0, 2.0));

        let v = Orientation::Vertical.transform();
        assert_eq!(v.apply_point(Point3::new(1.0, 2.0, 3.0)), Point3::new(1.0, -3.0, 2.0));
    }

    #[test]
    fn stations_cover_taper_spans_and_stay_sorted() {
        let spec = taper();
        let stations = piece_stations(200.0, spec.span, 0.0, None);

        assert_eq!(stations.first(), Some(&0.0));
        assert_eq!(stations.last(), Some(&200.0));
        assert_eq!(stations.len(), 2 + 2 * TAPER_SEGMENTS);
        assert!(stations.windows(2).all(|w| w[1] > w[0]));
        assert!(stations.iter().any(|z| (z - spec.span).abs() < 1e-9));
    }

    #[test]
    fn stations_honour_body_spacing_and_inset() {
        let stations = piece_stations(100.0, 22.0, 0.8, Some(6.0));
        assert_eq!(stations.first(), Some(&0.8));
        assert_eq!(stations.last(), Some(&99.2));
        assert!(stations.windows(2).all(|w| w[1] - w[0] <= 6.0 + 1e-9));
    }

    #[test]
    fn body_subdivision_is_bounded_for_long_pieces() {
        let stations = piece_stations(1e8, 22.0, 0.0, Some(6.0));
        assert!(stations.len() <= MAX_BODY_STATIONS + 2 + 2 * TAPER_SEGMENTS);
        assert!(stations.windows(2).all(|w| w[1] > w[0]));
        assert_eq!(stations.last(), Some(&1e8));

        let stations = piece_stations(1e300, 22.0, 0.0, Some(6.0));
        assert!(stations.len() <= MAX_BODY_STATIONS + 2 + 2 * TAPER_SEGMENTS);
        assert!(stations.iter().all(|z| z.is_finite()));
    }

    #[test]
    fn short_pieces_merge_overlapping_spans() {
        let stations = piece_stations(10.0, 22.0, 0.0, None);
        assert_eq!(stations.first(), Some(&0.0));
        assert_eq!(stations.last(), Some(&10.0));
        assert!(stations.windows(2).all(|w| w[1] - w[0] > STATION_EPS));
    }

    #[test]
    fn horizontal_rail_runs_along_x_and_is_closed() {
        let (mesh, diag) =
            extrude_piece(&rail(), 300.0, Orientation::Horizontal, FrameStyle::Minimal, taper())
                .unwrap();

        assert!(diag.is_valid_solid(), "{diag}");
        assert_eq!(mesh.edge_topology(), (0, 0));
        mesh.validate().unwrap();

        let bbox = mesh.bbox().unwrap();
        assert!((bbox.min.x + 150.0).abs() < 1e-9);
        assert!((bbox.max.x - 150.0).abs() < 1e-9);
        // Depth stays on Z, centered on the section anchor before tapering.
        let body: Vec<_> = mesh.positions.iter().filter(|p| p[0].abs() < 100.0).collect();
        assert!(body.iter().all(|p| p[2] >= -7.0 - 1e-9 && p[2] <= 7.0 + 1e-9));
        assert!(body.iter().all(|p| p[1] >= -10.0 - 1e-9 && p[1] <= 10.0 + 1e-9));
    }

    #[test]
    fn vertical_rail_runs_along_y() {
        let (mesh, _) =
            extrude_piece(&rail(), 120.0, Orientation::Vertical, FrameStyle::Minimal, taper())
                .unwrap();
        let bbox = mesh.bbox().unwrap();
        assert!((bbox.min.y + 60.0).abs() < 1e-9);
        assert!((bbox.max.y - 60.0).abs() < 1e-9);
    }

    #[test]
    fn every_style_builds_closed_rails_and_overlays() {
        let lip = build_lip_overlay_profile(20.0, 14.0, 4.0, 4.0);
        for style in FrameStyle::ALL {
            for profile in [rail(), lip.clone()] {
                let (mesh, diag) =
                    extrude_piece(&profile, 250.0, Orientation::Vertical, style, taper()).unwrap();
                assert!(diag.is_valid_solid(), "{style}: {diag}");
                assert_eq!(mesh.edge_topology(), (0, 0));
                assert!(mesh.normals.is_some());
            }
        }
    }

    #[test]
    fn bevel_is_clamped_to_the_section() {
        let bevel = resolve_bevel(
            FrameStyle::Bold.policy().bevel.unwrap(),
            &build_rail_profile(2.0, 1.0, 0.9, 0.35),
            5.0,
        )
        .unwrap();
        assert!(bevel.size <= 0.25 * 0.35 + 1e-12);
        assert!(bevel.thickness <= 0.5 + 1e-12);
    }

    #[test]
    fn rebuilding_is_deterministic() {
        let a = extrude_piece(&rail(), 180.0, Orientation::Horizontal, FrameStyle::Wood, taper())
            .unwrap()
            .0;
        let b = extrude_piece(&rail(), 180.0, Orientation::Horizontal, FrameStyle::Wood, taper())
            .unwrap()
            .0;
        assert_eq!(a, b);
    }

    #[test]
    fn export_names_follow_roles() {
        assert_eq!(PieceRole::Rail(Side::Top).export_name().as_deref(), Some("top.stl"));
        assert_eq!(
            PieceRole::CornerInsert(Corner::BottomRight).export_name().as_deref(),
            Some("corner_bottom_right.stl")
        );
        assert_eq!(PieceRole::LipOverlay(Side::Left).export_name(), None);
        assert!(!PieceRole::LipOverlay(Side::Left).is_structural());
    }
}
