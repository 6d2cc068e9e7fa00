use std::f64::consts::FRAC_PI_2;

use super::diagnostics::GeomMeshDiagnostics;
use super::mesh::{GeomMesh, finalize_mesh};
use super::triangulation::{signed_area, triangulate_polygon};
use super::{Point3, Tolerance};

/// Rounded edge treatment at both ends of an extrusion.
///
/// The bevel is cut inward: the outer envelope of the body is unchanged and
/// the end faces shrink by `size` over `thickness` along the axis.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BevelOptions {
    pub size: f64,
    pub thickness: f64,
    pub segments: usize,
}

impl BevelOptions {
    #[must_use]
    pub const fn new(size: f64, thickness: f64, segments: usize) -> Self {
        Self {
            size,
            thickness,
            segments,
        }
    }

    fn is_active(self) -> bool {
        self.size > 0.0 && self.thickness > 0.0 && self.segments > 0
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ExtrusionError {
    #[error("profile points must be finite")]
    NonFinitePoint,
    #[error("extrusion inputs must be finite")]
    NonFiniteInput,
    #[error("profile requires at least {min} unique points")]
    NotEnoughPoints { min: usize },
    #[error("profile is degenerate (zero area)")]
    ProfileDegenerate,
    #[error("extrusion requires at least two stations")]
    NotEnoughStations,
    #[error("extrusion stations must be strictly increasing")]
    StationsNotIncreasing,
    #[error("bevel of {size} does not fit the profile")]
    BevelTooLarge { size: f64 },
    #[error("failed to intersect offset edges")]
    OffsetIntersectionFailed,
    #[error("failed to triangulate cap: {0}")]
    CapTriangulation(String),
}

/// Sweep a closed 2D ring along +Z through `stations`, capping both ends.
///
/// The profile lives in the XY plane; every station gets one ring of profile
/// vertices. With a bevel, quarter-round inset rings are added beyond the
/// first and last station, so the solid spans
/// `[first - thickness, last + thickness]`.
pub fn extrude_profile(
    profile: &[[f64; 2]],
    stations: &[f64],
    bevel: Option<BevelOptions>,
    tol: Tolerance,
) -> Result<(GeomMesh, GeomMeshDiagnostics), ExtrusionError> {
    let ring = clean_ring(profile, tol)?;
    validate_stations(stations)?;

    let bevel = bevel.filter(|b| b.is_active());
    if let Some(b) = bevel {
        if !b.size.is_finite() || !b.thickness.is_finite() {
            return Err(ExtrusionError::NonFiniteInput);
        }
    }

    let mut rings: Vec<(f64, Vec<[f64; 2]>)> = Vec::new();

    if let Some(b) = bevel {
        let first = stations[0];
        for k in 0..b.segments {
            let theta = FRAC_PI_2 * k as f64 / b.segments as f64;
            let inset = b.size * (1.0 - theta.sin());
            let z = first - b.thickness * theta.cos();
            rings.push((z, bevel_ring(&ring, inset)?));
        }
    }

    rings.extend(stations.iter().map(|&z| (z, ring.clone())));

    if let Some(b) = bevel {
        let last = stations[stations.len() - 1];
        for k in (0..b.segments).rev() {
            let theta = FRAC_PI_2 * k as f64 / b.segments as f64;
            let inset = b.size * (1.0 - theta.sin());
            let z = last + b.thickness * theta.cos();
            rings.push((z, bevel_ring(&ring, inset)?));
        }
    }

    let n = ring.len();
    let mut vertices: Vec<Point3> = Vec::with_capacity(rings.len() * n);
    for (z, points) in &rings {
        vertices.extend(points.iter().map(|p| Point3::new(p[0], p[1], *z)));
    }

    let mut indices: Vec<u32> = Vec::with_capacity((rings.len() - 1) * n * 6);
    for r in 0..rings.len() - 1 {
        for i in 0..n {
            let i0 = (r * n + i) as u32;
            let i1 = (r * n + (i + 1) % n) as u32;
            let j0 = ((r + 1) * n + i) as u32;
            let j1 = ((r + 1) * n + (i + 1) % n) as u32;

            indices.extend_from_slice(&[i0, i1, j1]);
            indices.extend_from_slice(&[i0, j1, j0]);
        }
    }

    let start_cap = triangulate_polygon(&rings[0].1, tol).map_err(ExtrusionError::CapTriangulation)?;
    for tri in &start_cap {
        indices.extend_from_slice(&[tri[0], tri[2], tri[1]]);
    }

    let last_ring = rings.len() - 1;
    let end_cap =
        triangulate_polygon(&rings[last_ring].1, tol).map_err(ExtrusionError::CapTriangulation)?;
    let offset = (last_ring * n) as u32;
    for tri in &end_cap {
        indices.extend_from_slice(&[offset + tri[0], offset + tri[1], offset + tri[2]]);
    }

    Ok(finalize_mesh(vertices, indices, tol))
}

/// Offset a counter-clockwise ring inward by `distance`, intersecting the
/// shifted edge lines at every vertex.
pub fn offset_polygon_inward(ring: &[[f64; 2]], distance: f64) -> Result<Vec<[f64; 2]>, ExtrusionError> {
    if !distance.is_finite() {
        return Err(ExtrusionError::NonFiniteInput);
    }

    let n = ring.len();
    if n < 3 {
        return Err(ExtrusionError::NotEnoughPoints { min: 3 });
    }

    let mut line_a = Vec::with_capacity(n);
    let mut line_b = Vec::with_capacity(n);
    let mut line_c = Vec::with_capacity(n);

    for i in 0..n {
        let p0 = ring[i];
        let p1 = ring[(i + 1) % n];
        let dx = p1[0] - p0[0];
        let dy = p1[1] - p0[1];
        let len = (dx * dx + dy * dy).sqrt();
        if !len.is_finite() || len <= 0.0 {
            return Err(ExtrusionError::ProfileDegenerate);
        }

        // Left normal of a CCW edge points into the polygon.
        let nx = -dy / len;
        let ny = dx / len;
        line_a.push(nx);
        line_b.push(ny);
        line_c.push(nx * p0[0] + ny * p0[1] + distance);
    }

    let mut out = Vec::with_capacity(n);
    for i in 0..n {
        let prev = (i + n - 1) % n;
        let (a1, b1, c1) = (line_a[prev], line_b[prev], line_c[prev]);
        let (a2, b2, c2) = (line_a[i], line_b[i], line_c[i]);

        let det = a1 * b2 - a2 * b1;
        if !det.is_finite() || det.abs() < 1e-12 {
            return Err(ExtrusionError::OffsetIntersectionFailed);
        }

        let x = (c1 * b2 - c2 * b1) / det;
        let y = (a1 * c2 - a2 * c1) / det;
        if !x.is_finite() || !y.is_finite() {
            return Err(ExtrusionError::OffsetIntersectionFailed);
        }
        out.push([x, y]);
    }

    Ok(out)
}

/// Shortest edge of a closed ring.
#[must_use]
pub fn shortest_edge(ring: &[[f64; 2]]) -> f64 {
    (0..ring.len())
        .map(|i| {
            let a = ring[i];
            let b = ring[(i + 1) % ring.len()];
            (b[0] - a[0]).hypot(b[1] - a[1])
        })
        .fold(f64::INFINITY, f64::min)
}

fn bevel_ring(ring: &[[f64; 2]], inset: f64) -> Result<Vec<[f64; 2]>, ExtrusionError> {
    if inset <= 0.0 {
        return Ok(ring.to_vec());
    }

    let shrunk = offset_polygon_inward(ring, inset)?;
    let n = ring.len();
    for i in 0..n {
        let (a, b) = (ring[i], ring[(i + 1) % n]);
        let (c, d) = (shrunk[i], shrunk[(i + 1) % n]);
        // An edge that flips direction means the inset swallowed it.
        let dot = (b[0] - a[0]) * (d[0] - c[0]) + (b[1] - a[1]) * (d[1] - c[1]);
        if dot <= 0.0 {
            return Err(ExtrusionError::BevelTooLarge { size: inset });
        }
    }
    if signed_area(&shrunk) <= 0.0 {
        return Err(ExtrusionError::BevelTooLarge { size: inset });
    }
    Ok(shrunk)
}

fn clean_ring(points: &[[f64; 2]], tol: Tolerance) -> Result<Vec<[f64; 2]>, ExtrusionError> {
    if points.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
        return Err(ExtrusionError::NonFinitePoint);
    }

    let same = |a: [f64; 2], b: [f64; 2]| (a[0] - b[0]).abs() <= tol.eps && (a[1] - b[1]).abs() <= tol.eps;

    let mut cleaned: Vec<[f64; 2]> = Vec::with_capacity(points.len());
    for p in points.iter().copied() {
        if cleaned.last().copied().is_some_and(|prev| same(prev, p)) {
            continue;
        }
        cleaned.push(p);
    }
    if cleaned.len() > 2 {
        if let (Some(first), Some(last)) = (cleaned.first().copied(), cleaned.last().copied()) {
            if same(first, last) {
                cleaned.pop();
            }
        }
    }

    if cleaned.len() < 3 {
        return Err(ExtrusionError::NotEnoughPoints { min: 3 });
    }

    let area = signed_area(&cleaned);
    if !area.is_finite() || area.abs() <= tol.eps {
        return Err(ExtrusionError::ProfileDegenerate);
    }
    if area < 0.0 {
        cleaned.reverse();
    }

    Ok(cleaned)
}

fn validate_stations(stations: &[f64]) -> Result<(), ExtrusionError> {
    if stations.len() < 2 {
        return Err(ExtrusionError::NotEnoughStations);
    }
    if stations.iter().any(|z| !z.is_finite()) {
        return Err(ExtrusionError::NonFiniteInput);
    }
    if stations.windows(2).any(|w| w[1] <= w[0]) {
        return Err(ExtrusionError::StationsNotIncreasing);
    }
    Ok(())
}
