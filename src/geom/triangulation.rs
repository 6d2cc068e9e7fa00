use super::Tolerance;

/// Ear-clip a simple polygon given as an open ring of 2D points.
///
/// Returns triangles as indices into `ring`, wound counter-clockwise
/// regardless of the ring's own orientation. Collinear vertices are kept in the
/// output index space but never become triangle corners of zero area.
pub fn triangulate_polygon(ring: &[[f64; 2]], tol: Tolerance) -> Result<Vec<[u32; 3]>, String> {
    if ring.len() < 3 {
        return Err("polygon has fewer than 3 vertices".to_string());
    }
    if ring.iter().any(|p| !p[0].is_finite() || !p[1].is_finite()) {
        return Err("polygon has non-finite vertices".to_string());
    }

    let area = signed_area(ring);
    if !area.is_finite() || area.abs() <= tol.eps {
        return Err("polygon degenerates (zero area)".to_string());
    }
    let is_ccw = area > 0.0;

    let mut remaining: Vec<usize> = (0..ring.len()).collect();
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));
    let mut cursor = 0usize;
    let mut misses = 0usize;

    while remaining.len() > 3 {
        let n = remaining.len();
        let prev = remaining[(cursor + n - 1) % n];
        let ear = remaining[cursor % n];
        let next = remaining[(cursor + 1) % n];

        if is_ear(ring, &remaining, prev, ear, next, is_ccw, tol) {
            triangles.push(ccw_triangle(prev, ear, next, is_ccw));
            remaining.remove(cursor % n);
            cursor %= remaining.len();
            misses = 0;
            continue;
        }

        cursor = (cursor + 1) % n;
        misses += 1;
        if misses > n {
            return Err("failed to triangulate polygon (no ears found)".to_string());
        }
    }

    let (a, b, c) = (remaining[0], remaining[1], remaining[2]);
    if orient2d(ring[a], ring[b], ring[c]).abs() > tol.eps {
        triangles.push(ccw_triangle(a, b, c, is_ccw));
    }

    Ok(triangles)
}

/// Signed shoelace area; positive for counter-clockwise rings.
#[must_use]
pub fn signed_area(ring: &[[f64; 2]]) -> f64 {
    if ring.len() < 3 {
        return 0.0;
    }
    let mut area = 0.0;
    for i in 0..ring.len() {
        let a = ring[i];
        let b = ring[(i + 1) % ring.len()];
        area += a[0] * b[1] - b[0] * a[1];
    }
    0.5 * area
}

fn ccw_triangle(a: usize, b: usize, c: usize, is_ccw: bool) -> [u32; 3] {
    if is_ccw {
        [a as u32, b as u32, c as u32]
    } else {
        [a as u32, c as u32, b as u32]
    }
}

fn is_ear(
    ring: &[[f64; 2]],
    remaining: &[usize],
    prev: usize,
    ear: usize,
    next: usize,
    is_ccw: bool,
    tol: Tolerance,
) -> bool {
    let a = ring[prev];
    let b = ring[ear];
    let c = ring[next];

    let cross = orient2d(a, b, c);
    if is_ccw {
        if cross <= tol.eps {
            return false;
        }
    } else if cross >= -tol.eps {
        return false;
    }

    !remaining
        .iter()
        .copied()
        .filter(|&i| i != prev && i != ear && i != next)
        .any(|i| point_in_triangle(a, b, c, ring[i], is_ccw, tol))
}

fn orient2d(a: [f64; 2], b: [f64; 2], c: [f64; 2]) -> f64 {
    (b[0] - a[0]) * (c[1] - a[1]) - (b[1] - a[1]) * (c[0] - a[0])
}

fn point_in_triangle(a: [f64; 2], b: [f64; 2], c: [f64; 2], p: [f64; 2], is_ccw: bool, tol: Tolerance) -> bool {
    let ab = orient2d(a, b, p);
    let bc = orient2d(b, c, p);
    let ca = orient2d(c, a, p);

    if is_ccw {
        ab >= -tol.eps && bc >= -tol.eps && ca >= -tol.eps
    } else {
        ab <= tol.eps && bc <= tol.eps && ca <= tol.eps
    }
}
