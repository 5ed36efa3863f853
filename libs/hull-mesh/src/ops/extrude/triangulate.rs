//! # Cap Triangulation
//!
//! Ear-clipping triangulation of a planar region with holes.
//!
//! Holes are first merged into the outer ring through bridge edges
//! (Eberly, "Triangulation by Ear Clipping"), then ears are clipped from
//! the resulting weakly simple ring. Orientation tests use exact adaptive
//! predicates from `robust`.
//!
//! Output triangles index the concatenation of the outer ring followed by
//! each hole in order, and are counter-clockwise.

use glam::DVec2;
use robust::{orient2d, Coord};

use crate::error::MeshError;

/// Exact orientation of `c` relative to the directed line `a → b`.
///
/// Positive for a left turn (counter-clockwise), negative for a right turn.
#[inline]
fn orient(a: DVec2, b: DVec2, c: DVec2) -> f64 {
    orient2d(
        Coord { x: a.x, y: a.y },
        Coord { x: b.x, y: b.y },
        Coord { x: c.x, y: c.y },
    )
}

/// Triangulates an outer ring (counter-clockwise) with holes (clockwise).
///
/// # Returns
///
/// Counter-clockwise triangles as indices into `outer ++ holes[0] ++ ...`.
///
/// # Errors
///
/// Returns `MeshError::DegenerateGeometry` if the outer ring has fewer than
/// three points, no positive area, non-finite coordinates, or a hole cannot
/// be bridged to the boundary.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use hull_mesh::ops::extrude::triangulate_polygon;
///
/// let square = [
///     DVec2::new(0.0, 0.0),
///     DVec2::new(1.0, 0.0),
///     DVec2::new(1.0, 1.0),
///     DVec2::new(0.0, 1.0),
/// ];
/// let triangles = triangulate_polygon(&square, &[]).unwrap();
/// assert_eq!(triangles.len(), 2);
/// ```
pub fn triangulate_polygon(
    outer: &[DVec2],
    holes: &[Vec<DVec2>],
) -> Result<Vec<[usize; 3]>, MeshError> {
    if outer.len() < 3 {
        return Err(MeshError::degenerate(
            "Polygon must have at least 3 vertices",
        ));
    }

    let points: Vec<DVec2> = outer
        .iter()
        .chain(holes.iter().flatten())
        .copied()
        .collect();
    if points.iter().any(|p| !p.is_finite()) {
        return Err(MeshError::degenerate("Polygon has non-finite coordinates"));
    }
    if super::signed_area(outer) <= 0.0 {
        return Err(MeshError::degenerate(
            "Outer ring must be counter-clockwise with positive area",
        ));
    }

    let mut ring: Vec<usize> = (0..outer.len()).collect();

    // Global index ranges of the usable holes
    let mut hole_ranges = Vec::with_capacity(holes.len());
    let mut offset = outer.len();
    for hole in holes {
        if hole.len() >= 3 {
            hole_ranges.push(offset..offset + hole.len());
        }
        offset += hole.len();
    }

    // Rightmost holes first so each bridge sees the holes already merged
    let rightmost = |range: &std::ops::Range<usize>| -> usize {
        range
            .clone()
            .max_by(|&a, &b| points[a].x.total_cmp(&points[b].x))
            .unwrap_or(range.start)
    };
    hole_ranges.sort_by(|a, b| points[rightmost(b)].x.total_cmp(&points[rightmost(a)].x));

    for range in hole_ranges {
        let m = rightmost(&range);
        let bridge = find_bridge(&points, &ring, points[m]).ok_or_else(|| {
            MeshError::degenerate("Hole could not be bridged to the outer boundary")
        })?;

        // ring[..=bridge], M .. hole end, hole start ..= M, ring[bridge..]
        let hole: Vec<usize> = range.clone().collect();
        let m_pos = m - range.start;
        let mut spliced = Vec::with_capacity(ring.len() + hole.len() + 2);
        spliced.extend_from_slice(&ring[..=bridge]);
        spliced.extend_from_slice(&hole[m_pos..]);
        spliced.extend_from_slice(&hole[..=m_pos]);
        spliced.extend_from_slice(&ring[bridge..]);
        ring = spliced;
    }

    clip_ears(&points, ring)
}

/// Finds the ring position to connect the hole vertex `m` to.
fn find_bridge(points: &[DVec2], ring: &[usize], m: DVec2) -> Option<usize> {
    let len = ring.len();

    // Nearest edge crossing of the +x ray from `m`
    let mut hit: Option<(f64, usize, usize)> = None;
    for k in 0..len {
        let a = points[ring[k]];
        let b = points[ring[(k + 1) % len]];
        if a.y == b.y || m.y < a.y.min(b.y) || m.y > a.y.max(b.y) {
            continue;
        }

        let x = a.x + (m.y - a.y) * (b.x - a.x) / (b.y - a.y);
        if x < m.x {
            continue;
        }
        if hit.map_or(true, |(best, _, _)| x < best) {
            hit = Some((x, k, (k + 1) % len));
        }
    }

    let (hit_x, ka, kb) = hit?;
    let intersection = DVec2::new(hit_x, m.y);

    // Direct hit on a vertex is visible as is
    for k in [ka, kb] {
        if points[ring[k]] == intersection {
            return Some(k);
        }
    }

    let mut candidate = if points[ring[kb]].x > points[ring[ka]].x {
        kb
    } else {
        ka
    };
    let p = points[ring[candidate]];

    // A ring vertex inside (m, intersection, p) may occlude p; take the one
    // with the smallest angle to the ray.
    let mut best_tan = f64::INFINITY;
    for k in 0..len {
        let r = points[ring[k]];
        if r.x <= m.x || !in_triangle_any_winding(m, intersection, p, r) {
            continue;
        }
        if !locally_inside(points, ring, k, m) {
            continue;
        }

        let tan = (r.y - m.y).abs() / (r.x - m.x);
        let best = points[ring[candidate]];
        if tan < best_tan || (tan == best_tan && r.x > best.x) {
            candidate = k;
            best_tan = tan;
        }
    }

    Some(candidate)
}

/// Returns true if `p` lies inside or on the triangle `(a, b, c)` of either
/// winding.
fn in_triangle_any_winding(a: DVec2, b: DVec2, c: DVec2, p: DVec2) -> bool {
    let d1 = orient(a, b, p);
    let d2 = orient(b, c, p);
    let d3 = orient(c, a, p);
    let has_neg = d1 < 0.0 || d2 < 0.0 || d3 < 0.0;
    let has_pos = d1 > 0.0 || d2 > 0.0 || d3 > 0.0;
    !(has_neg && has_pos)
}

/// Returns true if the diagonal from ring position `k` towards `target`
/// starts inside the polygon's interior angle at that vertex.
fn locally_inside(points: &[DVec2], ring: &[usize], k: usize, target: DVec2) -> bool {
    let len = ring.len();
    let prev = points[ring[(k + len - 1) % len]];
    let a = points[ring[k]];
    let next = points[ring[(k + 1) % len]];

    if orient(prev, a, next) >= 0.0 {
        orient(a, next, target) >= 0.0 && orient(prev, a, target) >= 0.0
    } else {
        orient(a, next, target) > 0.0 || orient(prev, a, target) > 0.0
    }
}

/// Returns true if position `i` of the ring is a clippable ear.
fn is_ear(points: &[DVec2], ring: &[usize], i: usize) -> bool {
    let len = ring.len();
    let ip = (i + len - 1) % len;
    let inx = (i + 1) % len;
    let (a, b, c) = (points[ring[ip]], points[ring[i]], points[ring[inx]]);

    if orient(a, b, c) <= 0.0 {
        return false;
    }

    ring.iter().enumerate().all(|(k, &idx)| {
        if k == ip || k == i || k == inx {
            return true;
        }
        let p = points[idx];
        // Bridge duplicates share coordinates with a corner
        if p == a || p == b || p == c {
            return true;
        }
        !(orient(a, b, p) >= 0.0 && orient(b, c, p) >= 0.0 && orient(c, a, p) >= 0.0)
    })
}

fn clip_ears(points: &[DVec2], mut ring: Vec<usize>) -> Result<Vec<[usize; 3]>, MeshError> {
    let mut triangles = Vec::with_capacity(ring.len().saturating_sub(2));
    let mut cursor = 0;
    let mut stalls = 0;

    while ring.len() > 3 {
        let len = ring.len();

        if stalls >= len {
            // No regular ear in a full pass
            if let Some(k) = find_degenerate(points, &ring) {
                ring.remove(k);
            } else if let Some(k) = find_convex(points, &ring) {
                triangles.push(corner(&ring, k));
                ring.remove(k);
            } else {
                return Err(MeshError::degenerate(
                    "Cap triangulation failed: no clippable vertex",
                ));
            }
            stalls = 0;
            cursor = 0;
            continue;
        }

        let i = cursor % len;
        if is_ear(points, &ring, i) {
            triangles.push(corner(&ring, i));
            ring.remove(i);
            stalls = 0;
            cursor = i.saturating_sub(1);
        } else {
            stalls += 1;
            cursor = i + 1;
        }
    }

    if ring.len() == 3 && orient(points[ring[0]], points[ring[1]], points[ring[2]]) > 0.0 {
        triangles.push([ring[0], ring[1], ring[2]]);
    }

    Ok(triangles)
}

/// Triangle formed by ring position `i` and its neighbors.
fn corner(ring: &[usize], i: usize) -> [usize; 3] {
    let len = ring.len();
    [ring[(i + len - 1) % len], ring[i], ring[(i + 1) % len]]
}

/// First vertex that adds no area: collinear or coincident with a neighbor.
fn find_degenerate(points: &[DVec2], ring: &[usize]) -> Option<usize> {
    let len = ring.len();
    (0..len).find(|&i| {
        let [a, b, c] = corner(ring, i).map(|idx| points[idx]);
        a == b || b == c || orient(a, b, c) == 0.0
    })
}

fn find_convex(points: &[DVec2], ring: &[usize]) -> Option<usize> {
    (0..ring.len()).find(|&i| {
        let [a, b, c] = corner(ring, i).map(|idx| points[idx]);
        orient(a, b, c) > 0.0
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn total_area(points: &[DVec2], triangles: &[[usize; 3]]) -> f64 {
        triangles
            .iter()
            .map(|t| orient(points[t[0]], points[t[1]], points[t[2]]) / 2.0)
            .sum()
    }

    fn square(min: f64, max: f64) -> Vec<DVec2> {
        vec![
            DVec2::new(min, min),
            DVec2::new(max, min),
            DVec2::new(max, max),
            DVec2::new(min, max),
        ]
    }

    fn all_ccw(points: &[DVec2], triangles: &[[usize; 3]]) -> bool {
        triangles
            .iter()
            .all(|t| orient(points[t[0]], points[t[1]], points[t[2]]) > 0.0)
    }

    #[test]
    fn test_triangulate_square() {
        let outer = square(0.0, 1.0);
        let tris = triangulate_polygon(&outer, &[]).unwrap();
        assert_eq!(tris.len(), 2);
        assert_relative_eq!(total_area(&outer, &tris), 1.0);
        assert!(all_ccw(&outer, &tris));
    }

    #[test]
    fn test_triangulate_concave_l_shape() {
        let outer = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 1.0),
            DVec2::new(1.0, 1.0),
            DVec2::new(1.0, 2.0),
            DVec2::new(0.0, 2.0),
        ];
        let tris = triangulate_polygon(&outer, &[]).unwrap();
        assert_eq!(tris.len(), 4);
        assert_relative_eq!(total_area(&outer, &tris), 3.0);
        assert!(all_ccw(&outer, &tris));
    }

    #[test]
    fn test_triangulate_with_hole() {
        let outer = square(0.0, 10.0);
        let mut hole = square(3.0, 7.0);
        hole.reverse();

        let tris = triangulate_polygon(&outer, &[hole.clone()]).unwrap();
        let points: Vec<DVec2> = outer.iter().chain(&hole).copied().collect();

        assert_eq!(tris.len(), 8);
        assert_relative_eq!(total_area(&points, &tris), 84.0, epsilon = 1e-9);
        assert!(all_ccw(&points, &tris));
    }

    #[test]
    fn test_triangulate_with_two_holes() {
        let outer = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(20.0, 0.0),
            DVec2::new(20.0, 10.0),
            DVec2::new(0.0, 10.0),
        ];
        let mut left = vec![
            DVec2::new(2.0, 3.0),
            DVec2::new(6.0, 3.0),
            DVec2::new(6.0, 5.0),
            DVec2::new(2.0, 5.0),
        ];
        left.reverse();
        let mut right: Vec<DVec2> = square(2.0, 6.0)
            .into_iter()
            .map(|p| p + DVec2::new(10.0, 0.0))
            .collect();
        right.reverse();

        let holes = vec![left, right];
        let tris = triangulate_polygon(&outer, &holes).unwrap();
        let points: Vec<DVec2> = outer.iter().chain(holes.iter().flatten()).copied().collect();

        assert_relative_eq!(total_area(&points, &tris), 200.0 - 24.0, epsilon = 1e-9);
        assert!(all_ccw(&points, &tris));
    }

    #[test]
    fn test_triangulate_collinear_point() {
        let outer = vec![
            DVec2::new(0.0, 0.0),
            DVec2::new(1.0, 0.0),
            DVec2::new(2.0, 0.0),
            DVec2::new(2.0, 2.0),
            DVec2::new(0.0, 2.0),
        ];
        let tris = triangulate_polygon(&outer, &[]).unwrap();
        assert_relative_eq!(total_area(&outer, &tris), 4.0);
        assert!(all_ccw(&outer, &tris));
    }

    #[test]
    fn test_triangulate_rejects_clockwise_outer() {
        let mut outer = square(0.0, 1.0);
        outer.reverse();
        assert!(triangulate_polygon(&outer, &[]).is_err());
    }

    #[test]
    fn test_triangulate_rejects_too_few_points() {
        assert!(triangulate_polygon(&[DVec2::ZERO, DVec2::X], &[]).is_err());
    }

    #[test]
    fn test_triangulate_ignores_short_hole() {
        let outer = square(0.0, 4.0);
        let tris = triangulate_polygon(&outer, &[vec![DVec2::ONE, DVec2::splat(2.0)]]).unwrap();
        assert_eq!(tris.len(), 2);
    }
}
