//! # Polyline Simplification
//!
//! Douglas-Peucker reduction of closed contours.

use glam::DVec2;

/// Length of the closed ring through `points`.
pub fn perimeter(points: &[DVec2]) -> f64 {
    let n = points.len();
    if n < 2 {
        return 0.0;
    }
    (0..n)
        .map(|i| points[i].distance(points[(i + 1) % n]))
        .sum()
}

/// Distance from `p` to the segment `a`-`b`.
fn segment_distance(p: DVec2, a: DVec2, b: DVec2) -> f64 {
    let ab = b - a;
    let len_sq = ab.length_squared();
    if len_sq == 0.0 {
        return p.distance(a);
    }
    let t = ((p - a).dot(ab) / len_sq).clamp(0.0, 1.0);
    p.distance(a + ab * t)
}

/// Marks the points of `points[first..=last]` an open Douglas-Peucker pass
/// keeps. Endpoints must already be marked.
fn mark_open(points: &[DVec2], first: usize, last: usize, epsilon: f64, keep: &mut [bool]) {
    let mut stack = vec![(first, last)];

    while let Some((start, end)) = stack.pop() {
        if end <= start + 1 {
            continue;
        }

        let (a, b) = (points[start], points[end]);
        let (index, distance) = (start + 1..end)
            .map(|i| (i, segment_distance(points[i], a, b)))
            .fold((start, -1.0), |best, cur| if cur.1 > best.1 { cur } else { best });

        if distance > epsilon {
            keep[index] = true;
            stack.push((start, index));
            stack.push((index, end));
        }
    }
}

/// Simplifies a closed ring with tolerance `epsilon`.
///
/// The ring is split at its first point and the point farthest from it;
/// each half is reduced independently so the result stays closed. Rings of
/// three points or fewer are returned as is.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use silhouette::simplify::simplify_closed;
///
/// // A square with a redundant midpoint on every side
/// let ring: Vec<DVec2> = [(0, 0), (5, 0), (10, 0), (10, 5), (10, 10), (5, 10), (0, 10), (0, 5)]
///     .iter()
///     .map(|&(x, y)| DVec2::new(x as f64, y as f64))
///     .collect();
/// assert_eq!(simplify_closed(&ring, 0.5).len(), 4);
/// ```
pub fn simplify_closed(points: &[DVec2], epsilon: f64) -> Vec<DVec2> {
    let n = points.len();
    if n <= 3 || epsilon <= 0.0 {
        return points.to_vec();
    }

    let origin = points[0];
    let far = (1..n)
        .max_by(|&i, &j| {
            origin
                .distance_squared(points[i])
                .total_cmp(&origin.distance_squared(points[j]))
        })
        .unwrap_or(n / 2);

    // Walk the ring as an open chain 0..=n where index n is point 0 again
    let chain: Vec<DVec2> = points.iter().copied().chain(std::iter::once(origin)).collect();
    let mut keep = vec![false; n + 1];
    keep[0] = true;
    keep[far] = true;
    keep[n] = true;
    mark_open(&chain, 0, far, epsilon, &mut keep);
    mark_open(&chain, far, n, epsilon, &mut keep);

    (0..n).filter(|&i| keep[i]).map(|i| points[i]).collect()
}
