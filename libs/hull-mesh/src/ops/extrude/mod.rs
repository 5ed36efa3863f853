//! # Extrusion Operations
//!
//! Turns a planar region (outer boundary plus holes) into a closed prism:
//! - **linear_extrude**: Extrude along the Z axis
//! - **triangulate**: Ear-clipping cap triangulation with hole bridging

mod linear;
mod triangulate;


pub use linear::{linear_extrude, LinearExtrudeParams};
pub use triangulate::triangulate_polygon;

use glam::DVec2;

/// A 2D polygon for extrusion operations.
///
/// Represents a closed planar region with optional holes. Rings are open
/// (the last point is not a repeat of the first).
#[derive(Debug, Clone, PartialEq)]
pub struct Polygon2D {
    /// Outer boundary vertices in counter-clockwise order
    pub outer: Vec<DVec2>,
    /// Optional holes (each in clockwise order)
    pub holes: Vec<Vec<DVec2>>,
}

impl Polygon2D {
    /// Creates a new polygon from outer boundary vertices.
    ///
    /// # Example
    ///
    /// ```rust,ignore
    /// let square = Polygon2D::new(vec![
    ///     DVec2::new(0.0, 0.0),
    ///     DVec2::new(1.0, 0.0),
    ///     DVec2::new(1.0, 1.0),
    ///     DVec2::new(0.0, 1.0),
    /// ]);
    /// ```
    pub fn new(outer: Vec<DVec2>) -> Self {
        Self {
            outer,
            holes: Vec::new(),
        }
    }

    /// Creates a polygon with holes.
    ///
    /// # Arguments
    ///
    /// * `outer` - Outer boundary in counter-clockwise order
    /// * `holes` - Inner holes, each in clockwise order
    pub fn with_holes(outer: Vec<DVec2>, holes: Vec<Vec<DVec2>>) -> Self {
        Self { outer, holes }
    }

    /// Creates an axis-aligned rectangle.
    ///
    /// # Arguments
    ///
    /// * `size` - Width and height
    /// * `center` - If true, center at origin
    pub fn square(size: DVec2, center: bool) -> Self {
        let min = if center { -size / 2.0 } else { DVec2::ZERO };

        Self::new(vec![
            min,
            DVec2::new(min.x + size.x, min.y),
            min + size,
            DVec2::new(min.x, min.y + size.y),
        ])
    }

    /// Returns the number of vertices in the outer boundary.
    pub fn vertex_count(&self) -> usize {
        self.outer.len()
    }

    /// Iterates over the outer ring followed by every hole.
    pub fn rings(&self) -> impl Iterator<Item = &[DVec2]> {
        std::iter::once(self.outer.as_slice()).chain(self.holes.iter().map(Vec::as_slice))
    }

    /// Axis-aligned bounds of the outer ring as (min, max).
    ///
    /// Holes lie inside the outer ring and never widen the bounds.
    pub fn bounding_box(&self) -> (DVec2, DVec2) {
        let Some((first, rest)) = self.outer.split_first() else {
            return (DVec2::ZERO, DVec2::ZERO);
        };

        rest.iter()
            .fold((*first, *first), |(min, max), v| (min.min(*v), max.max(*v)))
    }

    /// Largest extent of the bounding box along x or y.
    pub fn max_dimension(&self) -> f64 {
        let (min, max) = self.bounding_box();
        (max - min).max_element()
    }

    /// Net enclosed area: outer area minus hole areas.
    pub fn area(&self) -> f64 {
        let holes: f64 = self.holes.iter().map(|h| signed_area(h).abs()).sum();
        signed_area(&self.outer).abs() - holes
    }

    /// Forces the outer ring counter-clockwise and every hole clockwise.
    pub fn normalize_winding(&mut self) {
        if signed_area(&self.outer) < 0.0 {
            self.outer.reverse();
        }
        for hole in &mut self.holes {
            if signed_area(hole) > 0.0 {
                hole.reverse();
            }
        }
    }
}

/// Shoelace signed area of a closed ring.
///
/// Positive for counter-clockwise rings in a y-up frame.
pub fn signed_area(ring: &[DVec2]) -> f64 {
    let n = ring.len();
    if n < 3 {
        return 0.0;
    }

    (0..n)
        .map(|i| ring[i].perp_dot(ring[(i + 1) % n]))
        .sum::<f64>()
        / 2.0
}
