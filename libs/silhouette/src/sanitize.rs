//! # Shape Sanitization
//!
//! Last gate between traced contours and the extruder. Rings are cleaned of
//! non-finite and repeated vertices, rejected when too small, and wound
//! consistently: outer rings counter-clockwise, holes clockwise.

use glam::DVec2;
use log::debug;

use config::constants::{approx_equal, MIN_POLYGON_VERTICES, MIN_SHAPE_AREA};

use crate::contour::Region;
use crate::error::SilhouetteError;

/// Signed area of a closed ring (shoelace); positive when counter-clockwise.
pub fn signed_area(points: &[DVec2]) -> f64 {
    let n = points.len();
    if n < 3 {
        return 0.0;
    }
    let twice: f64 = (0..n)
        .map(|i| points[i].perp_dot(points[(i + 1) % n]))
        .sum();
    twice * 0.5
}

fn same_point(a: DVec2, b: DVec2) -> bool {
    approx_equal(a.x, b.x) && approx_equal(a.y, b.y)
}

/// Cleans one ring and winds it counter-clockwise (`ccw`) or clockwise.
///
/// Non-finite vertices are dropped before the other checks.
///
/// # Errors
///
/// `InvalidPolygon` when fewer than three distinct finite vertices remain
/// or the ring encloses less than the minimum area.
pub fn sanitize_ring(points: &[DVec2], ccw: bool) -> Result<Vec<DVec2>, SilhouetteError> {
    let mut ring: Vec<DVec2> = Vec::with_capacity(points.len());
    for p in points.iter().copied().filter(|p| p.is_finite()) {
        if ring.last().map_or(true, |&last| !same_point(last, p)) {
            ring.push(p);
        }
    }
    while ring.len() > 1 && same_point(ring[0], ring[ring.len() - 1]) {
        ring.pop();
    }

    if ring.len() < MIN_POLYGON_VERTICES {
        return Err(SilhouetteError::invalid_polygon(format!(
            "ring has {} distinct vertices",
            ring.len()
        )));
    }

    let area = signed_area(&ring);
    if area.abs() < MIN_SHAPE_AREA {
        return Err(SilhouetteError::invalid_polygon(format!(
            "ring area {area:e} below minimum"
        )));
    }

    if (area > 0.0) != ccw {
        ring.reverse();
    }
    Ok(ring)
}

/// A validated planar shape: one outer ring and zero or more holes.
///
/// Coordinates are in the centered, y-up frame of the source image.
#[derive(Debug, Clone, PartialEq)]
pub struct Shape {
    outer: Vec<DVec2>,
    holes: Vec<Vec<DVec2>>,
}

impl Shape {
    /// Sanitizes `outer` and `holes` into a shape.
    ///
    /// Holes that fail sanitization are dropped rather than failing the
    /// whole shape.
    ///
    /// # Errors
    ///
    /// `InvalidPolygon` if the outer ring is rejected.
    pub fn new(outer: &[DVec2], holes: &[Vec<DVec2>]) -> Result<Self, SilhouetteError> {
        let outer = sanitize_ring(outer, true)?;
        let holes = holes
            .iter()
            .enumerate()
            .filter_map(|(i, hole)| match sanitize_ring(hole, false) {
                Ok(ring) => Some(ring),
                Err(err) => {
                    debug!("dropping hole {i}: {err}");
                    None
                }
            })
            .collect();
        Ok(Self { outer, holes })
    }

    /// Sanitizes a traced region.
    pub fn from_region(region: &Region) -> Result<Self, SilhouetteError> {
        Self::new(&region.outer, &region.holes)
    }

    /// Outer ring, counter-clockwise.
    pub fn outer(&self) -> &[DVec2] {
        &self.outer
    }

    /// Hole rings, clockwise.
    pub fn holes(&self) -> &[Vec<DVec2>] {
        &self.holes
    }

    /// Enclosed area, outer minus holes.
    pub fn area(&self) -> f64 {
        signed_area(&self.outer) + self.holes.iter().map(|h| signed_area(h)).sum::<f64>()
    }

    /// Axis-aligned bounds of the outer ring as `(min, max)`.
    pub fn bounding_box(&self) -> (DVec2, DVec2) {
        self.outer.iter().fold(
            (DVec2::splat(f64::INFINITY), DVec2::splat(f64::NEG_INFINITY)),
            |(min, max), &p| (min.min(p), max.max(p)),
        )
    }

    /// Longest bounding box edge.
    pub fn max_dimension(&self) -> f64 {
        let (min, max) = self.bounding_box();
        (max - min).max_element()
    }

    /// Total vertex count across all rings.
    pub fn vertex_count(&self) -> usize {
        self.outer.len() + self.holes.iter().map(Vec::len).sum::<usize>()
    }

    /// Consumes the shape, returning `(outer, holes)`.
    pub fn into_rings(self) -> (Vec<DVec2>, Vec<Vec<DVec2>>) {
        (self.outer, self.holes)
    }
}

/// Sanitizes every region, keeping their order.
///
/// Regions whose outer ring is rejected are skipped.
///
/// # Errors
///
/// `InvalidPolygon` if no region survives.
pub fn sanitize_regions(regions: &[Region]) -> Result<Vec<Shape>, SilhouetteError> {
    let mut last_error = None;
    let shapes: Vec<Shape> = regions
        .iter()
        .filter_map(|region| match Shape::from_region(region) {
            Ok(shape) => Some(shape),
            Err(err) => {
                debug!("rejecting region of area {:.1}: {err}", region.area);
                last_error = Some(err);
                None
            }
        })
        .collect();

    match (shapes.is_empty(), last_error) {
        (true, Some(err)) => Err(err),
        (true, None) => Err(SilhouetteError::invalid_polygon("no region to sanitize")),
        (false, _) => Ok(shapes),
    }
}
