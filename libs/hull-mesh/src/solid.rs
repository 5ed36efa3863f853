//! # Solid Builder
//!
//! Turns the planar regions of one view into a prism aligned with that
//! view's world axis, and intersects the three view solids.
//!
//! ## Frame
//!
//! Every view is extruded along local +Z, recentered on its bounding box
//! and then rotated by an exact axis permutation:
//!
//! | View  | local x | local y | extrusion |
//! |-------|---------|---------|-----------|
//! | Front | +X      | +Y      | +Z        |
//! | Top   | +X      | -Z      | +Y        |
//! | Side  | -Z      | +Y      | +X        |

use std::fmt;

use glam::{DMat3, DMat4, DVec3};
use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::MeshError;
use crate::mesh::Mesh;
use crate::ops::boolean::{intersection, union};
use crate::ops::extrude::{linear_extrude, LinearExtrudeParams, Polygon2D};

// =============================================================================
// VIEW
// =============================================================================

/// One of the three orthographic silhouette views.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum View {
    /// Looking along -Z; extrusion along world Z.
    Front,
    /// Looking down along -Y; extrusion along world Y.
    Top,
    /// Looking along -X; extrusion along world X.
    Side,
}

impl View {
    /// All views in pipeline order.
    pub const ALL: [View; 3] = [View::Front, View::Top, View::Side];

    /// Lowercase view name.
    pub fn name(self) -> &'static str {
        match self {
            View::Front => "front",
            View::Top => "top",
            View::Side => "side",
        }
    }

    /// Rotation taking the local extrusion frame to world space.
    ///
    /// Columns are the world images of local x, y and z.
    pub fn rotation(self) -> DMat3 {
        match self {
            View::Front => DMat3::IDENTITY,
            // -90° about X: image up is world -Z, seen from +Y
            View::Top => DMat3::from_cols(DVec3::X, DVec3::NEG_Z, DVec3::Y),
            // +90° about Y: image right is world -Z, seen from +X
            View::Side => DMat3::from_cols(DVec3::NEG_Z, DVec3::Y, DVec3::X),
        }
    }

    /// World axis the silhouette is extruded along.
    pub fn extrusion_axis(self) -> DVec3 {
        self.rotation().z_axis
    }
}

impl fmt::Display for View {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// =============================================================================
// SOLIDS
// =============================================================================

/// The three aligned view solids sharing one extrusion depth.
#[derive(Debug, Clone)]
pub struct SolidSet {
    pub front: Mesh,
    pub top: Mesh,
    pub side: Mesh,
    /// Extrusion depth used for every view
    pub depth: f64,
}

impl SolidSet {
    /// Returns the solid built for `view`.
    pub fn get(&self, view: View) -> &Mesh {
        match view {
            View::Front => &self.front,
            View::Top => &self.top,
            View::Side => &self.side,
        }
    }
}

/// Shared extrusion depth for a set of regions.
///
/// Uses the largest bounding-box edge over every region, so each prism is
/// long enough to pass through the other two.
pub fn extrusion_depth(shapes: &[&Polygon2D]) -> f64 {
    let max_dimension = shapes
        .iter()
        .map(|shape| shape.max_dimension())
        .fold(0.0, f64::max);
    config::constants::extrusion_depth(max_dimension)
}

/// Builds the world-space solid for one view.
///
/// Every part is extruded to `depth`; several parts are unioned into one
/// solid. The result is centered on its bounding box, rotated into the
/// view's frame and carries fresh vertex normals.
///
/// # Errors
///
/// - `MissingInput` if `parts` is empty
/// - `DegenerateGeometry` if a part cannot be extruded
/// - `BooleanFailed` if unioning parts fails
pub fn build_solid(view: View, parts: &[Polygon2D], depth: f64) -> Result<Mesh, MeshError> {
    let params = LinearExtrudeParams {
        height: depth,
        center: false,
    };

    let mut prisms = parts.iter().map(|part| linear_extrude(part, &params));
    let first = prisms
        .next()
        .ok_or_else(|| MeshError::MissingInput { views: vec![view] })??;
    let mut solid = prisms.try_fold(first, |acc, prism| union(&acc, &prism?))?;

    solid.recenter();
    solid.transform(&DMat4::from_mat3(view.rotation()));
    solid.compute_normals();

    debug!(
        "{view} solid: {} parts, depth {depth}, {} vertices, {} triangles",
        parts.len(),
        solid.vertex_count(),
        solid.triangle_count()
    );

    Ok(solid)
}

/// Builds all three view solids with one shared depth.
///
/// # Errors
///
/// Returns `MissingInput` naming every view that is absent or has no parts,
/// before any geometry is constructed.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use hull_mesh::{build_solids, MeshError, Polygon2D, View};
///
/// let square = vec![Polygon2D::square(DVec2::splat(10.0), true)];
/// let err = build_solids(Some(&square), None, Some(&[])).unwrap_err();
/// assert!(matches!(err, MeshError::MissingInput { views } if views == [View::Top, View::Side]));
/// ```
pub fn build_solids(
    front: Option<&[Polygon2D]>,
    top: Option<&[Polygon2D]>,
    side: Option<&[Polygon2D]>,
) -> Result<SolidSet, MeshError> {
    let inputs = [front, top, side];

    let missing: Vec<View> = View::ALL
        .into_iter()
        .zip(inputs)
        .filter(|(_, parts)| parts.map_or(true, <[Polygon2D]>::is_empty))
        .map(|(view, _)| view)
        .collect();
    if !missing.is_empty() {
        return Err(MeshError::MissingInput { views: missing });
    }

    let [front, top, side] = inputs.map(Option::unwrap_or_default);

    let all: Vec<&Polygon2D> = front.iter().chain(top).chain(side).collect();
    let depth = extrusion_depth(&all);
    debug!("extrusion depth {depth} for {} regions", all.len());

    Ok(SolidSet {
        front: build_solid(View::Front, front, depth)?,
        top: build_solid(View::Top, top, depth)?,
        side: build_solid(View::Side, side, depth)?,
        depth,
    })
}

/// Intersects the view solids in the fixed order `(front ∩ top) ∩ side`.
///
/// Solids that do not overlap yield an empty mesh.
///
/// # Errors
///
/// `BooleanFailed` tagged with the failing step, or a size limit error.
pub fn intersect_solids(solids: &SolidSet) -> Result<Mesh, MeshError> {
    let front_top = intersection(&solids.front, &solids.top)
        .map_err(|err| retag(err, "front ∩ top"))?;
    debug!("front ∩ top: {} triangles", front_top.triangle_count());

    let result = intersection(&front_top, &solids.side).map_err(|err| retag(err, "∩ side"))?;
    debug!("∩ side: {} triangles", result.triangle_count());

    if !result.vertices().iter().all(|v| v.is_finite()) {
        return Err(MeshError::boolean_failed(
            "∩ side",
            "non-finite vertex in result",
        ));
    }

    Ok(result)
}

/// Builds the three view solids and intersects them.
pub fn intersect_views(
    front: Option<&[Polygon2D]>,
    top: Option<&[Polygon2D]>,
    side: Option<&[Polygon2D]>,
) -> Result<Mesh, MeshError> {
    intersect_solids(&build_solids(front, top, side)?)
}

fn retag(err: MeshError, step: &str) -> MeshError {
    match err {
        MeshError::BooleanFailed { message, .. } => MeshError::boolean_failed(step, message),
        other => other,
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use config::constants::MIN_EXTRUSION_DEPTH;
    use glam::DVec2;

    fn rect(w: f64, h: f64) -> Vec<Polygon2D> {
        vec![Polygon2D::square(DVec2::new(w, h), true)]
    }

    fn assert_vec_eq(a: DVec3, b: DVec3) {
        assert!((a - b).length() < 1e-9, "{a} != {b}");
    }

    #[test]
    fn test_view_rotations_are_proper() {
        for view in View::ALL {
            assert_relative_eq!(view.rotation().determinant(), 1.0);
        }
    }

    #[test]
    fn test_view_extrusion_axes() {
        assert_eq!(View::Front.extrusion_axis(), DVec3::Z);
        assert_eq!(View::Top.extrusion_axis(), DVec3::Y);
        assert_eq!(View::Side.extrusion_axis(), DVec3::X);
    }

    #[test]
    fn test_view_display() {
        assert_eq!(View::Top.to_string(), "top");
        assert_eq!(format!("{}", View::Side), "side");
    }

    #[test]
    fn test_extrusion_depth_uses_largest_edge() {
        let small = Polygon2D::square(DVec2::splat(10.0), true);
        let large = Polygon2D::square(DVec2::new(50.0, 200.0), true);
        assert_eq!(extrusion_depth(&[&small]), MIN_EXTRUSION_DEPTH);
        assert_eq!(extrusion_depth(&[&small, &large]), 500.0);
        assert_eq!(extrusion_depth(&[]), MIN_EXTRUSION_DEPTH);
    }

    #[test]
    fn test_build_solid_front_alignment() {
        let solid = build_solid(View::Front, &rect(10.0, 20.0), 300.0).unwrap();
        let (min, max) = solid.bounding_box();
        assert_vec_eq(min, DVec3::new(-5.0, -10.0, -150.0));
        assert_vec_eq(max, DVec3::new(5.0, 10.0, 150.0));
        assert!(solid.normals().is_some());
    }

    #[test]
    fn test_build_solid_top_alignment() {
        let solid = build_solid(View::Top, &rect(10.0, 20.0), 300.0).unwrap();
        let (min, max) = solid.bounding_box();
        assert_vec_eq(min, DVec3::new(-5.0, -150.0, -10.0));
        assert_vec_eq(max, DVec3::new(5.0, 150.0, 10.0));
    }

    /// T shape: a 20×10 bar on top of a 4×10 stem, centered on its bounds.
    fn tee() -> Vec<Polygon2D> {
        vec![Polygon2D::new(
            [
                (-2.0, -10.0),
                (2.0, -10.0),
                (2.0, 0.0),
                (10.0, 0.0),
                (10.0, 10.0),
                (-10.0, 10.0),
                (-10.0, 0.0),
                (-2.0, 0.0),
            ]
            .iter()
            .map(|&(x, y)| DVec2::new(x, y))
            .collect(),
        )]
    }

    #[test]
    fn test_top_view_image_up_points_away() {
        // The bar fills the upper half of the top image and must land on -Z
        let solid = build_solid(View::Top, &tee(), 300.0).unwrap();
        let bar: Vec<DVec3> = solid
            .vertices()
            .iter()
            .copied()
            .filter(|v| v.x.abs() > 5.0)
            .collect();

        assert!(!bar.is_empty());
        assert!(bar.iter().all(|v| v.z <= 1e-9 && v.z >= -10.0 - 1e-9));
    }

    #[test]
    fn test_side_view_image_right_points_away() {
        // The same bar turned to the right half of the side image lands on -Z
        let mut parts = tee();
        for v in &mut parts[0].outer {
            *v = DVec2::new(v.y, -v.x);
        }
        let solid = build_solid(View::Side, &parts, 300.0).unwrap();
        let bar: Vec<DVec3> = solid
            .vertices()
            .iter()
            .copied()
            .filter(|v| v.y.abs() > 5.0)
            .collect();

        assert!(!bar.is_empty());
        assert!(bar.iter().all(|v| v.z <= 1e-9 && v.z >= -10.0 - 1e-9));
    }

    #[test]
    fn test_build_solid_side_alignment() {
        let solid = build_solid(View::Side, &rect(10.0, 20.0), 300.0).unwrap();
        let (min, max) = solid.bounding_box();
        assert_vec_eq(min, DVec3::new(-150.0, -10.0, -5.0));
        assert_vec_eq(max, DVec3::new(150.0, 10.0, 5.0));
    }

    #[test]
    fn test_build_solid_keeps_outward_faces() {
        for view in View::ALL {
            let solid = build_solid(view, &rect(10.0, 20.0), 300.0).unwrap();
            assert_relative_eq!(solid.signed_volume(), 60_000.0, epsilon = 1e-6);
        }
    }

    #[test]
    fn test_build_solid_unions_parts() {
        let right = Polygon2D::new(vec![
            DVec2::new(25.0, -5.0),
            DVec2::new(35.0, -5.0),
            DVec2::new(35.0, 5.0),
            DVec2::new(25.0, 5.0),
        ]);
        let parts = vec![Polygon2D::square(DVec2::splat(10.0), true), right];

        let solid = build_solid(View::Front, &parts, 300.0).unwrap();

        assert_relative_eq!(solid.signed_volume(), 2.0 * 100.0 * 300.0, epsilon = 1e-6);
        let (min, max) = solid.bounding_box();
        assert_relative_eq!(max.x - min.x, 40.0, epsilon = 1e-9);
    }

    #[test]
    fn test_build_solid_empty_parts() {
        let err = build_solid(View::Side, &[], 300.0).unwrap_err();
        assert!(matches!(err, MeshError::MissingInput { views } if views == [View::Side]));
    }

    #[test]
    fn test_build_solids_reports_every_missing_view() {
        let err = build_solids(None, None, None).unwrap_err();
        assert!(matches!(err, MeshError::MissingInput { ref views } if views.len() == 3));
        assert_eq!(
            err.to_string(),
            "Missing input: no shape for front, top, side"
        );
    }

    #[test]
    fn test_build_solids_shared_depth() {
        let small = rect(10.0, 10.0);
        let large = rect(400.0, 100.0);
        let solids = build_solids(Some(&small), Some(&large), Some(&small)).unwrap();

        assert_eq!(solids.depth, 1000.0);
        let (min, max) = solids.get(View::Front).bounding_box();
        assert_relative_eq!(max.z - min.z, 1000.0, epsilon = 1e-9);
    }

    #[test]
    fn test_intersect_views_unit_cube() {
        let square = rect(100.0, 100.0);
        let mesh = intersect_views(Some(&square), Some(&square), Some(&square)).unwrap();

        let (min, max) = mesh.bounding_box();
        assert_vec_eq(min, DVec3::splat(-50.0));
        assert_vec_eq(max, DVec3::splat(50.0));
        assert_relative_eq!(mesh.signed_volume(), 1.0e6, epsilon = 1e-3);
    }

    #[test]
    fn test_intersect_views_box() {
        // Front sees 40 x 20 (x, y); top sees 40 x 10 (x, z); side sees 10 x 20 (z, y)
        let front = rect(40.0, 20.0);
        let top = rect(40.0, 10.0);
        let side = rect(10.0, 20.0);
        let mesh = intersect_views(Some(&front), Some(&top), Some(&side)).unwrap();

        let (min, max) = mesh.bounding_box();
        assert_vec_eq(max - min, DVec3::new(40.0, 20.0, 10.0));
        assert_relative_eq!(mesh.signed_volume(), 8000.0, epsilon = 1e-3);
    }
}
