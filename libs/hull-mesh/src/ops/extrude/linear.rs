//! # Linear Extrusion
//!
//! Extrudes a planar region along the Z axis into a closed prism.
//!
//! ## Layout
//!
//! All rings are concatenated (outer first, then holes). With `n` ring
//! points in total, bottom vertices are `0..n` and top vertices `n..2n`.
//! Each ring edge becomes a wall quad and both caps share one ear-clipped
//! triangulation, so holes become through-tunnels.

use super::triangulate::triangulate_polygon;
use super::Polygon2D;
use crate::error::MeshError;
use crate::mesh::Mesh;
use glam::DVec3;

/// Parameters for linear extrusion.
#[derive(Debug, Clone)]
pub struct LinearExtrudeParams {
    /// Extrusion height along Z axis
    pub height: f64,
    /// Center the extrusion around Z=0
    pub center: bool,
}

impl Default for LinearExtrudeParams {
    fn default() -> Self {
        Self {
            height: 1.0,
            center: false,
        }
    }
}

/// Extrudes a 2D polygon along the Z axis.
///
/// Ring winding is normalized first (outer counter-clockwise, holes
/// clockwise), so every face of the result points outward.
///
/// # Arguments
///
/// * `polygon` - The 2D region to extrude
/// * `params` - Extrusion parameters
///
/// # Errors
///
/// Returns `MeshError::DegenerateGeometry` for a non-positive height or a
/// region whose caps cannot be triangulated.
///
/// # Example
///
/// ```rust
/// use glam::DVec2;
/// use hull_mesh::{linear_extrude, LinearExtrudeParams, Polygon2D};
///
/// let square = Polygon2D::square(DVec2::splat(10.0), true);
/// let params = LinearExtrudeParams { height: 20.0, center: false };
/// let mesh = linear_extrude(&square, &params).unwrap();
/// assert_eq!(mesh.triangle_count(), 12);
/// ```
pub fn linear_extrude(polygon: &Polygon2D, params: &LinearExtrudeParams) -> Result<Mesh, MeshError> {
    if !params.height.is_finite() || params.height <= 0.0 {
        return Err(MeshError::degenerate(
            "linear_extrude height must be positive",
        ));
    }

    if polygon.vertex_count() < 3 {
        return Err(MeshError::degenerate(
            "Polygon must have at least 3 vertices",
        ));
    }

    let mut region = polygon.clone();
    region.normalize_winding();
    region.holes.retain(|hole| hole.len() >= 3);

    let cap = triangulate_polygon(&region.outer, &region.holes)?;

    let z_bottom = if params.center { -params.height / 2.0 } else { 0.0 };
    let z_top = z_bottom + params.height;

    let n = region.rings().map(|ring| ring.len()).sum::<usize>();
    let wall_count = 2 * n;
    let mut mesh = Mesh::with_capacity(2 * n, wall_count + 2 * cap.len());

    for z in [z_bottom, z_top] {
        for ring in region.rings() {
            for p in ring {
                mesh.add_vertex(DVec3::new(p.x, p.y, z));
            }
        }
    }

    // Walls: one quad per ring edge
    let top = n as u32;
    let mut start = 0u32;
    for ring in region.rings() {
        let len = ring.len() as u32;
        for i in 0..len {
            let a = start + i;
            let b = start + (i + 1) % len;
            mesh.add_triangle(a, b, top + b);
            mesh.add_triangle(a, top + b, top + a);
        }
        start += len;
    }

    // Bottom cap faces -Z
    for &[i, j, k] in &cap {
        mesh.add_triangle(i as u32, k as u32, j as u32);
    }

    // Top cap faces +Z
    for &[i, j, k] in &cap {
        mesh.add_triangle(top + i as u32, top + j as u32, top + k as u32);
    }

    mesh.check_limits()?;
    Ok(mesh)
}
