//! # Boolean Operations (CSG)
//!
//! Constructive Solid Geometry operations using BSP trees.
//!
//! ## Algorithm
//!
//! Based on the csg.js algorithm by Evan Wallace:
//! - Union: A.clipTo(B); B.clipTo(A); B.invert(); B.clipTo(A); B.invert(); combine
//! - Intersection: A.invert(); B.clipTo(A); B.invert(); A.clipTo(B); B.clipTo(A); combine; result.invert()
//!
//! An intersection of disjoint solids is an empty mesh, not an error.
//! Output edges are split wherever another face's vertex lies on them, so
//! closed inputs give closed results.
//!
//! ## Example
//!
//! ```rust
//! use hull_mesh::ops::boolean::intersection;
//! use hull_mesh::Mesh;
//!
//! let a = Mesh::new();
//! let b = Mesh::new();
//! let result = intersection(&a, &b).unwrap();
//! assert!(result.is_empty());
//! ```

mod bsp;
mod plane;
mod polygon;

use std::collections::HashMap;

use config::constants::{PLANE_EPSILON, VERTEX_MERGE_EPSILON};
use glam::DVec3;
use log::trace;

use crate::error::MeshError;
use crate::Mesh;
use bsp::BspTree;
use polygon::Polygon;

// =============================================================================
// PUBLIC API
// =============================================================================

/// Compute union of two meshes.
///
/// Returns a mesh containing all geometry from both inputs.
///
/// ## Parameters
///
/// - `a`: First mesh
/// - `b`: Second mesh
///
/// ## Returns
///
/// New mesh containing the union, or an error if the result is not finite
/// or exceeds the size limits.
pub fn union(a: &Mesh, b: &Mesh) -> Result<Mesh, MeshError> {
    let polys_a = mesh_to_polygons(a);
    let polys_b = mesh_to_polygons(b);

    if polys_a.is_empty() {
        return Ok(b.clone());
    }
    if polys_b.is_empty() {
        return Ok(a.clone());
    }

    let mut bsp_a = BspTree::new(polys_a);
    let mut bsp_b = BspTree::new(polys_b);

    // Remove parts of each inside the other, then drop B's copy of shared
    // coplanar faces.
    bsp_a.clip_to(&bsp_b);
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();

    let mut result_polys = bsp_a.into_polygons();
    result_polys.extend(bsp_b.into_polygons());

    polygons_to_mesh(&result_polys, "union")
}

/// Compute intersection of two meshes.
///
/// Returns a mesh containing only geometry that is in both inputs. Inputs
/// that do not overlap produce an empty mesh.
///
/// ## Parameters
///
/// - `a`: First mesh
/// - `b`: Second mesh
///
/// ## Returns
///
/// New mesh containing the intersection.
pub fn intersection(a: &Mesh, b: &Mesh) -> Result<Mesh, MeshError> {
    let polys_a = mesh_to_polygons(a);
    let polys_b = mesh_to_polygons(b);

    if polys_a.is_empty() || polys_b.is_empty() {
        return Ok(Mesh::new());
    }

    let mut bsp_a = BspTree::new(polys_a);
    let mut bsp_b = BspTree::new(polys_b);

    // A & B = ~(~A | ~B)
    bsp_a.invert();
    bsp_b.clip_to(&bsp_a);
    bsp_b.invert();
    bsp_a.clip_to(&bsp_b);
    bsp_b.clip_to(&bsp_a);

    let mut result_polys = bsp_a.into_polygons();
    result_polys.extend(bsp_b.into_polygons());
    for poly in &mut result_polys {
        poly.flip();
    }

    polygons_to_mesh(&result_polys, "intersection")
}

// =============================================================================
// CONVERSION HELPERS
// =============================================================================

/// Convert mesh to list of polygons.
///
/// Degenerate triangles have no plane and are skipped.
fn mesh_to_polygons(mesh: &Mesh) -> Vec<Polygon> {
    (0..mesh.triangle_count())
        .filter_map(|i| Polygon::from_vertices(mesh.triangle_positions(i).to_vec()))
        .collect()
}

/// Quantized position used to weld coincident output vertices.
type WeldKey = (i64, i64, i64);

fn weld_key(v: DVec3) -> WeldKey {
    let q = v / VERTEX_MERGE_EPSILON;
    (q.x.round() as i64, q.y.round() as i64, q.z.round() as i64)
}

/// Convert polygons back to an indexed mesh.
///
/// Vertices are welded through a lookup table and every polygon edge is
/// split at welded vertices lying on it, so faces cut by different BSP
/// planes meet edge to edge. Output order follows the polygon order.
fn polygons_to_mesh(polygons: &[Polygon], operation: &str) -> Result<Mesh, MeshError> {
    let mut mesh = Mesh::new();
    let mut lookup: HashMap<WeldKey, u32> = HashMap::new();
    let mut rings: Vec<Vec<u32>> = Vec::with_capacity(polygons.len());

    for poly in polygons {
        let verts = poly.vertices();
        if verts.iter().any(|v| !v.is_finite()) {
            return Err(MeshError::boolean_failed(
                operation,
                "non-finite vertex in result",
            ));
        }

        let mut ring: Vec<u32> = verts
            .iter()
            .map(|&v| {
                *lookup
                    .entry(weld_key(v))
                    .or_insert_with(|| mesh.add_vertex(v))
            })
            .collect();
        ring.dedup();
        while ring.len() > 1 && ring.first() == ring.last() {
            ring.pop();
        }
        if ring.len() >= 3 {
            rings.push(ring);
        }
    }

    let index = EdgeIndex::new(&mesh);
    let mut inserted = 0;
    for ring in &rings {
        let split = index.split_edges(&mesh, ring);
        inserted += split.len() - ring.len();
        triangulate_ring(&mut mesh, &split);
    }

    mesh.check_limits()?;

    trace!(
        "{operation}: {} polygons -> {} vertices, {} triangles ({inserted} T-junctions split)",
        polygons.len(),
        mesh.vertex_count(),
        mesh.triangle_count()
    );

    Ok(mesh)
}

// =============================================================================
// T-JUNCTION REPAIR
// =============================================================================

/// Welded vertices sorted by x, for finding the ones that lie on an edge.
struct EdgeIndex {
    by_x: Vec<(f64, u32)>,
}

impl EdgeIndex {
    fn new(mesh: &Mesh) -> Self {
        let mut by_x: Vec<(f64, u32)> = (0..mesh.vertex_count() as u32)
            .map(|i| (mesh.vertex(i).x, i))
            .collect();
        by_x.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));
        Self { by_x }
    }

    /// Vertices strictly between `a` and `b` within `PLANE_EPSILON` of the
    /// segment, ordered from `a` to `b`.
    fn on_segment(&self, mesh: &Mesh, a: u32, b: u32) -> Vec<u32> {
        let (pa, pb) = (mesh.vertex(a), mesh.vertex(b));
        let length = pa.distance(pb);
        if length <= VERTEX_MERGE_EPSILON {
            return Vec::new();
        }
        let dir = (pb - pa) / length;

        let lo = pa.x.min(pb.x) - PLANE_EPSILON;
        let hi = pa.x.max(pb.x) + PLANE_EPSILON;
        let start = self.by_x.partition_point(|&(x, _)| x < lo);

        let mut hits: Vec<(f64, u32)> = self.by_x[start..]
            .iter()
            .take_while(|&&(x, _)| x <= hi)
            .filter(|&&(_, i)| i != a && i != b)
            .filter_map(|&(_, i)| {
                let offset = mesh.vertex(i) - pa;
                let along = offset.dot(dir);
                let inside = along > VERTEX_MERGE_EPSILON && along < length - VERTEX_MERGE_EPSILON;
                (inside && (offset - dir * along).length() < PLANE_EPSILON).then_some((along, i))
            })
            .collect();
        hits.sort_by(|x, y| x.0.total_cmp(&y.0).then(x.1.cmp(&y.1)));
        hits.into_iter().map(|(_, i)| i).collect()
    }

    /// Returns `ring` with every edge split at the vertices lying on it.
    fn split_edges(&self, mesh: &Mesh, ring: &[u32]) -> Vec<u32> {
        let n = ring.len();
        let mut out = Vec::with_capacity(n);
        for k in 0..n {
            let (a, b) = (ring[k], ring[(k + 1) % n]);
            out.push(a);
            out.extend(self.on_segment(mesh, a, b));
        }
        out
    }
}

fn is_sliver(a: DVec3, b: DVec3, c: DVec3) -> bool {
    (b - a).cross(c - a).length() < VERTEX_MERGE_EPSILON
}

/// Triangulates a convex ring that may hold collinear vertices.
///
/// Fans from the first vertex whose fan has no zero-area triangle. When
/// every vertex sits on a split edge, fans from an added centroid instead.
fn triangulate_ring(mesh: &mut Mesh, ring: &[u32]) {
    let n = ring.len();
    let at = |k: usize| ring[k % n];

    let apex = (0..n).find(|&k| {
        (1..n - 1).all(|j| {
            !is_sliver(
                mesh.vertex(at(k)),
                mesh.vertex(at(k + j)),
                mesh.vertex(at(k + j + 1)),
            )
        })
    });

    if let Some(k) = apex {
        for j in 1..n - 1 {
            mesh.add_triangle(at(k), at(k + j), at(k + j + 1));
        }
        return;
    }

    let centroid = ring.iter().map(|&i| mesh.vertex(i)).sum::<DVec3>() / n as f64;
    let fan: Vec<(u32, u32)> = (0..n)
        .map(|k| (at(k), at(k + 1)))
        .filter(|&(a, b)| !is_sliver(centroid, mesh.vertex(a), mesh.vertex(b)))
        .collect();
    if fan.is_empty() {
        return;
    }

    let c = mesh.add_vertex(centroid);
    for (a, b) in fan {
        mesh.add_triangle(c, a, b);
    }
}

#[cfg(test)]
mod tests;
