//! # Normalizer
//!
//! Recenters and rescales a reconstructed mesh to a canonical size.

use log::debug;

use crate::mesh::Mesh;

/// Centers `mesh` on the origin and scales it uniformly so its largest
/// bounding-box edge equals `target_max_dimension`.
///
/// Vertex normals are recomputed. A mesh with no triangles or a degenerate
/// bounding box (largest edge ≤ 0) is returned unmodified.
pub fn normalize(mut mesh: Mesh, target_max_dimension: f64) -> Mesh {
    let (min, max) = mesh.bounding_box();
    let max_edge = (max - min).max_element();
    if mesh.is_empty() || !(max_edge > 0.0) {
        debug!("normalize: degenerate bounds, mesh left as is");
        return mesh;
    }

    mesh.recenter();
    let factor = target_max_dimension / max_edge;
    mesh.scale(factor);
    mesh.recenter();
    mesh.compute_normals();

    debug!("normalize: max edge {max_edge} scaled by {factor}");
    mesh
}
