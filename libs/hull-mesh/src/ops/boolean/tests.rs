//! # Boolean Operation Tests
//!
//! Tests for CSG union and intersection.

use super::*;
use crate::ops::extrude::{linear_extrude, LinearExtrudeParams, Polygon2D};
use approx::assert_relative_eq;
use glam::DVec2;
use std::collections::HashMap;

/// Creates an axis-aligned cube centered at `pos`.
fn cube_at(pos: DVec3, size: f64) -> Mesh {
    let params = LinearExtrudeParams {
        height: size,
        center: true,
    };
    let mut mesh = linear_extrude(&Polygon2D::square(DVec2::splat(size), true), &params).unwrap();
    mesh.translate(pos);
    mesh
}

/// Number of undirected edges not shared by exactly two triangles.
fn open_edges(mesh: &Mesh) -> usize {
    let mut uses: HashMap<(u32, u32), usize> = HashMap::new();
    for tri in mesh.triangles() {
        for k in 0..3 {
            let (a, b) = (tri[k], tri[(k + 1) % 3]);
            *uses.entry((a.min(b), a.max(b))).or_default() += 1;
        }
    }
    uses.values().filter(|&&n| n != 2).count()
}

// =============================================================================
// UNION TESTS
// =============================================================================

#[test]
fn test_union_empty_a() {
    let a = Mesh::new();
    let b = cube_at(DVec3::ZERO, 1.0);

    let result = union(&a, &b).unwrap();

    // Result should be B
    assert_eq!(result, b);
}

#[test]
fn test_union_non_overlapping() {
    let a = cube_at(DVec3::new(-5.0, 0.0, 0.0), 1.0);
    let b = cube_at(DVec3::new(5.0, 0.0, 0.0), 1.0);

    let result = union(&a, &b).unwrap();

    assert!(result.triangle_count() >= 24);
    assert_relative_eq!(result.signed_volume(), 2.0, epsilon = 1e-9);
}

#[test]
fn test_union_overlapping_volume() {
    let a = cube_at(DVec3::ZERO, 2.0);
    let b = cube_at(DVec3::new(1.0, 0.0, 0.0), 2.0);

    let result = union(&a, &b).unwrap();

    // 8 + 8 - 4 overlap
    assert_relative_eq!(result.signed_volume(), 12.0, epsilon = 1e-6);
    let (min, max) = result.bounding_box();
    assert_relative_eq!(min.x, -1.0, epsilon = 1e-9);
    assert_relative_eq!(max.x, 2.0, epsilon = 1e-9);
}

// =============================================================================
// INTERSECTION TESTS
// =============================================================================

#[test]
fn test_intersection_empty_input() {
    let a = cube_at(DVec3::ZERO, 1.0);
    assert!(intersection(&a, &Mesh::new()).unwrap().is_empty());
    assert!(intersection(&Mesh::new(), &a).unwrap().is_empty());
}

#[test]
fn test_intersection_non_overlapping_is_empty() {
    let a = cube_at(DVec3::new(-5.0, 0.0, 0.0), 1.0);
    let b = cube_at(DVec3::new(5.0, 0.0, 0.0), 1.0);

    let result = intersection(&a, &b).unwrap();

    assert!(result.is_empty());
}

#[test]
fn test_intersection_overlapping_volume() {
    let a = cube_at(DVec3::ZERO, 2.0);
    let b = cube_at(DVec3::new(1.0, 0.0, 0.0), 2.0);

    let result = intersection(&a, &b).unwrap();

    assert_relative_eq!(result.signed_volume(), 4.0, epsilon = 1e-6);
    let (min, max) = result.bounding_box();
    assert!((min - DVec3::new(0.0, -1.0, -1.0)).length() < 1e-9);
    assert!((max - DVec3::ONE).length() < 1e-9);
    assert!(result.validate());
}

#[test]
fn test_intersection_contained() {
    let outer = cube_at(DVec3::ZERO, 4.0);
    let inner = cube_at(DVec3::new(0.5, 0.0, 0.0), 1.0);

    let result = intersection(&outer, &inner).unwrap();

    assert_relative_eq!(result.signed_volume(), 1.0, epsilon = 1e-6);
}

#[test]
fn test_intersection_is_deterministic() {
    let a = cube_at(DVec3::ZERO, 2.0);
    let b = cube_at(DVec3::new(0.7, 0.3, -0.2), 2.0);

    assert_eq!(intersection(&a, &b).unwrap(), intersection(&a, &b).unwrap());
}

#[test]
fn test_weld_merges_shared_corners() {
    let outer = cube_at(DVec3::ZERO, 4.0);
    let inner = cube_at(DVec3::ZERO, 1.0);
    let result = intersection(&outer, &inner).unwrap();

    // A closed cube needs exactly 8 corners once welded
    assert_eq!(result.vertex_count(), 8);
}

// =============================================================================
// WATERTIGHTNESS TESTS
// =============================================================================

#[test]
fn test_intersection_of_offset_cubes_is_closed() {
    let a = cube_at(DVec3::ZERO, 2.0);
    let b = cube_at(DVec3::new(0.7, 0.3, -0.2), 2.0);

    let result = intersection(&a, &b).unwrap();

    assert_eq!(open_edges(&result), 0);
    assert!(result.validate());
    assert_relative_eq!(result.signed_volume(), 1.3 * 1.7 * 1.8, epsilon = 1e-6);
}

#[test]
fn test_union_of_overlapping_cubes_is_closed() {
    let a = cube_at(DVec3::ZERO, 2.0);
    let b = cube_at(DVec3::new(1.0, 0.5, 0.25), 2.0);

    let result = union(&a, &b).unwrap();

    assert_eq!(open_edges(&result), 0);
    assert!(result.validate());
}

#[test]
fn test_split_edges_inserts_vertex_on_edge() {
    let mut mesh = Mesh::new();
    let a = mesh.add_vertex(DVec3::ZERO);
    let b = mesh.add_vertex(DVec3::new(2.0, 0.0, 0.0));
    let c = mesh.add_vertex(DVec3::new(0.0, 2.0, 0.0));
    let mid = mesh.add_vertex(DVec3::new(1.0, 0.0, 0.0));
    mesh.add_vertex(DVec3::new(1.0, 0.5, 0.0));

    let index = EdgeIndex::new(&mesh);
    assert_eq!(index.split_edges(&mesh, &[a, b, c]), vec![a, mid, b, c]);
    assert!(index.on_segment(&mesh, a, c).is_empty());
}

fn planar_ring(mesh: &mut Mesh, points: &[(f64, f64)]) -> Vec<u32> {
    points
        .iter()
        .map(|&(x, y)| mesh.add_vertex(DVec3::new(x, y, 0.0)))
        .collect()
}

#[test]
fn test_triangulate_ring_fans_from_clean_apex() {
    let mut mesh = Mesh::new();
    // One split point per side: a midpoint apex avoids slivers
    let ring = planar_ring(
        &mut mesh,
        &[(0.0, 0.0), (1.0, 0.0), (2.0, 0.0), (1.5, 1.0), (1.0, 2.0), (0.5, 1.0)],
    );

    triangulate_ring(&mut mesh, &ring);

    assert!(mesh.validate());
    assert_eq!(mesh.vertex_count(), 6);
    assert_eq!(mesh.triangle_count(), 4);
    assert_eq!(open_edges(&mesh), 6);
}

#[test]
fn test_triangulate_ring_falls_back_to_centroid() {
    let mut mesh = Mesh::new();
    // Two split points per side leave no sliver-free apex
    let ring = planar_ring(
        &mut mesh,
        &[
            (0.0, 0.0),
            (1.0, 0.0),
            (2.0, 0.0),
            (3.0, 0.0),
            (2.0, 1.0),
            (1.0, 2.0),
            (0.0, 3.0),
            (0.0, 2.0),
            (0.0, 1.0),
        ],
    );

    triangulate_ring(&mut mesh, &ring);

    assert!(mesh.validate());
    assert_eq!(mesh.vertex_count(), 10);
    assert_eq!(mesh.triangle_count(), 9);
    assert_eq!(mesh.vertex(9), DVec3::new(1.0, 1.0, 0.0));
}
