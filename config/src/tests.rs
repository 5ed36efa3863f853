//! # Tests for Config Constants
//!
//! Unit tests verifying the correctness of configuration constants
//! and helper functions.

use crate::constants::*;

// =============================================================================
// PRECISION TESTS
// =============================================================================

#[test]
fn test_epsilon_is_positive() {
    assert!(EPSILON > 0.0, "EPSILON must be positive");
}

#[test]
fn test_epsilon_is_small() {
    assert!(EPSILON < 1e-6, "EPSILON should be small for precision");
}

#[test]
fn test_vertex_merge_epsilon_larger_than_epsilon() {
    assert!(
        VERTEX_MERGE_EPSILON >= EPSILON,
        "VERTEX_MERGE_EPSILON should be >= EPSILON"
    );
}

#[test]
fn test_plane_epsilon_larger_than_merge_epsilon() {
    assert!(PLANE_EPSILON > VERTEX_MERGE_EPSILON);
}

// =============================================================================
// RASTER TESTS
// =============================================================================

#[test]
fn test_alpha_cutoff_below_opaque_threshold() {
    assert!(ALPHA_CUTOFF < ALPHA_OPAQUE_THRESHOLD);
}

#[test]
fn test_default_blur_is_applied() {
    assert!(DEFAULT_BLUR_KERNEL_SIZE >= MIN_BLUR_KERNEL_SIZE);
    assert_eq!(DEFAULT_BLUR_KERNEL_SIZE % 2, 1, "kernel sizes are odd");
}

#[test]
fn test_kernel_limits_cover_defaults() {
    assert!(DEFAULT_BLUR_KERNEL_SIZE <= MAX_KERNEL_SIZE);
    assert!(DEFAULT_MORPHOLOGY_KERNEL_SIZE <= MAX_KERNEL_SIZE);
    assert!(DEFAULT_MORPHOLOGY_ITERATIONS <= MAX_MORPHOLOGY_ITERATIONS);
}

#[test]
fn test_kernel_size_to_sigma_grows() {
    assert!(kernel_size_to_sigma(7) > kernel_size_to_sigma(5));
    assert!(kernel_size_to_sigma(3) > 0.0);
}

// =============================================================================
// CONTOUR TESTS
// =============================================================================

#[test]
fn test_default_min_area_ratio() {
    assert_eq!(DEFAULT_MIN_AREA_RATIO, 0.0005);
}

#[test]
fn test_default_epsilon_ratio_in_typical_range() {
    assert!((0.001..=0.05).contains(&DEFAULT_EPSILON_RATIO));
    assert!(DEFAULT_EPSILON_RATIO < MAX_EPSILON_RATIO);
}

#[test]
fn test_min_shape_area() {
    assert_eq!(MIN_SHAPE_AREA, 1e-4);
    assert_eq!(MIN_POLYGON_VERTICES, 3);
}

// =============================================================================
// SOLID TESTS
// =============================================================================

#[test]
fn test_extrusion_depth_floor() {
    assert_eq!(extrusion_depth(0.0), MIN_EXTRUSION_DEPTH);
    assert_eq!(extrusion_depth(-5.0), MIN_EXTRUSION_DEPTH);
    assert_eq!(extrusion_depth(119.0), MIN_EXTRUSION_DEPTH);
}

#[test]
fn test_extrusion_depth_scales() {
    for d in [120.5, 250.0, 333.3, 1024.0] {
        let depth = extrusion_depth(d);
        assert!(depth >= EXTRUSION_DEPTH_FACTOR * d);
        assert_eq!(depth, depth.ceil());
    }
}

#[test]
fn test_default_target_dimension() {
    assert_eq!(DEFAULT_TARGET_MAX_DIMENSION, 120.0);
}

// =============================================================================
// HELPER TESTS
// =============================================================================

#[test]
fn test_approx_equal() {
    assert!(approx_equal(1.0, 1.0));
    assert!(approx_equal(1.0, 1.0 + EPSILON / 2.0));
    assert!(!approx_equal(1.0, 1.0 + EPSILON * 2.0));
}
