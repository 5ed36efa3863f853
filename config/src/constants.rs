//! # Configuration Constants
//!
//! Centralized constants for the reconstruction pipeline. Binarization
//! thresholds, contour filters, extrusion sizing and precision values are
//! defined here.
//!
//! ## Categories
//!
//! - **Precision**: Floating-point comparison tolerances
//! - **Raster**: Binarization and morphology defaults
//! - **Contour**: Noise filtering and simplification defaults
//! - **Solid**: Extrusion depth sizing and output normalization
//! - **Limits**: Maximum values for safety bounds

// =============================================================================
// PRECISION CONSTANTS
// =============================================================================

/// Epsilon for floating-point comparisons.
///
/// Used for determining if two floating-point values are "equal" within
/// numerical tolerance.
///
/// # Example
///
/// ```rust
/// use config::constants::EPSILON;
///
/// fn approximately_equal(a: f64, b: f64) -> bool {
///     (a - b).abs() < EPSILON
/// }
///
/// assert!(approximately_equal(1.0, 1.0 + 1e-11));
/// ```
pub const EPSILON: f64 = 1e-10;

/// Plane thickness used by the BSP boolean evaluator.
///
/// Points closer than this to a splitting plane are treated as lying on it.
/// Larger than [`EPSILON`] because BSP splits accumulate rounding error.
pub const PLANE_EPSILON: f64 = 1e-5;

/// Epsilon for vertex deduplication.
///
/// Boolean output polygons are welded into an indexed mesh; positions closer
/// than this on every axis share one vertex.
///
/// # Example
///
/// ```rust
/// use config::constants::VERTEX_MERGE_EPSILON;
///
/// let key = (0.1234567891_f64 / VERTEX_MERGE_EPSILON).round() as i64;
/// let same = (0.1234567891_f64 + 1e-12) / VERTEX_MERGE_EPSILON;
/// assert_eq!(key, same.round() as i64);
/// ```
pub const VERTEX_MERGE_EPSILON: f64 = 1e-8;

// =============================================================================
// RASTER CONSTANTS
// =============================================================================

/// Alpha value below which a pixel counts as "not opaque".
///
/// If any pixel of an image falls under this value, the image is treated as
/// pre-segmented and its alpha channel alone becomes the mask.
pub const ALPHA_OPAQUE_THRESHOLD: u8 = 250;

/// Alpha cutoff for the alpha-channel mask: `alpha > ALPHA_CUTOFF` is foreground.
pub const ALPHA_CUTOFF: u8 = 127;

/// Default fixed binarization threshold (used when auto thresholding is off).
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_THRESHOLD;
///
/// let luminance = 200u8;
/// assert!(luminance > DEFAULT_THRESHOLD);
/// ```
pub const DEFAULT_THRESHOLD: u8 = 127;

/// Automatic (Otsu) thresholding is on by default.
pub const DEFAULT_AUTO_THRESHOLD: bool = true;

/// Default Gaussian blur kernel size in pixels (blur is skipped below 3).
pub const DEFAULT_BLUR_KERNEL_SIZE: u32 = 5;

/// Smallest kernel size for which Gaussian smoothing is applied.
pub const MIN_BLUR_KERNEL_SIZE: u32 = 3;

/// Default square structuring element size for opening/closing.
pub const DEFAULT_MORPHOLOGY_KERNEL_SIZE: u32 = 3;

/// Default number of erode/dilate repetitions per morphology step.
pub const DEFAULT_MORPHOLOGY_ITERATIONS: u32 = 1;

/// Largest blur or morphology kernel size accepted by parameter validation.
pub const MAX_KERNEL_SIZE: u32 = 99;

/// Largest morphology iteration count accepted by parameter validation.
pub const MAX_MORPHOLOGY_ITERATIONS: u32 = 20;

// =============================================================================
// CONTOUR CONSTANTS
// =============================================================================

/// Default Douglas-Peucker tolerance as a fraction of contour perimeter.
///
/// Typical range is 0.001 (faithful) to 0.05 (aggressive).
pub const DEFAULT_EPSILON_RATIO: f64 = 0.005;

/// Upper bound accepted for the simplification ratio.
pub const MAX_EPSILON_RATIO: f64 = 0.5;

/// Default noise floor: contours enclosing less than this fraction of the
/// mask area are discarded.
///
/// # Example
///
/// ```rust
/// use config::constants::DEFAULT_MIN_AREA_RATIO;
///
/// let mask_area = 400.0 * 300.0;
/// let floor = DEFAULT_MIN_AREA_RATIO * mask_area;
/// assert_eq!(floor, 60.0);
/// ```
pub const DEFAULT_MIN_AREA_RATIO: f64 = 0.0005;

/// Only the largest contour per view is kept by default.
pub const DEFAULT_KEEP_LARGEST_CONTOUR: bool = true;

/// Minimum absolute polygon area (scene units²) accepted by the sanitizer.
pub const MIN_SHAPE_AREA: f64 = 1e-4;

/// Minimum number of vertices in a valid polygon ring.
pub const MIN_POLYGON_VERTICES: usize = 3;

// =============================================================================
// SOLID CONSTANTS
// =============================================================================

/// Floor for the shared extrusion depth (scene units).
pub const MIN_EXTRUSION_DEPTH: f64 = 300.0;

/// Extrusion depth as a multiple of the largest shape dimension.
pub const EXTRUSION_DEPTH_FACTOR: f64 = 2.5;

/// Default edge length of the normalized output bounding box.
pub const DEFAULT_TARGET_MAX_DIMENSION: f64 = 120.0;

// =============================================================================
// LIMIT CONSTANTS
// =============================================================================

/// Maximum number of vertices in a single mesh.
///
/// Safety limit to prevent memory exhaustion from runaway BSP splitting.
///
/// # Example
///
/// ```rust
/// use config::constants::MAX_VERTICES;
///
/// let vertex_count = 1000;
/// assert!(vertex_count < MAX_VERTICES);
/// ```
pub const MAX_VERTICES: usize = 10_000_000;

/// Maximum number of triangles in a single mesh.
pub const MAX_TRIANGLES: usize = 10_000_000;

/// Maximum accepted image dimension (pixels per side).
pub const MAX_IMAGE_DIMENSION: u32 = 16_384;

/// Default capacity of the reconstruction memo cache.
pub const DEFAULT_CACHE_CAPACITY: usize = 8;

// =============================================================================
// HELPER FUNCTIONS
// =============================================================================

/// Computes the shared extrusion depth for a given largest shape dimension.
///
/// `depth = max(MIN_EXTRUSION_DEPTH, ceil(EXTRUSION_DEPTH_FACTOR * max_dimension))`
///
/// # Example
///
/// ```rust
/// use config::constants::extrusion_depth;
///
/// assert_eq!(extrusion_depth(10.0), 300.0);
/// assert_eq!(extrusion_depth(200.0), 500.0);
/// assert_eq!(extrusion_depth(200.1), 501.0);
/// ```
pub fn extrusion_depth(max_dimension: f64) -> f64 {
    (EXTRUSION_DEPTH_FACTOR * max_dimension.max(0.0))
        .ceil()
        .max(MIN_EXTRUSION_DEPTH)
}

/// Converts a Gaussian kernel size into a standard deviation.
///
/// Uses the conventional `0.3 * ((k - 1) / 2 - 1) + 0.8` relation so a kernel
/// size behaves the same as in common vision toolkits.
///
/// # Example
///
/// ```rust
/// use config::constants::kernel_size_to_sigma;
///
/// assert!((kernel_size_to_sigma(3) - 0.8).abs() < 1e-12);
/// assert!((kernel_size_to_sigma(5) - 1.1).abs() < 1e-12);
/// ```
pub fn kernel_size_to_sigma(kernel_size: u32) -> f64 {
    0.3 * ((f64::from(kernel_size) - 1.0) * 0.5 - 1.0) + 0.8
}

/// Checks if two f64 values are approximately equal within EPSILON.
///
/// # Example
///
/// ```rust
/// use config::constants::approx_equal;
///
/// assert!(approx_equal(1.0, 1.0 + 1e-11));
/// assert!(!approx_equal(1.0, 1.1));
/// ```
#[inline]
pub fn approx_equal(a: f64, b: f64) -> bool {
    (a - b).abs() < EPSILON
}
