//! # Silhouette
//!
//! Raster silhouettes to clean planar shapes.
//!
//! ## Architecture
//!
//! ```text
//! encoded image → load_image → binarize → Mask
//!                                           ↓
//!              find_contours (Suzuki-Abe) → extract_regions (filter, simplify, frame)
//!                                           ↓
//!                          sanitize_regions → Vec<Shape>
//! ```
//!
//! Shapes come out in a y-up frame centered on the image, outer rings
//! counter-clockwise and holes clockwise, ready for extrusion.
//!
//! ## Usage
//!
//! ```rust
//! use image::{Rgba, RgbaImage};
//! use silhouette::{extract_shapes, SilhouetteParams};
//!
//! let image = RgbaImage::from_fn(64, 64, |x, y| {
//!     let inside = (16..48).contains(&x) && (16..48).contains(&y);
//!     Rgba([0, 0, 0, if inside { 255 } else { 0 }])
//! });
//! let shapes = extract_shapes(&image, &SilhouetteParams::default()).unwrap();
//! assert_eq!(shapes.len(), 1);
//! assert_eq!(shapes[0].outer().len(), 4);
//! ```

pub mod binarize;
pub mod contour;
pub mod error;
pub mod mask;
pub mod morphology;
pub mod sanitize;
pub mod simplify;

use image::RgbaImage;

pub use binarize::{binarize, load_image, load_image_file, BinarizeParams};
pub use contour::{extract_regions, find_contours, Contour, ContourParams, ContourPolicy, Region};
pub use error::SilhouetteError;
pub use mask::Mask;
pub use sanitize::{sanitize_regions, sanitize_ring, signed_area, Shape};

/// Everything needed to go from an image to shapes.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SilhouetteParams {
    pub binarize: BinarizeParams,
    pub contour: ContourParams,
}

/// Binarizes `image`, extracts candidate regions and sanitizes them.
///
/// Shapes are ordered by descending area. Regions whose outer ring fails
/// sanitization are skipped.
///
/// # Errors
///
/// - `NoContour` if the mask has no region above the area floor
/// - `InvalidPolygon` if every candidate region is rejected
pub fn extract_shapes(
    image: &RgbaImage,
    params: &SilhouetteParams,
) -> Result<Vec<Shape>, SilhouetteError> {
    let mask = binarize(image, &params.binarize);
    let regions = extract_regions(&mask, &params.contour)?;
    drop(mask);
    sanitize_regions(&regions)
}

/// Decodes `bytes` and runs [`extract_shapes`].
pub fn extract_shapes_from_bytes(
    bytes: &[u8],
    params: &SilhouetteParams,
) -> Result<Vec<Shape>, SilhouetteError> {
    extract_shapes(&load_image(bytes)?, params)
}
