//! # Binarizer
//!
//! Decodes a view image and labels every pixel as foreground or background.
//!
//! ## Paths
//!
//! - **Alpha**: if any pixel is not near-opaque, the alpha channel alone
//!   decides (`alpha > ALPHA_CUTOFF`).
//! - **Luminance**: grayscale, Gaussian smoothing, Otsu (or fixed)
//!   threshold with `luminance > threshold` as foreground, then inversion
//!   when more than half the image is foreground.
//!
//! Both paths finish with a morphological opening and closing.

use std::path::Path;

use config::constants::{
    kernel_size_to_sigma, ALPHA_CUTOFF, ALPHA_OPAQUE_THRESHOLD, DEFAULT_AUTO_THRESHOLD,
    DEFAULT_BLUR_KERNEL_SIZE, DEFAULT_MORPHOLOGY_ITERATIONS, DEFAULT_MORPHOLOGY_KERNEL_SIZE,
    DEFAULT_THRESHOLD, MAX_IMAGE_DIMENSION, MIN_BLUR_KERNEL_SIZE,
};
use image::{DynamicImage, GrayImage, RgbaImage};
use log::debug;

use crate::error::SilhouetteError;
use crate::mask::Mask;
use crate::morphology;

/// Parameters for [`binarize`].
#[derive(Debug, Clone, PartialEq)]
pub struct BinarizeParams {
    /// Fixed luminance threshold, used when `auto_threshold` is false
    pub threshold: u8,
    /// Pick the threshold with Otsu's method
    pub auto_threshold: bool,
    /// Gaussian kernel size; below 3 disables smoothing, even sizes round up
    pub blur_kernel_size: u32,
    /// Square structuring element size; below 2 disables morphology
    pub morphology_kernel_size: u32,
    /// Erode/dilate repetitions per morphology step
    pub morphology_iterations: u32,
}

impl Default for BinarizeParams {
    fn default() -> Self {
        Self {
            threshold: DEFAULT_THRESHOLD,
            auto_threshold: DEFAULT_AUTO_THRESHOLD,
            blur_kernel_size: DEFAULT_BLUR_KERNEL_SIZE,
            morphology_kernel_size: DEFAULT_MORPHOLOGY_KERNEL_SIZE,
            morphology_iterations: DEFAULT_MORPHOLOGY_ITERATIONS,
        }
    }
}

// =============================================================================
// DECODING
// =============================================================================

fn check_dimensions(image: DynamicImage) -> Result<RgbaImage, SilhouetteError> {
    let (w, h) = (image.width(), image.height());
    if w == 0 || h == 0 {
        return Err(SilhouetteError::decode("image has no pixels"));
    }
    if w > MAX_IMAGE_DIMENSION || h > MAX_IMAGE_DIMENSION {
        return Err(SilhouetteError::decode(format!(
            "image is {w}x{h}, limit is {MAX_IMAGE_DIMENSION} per side"
        )));
    }
    Ok(image.to_rgba8())
}

/// Decodes an encoded raster (PNG, JPEG, BMP) into RGBA.
pub fn load_image(bytes: &[u8]) -> Result<RgbaImage, SilhouetteError> {
    check_dimensions(image::load_from_memory(bytes)?)
}

/// Reads and decodes an image file into RGBA.
pub fn load_image_file(path: impl AsRef<Path>) -> Result<RgbaImage, SilhouetteError> {
    check_dimensions(image::open(path)?)
}

// =============================================================================
// FILTERS
// =============================================================================

/// Returns true if any pixel's alpha is below the near-opaque threshold.
pub fn has_transparency(image: &RgbaImage) -> bool {
    image.pixels().any(|p| p[3] < ALPHA_OPAQUE_THRESHOLD)
}

/// Mirror index without repeating the edge pixel (`dcb|abcd|cba`).
fn reflect_101(i: i64, len: i64) -> u32 {
    if len == 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let m = i.rem_euclid(period);
    (if m < len { m } else { period - m }) as u32
}

fn gaussian_kernel(kernel_size: u32) -> Vec<f64> {
    let sigma = kernel_size_to_sigma(kernel_size);
    let half = f64::from(kernel_size / 2);
    let weights: Vec<f64> = (0..kernel_size)
        .map(|i| {
            let d = f64::from(i) - half;
            (-(d * d) / (2.0 * sigma * sigma)).exp()
        })
        .collect();
    let sum: f64 = weights.iter().sum();
    weights.into_iter().map(|w| w / sum).collect()
}

/// Separable Gaussian smoothing with a `kernel_size` x `kernel_size` window.
///
/// Sizes below 3 return the image unchanged; even sizes are rounded up to
/// the next odd size.
pub fn gaussian_blur(image: &GrayImage, kernel_size: u32) -> GrayImage {
    if kernel_size < MIN_BLUR_KERNEL_SIZE {
        return image.clone();
    }
    let kernel_size = kernel_size | 1;
    let kernel = gaussian_kernel(kernel_size);
    let half = i64::from(kernel_size / 2);
    let (w, h) = image.dimensions();

    // f32 keeps the intermediate buffer at 4 bytes per pixel
    let mut rows = vec![0.0f32; w as usize * h as usize];
    for y in 0..h {
        for x in 0..w {
            let value: f64 = kernel
                .iter()
                .enumerate()
                .map(|(k, weight)| {
                    let sx = reflect_101(i64::from(x) + k as i64 - half, i64::from(w));
                    weight * f64::from(image.get_pixel(sx, y)[0])
                })
                .sum();
            rows[(y * w + x) as usize] = value as f32;
        }
    }

    GrayImage::from_fn(w, h, |x, y| {
        let value: f64 = kernel
            .iter()
            .enumerate()
            .map(|(k, weight)| {
                let sy = reflect_101(i64::from(y) + k as i64 - half, i64::from(h));
                weight * f64::from(rows[(sy * w + x) as usize])
            })
            .sum();
        image::Luma([value.round().clamp(0.0, 255.0) as u8])
    })
}

/// Otsu's threshold: the level maximizing between-class variance.
///
/// Pixels strictly above the returned level form the upper class.
pub fn otsu_threshold(image: &GrayImage) -> u8 {
    let mut histogram = [0u64; 256];
    for p in image.pixels() {
        histogram[p[0] as usize] += 1;
    }

    let (w, h) = image.dimensions();
    let total = f64::from(w) * f64::from(h);
    if total == 0.0 {
        return 0;
    }

    let probabilities = histogram.map(|count| count as f64 / total);
    let mu: f64 = probabilities
        .iter()
        .enumerate()
        .map(|(i, p)| i as f64 * p)
        .sum();

    let (mut q1, mut mu1) = (0.0f64, 0.0f64);
    let (mut max_sigma, mut level) = (0.0f64, 0u8);

    for (i, &p_i) in probabilities.iter().enumerate() {
        mu1 *= q1;
        q1 += p_i;
        let q2 = 1.0 - q1;

        if q1.min(q2) < f64::from(f32::EPSILON) || q1.max(q2) > 1.0 - f64::from(f32::EPSILON) {
            continue;
        }

        mu1 = (mu1 + i as f64 * p_i) / q1;
        let mu2 = (mu - q1 * mu1) / q2;
        let sigma = q1 * q2 * (mu1 - mu2) * (mu1 - mu2);
        if sigma > max_sigma {
            max_sigma = sigma;
            level = i as u8;
        }
    }

    level
}

// =============================================================================
// BINARIZATION
// =============================================================================

/// Labels the pixels of `image` and cleans the result.
///
/// # Example
///
/// ```rust
/// use image::{Rgba, RgbaImage};
/// use silhouette::{binarize, BinarizeParams};
///
/// // Opaque square on a transparent background
/// let image = RgbaImage::from_fn(20, 20, |x, y| {
///     let inside = (5..15).contains(&x) && (5..15).contains(&y);
///     Rgba([0, 0, 0, if inside { 255 } else { 0 }])
/// });
/// let mask = binarize(&image, &BinarizeParams::default());
/// assert_eq!(mask.foreground_count(), 100);
/// ```
pub fn binarize(image: &RgbaImage, params: &BinarizeParams) -> Mask {
    let (w, h) = image.dimensions();

    let mask = if has_transparency(image) {
        let mask = Mask::from_fn(w, h, |x, y| image.get_pixel(x, y)[3] > ALPHA_CUTOFF);
        debug!("binarize: alpha path, {} foreground", mask.foreground_count());
        mask
    } else {
        let gray = image::imageops::grayscale(image);
        let smoothed = gaussian_blur(&gray, params.blur_kernel_size);
        let threshold = if params.auto_threshold {
            otsu_threshold(&smoothed)
        } else {
            params.threshold
        };

        let mut mask = Mask::from_fn(w, h, |x, y| smoothed.get_pixel(x, y)[0] > threshold);
        let ratio = mask.foreground_ratio();
        if ratio > 0.5 {
            mask.invert();
        }
        debug!(
            "binarize: luminance path, threshold {threshold}, ratio {ratio:.3}{}",
            if ratio > 0.5 { " (inverted)" } else { "" }
        );
        mask
    };

    morphology::clean(mask, params.morphology_kernel_size, params.morphology_iterations)
}
