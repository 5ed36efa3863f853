//! # Silhouette Errors

use thiserror::Error;

/// Errors raised while turning a raster silhouette into planar regions.
#[derive(Debug, Error)]
pub enum SilhouetteError {
    /// The image bytes could not be decoded or exceed the size limit
    #[error("Image decode failed: {message}")]
    ImageDecode { message: String },

    /// No contour survived area filtering
    #[error("No contour found ({foreground} foreground pixels)")]
    NoContour { foreground: usize },

    /// Every candidate region failed sanitization
    #[error("Invalid polygon: {message}")]
    InvalidPolygon { message: String },
}

impl SilhouetteError {
    /// Creates an image decode error.
    pub fn decode(message: impl Into<String>) -> Self {
        Self::ImageDecode {
            message: message.into(),
        }
    }

    /// Creates an invalid polygon error.
    pub fn invalid_polygon(message: impl Into<String>) -> Self {
        Self::InvalidPolygon {
            message: message.into(),
        }
    }
}

impl From<image::ImageError> for SilhouetteError {
    fn from(err: image::ImageError) -> Self {
        Self::decode(err.to_string())
    }
}
