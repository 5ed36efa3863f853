//! # Pipeline Errors
//!
//! Every failure names the stage it came from and, where one applies, the
//! view.

use std::fmt;

use hull_mesh::{MeshError, View};
use serde::Serialize;
use silhouette::SilhouetteError;
use thiserror::Error;

/// Pipeline stages, in execution order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Configure,
    Rasterize,
    ExtractContours,
    Sanitize,
    BuildSolids,
    Intersect,
    Normalize,
}

impl Stage {
    pub fn name(self) -> &'static str {
        match self {
            Stage::Configure => "configure",
            Stage::Rasterize => "rasterize",
            Stage::ExtractContours => "extract contours",
            Stage::Sanitize => "sanitize",
            Stage::BuildSolids => "build solids",
            Stage::Intersect => "intersect",
            Stage::Normalize => "normalize",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Errors returned by the reconstruction pipeline.
#[derive(Debug, Error)]
pub enum PipelineError {
    /// Parameters out of range
    #[error("[configure] invalid parameter `{field}`: {message}")]
    InvalidConfig { field: &'static str, message: String },

    /// A view image could not be decoded
    #[error("[rasterize] {view} image decode failed: {message}")]
    ImageDecode { view: View, message: String },

    /// No contour survived filtering in a view
    #[error("[extract contours] no contour in {view} view ({foreground} foreground pixels)")]
    NoContour { view: View, foreground: usize },

    /// Every region of a view failed sanitization
    #[error("[sanitize] invalid {view} polygon: {message}")]
    InvalidPolygon { view: View, message: String },

    /// One or more views have no image or no shape
    #[error("[build solids] missing input: {}", format_views(.views))]
    MissingInput { views: Vec<View> },

    /// A view could not be extruded into a solid
    #[error("[build solids] extrusion failed: {message}")]
    Extrusion { message: String },

    /// Boolean intersection failed
    #[error("[intersect] {step} failed: {message}")]
    BooleanEvaluation { step: String, message: String },
}

impl PipelineError {
    /// Creates an invalid configuration error.
    pub fn invalid_config(field: &'static str, message: impl Into<String>) -> Self {
        Self::InvalidConfig {
            field,
            message: message.into(),
        }
    }

    /// Tags a silhouette error with its view.
    pub fn from_silhouette(view: View, err: SilhouetteError) -> Self {
        match err {
            SilhouetteError::ImageDecode { message } => Self::ImageDecode { view, message },
            SilhouetteError::NoContour { foreground } => Self::NoContour { view, foreground },
            SilhouetteError::InvalidPolygon { message } => Self::InvalidPolygon { view, message },
        }
    }

    /// Maps an error raised while building the view solids.
    pub fn from_build(err: MeshError) -> Self {
        match err {
            MeshError::MissingInput { views } => Self::MissingInput { views },
            other => Self::Extrusion {
                message: other.to_string(),
            },
        }
    }

    /// Maps an error raised while intersecting the view solids.
    pub fn from_intersect(err: MeshError) -> Self {
        match err {
            MeshError::BooleanFailed { operation, message } => Self::BooleanEvaluation {
                step: operation,
                message,
            },
            other => Self::BooleanEvaluation {
                step: "intersection".to_string(),
                message: other.to_string(),
            },
        }
    }

    /// Stage that raised the error.
    pub fn stage(&self) -> Stage {
        match self {
            Self::InvalidConfig { .. } => Stage::Configure,
            Self::ImageDecode { .. } => Stage::Rasterize,
            Self::NoContour { .. } => Stage::ExtractContours,
            Self::InvalidPolygon { .. } => Stage::Sanitize,
            Self::MissingInput { .. } | Self::Extrusion { .. } => Stage::BuildSolids,
            Self::BooleanEvaluation { .. } => Stage::Intersect,
        }
    }

    /// View the error belongs to, if it is specific to one.
    pub fn view(&self) -> Option<View> {
        match self {
            Self::ImageDecode { view, .. }
            | Self::NoContour { view, .. }
            | Self::InvalidPolygon { view, .. } => Some(*view),
            _ => None,
        }
    }
}

fn format_views(views: &[View]) -> String {
    views
        .iter()
        .map(|view| view.name())
        .collect::<Vec<_>>()
        .join(", ")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_silhouette_errors_keep_view() {
        let err = PipelineError::from_silhouette(View::Top, SilhouetteError::NoContour { foreground: 3 });
        assert_eq!(err.stage(), Stage::ExtractContours);
        assert_eq!(err.view(), Some(View::Top));
        assert_eq!(
            err.to_string(),
            "[extract contours] no contour in top view (3 foreground pixels)"
        );
    }

    #[test]
    fn test_build_errors() {
        let missing = PipelineError::from_build(MeshError::MissingInput {
            views: vec![View::Front, View::Side],
        });
        assert_eq!(missing.stage(), Stage::BuildSolids);
        assert_eq!(missing.to_string(), "[build solids] missing input: front, side");

        let degenerate = PipelineError::from_build(MeshError::degenerate("flat"));
        assert!(matches!(degenerate, PipelineError::Extrusion { .. }));
    }

    #[test]
    fn test_intersect_errors_keep_step() {
        let err = PipelineError::from_intersect(MeshError::boolean_failed("∩ side", "non-finite"));
        assert_eq!(err.stage(), Stage::Intersect);
        assert_eq!(err.view(), None);
        assert_eq!(err.to_string(), "[intersect] ∩ side failed: non-finite");
    }

    #[test]
    fn test_stage_order() {
        assert!(Stage::Rasterize < Stage::Intersect);
        assert_eq!(Stage::BuildSolids.to_string(), "build solids");
    }
}
