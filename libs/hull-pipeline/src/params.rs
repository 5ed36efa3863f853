//! # Reconstruction Parameters
//!
//! User-facing knobs for the whole pipeline. Missing JSON fields fall back
//! to the defaults in `config::constants`.

use config::constants::{
    DEFAULT_AUTO_THRESHOLD, DEFAULT_BLUR_KERNEL_SIZE, DEFAULT_EPSILON_RATIO,
    DEFAULT_KEEP_LARGEST_CONTOUR, DEFAULT_MIN_AREA_RATIO, DEFAULT_MORPHOLOGY_ITERATIONS,
    DEFAULT_MORPHOLOGY_KERNEL_SIZE, DEFAULT_TARGET_MAX_DIMENSION, DEFAULT_THRESHOLD,
    MAX_EPSILON_RATIO, MAX_KERNEL_SIZE, MAX_MORPHOLOGY_ITERATIONS,
};
use serde::{Deserialize, Serialize};
use silhouette::{BinarizeParams, ContourParams, ContourPolicy, SilhouetteParams};

use crate::error::PipelineError;

/// Parameters of one reconstruction.
///
/// # Example
///
/// ```rust
/// use hull_pipeline::ReconstructionParams;
///
/// let params = ReconstructionParams::from_json(r#"{ "epsilon_ratio": 0.01 }"#).unwrap();
/// assert_eq!(params.epsilon_ratio, 0.01);
/// assert_eq!(params.target_max_dimension, 120.0);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReconstructionParams {
    /// Douglas-Peucker tolerance as a fraction of contour perimeter
    pub epsilon_ratio: f64,
    /// Fixed luminance threshold when `auto_threshold` is off
    pub threshold: u8,
    /// Otsu thresholding
    pub auto_threshold: bool,
    /// Noise floor as a fraction of the image area
    pub min_area_ratio: f64,
    pub blur_kernel_size: u32,
    pub morphology_kernel_size: u32,
    pub morphology_iterations: u32,
    /// Keep only the largest region per view
    pub keep_largest_contour: bool,
    /// Union every region of a view into one solid
    pub compound_parts: bool,
    /// Largest bounding-box edge of the output mesh
    pub target_max_dimension: f64,
}

impl Default for ReconstructionParams {
    fn default() -> Self {
        Self {
            epsilon_ratio: DEFAULT_EPSILON_RATIO,
            threshold: DEFAULT_THRESHOLD,
            auto_threshold: DEFAULT_AUTO_THRESHOLD,
            min_area_ratio: DEFAULT_MIN_AREA_RATIO,
            blur_kernel_size: DEFAULT_BLUR_KERNEL_SIZE,
            morphology_kernel_size: DEFAULT_MORPHOLOGY_KERNEL_SIZE,
            morphology_iterations: DEFAULT_MORPHOLOGY_ITERATIONS,
            keep_largest_contour: DEFAULT_KEEP_LARGEST_CONTOUR,
            compound_parts: false,
            target_max_dimension: DEFAULT_TARGET_MAX_DIMENSION,
        }
    }
}

impl ReconstructionParams {
    /// Parses and validates a (possibly partial) JSON document.
    pub fn from_json(json: &str) -> Result<Self, PipelineError> {
        let params: Self = serde_json::from_str(json)
            .map_err(|err| PipelineError::invalid_config("json", err.to_string()))?;
        params.validate()?;
        Ok(params)
    }

    /// Checks every field is in range.
    ///
    /// # Errors
    ///
    /// `InvalidConfig` naming the first offending field.
    pub fn validate(&self) -> Result<(), PipelineError> {
        if !(0.0..=MAX_EPSILON_RATIO).contains(&self.epsilon_ratio) {
            return Err(PipelineError::invalid_config(
                "epsilon_ratio",
                format!("{} not in [0, {MAX_EPSILON_RATIO}]", self.epsilon_ratio),
            ));
        }
        if !(0.0..1.0).contains(&self.min_area_ratio) {
            return Err(PipelineError::invalid_config(
                "min_area_ratio",
                format!("{} not in [0, 1)", self.min_area_ratio),
            ));
        }
        if self.blur_kernel_size > MAX_KERNEL_SIZE {
            return Err(PipelineError::invalid_config(
                "blur_kernel_size",
                format!("{} exceeds {MAX_KERNEL_SIZE}", self.blur_kernel_size),
            ));
        }
        if self.morphology_kernel_size > MAX_KERNEL_SIZE {
            return Err(PipelineError::invalid_config(
                "morphology_kernel_size",
                format!("{} exceeds {MAX_KERNEL_SIZE}", self.morphology_kernel_size),
            ));
        }
        if self.morphology_iterations > MAX_MORPHOLOGY_ITERATIONS {
            return Err(PipelineError::invalid_config(
                "morphology_iterations",
                format!(
                    "{} exceeds {MAX_MORPHOLOGY_ITERATIONS}",
                    self.morphology_iterations
                ),
            ));
        }
        if !(self.target_max_dimension.is_finite() && self.target_max_dimension > 0.0) {
            return Err(PipelineError::invalid_config(
                "target_max_dimension",
                format!("{} is not a positive size", self.target_max_dimension),
            ));
        }
        if self.compound_parts && self.keep_largest_contour {
            return Err(PipelineError::invalid_config(
                "compound_parts",
                "requires keep_largest_contour = false",
            ));
        }
        Ok(())
    }

    /// Contour policy implied by `keep_largest_contour`.
    pub fn contour_policy(&self) -> ContourPolicy {
        if self.keep_largest_contour {
            ContourPolicy::LargestOnly
        } else {
            ContourPolicy::All
        }
    }

    /// Parameters for the per-view silhouette stages.
    pub fn silhouette_params(&self) -> SilhouetteParams {
        SilhouetteParams {
            binarize: BinarizeParams {
                threshold: self.threshold,
                auto_threshold: self.auto_threshold,
                blur_kernel_size: self.blur_kernel_size,
                morphology_kernel_size: self.morphology_kernel_size,
                morphology_iterations: self.morphology_iterations,
            },
            contour: ContourParams {
                epsilon_ratio: self.epsilon_ratio,
                min_area_ratio: self.min_area_ratio,
                policy: self.contour_policy(),
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::Stage;

    #[test]
    fn test_default_is_valid() {
        let params = ReconstructionParams::default();
        assert!(params.validate().is_ok());
        assert_eq!(params.contour_policy(), ContourPolicy::LargestOnly);
    }

    #[test]
    fn test_default_matches_silhouette_defaults() {
        assert_eq!(
            ReconstructionParams::default().silhouette_params(),
            SilhouetteParams::default()
        );
    }

    #[test]
    fn test_from_json_partial() {
        let params =
            ReconstructionParams::from_json(r#"{ "keep_largest_contour": false, "compound_parts": true }"#)
                .unwrap();
        assert!(params.compound_parts);
        assert_eq!(params.contour_policy(), ContourPolicy::All);
        assert_eq!(params.blur_kernel_size, DEFAULT_BLUR_KERNEL_SIZE);
    }

    #[test]
    fn test_from_json_rejects_unknown_field() {
        let err = ReconstructionParams::from_json(r#"{ "epsilon": 0.1 }"#).unwrap_err();
        assert_eq!(err.stage(), Stage::Configure);
    }

    #[test]
    fn test_validate_ranges() {
        let bad = [
            ReconstructionParams {
                epsilon_ratio: -0.1,
                ..Default::default()
            },
            ReconstructionParams {
                epsilon_ratio: f64::NAN,
                ..Default::default()
            },
            ReconstructionParams {
                min_area_ratio: 1.0,
                ..Default::default()
            },
            ReconstructionParams {
                blur_kernel_size: 1001,
                ..Default::default()
            },
            ReconstructionParams {
                target_max_dimension: 0.0,
                ..Default::default()
            },
        ];
        for params in bad {
            assert!(
                matches!(params.validate(), Err(PipelineError::InvalidConfig { .. })),
                "{params:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_compound_requires_all_contours() {
        let params = ReconstructionParams {
            compound_parts: true,
            ..Default::default()
        };
        let err = params.validate().unwrap_err();
        assert!(matches!(err, PipelineError::InvalidConfig { field: "compound_parts", .. }));
    }

    #[test]
    fn test_json_round_trip_keeps_values() {
        let params = ReconstructionParams {
            threshold: 90,
            auto_threshold: false,
            ..Default::default()
        };
        let json = serde_json::to_string(&params).unwrap();
        assert_eq!(ReconstructionParams::from_json(&json).unwrap(), params);
    }
}
