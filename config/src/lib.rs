//! # Config Crate
//!
//! Centralized configuration constants for the orthohull reconstruction
//! pipeline. Every threshold, tolerance and default parameter lives here so the
//! raster, mesh and pipeline crates agree on the same numbers.
//!
//! ## Usage
//!
//! ```rust
//! use config::constants::{DEFAULT_EPSILON_RATIO, MIN_SHAPE_AREA};
//!
//! // Simplification tolerance scales with the contour perimeter
//! let perimeter = 400.0;
//! let epsilon = DEFAULT_EPSILON_RATIO * perimeter;
//! assert!(epsilon > 0.0);
//!
//! // Needle-thin artifacts fall under the area floor
//! let area: f64 = 0.00001;
//! assert!(area.abs() < MIN_SHAPE_AREA);
//! ```
//!
//! ## Design Principles
//!
//! - **Single Source of Truth**: All constants defined once, used everywhere
//! - **Deterministic**: No platform-specific values
//! - **Well-Documented**: Every constant has clear documentation

pub mod constants;

#[cfg(test)]
mod tests;
