//! # Hull Pipeline
//!
//! Orthographic silhouette visual-hull reconstruction: three view images
//! (front, top, side) in, one normalized triangle mesh out.
//!
//! ## Architecture
//!
//! ```text
//! ViewImages + ReconstructionParams
//!        ↓
//! silhouette (per view, parallel) → hull_mesh::build_solids → intersect_solids → normalize
//!        ↓
//! Mesh (or a PipelineError naming stage and view)
//! ```
//!
//! [`Reconstructor`] adds memoization on top of [`reconstruct`], and
//! [`reconstruct_in_background`] moves the work off the calling thread.

pub mod cache;
pub mod error;
pub mod params;
pub mod pipeline;
pub mod reconstructor;

pub use cache::{CacheKey, CacheStats, ReconstructionCache};
pub use error::{PipelineError, Stage};
pub use params::ReconstructionParams;
pub use pipeline::{
    reconstruct, reconstruct_in_background, reconstruct_with_report, Report, ViewImages,
};
pub use reconstructor::Reconstructor;

pub use hull_mesh::{Mesh, View};
