//! # Memoizing Reconstructor
//!
//! Wraps [`reconstruct`](crate::pipeline::reconstruct) with a result cache
//! and keeps the last good mesh around for callers that want to keep
//! showing something while inputs are being edited.

use std::sync::Arc;

use hull_mesh::Mesh;
use log::{debug, warn};

use crate::cache::{CacheKey, ReconstructionCache};
use crate::error::PipelineError;
use crate::params::ReconstructionParams;
use crate::pipeline::{reconstruct, ViewImages};

/// Reruns the pipeline only when images or parameters change.
///
/// # Example
///
/// ```rust
/// use hull_pipeline::{ReconstructionParams, Reconstructor, ViewImages};
///
/// let mut reconstructor = Reconstructor::new();
/// let images = ViewImages::default();
/// assert!(reconstructor.reconstruct(&images, &ReconstructionParams::default()).is_err());
/// assert!(reconstructor.last_success().is_none());
/// ```
#[derive(Debug, Default)]
pub struct Reconstructor {
    cache: ReconstructionCache,
    last_success: Option<Arc<Mesh>>,
}

impl Reconstructor {
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a reconstructor whose cache holds `capacity` results.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            cache: ReconstructionCache::new(capacity),
            last_success: None,
        }
    }

    /// Returns the mesh for these inputs, computing it on a cache miss.
    ///
    /// Failures are not cached and leave [`last_success`](Self::last_success)
    /// untouched.
    pub fn reconstruct(
        &mut self,
        images: &ViewImages,
        params: &ReconstructionParams,
    ) -> Result<Arc<Mesh>, PipelineError> {
        let key = CacheKey::for_inputs(images, params);

        if let Some(mesh) = self.cache.get(&key) {
            debug!(
                "reconstruction cache hit ({:.0}% hit rate)",
                self.cache.stats().hit_rate() * 100.0
            );
            self.last_success = Some(Arc::clone(&mesh));
            return Ok(mesh);
        }

        match reconstruct(images, params) {
            Ok(mesh) => {
                let mesh = self.cache.put(key, mesh);
                self.last_success = Some(Arc::clone(&mesh));
                Ok(mesh)
            }
            Err(err) => {
                warn!("reconstruction failed at {}: {err}", err.stage());
                Err(err)
            }
        }
    }

    /// Most recent successful result.
    pub fn last_success(&self) -> Option<Arc<Mesh>> {
        self.last_success.clone()
    }

    pub fn cache(&self) -> &ReconstructionCache {
        &self.cache
    }

    /// Drops every cached result, keeping the last success.
    pub fn clear_cache(&mut self) {
        self.cache.clear();
    }
}
