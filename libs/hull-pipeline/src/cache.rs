//! # Reconstruction Cache
//!
//! Memoizes finished meshes by the content of their inputs.
//!
//! ## Features
//!
//! - **Content-based keys**: Hash of the three image buffers and every parameter
//! - **LRU eviction**: Least recently used entry goes first when full
//! - **Statistics**: Hit/miss counts for tuning
//!
//! ## Example
//!
//! ```rust
//! use hull_mesh::Mesh;
//! use hull_pipeline::{CacheKey, ReconstructionCache, ReconstructionParams, ViewImages};
//!
//! let mut cache = ReconstructionCache::new(4);
//! let images = ViewImages::new(vec![1], vec![2], vec![3]);
//! let key = CacheKey::for_inputs(&images, &ReconstructionParams::default());
//!
//! assert!(cache.get(&key).is_none());
//! cache.put(key, Mesh::new());
//! assert!(cache.get(&key).is_some());
//! ```

use std::collections::hash_map::DefaultHasher;
use std::collections::HashMap;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

use hull_mesh::Mesh;

use crate::params::ReconstructionParams;
use crate::pipeline::ViewImages;

/// Content hash of one set of pipeline inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct CacheKey(pub u64);

impl CacheKey {
    /// Hashes the image bytes and parameters.
    ///
    /// Floating-point parameters are hashed by bit pattern.
    pub fn for_inputs(images: &ViewImages, params: &ReconstructionParams) -> Self {
        let mut hasher = DefaultHasher::new();
        images.hash(&mut hasher);

        params.epsilon_ratio.to_bits().hash(&mut hasher);
        params.threshold.hash(&mut hasher);
        params.auto_threshold.hash(&mut hasher);
        params.min_area_ratio.to_bits().hash(&mut hasher);
        params.blur_kernel_size.hash(&mut hasher);
        params.morphology_kernel_size.hash(&mut hasher);
        params.morphology_iterations.hash(&mut hasher);
        params.keep_largest_contour.hash(&mut hasher);
        params.compound_parts.hash(&mut hasher);
        params.target_max_dimension.to_bits().hash(&mut hasher);

        Self(hasher.finish())
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    mesh: Arc<Mesh>,
    /// Access clock value at last use
    last_access: u64,
}

/// Cache statistics for monitoring.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CacheStats {
    pub hits: u64,
    pub misses: u64,
    pub evictions: u64,
    /// Total entries ever stored
    pub total_stored: u64,
}

impl CacheStats {
    /// Hit rate in `[0, 1]`, or 0 if nothing was looked up.
    pub fn hit_rate(&self) -> f64 {
        let total = self.hits + self.misses;
        if total == 0 {
            0.0
        } else {
            self.hits as f64 / total as f64
        }
    }
}

/// LRU cache of reconstructed meshes.
#[derive(Debug)]
pub struct ReconstructionCache {
    entries: HashMap<CacheKey, CacheEntry>,
    capacity: usize,
    clock: u64,
    stats: CacheStats,
}

impl ReconstructionCache {
    /// Creates a cache holding at most `capacity` meshes (at least one).
    pub fn new(capacity: usize) -> Self {
        let capacity = capacity.max(1);
        Self {
            entries: HashMap::with_capacity(capacity),
            capacity,
            clock: 0,
            stats: CacheStats::default(),
        }
    }

    fn tick(&mut self) -> u64 {
        self.clock += 1;
        self.clock
    }

    /// Looks up a mesh, refreshing its recency on a hit.
    pub fn get(&mut self, key: &CacheKey) -> Option<Arc<Mesh>> {
        let now = self.tick();
        match self.entries.get_mut(key) {
            Some(entry) => {
                entry.last_access = now;
                self.stats.hits += 1;
                Some(Arc::clone(&entry.mesh))
            }
            None => {
                self.stats.misses += 1;
                None
            }
        }
    }

    /// Stores a mesh, evicting the least recently used entry if full.
    pub fn put(&mut self, key: CacheKey, mesh: Mesh) -> Arc<Mesh> {
        let mesh = Arc::new(mesh);
        self.put_arc(key, Arc::clone(&mesh));
        mesh
    }

    /// Stores an already shared mesh.
    pub fn put_arc(&mut self, key: CacheKey, mesh: Arc<Mesh>) {
        if !self.entries.contains_key(&key) {
            while self.entries.len() >= self.capacity {
                self.evict_lru();
            }
        }

        let last_access = self.tick();
        self.entries.insert(key, CacheEntry { mesh, last_access });
        self.stats.total_stored += 1;
    }

    fn evict_lru(&mut self) {
        let oldest = self
            .entries
            .iter()
            .min_by_key(|(_, entry)| entry.last_access)
            .map(|(key, _)| *key);

        if let Some(key) = oldest {
            self.entries.remove(&key);
            self.stats.evictions += 1;
        }
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn capacity(&self) -> usize {
        self.capacity
    }

    pub fn clear(&mut self) {
        self.entries.clear();
    }

    pub fn stats(&self) -> &CacheStats {
        &self.stats
    }
}

impl Default for ReconstructionCache {
    fn default() -> Self {
        Self::new(config::constants::DEFAULT_CACHE_CAPACITY)
    }
}
