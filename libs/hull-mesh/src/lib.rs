//! # Hull Mesh
//!
//! Mesh generation and CSG for orthographic visual-hull reconstruction.
//! Turns cleaned planar regions into aligned prisms and intersects them.
//!
//! ## Architecture
//!
//! ```text
//! Polygon2D (per view) → linear_extrude → build_solid(View) → SolidSet
//!                                                  ↓
//!                         intersect_solids (BSP, front ∩ top ∩ side)
//!                                                  ↓
//!                                     normalize → final Mesh
//! ```
//!
//! ## Algorithms
//!
//! - **Boolean Operations**: BSP trees (csg.js algorithm)
//! - **Cap Triangulation**: Ear clipping with hole bridging
//! - **Alignment**: Exact axis-permutation rotations per view
//!
//! ## Usage
//!
//! ```rust
//! use glam::DVec2;
//! use hull_mesh::{build_solids, intersect_solids, normalize, Polygon2D};
//!
//! let square = vec![Polygon2D::square(DVec2::splat(100.0), true)];
//! let solids = build_solids(Some(&square), Some(&square), Some(&square)).unwrap();
//! let raw = intersect_solids(&solids).unwrap();
//! let mesh = normalize(raw, 120.0);
//! let (min, max) = mesh.bounding_box();
//! assert!(((max - min).max_element() - 120.0).abs() < 1e-6);
//! ```

pub mod error;
pub mod mesh;
pub mod normalize;
pub mod ops;
pub mod solid;

pub use error::MeshError;
pub use mesh::Mesh;
pub use normalize::normalize;
pub use ops::boolean::{intersection, union};
pub use ops::extrude::{linear_extrude, LinearExtrudeParams, Polygon2D};
pub use solid::{
    build_solid, build_solids, extrusion_depth, intersect_solids, intersect_views, SolidSet, View,
};
