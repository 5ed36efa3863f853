//! # Mesh Operations
//!
//! - [`boolean`]: BSP-based union and intersection
//! - [`extrude`]: Planar regions to prisms

pub mod boolean;
pub mod extrude;
