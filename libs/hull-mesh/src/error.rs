//! # Mesh Errors
//!
//! Error types for solid construction and boolean operations.

use crate::solid::View;
use thiserror::Error;

/// Errors that can occur while building or combining solids.
#[derive(Debug, Error)]
pub enum MeshError {
    /// Degenerate geometry
    #[error("Degenerate geometry: {message}")]
    DegenerateGeometry { message: String },

    /// One or more views had no shape to extrude
    #[error("Missing input: no shape for {}", format_views(.views))]
    MissingInput { views: Vec<View> },

    /// Boolean operation failed
    #[error("Boolean {operation} failed: {message}")]
    BooleanFailed { operation: String, message: String },

    /// Too many vertices
    #[error("Too many vertices: {count} (max: {max})")]
    TooManyVertices { count: usize, max: usize },

    /// Too many triangles
    #[error("Too many triangles: {count} (max: {max})")]
    TooManyTriangles { count: usize, max: usize },
}

impl MeshError {
    /// Creates a degenerate geometry error.
    pub fn degenerate(message: impl Into<String>) -> Self {
        Self::DegenerateGeometry {
            message: message.into(),
        }
    }

    /// Creates a boolean operation failed error.
    pub fn boolean_failed(operation: impl Into<String>, message: impl Into<String>) -> Self {
        Self::BooleanFailed {
            operation: operation.into(),
            message: message.into(),
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
