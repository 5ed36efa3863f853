//! # Plane for BSP Operations
//!
//! Plane representation with point classification.

use config::constants::PLANE_EPSILON;
use glam::DVec3;

// =============================================================================
// CLASSIFICATION
// =============================================================================

/// Classification of a point or polygon relative to a plane.
///
/// The discriminants are bit flags so per-vertex classes can be OR-ed
/// together: `Front | Back == Spanning`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Classification {
    /// Point is on the plane.
    Coplanar = 0,
    /// Point is in front of plane (positive side).
    Front = 1,
    /// Point is behind plane (negative side).
    Back = 2,
    /// Polygon spans the plane (has vertices on both sides).
    Spanning = 3,
}

impl Classification {
    fn from_bits(bits: u8) -> Self {
        match bits {
            0 => Self::Coplanar,
            1 => Self::Front,
            2 => Self::Back,
            _ => Self::Spanning,
        }
    }

    /// Combines two classifications.
    pub fn combine(self, other: Self) -> Self {
        Self::from_bits(self as u8 | other as u8)
    }
}

// =============================================================================
// PLANE
// =============================================================================

/// A plane in 3D space defined by normal and distance from origin.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    /// Normal vector (unit length).
    pub normal: DVec3,
    /// Distance from origin along normal.
    pub w: f64,
}

impl Plane {
    /// Create plane from normal and distance.
    pub fn new(normal: DVec3, w: f64) -> Self {
        Self { normal, w }
    }

    /// Create plane from three points.
    ///
    /// Points should be in counter-clockwise order when viewed from front.
    /// Returns `None` for collinear points.
    pub fn from_points(a: DVec3, b: DVec3, c: DVec3) -> Option<Self> {
        let normal = (b - a).cross(c - a);
        let length = normal.length();

        if !length.is_finite() || length < config::constants::EPSILON {
            return None;
        }

        let normal = normal / length;
        Some(Self {
            normal,
            w: normal.dot(a),
        })
    }

    /// Flip the plane (reverse normal).
    pub fn flip(&self) -> Plane {
        Plane {
            normal: -self.normal,
            w: -self.w,
        }
    }

    /// Signed distance from point to plane.
    ///
    /// Positive = front, negative = back, zero = on plane.
    #[inline]
    pub fn signed_distance(&self, point: DVec3) -> f64 {
        self.normal.dot(point) - self.w
    }

    /// Classify a point relative to this plane.
    pub fn classify_point(&self, point: DVec3) -> Classification {
        let dist = self.signed_distance(point);
        if dist > PLANE_EPSILON {
            Classification::Front
        } else if dist < -PLANE_EPSILON {
            Classification::Back
        } else {
            Classification::Coplanar
        }
    }
}

// =============================================================================
// TESTS
// =============================================================================
