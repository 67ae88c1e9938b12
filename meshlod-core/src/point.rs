//! Point types and related functionality

use nalgebra::{Point3, Vector3};

/// A 3D point with floating point coordinates
pub type Point3f = Point3<f32>;

/// A 3D point with double precision coordinates
pub type Point3d = Point3<f64>;

/// A 3D vector with floating point components
pub type Vector3f = Vector3<f32>;

/// A 3D vector with double precision components
pub type Vector3d = Vector3<f64>;

/// A texture coordinate pair (u, v)
pub type TexCoord = [f32; 2];

/// Widen a single precision point for accumulation-heavy math
#[inline]
pub fn to_point3d(p: &Point3f) -> Point3d {
    p.cast::<f64>()
}

/// Narrow a double precision point back to the storage precision
#[inline]
pub fn to_point3f(p: &Point3d) -> Point3f {
    p.cast::<f32>()
}
