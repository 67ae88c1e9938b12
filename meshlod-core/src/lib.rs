//! Core data structures and traits for meshlod
//!
//! This crate provides the plain mesh types consumed and produced by the
//! simplification engine, the crate-wide error type and the traits shared
//! across the workspace.

pub mod point;
pub mod mesh;
pub mod traits;
pub mod error;

pub use point::*;
pub use mesh::*;
pub use traits::*;
pub use error::*;

/// Re-export commonly used types from nalgebra
pub use nalgebra::{Point3, Vector3};

// Type aliases for easier imports
pub type Point = Point3f;
pub type Mesh = TriangleMesh;
