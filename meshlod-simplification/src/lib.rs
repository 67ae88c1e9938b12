//! Mesh simplification for level-of-detail generation
//!
//! This crate reduces triangle meshes with quadric error metric (QEM) edge
//! collapse:
//! - Quadric error accumulation (`SymmetricMatrix`)
//! - Threshold-scheduled edge collapse decimation
//! - Compaction of the surviving geometry into a dense mesh
//! - LOD chain generation from a single source mesh

pub mod quadric;
pub mod quadric_error;
pub mod params;
pub mod report;
pub mod lod;
mod compaction;

pub use quadric::*;
pub use quadric_error::*;
pub use params::*;
pub use report::*;
pub use lod::*;

use meshlod_core::{TriangleMesh, Result};

/// Simplify a mesh by reducing the number of faces/vertices
pub trait MeshSimplifier {
    /// Simplify mesh with target reduction ratio (0.0 = no reduction, 1.0 = maximum reduction)
    fn simplify(&self, mesh: &TriangleMesh, reduction_ratio: f32) -> Result<TriangleMesh>;
}
