//! Statistics of a decimation run

use meshlod_core::{Drawable, Point3f, TriangleMesh};
use std::fmt;

/// What a single decimation call achieved.
///
/// Falling short of the target is a normal outcome; callers decide whether
/// the achieved reduction is acceptable.
#[derive(Debug, Clone, PartialEq)]
pub struct DecimationReport {
    pub original_triangles: usize,
    pub original_vertices: usize,
    pub target_triangles: usize,
    pub final_triangles: usize,
    pub final_vertices: usize,
    /// Collapse rounds actually run
    pub iterations: usize,
    pub collapses: usize,
    /// Bounding box `(min, max)` of the output mesh
    pub bounds: (Point3f, Point3f),
}

impl DecimationReport {
    /// Report for a mesh returned as-is
    pub fn unchanged(mesh: &TriangleMesh) -> Self {
        Self {
            original_triangles: mesh.face_count(),
            original_vertices: mesh.vertex_count(),
            target_triangles: mesh.face_count(),
            final_triangles: mesh.face_count(),
            final_vertices: mesh.vertex_count(),
            iterations: 0,
            collapses: 0,
            bounds: mesh.bounding_box(),
        }
    }

    pub fn reached_target(&self) -> bool {
        self.final_triangles <= self.target_triangles
    }

    /// Fraction of the original triangles that survived
    pub fn kept_ratio(&self) -> f64 {
        if self.original_triangles == 0 {
            1.0
        } else {
            self.final_triangles as f64 / self.original_triangles as f64
        }
    }

    pub fn reduction_percent(&self) -> f64 {
        (1.0 - self.kept_ratio()) * 100.0
    }
}

impl fmt::Display for DecimationReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} -> {} triangles ({:.1}% reduction, target {}, {} collapses in {} iterations)",
            self.original_triangles,
            self.final_triangles,
            self.reduction_percent(),
            self.target_triangles,
            self.collapses,
            self.iterations
        )
    }
}
