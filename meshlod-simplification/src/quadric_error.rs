//! Quadric error decimation
//!
//! Iterative edge collapse driven by quadric error metrics. Every round
//! re-evaluates the collapse error of all edges of the live triangles and
//! collapses those whose error lies below a threshold that grows with the
//! round number: early rounds only remove edges in near-flat regions, later
//! rounds become progressively more permissive until the target triangle
//! count is reached or the round budget runs out.
//!
//! Triangles live in a flat arena and are only flagged as deleted during the
//! run; the dense output mesh is built once at the end.

use crate::compaction::compact_mesh;
use crate::params::DecimationParams;
use crate::quadric::SymmetricMatrix;
use crate::report::DecimationReport;
use crate::MeshSimplifier;
use meshlod_core::{to_point3d, Drawable, Error, Point3d, Result, TexCoord, TriangleMesh};
use tracing::{debug, info};

/// Meshes with fewer triangles are returned unchanged
pub const MIN_SIMPLIFIABLE_TRIANGLES: usize = 4;

#[derive(Debug, Clone)]
struct Vertex {
    position: Point3d,
    quadric: SymmetricMatrix,
}

#[derive(Debug, Clone)]
struct Triangle {
    v: [usize; 3],
    deleted: bool,
    /// Touched by a collapse since the last error evaluation
    dirty: bool,
    edge_error: [f64; 3],
    min_error: f64,
}

impl Triangle {
    fn new(v: [usize; 3]) -> Self {
        Self {
            v,
            deleted: false,
            dirty: false,
            edge_error: [0.0; 3],
            min_error: 0.0,
        }
    }

    fn is_degenerate(&self) -> bool {
        self.v[0] == self.v[1] || self.v[1] == self.v[2] || self.v[0] == self.v[2]
    }
}

/// Collapse target and error for the edge `(i0, i1)`.
fn edge_collapse(vertices: &[Vertex], i0: usize, i1: usize, epsilon: f64) -> (Point3d, f64) {
    let q = vertices[i0].quadric + vertices[i1].quadric;
    q.optimal_point(&vertices[i0].position, &vertices[i1].position, epsilon)
}

/// Working state of one decimation run.
struct DecimationContext {
    vertices: Vec<Vertex>,
    triangles: Vec<Triangle>,
    /// Triangles referencing each vertex (may hold deleted entries)
    refs: Vec<Vec<usize>>,
    live_triangles: usize,
    collapses: usize,
    singular_epsilon: f64,
}

impl DecimationContext {
    fn new(mesh: &TriangleMesh, singular_epsilon: f64) -> Self {
        let mut vertices: Vec<Vertex> = mesh
            .vertices
            .iter()
            .map(|p| Vertex {
                position: to_point3d(p),
                quadric: SymmetricMatrix::zero(),
            })
            .collect();
        let mut refs = vec![Vec::new(); vertices.len()];
        let mut triangles = Vec::with_capacity(mesh.faces.len());

        for (ti, face) in mesh.faces.iter().enumerate() {
            let [a, b, c] = *face;
            let plane = SymmetricMatrix::from_triangle(
                &vertices[a].position,
                &vertices[b].position,
                &vertices[c].position,
            );
            for &vi in face {
                vertices[vi].quadric += plane;
                refs[vi].push(ti);
            }
            triangles.push(Triangle::new(*face));
        }

        Self {
            vertices,
            live_triangles: triangles.len(),
            triangles,
            refs,
            collapses: 0,
            singular_epsilon,
        }
    }

    /// Cache the collapse error of every edge of every live triangle.
    fn update_errors(&mut self) {
        let Self {
            vertices,
            triangles,
            singular_epsilon,
            ..
        } = self;

        for t in triangles.iter_mut().filter(|t| !t.deleted) {
            for j in 0..3 {
                let (_, error) = edge_collapse(vertices, t.v[j], t.v[(j + 1) % 3], *singular_epsilon);
                t.edge_error[j] = error;
            }
            t.min_error = t.edge_error.iter().copied().fold(f64::INFINITY, f64::min);
            t.dirty = false;
        }
    }

    /// One sweep over the arena collapsing every cheap enough edge.
    fn collapse_pass(&mut self, threshold: f64, target: usize) {
        for ti in 0..self.triangles.len() {
            if self.live_triangles <= target {
                break;
            }

            let t = &self.triangles[ti];
            if t.deleted || t.dirty || t.min_error > threshold {
                continue;
            }
            // First edge in declaration order reaching the minimum
            let Some(j) = t.edge_error.iter().position(|&e| e == t.min_error) else {
                continue;
            };
            let (i0, i1) = (t.v[j], t.v[(j + 1) % 3]);

            let (position, _) = edge_collapse(&self.vertices, i0, i1, self.singular_epsilon);
            self.collapse(i0, i1, position);
        }
    }

    /// Merge vertex `remove` into `keep`, placing `keep` at `position`.
    ///
    /// Every triangle referencing `remove` is rewritten to `keep`; those left
    /// with a repeated index are deleted. All triangles around `keep` become
    /// dirty for the rest of the pass.
    fn collapse(&mut self, keep: usize, remove: usize, position: Point3d) {
        let removed_quadric = self.vertices[remove].quadric;
        let kept = &mut self.vertices[keep];
        kept.position = position;
        kept.quadric += removed_quadric;

        let moved = std::mem::take(&mut self.refs[remove]);
        for &ti in &moved {
            let t = &mut self.triangles[ti];
            if t.deleted {
                continue;
            }
            for vi in t.v.iter_mut().filter(|vi| **vi == remove) {
                *vi = keep;
            }
            if t.is_degenerate() {
                t.deleted = true;
                self.live_triangles -= 1;
            }
        }

        let Self { triangles, refs, .. } = self;
        let kept_refs = &mut refs[keep];
        kept_refs.extend(moved);
        kept_refs.retain(|&ti| !triangles[ti].deleted);
        for &ti in kept_refs.iter() {
            triangles[ti].dirty = true;
        }

        self.collapses += 1;
    }

    fn to_mesh(&self, uvs: Option<&[TexCoord]>) -> TriangleMesh {
        let positions: Vec<Point3d> = self.vertices.iter().map(|v| v.position).collect();
        let faces: Vec<[usize; 3]> = self
            .triangles
            .iter()
            .filter(|t| !t.deleted)
            .map(|t| t.v)
            .collect();
        compact_mesh(&positions, &faces, uvs)
    }
}

/// Decimate `mesh` toward `round(faces * (1 - reduction_ratio))` triangles.
///
/// Never fails: meshes with fewer than [`MIN_SIMPLIFIABLE_TRIANGLES`] are
/// returned unchanged and running out of iterations returns whatever was
/// achieved, visible in the report. Indices are not validated; see
/// [`TriangleMesh::validate`] for callers that need it.
pub fn decimate(
    mesh: &TriangleMesh,
    reduction_ratio: f32,
    params: &DecimationParams,
) -> (TriangleMesh, DecimationReport) {
    let original_triangles = mesh.face_count();
    if original_triangles < MIN_SIMPLIFIABLE_TRIANGLES {
        debug!(triangles = original_triangles, "mesh too small to simplify");
        return (mesh.clone(), DecimationReport::unchanged(mesh));
    }

    let target = params.target_triangles(original_triangles, reduction_ratio);
    info!(
        original = original_triangles,
        target,
        reduction_ratio,
        "Starting quadric decimation"
    );

    let mut ctx = DecimationContext::new(mesh, params.singular_epsilon);
    let mut iterations = 0;
    for iteration in 0..params.max_iterations {
        if ctx.live_triangles <= target {
            break;
        }

        let threshold = params.threshold(iteration);
        ctx.update_errors();
        ctx.collapse_pass(threshold, target);
        iterations += 1;

        debug!(
            iteration,
            threshold,
            live = ctx.live_triangles,
            collapses = ctx.collapses,
            "collapse round done"
        );
    }

    let output = ctx.to_mesh(mesh.uvs.as_deref());
    let report = DecimationReport {
        original_triangles,
        original_vertices: mesh.vertex_count(),
        target_triangles: target,
        final_triangles: output.face_count(),
        final_vertices: output.vertex_count(),
        iterations,
        collapses: ctx.collapses,
        bounds: output.bounding_box(),
    };

    if !report.reached_target() {
        debug!(
            final_triangles = report.final_triangles,
            target,
            "iteration budget exhausted before reaching target"
        );
    }
    info!(%report, "Quadric decimation finished");

    (output, report)
}

/// Quadric error decimation simplifier
#[derive(Debug, Clone, Default)]
pub struct QuadricErrorSimplifier {
    pub params: DecimationParams,
}

impl QuadricErrorSimplifier {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_params(params: DecimationParams) -> Self {
        Self { params }
    }

    /// Validate the input, decimate it and report what was achieved.
    pub fn simplify_with_report(
        &self,
        mesh: &TriangleMesh,
        reduction_ratio: f32,
    ) -> Result<(TriangleMesh, DecimationReport)> {
        if !(0.0..=1.0).contains(&reduction_ratio) {
            return Err(Error::InvalidData(format!(
                "Reduction ratio must be between 0.0 and 1.0, got {}",
                reduction_ratio
            )));
        }
        mesh.validate()?;

        Ok(decimate(mesh, reduction_ratio, &self.params))
    }
}

impl MeshSimplifier for QuadricErrorSimplifier {
    fn simplify(&self, mesh: &TriangleMesh, reduction_ratio: f32) -> Result<TriangleMesh> {
        self.simplify_with_report(mesh, reduction_ratio)
            .map(|(simplified, _)| simplified)
    }
}
