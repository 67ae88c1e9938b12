//! Output compaction
//!
//! Turns the surviving triangles of a decimation run into a dense mesh: only
//! referenced vertices are kept, renumbered in ascending order of their old
//! index.

use itertools::Itertools;
use meshlod_core::{to_point3f, Point3d, TexCoord, TriangleMesh};

const UNMAPPED: usize = usize::MAX;

/// Build the output mesh from working positions and the surviving faces.
///
/// UVs are taken from the original slot of each surviving vertex, without
/// interpolation across collapses. Vertex normals are recomputed.
pub(crate) fn compact_mesh(
    positions: &[Point3d],
    faces: &[[usize; 3]],
    uvs: Option<&[TexCoord]>,
) -> TriangleMesh {
    let surviving: Vec<usize> = faces
        .iter()
        .flatten()
        .copied()
        .sorted_unstable()
        .dedup()
        .collect();

    let mut old_to_new = vec![UNMAPPED; positions.len()];
    for (new_index, &old_index) in surviving.iter().enumerate() {
        old_to_new[old_index] = new_index;
    }

    let vertices = surviving
        .iter()
        .map(|&old| to_point3f(&positions[old]))
        .collect();
    let new_faces = faces
        .iter()
        .map(|face| face.map(|old| old_to_new[old]))
        .collect();

    let mut mesh = TriangleMesh::from_vertices_and_faces(vertices, new_faces);
    if let Some(uvs) = uvs {
        mesh.uvs = Some(surviving.iter().map(|&old| uvs[old]).collect());
    }
    mesh.recalculate_normals();
    mesh
}
