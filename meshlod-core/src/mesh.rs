//! Mesh data structures and functionality

use crate::error::{Error, Result};
use crate::point::*;
use serde::{Deserialize, Serialize};

/// A triangle mesh with vertices, faces and optional per-vertex attributes
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TriangleMesh {
    pub vertices: Vec<Point3f>,
    pub faces: Vec<[usize; 3]>,
    pub normals: Option<Vec<Vector3f>>,
    pub uvs: Option<Vec<TexCoord>>,
}

impl TriangleMesh {
    /// Create a new empty mesh
    pub fn new() -> Self {
        Self {
            vertices: Vec::new(),
            faces: Vec::new(),
            normals: None,
            uvs: None,
        }
    }

    /// Create a mesh from vertices and faces
    pub fn from_vertices_and_faces(vertices: Vec<Point3f>, faces: Vec<[usize; 3]>) -> Self {
        Self {
            vertices,
            faces,
            normals: None,
            uvs: None,
        }
    }

    /// Create a mesh from vertices and a flat index buffer (three indices per triangle).
    ///
    /// Fails if the buffer length is not a multiple of 3 or an index does not
    /// address a vertex.
    pub fn from_flat_indices(vertices: Vec<Point3f>, indices: &[u32]) -> Result<Self> {
        if indices.len() % 3 != 0 {
            return Err(Error::InvalidData(format!(
                "index buffer length {} is not a multiple of 3",
                indices.len()
            )));
        }

        let faces: Vec<[usize; 3]> = indices
            .chunks_exact(3)
            .map(|tri| [tri[0] as usize, tri[1] as usize, tri[2] as usize])
            .collect();

        let mesh = Self::from_vertices_and_faces(vertices, faces);
        mesh.validate()?;
        Ok(mesh)
    }

    /// Flatten the faces into an index buffer
    pub fn flat_indices(&self) -> Vec<u32> {
        self.faces
            .iter()
            .flat_map(|face| face.iter().map(|&i| i as u32))
            .collect()
    }

    /// Get the number of vertices
    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }

    /// Get the number of faces
    pub fn face_count(&self) -> usize {
        self.faces.len()
    }

    /// Check if the mesh is empty
    pub fn is_empty(&self) -> bool {
        self.vertices.is_empty() || self.faces.is_empty()
    }

    /// Add a vertex to the mesh
    pub fn add_vertex(&mut self, vertex: Point3f) -> usize {
        let index = self.vertices.len();
        self.vertices.push(vertex);
        index
    }

    /// Add a face to the mesh
    pub fn add_face(&mut self, face: [usize; 3]) {
        self.faces.push(face);
    }

    /// Check that every face addresses existing vertices with three distinct
    /// indices and that attribute arrays match the vertex count.
    pub fn validate(&self) -> Result<()> {
        let vertex_count = self.vertices.len();

        for (fi, face) in self.faces.iter().enumerate() {
            if let Some(&bad) = face.iter().find(|&&i| i >= vertex_count) {
                return Err(Error::InvalidData(format!(
                    "face {} references vertex {} but the mesh has {} vertices",
                    fi, bad, vertex_count
                )));
            }
            if face[0] == face[1] || face[1] == face[2] || face[0] == face[2] {
                return Err(Error::InvalidData(format!(
                    "face {} has repeated vertex indices {:?}",
                    fi, face
                )));
            }
        }

        if let Some(normals) = &self.normals {
            if normals.len() != vertex_count {
                return Err(Error::InvalidData(format!(
                    "{} normals for {} vertices",
                    normals.len(),
                    vertex_count
                )));
            }
        }

        if let Some(uvs) = &self.uvs {
            if uvs.len() != vertex_count {
                return Err(Error::InvalidData(format!(
                    "{} uvs for {} vertices",
                    uvs.len(),
                    vertex_count
                )));
            }
        }

        Ok(())
    }

    /// Calculate face normals
    pub fn calculate_face_normals(&self) -> Vec<Vector3f> {
        self.faces
            .iter()
            .map(|face| {
                self.face_cross(face)
                    .try_normalize(f32::EPSILON)
                    .unwrap_or_else(Vector3f::zeros)
            })
            .collect()
    }

    /// Calculate vertex normals as the area-weighted average of the adjacent face normals.
    ///
    /// Vertices not referenced by any face (or only by zero-area faces) get a
    /// zero normal.
    pub fn calculate_vertex_normals(&self) -> Vec<Vector3f> {
        let mut accum = vec![Vector3f::zeros(); self.vertices.len()];

        for face in &self.faces {
            // Unnormalized cross product: its length is twice the face area
            let weighted = self.face_cross(face);
            for &vi in face {
                accum[vi] += weighted;
            }
        }

        accum
            .into_iter()
            .map(|n| n.try_normalize(f32::EPSILON).unwrap_or_else(Vector3f::zeros))
            .collect()
    }

    /// Replace the normals with freshly computed vertex normals
    pub fn recalculate_normals(&mut self) {
        self.normals = Some(self.calculate_vertex_normals());
    }

    /// Set vertex normals
    pub fn set_normals(&mut self, normals: Vec<Vector3f>) {
        if normals.len() == self.vertices.len() {
            self.normals = Some(normals);
        }
    }

    /// Set texture coordinates
    pub fn set_uvs(&mut self, uvs: Vec<TexCoord>) {
        if uvs.len() == self.vertices.len() {
            self.uvs = Some(uvs);
        }
    }

    /// Clear the mesh
    pub fn clear(&mut self) {
        self.vertices.clear();
        self.faces.clear();
        self.normals = None;
        self.uvs = None;
    }

    fn face_cross(&self, face: &[usize; 3]) -> Vector3f {
        let v0 = self.vertices[face[0]];
        let v1 = self.vertices[face[1]];
        let v2 = self.vertices[face[2]];

        (v1 - v0).cross(&(v2 - v0))
    }
}

impl Default for TriangleMesh {
    fn default() -> Self {
        Self::new()
    }
}
