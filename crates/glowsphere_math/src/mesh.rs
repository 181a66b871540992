//! Mesh data and the trait shared by all generated shapes
//!
//! Meshes are pure CPU geometry - no buffers, no GPU handles. The render
//! crate turns a [`MeshData`] into a drawable once it is uploaded.

use crate::{Vec3, Vec4};

/// Triangle-list geometry with one entry per vertex attribute
///
/// Positions carry `w = 1` and normals `w = 0` so both can be uploaded as
/// `vec4<f32>` attributes without repacking.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct MeshData {
    /// Vertex positions
    pub positions: Vec<Vec4>,
    /// Vertex normals, same length as `positions`
    pub normals: Vec<Vec4>,
    /// Optional per-vertex colors
    pub colors: Option<Vec<Vec4>>,
    /// Triangle list indices into the vertex arrays
    pub indices: Vec<u32>,
}

impl MeshData {
    /// Create an empty mesh with pre-allocated capacity
    pub fn with_capacity(vertex_capacity: usize, index_capacity: usize) -> Self {
        Self {
            positions: Vec::with_capacity(vertex_capacity),
            normals: Vec::with_capacity(vertex_capacity),
            colors: None,
            indices: Vec::with_capacity(index_capacity),
        }
    }

    /// Append a vertex and return its index
    pub fn push_vertex(&mut self, position: Vec3, normal: Vec3) -> u32 {
        let index = self.positions.len() as u32;
        self.positions.push(Vec4::point(position));
        self.normals.push(Vec4::direction(normal));
        index
    }

    /// Append one triangle
    #[inline]
    pub fn push_triangle(&mut self, a: u32, b: u32, c: u32) {
        self.indices.extend_from_slice(&[a, b, c]);
    }

    /// Number of vertices
    #[inline]
    pub fn vertex_count(&self) -> usize {
        self.positions.len()
    }

    /// Number of indices (what a draw call consumes)
    #[inline]
    pub fn index_count(&self) -> usize {
        self.indices.len()
    }

    /// Number of triangles
    #[inline]
    pub fn triangle_count(&self) -> usize {
        self.indices.len() / 3
    }

    /// Check the structural invariants of the mesh
    ///
    /// Attribute arrays must agree in length, the index list must form whole
    /// triangles and every index must reference an existing vertex.
    pub fn is_valid(&self) -> bool {
        let n = self.positions.len();
        self.normals.len() == n
            && self.colors.as_ref().map_or(true, |c| c.len() == n)
            && self.indices.len() % 3 == 0
            && self.indices.iter().all(|&i| (i as usize) < n)
    }
}

/// Trait for shapes that produce triangle-list geometry
pub trait Mesh {
    /// The generated geometry
    fn mesh_data(&self) -> &MeshData;

    /// Center the shape was generated around
    fn center(&self) -> Vec3;

    /// Get the number of vertices
    #[inline]
    fn vertex_count(&self) -> usize {
        self.mesh_data().vertex_count()
    }

    /// Get the number of indices
    #[inline]
    fn index_count(&self) -> usize {
        self.mesh_data().index_count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_push_vertex_sets_w() {
        let mut mesh = MeshData::default();
        let i = mesh.push_vertex(Vec3::new(1.0, 2.0, 3.0), Vec3::Z);
        assert_eq!(i, 0);
        assert_eq!(mesh.positions[0].w, 1.0);
        assert_eq!(mesh.normals[0].w, 0.0);
    }

    #[test]
    fn test_is_valid_detects_out_of_range_index() {
        let mut mesh = MeshData::default();
        mesh.push_vertex(Vec3::ZERO, Vec3::Z);
        mesh.push_vertex(Vec3::X, Vec3::Z);
        mesh.push_vertex(Vec3::Y, Vec3::Z);
        mesh.push_triangle(0, 1, 2);
        assert!(mesh.is_valid());

        mesh.push_triangle(0, 1, 3);
        assert!(!mesh.is_valid());
    }

    #[test]
    fn test_is_valid_detects_partial_triangle() {
        let mut mesh = MeshData::default();
        mesh.push_vertex(Vec3::ZERO, Vec3::Z);
        mesh.indices.push(0);
        assert!(!mesh.is_valid());
    }

    #[test]
    fn test_is_valid_detects_color_mismatch() {
        let mut mesh = MeshData::default();
        mesh.push_vertex(Vec3::ZERO, Vec3::Z);
        mesh.colors = Some(Vec::new());
        assert!(!mesh.is_valid());
    }
}
