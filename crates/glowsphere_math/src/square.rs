//! Square geometry: a quad spanning -1..1 in the XY plane facing +Z

use crate::{Vec3, mesh::{Mesh, MeshData}};

/// A flat quad in the XY plane
#[derive(Clone, Debug)]
pub struct Square {
    center: Vec3,
    mesh: MeshData,
}

impl Square {
    /// Create a new square centered at `center`
    pub fn new(center: Vec3) -> Self {
        let mut mesh = MeshData::with_capacity(4, 6);
        let corners = [(-1.0, -1.0), (1.0, -1.0), (1.0, 1.0), (-1.0, 1.0)];
        for (x, y) in corners {
            mesh.push_vertex(center + Vec3::new(x, y, 0.0), Vec3::Z);
        }
        mesh.push_triangle(0, 1, 2);
        mesh.push_triangle(0, 2, 3);

        Self { center, mesh }
    }
}

impl Mesh for Square {
    fn mesh_data(&self) -> &MeshData {
        &self.mesh
    }

    fn center(&self) -> Vec3 {
        self.center
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_square_counts() {
        let square = Square::new(Vec3::ZERO);
        assert_eq!(square.vertex_count(), 4);
        assert_eq!(square.index_count(), 6);
        assert!(square.mesh_data().is_valid());
    }

    #[test]
    fn test_square_is_planar() {
        let square = Square::new(Vec3::new(0.0, 0.0, 3.0));
        for p in &square.mesh_data().positions {
            assert_eq!(p.z, 3.0);
        }
        for n in &square.mesh_data().normals {
            assert_eq!(n.xyz(), Vec3::Z);
        }
    }
}
