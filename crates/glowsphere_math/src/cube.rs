//! Cube geometry
//!
//! The cube spans `center ± 1` on every axis. Each face has its own four
//! vertices so normals stay flat across the face (24 vertices, 36 indices).

use crate::{Vec3, mesh::{Mesh, MeshData}};

/// An axis-aligned cube with flat face normals
#[derive(Clone, Debug)]
pub struct Cube {
    center: Vec3,
    mesh: MeshData,
}

impl Cube {
    /// Half the side length
    pub const HALF_EXTENT: f32 = 1.0;

    /// Create a new cube centered at `center`
    pub fn new(center: Vec3) -> Self {
        // (normal, u, v) with u x v == normal so every face winds CCW from outside
        let faces = [
            (Vec3::X, Vec3::Y, Vec3::Z),
            (-Vec3::X, Vec3::Z, Vec3::Y),
            (Vec3::Y, Vec3::Z, Vec3::X),
            (-Vec3::Y, Vec3::X, Vec3::Z),
            (Vec3::Z, Vec3::X, Vec3::Y),
            (-Vec3::Z, Vec3::Y, Vec3::X),
        ];

        let h = Self::HALF_EXTENT;
        let mut mesh = MeshData::with_capacity(24, 36);
        for (n, u, v) in faces {
            let base = center + n * h;
            let i0 = mesh.push_vertex(base - u * h - v * h, n);
            let i1 = mesh.push_vertex(base + u * h - v * h, n);
            let i2 = mesh.push_vertex(base + u * h + v * h, n);
            let i3 = mesh.push_vertex(base - u * h + v * h, n);
            mesh.push_triangle(i0, i1, i2);
            mesh.push_triangle(i0, i2, i3);
        }

        Self { center, mesh }
    }
}

impl Mesh for Cube {
    fn mesh_data(&self) -> &MeshData {
        &self.mesh
    }

    fn center(&self) -> Vec3 {
        self.center
    }
}
