//! Icosphere geometry
//!
//! An icosphere starts as a regular icosahedron (12 vertices, 20 faces).
//! Each subdivision splits every triangle into four by inserting its edge
//! midpoints, then pushes the new vertices out onto the sphere. Edge
//! midpoints are shared between neighbouring faces, so after `n` steps the
//! mesh has `20·4^n` faces and `10·4^n + 2` vertices.

use std::collections::HashMap;

use crate::{Vec3, mesh::{Mesh, MeshData}};

/// Highest subdivision level the demo exposes
pub const MAX_SUBDIVISIONS: u32 = 8;

// Unit-sphere icosahedron coordinates: (±X, 0, ±Z) and rotations thereof
const X: f32 = 0.525_731_1;
const Z: f32 = 0.850_650_8;

const ICOSAHEDRON_VERTICES: [[f32; 3]; 12] = [
    [-X, 0.0, Z], [X, 0.0, Z], [-X, 0.0, -Z], [X, 0.0, -Z],
    [0.0, Z, X], [0.0, Z, -X], [0.0, -Z, X], [0.0, -Z, -X],
    [Z, X, 0.0], [-Z, X, 0.0], [Z, -X, 0.0], [-Z, -X, 0.0],
];

// Counter-clockwise when seen from outside the sphere
const ICOSAHEDRON_FACES: [[u32; 3]; 20] = [
    [0, 1, 4], [0, 4, 9], [9, 4, 5], [4, 8, 5], [4, 1, 8],
    [8, 1, 10], [8, 10, 3], [5, 8, 3], [5, 3, 2], [2, 3, 7],
    [7, 3, 10], [7, 10, 6], [7, 6, 11], [11, 6, 0], [0, 6, 1],
    [6, 10, 1], [9, 11, 0], [9, 2, 11], [9, 5, 2], [7, 11, 2],
];

/// A subdivided icosahedron projected onto a sphere
#[derive(Clone, Debug)]
pub struct Icosphere {
    center: Vec3,
    radius: f32,
    subdivisions: u32,
    mesh: MeshData,
}

impl Icosphere {
    /// Create a new icosphere
    ///
    /// # Arguments
    /// * `center` - Center of the sphere
    /// * `radius` - Sphere radius
    /// * `subdivisions` - Number of subdivision passes, clamped to
    ///   [`MAX_SUBDIVISIONS`]
    pub fn new(center: Vec3, radius: f32, subdivisions: u32) -> Self {
        let subdivisions = subdivisions.min(MAX_SUBDIVISIONS);
        let (directions, faces) = Self::subdivide(subdivisions);

        let mut mesh = MeshData::with_capacity(directions.len(), faces.len() * 3);
        for dir in &directions {
            mesh.push_vertex(center + *dir * radius, *dir);
        }
        for [a, b, c] in faces {
            mesh.push_triangle(a, b, c);
        }

        Self {
            center,
            radius,
            subdivisions,
            mesh,
        }
    }

    /// Radius of the sphere
    #[inline]
    pub fn radius(&self) -> f32 {
        self.radius
    }

    /// Tessellation level this sphere was built with
    #[inline]
    pub fn subdivisions(&self) -> u32 {
        self.subdivisions
    }

    /// Expected vertex count for a subdivision level (after clamping)
    pub fn expected_vertex_count(subdivisions: u32) -> usize {
        10 * 4usize.pow(subdivisions.min(MAX_SUBDIVISIONS)) + 2
    }

    /// Expected triangle count for a subdivision level (after clamping)
    pub fn expected_triangle_count(subdivisions: u32) -> usize {
        20 * 4usize.pow(subdivisions.min(MAX_SUBDIVISIONS))
    }

    /// Build unit-sphere directions and faces for the requested level
    fn subdivide(subdivisions: u32) -> (Vec<Vec3>, Vec<[u32; 3]>) {
        let mut vertices: Vec<Vec3> =
            Vec::with_capacity(Self::expected_vertex_count(subdivisions));
        vertices.extend(
            ICOSAHEDRON_VERTICES
                .iter()
                .map(|v| Vec3::from_array(*v).normalized()),
        );
        let mut faces: Vec<[u32; 3]> = ICOSAHEDRON_FACES.to_vec();

        for _ in 0..subdivisions {
            let mut midpoints: HashMap<(u32, u32), u32> =
                HashMap::with_capacity(faces.len() * 3 / 2);
            let mut next = Vec::with_capacity(faces.len() * 4);

            for [a, b, c] in faces {
                let ab = Self::midpoint(&mut vertices, &mut midpoints, a, b);
                let bc = Self::midpoint(&mut vertices, &mut midpoints, b, c);
                let ca = Self::midpoint(&mut vertices, &mut midpoints, c, a);

                next.push([a, ab, ca]);
                next.push([b, bc, ab]);
                next.push([c, ca, bc]);
                next.push([ab, bc, ca]);
            }

            faces = next;
        }

        (vertices, faces)
    }

    /// Index of the (shared) midpoint vertex of edge `a`-`b`
    fn midpoint(
        vertices: &mut Vec<Vec3>,
        cache: &mut HashMap<(u32, u32), u32>,
        a: u32,
        b: u32,
    ) -> u32 {
        let key = if a < b { (a, b) } else { (b, a) };
        *cache.entry(key).or_insert_with(|| {
            let mid = vertices[a as usize]
                .midpoint(vertices[b as usize])
                .normalized();
            vertices.push(mid);
            (vertices.len() - 1) as u32
        })
    }
}

impl Mesh for Icosphere {
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
    fn test_base_icosahedron() {
        let sphere = Icosphere::new(Vec3::ZERO, 1.0, 0);
        assert_eq!(sphere.vertex_count(), 12);
        assert_eq!(sphere.mesh_data().triangle_count(), 20);
    }

    #[test]
    fn test_counts_per_level() {
        for level in 0..=4 {
            let sphere = Icosphere::new(Vec3::ZERO, 1.0, level);
            assert_eq!(
                sphere.vertex_count(),
                Icosphere::expected_vertex_count(level),
                "vertex count at level {}", level
            );
            assert_eq!(
                sphere.mesh_data().triangle_count(),
                Icosphere::expected_triangle_count(level),
                "triangle count at level {}", level
            );
            assert!(sphere.mesh_data().is_valid());
        }
    }

    #[test]
    fn test_vertices_on_sphere() {
        let center = Vec3::new(1.0, -2.0, 0.5);
        let sphere = Icosphere::new(center, 2.5, 3);
        for p in &sphere.mesh_data().positions {
            let d = (p.xyz() - center).length();
            assert!((d - 2.5).abs() < 0.0001, "vertex at distance {}", d);
            assert_eq!(p.w, 1.0);
        }
    }

    #[test]
    fn test_normals_unit_and_outward() {
        let sphere = Icosphere::new(Vec3::ZERO, 1.0, 2);
        let mesh = sphere.mesh_data();
        for (p, n) in mesh.positions.iter().zip(&mesh.normals) {
            assert!((n.xyz().length() - 1.0).abs() < 0.0001);
            assert_eq!(n.w, 0.0);
            assert!(n.xyz().dot(p.xyz()) > 0.0);
        }
    }

    #[test]
    fn test_winding_faces_outward() {
        let sphere = Icosphere::new(Vec3::ZERO, 1.0, 2);
        let mesh = sphere.mesh_data();
        for tri in mesh.indices.chunks(3) {
            let a = mesh.positions[tri[0] as usize].xyz();
            let b = mesh.positions[tri[1] as usize].xyz();
            let c = mesh.positions[tri[2] as usize].xyz();
            let face_normal = (b - a).cross(c - a);
            let centroid = (a + b + c) * (1.0 / 3.0);
            assert!(face_normal.dot(centroid) > 0.0, "triangle {:?} faces inward", tri);
        }
    }

    #[test]
    fn test_accessors() {
        let sphere = Icosphere::new(Vec3::new(0.0, 1.0, 0.0), 3.0, 1);
        assert_eq!(sphere.radius(), 3.0);
        assert_eq!(sphere.subdivisions(), 1);
        assert_eq!(sphere.center(), Vec3::new(0.0, 1.0, 0.0));
    }

    #[test]
    fn test_level_clamped_to_max() {
        let sphere = Icosphere::new(Vec3::ZERO, 1.0, 40);
        assert_eq!(sphere.subdivisions(), MAX_SUBDIVISIONS);
        assert_eq!(
            sphere.vertex_count(),
            Icosphere::expected_vertex_count(MAX_SUBDIVISIONS)
        );
        assert_eq!(
            Icosphere::expected_triangle_count(u32::MAX),
            Icosphere::expected_triangle_count(MAX_SUBDIVISIONS)
        );
    }
}
