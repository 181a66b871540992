//! Mathematics and mesh generation for glowsphere
//!
//! This crate provides the small vector/matrix toolkit used by the camera and
//! shader uniforms, plus CPU-side generators for the meshes the demo draws.
//!
//! ## Core Types
//!
//! - [`Vec3`] - 3D vector
//! - [`Vec4`] - homogeneous 4-component vector
//! - [`Mat4`] - column-major 4x4 matrix
//!
//! ## Meshes
//!
//! - [`Mesh`] - Trait for anything that owns triangle-list [`MeshData`]
//! - [`Icosphere`] - Subdivided icosahedron projected onto a sphere
//! - [`Cube`] - Axis-aligned cube with flat face normals
//! - [`Square`] - Unit quad in the XY plane

mod vec3;
mod vec4;
pub mod mat4;
pub mod mesh;
pub mod icosphere;
pub mod cube;
pub mod square;

pub use vec3::Vec3;
pub use vec4::Vec4;
pub use mat4::Mat4;
pub use mesh::{Mesh, MeshData};
pub use icosphere::Icosphere;
pub use cube::Cube;
pub use square::Square;
