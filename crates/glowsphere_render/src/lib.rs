//! glowsphere rendering library
//!
//! This crate provides the wgpu-based layer that draws generated meshes with
//! the noise and background shader programs.
//!
//! ## Key Components
//!
//! - [`context::RenderContext`] - WGPU device, queue, and surface management
//! - [`camera::Camera`] - Orbit camera with view/projection matrices
//! - [`drawable::Drawable`] - Mesh data uploaded to GPU buffers
//! - [`pipeline::ShaderProgram`] - Linked shader pair with cached uniform state
//! - [`renderer::Renderer`] - Clears the frame and draws drawables with a program

pub mod context;
pub mod camera;
pub mod drawable;
pub mod pipeline;
pub mod renderer;
pub mod shaders;

// Re-export math types used in the public API
pub use glowsphere_math::{Vec3, Vec4, Mat4, Mesh, MeshData};

pub use drawable::Drawable;
pub use renderer::{Frame, Renderer};
