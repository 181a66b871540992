//! GPU-compatible data types for the shader programs
//!
//! These types are designed to match the shader layouts exactly.
//! All types derive Pod and Zeroable for safe GPU buffer operations.

use bytemuck::{Pod, Zeroable};
use glowsphere_math::{mat4, Mat4};

/// Depth buffer format shared by the renderer and every program
pub const DEPTH_FORMAT: wgpu::TextureFormat = wgpu::TextureFormat::Depth32Float;

/// Number of draws a program can record per frame before slots are reused
pub const MAX_DRAWS_PER_FRAME: u32 = 16;

/// Size of one per-vertex attribute (`vec4<f32>`)
pub const ATTRIBUTE_STRIDE: wgpu::BufferAddress =
    std::mem::size_of::<[f32; 4]>() as wgpu::BufferAddress;

/// Uniform block shared by every shader program
///
/// Matches `ShaderUniforms` in `shaders/common.wgsl`. Vectors are stored as
/// `vec4` to avoid the `vec3` alignment rules; `cam_pos` and `world_origin`
/// carry `w = 1`.
#[repr(C)]
#[derive(Clone, Copy, Debug, Pod, Zeroable)]
pub struct ShaderUniforms {
    /// Model matrix
    pub model: Mat4,
    /// Inverse-transpose of the model matrix (for normals)
    pub model_inv_tr: Mat4,
    /// Projection * view
    pub view_proj: Mat4,
    /// Base colour (RGBA, 0..1)
    pub color: [f32; 4],
    /// Camera position in world space
    pub cam_pos: [f32; 4],
    /// World origin the noise field is anchored to
    pub world_origin: [f32; 4],
    /// Frame counter
    pub time: f32,
    pub frequency: f32,
    pub amplitude: f32,
    pub glow: f32,
    pub ambient: f32,
    /// Padding to a 16-byte multiple
    pub _padding: [f32; 3],
}

impl Default for ShaderUniforms {
    fn default() -> Self {
        Self {
            model: mat4::IDENTITY,
            model_inv_tr: mat4::IDENTITY,
            view_proj: mat4::IDENTITY,
            color: [1.0; 4],
            cam_pos: [0.0, 0.0, 0.0, 1.0],
            world_origin: [0.0, 0.0, 0.0, 1.0],
            time: 0.0,
            frequency: 1.0,
            amplitude: 0.0,
            glow: 1.0,
            ambient: 0.0,
            _padding: [0.0; 3],
        }
    }
}

/// Round `size` up to a multiple of `alignment`
pub fn align_to(size: u64, alignment: u64) -> u64 {
    if alignment == 0 {
        return size;
    }
    size.div_ceil(alignment) * alignment
}
