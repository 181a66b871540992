//! Mesh data uploaded to GPU buffers
//!
//! Each attribute lives in its own vertex buffer so a program can bind just
//! the attributes its vertex shader declares.

use wgpu::util::DeviceExt;

use glowsphere_math::{MeshData, Vec4};

use crate::pipeline::AttributeFlags;

/// GPU-side geometry ready to be drawn by a shader program
pub struct Drawable {
    label: String,
    positions: Option<wgpu::Buffer>,
    normals: Option<wgpu::Buffer>,
    colors: Option<wgpu::Buffer>,
    indices: wgpu::Buffer,
    elem_count: u32,
    draw_mode: wgpu::PrimitiveTopology,
}

impl Drawable {
    /// Upload mesh data
    ///
    /// Empty attribute arrays are not uploaded; a mesh without indices
    /// produces a drawable that draws nothing.
    pub fn create(device: &wgpu::Device, mesh: &MeshData, label: &str) -> Self {
        let positions = Self::bind_attribute(device, &mesh.positions, label, "Positions");
        let normals = Self::bind_attribute(device, &mesh.normals, label, "Normals");
        let colors = mesh
            .colors
            .as_deref()
            .and_then(|colors| Self::bind_attribute(device, colors, label, "Colors"));

        // wgpu rejects zero-sized index buffers on some backends, keep a single padding index
        let index_data: &[u32] = if mesh.indices.is_empty() { &[0] } else { &mesh.indices };
        let indices = device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} Indices", label)),
            contents: bytemuck::cast_slice(index_data),
            usage: wgpu::BufferUsages::INDEX,
        });

        log::debug!(
            "Uploaded '{}': {} vertices, {} indices",
            label,
            mesh.vertex_count(),
            mesh.index_count()
        );

        Self {
            label: label.to_string(),
            positions,
            normals,
            colors,
            indices,
            elem_count: mesh.index_count() as u32,
            draw_mode: wgpu::PrimitiveTopology::TriangleList,
        }
    }

    fn bind_attribute(
        device: &wgpu::Device,
        data: &[Vec4],
        label: &str,
        attribute: &str,
    ) -> Option<wgpu::Buffer> {
        if data.is_empty() {
            return None;
        }
        Some(device.create_buffer_init(&wgpu::util::BufferInitDescriptor {
            label: Some(&format!("{} {}", label, attribute)),
            contents: bytemuck::cast_slice(data),
            usage: wgpu::BufferUsages::VERTEX,
        }))
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Number of indices a draw consumes
    pub fn elem_count(&self) -> u32 {
        self.elem_count
    }

    /// Primitive topology of the index list
    pub fn draw_mode(&self) -> wgpu::PrimitiveTopology {
        self.draw_mode
    }

    /// Attributes this drawable has buffers for
    pub fn attributes(&self) -> AttributeFlags {
        let mut flags = AttributeFlags::empty();
        flags.set(AttributeFlags::POS, self.positions.is_some());
        flags.set(AttributeFlags::NOR, self.normals.is_some());
        flags.set(AttributeFlags::COL, self.colors.is_some());
        flags
    }

    /// Buffer for a single attribute, if present
    pub fn attribute_buffer(&self, attribute: AttributeFlags) -> Option<&wgpu::Buffer> {
        if attribute == AttributeFlags::POS {
            self.positions.as_ref()
        } else if attribute == AttributeFlags::NOR {
            self.normals.as_ref()
        } else if attribute == AttributeFlags::COL {
            self.colors.as_ref()
        } else {
            None
        }
    }

    pub fn index_buffer(&self) -> &wgpu::Buffer {
        &self.indices
    }
}
