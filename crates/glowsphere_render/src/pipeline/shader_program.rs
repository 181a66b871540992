//! Linked shader programs
//!
//! A [`ShaderProgram`] pairs a vertex and a fragment [`Shader`] into a render
//! pipeline and owns the uniform block both stages read. Uniform values are
//! staged on the CPU and copied into a per-draw slot of a dynamic-offset
//! uniform buffer when a drawable is drawn, so several draws with different
//! uniforms can share one render pass.

use std::num::NonZeroU64;
use std::sync::atomic::{AtomicU64, Ordering};

use glowsphere_math::{mat4, Mat4, Vec3, Vec4};

use super::shader::{AttributeFlags, Shader, ShaderError, ShaderStage, UniformFlags};
use super::types::{align_to, ShaderUniforms, ATTRIBUTE_STRIDE, DEPTH_FORMAT, MAX_DRAWS_PER_FRAME};
use crate::drawable::Drawable;

static NEXT_PROGRAM_ID: AtomicU64 = AtomicU64::new(1);

const PIPELINE_TOPOLOGY: wgpu::PrimitiveTopology = wgpu::PrimitiveTopology::TriangleList;

/// Unique identity of a linked program
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ProgramId(u64);

impl ProgramId {
    fn next() -> Self {
        Self(NEXT_PROGRAM_ID.fetch_add(1, Ordering::Relaxed))
    }
}

/// Tracks which program is bound on the current render pass
///
/// Binding a pipeline is skipped when the requested program is already the
/// active one. Reset the cache whenever a new pass begins.
#[derive(Debug, Default)]
pub struct ProgramCache {
    active: Option<ProgramId>,
    switches: u32,
}

impl ProgramCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make `id` the active program
    ///
    /// Returns true if the caller must bind the pipeline (it was not active).
    pub fn activate(&mut self, id: ProgramId) -> bool {
        if self.active == Some(id) {
            return false;
        }
        self.active = Some(id);
        self.switches += 1;
        true
    }

    /// Currently active program, if any
    pub fn active(&self) -> Option<ProgramId> {
        self.active
    }

    /// Number of pipeline binds since the last reset
    pub fn switches(&self) -> u32 {
        self.switches
    }

    /// Forget the active program (new render pass)
    pub fn reset(&mut self) {
        self.active = None;
        self.switches = 0;
    }
}

/// Staged uniform values of a program
///
/// Setters only write uniforms the program's shaders actually read; the rest
/// are silently ignored.
#[derive(Clone, Debug)]
pub struct ProgramUniforms {
    active: UniformFlags,
    values: ShaderUniforms,
}

impl ProgramUniforms {
    pub fn new(active: UniformFlags) -> Self {
        Self {
            active,
            values: ShaderUniforms::default(),
        }
    }

    /// Uniforms the program reads
    pub fn active(&self) -> UniformFlags {
        self.active
    }

    /// Values that will be uploaded with the next draw
    pub fn values(&self) -> &ShaderUniforms {
        &self.values
    }

    /// Set the model matrix and its inverse-transpose
    ///
    /// A singular model leaves the normal matrix unchanged.
    pub fn set_model_matrix(&mut self, model: Mat4) {
        if self.active.contains(UniformFlags::MODEL) {
            self.values.model = model;
        }
        if self.active.contains(UniformFlags::MODEL_INV_TR) {
            match mat4::inverse_transpose(model) {
                Some(inv_tr) => self.values.model_inv_tr = inv_tr,
                None => log::warn!("Model matrix is singular, keeping previous normal matrix"),
            }
        }
    }

    pub fn set_view_proj_matrix(&mut self, view_proj: Mat4) {
        if self.active.contains(UniformFlags::VIEW_PROJ) {
            self.values.view_proj = view_proj;
        }
    }

    pub fn set_geometry_color(&mut self, color: Vec4) {
        if self.active.contains(UniformFlags::COLOR) {
            self.values.color = color.to_array();
        }
    }

    pub fn set_time(&mut self, time: f32) {
        if self.active.contains(UniformFlags::TIME) {
            self.values.time = time;
        }
    }

    pub fn set_cam_pos(&mut self, position: Vec3) {
        if self.active.contains(UniformFlags::CAM_POS) {
            self.values.cam_pos = Vec4::point(position).to_array();
        }
    }

    pub fn set_world_origin(&mut self, origin: Vec3) {
        if self.active.contains(UniformFlags::WORLD_ORIGIN) {
            self.values.world_origin = Vec4::point(origin).to_array();
        }
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        if self.active.contains(UniformFlags::FREQUENCY) {
            self.values.frequency = frequency;
        }
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        if self.active.contains(UniformFlags::AMPLITUDE) {
            self.values.amplitude = amplitude;
        }
    }

    pub fn set_glow(&mut self, glow: f32) {
        if self.active.contains(UniformFlags::GLOW) {
            self.values.glow = glow;
        }
    }

    pub fn set_ambient(&mut self, ambient: f32) {
        if self.active.contains(UniformFlags::AMBIENT) {
            self.values.ambient = ambient;
        }
    }
}

/// Hands out per-draw uniform slots within a frame
#[derive(Debug)]
pub struct SlotAllocator {
    next: u32,
    capacity: u32,
    overflowed: bool,
}

impl SlotAllocator {
    pub fn new(capacity: u32) -> Self {
        Self {
            next: 0,
            capacity: capacity.max(1),
            overflowed: false,
        }
    }

    /// Start handing out slots from the beginning
    pub fn begin_frame(&mut self) {
        self.next = 0;
        self.overflowed = false;
    }

    /// Next free slot
    ///
    /// Once the frame runs out of slots the last one is reused, so later
    /// draws overwrite each other's uniforms.
    pub fn allocate(&mut self) -> u32 {
        if self.next < self.capacity {
            let slot = self.next;
            self.next += 1;
            return slot;
        }
        if !self.overflowed {
            self.overflowed = true;
            log::warn!(
                "More than {} draws this frame, reusing the last uniform slot",
                self.capacity
            );
        }
        self.capacity - 1
    }

    /// Whether this frame ran out of slots
    pub fn overflowed(&self) -> bool {
        self.overflowed
    }
}

/// A linked vertex + fragment shader pair
pub struct ShaderProgram {
    id: ProgramId,
    label: String,
    pipeline: wgpu::RenderPipeline,
    uniform_buffer: wgpu::Buffer,
    bind_group: wgpu::BindGroup,
    slot_stride: u64,
    slots: SlotAllocator,
    uniforms: ProgramUniforms,
    /// Attributes in vertex-buffer slot order
    attributes: Vec<AttributeFlags>,
    warned_missing_attributes: bool,
}

impl ShaderProgram {
    /// Link shaders into a program
    ///
    /// `shaders` must contain one vertex and one fragment shader.
    pub fn new(
        device: &wgpu::Device,
        label: &str,
        shaders: &[&Shader],
        color_format: wgpu::TextureFormat,
    ) -> Result<Self, ShaderError> {
        let find_stage = |stage: ShaderStage| {
            shaders
                .iter()
                .copied()
                .find(|s| s.stage() == stage)
                .ok_or_else(|| ShaderError::MissingStage {
                    label: label.to_string(),
                    stage,
                })
        };
        let vertex = find_stage(ShaderStage::Vertex)?;
        let fragment = find_stage(ShaderStage::Fragment)?;
        log::debug!(
            "Linking program '{}' from '{}' and '{}'",
            label,
            vertex.label(),
            fragment.label()
        );

        let active_uniforms = vertex.uniforms() | fragment.uniforms();
        let attributes: Vec<AttributeFlags> = vertex.attributes().iter().collect();

        let uniform_size = std::mem::size_of::<ShaderUniforms>() as u64;
        let slot_stride = align_to(
            uniform_size,
            device.limits().min_uniform_buffer_offset_alignment as u64,
        );

        device.push_error_scope(wgpu::ErrorFilter::Validation);

        let bind_group_layout = device.create_bind_group_layout(&wgpu::BindGroupLayoutDescriptor {
            label: Some(&format!("{} Bind Group Layout", label)),
            entries: &[
                // Uniforms, one slot per draw
                wgpu::BindGroupLayoutEntry {
                    binding: 0,
                    visibility: wgpu::ShaderStages::VERTEX | wgpu::ShaderStages::FRAGMENT,
                    ty: wgpu::BindingType::Buffer {
                        ty: wgpu::BufferBindingType::Uniform,
                        has_dynamic_offset: true,
                        min_binding_size: NonZeroU64::new(uniform_size),
                    },
                    count: None,
                },
            ],
        });

        let pipeline_layout = device.create_pipeline_layout(&wgpu::PipelineLayoutDescriptor {
            label: Some(&format!("{} Pipeline Layout", label)),
            bind_group_layouts: &[&bind_group_layout],
            push_constant_ranges: &[],
        });

        // One tightly packed vec4 buffer per attribute
        let vertex_attributes: Vec<[wgpu::VertexAttribute; 1]> = attributes
            .iter()
            .map(|attr| {
                [wgpu::VertexAttribute {
                    format: wgpu::VertexFormat::Float32x4,
                    offset: 0,
                    shader_location: attr.location().unwrap_or(0),
                }]
            })
            .collect();
        let buffer_layouts: Vec<wgpu::VertexBufferLayout> = vertex_attributes
            .iter()
            .map(|attrs| wgpu::VertexBufferLayout {
                array_stride: ATTRIBUTE_STRIDE,
                step_mode: wgpu::VertexStepMode::Vertex,
                attributes: attrs,
            })
            .collect();

        let pipeline = device.create_render_pipeline(&wgpu::RenderPipelineDescriptor {
            label: Some(label),
            layout: Some(&pipeline_layout),
            vertex: wgpu::VertexState {
                module: vertex.module(),
                entry_point: Some(ShaderStage::Vertex.entry_point()),
                buffers: &buffer_layouts,
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            },
            fragment: Some(wgpu::FragmentState {
                module: fragment.module(),
                entry_point: Some(ShaderStage::Fragment.entry_point()),
                targets: &[Some(wgpu::ColorTargetState {
                    format: color_format,
                    blend: Some(wgpu::BlendState::REPLACE),
                    write_mask: wgpu::ColorWrites::ALL,
                })],
                compilation_options: wgpu::PipelineCompilationOptions::default(),
            }),
            primitive: wgpu::PrimitiveState {
                topology: PIPELINE_TOPOLOGY,
                strip_index_format: None,
                front_face: wgpu::FrontFace::Ccw,
                cull_mode: None,
                unclipped_depth: false,
                polygon_mode: wgpu::PolygonMode::Fill,
                conservative: false,
            },
            // LessEqual so a later program wins where it coincides with an earlier one
            depth_stencil: Some(wgpu::DepthStencilState {
                format: DEPTH_FORMAT,
                depth_write_enabled: true,
                depth_compare: wgpu::CompareFunction::LessEqual,
                stencil: wgpu::StencilState::default(),
                bias: wgpu::DepthBiasState::default(),
            }),
            multisample: wgpu::MultisampleState {
                count: 1,
                mask: !0,
                alpha_to_coverage_enabled: false,
            },
            multiview: None,
            cache: None,
        });

        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            let log = error.to_string();
            log::error!("Program '{}' failed to link:\n{}", label, log);
            return Err(ShaderError::Link {
                label: label.to_string(),
                log,
            });
        }

        let uniform_buffer = device.create_buffer(&wgpu::BufferDescriptor {
            label: Some(&format!("{} Uniform Buffer", label)),
            size: slot_stride * MAX_DRAWS_PER_FRAME as u64,
            usage: wgpu::BufferUsages::UNIFORM | wgpu::BufferUsages::COPY_DST,
            mapped_at_creation: false,
        });

        let bind_group = device.create_bind_group(&wgpu::BindGroupDescriptor {
            label: Some(&format!("{} Bind Group", label)),
            layout: &bind_group_layout,
            entries: &[wgpu::BindGroupEntry {
                binding: 0,
                resource: wgpu::BindingResource::Buffer(wgpu::BufferBinding {
                    buffer: &uniform_buffer,
                    offset: 0,
                    size: NonZeroU64::new(uniform_size),
                }),
            }],
        });

        log::debug!(
            "Linked program '{}' (uniforms {:?}, attributes {:?})",
            label,
            active_uniforms,
            vertex.attributes()
        );

        Ok(Self {
            id: ProgramId::next(),
            label: label.to_string(),
            pipeline,
            uniform_buffer,
            bind_group,
            slot_stride,
            slots: SlotAllocator::new(MAX_DRAWS_PER_FRAME),
            uniforms: ProgramUniforms::new(active_uniforms),
            attributes,
            warned_missing_attributes: false,
        })
    }

    pub fn id(&self) -> ProgramId {
        self.id
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    /// Attributes the vertex stage declares
    pub fn attributes(&self) -> AttributeFlags {
        self.attributes
            .iter()
            .fold(AttributeFlags::empty(), |acc, a| acc | *a)
    }

    /// Staged uniform values
    pub fn uniforms(&self) -> &ProgramUniforms {
        &self.uniforms
    }

    /// Mutable access to the staged uniform values
    pub fn uniforms_mut(&mut self) -> &mut ProgramUniforms {
        &mut self.uniforms
    }

    /// Start a new frame of uniform slots
    pub fn begin_frame(&mut self) {
        self.slots.begin_frame();
    }

    /// Bind this program's pipeline unless it is already active
    pub fn use_program(&self, pass: &mut wgpu::RenderPass<'_>, cache: &mut ProgramCache) {
        if cache.activate(self.id) {
            pass.set_pipeline(&self.pipeline);
        }
    }

    /// Draw a drawable with the currently staged uniforms
    ///
    /// Drawables with no indices are skipped, as are drawables missing an
    /// attribute this program's vertex shader declares.
    pub fn draw(
        &mut self,
        queue: &wgpu::Queue,
        pass: &mut wgpu::RenderPass<'_>,
        cache: &mut ProgramCache,
        drawable: &Drawable,
    ) {
        if drawable.elem_count() == 0 {
            return;
        }
        if drawable.draw_mode() != PIPELINE_TOPOLOGY {
            log::warn!(
                "Program '{}' cannot draw '{}' as {:?}",
                self.label,
                drawable.label(),
                drawable.draw_mode()
            );
            return;
        }

        let missing = self.attributes() - drawable.attributes();
        if !missing.is_empty() {
            if !self.warned_missing_attributes {
                self.warned_missing_attributes = true;
                log::warn!(
                    "Program '{}' skipped drawable '{}': missing attributes {:?}",
                    self.label,
                    drawable.label(),
                    missing
                );
            }
            return;
        }

        self.use_program(pass, cache);

        let offset = self.slots.allocate() as u64 * self.slot_stride;
        queue.write_buffer(
            &self.uniform_buffer,
            offset,
            bytemuck::bytes_of(self.uniforms.values()),
        );
        pass.set_bind_group(0, &self.bind_group, &[offset as u32]);

        for (slot, attr) in self.attributes.iter().enumerate() {
            if let Some(buffer) = drawable.attribute_buffer(*attr) {
                pass.set_vertex_buffer(slot as u32, buffer.slice(..));
            }
        }
        pass.set_index_buffer(drawable.index_buffer().slice(..), wgpu::IndexFormat::Uint32);
        pass.draw_indexed(0..drawable.elem_count(), 0, 0..1);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cache_skips_rebind() {
        let a = ProgramId::next();
        let b = ProgramId::next();
        let mut cache = ProgramCache::new();

        assert!(cache.activate(a));
        assert!(!cache.activate(a));
        assert!(cache.activate(b));
        assert!(cache.activate(a));
        assert_eq!(cache.switches(), 3);
        assert_eq!(cache.active(), Some(a));
    }

    #[test]
    fn test_cache_reset_forces_rebind() {
        let a = ProgramId::next();
        let mut cache = ProgramCache::new();
        cache.activate(a);
        cache.reset();
        assert_eq!(cache.active(), None);
        assert!(cache.activate(a));
    }

    #[test]
    fn test_program_ids_unique() {
        assert_ne!(ProgramId::next(), ProgramId::next());
    }

    #[test]
    fn test_setters_ignore_inactive_uniforms() {
        let mut u = ProgramUniforms::new(UniformFlags::COLOR | UniformFlags::TIME);
        u.set_geometry_color(Vec4::new(1.0, 0.5, 0.0, 1.0));
        u.set_time(42.0);
        u.set_frequency(3.0);
        u.set_glow(9.0);

        let defaults = ShaderUniforms::default();
        assert_eq!(u.values().color, [1.0, 0.5, 0.0, 1.0]);
        assert_eq!(u.values().time, 42.0);
        assert_eq!(u.values().frequency, defaults.frequency);
        assert_eq!(u.values().glow, defaults.glow);
    }

    #[test]
    fn test_model_matrix_sets_inverse_transpose() {
        let mut u = ProgramUniforms::new(UniformFlags::MODEL | UniformFlags::MODEL_INV_TR);
        let model = mat4::scale(2.0);
        u.set_model_matrix(model);
        assert_eq!(u.values().model, model);
        assert!((u.values().model_inv_tr[0][0] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn test_singular_model_keeps_normal_matrix() {
        let mut u = ProgramUniforms::new(UniformFlags::MODEL | UniformFlags::MODEL_INV_TR);
        u.set_model_matrix(mat4::scale(0.0));
        assert_eq!(u.values().model_inv_tr, mat4::IDENTITY);
    }

    #[test]
    fn test_points_carry_w_one() {
        let mut u = ProgramUniforms::new(UniformFlags::CAM_POS | UniformFlags::WORLD_ORIGIN);
        u.set_cam_pos(Vec3::new(0.0, 0.0, 5.0));
        u.set_world_origin(Vec3::ZERO);
        assert_eq!(u.values().cam_pos, [0.0, 0.0, 5.0, 1.0]);
        assert_eq!(u.values().world_origin, [0.0, 0.0, 0.0, 1.0]);
    }

    #[test]
    fn test_slot_allocator_reuses_last_slot() {
        let mut slots = SlotAllocator::new(2);
        assert_eq!(slots.allocate(), 0);
        assert_eq!(slots.allocate(), 1);
        assert!(!slots.overflowed());
        assert_eq!(slots.allocate(), 1);
        assert!(slots.overflowed());

        slots.begin_frame();
        assert!(!slots.overflowed());
        assert_eq!(slots.allocate(), 0);
    }
}
