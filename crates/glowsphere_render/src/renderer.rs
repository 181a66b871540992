//! Frame-level drawing
//!
//! A frame is acquired from the surface, cleared once, then any number of
//! [`Renderer::render`] calls each record a pass that draws a list of
//! drawables with one program. Finally the frame is submitted and presented.

use glowsphere_math::{mat4, Vec3, Vec4};

use crate::camera::Camera;
use crate::context::RenderContext;
use crate::drawable::Drawable;
use crate::pipeline::{ProgramCache, ShaderProgram, DEPTH_FORMAT};

/// A surface texture being recorded into
pub struct Frame {
    pub encoder: wgpu::CommandEncoder,
    pub view: wgpu::TextureView,
    surface_texture: wgpu::SurfaceTexture,
}

/// Clears the frame and draws drawables with shader programs
pub struct Renderer {
    clear_color: wgpu::Color,
    depth_view: wgpu::TextureView,
    size: (u32, u32),
    cache: ProgramCache,
}

impl Renderer {
    pub fn new(device: &wgpu::Device, width: u32, height: u32) -> Self {
        let size = (width.max(1), height.max(1));
        Self {
            clear_color: wgpu::Color::BLACK,
            depth_view: Self::create_depth_view(device, size),
            size,
            cache: ProgramCache::new(),
        }
    }

    fn create_depth_view(device: &wgpu::Device, (width, height): (u32, u32)) -> wgpu::TextureView {
        let depth_texture = device.create_texture(&wgpu::TextureDescriptor {
            label: Some("Depth Texture"),
            size: wgpu::Extent3d {
                width,
                height,
                depth_or_array_layers: 1,
            },
            mip_level_count: 1,
            sample_count: 1,
            dimension: wgpu::TextureDimension::D2,
            format: DEPTH_FORMAT,
            usage: wgpu::TextureUsages::RENDER_ATTACHMENT,
            view_formats: &[],
        });
        depth_texture.create_view(&wgpu::TextureViewDescriptor::default())
    }

    /// Colour the frame is cleared to
    pub fn set_clear_color(&mut self, r: f64, g: f64, b: f64, a: f64) {
        self.clear_color = wgpu::Color { r, g, b, a };
    }

    /// Resize the depth buffer to match the viewport
    pub fn set_size(&mut self, device: &wgpu::Device, width: u32, height: u32) {
        let size = (width.max(1), height.max(1));
        if size != self.size {
            self.depth_view = Self::create_depth_view(device, size);
            self.size = size;
        }
    }

    pub fn size(&self) -> (u32, u32) {
        self.size
    }

    /// Acquire the next surface texture
    pub fn begin_frame(&self, context: &RenderContext) -> Result<Frame, wgpu::SurfaceError> {
        let surface_texture = context.surface.get_current_texture()?;
        let view = surface_texture
            .texture
            .create_view(&wgpu::TextureViewDescriptor::default());
        let encoder = context
            .device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor {
                label: Some("Frame Encoder"),
            });

        Ok(Frame {
            encoder,
            view,
            surface_texture,
        })
    }

    /// Clear colour and depth
    pub fn clear(&self, frame: &mut Frame) {
        let _pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some("Clear Pass"),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Clear(self.clear_color),
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Clear(1.0),
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });
    }

    /// Draw `drawables` with `program`
    ///
    /// Sets the identity model matrix, the camera's view-projection and
    /// position, `color`, `time` and `world_origin` on the program before
    /// drawing. Other uniforms keep whatever the caller staged.
    #[allow(clippy::too_many_arguments)]
    pub fn render(
        &mut self,
        queue: &wgpu::Queue,
        frame: &mut Frame,
        camera: &Camera,
        program: &mut ShaderProgram,
        drawables: &[&Drawable],
        color: Vec4,
        time: f32,
        world_origin: Vec3,
    ) {
        let uniforms = program.uniforms_mut();
        uniforms.set_model_matrix(mat4::IDENTITY);
        uniforms.set_view_proj_matrix(camera.view_proj());
        uniforms.set_cam_pos(camera.position);
        uniforms.set_geometry_color(color);
        uniforms.set_time(time);
        uniforms.set_world_origin(world_origin);

        let mut pass = frame.encoder.begin_render_pass(&wgpu::RenderPassDescriptor {
            label: Some(program.label()),
            color_attachments: &[Some(wgpu::RenderPassColorAttachment {
                view: &frame.view,
                resolve_target: None,
                ops: wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                },
            })],
            depth_stencil_attachment: Some(wgpu::RenderPassDepthStencilAttachment {
                view: &self.depth_view,
                depth_ops: Some(wgpu::Operations {
                    load: wgpu::LoadOp::Load,
                    store: wgpu::StoreOp::Store,
                }),
                stencil_ops: None,
            }),
            timestamp_writes: None,
            occlusion_query_set: None,
        });

        self.cache.reset();
        for drawable in drawables {
            program.draw(queue, &mut pass, &mut self.cache, drawable);
        }
    }

    /// Submit the frame's commands (after `extra`) and present it
    pub fn finish(
        &self,
        context: &RenderContext,
        frame: Frame,
        extra: Vec<wgpu::CommandBuffer>,
    ) {
        let Frame {
            encoder,
            surface_texture,
            ..
        } = frame;
        context
            .queue
            .submit(extra.into_iter().chain(std::iter::once(encoder.finish())));
        surface_texture.present();
    }
}
