//! GPU rendering system
//!
//! Manages GPU rendering including:
//! - Render context and surface
//! - The noise and background shader programs
//! - Frame rendering

use std::sync::Arc;
use winit::window::Window;
use glowsphere_render::{
    camera::Camera,
    context::{ContextError, RenderContext},
    pipeline::{Shader, ShaderError, ShaderProgram, ShaderStage},
    shaders, Renderer, Vec3, Vec4,
};
use crate::config::RenderingConfig;
use crate::controls::Controls;
use crate::scene::Scene;
use super::GuiSystem;

/// Render error types
#[derive(Debug)]
pub enum RenderError {
    /// GPU could not be initialised
    Context(ContextError),
    /// A built-in shader failed to compile or link
    Shader(ShaderError),
    /// Surface was lost or outdated (it has been reconfigured)
    SurfaceLost,
    /// GPU out of memory
    OutOfMemory,
    /// Other surface error
    Other(String),
}

impl std::fmt::Display for RenderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RenderError::Context(e) => write!(f, "{}", e),
            RenderError::Shader(e) => write!(f, "{}", e),
            RenderError::SurfaceLost => write!(f, "Surface lost"),
            RenderError::OutOfMemory => write!(f, "Out of memory"),
            RenderError::Other(msg) => write!(f, "Render error: {}", msg),
        }
    }
}

impl std::error::Error for RenderError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            RenderError::Context(e) => Some(e),
            RenderError::Shader(e) => Some(e),
            _ => None,
        }
    }
}

impl From<ContextError> for RenderError {
    fn from(e: ContextError) -> Self {
        RenderError::Context(e)
    }
}

impl From<ShaderError> for RenderError {
    fn from(e: ShaderError) -> Self {
        RenderError::Shader(e)
    }
}

/// Manages GPU rendering
pub struct RenderSystem {
    context: RenderContext,
    renderer: Renderer,
    noise_program: ShaderProgram,
    background_program: ShaderProgram,
    background_color: Vec4,
}

impl RenderSystem {
    /// Create render system from window and config
    ///
    /// Fails if no GPU is available or a built-in shader does not compile.
    pub fn new(
        window: Arc<Window>,
        config: &RenderingConfig,
        vsync: bool,
    ) -> Result<Self, RenderError> {
        let context = pollster::block_on(RenderContext::with_vsync(window, vsync))?;

        let mut renderer = Renderer::new(
            &context.device,
            context.config.width,
            context.config.height,
        );
        let [r, g, b, a] = config.clear_color;
        renderer.set_clear_color(r as f64, g as f64, b as f64, a as f64);

        let noise_program = Self::build_program(
            &context,
            "Noise",
            &shaders::noise_vertex(),
            &shaders::noise_fragment(),
        )?;
        let background_program = Self::build_program(
            &context,
            "Background",
            &shaders::lambert_vertex(),
            &shaders::background_fragment(),
        )?;

        Ok(Self {
            context,
            renderer,
            noise_program,
            background_program,
            background_color: Vec4::from(config.background_color),
        })
    }

    fn build_program(
        context: &RenderContext,
        label: &str,
        vertex_source: &str,
        fragment_source: &str,
    ) -> Result<ShaderProgram, ShaderError> {
        let device = &context.device;
        let vertex = Shader::new(
            device,
            ShaderStage::Vertex,
            &format!("{} Vertex", label),
            vertex_source,
        )?;
        let fragment = Shader::new(
            device,
            ShaderStage::Fragment,
            &format!("{} Fragment", label),
            fragment_source,
        )?;
        ShaderProgram::new(device, label, &[&vertex, &fragment], context.format())
    }

    pub fn device(&self) -> &wgpu::Device {
        &self.context.device
    }

    pub fn queue(&self) -> &wgpu::Queue {
        &self.context.queue
    }

    /// Surface texture format
    pub fn format(&self) -> wgpu::TextureFormat {
        self.context.format()
    }

    /// Handle window resize
    pub fn resize(&mut self, width: u32, height: u32) {
        self.context
            .resize(winit::dpi::PhysicalSize::new(width, height));
        self.renderer.set_size(&self.context.device, width, height);
    }

    /// Width / height of the surface
    pub fn aspect_ratio(&self) -> f32 {
        self.context.aspect_ratio()
    }

    /// Get current surface size
    pub fn size(&self) -> (u32, u32) {
        (self.context.config.width, self.context.config.height)
    }

    /// Render a single frame
    ///
    /// Draws the icosphere with the background program, then again with the
    /// noise program, then paints the GUI laid out earlier this frame.
    pub fn render_frame(
        &mut self,
        camera: &Camera,
        scene: &Scene,
        controls: &Controls,
        time: f32,
        gui: &mut GuiSystem,
    ) -> Result<(), RenderError> {
        let mut frame = match self.renderer.begin_frame(&self.context) {
            Ok(frame) => frame,
            Err(wgpu::SurfaceError::Lost | wgpu::SurfaceError::Outdated) => {
                self.context.reconfigure();
                return Err(RenderError::SurfaceLost);
            }
            Err(wgpu::SurfaceError::OutOfMemory) => return Err(RenderError::OutOfMemory),
            Err(e) => return Err(RenderError::Other(format!("{:?}", e))),
        };

        self.noise_program.begin_frame();
        self.background_program.begin_frame();
        self.renderer.clear(&mut frame);

        let noise = self.noise_program.uniforms_mut();
        noise.set_frequency(controls.frequency);
        noise.set_amplitude(controls.amplitude);
        noise.set_glow(controls.glow);
        noise.set_ambient(controls.ambient);

        let base_color = controls.base_color();
        noise.set_geometry_color(base_color);
        self.background_program
            .uniforms_mut()
            .set_geometry_color(base_color);

        let world_origin = Vec3::ZERO;
        let drawables = [scene.icosphere()];

        self.renderer.render(
            &self.context.queue,
            &mut frame,
            camera,
            &mut self.background_program,
            &drawables,
            self.background_color,
            time,
            world_origin,
        );
        self.renderer.render(
            &self.context.queue,
            &mut frame,
            camera,
            &mut self.noise_program,
            &drawables,
            base_color,
            time,
            world_origin,
        );

        let (width, height) = self.size();
        let gui_commands = gui.paint(
            &self.context.device,
            &self.context.queue,
            &mut frame,
            [width, height],
        );

        self.renderer.finish(&self.context, frame, gui_commands);
        Ok(())
    }
}
