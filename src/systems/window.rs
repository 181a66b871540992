//! Application window
//!
//! Owns the winit window shared with the render context. The title carries
//! the live tessellation level and frame rate.

use std::sync::Arc;
use winit::{
    dpi::LogicalSize,
    event_loop::ActiveEventLoop,
    window::{Fullscreen, Window, WindowAttributes},
};
use crate::config::WindowConfig;

/// Smallest size the surface is allowed to shrink to
const MIN_SIZE: LogicalSize<u32> = LogicalSize::new(320, 240);

pub struct WindowSystem {
    window: Arc<Window>,
    title: TitleFormat,
}

impl WindowSystem {
    pub fn create(
        event_loop: &ActiveEventLoop,
        config: &WindowConfig,
    ) -> Result<Self, WindowError> {
        let window = event_loop
            .create_window(attributes(config))
            .map_err(|e| WindowError::CreationFailed(e.to_string()))?;

        let size = window.inner_size();
        log::info!("Window created: {}x{} physical pixels", size.width, size.height);

        Ok(Self {
            window: Arc::new(window),
            title: TitleFormat::new(&config.title),
        })
    }

    /// Shared handle, also held by the surface
    pub fn window(&self) -> &Arc<Window> {
        &self.window
    }

    /// Switch between borderless fullscreen and windowed
    pub fn toggle_fullscreen(&self) {
        let next = match self.window.fullscreen() {
            Some(_) => None,
            None => Some(Fullscreen::Borderless(None)),
        };
        log::debug!("Fullscreen: {}", next.is_some());
        self.window.set_fullscreen(next);
    }

    pub fn update_title(&self, tesselations: u32, fps: f32) {
        self.window.set_title(&self.title.render(tesselations, fps));
    }

    pub fn request_redraw(&self) {
        self.window.request_redraw();
    }
}

fn attributes(config: &WindowConfig) -> WindowAttributes {
    let fullscreen = config.fullscreen.then_some(Fullscreen::Borderless(None));
    Window::default_attributes()
        .with_title(config.title.as_str())
        .with_inner_size(LogicalSize::new(config.width, config.height))
        .with_min_inner_size(MIN_SIZE)
        .with_fullscreen(fullscreen)
}

/// Title text built from a fixed prefix
#[derive(Debug, Clone)]
struct TitleFormat {
    prefix: String,
}

impl TitleFormat {
    fn new(prefix: &str) -> Self {
        Self {
            prefix: prefix.to_string(),
        }
    }

    fn render(&self, tesselations: u32, fps: f32) -> String {
        format!("{} - level {} - {:.0} FPS", self.prefix, tesselations, fps)
    }
}

#[derive(Debug)]
pub enum WindowError {
    CreationFailed(String),
}

impl std::fmt::Display for WindowError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            WindowError::CreationFailed(msg) => write!(f, "Window creation failed: {}", msg),
        }
    }
}

impl std::error::Error for WindowError {}
