//! Glowsphere - interactive noise-displaced icosphere
//!
//! Renders a subdivided icosphere twice per frame: once with a lambert
//! background program, once with a noise-displacement program whose
//! parameters are edited live from an on-screen control panel.

use std::time::Instant;
use winit::{
    application::ApplicationHandler,
    event::{DeviceEvent, DeviceId, ElementState, MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    keyboard::{KeyCode, PhysicalKey},
    window::WindowId,
};

use glowsphere::config::AppConfig;
use glowsphere::controls::{Controls, SceneAction};
use glowsphere::scene::Scene;
use glowsphere::systems::{FrameStats, GuiSystem, RenderError, RenderSystem, WindowSystem};
use glowsphere_input::OrbitController;
use glowsphere_render::{camera::Camera, Vec3};

/// Main application state
struct App {
    /// Application configuration
    config: AppConfig,
    /// Values "Reset Scene" returns to
    defaults: Controls,
    /// Live settings edited by the control panel
    controls: Controls,

    window: Option<WindowSystem>,
    render: Option<RenderSystem>,
    gui: Option<GuiSystem>,
    scene: Option<Scene>,

    camera: Camera,
    home_camera: Camera,
    orbit: OrbitController,
    stats: FrameStats,
    /// Frame counter fed to the shaders
    time: f32,
    /// Why start-up failed, returned from `main` once the loop exits
    startup_error: Option<Box<dyn std::error::Error>>,
}

impl App {
    fn new(config: AppConfig) -> Self {
        let defaults = config.controls.to_controls();

        let cam = &config.camera;
        let camera = Camera::new(Vec3::from(cam.position), Vec3::from(cam.target))
            .with_lens(cam.fov, cam.near, cam.far);

        let input = &config.input;
        let orbit = OrbitController::new()
            .with_rotate_speed(input.rotate_speed)
            .with_pan_speed(input.pan_speed)
            .with_zoom_speed(input.zoom_speed)
            .with_distance_limits(input.min_distance, input.max_distance);

        Self {
            defaults,
            controls: defaults,
            window: None,
            render: None,
            gui: None,
            scene: None,
            home_camera: camera.clone(),
            camera,
            orbit,
            stats: FrameStats::new(Instant::now()),
            time: 0.0,
            startup_error: None,
            config,
        }
    }

    /// Create window, GPU state, scene and GUI
    fn init(&mut self, event_loop: &ActiveEventLoop) -> Result<(), Box<dyn std::error::Error>> {
        let window = WindowSystem::create(event_loop, &self.config.window)?;
        let render = RenderSystem::new(
            window.window().clone(),
            &self.config.rendering,
            self.config.window.vsync,
        )?;

        let scene = Scene::load(render.device(), self.controls.tesselations);
        let gui = GuiSystem::new(
            window.window(),
            render.device(),
            render.format(),
            self.config.debug.show_stats,
        );

        self.camera.set_aspect_ratio(render.aspect_ratio());
        self.camera.update_projection_matrix();

        window.request_redraw();
        self.window = Some(window);
        self.render = Some(render);
        self.scene = Some(scene);
        self.gui = Some(gui);
        Ok(())
    }

    /// Viewport and projection follow the window size
    fn resize(&mut self, width: u32, height: u32) {
        if let Some(render) = &mut self.render {
            render.resize(width, height);
            self.camera.set_aspect_ratio(render.aspect_ratio());
            self.camera.update_projection_matrix();
        }
    }

    fn handle_key(&mut self, event_loop: &ActiveEventLoop, key: KeyCode) {
        match key {
            KeyCode::Escape => event_loop.exit(),
            KeyCode::KeyF => {
                if let Some(window) = &self.window {
                    window.toggle_fullscreen();
                }
            }
            KeyCode::KeyR => {
                let aspect = self.camera.aspect;
                self.camera = self.home_camera.clone();
                self.camera.set_aspect_ratio(aspect);
                self.camera.update_projection_matrix();
                log::info!("Camera reset to starting position");
            }
            KeyCode::KeyS => {
                if let Some(gui) = &mut self.gui {
                    let shown = gui.toggle_stats();
                    log::info!("Stats overlay: {}", if shown { "ON" } else { "OFF" });
                }
            }
            _ => {}
        }
    }

    /// Outcome reported by `main` after the event loop returns
    fn into_result(self) -> Result<(), Box<dyn std::error::Error>> {
        match self.startup_error {
            Some(e) => Err(e),
            None => Ok(()),
        }
    }

    /// One iteration of the render loop
    fn frame(&mut self, event_loop: &ActiveEventLoop) {
        let (Some(window), Some(render), Some(gui), Some(scene)) = (
            &self.window,
            &mut self.render,
            &mut self.gui,
            &mut self.scene,
        ) else {
            return;
        };

        self.stats.begin(Instant::now());

        // 1. Camera
        self.orbit.update(&mut self.camera);
        self.camera.update();

        // 2. Control panel
        for action in gui.run(window.window(), &mut self.controls, &self.stats) {
            match action {
                SceneAction::LoadScene => scene.reload(render.device(), self.controls.tesselations),
                SceneAction::ResetScene => {
                    self.controls.reset_from(&self.defaults);
                    log::info!("Settings reset");
                }
            }
        }

        // 3. Rebuild the icosphere if the level changed
        scene.sync_tesselations(render.device(), self.controls.tesselations);

        // 4. Draw
        match render.render_frame(&self.camera, scene, &self.controls, self.time, gui) {
            Ok(()) => {}
            Err(RenderError::SurfaceLost) => log::debug!("Surface reconfigured, skipping frame"),
            Err(RenderError::OutOfMemory) => {
                log::error!("GPU out of memory, exiting");
                event_loop.exit();
                return;
            }
            Err(e) => log::warn!("{}", e),
        }

        self.time += 1.0;
        if self.stats.end(Instant::now()) {
            window.update_title(scene.tesselations(), self.stats.fps());
        }
        window.request_redraw();
    }
}

impl ApplicationHandler for App {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }
        if let Err(e) = self.init(event_loop) {
            log::error!("Start-up failed: {}", e);
            self.startup_error = Some(e);
            event_loop.exit();
        }
    }

    fn window_event(&mut self, event_loop: &ActiveEventLoop, _id: WindowId, event: WindowEvent) {
        let consumed = match (&mut self.gui, &self.window) {
            (Some(gui), Some(window)) => gui.on_window_event(window.window(), &event),
            _ => false,
        };
        let gui_has_pointer = self.gui.as_ref().is_some_and(|gui| gui.wants_pointer());

        match event {
            WindowEvent::CloseRequested => {
                event_loop.exit();
            }

            WindowEvent::Resized(physical_size) => {
                self.resize(physical_size.width, physical_size.height);
            }

            WindowEvent::KeyboardInput { event, .. } => {
                if consumed || event.state != ElementState::Pressed {
                    return;
                }
                if let PhysicalKey::Code(key) = event.physical_key {
                    self.handle_key(event_loop, key);
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                // Releases always reach the controller so a drag cannot get stuck
                if state == ElementState::Released || !(consumed || gui_has_pointer) {
                    self.orbit.process_mouse_button(button, state);
                }
            }

            // Button releases outside the window never arrive
            WindowEvent::Focused(false) | WindowEvent::CursorLeft { .. } => {
                self.orbit.release();
            }

            WindowEvent::MouseWheel { delta, .. } => {
                if consumed || gui_has_pointer {
                    return;
                }
                let scroll = match delta {
                    MouseScrollDelta::LineDelta(_, y) => y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                };
                self.orbit.process_scroll(scroll);
            }

            WindowEvent::RedrawRequested => {
                self.frame(event_loop);
            }

            _ => {}
        }
    }

    fn device_event(
        &mut self,
        _event_loop: &ActiveEventLoop,
        _device_id: DeviceId,
        event: DeviceEvent,
    ) {
        if let DeviceEvent::MouseMotion { delta } = event {
            self.orbit.process_mouse_motion(delta.0, delta.1);
        }
    }
}

/// Initialise env_logger; `RUST_LOG` wins over the configured level
fn init_logging(default_level: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .init();
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration before logging so the configured level applies
    let loaded = AppConfig::load();
    let level = loaded
        .as_ref()
        .map(|c| c.debug.log_level.clone())
        .unwrap_or_else(|_| "info".to_string());
    init_logging(&level);

    let config = loaded.unwrap_or_else(|e| {
        log::warn!("Failed to load config: {}. Using defaults.", e);
        AppConfig::default()
    });
    if let Some(path) = &config.missing_defaults {
        log::warn!("{} not found, using built-in defaults", path.display());
    }
    log::info!("Starting Glowsphere");

    // Create event loop
    let event_loop = EventLoop::new()?;
    event_loop.set_control_flow(ControlFlow::Poll);

    // Create and run application
    let mut app = App::new(config);
    event_loop.run_app(&mut app)?;
    app.into_result()
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowsphere::systems::WindowError;

    #[test]
    fn test_clean_exit_is_ok() {
        let app = App::new(AppConfig::default());
        assert!(app.into_result().is_ok());
    }

    #[test]
    fn test_startup_failure_is_reported() {
        let mut app = App::new(AppConfig::default());
        app.startup_error = Some(Box::new(WindowError::CreationFailed(
            "no display".to_string(),
        )));
        let err = app.into_result().unwrap_err();
        assert_eq!(err.to_string(), "Window creation failed: no display");
    }
}
