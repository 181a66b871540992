//! Orbit controller for inspecting an object at the origin
//!
//! Controls:
//! - Left drag: orbit around the target
//! - Right or middle drag: pan the target
//! - Mouse wheel: zoom in/out

use winit::event::{ElementState, MouseButton};

/// Orbit controller for handling mouse input
pub struct OrbitController {
    // Button state
    rotating: bool,
    panning: bool,

    // Accumulated input since the last update
    pending_dx: f32,
    pending_dy: f32,
    pending_scroll: f32,

    // Configuration
    pub rotate_speed: f32,
    pub pan_speed: f32,
    pub zoom_speed: f32,
    pub min_distance: f32,
    pub max_distance: f32,
}

impl Default for OrbitController {
    fn default() -> Self {
        Self::new()
    }
}

impl OrbitController {
    pub fn new() -> Self {
        Self {
            rotating: false,
            panning: false,

            pending_dx: 0.0,
            pending_dy: 0.0,
            pending_scroll: 0.0,

            rotate_speed: 0.005,
            pan_speed: 0.002,
            zoom_speed: 0.1,
            min_distance: 1.5,
            max_distance: 50.0,
        }
    }

    /// Process mouse button input
    pub fn process_mouse_button(&mut self, button: MouseButton, state: ElementState) {
        let pressed = state == ElementState::Pressed;

        match button {
            MouseButton::Left => self.rotating = pressed,
            MouseButton::Right | MouseButton::Middle => self.panning = pressed,
            _ => {}
        }
    }

    /// Process raw mouse movement
    ///
    /// Motion only counts while a button is held.
    pub fn process_mouse_motion(&mut self, delta_x: f64, delta_y: f64) {
        if self.rotating || self.panning {
            self.pending_dx += delta_x as f32;
            self.pending_dy += delta_y as f32;
        }
    }

    /// Process scroll wheel input (positive = zoom in)
    pub fn process_scroll(&mut self, delta: f32) {
        self.pending_scroll += delta;
    }

    /// Drop held buttons and pending input
    ///
    /// Used when the window loses the pointer mid-drag.
    pub fn release(&mut self) {
        self.rotating = false;
        self.panning = false;
        self.clear_pending();
    }

    /// Whether a drag is in progress
    pub fn is_dragging(&self) -> bool {
        self.rotating || self.panning
    }

    /// Apply accumulated input to the camera
    ///
    /// Returns true if the camera was changed.
    pub fn update<C: OrbitControl>(&mut self, camera: &mut C) -> bool {
        let mut changed = false;

        if self.pending_dx != 0.0 || self.pending_dy != 0.0 {
            if self.rotating {
                // Dragging right spins the scene right, dragging down tilts it toward the viewer
                camera.orbit(
                    -self.pending_dx * self.rotate_speed,
                    self.pending_dy * self.rotate_speed,
                );
                changed = true;
            } else if self.panning {
                // Pan scales with distance so the grabbed point tracks the cursor
                let scale = self.pan_speed * camera.distance();
                camera.pan(-self.pending_dx * scale, self.pending_dy * scale);
                changed = true;
            }
        }

        if self.pending_scroll != 0.0 {
            let factor = (1.0 - self.pending_scroll * self.zoom_speed).max(0.1);
            let distance = (camera.distance() * factor).clamp(self.min_distance, self.max_distance);
            camera.set_distance(distance);
            changed = true;
        }

        self.clear_pending();
        changed
    }

    fn clear_pending(&mut self) {
        self.pending_dx = 0.0;
        self.pending_dy = 0.0;
        self.pending_scroll = 0.0;
    }

    /// Builder: set orbit speed (radians per pixel)
    pub fn with_rotate_speed(mut self, speed: f32) -> Self {
        self.rotate_speed = speed;
        self
    }

    /// Builder: set pan speed (fraction of distance per pixel)
    pub fn with_pan_speed(mut self, speed: f32) -> Self {
        self.pan_speed = speed;
        self
    }

    /// Builder: set zoom speed (fraction of distance per wheel step)
    pub fn with_zoom_speed(mut self, speed: f32) -> Self {
        self.zoom_speed = speed;
        self
    }

    /// Builder: set the allowed orbit distance range
    pub fn with_distance_limits(mut self, min: f32, max: f32) -> Self {
        self.min_distance = min.min(max);
        self.max_distance = max.max(min);
        self
    }
}

/// Trait for orbit camera control
/// Allows the controller to work with different camera implementations
pub trait OrbitControl {
    fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32);
    fn pan(&mut self, right: f32, up: f32);
    fn distance(&self) -> f32;
    fn set_distance(&mut self, distance: f32);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct MockCamera {
        azimuth: f32,
        elevation: f32,
        pan: (f32, f32),
        distance: f32,
    }

    impl OrbitControl for MockCamera {
        fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) {
            self.azimuth += delta_azimuth;
            self.elevation += delta_elevation;
        }

        fn pan(&mut self, right: f32, up: f32) {
            self.pan.0 += right;
            self.pan.1 += up;
        }

        fn distance(&self) -> f32 {
            self.distance
        }

        fn set_distance(&mut self, distance: f32) {
            self.distance = distance;
        }
    }

    fn camera() -> MockCamera {
        MockCamera { distance: 5.0, ..Default::default() }
    }

    #[test]
    fn test_motion_without_button_is_ignored() {
        let mut ctrl = OrbitController::new();
        let mut cam = camera();
        ctrl.process_mouse_motion(10.0, 10.0);
        assert!(!ctrl.update(&mut cam));
        assert_eq!(cam.azimuth, 0.0);
    }

    #[test]
    fn test_left_drag_orbits() {
        let mut ctrl = OrbitController::new().with_rotate_speed(0.01);
        let mut cam = camera();
        ctrl.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        ctrl.process_mouse_motion(10.0, -5.0);
        assert!(ctrl.update(&mut cam));
        assert!((cam.azimuth + 0.1).abs() < 1e-6);
        assert!((cam.elevation + 0.05).abs() < 1e-6);
    }

    #[test]
    fn test_right_drag_pans_scaled_by_distance() {
        let mut ctrl = OrbitController::new().with_pan_speed(0.01);
        let mut cam = camera();
        ctrl.process_mouse_button(MouseButton::Right, ElementState::Pressed);
        ctrl.process_mouse_motion(2.0, 0.0);
        ctrl.update(&mut cam);
        // 2 px * 0.01 * distance 5
        assert!((cam.pan.0 + 0.1).abs() < 1e-6);
        assert_eq!(cam.azimuth, 0.0);
    }

    #[test]
    fn test_scroll_zooms_within_limits() {
        let mut ctrl = OrbitController::new().with_distance_limits(2.0, 6.0);
        let mut cam = camera();

        ctrl.process_scroll(100.0);
        ctrl.update(&mut cam);
        assert_eq!(cam.distance, 2.0);

        ctrl.process_scroll(-100.0);
        ctrl.update(&mut cam);
        assert_eq!(cam.distance, 6.0);
    }

    #[test]
    fn test_pending_input_consumed_once() {
        let mut ctrl = OrbitController::new();
        let mut cam = camera();
        ctrl.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        ctrl.process_mouse_motion(4.0, 0.0);
        assert!(ctrl.update(&mut cam));
        assert!(!ctrl.update(&mut cam));
    }

    #[test]
    fn test_release_drops_drag() {
        let mut ctrl = OrbitController::new();
        ctrl.process_mouse_button(MouseButton::Left, ElementState::Pressed);
        assert!(ctrl.is_dragging());
        ctrl.release();
        assert!(!ctrl.is_dragging());
    }

    #[test]
    fn test_distance_limits_are_ordered() {
        let ctrl = OrbitController::new().with_distance_limits(10.0, 1.0);
        assert_eq!(ctrl.min_distance, 1.0);
        assert_eq!(ctrl.max_distance, 10.0);
    }
}
