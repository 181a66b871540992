//! Perspective camera orbiting a target point
//!
//! The camera caches its view and projection matrices. Call [`Camera::update`]
//! after moving it and [`Camera::update_projection_matrix`] after changing the
//! lens or aspect ratio.

use glowsphere_input::OrbitControl;
use glowsphere_math::{mat4, Mat4, Vec3};

// Keep the elevation short of the poles so the up vector stays valid
const MAX_ELEVATION: f32 = 1.55;

/// Camera looking from `position` at `target`
#[derive(Clone, Debug)]
pub struct Camera {
    pub position: Vec3,
    pub target: Vec3,
    pub up: Vec3,
    /// Vertical field of view in radians
    pub fov_y: f32,
    pub aspect: f32,
    pub near: f32,
    pub far: f32,

    view: Mat4,
    projection: Mat4,
}

impl Camera {
    /// Create a camera with a 45 degree lens, near 0.1 and far 1000
    pub fn new(position: Vec3, target: Vec3) -> Self {
        let mut camera = Self {
            position,
            target,
            up: Vec3::Y,
            fov_y: 45f32.to_radians(),
            aspect: 1.0,
            near: 0.1,
            far: 1000.0,
            view: mat4::IDENTITY,
            projection: mat4::IDENTITY,
        };
        camera.update_projection_matrix();
        camera.update();
        camera
    }

    /// Builder: set the lens (field of view in degrees)
    pub fn with_lens(mut self, fov_degrees: f32, near: f32, far: f32) -> Self {
        self.fov_y = fov_degrees.to_radians();
        self.near = near;
        self.far = far;
        self.update_projection_matrix();
        self
    }

    /// Set the aspect ratio (width / height)
    ///
    /// Takes effect at the next [`Camera::update_projection_matrix`].
    pub fn set_aspect_ratio(&mut self, aspect: f32) {
        if aspect.is_finite() && aspect > 0.0 {
            self.aspect = aspect;
        }
    }

    /// Rebuild the projection matrix from the lens and aspect ratio
    pub fn update_projection_matrix(&mut self) {
        self.projection = mat4::perspective_rh(self.fov_y, self.aspect, self.near, self.far);
    }

    /// Rebuild the view matrix from position, target and up
    pub fn update(&mut self) {
        self.view = mat4::look_at_rh(self.position, self.target, self.up);
    }

    #[inline]
    pub fn view_matrix(&self) -> Mat4 {
        self.view
    }

    #[inline]
    pub fn projection_matrix(&self) -> Mat4 {
        self.projection
    }

    /// Combined projection * view
    pub fn view_proj(&self) -> Mat4 {
        mat4::mul(self.projection, self.view)
    }

    /// Unit vector from the camera toward its target
    pub fn forward(&self) -> Vec3 {
        (self.target - self.position).normalized()
    }
}

impl OrbitControl for Camera {
    fn orbit(&mut self, delta_azimuth: f32, delta_elevation: f32) {
        let offset = self.position - self.target;
        let radius = offset.length();
        if radius <= f32::EPSILON {
            return;
        }

        let azimuth = offset.x.atan2(offset.z) + delta_azimuth;
        let elevation = ((offset.y / radius).clamp(-1.0, 1.0).asin() + delta_elevation)
            .clamp(-MAX_ELEVATION, MAX_ELEVATION);

        let horizontal = radius * elevation.cos();
        self.position = self.target
            + Vec3::new(
                horizontal * azimuth.sin(),
                radius * elevation.sin(),
                horizontal * azimuth.cos(),
            );
        self.update();
    }

    fn pan(&mut self, right: f32, up: f32) {
        let forward = self.forward();
        let right_dir = forward.cross(self.up).normalized();
        let up_dir = right_dir.cross(forward);

        let delta = right_dir * right + up_dir * up;
        self.position += delta;
        self.target += delta;
        self.update();
    }

    fn distance(&self) -> f32 {
        (self.position - self.target).length()
    }

    fn set_distance(&mut self, distance: f32) {
        let dir = (self.position - self.target).normalized();
        self.position = self.target + dir * distance;
        self.update();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowsphere_math::{mat4::transform, Vec4};

    const EPSILON: f32 = 0.0001;

    fn default_camera() -> Camera {
        Camera::new(Vec3::new(0.0, 0.0, 5.0), Vec3::ZERO)
    }

    #[test]
    fn test_defaults() {
        let cam = default_camera();
        assert!((cam.fov_y - 45f32.to_radians()).abs() < EPSILON);
        assert_eq!(cam.near, 0.1);
        assert_eq!(cam.far, 1000.0);
        assert_eq!(cam.distance(), 5.0);
    }

    #[test]
    fn test_target_projects_to_screen_center() {
        let mut cam = default_camera();
        cam.set_aspect_ratio(16.0 / 9.0);
        cam.update_projection_matrix();

        let clip = transform(cam.view_proj(), Vec4::new(0.0, 0.0, 0.0, 1.0));
        assert!((clip.x / clip.w).abs() < EPSILON);
        assert!((clip.y / clip.w).abs() < EPSILON);
        let depth = clip.z / clip.w;
        assert!(depth > 0.0 && depth < 1.0);
    }

    #[test]
    fn test_aspect_takes_effect_on_update() {
        let mut cam = default_camera();
        let before = cam.projection_matrix();
        cam.set_aspect_ratio(2.0);
        assert_eq!(cam.projection_matrix(), before);
        cam.update_projection_matrix();
        assert!((cam.projection_matrix()[0][0] - before[0][0] / 2.0).abs() < EPSILON);
    }

    #[test]
    fn test_invalid_aspect_ignored() {
        let mut cam = default_camera();
        cam.set_aspect_ratio(0.0);
        cam.set_aspect_ratio(f32::NAN);
        assert_eq!(cam.aspect, 1.0);
    }

    #[test]
    fn test_orbit_keeps_distance() {
        let mut cam = default_camera();
        cam.orbit(0.7, 0.3);
        assert!((cam.distance() - 5.0).abs() < EPSILON);
        assert!(cam.position.x > 0.0);
        assert!(cam.position.y > 0.0);
    }

    #[test]
    fn test_orbit_clamps_elevation() {
        let mut cam = default_camera();
        cam.orbit(0.0, 10.0);
        assert!(cam.position.y < 5.0);
        assert!(cam.position.z > 0.0);
    }

    #[test]
    fn test_pan_moves_target_with_camera() {
        let mut cam = default_camera();
        cam.pan(1.0, 0.5);
        assert!((cam.target.x - 1.0).abs() < EPSILON);
        assert!((cam.target.y - 0.5).abs() < EPSILON);
        assert!((cam.distance() - 5.0).abs() < EPSILON);
    }

    #[test]
    fn test_set_distance() {
        let mut cam = default_camera();
        cam.set_distance(2.0);
        assert!((cam.position.z - 2.0).abs() < EPSILON);
        assert!((cam.distance() - 2.0).abs() < EPSILON);
    }
}
