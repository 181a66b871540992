//! Live shader settings edited through the control panel
//!
//! The panel mutates a single [`Controls`] value that the render loop reads
//! every frame. Numeric settings are kept on their slider grid so a value
//! set from config or code matches what the slider would produce.

use glowsphere_math::{icosphere::MAX_SUBDIVISIONS, Vec4};

/// Min/max/step of a numeric slider
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SliderRange {
    pub min: f32,
    pub max: f32,
    pub step: f32,
}

impl SliderRange {
    pub const fn new(min: f32, max: f32, step: f32) -> Self {
        Self { min, max, step }
    }

    /// Clamp to the range and round to the nearest step
    pub fn snap(&self, value: f32) -> f32 {
        if !value.is_finite() {
            return self.min;
        }
        let clamped = value.clamp(self.min, self.max);
        let steps = ((clamped - self.min) / self.step).round();
        (self.min + steps * self.step).clamp(self.min, self.max)
    }
}

pub const FREQUENCY_RANGE: SliderRange = SliderRange::new(0.0, 4.0, 0.2);
pub const AMPLITUDE_RANGE: SliderRange = SliderRange::new(0.0, 10.0, 0.2);
pub const GLOW_RANGE: SliderRange = SliderRange::new(1.0, 10.0, 0.5);
pub const AMBIENT_RANGE: SliderRange = SliderRange::new(0.0, 1.0, 0.05);

/// Highest tessellation level the slider offers
pub const MAX_TESSELATIONS: u32 = MAX_SUBDIVISIONS;

/// Actions triggered by the panel buttons
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SceneAction {
    /// Rebuild the icosphere, square and cube from the current settings
    LoadScene,
    /// Return every setting except the colour to its default
    ResetScene,
}

/// Shared settings object
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Controls {
    /// Icosphere subdivision level
    pub tesselations: u32,
    /// Base colour, RGBA 0-255
    pub color: [u8; 4],
    pub frequency: f32,
    pub amplitude: f32,
    pub glow: f32,
    pub ambient: f32,
}

impl Default for Controls {
    fn default() -> Self {
        Self {
            tesselations: 5,
            color: [255, 193, 0, 255],
            frequency: 1.0,
            amplitude: 5.0,
            glow: 6.0,
            ambient: 0.7,
        }
    }
}

impl Controls {
    pub fn set_tesselations(&mut self, tesselations: u32) {
        self.tesselations = tesselations.min(MAX_TESSELATIONS);
    }

    pub fn set_frequency(&mut self, frequency: f32) {
        self.frequency = FREQUENCY_RANGE.snap(frequency);
    }

    pub fn set_amplitude(&mut self, amplitude: f32) {
        self.amplitude = AMPLITUDE_RANGE.snap(amplitude);
    }

    pub fn set_glow(&mut self, glow: f32) {
        self.glow = GLOW_RANGE.snap(glow);
    }

    pub fn set_ambient(&mut self, ambient: f32) {
        self.ambient = AMBIENT_RANGE.snap(ambient);
    }

    /// Reset everything but the colour to `defaults`
    pub fn reset_from(&mut self, defaults: &Controls) {
        self.tesselations = defaults.tesselations;
        self.frequency = defaults.frequency;
        self.amplitude = defaults.amplitude;
        self.glow = defaults.glow;
        self.ambient = defaults.ambient;
    }

    /// Colour as shader input, each channel divided by 255
    pub fn base_color(&self) -> Vec4 {
        let [r, g, b, a] = self.color.map(|c| c as f32 / 255.0);
        Vec4::new(r, g, b, a)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-5;

    #[test]
    fn test_defaults() {
        let c = Controls::default();
        assert_eq!(c.tesselations, 5);
        assert_eq!(c.color, [255, 193, 0, 255]);
        assert_eq!(c.frequency, 1.0);
        assert_eq!(c.amplitude, 5.0);
        assert_eq!(c.glow, 6.0);
        assert_eq!(c.ambient, 0.7);
    }

    #[test]
    fn test_reset_keeps_colour() {
        let mut c = Controls {
            tesselations: 2,
            color: [10, 20, 30, 40],
            frequency: 3.0,
            amplitude: 0.4,
            glow: 9.5,
            ambient: 0.1,
        };
        c.reset_from(&Controls::default());

        let expected = Controls {
            color: [10, 20, 30, 40],
            ..Controls::default()
        };
        assert_eq!(c, expected);
    }

    #[test]
    fn test_reset_from_custom_defaults() {
        let defaults = Controls {
            tesselations: 3,
            glow: 2.0,
            ..Controls::default()
        };
        let mut c = Controls::default();
        c.set_tesselations(7);
        c.reset_from(&defaults);
        assert_eq!(c.tesselations, 3);
        assert_eq!(c.glow, 2.0);
    }

    #[test]
    fn test_base_color_divides_by_255() {
        let c = Controls::default();
        let base = c.base_color();
        assert_eq!(base.x, 1.0);
        assert!((base.y - 193.0 / 255.0).abs() < EPSILON);
        assert_eq!(base.z, 0.0);
        assert_eq!(base.w, 1.0);
    }

    #[test]
    fn test_slider_snapping() {
        assert!((FREQUENCY_RANGE.snap(1.07) - 1.0).abs() < EPSILON);
        assert!((FREQUENCY_RANGE.snap(1.11) - 1.2).abs() < EPSILON);
        assert!((GLOW_RANGE.snap(6.3) - 6.5).abs() < EPSILON);
        assert!((AMBIENT_RANGE.snap(0.33) - 0.35).abs() < EPSILON);
    }

    #[test]
    fn test_slider_clamping() {
        assert_eq!(AMPLITUDE_RANGE.snap(-1.0), 0.0);
        assert_eq!(AMPLITUDE_RANGE.snap(12.0), 10.0);
        assert_eq!(GLOW_RANGE.snap(0.0), 1.0);
        assert_eq!(GLOW_RANGE.snap(f32::NAN), 1.0);
    }

    #[test]
    fn test_tesselations_capped() {
        let mut c = Controls::default();
        c.set_tesselations(20);
        assert_eq!(c.tesselations, MAX_TESSELATIONS);
    }
}
