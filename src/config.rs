//! Application configuration
//!
//! Configuration is loaded from multiple sources with the following priority (lowest to highest):
//! 1. `config/default.toml` (version controlled)
//! 2. `config/user.toml` (gitignored, user overrides)
//! 3. Environment variables (`GLOW_SECTION__KEY`)

use figment::{Figment, providers::{Format, Toml, Env}};
use serde::{Serialize, Deserialize};
use std::path::{Path, PathBuf};

use crate::controls::Controls;

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Window configuration
    #[serde(default)]
    pub window: WindowConfig,
    /// Camera configuration
    #[serde(default)]
    pub camera: CameraConfig,
    /// Mouse orbit configuration
    #[serde(default)]
    pub input: InputConfig,
    /// Initial control panel settings
    #[serde(default)]
    pub controls: ControlsConfig,
    /// Rendering configuration
    #[serde(default)]
    pub rendering: RenderingConfig,
    /// Debug configuration
    #[serde(default)]
    pub debug: DebugConfig,
    /// Default file that was expected but absent, reported once logging is up
    #[serde(skip)]
    pub missing_defaults: Option<PathBuf>,
}

impl AppConfig {
    /// Load configuration from default locations
    ///
    /// Priority (lowest to highest):
    /// 1. `config/default.toml`
    /// 2. `config/user.toml`
    /// 3. Environment variables (`GLOW_*`)
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from("config")
    }

    /// Load configuration from a specific config directory
    pub fn load_from<P: AsRef<Path>>(config_dir: P) -> Result<Self, ConfigError> {
        let config_dir = config_dir.as_ref();
        let default_path = config_dir.join("default.toml");
        let user_path = config_dir.join("user.toml");

        let mut figment = Figment::new();

        let missing_defaults = if default_path.exists() {
            figment = figment.merge(Toml::file(&default_path));
            None
        } else {
            Some(default_path)
        };

        // Load user config (optional)
        if user_path.exists() {
            figment = figment.merge(Toml::file(&user_path));
        }

        // Environment variables override everything
        // GLOW_WINDOW__TITLE=Test -> window.title = "Test"
        figment = figment.merge(Env::prefixed("GLOW_").split("__"));

        let mut config: Self = figment.extract()?;
        config.missing_defaults = missing_defaults;
        Ok(config)
    }
}

/// Window configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Window width in pixels
    pub width: u32,
    /// Window height in pixels
    pub height: u32,
    /// Start in fullscreen mode
    pub fullscreen: bool,
    /// Enable VSync
    pub vsync: bool,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "Glowsphere".to_string(),
            width: 1280,
            height: 720,
            fullscreen: false,
            vsync: true,
        }
    }
}

/// Camera configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    /// Starting position [x, y, z]
    pub position: [f32; 3],
    /// Point the camera orbits around [x, y, z]
    pub target: [f32; 3],
    /// Field of view in degrees
    pub fov: f32,
    /// Near clipping plane
    pub near: f32,
    /// Far clipping plane
    pub far: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0, 0.0, 5.0],
            target: [0.0, 0.0, 0.0],
            fov: 45.0,
            near: 0.1,
            far: 1000.0,
        }
    }
}

/// Mouse orbit configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct InputConfig {
    /// Orbit speed (radians per pixel dragged)
    pub rotate_speed: f32,
    /// Pan speed (fraction of the orbit distance per pixel)
    pub pan_speed: f32,
    /// Zoom speed (fraction of the orbit distance per wheel step)
    pub zoom_speed: f32,
    /// Closest the camera may get to its target
    pub min_distance: f32,
    /// Farthest the camera may get from its target
    pub max_distance: f32,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            rotate_speed: 0.005,
            pan_speed: 0.002,
            zoom_speed: 0.1,
            min_distance: 1.5,
            max_distance: 50.0,
        }
    }
}

/// Initial control panel settings
///
/// These are also the values "Reset Scene" returns to.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ControlsConfig {
    /// Icosphere subdivision level (0-8)
    pub tesselations: u32,
    /// Base colour [r, g, b, a], 0-255
    pub color: [u8; 4],
    /// Noise frequency
    pub frequency: f32,
    /// Noise displacement amplitude
    pub amplitude: f32,
    /// Rim glow exponent
    pub glow: f32,
    /// Ambient light
    pub ambient: f32,
}

impl Default for ControlsConfig {
    fn default() -> Self {
        let controls = Controls::default();
        Self {
            tesselations: controls.tesselations,
            color: controls.color,
            frequency: controls.frequency,
            amplitude: controls.amplitude,
            glow: controls.glow,
            ambient: controls.ambient,
        }
    }
}

impl ControlsConfig {
    /// Build a settings object, clamping and snapping values to the slider ranges
    pub fn to_controls(&self) -> Controls {
        let mut controls = Controls::default();
        controls.set_tesselations(self.tesselations);
        controls.color = self.color;
        controls.set_frequency(self.frequency);
        controls.set_amplitude(self.amplitude);
        controls.set_glow(self.glow);
        controls.set_ambient(self.ambient);
        controls
    }
}

/// Rendering configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderingConfig {
    /// Clear color [r, g, b, a]
    pub clear_color: [f32; 4],
    /// Colour of the background program pass [r, g, b, a]
    pub background_color: [f32; 4],
}

impl Default for RenderingConfig {
    fn default() -> Self {
        Self {
            clear_color: [0.2, 0.2, 0.2, 1.0],
            background_color: [1.0, 193.0 / 255.0, 0.0, 1.0],
        }
    }
}

/// Debug configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugConfig {
    /// Show the frame statistics overlay
    pub show_stats: bool,
    /// Log level (error, warn, info, debug, trace)
    pub log_level: String,
}

impl Default for DebugConfig {
    fn default() -> Self {
        Self {
            show_stats: true,
            log_level: "info".to_string(),
        }
    }
}

/// Configuration error
#[derive(Debug)]
pub struct ConfigError {
    message: String,
}

impl From<figment::Error> for ConfigError {
    fn from(e: figment::Error) -> Self {
        ConfigError {
            message: e.to_string(),
        }
    }
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Configuration error: {}", self.message)
    }
}

impl std::error::Error for ConfigError {}
