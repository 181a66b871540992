//! Integration tests for configuration loading
//!
//! Tests that verify config loading from files and environment variables.

use std::fs;
use std::path::PathBuf;

use glowsphere::config::AppConfig;
use serial_test::serial;

fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!("glowsphere-{}-{}", name, std::process::id()));
    let _ = fs::remove_dir_all(&dir);
    fs::create_dir_all(&dir).unwrap();
    dir
}

#[test]
#[serial]
fn test_env_override() {
    std::env::set_var("GLOW_WINDOW__TITLE", "Test From Env");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("GLOW_WINDOW__TITLE");
    assert_eq!(config.window.title, "Test From Env");
}

#[test]
#[serial]
fn test_env_override_numeric() {
    std::env::set_var("GLOW_CONTROLS__TESSELATIONS", "3");
    std::env::set_var("GLOW_CONTROLS__GLOW", "2.5");
    let config = AppConfig::load().unwrap();
    std::env::remove_var("GLOW_CONTROLS__TESSELATIONS");
    std::env::remove_var("GLOW_CONTROLS__GLOW");

    assert_eq!(config.controls.tesselations, 3);
    assert_eq!(config.controls.glow, 2.5);
}

#[test]
#[serial]
fn test_default_file_loads() {
    let cwd = std::env::current_dir().unwrap();
    assert!(cwd.join("config/default.toml").exists());

    let config = AppConfig::load().unwrap();
    assert!(config.missing_defaults.is_none());
    if !cwd.join("config/user.toml").exists() {
        let defaults = AppConfig::default();
        assert_eq!(config.window.title, defaults.window.title);
        assert_eq!(config.controls.tesselations, defaults.controls.tesselations);
        assert_eq!(config.controls.color, defaults.controls.color);
        assert_eq!(config.rendering.clear_color, defaults.rendering.clear_color);
    }
}

#[test]
#[serial]
fn test_user_file_overrides_default() {
    let dir = scratch_dir("user-override");
    fs::write(
        dir.join("default.toml"),
        "[window]\ntitle = \"From Default\"\nwidth = 800\n",
    )
    .unwrap();
    fs::write(dir.join("user.toml"), "[window]\ntitle = \"From User\"\n").unwrap();

    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.window.title, "From User");
    assert_eq!(config.window.width, 800);
    // Sections absent from both files keep their defaults
    assert_eq!(config.controls.frequency, 1.0);

    let _ = fs::remove_dir_all(&dir);
}

#[test]
#[serial]
fn test_missing_directory_uses_defaults() {
    let dir = std::env::temp_dir().join("glowsphere-does-not-exist");
    let config = AppConfig::load_from(&dir).unwrap();
    assert_eq!(config.window.width, 1280);
    assert_eq!(config.controls.ambient, 0.7);
    assert_eq!(config.missing_defaults, Some(dir.join("default.toml")));
}

#[test]
#[serial]
fn test_invalid_value_is_an_error() {
    let dir = scratch_dir("invalid");
    fs::write(dir.join("default.toml"), "[window]\nwidth = \"wide\"\n").unwrap();

    let err = AppConfig::load_from(&dir).unwrap_err();
    assert!(err.to_string().starts_with("Configuration error"));

    let _ = fs::remove_dir_all(&dir);
}
