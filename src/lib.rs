//! Glowsphere - interactive noise-displaced icosphere
//!
//! Library half of the application: configuration, the live settings
//! object, scene ownership and the systems the event loop drives.

pub mod config;
pub mod controls;
pub mod scene;
pub mod systems;
