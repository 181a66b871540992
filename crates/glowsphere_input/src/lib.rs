//! Orbit-style input handling
//!
//! This crate turns raw mouse input into orbit, pan and zoom operations on
//! any camera implementing [`OrbitControl`].

mod orbit_controller;

pub use orbit_controller::{OrbitController, OrbitControl};
