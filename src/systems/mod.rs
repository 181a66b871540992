//! Application systems
//!
//! Modular systems extracted from main.rs for better organization and testability.

mod frame_stats;
mod gui;
mod render;
mod window;

pub use frame_stats::FrameStats;
pub use gui::GuiSystem;
pub use render::{RenderError, RenderSystem};
pub use window::{WindowError, WindowSystem};
