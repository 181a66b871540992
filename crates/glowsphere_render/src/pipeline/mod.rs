//! Shader program components
//!
//! This module contains the shader wrapper used by every draw: compiled
//! shader stages, the linked program with its uniform state, and the cache
//! that tracks which program is bound on the current render pass.

pub mod types;
pub mod shader;
pub mod shader_program;

// Re-export types
pub use types::{ShaderUniforms, MAX_DRAWS_PER_FRAME, DEPTH_FORMAT};

// Re-export shader wrapper
pub use shader::{Shader, ShaderStage, ShaderError, UniformFlags, AttributeFlags};
pub use shader_program::{ShaderProgram, ProgramCache, ProgramId, ProgramUniforms, SlotAllocator};
