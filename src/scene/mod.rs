//! Scene ownership
//!
//! The scene owns the GPU copies of the icosphere, square and cube. The
//! icosphere is rebuilt whenever the requested tessellation level changes.

mod meshes;
mod tessellation;

pub use meshes::{SceneMeshes, ICOSPHERE_RADIUS};
pub use tessellation::TessellationTracker;

use glowsphere_math::Mesh;
use glowsphere_render::Drawable;

/// Uploaded scene geometry
pub struct Scene {
    icosphere: Drawable,
    // Uploaded with the icosphere but never drawn
    _square: Drawable,
    _cube: Drawable,
    tracker: TessellationTracker,
}

impl Scene {
    /// Generate and upload every shape
    pub fn load(device: &wgpu::Device, tesselations: u32) -> Self {
        let meshes = SceneMeshes::generate(tesselations);
        log::info!(
            "Loaded scene: icosphere level {} ({} vertices, {} indices)",
            tesselations,
            meshes.icosphere.vertex_count(),
            meshes.icosphere.index_count()
        );

        Self {
            icosphere: Drawable::create(device, meshes.icosphere.mesh_data(), "Icosphere"),
            _square: Drawable::create(device, meshes.square.mesh_data(), "Square"),
            _cube: Drawable::create(device, meshes.cube.mesh_data(), "Cube"),
            tracker: TessellationTracker::new(tesselations),
        }
    }

    /// Regenerate every shape from the current settings
    pub fn reload(&mut self, device: &wgpu::Device, tesselations: u32) {
        *self = Self::load(device, tesselations);
    }

    /// Rebuild the icosphere if `tesselations` changed since the last build
    ///
    /// Returns true if the icosphere was rebuilt.
    pub fn sync_tesselations(&mut self, device: &wgpu::Device, tesselations: u32) -> bool {
        let Some(level) = self.tracker.update(tesselations) else {
            return false;
        };

        let icosphere = SceneMeshes::icosphere(level);
        log::info!(
            "Rebuilt icosphere at level {} ({} vertices)",
            level,
            icosphere.vertex_count()
        );
        self.icosphere = Drawable::create(device, icosphere.mesh_data(), "Icosphere");
        true
    }

    pub fn icosphere(&self) -> &Drawable {
        &self.icosphere
    }

    /// Tessellation level of the current icosphere
    pub fn tesselations(&self) -> u32 {
        self.tracker.current()
    }
}
