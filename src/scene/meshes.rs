//! CPU-side meshes of the demo scene

use glowsphere_math::{Cube, Icosphere, Square, Vec3};

/// Radius of the scene icosphere
pub const ICOSPHERE_RADIUS: f32 = 1.0;

/// The three shapes the scene owns, all centred on the origin
#[derive(Clone, Debug)]
pub struct SceneMeshes {
    pub icosphere: Icosphere,
    pub square: Square,
    pub cube: Cube,
}

impl SceneMeshes {
    /// Generate every shape, the icosphere at `tesselations`
    pub fn generate(tesselations: u32) -> Self {
        Self {
            icosphere: Self::icosphere(tesselations),
            square: Square::new(Vec3::ZERO),
            cube: Cube::new(Vec3::ZERO),
        }
    }

    /// Generate only the icosphere
    pub fn icosphere(tesselations: u32) -> Icosphere {
        Icosphere::new(Vec3::ZERO, ICOSPHERE_RADIUS, tesselations)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use glowsphere_math::Mesh;

    #[test]
    fn test_generate_uses_tesselations() {
        let meshes = SceneMeshes::generate(2);
        assert_eq!(meshes.icosphere.subdivisions(), 2);
        assert_eq!(meshes.icosphere.radius(), ICOSPHERE_RADIUS);
        assert_eq!(meshes.icosphere.vertex_count(), Icosphere::expected_vertex_count(2));
    }

    #[test]
    fn test_all_shapes_centred() {
        let meshes = SceneMeshes::generate(0);
        assert_eq!(meshes.icosphere.center(), Vec3::ZERO);
        assert_eq!(meshes.square.center(), Vec3::ZERO);
        assert_eq!(meshes.cube.center(), Vec3::ZERO);
        assert_eq!(meshes.square.index_count(), 6);
        assert_eq!(meshes.cube.index_count(), 36);
    }
}
