//! Built-in WGSL sources
//!
//! Every stage is compiled with `common.wgsl` prepended, which declares the
//! uniform block and the vertex-to-fragment interface.

const COMMON: &str = include_str!("shaders/common.wgsl");

const LAMBERT_VERT: &str = include_str!("shaders/lambert.vert.wgsl");
const BACKGROUND_FRAG: &str = include_str!("shaders/background.frag.wgsl");
const NOISE_VERT: &str = include_str!("shaders/noise.vert.wgsl");
const NOISE_FRAG: &str = include_str!("shaders/noise.frag.wgsl");

/// Prepend the shared declarations to a stage body
pub fn compose(body: &str) -> String {
    format!("{}\n{}", COMMON, body)
}

/// Unlit-transform vertex stage used by the background program
pub fn lambert_vertex() -> String {
    compose(LAMBERT_VERT)
}

pub fn background_fragment() -> String {
    compose(BACKGROUND_FRAG)
}

/// Noise-displacement vertex stage
pub fn noise_vertex() -> String {
    compose(NOISE_VERT)
}

pub fn noise_fragment() -> String {
    compose(NOISE_FRAG)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::ShaderUniforms;
    use naga::valid::{Capabilities, ValidationFlags, Validator};

    fn parse(source: &str) -> naga::Module {
        naga::front::wgsl::parse_str(source)
            .unwrap_or_else(|e| panic!("{}", e.emit_to_string(source)))
    }

    #[test]
    fn test_builtin_sources_validate() {
        let sources = [
            ("lambert vertex", lambert_vertex()),
            ("background fragment", background_fragment()),
            ("noise vertex", noise_vertex()),
            ("noise fragment", noise_fragment()),
        ];
        for (name, source) in &sources {
            let module = parse(source);
            let result = Validator::new(ValidationFlags::all(), Capabilities::all())
                .validate(&module);
            assert!(result.is_ok(), "{} failed validation: {:?}", name, result.err());
        }
    }

    #[test]
    fn test_wgsl_uniform_block_matches_rust_layout() {
        let module = parse(&noise_vertex());
        let span = module
            .types
            .iter()
            .find_map(|(_, ty)| match (&ty.name, &ty.inner) {
                (Some(name), naga::TypeInner::Struct { span, .. }) if name == "ShaderUniforms" => {
                    Some(*span)
                }
                _ => None,
            })
            .expect("ShaderUniforms declared in common.wgsl");
        assert_eq!(span as usize, std::mem::size_of::<ShaderUniforms>());
        assert_eq!(span, 272);
    }

    #[test]
    fn test_broken_source_reports_diagnostic() {
        // Missing semicolon after the return value
        let source = compose(
            "@vertex fn vs_main() -> @builtin(position) vec4<f32> { return u.cam_pos }",
        );
        let err = naga::front::wgsl::parse_str(&source).unwrap_err();
        assert!(!err.emit_to_string(&source).is_empty());
    }
    use crate::pipeline::{AttributeFlags, UniformFlags};

    #[test]
    fn test_noise_program_reads_every_uniform() {
        let used = UniformFlags::scan(&noise_vertex()) | UniformFlags::scan(&noise_fragment());
        assert_eq!(used, UniformFlags::all());
    }

    #[test]
    fn test_background_program_ignores_noise_controls() {
        let used =
            UniformFlags::scan(&lambert_vertex()) | UniformFlags::scan(&background_fragment());
        assert!(used.contains(UniformFlags::COLOR | UniformFlags::VIEW_PROJ | UniformFlags::MODEL));
        assert!(!used.intersects(
            UniformFlags::FREQUENCY
                | UniformFlags::AMPLITUDE
                | UniformFlags::GLOW
                | UniformFlags::AMBIENT
        ));
    }

    #[test]
    fn test_vertex_stages_declare_position_and_normal() {
        for src in [lambert_vertex(), noise_vertex()] {
            assert_eq!(AttributeFlags::scan(&src), AttributeFlags::POS | AttributeFlags::NOR);
        }
    }

    #[test]
    fn test_entry_points_present() {
        assert!(noise_vertex().contains("fn vs_main"));
        assert!(lambert_vertex().contains("fn vs_main"));
        assert!(noise_fragment().contains("fn fs_main"));
        assert!(background_fragment().contains("fn fs_main"));
    }
}
