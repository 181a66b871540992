//! Compiled shader stages
//!
//! A [`Shader`] is one WGSL module for one stage. Compilation runs inside a
//! validation error scope so a bad shader comes back as a [`ShaderError`]
//! carrying the compiler diagnostic instead of tearing down the device.
//!
//! While compiling, the source is scanned for the uniforms it reads
//! (`u.<name>`) and, for vertex shaders, the attributes it declares
//! (`vs_pos`, `vs_nor`, `vs_col`). The program uses these sets to skip
//! uniforms nobody reads and to bind only the vertex buffers it needs.

use bitflags::bitflags;

/// Pipeline stage a shader belongs to
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ShaderStage {
    Vertex,
    Fragment,
}

impl ShaderStage {
    /// Entry point function every module of this stage must define
    pub fn entry_point(self) -> &'static str {
        match self {
            ShaderStage::Vertex => "vs_main",
            ShaderStage::Fragment => "fs_main",
        }
    }
}

impl std::fmt::Display for ShaderStage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderStage::Vertex => write!(f, "vertex"),
            ShaderStage::Fragment => write!(f, "fragment"),
        }
    }
}

/// Shader compile/link errors
#[derive(Debug, Clone, PartialEq)]
pub enum ShaderError {
    /// A stage failed to compile
    Compile {
        label: String,
        stage: ShaderStage,
        log: String,
    },
    /// The stages compiled but could not be linked into a pipeline
    Link { label: String, log: String },
    /// A program was created without one of its stages
    MissingStage { label: String, stage: ShaderStage },
}

impl std::fmt::Display for ShaderError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ShaderError::Compile { label, stage, log } => {
                write!(f, "Failed to compile {} shader '{}': {}", stage, label, log)
            }
            ShaderError::Link { label, log } => {
                write!(f, "Failed to link program '{}': {}", label, log)
            }
            ShaderError::MissingStage { label, stage } => {
                write!(f, "Program '{}' has no {} shader", label, stage)
            }
        }
    }
}

impl std::error::Error for ShaderError {}

bitflags! {
    /// Uniforms a shader reads
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct UniformFlags: u32 {
        const MODEL = 1 << 0;
        const MODEL_INV_TR = 1 << 1;
        const VIEW_PROJ = 1 << 2;
        const COLOR = 1 << 3;
        const TIME = 1 << 4;
        const CAM_POS = 1 << 5;
        const WORLD_ORIGIN = 1 << 6;
        const FREQUENCY = 1 << 7;
        const AMPLITUDE = 1 << 8;
        const GLOW = 1 << 9;
        const AMBIENT = 1 << 10;
    }
}

const UNIFORM_NAMES: [(UniformFlags, &str); 11] = [
    (UniformFlags::MODEL, "u.model"),
    (UniformFlags::MODEL_INV_TR, "u.model_inv_tr"),
    (UniformFlags::VIEW_PROJ, "u.view_proj"),
    (UniformFlags::COLOR, "u.color"),
    (UniformFlags::TIME, "u.time"),
    (UniformFlags::CAM_POS, "u.cam_pos"),
    (UniformFlags::WORLD_ORIGIN, "u.world_origin"),
    (UniformFlags::FREQUENCY, "u.frequency"),
    (UniformFlags::AMPLITUDE, "u.amplitude"),
    (UniformFlags::GLOW, "u.glow"),
    (UniformFlags::AMBIENT, "u.ambient"),
];

impl UniformFlags {
    /// Uniforms referenced by a WGSL source
    pub fn scan(source: &str) -> Self {
        scan_tokens(source, &UNIFORM_NAMES)
    }
}

bitflags! {
    /// Per-vertex attributes a vertex shader declares
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct AttributeFlags: u32 {
        const POS = 1 << 0;
        const NOR = 1 << 1;
        const COL = 1 << 2;
    }
}

const ATTRIBUTE_NAMES: [(AttributeFlags, &str); 3] = [
    (AttributeFlags::POS, "vs_pos"),
    (AttributeFlags::NOR, "vs_nor"),
    (AttributeFlags::COL, "vs_col"),
];

impl AttributeFlags {
    /// Attributes declared by a WGSL vertex source
    pub fn scan(source: &str) -> Self {
        scan_tokens(source, &ATTRIBUTE_NAMES)
    }

    /// Shader location of a single attribute
    ///
    /// Locations are fixed (pos 0, nor 1, col 2) regardless of which other
    /// attributes a shader declares.
    pub fn location(self) -> Option<u32> {
        ATTRIBUTE_NAMES
            .iter()
            .position(|(flag, _)| *flag == self)
            .map(|i| i as u32)
    }
}

fn scan_tokens<F: bitflags::Flags + Copy>(source: &str, names: &[(F, &str)]) -> F {
    let code = strip_comments(source);
    let mut found = F::empty();
    for (flag, name) in names {
        if contains_token(&code, name) {
            found.insert(*flag);
        }
    }
    found
}

/// Replace `//` and (nested) `/* */` comments with whitespace
fn strip_comments(source: &str) -> String {
    let mut out = String::with_capacity(source.len());
    let mut chars = source.chars().peekable();
    let mut depth = 0usize;
    let mut in_line = false;

    while let Some(c) = chars.next() {
        if in_line {
            if c == '\n' {
                in_line = false;
                out.push(c);
            }
            continue;
        }
        match (c, chars.peek().copied()) {
            ('/', Some('*')) => {
                chars.next();
                depth += 1;
                out.push(' ');
            }
            ('*', Some('/')) if depth > 0 => {
                chars.next();
                depth -= 1;
                out.push(' ');
            }
            ('/', Some('/')) if depth == 0 => {
                chars.next();
                in_line = true;
            }
            ('\n', _) => out.push(c),
            _ if depth > 0 => {}
            _ => out.push(c),
        }
    }
    out
}

fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Whether `token` occurs in `code` with no identifier characters touching it
fn contains_token(code: &str, token: &str) -> bool {
    code.match_indices(token).any(|(start, _)| {
        let before = code[..start].chars().next_back();
        let after = code[start + token.len()..].chars().next();
        !before.is_some_and(is_ident_char) && !after.is_some_and(is_ident_char)
    })
}

/// A compiled shader module for one stage
pub struct Shader {
    label: String,
    stage: ShaderStage,
    module: wgpu::ShaderModule,
    uniforms: UniformFlags,
    attributes: AttributeFlags,
}

impl Shader {
    /// Compile a WGSL module
    ///
    /// The source must define the stage's entry point (`vs_main` or
    /// `fs_main`).
    pub fn new(
        device: &wgpu::Device,
        stage: ShaderStage,
        label: &str,
        source: &str,
    ) -> Result<Self, ShaderError> {
        if !contains_token(source, &format!("fn {}", stage.entry_point())) {
            return Err(ShaderError::Compile {
                label: label.to_string(),
                stage,
                log: format!("entry point '{}' not found", stage.entry_point()),
            });
        }

        device.push_error_scope(wgpu::ErrorFilter::Validation);
        let module = device.create_shader_module(wgpu::ShaderModuleDescriptor {
            label: Some(label),
            source: wgpu::ShaderSource::Wgsl(source.into()),
        });
        if let Some(error) = pollster::block_on(device.pop_error_scope()) {
            let log = error.to_string();
            log::error!("{} shader '{}' failed to compile:\n{}", stage, label, log);
            return Err(ShaderError::Compile {
                label: label.to_string(),
                stage,
                log,
            });
        }

        let attributes = match stage {
            ShaderStage::Vertex => AttributeFlags::scan(source),
            ShaderStage::Fragment => AttributeFlags::empty(),
        };

        Ok(Self {
            label: label.to_string(),
            stage,
            module,
            uniforms: UniformFlags::scan(source),
            attributes,
        })
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn stage(&self) -> ShaderStage {
        self.stage
    }

    pub fn module(&self) -> &wgpu::ShaderModule {
        &self.module
    }

    /// Uniforms this stage reads
    pub fn uniforms(&self) -> UniformFlags {
        self.uniforms
    }

    /// Attributes this stage declares (always empty for fragment shaders)
    pub fn attributes(&self) -> AttributeFlags {
        self.attributes
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_uniforms() {
        let src = "let p = u.view_proj * u.model * pos;\nlet c = u.color.rgb;";
        let flags = UniformFlags::scan(src);
        assert_eq!(flags, UniformFlags::VIEW_PROJ | UniformFlags::MODEL | UniformFlags::COLOR);
    }

    #[test]
    fn test_scan_respects_identifier_boundaries() {
        // u.model_inv_tr must not count as u.model
        let flags = UniformFlags::scan("let n = u.model_inv_tr * nor;");
        assert_eq!(flags, UniformFlags::MODEL_INV_TR);

        // mu.glow is a different binding
        let flags = UniformFlags::scan("let g = mu.glow;");
        assert!(flags.is_empty());
    }

    #[test]
    fn test_scan_ignores_comments() {
        let flags = UniformFlags::scan("// u.time drives the animation\nlet a = u.ambient;");
        assert_eq!(flags, UniformFlags::AMBIENT);
    }

    #[test]
    fn test_scan_ignores_block_comments() {
        let src = "/* u.time was used here\n\
                   /* nested u.glow */ u.frequency */\n\
                   let a = u.amplitude;";
        assert_eq!(UniformFlags::scan(src), UniformFlags::AMPLITUDE);

        let flags = UniformFlags::scan("let t = u.time; /* u.glow */ let g = u.ambient;");
        assert_eq!(flags, UniformFlags::TIME | UniformFlags::AMBIENT);
    }

    #[test]
    fn test_scan_attributes() {
        let src = "struct VertexInput {\n\
                   @location(0) vs_pos: vec4<f32>,\n\
                   @location(2) vs_col: vec4<f32>,\n\
                   };";
        assert_eq!(AttributeFlags::scan(src), AttributeFlags::POS | AttributeFlags::COL);
    }

    #[test]
    fn test_attribute_locations() {
        assert_eq!(AttributeFlags::POS.location(), Some(0));
        assert_eq!(AttributeFlags::NOR.location(), Some(1));
        assert_eq!(AttributeFlags::COL.location(), Some(2));
        assert_eq!((AttributeFlags::POS | AttributeFlags::NOR).location(), None);
    }

    #[test]
    fn test_stage_entry_points() {
        assert_eq!(ShaderStage::Vertex.entry_point(), "vs_main");
        assert_eq!(ShaderStage::Fragment.entry_point(), "fs_main");
    }

    #[test]
    fn test_error_display_carries_log() {
        let err = ShaderError::Compile {
            label: "noise".to_string(),
            stage: ShaderStage::Fragment,
            log: "unknown identifier `foo`".to_string(),
        };
        let msg = err.to_string();
        assert!(msg.contains("fragment"));
        assert!(msg.contains("noise"));
        assert!(msg.contains("unknown identifier"));

        let err = ShaderError::MissingStage {
            label: "noise".to_string(),
            stage: ShaderStage::Vertex,
        };
        assert_eq!(err.to_string(), "Program 'noise' has no vertex shader");
    }
}
