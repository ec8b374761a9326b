/// Shader stage flags and the shader creation descriptor

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

bitflags! {
    /// Shader stage mask
    ///
    /// A shader is created for exactly one stage; resources and binding rows
    /// carry a mask of every stage that uses them.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct ShaderStageFlags: u32 {
        const VERTEX        = 1 << 0;
        const PIXEL         = 1 << 1;
        const GEOMETRY      = 1 << 2;
        const HULL          = 1 << 3;
        const DOMAIN        = 1 << 4;
        const COMPUTE       = 1 << 5;
        const AMPLIFICATION = 1 << 6;
        const MESH          = 1 << 7;

        const ALL_GRAPHICS = Self::VERTEX.bits() | Self::PIXEL.bits() | Self::GEOMETRY.bits()
            | Self::HULL.bits() | Self::DOMAIN.bits();
        const ALL_MESH = Self::AMPLIFICATION.bits() | Self::MESH.bits() | Self::PIXEL.bits();
    }
}

impl ShaderStageFlags {
    /// Individual stages in bit order
    pub const STAGES: [ShaderStageFlags; 8] = [
        ShaderStageFlags::VERTEX,
        ShaderStageFlags::PIXEL,
        ShaderStageFlags::GEOMETRY,
        ShaderStageFlags::HULL,
        ShaderStageFlags::DOMAIN,
        ShaderStageFlags::COMPUTE,
        ShaderStageFlags::AMPLIFICATION,
        ShaderStageFlags::MESH,
    ];

    /// True when exactly one stage bit is set
    pub fn is_single_stage(self) -> bool {
        self.bits().count_ones() == 1
    }

    /// Index of a single stage in `STAGES` (lowest set bit for a mask)
    pub fn stage_index(self) -> usize {
        self.bits().trailing_zeros() as usize
    }

    /// Individual stages contained in this mask
    pub fn stages(self) -> impl Iterator<Item = ShaderStageFlags> {
        Self::STAGES.into_iter().filter(move |s| self.contains(*s))
    }
}

/// Source language of shader text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ShaderSourceLanguage {
    #[default]
    Hlsl,
    Glsl,
    /// Metal Shading Language (only usable for Metal targets)
    Msl,
}

/// Shader input: text compiled per backend, or precompiled bytecode copied as-is
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShaderSource {
    Text(String),
    Bytecode(Vec<u8>),
}

/// Preprocessor define
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderMacro {
    pub name: String,
    pub definition: String,
}

/// Descriptor for creating a serializable shader
#[derive(Debug, Clone)]
pub struct ShaderCreateInfo {
    /// Debug name, also used to name toolchain temporaries
    pub name: String,
    pub source: ShaderSource,
    /// Entry point function name
    pub entry_point: String,
    /// Shader stage (single bit)
    pub stage: ShaderStageFlags,
    pub language: ShaderSourceLanguage,
    pub macros: Vec<ShaderMacro>,
}

impl ShaderCreateInfo {
    /// HLSL source with entry point `main`
    pub fn from_source(name: &str, source: &str, stage: ShaderStageFlags) -> Self {
        Self {
            name: name.to_string(),
            source: ShaderSource::Text(source.to_string()),
            entry_point: "main".to_string(),
            stage,
            language: ShaderSourceLanguage::Hlsl,
            macros: Vec::new(),
        }
    }

    /// Precompiled bytecode with entry point `main`
    pub fn from_bytecode(name: &str, bytecode: Vec<u8>, stage: ShaderStageFlags) -> Self {
        Self {
            name: name.to_string(),
            source: ShaderSource::Bytecode(bytecode),
            entry_point: "main".to_string(),
            stage,
            language: ShaderSourceLanguage::Hlsl,
            macros: Vec::new(),
        }
    }

    pub fn with_entry_point(mut self, entry_point: &str) -> Self {
        self.entry_point = entry_point.to_string();
        self
    }

    pub fn with_language(mut self, language: ShaderSourceLanguage) -> Self {
        self.language = language;
        self
    }

    pub fn with_macro(mut self, name: &str, definition: &str) -> Self {
        self.macros.push(ShaderMacro {
            name: name.to_string(),
            definition: definition.to_string(),
        });
        self
    }
}

#[cfg(test)]
#[path = "shader_desc_tests.rs"]
mod tests;
