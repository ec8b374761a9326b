/// Compiler service contract and per-family compiler handles
///
/// The archiver does not implement any shader compiler. It drives compilers
/// supplied through a `CompilerFactory`, one per `CompilerFamily`, and owns
/// at most one live compiler per family.

use std::fmt;
use serde::{Deserialize, Serialize};

use crate::device::Version;
use crate::shader::{ShaderCreateInfo, ShaderStageFlags, ShaderSourceLanguage, ShaderMacro};
use crate::signature::ShaderResourceType;

// ============================================================================
// Compile request / output
// ============================================================================

/// Output format a compiler is asked to produce
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompileTarget {
    /// DXBC/DXIL for the given shader model
    ShaderModel(Version),
    /// SPIR-V of the given version
    Spirv(Version),
    /// Metal Shading Language text
    Msl,
}

impl fmt::Display for CompileTarget {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CompileTarget::ShaderModel(v) => write!(f, "SM {}", v),
            CompileTarget::Spirv(v) => write!(f, "SPIR-V {}", v),
            CompileTarget::Msl => f.write_str("MSL"),
        }
    }
}

/// Everything a compiler needs for one compilation
#[derive(Debug, Clone, Copy)]
pub struct CompileRequest<'a> {
    pub name: &'a str,
    pub source: &'a str,
    pub entry_point: &'a str,
    pub stage: ShaderStageFlags,
    pub language: ShaderSourceLanguage,
    pub macros: &'a [ShaderMacro],
    pub target: CompileTarget,
}

/// One resource found by reflection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReflectedResource {
    pub name: String,
    pub resource_type: ShaderResourceType,
    pub array_size: u32,
    /// Descriptor set (Vulkan) or register space (D3D)
    pub set: u32,
    /// Binding (Vulkan) or register (D3D)
    pub binding: u32,
}

/// Reflection data attached to a compiled variant
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ShaderReflection {
    pub resources: Vec<ReflectedResource>,
}

/// Successful compilation result
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct CompileOutput {
    pub bytecode: Vec<u8>,
    /// `None` when the compiler does not reflect; Vulkan output is then reflected with spirq
    pub reflection: Option<ShaderReflection>,
}

// ============================================================================
// Compiler service
// ============================================================================

/// A shader compiler (FXC, DXC, a SPIR-V cross-compiler, ...)
///
/// Errors are the compiler's diagnostic text.
pub trait ShaderCompiler: Send {
    fn compile(&self, request: &CompileRequest<'_>) -> std::result::Result<CompileOutput, String>;
}

/// Compiler family; each family has its own handle in the serialization device
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CompilerFamily {
    /// Legacy D3D compiler (shader model 5.x and below)
    Fxc,
    /// DXC configured for D3D12 (DXIL)
    DxcD3D12,
    /// DXC configured for Vulkan (SPIR-V)
    DxcVulkan,
    /// HLSL/GLSL to MSL converter
    MslConverter,
}

impl fmt::Display for CompilerFamily {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            CompilerFamily::Fxc => "FXC",
            CompilerFamily::DxcD3D12 => "DXC (D3D12)",
            CompilerFamily::DxcVulkan => "DXC (Vulkan)",
            CompilerFamily::MslConverter => "MSL converter",
        };
        f.write_str(name)
    }
}

/// Creates compilers on demand
pub trait CompilerFactory: Send + Sync {
    /// Create the compiler of `family`; an error means the compiler is unavailable
    fn create_compiler(&self, family: CompilerFamily) -> std::result::Result<Box<dyn ShaderCompiler>, String>;
}

/// Factory with no compilers registered
///
/// Text shaders then fail per backend; precompiled bytecode still serializes.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullCompilerFactory;

impl CompilerFactory for NullCompilerFactory {
    fn create_compiler(&self, family: CompilerFamily) -> std::result::Result<Box<dyn ShaderCompiler>, String> {
        Err(format!("No {} compiler is available", family))
    }
}

// ============================================================================
// Compiler handle
// ============================================================================

/// Owned, lazily constructed compiler slot of one family
///
/// The target is fixed when the handle is built; the compiler itself is
/// created on the first compile and reused afterwards.
pub struct CompilerHandle {
    family: CompilerFamily,
    target: CompileTarget,
    compiler: Option<Box<dyn ShaderCompiler>>,
}

impl CompilerHandle {
    pub fn new(family: CompilerFamily, target: CompileTarget) -> Self {
        Self { family, target, compiler: None }
    }

    pub fn family(&self) -> CompilerFamily {
        self.family
    }

    pub fn target(&self) -> CompileTarget {
        self.target
    }

    /// True once the compiler has been created
    pub fn is_loaded(&self) -> bool {
        self.compiler.is_some()
    }

    /// Compile `source` (text of `create_info`, or converted text) for this handle's target
    pub fn compile(
        &mut self,
        factory: &dyn CompilerFactory,
        create_info: &ShaderCreateInfo,
        source: &str,
    ) -> std::result::Result<CompileOutput, String> {
        if self.compiler.is_none() {
            let compiler = factory.create_compiler(self.family)?;
            self.compiler = Some(compiler);
        }
        let compiler = match &self.compiler {
            Some(compiler) => compiler,
            None => return Err(format!("{} compiler is not loaded", self.family)),
        };

        let request = CompileRequest {
            name: &create_info.name,
            source,
            entry_point: &create_info.entry_point,
            stage: create_info.stage,
            language: create_info.language,
            macros: &create_info.macros,
            target: self.target,
        };
        compiler.compile(&request)
    }
}

impl fmt::Debug for CompilerHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompilerHandle")
            .field("family", &self.family)
            .field("target", &self.target)
            .field("loaded", &self.is_loaded())
            .finish()
    }
}

// ============================================================================
// Target selection
// ============================================================================

/// Shader model implied by a D3D11 feature level
pub fn d3d11_shader_model(feature_level: Version) -> Version {
    match (feature_level.major, feature_level.minor) {
        (major, _) if major >= 11 => Version::new(5, 0),
        (10, minor) if minor >= 1 => Version::new(4, 1),
        _ => Version::new(4, 0),
    }
}

/// D3D12 compiler family and target for a configured shader version
///
/// Shader models below 6.0 are DXBC and go through FXC.
pub fn d3d12_compiler(shader_version: Version) -> (CompilerFamily, CompileTarget) {
    if shader_version.major >= 6 {
        (CompilerFamily::DxcD3D12, CompileTarget::ShaderModel(shader_version))
    } else {
        (CompilerFamily::Fxc, CompileTarget::ShaderModel(shader_version))
    }
}

/// SPIR-V version targeted for a Vulkan API version
pub fn spirv_version(vk_version: Version, has_spirv14: bool) -> Version {
    match (vk_version.major, vk_version.minor) {
        (1, 0) => Version::new(1, 0),
        (1, 1) if has_spirv14 => Version::new(1, 4),
        (1, 1) => Version::new(1, 3),
        (1, 2) => Version::new(1, 5),
        (major, _) if major >= 1 => Version::new(1, 6),
        _ => Version::new(1, 0),
    }
}

#[cfg(test)]
#[path = "compiler_tests.rs"]
mod tests;
