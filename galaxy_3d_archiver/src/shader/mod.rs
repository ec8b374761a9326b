/// Shader module - shader descriptors, compiler services and serializable shaders

pub mod shader_desc;
pub mod compiler;
pub mod spirv_reflection;
pub mod metal_toolchain;
pub mod serializable_shader;

pub use shader_desc::{
    ShaderStageFlags, ShaderSourceLanguage, ShaderSource, ShaderMacro, ShaderCreateInfo,
};
pub use compiler::{
    CompileTarget, CompileRequest, CompileOutput, ShaderReflection, ReflectedResource,
    ShaderCompiler, CompilerFamily, CompilerFactory, NullCompilerFactory, CompilerHandle,
    d3d11_shader_model, d3d12_compiler, spirv_version,
};
pub use spirv_reflection::{reflect_spirv, spirv_words};
pub use metal_toolchain::{
    MetalToolchainConfig, MetalBuildRequest, MetalToolchain, CommandLineToolchain, metal_sdk,
};
pub use serializable_shader::{SerializableShader, ShaderVariant, BackendFailure};
