/// Backend registry - one optional module per backend family
///
/// A module exists only for families that are both compiled into this build
/// and enabled at device construction. Each module owns the compiler handles
/// of its family; dispatch is an exhaustive `match` over
/// `BackendModule`.

use std::fmt;

use crate::device::{BackendFamily, RenderDeviceType, RenderDeviceTypeFlags, Version};
use crate::shader::{
    CompilerFactory, CompilerFamily, CompilerHandle, CompileTarget, CompileOutput,
    MetalBuildRequest, MetalToolchain, ShaderCreateInfo, ShaderSource,
    ShaderSourceLanguage, ShaderVariant, d3d11_shader_model, d3d12_compiler, spirv_version,
    reflect_spirv,
};

/// Direct3D 11 module
#[derive(Debug)]
pub struct D3D11Backend {
    fxc: CompilerHandle,
}

/// Direct3D 12 module
#[derive(Debug)]
pub struct D3D12Backend {
    compiler: CompilerHandle,
}

/// Vulkan module
#[derive(Debug)]
pub struct VulkanBackend {
    compiler: CompilerHandle,
}

/// Metal module, shared by the macOS and iOS variants
pub struct MetalBackend {
    converter: CompilerHandle,
    toolchain: Box<dyn MetalToolchain>,
}

impl fmt::Debug for MetalBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("MetalBackend")
            .field("converter", &self.converter)
            .finish()
    }
}

/// Backend module of one family
#[derive(Debug)]
pub enum BackendModule {
    D3D11(D3D11Backend),
    D3D12(D3D12Backend),
    Vulkan(VulkanBackend),
    Metal(MetalBackend),
}

impl BackendModule {
    pub fn family(&self) -> BackendFamily {
        match self {
            BackendModule::D3D11(_) => BackendFamily::D3D11,
            BackendModule::D3D12(_) => BackendFamily::D3D12,
            BackendModule::Vulkan(_) => BackendFamily::Vulkan,
            BackendModule::Metal(_) => BackendFamily::Metal,
        }
    }

    /// Compiler handles owned by this module
    pub fn compiler_handles(&self) -> Vec<&CompilerHandle> {
        match self {
            BackendModule::D3D11(m) => vec![&m.fxc],
            BackendModule::D3D12(m) => vec![&m.compiler],
            BackendModule::Vulkan(m) => vec![&m.compiler],
            BackendModule::Metal(m) => vec![&m.converter],
        }
    }

    /// Produce the variant of `create_info` for `device_type`
    ///
    /// Errors are the diagnostics of the failing compiler or toolchain.
    pub fn compile_shader(
        &mut self,
        device_type: RenderDeviceType,
        create_info: &ShaderCreateInfo,
        factory: &dyn CompilerFactory,
    ) -> std::result::Result<ShaderVariant, String> {
        let output = match &create_info.source {
            ShaderSource::Bytecode(bytecode) => CompileOutput {
                bytecode: bytecode.clone(),
                reflection: None,
            },
            ShaderSource::Text(text) => self.compile_text(device_type, create_info, text, factory)?,
        };

        let reflection = match (self, output.reflection) {
            (BackendModule::Vulkan(_), None) => Some(reflect_spirv(&output.bytecode)?),
            (_, reflection) => reflection,
        };

        Ok(ShaderVariant {
            device_type,
            bytecode: output.bytecode,
            reflection,
        })
    }

    fn compile_text(
        &mut self,
        device_type: RenderDeviceType,
        create_info: &ShaderCreateInfo,
        text: &str,
        factory: &dyn CompilerFactory,
    ) -> std::result::Result<CompileOutput, String> {
        let is_msl = create_info.language == ShaderSourceLanguage::Msl;
        match self {
            BackendModule::D3D11(_) | BackendModule::D3D12(_) | BackendModule::Vulkan(_) if is_msl => {
                Err(format!("MSL source cannot be compiled for {}", device_type))
            }
            BackendModule::D3D11(m) => m.fxc.compile(factory, create_info, text),
            BackendModule::D3D12(m) => m.compiler.compile(factory, create_info, text),
            BackendModule::Vulkan(m) => m.compiler.compile(factory, create_info, text),
            BackendModule::Metal(m) => {
                let converted;
                let msl_source = if is_msl {
                    text
                } else {
                    let output = m.converter.compile(factory, create_info, text)?;
                    converted = String::from_utf8(output.bytecode)
                        .map_err(|e| format!("MSL converter produced invalid UTF-8: {}", e))?;
                    converted.as_str()
                };

                let bytecode = m.toolchain.build_library(&MetalBuildRequest {
                    name: &create_info.name,
                    msl_source,
                    device_type,
                })?;
                Ok(CompileOutput { bytecode, reflection: None })
            }
        }
    }
}

/// Compiler targets of the backend modules
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendSettings {
    pub d3d11_feature_level: Version,
    pub d3d12_shader_version: Version,
    pub vk_version: Version,
    pub has_spirv14: bool,
}

/// Optional backend modules keyed by family
#[derive(Debug)]
pub struct BackendRegistry {
    modules: Vec<BackendModule>,
    valid_flags: RenderDeviceTypeFlags,
}

impl BackendRegistry {
    /// Build a module for every family touched by `device_flags`
    ///
    /// `device_flags` must already be restricted to compiled-in backends.
    pub fn new(
        device_flags: RenderDeviceTypeFlags,
        settings: &BackendSettings,
        toolchain: Box<dyn MetalToolchain>,
    ) -> Self {
        let mut modules = Vec::new();

        if device_flags.contains(RenderDeviceTypeFlags::D3D11) {
            let shader_model = d3d11_shader_model(settings.d3d11_feature_level);
            modules.push(BackendModule::D3D11(D3D11Backend {
                fxc: CompilerHandle::new(CompilerFamily::Fxc, CompileTarget::ShaderModel(shader_model)),
            }));
        }
        if device_flags.contains(RenderDeviceTypeFlags::D3D12) {
            let (family, target) = d3d12_compiler(settings.d3d12_shader_version);
            modules.push(BackendModule::D3D12(D3D12Backend {
                compiler: CompilerHandle::new(family, target),
            }));
        }
        if device_flags.contains(RenderDeviceTypeFlags::VULKAN) {
            let spirv = spirv_version(settings.vk_version, settings.has_spirv14);
            modules.push(BackendModule::Vulkan(VulkanBackend {
                compiler: CompilerHandle::new(CompilerFamily::DxcVulkan, CompileTarget::Spirv(spirv)),
            }));
        }
        if device_flags.intersects(RenderDeviceTypeFlags::METAL) {
            modules.push(BackendModule::Metal(MetalBackend {
                converter: CompilerHandle::new(CompilerFamily::MslConverter, CompileTarget::Msl),
                toolchain,
            }));
        }

        Self { modules, valid_flags: device_flags }
    }

    /// Backend kinds that have a module
    pub fn valid_device_flags(&self) -> RenderDeviceTypeFlags {
        self.valid_flags
    }

    pub fn has_module(&self, family: BackendFamily) -> bool {
        self.modules.iter().any(|m| m.family() == family)
    }

    pub fn module(&self, family: BackendFamily) -> Option<&BackendModule> {
        self.modules.iter().find(|m| m.family() == family)
    }

    pub fn module_mut(&mut self, family: BackendFamily) -> Option<&mut BackendModule> {
        self.modules.iter_mut().find(|m| m.family() == family)
    }

    pub fn modules(&self) -> &[BackendModule] {
        &self.modules
    }
}

#[cfg(test)]
#[path = "backend_tests.rs"]
mod tests;
