/// Galaxy3D serialization device
///
/// Offline device that turns shader sources, render passes and resource
/// signatures into backend-specific artifacts for every requested backend,
/// without a GPU. Each backend family lives in an optional module of the
/// `BackendRegistry`; the device itself only validates requests, fans them
/// out per backend and aggregates the results.

use std::fmt;

use crate::archiver::Archiver;
use crate::backend::{BackendRegistry, BackendSettings};
use crate::device::{
    GraphicsAdapterInfo, RenderDevice, RenderDeviceInfo, RenderDeviceTypeFlags, StandInDevice,
    Version, compiled_device_flags,
};
use crate::error::Result;
use crate::render_pass::{RenderPassDesc, SerializableRenderPass};
use crate::shader::{
    BackendFailure, CommandLineToolchain, CompilerFactory, MetalToolchain, MetalToolchainConfig,
    NullCompilerFactory, SerializableShader, ShaderCreateInfo, ShaderSource, ShaderStageFlags,
};
use crate::signature::{
    PipelineResourceBinding, PipelineResourceBindingAttribs, PipelineResourceSignatureDesc,
    SerializableResourceSignature, compute_pipeline_resource_bindings,
    MAX_METAL_BUFFER_FUNCTION_ARGUMENTS,
};
use crate::{archiver_bail, archiver_debug, archiver_err, archiver_info, archiver_warn};

const SOURCE: &str = "galaxy3d::SerializationDevice";

/// Construction input of a `SerializationDevice`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SerializationDeviceCreateInfo {
    /// Capability profile reported by the stand-in device
    pub device_info: RenderDeviceInfo,
    /// Adapter reported by the stand-in device
    pub adapter_info: GraphicsAdapterInfo,
    /// Backends the device produces artifacts for
    pub device_flags: RenderDeviceTypeFlags,
    pub d3d11_feature_level: Version,
    pub d3d12_shader_version: Version,
    pub vk_version: Version,
    /// Allow SPIR-V 1.4 when targeting Vulkan 1.1
    pub has_spirv14: bool,
    /// Metal toolchain commands, shared by macOS and iOS
    pub metal: MetalToolchainConfig,
}

impl Default for SerializationDeviceCreateInfo {
    fn default() -> Self {
        Self {
            device_info: RenderDeviceInfo::default(),
            adapter_info: GraphicsAdapterInfo::default(),
            device_flags: compiled_device_flags(),
            d3d11_feature_level: Version::new(11, 0),
            d3d12_shader_version: Version::new(6, 5),
            vk_version: Version::new(1, 0),
            has_spirv14: false,
            metal: MetalToolchainConfig::default(),
        }
    }
}

/// Offline multi-backend serialization device
///
/// # Example
///
/// ```no_run
/// use galaxy_3d_archiver::galaxy3d::SerializationDevice;
/// use galaxy_3d_archiver::galaxy3d::device::RenderDeviceTypeFlags;
/// use galaxy_3d_archiver::galaxy3d::shader::{ShaderCreateInfo, ShaderStageFlags};
/// use galaxy_3d_archiver::galaxy3d::config::SerializationDeviceCreateInfo;
///
/// let mut device = SerializationDevice::new(SerializationDeviceCreateInfo::default())?;
/// let info = ShaderCreateInfo::from_source("Blit VS", "float4 main() : SV_Position { return 0; }", ShaderStageFlags::VERTEX);
/// let shader = device.create_shader(&info, RenderDeviceTypeFlags::D3D12 | RenderDeviceTypeFlags::VULKAN)?;
/// println!("{} variants", shader.variants().len());
/// # Ok::<(), galaxy_3d_archiver::galaxy3d::Error>(())
/// ```
pub struct SerializationDevice {
    stand_in: StandInDevice,
    registry: BackendRegistry,
    compiler_factory: Box<dyn CompilerFactory>,
    settings: BackendSettings,
    metal: MetalToolchainConfig,
    /// Last table returned by `get_pipeline_resource_bindings`
    resource_bindings: Vec<PipelineResourceBinding>,
}

impl fmt::Debug for SerializationDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SerializationDevice")
            .field("valid_device_flags", &self.valid_device_flags())
            .field("registry", &self.registry)
            .field("settings", &self.settings)
            .field("metal", &self.metal)
            .finish()
    }
}

impl SerializationDevice {
    /// Create a device with no shader compiler and the `xcrun` Metal toolchain
    ///
    /// Precompiled bytecode, signatures, render passes and binding tables
    /// work out of the box; compiling source text needs a compiler factory
    /// (see `with_services`).
    pub fn new(create_info: SerializationDeviceCreateInfo) -> Result<Self> {
        let toolchain = CommandLineToolchain::new(create_info.metal.clone());
        Self::with_services(create_info, Box::new(NullCompilerFactory), Box::new(toolchain))
    }

    /// Create a device with caller-provided compiler and Metal services
    ///
    /// # Errors
    ///
    /// `ConfigurationError` if `device_flags` is empty or names a backend
    /// that is not compiled into this build.
    pub fn with_services(
        create_info: SerializationDeviceCreateInfo,
        compiler_factory: Box<dyn CompilerFactory>,
        toolchain: Box<dyn MetalToolchain>,
    ) -> Result<Self> {
        let requested = create_info.device_flags;
        if requested.is_empty() {
            archiver_bail!(SOURCE, "Serialization device requires at least one device type");
        }
        let missing = requested.difference(compiled_device_flags());
        if !missing.is_empty() {
            archiver_bail!(SOURCE,
                "Device types {} are not compiled into this build (available: {})",
                missing.describe(), compiled_device_flags().describe());
        }

        let settings = BackendSettings {
            d3d11_feature_level: create_info.d3d11_feature_level,
            d3d12_shader_version: create_info.d3d12_shader_version,
            vk_version: create_info.vk_version,
            has_spirv14: create_info.has_spirv14,
        };
        let registry = BackendRegistry::new(requested, &settings, toolchain);

        archiver_info!(SOURCE, "Serialization device created for {}", requested.describe());

        Ok(Self {
            stand_in: StandInDevice::new(create_info.device_info, create_info.adapter_info),
            registry,
            compiler_factory,
            settings,
            metal: create_info.metal,
            resource_bindings: Vec::new(),
        })
    }

    /// Backends this device can produce artifacts for
    pub fn valid_device_flags(&self) -> RenderDeviceTypeFlags {
        self.registry.valid_device_flags()
    }

    /// Backend modules and their compiler handles
    pub fn registry(&self) -> &BackendRegistry {
        &self.registry
    }

    fn check_device_flags(&self, device_flags: RenderDeviceTypeFlags, object: &str) -> Result<()> {
        if device_flags.is_empty() {
            archiver_bail!(SOURCE, "{}: no device type requested", object);
        }
        let unsupported = device_flags.difference(self.valid_device_flags());
        if !unsupported.is_empty() {
            archiver_bail!(SOURCE,
                "{}: device types {} are not enabled on this device (valid: {})",
                object, unsupported.describe(), self.valid_device_flags().describe());
        }
        Ok(())
    }

    // ===== SHADERS =====

    /// Compile `create_info` for every backend in `device_flags`
    ///
    /// A backend that fails to compile is recorded in the returned shader's
    /// failures and logged at WARN; the call only fails when no backend
    /// succeeded, returning the first backend's `CompilationFailure`.
    pub fn create_shader(
        &mut self,
        create_info: &ShaderCreateInfo,
        device_flags: RenderDeviceTypeFlags,
    ) -> Result<SerializableShader> {
        let object = format!("Shader '{}'", create_info.name);

        // ========== VALIDATION 1: Device types ==========
        self.check_device_flags(device_flags, &object)?;

        // ========== VALIDATION 2: Shader description ==========
        if !create_info.stage.is_single_stage() {
            archiver_bail!(SOURCE, "{}: stage must be exactly one shader stage, got {:?}",
                object, create_info.stage);
        }
        if create_info.entry_point.is_empty() {
            archiver_bail!(SOURCE, "{}: entry point is empty", object);
        }
        let empty_source = match &create_info.source {
            ShaderSource::Text(text) => text.trim().is_empty(),
            ShaderSource::Bytecode(bytecode) => bytecode.is_empty(),
        };
        if empty_source {
            archiver_bail!(SOURCE, "{}: source is empty", object);
        }

        // ========== COMPILATION ==========
        let mut shader = SerializableShader::new(&create_info.name, &create_info.entry_point, create_info.stage);
        let factory = self.compiler_factory.as_ref();

        for device_type in device_flags.device_types() {
            let module = self
                .registry
                .module_mut(device_type.family())
                .ok_or_else(|| archiver_err!(SOURCE, "{}: no backend module for {}", object, device_type))?;

            archiver_debug!(SOURCE, "Compiling shader '{}' for {}", create_info.name, device_type);
            match module.compile_shader(device_type, create_info, factory) {
                Ok(variant) => shader.push_variant(variant),
                Err(diagnostics) => {
                    archiver_warn!(SOURCE, "Shader '{}' failed to compile for {}: {}",
                        create_info.name, device_type, diagnostics);
                    shader.push_failure(BackendFailure { device_type, diagnostics });
                }
            }
        }

        if shader.variants().is_empty() {
            if let Some(failure) = shader.failures().first() {
                return Err(Archiver::log_error(SOURCE, failure.to_error()));
            }
        }

        Ok(shader)
    }

    // ===== RENDER PASSES =====

    /// Validate `desc` for the backends in `device_flags`
    ///
    /// Render passes carry no backend-specific data; the flags are checked
    /// like every other request.
    pub fn create_render_pass(
        &self,
        desc: &RenderPassDesc,
        device_flags: RenderDeviceTypeFlags,
    ) -> Result<SerializableRenderPass> {
        self.check_device_flags(device_flags, &format!("Render pass '{}'", desc.name))?;
        SerializableRenderPass::create(desc)
    }

    // ===== RESOURCE SIGNATURES =====

    /// Lay out `desc` for every backend in `device_flags`
    ///
    /// Fails as a whole if any backend cannot hold the signature.
    pub fn create_pipeline_resource_signature(
        &self,
        desc: &PipelineResourceSignatureDesc,
        device_flags: RenderDeviceTypeFlags,
        shader_stages: Option<ShaderStageFlags>,
    ) -> Result<SerializableResourceSignature> {
        self.check_device_flags(device_flags, &format!("Resource signature '{}'", desc.name))?;
        SerializableResourceSignature::create(desc, device_flags, shader_stages)
    }

    /// Compute the binding table of a pipeline
    ///
    /// The returned slice stays valid until the next call; on error the
    /// previous table is cleared.
    pub fn get_pipeline_resource_bindings(
        &mut self,
        attribs: &PipelineResourceBindingAttribs<'_>,
    ) -> Result<&[PipelineResourceBinding]> {
        self.resource_bindings.clear();
        self.check_device_flags(attribs.device_flags, "Pipeline resource bindings")?;

        self.resource_bindings = compute_pipeline_resource_bindings(attribs)?;
        Ok(&self.resource_bindings)
    }

    // ===== CONFIGURATION ACCESSORS =====

    /// D3D11 feature level, encoded as `(major << 12) | (minor << 8)`
    pub fn d3d11_feature_level(&self) -> u32 {
        let level = self.settings.d3d11_feature_level;
        (level.major << 12) | (level.minor << 8)
    }

    pub fn d3d12_shader_version(&self) -> Version {
        self.settings.d3d12_shader_version
    }

    /// Vulkan API version, encoded as `(major << 22) | (minor << 12)`
    pub fn vk_version(&self) -> u32 {
        let version = self.settings.vk_version;
        (version.major << 22) | (version.minor << 12)
    }

    pub fn has_spirv14(&self) -> bool {
        self.settings.has_spirv14
    }

    pub fn mtl_temp_shader_folder(&self) -> &str {
        &self.metal.temp_shader_folder
    }

    pub fn msl_preprocessor_cmd(&self) -> &str {
        &self.metal.msl_preprocessor_cmd
    }

    pub fn mtl_compile_options(&self) -> &str {
        &self.metal.compile_options
    }

    pub fn mtl_link_options(&self) -> &str {
        &self.metal.link_options
    }

    /// Metal buffer argument slots per stage
    pub fn max_buffer_function_arguments(&self) -> u32 {
        MAX_METAL_BUFFER_FUNCTION_ARGUMENTS
    }

    // ===== STAND-IN DEVICE =====

    /// Device object for code that needs a render device but never draws
    pub fn render_device(&self) -> &dyn RenderDevice {
        &self.stand_in
    }

    pub fn device_info(&self) -> &RenderDeviceInfo {
        self.stand_in.device_info()
    }

    pub fn adapter_info(&self) -> &GraphicsAdapterInfo {
        self.stand_in.adapter_info()
    }
}

#[cfg(test)]
#[path = "serialization_device_tests.rs"]
mod tests;
