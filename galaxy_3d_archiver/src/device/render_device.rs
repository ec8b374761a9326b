/// RenderDevice trait - the full device-creation surface
///
/// Higher-level archiving code is written against this trait so that it can
/// run against a real device or against the offline `StandInDevice`.

use std::fmt;
use std::sync::Arc;
use serde::{Deserialize, Serialize};

use crate::device::{RenderDeviceInfo, GraphicsAdapterInfo};
use crate::render_pass::RenderPassDesc;
use crate::shader::ShaderCreateInfo;
use crate::signature::PipelineResourceSignatureDesc;

// ============================================================================
// Formats
// ============================================================================

/// Texture and attachment format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[allow(non_camel_case_types)]
pub enum TextureFormat {
    Unknown,
    R8G8B8A8_SRGB,
    R8G8B8A8_UNORM,
    B8G8R8A8_SRGB,
    B8G8R8A8_UNORM,
    R16G16B16A16_FLOAT,
    R32G32B32A32_FLOAT,
    R32_FLOAT,
    D16_UNORM,
    D32_FLOAT,
    D24_UNORM_S8_UINT,
}

/// Format properties
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TextureFormatInfo {
    pub supported: bool,
    pub component_size: u32,
    pub num_components: u32,
}

/// Sparse residency properties of a format
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SparseTextureFormatInfo {
    pub tile_width: u32,
    pub tile_height: u32,
    pub tile_depth: u32,
}

// ============================================================================
// Object descriptors
// ============================================================================

/// Texture dimension
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResourceDimension {
    Buffer,
    Tex1D,
    Tex2D,
    Tex2DArray,
    Tex3D,
    TexCube,
}

#[derive(Debug, Clone, Default)]
pub struct BufferDesc {
    pub name: String,
    pub size: u64,
}

#[derive(Debug, Clone)]
pub struct TextureDesc {
    pub name: String,
    pub dimension: ResourceDimension,
    pub width: u32,
    pub height: u32,
    pub depth_or_array_size: u32,
    pub mip_levels: u32,
    pub format: TextureFormat,
}

#[derive(Debug, Clone, Default)]
pub struct SamplerDesc {
    pub name: String,
    pub max_anisotropy: u32,
}

#[derive(Debug, Clone, Default)]
pub struct FenceDesc {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct QueryDesc {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct FramebufferDesc {
    pub name: String,
    pub width: u32,
    pub height: u32,
    pub num_layers: u32,
}

#[derive(Debug, Clone, Default)]
pub struct BottomLevelAsDesc {
    pub name: String,
    pub triangle_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct TopLevelAsDesc {
    pub name: String,
    pub max_instance_count: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ShaderBindingTableDesc {
    pub name: String,
}

#[derive(Debug, Clone, Default)]
pub struct DeviceMemoryDesc {
    pub name: String,
    pub page_size: u64,
    pub initial_size: u64,
}

#[derive(Debug, Clone, Default)]
pub struct PipelineStateCacheDesc {
    pub name: String,
    pub cache_data: Vec<u8>,
}

#[derive(Debug, Clone, Default)]
pub struct ResourceMappingDesc {
    pub entries: Vec<String>,
}

/// Shared pipeline-state create info (name + signatures the pipeline uses)
#[derive(Debug, Clone, Default)]
pub struct PipelineStateDesc {
    pub name: String,
    pub signature_names: Vec<String>,
}

#[derive(Debug, Clone, Default)]
pub struct GraphicsPipelineDesc {
    pub pipeline: PipelineStateDesc,
    pub num_render_targets: u32,
}

#[derive(Debug, Clone, Default)]
pub struct ComputePipelineDesc {
    pub pipeline: PipelineStateDesc,
}

#[derive(Debug, Clone, Default)]
pub struct RayTracingPipelineDesc {
    pub pipeline: PipelineStateDesc,
    pub max_recursion_depth: u32,
}

#[derive(Debug, Clone, Default)]
pub struct TilePipelineDesc {
    pub pipeline: PipelineStateDesc,
    pub num_render_targets: u32,
}

// ============================================================================
// RenderDevice trait
// ============================================================================

/// Any object a device can hand out
pub trait DeviceObject: fmt::Debug + Send + Sync {
    /// Debug name
    fn name(&self) -> &str;
}

/// Result of a creation call: `None` when the device cannot produce the object
pub type DeviceObjectRef = Option<Arc<dyn DeviceObject>>;

/// Device-creation interface
pub trait RenderDevice: Send + Sync {
    fn create_graphics_pipeline_state(&self, desc: &GraphicsPipelineDesc) -> DeviceObjectRef;
    fn create_compute_pipeline_state(&self, desc: &ComputePipelineDesc) -> DeviceObjectRef;
    fn create_ray_tracing_pipeline_state(&self, desc: &RayTracingPipelineDesc) -> DeviceObjectRef;
    fn create_tile_pipeline_state(&self, desc: &TilePipelineDesc) -> DeviceObjectRef;
    fn create_buffer(&self, desc: &BufferDesc, data: Option<&[u8]>) -> DeviceObjectRef;
    fn create_shader(&self, create_info: &ShaderCreateInfo) -> DeviceObjectRef;
    fn create_texture(&self, desc: &TextureDesc, data: Option<&[u8]>) -> DeviceObjectRef;
    fn create_sampler(&self, desc: &SamplerDesc) -> DeviceObjectRef;
    fn create_fence(&self, desc: &FenceDesc) -> DeviceObjectRef;
    fn create_query(&self, desc: &QueryDesc) -> DeviceObjectRef;
    fn create_render_pass(&self, desc: &RenderPassDesc) -> DeviceObjectRef;
    fn create_framebuffer(&self, desc: &FramebufferDesc) -> DeviceObjectRef;
    fn create_blas(&self, desc: &BottomLevelAsDesc) -> DeviceObjectRef;
    fn create_tlas(&self, desc: &TopLevelAsDesc) -> DeviceObjectRef;
    fn create_sbt(&self, desc: &ShaderBindingTableDesc) -> DeviceObjectRef;
    fn create_pipeline_resource_signature(&self, desc: &PipelineResourceSignatureDesc) -> DeviceObjectRef;
    fn create_device_memory(&self, desc: &DeviceMemoryDesc) -> DeviceObjectRef;
    fn create_pipeline_state_cache(&self, desc: &PipelineStateCacheDesc) -> DeviceObjectRef;
    fn create_resource_mapping(&self, desc: &ResourceMappingDesc) -> DeviceObjectRef;

    /// Wait until the GPU is idle
    fn idle_gpu(&self);

    /// Release resources whose release was deferred
    fn release_stale_resources(&self, force_release: bool);

    fn sparse_texture_format_info(
        &self,
        format: TextureFormat,
        dimension: ResourceDimension,
        sample_count: u32,
    ) -> SparseTextureFormatInfo;

    fn texture_format_info(&self, format: TextureFormat) -> TextureFormatInfo;

    /// Device capability profile
    fn device_info(&self) -> &RenderDeviceInfo;

    /// Adapter description
    fn adapter_info(&self) -> &GraphicsAdapterInfo;
}
