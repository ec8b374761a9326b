/// Stand-in device (no GPU, no execution context)
///
/// Implements the whole `RenderDevice` surface as no-ops so that code written
/// against a device can run on a build machine. Only the two info accessors
/// return real data; they are fixed at construction.

use crate::device::{
    RenderDevice, DeviceObjectRef, RenderDeviceInfo, GraphicsAdapterInfo,
    GraphicsPipelineDesc, ComputePipelineDesc, RayTracingPipelineDesc, TilePipelineDesc,
    BufferDesc, TextureDesc, SamplerDesc, FenceDesc, QueryDesc, FramebufferDesc,
    BottomLevelAsDesc, TopLevelAsDesc, ShaderBindingTableDesc, DeviceMemoryDesc,
    PipelineStateCacheDesc, ResourceMappingDesc,
    TextureFormat, TextureFormatInfo, SparseTextureFormatInfo, ResourceDimension,
};
use crate::render_pass::RenderPassDesc;
use crate::shader::ShaderCreateInfo;
use crate::signature::PipelineResourceSignatureDesc;

/// No-op device returned by `SerializationDevice::render_device()`
#[derive(Debug, Clone, Default)]
pub struct StandInDevice {
    device_info: RenderDeviceInfo,
    adapter_info: GraphicsAdapterInfo,
}

impl StandInDevice {
    pub fn new(device_info: RenderDeviceInfo, adapter_info: GraphicsAdapterInfo) -> Self {
        Self { device_info, adapter_info }
    }
}

impl RenderDevice for StandInDevice {
    fn create_graphics_pipeline_state(&self, _desc: &GraphicsPipelineDesc) -> DeviceObjectRef {
        None
    }

    fn create_compute_pipeline_state(&self, _desc: &ComputePipelineDesc) -> DeviceObjectRef {
        None
    }

    fn create_ray_tracing_pipeline_state(&self, _desc: &RayTracingPipelineDesc) -> DeviceObjectRef {
        None
    }

    fn create_tile_pipeline_state(&self, _desc: &TilePipelineDesc) -> DeviceObjectRef {
        None
    }

    fn create_buffer(&self, _desc: &BufferDesc, _data: Option<&[u8]>) -> DeviceObjectRef {
        None
    }

    fn create_shader(&self, _create_info: &ShaderCreateInfo) -> DeviceObjectRef {
        None
    }

    fn create_texture(&self, _desc: &TextureDesc, _data: Option<&[u8]>) -> DeviceObjectRef {
        None
    }

    fn create_sampler(&self, _desc: &SamplerDesc) -> DeviceObjectRef {
        None
    }

    fn create_fence(&self, _desc: &FenceDesc) -> DeviceObjectRef {
        None
    }

    fn create_query(&self, _desc: &QueryDesc) -> DeviceObjectRef {
        None
    }

    fn create_render_pass(&self, _desc: &RenderPassDesc) -> DeviceObjectRef {
        None
    }

    fn create_framebuffer(&self, _desc: &FramebufferDesc) -> DeviceObjectRef {
        None
    }

    fn create_blas(&self, _desc: &BottomLevelAsDesc) -> DeviceObjectRef {
        None
    }

    fn create_tlas(&self, _desc: &TopLevelAsDesc) -> DeviceObjectRef {
        None
    }

    fn create_sbt(&self, _desc: &ShaderBindingTableDesc) -> DeviceObjectRef {
        None
    }

    fn create_pipeline_resource_signature(&self, _desc: &PipelineResourceSignatureDesc) -> DeviceObjectRef {
        None
    }

    fn create_device_memory(&self, _desc: &DeviceMemoryDesc) -> DeviceObjectRef {
        None
    }

    fn create_pipeline_state_cache(&self, _desc: &PipelineStateCacheDesc) -> DeviceObjectRef {
        None
    }

    fn create_resource_mapping(&self, _desc: &ResourceMappingDesc) -> DeviceObjectRef {
        None
    }

    fn idle_gpu(&self) {}

    fn release_stale_resources(&self, _force_release: bool) {}

    fn sparse_texture_format_info(
        &self,
        _format: TextureFormat,
        _dimension: ResourceDimension,
        _sample_count: u32,
    ) -> SparseTextureFormatInfo {
        SparseTextureFormatInfo::default()
    }

    fn texture_format_info(&self, _format: TextureFormat) -> TextureFormatInfo {
        TextureFormatInfo::default()
    }

    fn device_info(&self) -> &RenderDeviceInfo {
        &self.device_info
    }

    fn adapter_info(&self) -> &GraphicsAdapterInfo {
        &self.adapter_info
    }
}

#[cfg(test)]
#[path = "stand_in_device_tests.rs"]
mod tests;
