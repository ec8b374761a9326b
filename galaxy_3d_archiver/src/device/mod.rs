/// Device module - backend kinds, synthetic device info and the stand-in device

pub mod device_type;
pub mod device_info;
pub mod render_device;
pub mod stand_in_device;

pub use device_type::{RenderDeviceType, RenderDeviceTypeFlags, BackendFamily, compiled_device_flags};
pub use device_info::{
    Version, DeviceFeatures, RenderDeviceInfo,
    AdapterType, AdapterVendor, AdapterMemoryInfo, GraphicsAdapterInfo,
};
pub use render_device::{
    RenderDevice, DeviceObject, DeviceObjectRef,
    TextureFormat, TextureFormatInfo, SparseTextureFormatInfo, ResourceDimension,
    BufferDesc, TextureDesc, SamplerDesc, FenceDesc, QueryDesc, FramebufferDesc,
    BottomLevelAsDesc, TopLevelAsDesc, ShaderBindingTableDesc, DeviceMemoryDesc,
    PipelineStateCacheDesc, ResourceMappingDesc, PipelineStateDesc,
    GraphicsPipelineDesc, ComputePipelineDesc, RayTracingPipelineDesc, TilePipelineDesc,
};
pub use stand_in_device::StandInDevice;
