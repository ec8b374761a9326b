/// Backend capability table: slot ranges and their hard limits
///
/// Every limit the layout code checks lives here, indexed by backend kind,
/// so the allocator itself stays backend-agnostic.

use serde::{Deserialize, Serialize};

use crate::device::RenderDeviceType;
use crate::signature::{ShaderResourceType, PipelineResourceFlags};

/// Maximum number of buffer arguments of a Metal shader function
pub const MAX_METAL_BUFFER_FUNCTION_ARGUMENTS: u32 = 31;

/// Limit value of ranges without a hard ceiling
pub const UNBOUNDED: u32 = u32::MAX;

/// Slot range a resource is allocated from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ResourceRange {
    /// D3D constant buffer registers (b#)
    Cbv,
    /// D3D shader resource registers (t#)
    Srv,
    /// D3D unordered access registers (u#)
    Uav,
    /// D3D sampler registers (s#) and Metal sampler indices
    Sampler,
    /// Metal buffer argument indices
    Buffer,
    /// Metal texture argument indices
    Texture,
    /// Vulkan descriptor bindings
    Binding,
}

/// Hard limits of one backend
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackendLimits {
    pub device_type: RenderDeviceType,
    /// Counters are kept per shader stage (D3D11, Metal) rather than per space/set
    pub per_stage: bool,
    pub max_cbv: u32,
    pub max_srv: u32,
    pub max_uav: u32,
    pub max_samplers: u32,
    pub max_buffers: u32,
    pub max_textures: u32,
    pub max_bindings: u32,
}

const D3D11_LIMITS: BackendLimits = BackendLimits {
    device_type: RenderDeviceType::D3D11,
    per_stage: true,
    max_cbv: 14,
    max_srv: 128,
    max_uav: 8,
    max_samplers: 16,
    max_buffers: 0,
    max_textures: 0,
    max_bindings: 0,
};

const D3D12_LIMITS: BackendLimits = BackendLimits {
    device_type: RenderDeviceType::D3D12,
    per_stage: false,
    max_cbv: UNBOUNDED,
    max_srv: UNBOUNDED,
    max_uav: UNBOUNDED,
    max_samplers: UNBOUNDED,
    max_buffers: 0,
    max_textures: 0,
    max_bindings: 0,
};

const VULKAN_LIMITS: BackendLimits = BackendLimits {
    device_type: RenderDeviceType::Vulkan,
    per_stage: false,
    max_cbv: 0,
    max_srv: 0,
    max_uav: 0,
    max_samplers: 0,
    max_buffers: 0,
    max_textures: 0,
    max_bindings: UNBOUNDED,
};

const METAL_MACOS_LIMITS: BackendLimits = BackendLimits {
    device_type: RenderDeviceType::MetalMacOs,
    per_stage: true,
    max_cbv: 0,
    max_srv: 0,
    max_uav: 0,
    max_samplers: 16,
    max_buffers: MAX_METAL_BUFFER_FUNCTION_ARGUMENTS,
    max_textures: 128,
    max_bindings: 0,
};

const METAL_IOS_LIMITS: BackendLimits = BackendLimits {
    device_type: RenderDeviceType::MetalIos,
    per_stage: true,
    max_cbv: 0,
    max_srv: 0,
    max_uav: 0,
    max_samplers: 16,
    max_buffers: MAX_METAL_BUFFER_FUNCTION_ARGUMENTS,
    max_textures: 31,
    max_bindings: 0,
};

impl BackendLimits {
    /// Limits of a backend kind
    pub fn for_device(device_type: RenderDeviceType) -> &'static BackendLimits {
        match device_type {
            RenderDeviceType::D3D11 => &D3D11_LIMITS,
            RenderDeviceType::D3D12 => &D3D12_LIMITS,
            RenderDeviceType::Vulkan => &VULKAN_LIMITS,
            RenderDeviceType::MetalMacOs => &METAL_MACOS_LIMITS,
            RenderDeviceType::MetalIos => &METAL_IOS_LIMITS,
        }
    }

    /// Number of slots in `range` (0 when the backend does not use the range)
    pub fn limit(&self, range: ResourceRange) -> u32 {
        match range {
            ResourceRange::Cbv => self.max_cbv,
            ResourceRange::Srv => self.max_srv,
            ResourceRange::Uav => self.max_uav,
            ResourceRange::Sampler => self.max_samplers,
            ResourceRange::Buffer => self.max_buffers,
            ResourceRange::Texture => self.max_textures,
            ResourceRange::Binding => self.max_bindings,
        }
    }

    /// Range a resource of `resource_type` is allocated from on this backend
    pub fn resource_range(&self, resource_type: ShaderResourceType, flags: PipelineResourceFlags) -> ResourceRange {
        use ShaderResourceType as T;
        match self.device_type {
            RenderDeviceType::D3D11 | RenderDeviceType::D3D12 => match resource_type {
                T::ConstantBuffer => ResourceRange::Cbv,
                T::TextureSrv | T::BufferSrv | T::InputAttachment | T::AccelStruct => ResourceRange::Srv,
                T::TextureUav | T::BufferUav => ResourceRange::Uav,
                T::Sampler => ResourceRange::Sampler,
            },
            RenderDeviceType::Vulkan => ResourceRange::Binding,
            RenderDeviceType::MetalMacOs | RenderDeviceType::MetalIos => match resource_type {
                T::BufferSrv | T::BufferUav if flags.contains(PipelineResourceFlags::FORMATTED_BUFFER) => {
                    ResourceRange::Texture
                }
                T::ConstantBuffer | T::BufferSrv | T::BufferUav | T::AccelStruct => ResourceRange::Buffer,
                T::TextureSrv | T::TextureUav | T::InputAttachment => ResourceRange::Texture,
                T::Sampler => ResourceRange::Sampler,
            },
        }
    }
}

#[cfg(test)]
#[path = "limits_tests.rs"]
mod tests;
