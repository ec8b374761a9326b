/// Sequential slot allocation for one backend
///
/// Hands out backend-native slots to the resources of one or more
/// signatures, in the order they are presented:
///
/// - D3D11 / Metal: one counter per (range, shader stage). A resource used by
///   several stages gets the highest of its stages' counters, and every one of
///   those stages advances past it.
/// - D3D12: one counter per (range, register space); a signature's space is
///   its binding index.
/// - Vulkan: one counter per descriptor set. Each signature opens up to two
///   sets: static/mutable resources, then dynamic resources.
///
/// Arrays consume `array_size` registers or argument indices but a single
/// Vulkan binding.
///
/// # Example
///
/// ```ignore
/// let mut alloc = SlotAllocator::new(RenderDeviceType::D3D12);
/// alloc.begin_signature(&desc);
/// let slot = alloc.allocate(&desc.resources[0])?;  // Register { space: 0, register: 0 }
/// ```

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};

use crate::archiver::Archiver;
use crate::device::RenderDeviceType;
use crate::error::{Error, Result};
use crate::shader::ShaderStageFlags;
use crate::signature::{
    BackendLimits, ResourceRange, PipelineResourceDesc, PipelineResourceSignatureDesc,
    ResourceVariableType,
};

/// Backend-native location of a resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum BindingSlot {
    /// D3D register in a register space (D3D11 always uses space 0)
    Register { space: u32, register: u32 },
    /// Vulkan descriptor set and binding
    Descriptor { set: u32, binding: u32 },
    /// Metal buffer/texture/sampler argument index
    ArgumentIndex { index: u32 },
}

impl BindingSlot {
    /// Register, binding or argument index
    pub fn index(&self) -> u32 {
        match self {
            BindingSlot::Register { register, .. } => *register,
            BindingSlot::Descriptor { binding, .. } => *binding,
            BindingSlot::ArgumentIndex { index } => *index,
        }
    }
}

/// Slot allocator of one backend
#[derive(Debug, Clone)]
pub struct SlotAllocator {
    limits: &'static BackendLimits,
    /// Next free slot per (range, scope); scope is a stage index, register space or set
    counters: FxHashMap<(ResourceRange, u32), u32>,
    space: u32,
    static_set: u32,
    dynamic_set: u32,
    next_set: u32,
}

impl SlotAllocator {
    pub fn new(device_type: RenderDeviceType) -> Self {
        Self {
            limits: BackendLimits::for_device(device_type),
            counters: FxHashMap::default(),
            space: 0,
            static_set: 0,
            dynamic_set: 0,
            next_set: 0,
        }
    }

    pub fn device_type(&self) -> RenderDeviceType {
        self.limits.device_type
    }

    pub fn limits(&self) -> &'static BackendLimits {
        self.limits
    }

    /// Start allocating the resources of `desc`
    pub fn begin_signature(&mut self, desc: &PipelineResourceSignatureDesc) {
        self.space = u32::from(desc.binding_index);

        let has_dynamic = desc.resources.iter().any(|r| r.var_type == ResourceVariableType::Dynamic);
        let has_static_mutable = desc.resources.iter().any(|r| r.var_type != ResourceVariableType::Dynamic);

        self.static_set = self.next_set;
        self.dynamic_set = self.next_set + u32::from(has_static_mutable);
        self.next_set += u32::from(has_static_mutable) + u32::from(has_dynamic);
    }

    /// Number of descriptor sets opened so far (Vulkan)
    pub fn descriptor_set_count(&self) -> u32 {
        self.next_set
    }

    /// Allocate the next slot for `resource`
    ///
    /// Fails with `CapacityExceeded` when the slot range of the backend would
    /// overflow, including index arithmetic past `u32::MAX`.
    pub fn allocate(&mut self, resource: &PipelineResourceDesc) -> Result<BindingSlot> {
        let range = self.limits.resource_range(resource.resource_type, resource.flags);

        match self.limits.device_type {
            RenderDeviceType::D3D11 | RenderDeviceType::MetalMacOs | RenderDeviceType::MetalIos => {
                let start = self.next_free(range, resource.shader_stages);
                let limit = self.limits.limit(range);
                let end = match start.checked_add(resource.array_size) {
                    Some(end) if end <= limit => end,
                    _ => return Err(self.capacity_exceeded(resource, range)),
                };
                self.reserve(range, resource.shader_stages, end);

                if self.limits.device_type == RenderDeviceType::D3D11 {
                    Ok(BindingSlot::Register { space: 0, register: start })
                } else {
                    Ok(BindingSlot::ArgumentIndex { index: start })
                }
            }
            RenderDeviceType::D3D12 => {
                let register = self.counters.get(&(range, self.space)).copied().unwrap_or(0);
                let end = register
                    .checked_add(resource.array_size)
                    .ok_or_else(|| self.capacity_exceeded(resource, range))?;
                self.counters.insert((range, self.space), end);
                Ok(BindingSlot::Register { space: self.space, register })
            }
            RenderDeviceType::Vulkan => {
                let set = if resource.var_type == ResourceVariableType::Dynamic {
                    self.dynamic_set
                } else {
                    self.static_set
                };
                let counter = self.counters.entry((ResourceRange::Binding, set)).or_insert(0);
                let binding = *counter;
                *counter += 1;
                Ok(BindingSlot::Descriptor { set, binding })
            }
        }
    }

    /// `CapacityExceeded` for `resource` in `range`, logged
    #[track_caller]
    pub fn capacity_exceeded(&self, resource: &PipelineResourceDesc, range: ResourceRange) -> Error {
        Archiver::log_error(
            "galaxy3d::SlotAllocator",
            Error::CapacityExceeded {
                device_type: self.limits.device_type,
                resource: resource.name.clone(),
                range,
                limit: self.limits.limit(range),
            },
        )
    }

    /// First slot of `range` free in every stage of `stages` (per-stage backends)
    pub fn next_free(&self, range: ResourceRange, stages: ShaderStageFlags) -> u32 {
        stages
            .stages()
            .map(|stage| self.counters.get(&(range, stage.stage_index() as u32)).copied().unwrap_or(0))
            .max()
            .unwrap_or(0)
    }

    /// Mark slots below `end` as used in every stage of `stages`
    ///
    /// Only meaningful for per-stage backends; no-op otherwise.
    pub fn reserve(&mut self, range: ResourceRange, stages: ShaderStageFlags, end: u32) {
        if !self.limits.per_stage {
            return;
        }
        for stage in stages.stages() {
            let counter = self.counters.entry((range, stage.stage_index() as u32)).or_insert(0);
            *counter = (*counter).max(end);
        }
    }
}

#[cfg(test)]
#[path = "slot_allocator_tests.rs"]
mod tests;
