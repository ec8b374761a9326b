/// Serializable pipeline resource signature
///
/// A signature is validated once and laid out for every requested backend
/// at creation. Creation is all-or-nothing: if any backend cannot fit the
/// resources, no signature is produced.

use rustc_hash::FxHashSet;
use serde::{Deserialize, Serialize};

use crate::archiver_bail;
use crate::device::{RenderDeviceType, RenderDeviceTypeFlags};
use crate::error::{Error, Result};
use crate::shader::ShaderStageFlags;
use crate::signature::{
    BindingSlot, SlotAllocator, PipelineResourceSignatureDesc, PipelineResourceFlags,
    ShaderResourceType,
};

/// Slots of every resource of a signature on one backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SignatureLayout {
    pub device_type: RenderDeviceType,
    /// One slot per resource, in declaration order
    pub slots: Vec<BindingSlot>,
    /// Descriptor sets used (Vulkan only, 0 elsewhere)
    pub descriptor_set_count: u32,
}

/// Signature laid out for a set of backends
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableResourceSignature {
    desc: PipelineResourceSignatureDesc,
    device_flags: RenderDeviceTypeFlags,
    layouts: Vec<SignatureLayout>,
}

impl SerializableResourceSignature {
    /// Validate `desc` and lay it out for every backend in `device_flags`
    ///
    /// `shader_stages`, when given, is the combined stage mask of the
    /// pipeline the signature is meant for; every resource must stay inside it.
    pub fn create(
        desc: &PipelineResourceSignatureDesc,
        device_flags: RenderDeviceTypeFlags,
        shader_stages: Option<ShaderStageFlags>,
    ) -> Result<Self> {
        Self::validate(desc, device_flags, shader_stages)?;

        let mut layouts = Vec::new();
        for device_type in device_flags.device_types() {
            let mut allocator = SlotAllocator::new(device_type);
            allocator.begin_signature(desc);

            let slots = desc
                .resources
                .iter()
                .map(|resource| allocator.allocate(resource))
                .collect::<Result<Vec<_>>>()?;

            let descriptor_set_count = if device_type == RenderDeviceType::Vulkan {
                allocator.descriptor_set_count()
            } else {
                0
            };
            layouts.push(SignatureLayout { device_type, slots, descriptor_set_count });
        }

        Ok(Self {
            desc: desc.clone(),
            device_flags,
            layouts,
        })
    }

    fn validate(
        desc: &PipelineResourceSignatureDesc,
        device_flags: RenderDeviceTypeFlags,
        shader_stages: Option<ShaderStageFlags>,
    ) -> Result<()> {
        const SOURCE: &str = "galaxy3d::ResourceSignature";

        // ========== VALIDATION 1: Backends ==========
        if device_flags.is_empty() {
            archiver_bail!(SOURCE, "Signature '{}': no backend requested", desc.name);
        }

        // ========== VALIDATION 2: Resources ==========
        let mut names = FxHashSet::default();
        for resource in &desc.resources {
            if resource.name.is_empty() {
                archiver_bail!(SOURCE, "Signature '{}': resource with an empty name", desc.name);
            }
            if !names.insert(resource.name.as_str()) {
                archiver_bail!(SOURCE,
                    "Signature '{}': duplicate resource name '{}'", desc.name, resource.name);
            }
            if resource.shader_stages.is_empty() {
                archiver_bail!(SOURCE,
                    "Signature '{}': resource '{}' has no shader stage", desc.name, resource.name);
            }
            if resource.array_size == 0 {
                archiver_bail!(SOURCE,
                    "Signature '{}': resource '{}' has zero array size", desc.name, resource.name);
            }
            if resource.flags.contains(PipelineResourceFlags::FORMATTED_BUFFER)
                && !matches!(resource.resource_type, ShaderResourceType::BufferSrv | ShaderResourceType::BufferUav)
            {
                archiver_bail!(SOURCE,
                    "Signature '{}': FORMATTED_BUFFER flag on non-buffer resource '{}'",
                    desc.name, resource.name);
            }
            if resource.flags.contains(PipelineResourceFlags::RUNTIME_ARRAY)
                && device_flags.contains(RenderDeviceTypeFlags::D3D11)
            {
                archiver_bail!(SOURCE,
                    "Signature '{}': RUNTIME_ARRAY resource '{}' is not supported by {}",
                    desc.name, resource.name, RenderDeviceType::D3D11);
            }
        }

        // ========== VALIDATION 3: Combined stage mask ==========
        if let Some(stages) = shader_stages {
            if let Some(resource) = desc.resources.iter().find(|r| !stages.contains(r.shader_stages)) {
                archiver_bail!(SOURCE,
                    "Signature '{}': resource '{}' uses stages {:?} outside the pipeline stages {:?}",
                    desc.name, resource.name, resource.shader_stages, stages);
            }
        }

        Ok(())
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn desc(&self) -> &PipelineResourceSignatureDesc {
        &self.desc
    }

    /// Backends this signature was laid out for
    pub fn device_flags(&self) -> RenderDeviceTypeFlags {
        self.device_flags
    }

    pub fn layouts(&self) -> &[SignatureLayout] {
        &self.layouts
    }

    pub fn layout(&self, device_type: RenderDeviceType) -> Option<&SignatureLayout> {
        self.layouts.iter().find(|l| l.device_type == device_type)
    }

    /// Slot of a resource on one backend
    pub fn slot(&self, device_type: RenderDeviceType, resource_name: &str) -> Option<BindingSlot> {
        let index = self.desc.resources.iter().position(|r| r.name == resource_name)?;
        self.layout(device_type).and_then(|layout| layout.slots.get(index).copied())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            Error::BackendError(format!("Failed to serialize signature '{}': {}", self.desc.name, e))
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::ConfigurationError(format!("Invalid serialized signature: {}", e)))
    }
}

#[cfg(test)]
#[path = "serializable_signature_tests.rs"]
mod tests;
