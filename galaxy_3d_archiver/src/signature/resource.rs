/// Pipeline resource descriptions

use bitflags::bitflags;
use serde::{Deserialize, Serialize};

use crate::shader::ShaderStageFlags;

/// Kind of shader resource
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ShaderResourceType {
    /// Constant / uniform buffer
    ConstantBuffer,
    /// Read-only texture
    TextureSrv,
    /// Read-only buffer (structured or formatted)
    BufferSrv,
    /// Read-write texture
    TextureUav,
    /// Read-write buffer (structured or formatted)
    BufferUav,
    Sampler,
    /// Subpass input
    InputAttachment,
    /// Ray-tracing acceleration structure
    AccelStruct,
}

/// How often a resource binding changes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum ResourceVariableType {
    /// Set once on the signature
    Static,
    /// Set once per shader resource binding
    #[default]
    Mutable,
    /// Can change between draws
    Dynamic,
}

bitflags! {
    /// Extra resource properties
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct PipelineResourceFlags: u32 {
        /// Formatted (typed) buffer view; Metal binds it as a texture
        const FORMATTED_BUFFER = 1 << 0;
        /// Array size is an upper bound, the shader declares an unsized array.
        /// Direct3D 11 has no unbounded arrays and rejects it.
        const RUNTIME_ARRAY    = 1 << 1;
    }
}

/// One resource of a signature
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResourceDesc {
    /// Shader variable name, unique within the signature
    pub name: String,
    pub shader_stages: ShaderStageFlags,
    /// Number of array elements (1 for non-arrays)
    pub array_size: u32,
    pub resource_type: ShaderResourceType,
    pub var_type: ResourceVariableType,
    pub flags: PipelineResourceFlags,
}

impl PipelineResourceDesc {
    /// Non-array mutable resource
    pub fn new(name: &str, shader_stages: ShaderStageFlags, resource_type: ShaderResourceType) -> Self {
        Self {
            name: name.to_string(),
            shader_stages,
            array_size: 1,
            resource_type,
            var_type: ResourceVariableType::Mutable,
            flags: PipelineResourceFlags::empty(),
        }
    }

    pub fn with_array_size(mut self, array_size: u32) -> Self {
        self.array_size = array_size;
        self
    }

    pub fn with_var_type(mut self, var_type: ResourceVariableType) -> Self {
        self.var_type = var_type;
        self
    }

    pub fn with_flags(mut self, flags: PipelineResourceFlags) -> Self {
        self.flags = flags;
        self
    }
}

/// Pipeline resource signature description
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct PipelineResourceSignatureDesc {
    pub name: String,
    /// Resources in declaration order
    pub resources: Vec<PipelineResourceDesc>,
    /// Position of the signature in a pipeline; also the D3D12 register space
    pub binding_index: u8,
}

impl PipelineResourceSignatureDesc {
    pub fn new(name: &str, binding_index: u8) -> Self {
        Self {
            name: name.to_string(),
            resources: Vec::new(),
            binding_index,
        }
    }

    pub fn with_resource(mut self, resource: PipelineResourceDesc) -> Self {
        self.resources.push(resource);
        self
    }

    /// Union of the stages of every resource
    pub fn shader_stages(&self) -> ShaderStageFlags {
        self.resources
            .iter()
            .fold(ShaderStageFlags::empty(), |stages, r| stages | r.shader_stages)
    }
}
