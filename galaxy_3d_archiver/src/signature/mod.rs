/// Signature module - resource descriptions, backend layouts and binding tables

pub mod resource;
pub mod limits;
pub mod slot_allocator;
pub mod serializable_signature;
pub mod bindings;

pub use resource::{
    ShaderResourceType, ResourceVariableType, PipelineResourceFlags,
    PipelineResourceDesc, PipelineResourceSignatureDesc,
};
pub use limits::{BackendLimits, ResourceRange, MAX_METAL_BUFFER_FUNCTION_ARGUMENTS, UNBOUNDED};
pub use slot_allocator::{SlotAllocator, BindingSlot};
pub use serializable_signature::{SerializableResourceSignature, SignatureLayout};
pub use bindings::{
    PipelineResourceBinding, PipelineResourceBindingAttribs, compute_pipeline_resource_bindings,
};
