/// Pipeline resource binding table
///
/// Flattens the signatures of a pipeline into one ordered table of
/// `{name, type, stages, slot}` rows per requested backend. The computation
/// is pure: identical attributes always give an identical table.

use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};

use crate::archiver::Archiver;
use crate::archiver_bail;
use crate::device::{RenderDeviceType, RenderDeviceTypeFlags};
use crate::error::{Error, Result};
use crate::shader::ShaderStageFlags;
use crate::signature::{
    BindingSlot, ResourceRange, ShaderResourceType, SlotAllocator, SerializableResourceSignature,
    MAX_METAL_BUFFER_FUNCTION_ARGUMENTS,
};

const SOURCE: &str = "galaxy3d::ResourceBindings";

/// One row of the binding table
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineResourceBinding {
    pub name: String,
    pub resource_type: ShaderResourceType,
    /// Active stages using the resource
    pub shader_stages: ShaderStageFlags,
    pub array_size: u32,
    pub device_type: RenderDeviceType,
    pub slot: BindingSlot,
}

/// Input of the binding table computation
#[derive(Debug, Clone, Default)]
pub struct PipelineResourceBindingAttribs<'a> {
    /// Signatures in pipeline order
    pub signatures: Vec<&'a SerializableResourceSignature>,
    /// Active shader stages of the pipeline (empty means all stages)
    pub shader_stages: ShaderStageFlags,
    /// Backends to produce rows for
    pub device_flags: RenderDeviceTypeFlags,
    /// Render targets of the pipeline; D3D11 pixel-stage UAVs start after them
    pub num_render_targets: u32,
    /// Metal vertex buffers, bound at the top of the vertex-stage buffer range
    pub vertex_buffer_names: Vec<String>,
}

/// A name already placed in the table for the current backend
struct PlacedResource {
    resource_type: ShaderResourceType,
    range: ResourceRange,
    slot: BindingSlot,
    array_size: u32,
    row: Option<usize>,
}

/// Compute the binding table for `attribs`
///
/// Rows are grouped by backend (flag order), then signature order, then
/// declaration order. A name repeated across signatures yields one row whose
/// stages are OR'd together and whose slot is the first one assigned; the
/// repeats must agree on resource type and slot range. Metal vertex buffer
/// names must not collide with signature resources.
pub fn compute_pipeline_resource_bindings(
    attribs: &PipelineResourceBindingAttribs<'_>,
) -> Result<Vec<PipelineResourceBinding>> {
    // ========== VALIDATION 1: Backends ==========
    if attribs.device_flags.is_empty() {
        archiver_bail!(SOURCE, "No backend requested for pipeline resource bindings");
    }

    // ========== VALIDATION 2: Signatures ==========
    let mut binding_indices = FxHashSet::default();
    for signature in &attribs.signatures {
        let missing = attribs.device_flags - signature.device_flags();
        if !missing.is_empty() {
            archiver_bail!(SOURCE,
                "Signature '{}' was not created for {}", signature.name(), missing.describe());
        }
        if !binding_indices.insert(signature.desc().binding_index) {
            archiver_bail!(SOURCE,
                "Signature '{}' reuses binding index {}", signature.name(), signature.desc().binding_index);
        }
    }

    let active_stages = if attribs.shader_stages.is_empty() {
        ShaderStageFlags::all()
    } else {
        attribs.shader_stages
    };

    let mut rows = Vec::new();
    for device_type in attribs.device_flags.device_types() {
        append_device_bindings(device_type, attribs, active_stages, &mut rows)?;
    }
    Ok(rows)
}

fn append_device_bindings(
    device_type: RenderDeviceType,
    attribs: &PipelineResourceBindingAttribs<'_>,
    active_stages: ShaderStageFlags,
    rows: &mut Vec<PipelineResourceBinding>,
) -> Result<()> {
    let mut allocator = SlotAllocator::new(device_type);
    let limits = allocator.limits();
    let mut placed: FxHashMap<&str, PlacedResource> = FxHashMap::default();

    if device_type == RenderDeviceType::D3D11 {
        // Render targets and UAVs share the pixel-stage output slots
        allocator.reserve(ResourceRange::Uav, ShaderStageFlags::PIXEL, attribs.num_render_targets);
    }

    for signature in &attribs.signatures {
        let desc = signature.desc();
        allocator.begin_signature(desc);

        for resource in &desc.resources {
            let stages = resource.shader_stages & active_stages;
            let range = limits.resource_range(resource.resource_type, resource.flags);

            if let Some(entry) = placed.get_mut(resource.name.as_str()) {
                if entry.resource_type != resource.resource_type {
                    archiver_bail!(SOURCE,
                        "Resource '{}' is declared as {:?} and {:?} in the same pipeline",
                        resource.name, entry.resource_type, resource.resource_type);
                }
                if entry.range != range {
                    archiver_bail!(SOURCE,
                        "Resource '{}' is bound as {:?} and {:?} on {} in the same pipeline",
                        resource.name, entry.range, range, device_type);
                }

                if limits.per_stage {
                    let end = entry
                        .slot
                        .index()
                        .checked_add(entry.array_size)
                        .ok_or_else(|| allocator.capacity_exceeded(resource, range))?;
                    allocator.reserve(range, resource.shader_stages, end);
                }

                match entry.row {
                    Some(row) => rows[row].shader_stages |= stages,
                    None if !stages.is_empty() => {
                        entry.row = Some(rows.len());
                        rows.push(PipelineResourceBinding {
                            name: resource.name.clone(),
                            resource_type: resource.resource_type,
                            shader_stages: stages,
                            array_size: entry.array_size,
                            device_type,
                            slot: entry.slot,
                        });
                    }
                    None => {}
                }
                continue;
            }

            let slot = allocator.allocate(resource)?;
            let row = if stages.is_empty() {
                None
            } else {
                rows.push(PipelineResourceBinding {
                    name: resource.name.clone(),
                    resource_type: resource.resource_type,
                    shader_stages: stages,
                    array_size: resource.array_size,
                    device_type,
                    slot,
                });
                Some(rows.len() - 1)
            };
            placed.insert(
                resource.name.as_str(),
                PlacedResource {
                    resource_type: resource.resource_type,
                    range,
                    slot,
                    array_size: resource.array_size,
                    row,
                },
            );
        }
    }

    if matches!(device_type, RenderDeviceType::MetalMacOs | RenderDeviceType::MetalIos) {
        append_metal_vertex_buffers(device_type, &allocator, &placed, attribs, active_stages, rows)?;
    }
    Ok(())
}

/// Vertex buffers take buffer indices `31 - 1 - i` of the vertex stage
fn append_metal_vertex_buffers(
    device_type: RenderDeviceType,
    allocator: &SlotAllocator,
    placed: &FxHashMap<&str, PlacedResource>,
    attribs: &PipelineResourceBindingAttribs<'_>,
    active_stages: ShaderStageFlags,
    rows: &mut Vec<PipelineResourceBinding>,
) -> Result<()> {
    let count = attribs.vertex_buffer_names.len();
    if count == 0 {
        return Ok(());
    }

    let mut names = FxHashSet::default();
    for name in &attribs.vertex_buffer_names {
        if placed.contains_key(name.as_str()) {
            archiver_bail!(SOURCE,
                "Vertex buffer '{}' has the same name as a signature resource", name);
        }
        if !names.insert(name.as_str()) {
            archiver_bail!(SOURCE, "Vertex buffer '{}' is listed twice", name);
        }
    }

    let limit = MAX_METAL_BUFFER_FUNCTION_ARGUMENTS;
    let used = allocator.next_free(ResourceRange::Buffer, ShaderStageFlags::VERTEX);
    let available = limit.saturating_sub(used) as usize;
    if count > available {
        return Err(Archiver::log_error(
            SOURCE,
            Error::CapacityExceeded {
                device_type,
                resource: attribs.vertex_buffer_names[available].clone(),
                range: ResourceRange::Buffer,
                limit,
            },
        ));
    }

    if !active_stages.contains(ShaderStageFlags::VERTEX) {
        return Ok(());
    }
    for (i, name) in attribs.vertex_buffer_names.iter().enumerate() {
        rows.push(PipelineResourceBinding {
            name: name.clone(),
            resource_type: ShaderResourceType::BufferSrv,
            shader_stages: ShaderStageFlags::VERTEX,
            array_size: 1,
            device_type,
            slot: BindingSlot::ArgumentIndex { index: limit - 1 - i as u32 },
        });
    }
    Ok(())
}

#[cfg(test)]
#[path = "bindings_tests.rs"]
mod tests;
