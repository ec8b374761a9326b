/// SPIR-V reflection with spirq
///
/// Used for Vulkan variants whose compiler returned no reflection data and
/// for precompiled SPIR-V bytecode.

use crate::shader::{ShaderReflection, ReflectedResource};
use crate::signature::ShaderResourceType;

const SPIRV_MAGIC: u32 = 0x0723_0203;

/// Reinterpret little-endian bytes as SPIR-V words
pub fn spirv_words(bytecode: &[u8]) -> std::result::Result<Vec<u32>, String> {
    if bytecode.is_empty() || bytecode.len() % 4 != 0 {
        return Err(format!(
            "SPIR-V bytecode size must be a non-zero multiple of 4 (got {} bytes)",
            bytecode.len()
        ));
    }

    let words: Vec<u32> = bytecode
        .chunks_exact(4)
        .map(|c| u32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect();

    if words[0] != SPIRV_MAGIC {
        return Err(format!("Invalid SPIR-V magic number 0x{:08x}", words[0]));
    }
    Ok(words)
}

/// Reflect descriptor resources of every entry point in a SPIR-V module
///
/// Resources shared by several entry points are reported once.
pub fn reflect_spirv(bytecode: &[u8]) -> std::result::Result<ShaderReflection, String> {
    let words = spirv_words(bytecode)?;

    let entry_points = spirq::ReflectConfig::new()
        .spv(&words[..])
        .ref_all_rscs(true)
        .reflect()
        .map_err(|e| format!("SPIR-V reflection failed: {:?}", e))?;

    let mut reflection = ShaderReflection::default();

    for entry_point in &entry_points {
        for var in entry_point.vars.iter() {
            if let spirq::var::Variable::Descriptor { name, desc_bind, desc_ty, nbind, .. } = var {
                let set = desc_bind.set();
                let binding = desc_bind.bind();
                let already_seen = reflection
                    .resources
                    .iter()
                    .any(|r| r.set == set && r.binding == binding);
                if already_seen {
                    continue;
                }

                reflection.resources.push(ReflectedResource {
                    name: name.clone().unwrap_or_default(),
                    resource_type: spirq_desc_type_to_resource_type(desc_ty)?,
                    array_size: (*nbind).max(1),
                    set,
                    binding,
                });
            }
        }
    }

    Ok(reflection)
}

/// Convert a spirq descriptor type to a shader resource type
fn spirq_desc_type_to_resource_type(
    desc_ty: &spirq::ty::DescriptorType,
) -> std::result::Result<ShaderResourceType, String> {
    use spirq::ty::{AccessType, DescriptorType};
    match desc_ty {
        DescriptorType::UniformBuffer(..) => Ok(ShaderResourceType::ConstantBuffer),
        DescriptorType::StorageBuffer(AccessType::ReadOnly) => Ok(ShaderResourceType::BufferSrv),
        DescriptorType::StorageBuffer(..) => Ok(ShaderResourceType::BufferUav),
        DescriptorType::UniformTexelBuffer(..) => Ok(ShaderResourceType::BufferSrv),
        DescriptorType::StorageTexelBuffer(..) => Ok(ShaderResourceType::BufferUav),
        DescriptorType::CombinedImageSampler(..) => Ok(ShaderResourceType::TextureSrv),
        DescriptorType::SampledImage(..) => Ok(ShaderResourceType::TextureSrv),
        DescriptorType::StorageImage(..) => Ok(ShaderResourceType::TextureUav),
        DescriptorType::Sampler(..) => Ok(ShaderResourceType::Sampler),
        DescriptorType::InputAttachment(..) => Ok(ShaderResourceType::InputAttachment),
        DescriptorType::AccelStruct(..) => Ok(ShaderResourceType::AccelStruct),
        #[allow(unreachable_patterns)]
        other => Err(format!("Unsupported SPIR-V descriptor type: {:?}", other)),
    }
}

#[cfg(test)]
#[path = "spirv_reflection_tests.rs"]
mod tests;
