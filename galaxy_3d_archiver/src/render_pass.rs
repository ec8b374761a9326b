/// Serializable render pass
///
/// Render passes are backend-independent at this level: the description is
/// validated for structural consistency and stored verbatim, then shared by
/// every backend.

use serde::{Deserialize, Serialize};

use crate::archiver_bail;
use crate::device::TextureFormat;
use crate::error::{Error, Result};

/// Attachment index meaning "no attachment"
pub const ATTACHMENT_UNUSED: u32 = u32::MAX;

/// Subpass index referring to commands outside the render pass
pub const SUBPASS_EXTERNAL: u32 = u32::MAX;

/// Load operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LoadOp {
    /// Load existing content
    Load,
    /// Clear the content
    Clear,
    /// Don't care about existing content
    #[default]
    DontCare,
}

/// Store operation for an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum StoreOp {
    /// Store the rendered content
    Store,
    /// Don't care about storing the content
    #[default]
    DontCare,
}

/// Resource state of an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ResourceState {
    #[default]
    Undefined,
    RenderTarget,
    DepthWrite,
    DepthRead,
    ShaderResource,
    InputAttachment,
    ResolveDest,
    CopySource,
    Present,
}

/// Descriptor for a single attachment of a render pass
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderPassAttachmentDesc {
    /// Pixel format
    pub format: TextureFormat,
    /// Number of samples (1 = no MSAA)
    pub samples: u32,
    pub load_op: LoadOp,
    pub store_op: StoreOp,
    pub stencil_load_op: LoadOp,
    pub stencil_store_op: StoreOp,
    /// State the attachment is in when the pass begins
    pub initial_state: ResourceState,
    /// State the attachment is left in when the pass ends
    pub final_state: ResourceState,
}

impl RenderPassAttachmentDesc {
    /// Single-sample attachment that is cleared and stored
    pub fn new(format: TextureFormat, final_state: ResourceState) -> Self {
        Self {
            format,
            samples: 1,
            load_op: LoadOp::Clear,
            store_op: StoreOp::Store,
            stencil_load_op: LoadOp::DontCare,
            stencil_store_op: StoreOp::DontCare,
            initial_state: ResourceState::Undefined,
            final_state,
        }
    }
}

/// Reference from a subpass to an attachment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct AttachmentReference {
    /// Index into `RenderPassDesc::attachments`, or `ATTACHMENT_UNUSED`
    pub attachment_index: u32,
    /// State the attachment is in during the subpass
    pub state: ResourceState,
}

impl AttachmentReference {
    pub fn new(attachment_index: u32, state: ResourceState) -> Self {
        Self { attachment_index, state }
    }
}

/// One subpass
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SubpassDesc {
    pub input_attachments: Vec<AttachmentReference>,
    pub render_target_attachments: Vec<AttachmentReference>,
    /// Empty, or one entry per render target
    pub resolve_attachments: Vec<AttachmentReference>,
    pub depth_stencil_attachment: Option<AttachmentReference>,
    /// Attachments whose content must survive this subpass
    pub preserve_attachments: Vec<u32>,
}

/// Execution dependency between two subpasses
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubpassDependencyDesc {
    /// Source subpass index, or `SUBPASS_EXTERNAL`
    pub src_subpass: u32,
    /// Destination subpass index, or `SUBPASS_EXTERNAL`
    pub dst_subpass: u32,
}

/// Render pass description
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct RenderPassDesc {
    pub name: String,
    pub attachments: Vec<RenderPassAttachmentDesc>,
    pub subpasses: Vec<SubpassDesc>,
    pub dependencies: Vec<SubpassDependencyDesc>,
}

/// Validated render pass, identical for every backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableRenderPass {
    desc: RenderPassDesc,
}

const SOURCE: &str = "galaxy3d::RenderPass";

impl SerializableRenderPass {
    /// Validate `desc` and wrap it
    pub fn create(desc: &RenderPassDesc) -> Result<Self> {
        // ========== VALIDATION 1: Attachments ==========
        for (index, attachment) in desc.attachments.iter().enumerate() {
            if !attachment.samples.is_power_of_two() || attachment.samples > 64 {
                archiver_bail!(SOURCE,
                    "Render pass '{}': attachment {} has invalid sample count {}",
                    desc.name, index, attachment.samples);
            }
        }

        // ========== VALIDATION 2: Subpasses ==========
        if desc.subpasses.is_empty() {
            archiver_bail!(SOURCE, "Render pass '{}' has no subpass", desc.name);
        }

        for (subpass_index, subpass) in desc.subpasses.iter().enumerate() {
            let references = subpass
                .input_attachments
                .iter()
                .chain(&subpass.render_target_attachments)
                .chain(&subpass.resolve_attachments)
                .chain(subpass.depth_stencil_attachment.iter());
            for reference in references {
                if reference.attachment_index != ATTACHMENT_UNUSED
                    && reference.attachment_index as usize >= desc.attachments.len()
                {
                    archiver_bail!(SOURCE,
                        "Render pass '{}': subpass {} references attachment {} but only {} exist",
                        desc.name, subpass_index, reference.attachment_index, desc.attachments.len());
                }
            }

            if let Some(&index) = subpass
                .preserve_attachments
                .iter()
                .find(|&&index| index as usize >= desc.attachments.len())
            {
                archiver_bail!(SOURCE,
                    "Render pass '{}': subpass {} preserves missing attachment {}",
                    desc.name, subpass_index, index);
            }

            if !subpass.resolve_attachments.is_empty()
                && subpass.resolve_attachments.len() != subpass.render_target_attachments.len()
            {
                archiver_bail!(SOURCE,
                    "Render pass '{}': subpass {} has {} resolve attachments for {} render targets",
                    desc.name, subpass_index,
                    subpass.resolve_attachments.len(), subpass.render_target_attachments.len());
            }

            for resolve in &subpass.resolve_attachments {
                if let Some(attachment) = desc.attachments.get(resolve.attachment_index as usize) {
                    if attachment.samples != 1 {
                        archiver_bail!(SOURCE,
                            "Render pass '{}': subpass {} resolves into multisampled attachment {}",
                            desc.name, subpass_index, resolve.attachment_index);
                    }
                }
            }
        }

        // ========== VALIDATION 3: Dependencies ==========
        let subpass_count = desc.subpasses.len();
        let valid_subpass = |index: u32| index == SUBPASS_EXTERNAL || (index as usize) < subpass_count;
        for dependency in &desc.dependencies {
            if !valid_subpass(dependency.src_subpass) || !valid_subpass(dependency.dst_subpass) {
                archiver_bail!(SOURCE,
                    "Render pass '{}': dependency {} -> {} references a missing subpass",
                    desc.name, dependency.src_subpass, dependency.dst_subpass);
            }
            if dependency.src_subpass == SUBPASS_EXTERNAL && dependency.dst_subpass == SUBPASS_EXTERNAL {
                archiver_bail!(SOURCE,
                    "Render pass '{}': dependency between two external subpasses", desc.name);
            }
        }

        Ok(Self { desc: desc.clone() })
    }

    pub fn name(&self) -> &str {
        &self.desc.name
    }

    pub fn desc(&self) -> &RenderPassDesc {
        &self.desc
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self).map_err(|e| {
            Error::BackendError(format!("Failed to serialize render pass '{}': {}", self.desc.name, e))
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::ConfigurationError(format!("Invalid serialized render pass: {}", e)))
    }
}

#[cfg(test)]
#[path = "render_pass_tests.rs"]
mod tests;
