/// Serializable shader - per-backend compiled variants of one shader

use serde::{Deserialize, Serialize};

use crate::device::{RenderDeviceType, RenderDeviceTypeFlags};
use crate::error::{Error, Result};
use crate::shader::{ShaderStageFlags, ShaderReflection};

/// Compiled output for one backend
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ShaderVariant {
    pub device_type: RenderDeviceType,
    /// DXBC, DXIL, SPIR-V or metallib bytes
    pub bytecode: Vec<u8>,
    pub reflection: Option<ShaderReflection>,
}

/// A backend whose compilation failed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BackendFailure {
    pub device_type: RenderDeviceType,
    pub diagnostics: String,
}

impl BackendFailure {
    /// Same failure as an `Error::CompilationFailure`
    pub fn to_error(&self) -> Error {
        Error::CompilationFailure {
            device_type: self.device_type,
            diagnostics: self.diagnostics.clone(),
        }
    }
}

/// Shader compiled for a set of backends
///
/// Owned by the caller; holds no reference to the device that built it.
/// Variants and failures are kept in backend flag order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SerializableShader {
    name: String,
    entry_point: String,
    stage: ShaderStageFlags,
    variants: Vec<ShaderVariant>,
    failures: Vec<BackendFailure>,
}

impl SerializableShader {
    pub(crate) fn new(name: &str, entry_point: &str, stage: ShaderStageFlags) -> Self {
        Self {
            name: name.to_string(),
            entry_point: entry_point.to_string(),
            stage,
            variants: Vec::new(),
            failures: Vec::new(),
        }
    }

    pub(crate) fn push_variant(&mut self, variant: ShaderVariant) {
        self.variants.push(variant);
    }

    pub(crate) fn push_failure(&mut self, failure: BackendFailure) {
        self.failures.push(failure);
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn entry_point(&self) -> &str {
        &self.entry_point
    }

    pub fn stage(&self) -> ShaderStageFlags {
        self.stage
    }

    /// Successfully compiled variants
    pub fn variants(&self) -> &[ShaderVariant] {
        &self.variants
    }

    /// Variant of one backend, if it compiled
    pub fn variant(&self, device_type: RenderDeviceType) -> Option<&ShaderVariant> {
        self.variants.iter().find(|v| v.device_type == device_type)
    }

    /// Backends that failed, with their diagnostics
    pub fn failures(&self) -> &[BackendFailure] {
        &self.failures
    }

    pub fn succeeded_device_flags(&self) -> RenderDeviceTypeFlags {
        self.variants
            .iter()
            .fold(RenderDeviceTypeFlags::empty(), |flags, v| flags | v.device_type.flag())
    }

    pub fn failed_device_flags(&self) -> RenderDeviceTypeFlags {
        self.failures
            .iter()
            .fold(RenderDeviceTypeFlags::empty(), |flags, f| flags | f.device_type.flag())
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string(self)
            .map_err(|e| Error::BackendError(format!("Failed to serialize shader '{}': {}", self.name, e)))
    }

    pub fn from_json(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| Error::ConfigurationError(format!("Invalid serialized shader: {}", e)))
    }
}

#[cfg(test)]
#[path = "serializable_shader_tests.rs"]
mod tests;
