/// Archiver configuration - TOML view of `SerializationDeviceCreateInfo`
///
/// Every section and field has a default, so a partial file (or no file at
/// all) describes a usable device.
///
/// ```toml
/// [device]
/// backends = ["d3d12", "vulkan", "metal_ios"]
/// d3d12_shader_version = "6.6"
/// vulkan_version = "1.2"
///
/// [metal]
/// temp_shader_folder = "build/msl"
/// compile_options = "-std=ios-metal2.4"
/// ```

use std::path::Path;
use serde::{Deserialize, Serialize};

use crate::archiver::Archiver;
use crate::device::{
    GraphicsAdapterInfo, RenderDeviceInfo, RenderDeviceType, RenderDeviceTypeFlags, Version,
    compiled_device_flags,
};
use crate::error::{Error, Result};
use crate::serialization_device::SerializationDeviceCreateInfo;
use crate::shader::MetalToolchainConfig;
use crate::{archiver_bail, archiver_info};

const SOURCE: &str = "galaxy3d::Config";

/// Root configuration structure
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ArchiverConfig {
    pub device: DeviceConfig,
    pub profile: ProfileConfig,
    pub adapter: AdapterConfig,
    pub metal: MetalToolchainConfig,
}

/// Backends and compiler targets
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DeviceConfig {
    /// Backend names (`d3d11`, `d3d12`, `vulkan`, `metal_macos`, `metal_ios`,
    /// or `metal` for both); empty means every compiled-in backend
    pub backends: Vec<String>,
    pub d3d11_feature_level: String,
    pub d3d12_shader_version: String,
    pub vulkan_version: String,
    pub has_spirv14: bool,
}

impl Default for DeviceConfig {
    fn default() -> Self {
        Self {
            backends: Vec::new(),
            d3d11_feature_level: "11.0".to_string(),
            d3d12_shader_version: "6.5".to_string(),
            vulkan_version: "1.0".to_string(),
            has_spirv14: false,
        }
    }
}

/// Capability profile reported by the stand-in device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProfileConfig {
    pub device_type: String,
    pub api_version: String,
}

impl Default for ProfileConfig {
    fn default() -> Self {
        Self {
            device_type: "vulkan".to_string(),
            api_version: "1.0".to_string(),
        }
    }
}

/// Adapter reported by the stand-in device
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AdapterConfig {
    pub description: String,
    pub vendor_id: u32,
    pub device_id: u32,
}

impl Default for AdapterConfig {
    fn default() -> Self {
        let adapter = GraphicsAdapterInfo::default();
        Self {
            description: adapter.description,
            vendor_id: adapter.vendor_id,
            device_id: adapter.device_id,
        }
    }
}

impl ArchiverConfig {
    /// Load configuration from a TOML file
    ///
    /// A missing file yields the defaults. Read failures are `BackendError`,
    /// malformed TOML is `ConfigurationError`.
    pub fn load_from_path<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            archiver_info!(SOURCE, "Config file not found at {:?}, using defaults", path);
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| {
            Archiver::log_error(
                SOURCE,
                Error::BackendError(format!("Failed to read config file {:?}: {}", path, e)),
            )
        })?;

        let config = Self::from_toml_str(&content)?;
        archiver_info!(SOURCE, "Loaded configuration from {:?}", path);
        Ok(config)
    }

    /// Parse configuration from TOML text
    pub fn from_toml_str(content: &str) -> Result<Self> {
        match toml::from_str(content) {
            Ok(config) => Ok(config),
            Err(e) => archiver_bail!(SOURCE, "Failed to parse configuration: {}", e),
        }
    }

    /// Resolve backend names and versions into a device create-info
    pub fn into_create_info(self) -> Result<SerializationDeviceCreateInfo> {
        let device_flags = if self.device.backends.is_empty() {
            compiled_device_flags()
        } else {
            let mut flags = RenderDeviceTypeFlags::empty();
            for name in &self.device.backends {
                flags |= parse_backend(name)?;
            }
            flags
        };

        let profile_type = match RenderDeviceType::from_config_name(&self.profile.device_type) {
            Some(device_type) => device_type,
            None => archiver_bail!(SOURCE, "Unknown profile device type '{}'", self.profile.device_type),
        };

        let device_info = RenderDeviceInfo {
            device_type: profile_type,
            api_version: parse_version("profile.api_version", &self.profile.api_version)?,
            ..RenderDeviceInfo::default()
        };
        let adapter_info = GraphicsAdapterInfo {
            description: self.adapter.description,
            vendor_id: self.adapter.vendor_id,
            device_id: self.adapter.device_id,
            ..GraphicsAdapterInfo::default()
        };

        Ok(SerializationDeviceCreateInfo {
            device_info,
            adapter_info,
            device_flags,
            d3d11_feature_level: parse_version("device.d3d11_feature_level", &self.device.d3d11_feature_level)?,
            d3d12_shader_version: parse_version("device.d3d12_shader_version", &self.device.d3d12_shader_version)?,
            vk_version: parse_version("device.vulkan_version", &self.device.vulkan_version)?,
            has_spirv14: self.device.has_spirv14,
            metal: self.metal,
        })
    }
}

fn parse_backend(name: &str) -> Result<RenderDeviceTypeFlags> {
    if name.eq_ignore_ascii_case("metal") {
        return Ok(RenderDeviceTypeFlags::METAL);
    }
    match RenderDeviceType::from_config_name(name) {
        Some(device_type) => Ok(device_type.flag()),
        None => archiver_bail!(SOURCE, "Unknown backend '{}'", name),
    }
}

fn parse_version(key: &str, text: &str) -> Result<Version> {
    Version::parse(text).map_err(|e| Archiver::log_error(SOURCE, match e {
        Error::ConfigurationError(message) => Error::ConfigurationError(format!("{}: {}", key, message)),
        other => other,
    }))
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
