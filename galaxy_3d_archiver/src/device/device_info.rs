/// Synthetic device and adapter description reported by the stand-in device

use std::fmt;
use serde::{Deserialize, Serialize};
use crate::device::RenderDeviceType;
use crate::error::{Error, Result};

/// `major.minor` version (API version, feature level, shader model, SPIR-V version)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize)]
pub struct Version {
    pub major: u32,
    pub minor: u32,
}

impl Version {
    pub const fn new(major: u32, minor: u32) -> Self {
        Self { major, minor }
    }

    /// Parse `"major.minor"` (a bare `"major"` means minor 0)
    pub fn parse(text: &str) -> Result<Self> {
        let text = text.trim();
        let mut parts = text.splitn(2, '.');
        let major = parts.next().unwrap_or_default();
        let minor = parts.next().unwrap_or("0");

        let parse_part = |part: &str| {
            part.parse::<u32>().map_err(|_| {
                Error::ConfigurationError(format!("Invalid version '{}', expected 'major.minor'", text))
            })
        };
        Ok(Self::new(parse_part(major)?, parse_part(minor)?))
    }
}

impl fmt::Display for Version {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.major, self.minor)
    }
}

/// Optional device features advertised by the synthetic device
///
/// An offline device has nothing to probe, so every feature is reported as
/// enabled by default; artifacts are validated against the real device at load time.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeviceFeatures {
    pub separable_programs: bool,
    pub geometry_shaders: bool,
    pub tessellation: bool,
    pub compute_shaders: bool,
    pub mesh_shaders: bool,
    pub ray_tracing: bool,
    pub bindless_resources: bool,
    pub shader_float16: bool,
    pub subpass_framebuffer_fetch: bool,
}

impl Default for DeviceFeatures {
    fn default() -> Self {
        Self {
            separable_programs: true,
            geometry_shaders: true,
            tessellation: true,
            compute_shaders: true,
            mesh_shaders: true,
            ray_tracing: true,
            bindless_resources: true,
            shader_float16: true,
            subpass_framebuffer_fetch: true,
        }
    }
}

/// Device capability profile
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenderDeviceInfo {
    /// Backend this profile describes
    pub device_type: RenderDeviceType,
    /// Graphics API version
    pub api_version: Version,
    /// Optional features
    pub features: DeviceFeatures,
}

impl Default for RenderDeviceInfo {
    fn default() -> Self {
        Self {
            device_type: RenderDeviceType::Vulkan,
            api_version: Version::new(1, 0),
            features: DeviceFeatures::default(),
        }
    }
}

/// Adapter type
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdapterType {
    #[default]
    Unknown,
    Software,
    Integrated,
    Discrete,
}

/// Adapter vendor
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum AdapterVendor {
    #[default]
    Unknown,
    Nvidia,
    Amd,
    Intel,
    Arm,
    Qualcomm,
    ImgTech,
    Msft,
    Apple,
}

/// Adapter memory sizes in bytes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AdapterMemoryInfo {
    pub local_memory: u64,
    pub host_visible_memory: u64,
    pub unified_memory: u64,
}

/// Graphics adapter description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GraphicsAdapterInfo {
    pub description: String,
    pub adapter_type: AdapterType,
    pub vendor: AdapterVendor,
    pub vendor_id: u32,
    pub device_id: u32,
    pub num_outputs: u32,
    pub memory: AdapterMemoryInfo,
}

impl Default for GraphicsAdapterInfo {
    fn default() -> Self {
        Self {
            description: "Galaxy3D serialization adapter".to_string(),
            adapter_type: AdapterType::Software,
            vendor: AdapterVendor::Unknown,
            vendor_id: 0,
            device_id: 0,
            num_outputs: 0,
            memory: AdapterMemoryInfo::default(),
        }
    }
}

#[cfg(test)]
#[path = "device_info_tests.rs"]
mod tests;
