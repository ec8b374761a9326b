/// Backend kinds, backend flag sets and build capabilities

use std::fmt;
use bitflags::bitflags;
use serde::{Deserialize, Serialize};

/// Backend kind a serializable artifact can target
///
/// The set is closed: every backend the archiver knows about is listed here
/// and dispatch over it is an exhaustive `match`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum RenderDeviceType {
    /// Direct3D 11
    D3D11,
    /// Direct3D 12
    D3D12,
    /// Vulkan
    Vulkan,
    /// Metal on macOS
    MetalMacOs,
    /// Metal on iOS / tvOS
    MetalIos,
}

/// Backend family (one compiler/toolchain configuration per family)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendFamily {
    D3D11,
    D3D12,
    Vulkan,
    Metal,
}

impl RenderDeviceType {
    /// All backend kinds in flag order
    pub const ALL: [RenderDeviceType; 5] = [
        RenderDeviceType::D3D11,
        RenderDeviceType::D3D12,
        RenderDeviceType::Vulkan,
        RenderDeviceType::MetalMacOs,
        RenderDeviceType::MetalIos,
    ];

    /// Single-bit flag for this backend kind
    pub fn flag(&self) -> RenderDeviceTypeFlags {
        match self {
            RenderDeviceType::D3D11 => RenderDeviceTypeFlags::D3D11,
            RenderDeviceType::D3D12 => RenderDeviceTypeFlags::D3D12,
            RenderDeviceType::Vulkan => RenderDeviceTypeFlags::VULKAN,
            RenderDeviceType::MetalMacOs => RenderDeviceTypeFlags::METAL_MACOS,
            RenderDeviceType::MetalIos => RenderDeviceTypeFlags::METAL_IOS,
        }
    }

    /// Family this backend kind belongs to
    pub fn family(&self) -> BackendFamily {
        match self {
            RenderDeviceType::D3D11 => BackendFamily::D3D11,
            RenderDeviceType::D3D12 => BackendFamily::D3D12,
            RenderDeviceType::Vulkan => BackendFamily::Vulkan,
            RenderDeviceType::MetalMacOs | RenderDeviceType::MetalIos => BackendFamily::Metal,
        }
    }

    /// Name used in configuration files
    pub fn config_name(&self) -> &'static str {
        match self {
            RenderDeviceType::D3D11 => "d3d11",
            RenderDeviceType::D3D12 => "d3d12",
            RenderDeviceType::Vulkan => "vulkan",
            RenderDeviceType::MetalMacOs => "metal_macos",
            RenderDeviceType::MetalIos => "metal_ios",
        }
    }

    /// Parse a configuration name (case-insensitive)
    pub fn from_config_name(name: &str) -> Option<Self> {
        let lower = name.to_ascii_lowercase();
        Self::ALL.iter().copied().find(|t| t.config_name() == lower)
    }
}

impl fmt::Display for RenderDeviceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            RenderDeviceType::D3D11 => "Direct3D11",
            RenderDeviceType::D3D12 => "Direct3D12",
            RenderDeviceType::Vulkan => "Vulkan",
            RenderDeviceType::MetalMacOs => "Metal (macOS)",
            RenderDeviceType::MetalIos => "Metal (iOS)",
        };
        f.write_str(name)
    }
}

bitflags! {
    /// Set of backend kinds a creation request targets
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
    pub struct RenderDeviceTypeFlags: u32 {
        const D3D11       = 1 << 0;
        const D3D12       = 1 << 1;
        const VULKAN      = 1 << 2;
        const METAL_MACOS = 1 << 3;
        const METAL_IOS   = 1 << 4;

        const METAL = Self::METAL_MACOS.bits() | Self::METAL_IOS.bits();
    }
}

impl RenderDeviceTypeFlags {
    /// Backend kinds contained in this set, in flag order
    pub fn device_types(self) -> impl Iterator<Item = RenderDeviceType> {
        RenderDeviceType::ALL
            .into_iter()
            .filter(move |t| self.contains(t.flag()))
    }

    /// Human-readable list, e.g. "Direct3D12, Vulkan"
    pub fn describe(self) -> String {
        if self.is_empty() {
            return "<none>".to_string();
        }
        self.device_types()
            .map(|t| t.to_string())
            .collect::<Vec<_>>()
            .join(", ")
    }
}

impl From<RenderDeviceType> for RenderDeviceTypeFlags {
    fn from(device_type: RenderDeviceType) -> Self {
        device_type.flag()
    }
}

/// Backend kinds compiled into this build (cargo features)
pub fn compiled_device_flags() -> RenderDeviceTypeFlags {
    let mut flags = RenderDeviceTypeFlags::empty();
    if cfg!(feature = "d3d11") {
        flags |= RenderDeviceTypeFlags::D3D11;
    }
    if cfg!(feature = "d3d12") {
        flags |= RenderDeviceTypeFlags::D3D12;
    }
    if cfg!(feature = "vulkan") {
        flags |= RenderDeviceTypeFlags::VULKAN;
    }
    if cfg!(feature = "metal") {
        flags |= RenderDeviceTypeFlags::METAL;
    }
    flags
}

#[cfg(test)]
#[path = "device_type_tests.rs"]
mod tests;
