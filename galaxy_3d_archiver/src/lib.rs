/*!
# Galaxy 3D Archiver

Offline serialization device for the Galaxy 3D engine.

The archiver produces backend-specific artifacts (shader bytecode, resource
signature layouts, render passes, pipeline binding tables) for Direct3D 11,
Direct3D 12, Vulkan and Metal from one backend-agnostic description, without
a GPU or a live graphics context. Artifacts are serializable and can be
written into an archive consumed by the runtime backends.

## Architecture

- **SerializationDevice**: entry point; validates requests and fans them out per backend
- **BackendRegistry**: one optional module per backend family, owning its compiler handles
- **SerializableShader**: per-backend compiled variants, with tolerated per-backend failures
- **SerializableResourceSignature**: per-backend slot layout of a resource signature
- **PipelineResourceBinding**: flattened binding table of a whole pipeline
- **StandInDevice**: no-op `RenderDevice` reporting a synthetic capability profile

Shader compilers and the Metal toolchain are services supplied through the
`CompilerFactory` and `MetalToolchain` traits.
*/

// Internal modules
mod archiver;
mod error;
mod backend;
mod serialization_device;
mod config;
pub mod log;
pub mod device;
pub mod shader;
pub mod signature;
pub mod render_pass;

// Main galaxy3d namespace module
pub mod galaxy3d {
    // Error types
    pub use crate::error::{Error, ErrorKind, Result};

    // Logging facade
    pub use crate::archiver::Archiver;

    // Serialization device
    pub use crate::serialization_device::SerializationDevice;

    // Logging sub-module (types only, NOT macros)
    pub mod log {
        pub use crate::log::{Logger, LogEntry, LogSeverity, DefaultLogger};
    }

    // Backend kinds, device info and the stand-in device
    pub mod device {
        pub use crate::device::*;
    }

    // Shader descriptions, compiler services and serializable shaders
    pub mod shader {
        pub use crate::shader::*;
    }

    // Resource signatures, slot layouts and binding tables
    pub mod signature {
        pub use crate::signature::*;
    }

    // Render pass descriptions
    pub mod render_pass {
        pub use crate::render_pass::*;
    }

    // Backend registry
    pub mod backend {
        pub use crate::backend::{
            BackendRegistry, BackendModule, BackendSettings,
            D3D11Backend, D3D12Backend, VulkanBackend, MetalBackend,
        };
    }

    // Device construction and configuration files
    pub mod config {
        pub use crate::serialization_device::SerializationDeviceCreateInfo;
        pub use crate::config::{ArchiverConfig, DeviceConfig, ProfileConfig, AdapterConfig};
    }
}
