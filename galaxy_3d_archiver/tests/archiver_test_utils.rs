#![allow(dead_code)]
//! Archiver test utilities - spy compiler services shared by integration tests
//!
//! The spies count every call so tests can assert that a rejected request
//! never reached a compiler or the Metal toolchain.

use galaxy_3d_archiver::galaxy3d::SerializationDevice;
use galaxy_3d_archiver::galaxy3d::config::SerializationDeviceCreateInfo;
use galaxy_3d_archiver::galaxy3d::device::RenderDeviceTypeFlags;
use galaxy_3d_archiver::galaxy3d::shader::{
    CompileOutput, CompileRequest, CompilerFactory, CompilerFamily, MetalBuildRequest,
    MetalToolchain, ReflectedResource, ShaderCompiler, ShaderReflection,
};
use galaxy_3d_archiver::galaxy3d::signature::ShaderResourceType;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Shared call counters of the spy services
#[derive(Clone, Default)]
pub struct SpyCounters {
    pub compilers_created: Arc<AtomicUsize>,
    pub compile_calls: Arc<AtomicUsize>,
    pub toolchain_calls: Arc<AtomicUsize>,
}

impl SpyCounters {
    pub fn compile_calls(&self) -> usize {
        self.compile_calls.load(Ordering::SeqCst)
    }

    pub fn compilers_created(&self) -> usize {
        self.compilers_created.load(Ordering::SeqCst)
    }

    pub fn toolchain_calls(&self) -> usize {
        self.toolchain_calls.load(Ordering::SeqCst)
    }

    /// Total number of calls into any compiler service
    pub fn total_calls(&self) -> usize {
        self.compilers_created() + self.compile_calls() + self.toolchain_calls()
    }
}

/// Compiler that answers `family|target|source`, or fails when its family is listed
pub struct SpyCompiler {
    family: CompilerFamily,
    failing: Vec<CompilerFamily>,
    counters: SpyCounters,
}

impl ShaderCompiler for SpyCompiler {
    fn compile(&self, request: &CompileRequest<'_>) -> Result<CompileOutput, String> {
        self.counters.compile_calls.fetch_add(1, Ordering::SeqCst);
        if self.failing.contains(&self.family) {
            return Err(format!("{}({}): error: unexpected token", request.name, request.entry_point));
        }

        // Vulkan output is not real SPIR-V, so report the reflection directly
        let reflection = match self.family {
            CompilerFamily::DxcVulkan => Some(ShaderReflection {
                resources: vec![ReflectedResource {
                    name: "g_Constants".to_string(),
                    resource_type: ShaderResourceType::ConstantBuffer,
                    array_size: 1,
                    set: 0,
                    binding: 0,
                }],
            }),
            _ => None,
        };

        Ok(CompileOutput {
            bytecode: format!("{}|{}|{}", self.family, request.target, request.source).into_bytes(),
            reflection,
        })
    }
}

pub struct SpyCompilerFactory {
    pub failing: Vec<CompilerFamily>,
    pub counters: SpyCounters,
}

impl CompilerFactory for SpyCompilerFactory {
    fn create_compiler(&self, family: CompilerFamily) -> Result<Box<dyn ShaderCompiler>, String> {
        self.counters.compilers_created.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(SpyCompiler {
            family,
            failing: self.failing.clone(),
            counters: self.counters.clone(),
        }))
    }
}

/// Toolchain returning `metallib:<sdk backend>:<msl>` without running anything
pub struct SpyToolchain {
    pub counters: SpyCounters,
}

impl MetalToolchain for SpyToolchain {
    fn build_library(&self, request: &MetalBuildRequest<'_>) -> Result<Vec<u8>, String> {
        self.counters.toolchain_calls.fetch_add(1, Ordering::SeqCst);
        Ok(format!("metallib:{}:{}", request.device_type.config_name(), request.msl_source).into_bytes())
    }
}

/// Device for `device_flags` whose compilers fail for the `failing` families
pub fn create_spy_device(
    device_flags: RenderDeviceTypeFlags,
    failing: Vec<CompilerFamily>,
) -> (SerializationDevice, SpyCounters) {
    let counters = SpyCounters::default();
    let create_info = SerializationDeviceCreateInfo {
        device_flags,
        ..Default::default()
    };
    let device = SerializationDevice::with_services(
        create_info,
        Box::new(SpyCompilerFactory { failing, counters: counters.clone() }),
        Box::new(SpyToolchain { counters: counters.clone() }),
    )
    .expect("Failed to create serialization device for tests");
    (device, counters)
}

/// Every backend kind
pub fn all_backends() -> RenderDeviceTypeFlags {
    RenderDeviceTypeFlags::D3D11
        | RenderDeviceTypeFlags::D3D12
        | RenderDeviceTypeFlags::VULKAN
        | RenderDeviceTypeFlags::METAL
}
