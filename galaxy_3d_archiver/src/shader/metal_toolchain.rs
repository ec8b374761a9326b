/// Metal toolchain - builds a metallib from MSL with external commands
///
/// The default `CommandLineToolchain` shells out to an optional MSL
/// preprocessor and to `xcrun metal` / `xcrun metallib`. All command strings
/// come from the device configuration and are treated as opaque.

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;
use serde::{Deserialize, Serialize};

use crate::device::RenderDeviceType;

/// Metal toolchain configuration
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct MetalToolchainConfig {
    /// Folder for intermediate `.metal`, `.air` and `.metallib` files
    /// (system temp folder when empty)
    pub temp_shader_folder: String,
    /// Command run on the `.metal` file before compiling; the file path is appended
    pub msl_preprocessor_cmd: String,
    /// Extra arguments for `metal`
    pub compile_options: String,
    /// Extra arguments for `metallib`
    pub link_options: String,
}

/// One Metal library build
#[derive(Debug, Clone, Copy)]
pub struct MetalBuildRequest<'a> {
    pub name: &'a str,
    pub msl_source: &'a str,
    /// `MetalMacOs` or `MetalIos`
    pub device_type: RenderDeviceType,
}

/// Builds metallib bytes from MSL; errors are diagnostic text
pub trait MetalToolchain: Send {
    fn build_library(&self, request: &MetalBuildRequest<'_>) -> std::result::Result<Vec<u8>, String>;
}

/// SDK name passed to `xcrun -sdk`
pub fn metal_sdk(device_type: RenderDeviceType) -> Option<&'static str> {
    match device_type {
        RenderDeviceType::MetalMacOs => Some("macosx"),
        RenderDeviceType::MetalIos => Some("iphoneos"),
        RenderDeviceType::D3D11 | RenderDeviceType::D3D12 | RenderDeviceType::Vulkan => None,
    }
}

/// Default toolchain: external processes driven by `MetalToolchainConfig`
#[derive(Debug, Clone, Default)]
pub struct CommandLineToolchain {
    config: MetalToolchainConfig,
}

impl CommandLineToolchain {
    pub fn new(config: MetalToolchainConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &MetalToolchainConfig {
        &self.config
    }

    /// Folder intermediates are written to
    pub fn work_folder(&self) -> PathBuf {
        if self.config.temp_shader_folder.is_empty() {
            std::env::temp_dir().join("galaxy3d_msl")
        } else {
            PathBuf::from(&self.config.temp_shader_folder)
        }
    }

    /// File stem for a shader: name reduced to `[A-Za-z0-9_]`, suffixed with the process id
    pub fn file_stem(name: &str) -> String {
        let mut stem: String = name
            .chars()
            .map(|c| if c.is_ascii_alphanumeric() || c == '_' { c } else { '_' })
            .collect();
        if stem.is_empty() {
            stem.push_str("shader");
        }
        format!("{}_{}", stem, std::process::id())
    }

    /// `xcrun` arguments compiling `metal_path` to `air_path`
    pub fn compile_args(&self, sdk: &str, metal_path: &Path, air_path: &Path) -> Vec<String> {
        let mut args = vec!["-sdk".to_string(), sdk.to_string(), "metal".to_string()];
        args.extend(self.config.compile_options.split_whitespace().map(str::to_string));
        args.push("-c".to_string());
        args.push(metal_path.display().to_string());
        args.push("-o".to_string());
        args.push(air_path.display().to_string());
        args
    }

    /// `xcrun` arguments linking `air_path` to `lib_path`
    pub fn link_args(&self, sdk: &str, air_path: &Path, lib_path: &Path) -> Vec<String> {
        let mut args = vec!["-sdk".to_string(), sdk.to_string(), "metallib".to_string()];
        args.extend(self.config.link_options.split_whitespace().map(str::to_string));
        args.push(air_path.display().to_string());
        args.push("-o".to_string());
        args.push(lib_path.display().to_string());
        args
    }

    /// Preprocessor program and arguments, `None` when no preprocessor is configured
    pub fn preprocessor_command(&self, metal_path: &Path) -> Option<(String, Vec<String>)> {
        let mut parts = self.config.msl_preprocessor_cmd.split_whitespace();
        let program = parts.next()?.to_string();
        let mut args: Vec<String> = parts.map(str::to_string).collect();
        args.push(metal_path.display().to_string());
        Some((program, args))
    }

    fn build_in(&self, folder: &Path, sdk: &str, request: &MetalBuildRequest<'_>) -> std::result::Result<Vec<u8>, String> {
        let stem = Self::file_stem(request.name);
        let metal_path = folder.join(format!("{}.metal", stem));
        let air_path = folder.join(format!("{}.air", stem));
        let lib_path = folder.join(format!("{}.metallib", stem));
        let _intermediates = IntermediateFiles(vec![metal_path.clone(), air_path.clone(), lib_path.clone()]);

        fs::write(&metal_path, request.msl_source)
            .map_err(|e| format!("Failed to write '{}': {}", metal_path.display(), e))?;

        if let Some((program, args)) = self.preprocessor_command(&metal_path) {
            run_tool(&program, &args)?;
        }
        run_tool("xcrun", &self.compile_args(sdk, &metal_path, &air_path))?;
        run_tool("xcrun", &self.link_args(sdk, &air_path, &lib_path))?;

        let bytes = fs::read(&lib_path)
            .map_err(|e| format!("Failed to read '{}': {}", lib_path.display(), e))?;
        Ok(bytes)
    }
}

impl MetalToolchain for CommandLineToolchain {
    fn build_library(&self, request: &MetalBuildRequest<'_>) -> std::result::Result<Vec<u8>, String> {
        let sdk = metal_sdk(request.device_type)
            .ok_or_else(|| format!("{} is not a Metal device type", request.device_type))?;

        let folder = self.work_folder();
        fs::create_dir_all(&folder)
            .map_err(|e| format!("Failed to create '{}': {}", folder.display(), e))?;

        self.build_in(&folder, sdk, request)
    }
}

/// Intermediate files of one build, removed on drop whether the build succeeded or not
struct IntermediateFiles(Vec<PathBuf>);

impl Drop for IntermediateFiles {
    fn drop(&mut self) {
        for path in &self.0 {
            let _ = fs::remove_file(path);
        }
    }
}

/// Run an external tool, returning its stderr on failure
fn run_tool(program: &str, args: &[String]) -> std::result::Result<(), String> {
    let output = Command::new(program)
        .args(args)
        .output()
        .map_err(|e| format!("Failed to execute '{}': {}", program, e))?;
    if !output.status.success() {
        return Err(format!(
            "'{}' returned {}: {}",
            program,
            output.status,
            String::from_utf8_lossy(&output.stderr).trim()
        ));
    }
    Ok(())
}

#[cfg(test)]
#[path = "metal_toolchain_tests.rs"]
mod tests;
