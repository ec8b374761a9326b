use super::*;

fn toolchain() -> CommandLineToolchain {
    CommandLineToolchain::new(MetalToolchainConfig {
        temp_shader_folder: "/tmp/msl".to_string(),
        msl_preprocessor_cmd: "python3 preprocess.py --strict".to_string(),
        compile_options: "-std=metal2.4  -ffast-math".to_string(),
        link_options: "-split-module".to_string(),
    })
}

#[test]
fn test_metal_sdk_names() {
    assert_eq!(metal_sdk(RenderDeviceType::MetalMacOs), Some("macosx"));
    assert_eq!(metal_sdk(RenderDeviceType::MetalIos), Some("iphoneos"));
    assert_eq!(metal_sdk(RenderDeviceType::Vulkan), None);
}

#[test]
fn test_compile_args() {
    let args = toolchain().compile_args("macosx", Path::new("/tmp/msl/a.metal"), Path::new("/tmp/msl/a.air"));
    assert_eq!(
        args,
        vec!["-sdk", "macosx", "metal", "-std=metal2.4", "-ffast-math", "-c", "/tmp/msl/a.metal", "-o", "/tmp/msl/a.air"]
    );
}

#[test]
fn test_link_args() {
    let args = toolchain().link_args("iphoneos", Path::new("a.air"), Path::new("a.metallib"));
    assert_eq!(args, vec!["-sdk", "iphoneos", "metallib", "-split-module", "a.air", "-o", "a.metallib"]);
}

#[test]
fn test_preprocessor_command_appends_file() {
    let (program, args) = toolchain().preprocessor_command(Path::new("a.metal")).unwrap();
    assert_eq!(program, "python3");
    assert_eq!(args, vec!["preprocess.py", "--strict", "a.metal"]);
}

#[test]
fn test_no_preprocessor_when_empty() {
    let toolchain = CommandLineToolchain::default();
    assert!(toolchain.preprocessor_command(Path::new("a.metal")).is_none());
}

#[test]
fn test_work_folder() {
    assert_eq!(toolchain().work_folder(), PathBuf::from("/tmp/msl"));
    assert!(CommandLineToolchain::default().work_folder().ends_with("galaxy3d_msl"));
}

#[test]
fn test_file_stem_is_sanitized() {
    let stem = CommandLineToolchain::file_stem("Shadow Pass/VS");
    assert!(stem.starts_with("Shadow_Pass_VS_"));
    assert!(CommandLineToolchain::file_stem("").starts_with("shader_"));
}

#[test]
fn test_build_library_rejects_non_metal_target() {
    let request = MetalBuildRequest {
        name: "PS",
        msl_source: "fragment float4 main() { return 0; }",
        device_type: RenderDeviceType::D3D12,
    };
    let err = toolchain().build_library(&request).unwrap_err();
    assert!(err.contains("not a Metal device type"));
}

#[test]
fn test_failed_build_removes_intermediate_files() {
    let folder = std::env::temp_dir().join(format!("galaxy3d_msl_failed_{}", std::process::id()));
    let toolchain = CommandLineToolchain::new(MetalToolchainConfig {
        temp_shader_folder: folder.display().to_string(),
        msl_preprocessor_cmd: "galaxy3d-missing-msl-preprocessor".to_string(),
        ..Default::default()
    });
    let request = MetalBuildRequest {
        name: "Sky PS",
        msl_source: "fragment float4 main() { return 0; }",
        device_type: RenderDeviceType::MetalMacOs,
    };

    let err = toolchain.build_library(&request).unwrap_err();
    assert!(err.contains("galaxy3d-missing-msl-preprocessor"));

    let leftovers = std::fs::read_dir(&folder).unwrap().count();
    assert_eq!(leftovers, 0);
    let _ = std::fs::remove_dir(&folder);
}
