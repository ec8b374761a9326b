use super::*;
use crate::error::ErrorKind;

#[test]
fn test_empty_file_uses_defaults() {
    let config = ArchiverConfig::from_toml_str("").unwrap();
    assert_eq!(config, ArchiverConfig::default());

    let create_info = config.into_create_info().unwrap();
    assert_eq!(create_info, SerializationDeviceCreateInfo::default());
}

#[test]
fn test_full_configuration() {
    let config = ArchiverConfig::from_toml_str(
        r#"
        [device]
        backends = ["d3d12", "Vulkan", "metal"]
        d3d11_feature_level = "10.1"
        d3d12_shader_version = "6.6"
        vulkan_version = "1.1"
        has_spirv14 = true

        [profile]
        device_type = "d3d12"
        api_version = "12"

        [adapter]
        description = "CI runner"
        vendor_id = 4318

        [metal]
        temp_shader_folder = "build/msl"
        link_options = "-v"
        "#,
    )
    .unwrap();

    let create_info = config.into_create_info().unwrap();
    assert_eq!(
        create_info.device_flags,
        RenderDeviceTypeFlags::D3D12 | RenderDeviceTypeFlags::VULKAN | RenderDeviceTypeFlags::METAL
    );
    assert_eq!(create_info.d3d11_feature_level, Version::new(10, 1));
    assert_eq!(create_info.d3d12_shader_version, Version::new(6, 6));
    assert_eq!(create_info.vk_version, Version::new(1, 1));
    assert!(create_info.has_spirv14);
    assert_eq!(create_info.device_info.device_type, RenderDeviceType::D3D12);
    assert_eq!(create_info.device_info.api_version, Version::new(12, 0));
    assert_eq!(create_info.adapter_info.description, "CI runner");
    assert_eq!(create_info.adapter_info.vendor_id, 4318);
    assert_eq!(create_info.metal.temp_shader_folder, "build/msl");
    assert_eq!(create_info.metal.link_options, "-v");
    assert!(create_info.metal.compile_options.is_empty());
}

#[test]
fn test_unknown_backend_rejected() {
    let config = ArchiverConfig::from_toml_str("[device]\nbackends = [\"opengl\"]").unwrap();
    let err = config.into_create_info().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigurationError);
    assert!(err.to_string().contains("opengl"));
}

#[test]
fn test_malformed_version_rejected() {
    let config = ArchiverConfig::from_toml_str("[device]\nvulkan_version = \"one.two\"").unwrap();
    let err = config.into_create_info().unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigurationError);
    assert!(err.to_string().contains("device.vulkan_version"));
}

#[test]
fn test_malformed_toml_rejected() {
    let err = ArchiverConfig::from_toml_str("[device\nbackends = 3").unwrap_err();
    assert_eq!(err.kind(), ErrorKind::ConfigurationError);
}

#[test]
fn test_load_from_path() {
    let path = std::env::temp_dir().join(format!("galaxy3d_archiver_config_{}.toml", std::process::id()));
    std::fs::write(&path, "[device]\nbackends = [\"vulkan\"]\n").unwrap();

    let config = ArchiverConfig::load_from_path(&path).unwrap();
    std::fs::remove_file(&path).unwrap();

    assert_eq!(config.device.backends, vec!["vulkan".to_string()]);
}

#[test]
fn test_missing_file_uses_defaults() {
    let path = std::env::temp_dir().join("galaxy3d_archiver_missing_config.toml");
    let config = ArchiverConfig::load_from_path(&path).unwrap();
    assert_eq!(config, ArchiverConfig::default());
}
