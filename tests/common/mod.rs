//! Common test utilities
//!
//! Shared helpers for integration tests: GLB fixtures and stand-ins for the
//! external converter and transform tools.

pub mod fixtures;

use std::fs;
use std::path::Path;

/// Check if running in CI environment
#[allow(dead_code)]
pub fn is_ci() -> bool {
    std::env::var("CI").is_ok() || std::env::var("GITHUB_ACTIONS").is_ok()
}

/// Path of a binary that is guaranteed to exist
///
/// Used wherever a test needs tool detection to succeed without the real
/// FBX2glTF or gltf-transform being installed.
#[allow(dead_code)]
pub fn existing_binary() -> String {
    env!("CARGO_BIN_EXE_fbx2glb").to_string()
}

/// Write a `.fbx2glb.toml` into `dir`
#[allow(dead_code)]
pub fn write_config(dir: &Path, contents: &str) {
    fs::write(dir.join(".fbx2glb.toml"), contents).expect("Failed to write .fbx2glb.toml");
}

/// Write a `.fbx2glb.toml` pointing both tools at the given binaries
#[allow(dead_code)]
pub fn write_tool_config(dir: &Path, converter: &str, transformer: &str) {
    write_config(
        dir,
        &format!(
            "[tools]\nconverter = {:?}\ntransformer = {:?}\n",
            converter, transformer
        ),
    );
}

/// True if any pipeline artifact exists in `dir`
#[allow(dead_code)]
pub fn has_artifacts(dir: &Path) -> bool {
    [
        ".fbx2glb-intermediate.glb",
        "inspect-before.json",
        "inspect-after.json",
        "comparison-report.json",
    ]
    .iter()
    .any(|name| dir.join(name).exists())
}
