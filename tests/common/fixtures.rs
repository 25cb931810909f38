//! Test fixture helpers for creating GLB assets and fake tools
//!
//! The fake tools are small shell scripts, so tests using them only run on
//! Unix platforms.

#![allow(dead_code)]

use fbx2glb::pipeline::SceneDocument;
use serde_json::{json, Value};
use std::fs;
use std::path::{Path, PathBuf};

/// glTF JSON for a scene with `meshes` UV-mapped meshes and `materials` materials
///
/// Every mesh has 24 vertices, one position and one UV accessor, and the
/// first material references a base color texture.
pub fn scene_json(meshes: usize, materials: usize) -> Value {
    let mut accessors = Vec::new();
    let mut mesh_list = Vec::new();
    for i in 0..meshes {
        accessors.push(json!({
            "bufferView": 0, "componentType": 5126, "count": 24, "type": "VEC3"
        }));
        accessors.push(json!({
            "bufferView": 0, "componentType": 5126, "count": 24, "type": "VEC2"
        }));
        mesh_list.push(json!({
            "primitives": [{
                "attributes": { "POSITION": 2 * i, "TEXCOORD_0": 2 * i + 1 },
                "material": 0
            }]
        }));
    }

    let material_list: Vec<Value> = (0..materials)
        .map(|i| {
            if i == 0 {
                json!({ "pbrMetallicRoughness": { "baseColorTexture": { "index": 0 } } })
            } else {
                json!({ "name": format!("material-{i}") })
            }
        })
        .collect();

    let nodes: Vec<Value> = (0..meshes).map(|i| json!({ "mesh": i })).collect();
    let node_indices: Vec<usize> = (0..meshes).collect();

    json!({
        "asset": { "version": "2.0", "generator": "fbx2glb tests" },
        "buffers": [{ "byteLength": 64 }],
        "bufferViews": [{ "buffer": 0, "byteLength": 64 }],
        "accessors": accessors,
        "meshes": mesh_list,
        "materials": material_list,
        "textures": [{ "source": 0 }],
        "images": [{ "uri": "albedo.png" }],
        "nodes": nodes,
        "scenes": [{ "nodes": node_indices }],
        "scene": 0,
        "animations": [{ "channels": [{}, {}], "samplers": [] }]
    })
}

/// Encode `json` as a GLB with a small binary chunk
pub fn glb_bytes(json: Value) -> Vec<u8> {
    SceneDocument::new(json, Some(vec![0u8; 64]))
        .and_then(|document| document.to_glb())
        .expect("Failed to encode GLB fixture")
}

/// Write a GLB fixture to `path`
pub fn write_glb(path: &Path, json: Value) -> PathBuf {
    fs::write(path, glb_bytes(json)).expect("Failed to write GLB fixture");
    path.to_path_buf()
}

/// Write a placeholder FBX input (the fake converter never reads it)
pub fn write_fbx(dir: &Path, name: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, b"Kaydara FBX Binary  \0").expect("Failed to write FBX fixture");
    path
}

/// Install an executable shell script named `name` in `dir`
#[cfg(unix)]
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    use std::os::unix::fs::PermissionsExt;

    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).expect("Failed to write script");
    let mut permissions = fs::metadata(&path)
        .expect("Failed to stat script")
        .permissions();
    permissions.set_mode(0o755);
    fs::set_permissions(&path, permissions).expect("Failed to make script executable");
    path
}

/// Fake FBX2glTF that copies `glb` to `<--output>.glb`
#[cfg(unix)]
pub fn fake_converter(dir: &Path, glb: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-fbx2gltf",
        &format!(
            r#"out=""
while [ $# -gt 0 ]; do
  if [ "$1" = "--output" ]; then out="$2"; shift; fi
  shift
done
cp "{}" "$out.glb""#,
            glb.display()
        ),
    )
}

/// Fake FBX2glTF that exits non-zero without writing anything
#[cfg(unix)]
pub fn failing_converter(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "broken-fbx2gltf",
        "echo 'Unsupported FBX version' >&2\nexit 3",
    )
}

/// Fake gltf-transform that copies its input to its output unchanged
///
/// Each invocation is appended to `log` as `<command>`.
#[cfg(unix)]
pub fn passthrough_transformer(dir: &Path, log: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-gltf-transform",
        &format!(
            "echo \"$1\" >> \"{}\"\ncp \"$2\" \"$3\"",
            log.display()
        ),
    )
}

/// Fake gltf-transform that fails on `command` and copies otherwise
#[cfg(unix)]
pub fn transformer_failing_on(dir: &Path, command: &str) -> PathBuf {
    write_script(
        dir,
        "flaky-gltf-transform",
        &format!(
            "if [ \"$1\" = \"{command}\" ]; then echo \"{command} exploded\" >&2; exit 1; fi\ncp \"$2\" \"$3\""
        ),
    )
}
