//! Structural snapshots of a scene document
//!
//! [`InspectionCollector::capture`] reads the glTF JSON of a [`SceneDocument`]
//! and summarizes mesh, material, texture, animation and scene composition.
//! Capturing never touches the document; two captures of the same document
//! are equal.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::collections::{BTreeMap, BTreeSet};

use super::document::{SceneDocument, KHR_DRACO_MESH_COMPRESSION};

/// Per-mesh structural record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshRecord {
    /// Sum of the POSITION accessor counts of the mesh's primitives
    pub vertex_count: u64,
    /// Geometry bytes referenced by the mesh
    pub byte_size: u64,
    /// Attribute semantics present on any primitive
    pub attribute_names: BTreeSet<String>,
}

impl MeshRecord {
    /// Whether any primitive carries a texture coordinate set
    pub fn has_uv(&self) -> bool {
        self.attribute_names
            .iter()
            .any(|name| name.starts_with("TEXCOORD_"))
    }
}

/// Per-material structural record
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialRecord {
    /// Texture references made by the material, extensions included
    pub texture_refs: u64,
}

/// Scene-level aggregate
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneAggregate {
    /// Vertices uploaded when rendering every scene, shared data counted once
    pub upload_vertex_count: u64,
}

/// Point-in-time structural summary of a scene document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InspectionSnapshot {
    /// Mesh records in document order
    pub meshes: Vec<MeshRecord>,
    /// Material records in document order
    pub materials: Vec<MaterialRecord>,
    /// Size of the document texture registry, when the document has one
    pub textures: Option<u64>,
    /// Animation tracks (channels) over all animations
    pub animations: u64,
    /// Scene aggregate, when the document declares scenes
    pub scenes: Option<SceneAggregate>,
    /// Size of the GLB file the snapshot was taken from
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file_size: Option<u64>,
}

impl InspectionSnapshot {
    /// Sum of per-mesh vertex counts
    pub fn mesh_vertex_total(&self) -> u64 {
        saturating_total(self.meshes.iter().map(|m| m.vertex_count))
    }

    /// Sum of per-mesh geometry byte sizes
    pub fn geometry_bytes(&self) -> u64 {
        saturating_total(self.meshes.iter().map(|m| m.byte_size))
    }

    /// Number of meshes carrying texture coordinates
    pub fn uv_mesh_count(&self) -> u64 {
        self.meshes.iter().filter(|m| m.has_uv()).count() as u64
    }

    /// Sum of per-material texture references
    pub fn material_texture_refs(&self) -> u64 {
        saturating_total(self.materials.iter().map(|m| m.texture_refs))
    }
}

/// Captures [`InspectionSnapshot`]s
pub struct InspectionCollector;

impl InspectionCollector {
    /// Snapshot a document
    pub fn capture(document: &SceneDocument) -> InspectionSnapshot {
        Self::capture_sized(document, None)
    }

    /// Snapshot a document together with the size of the file it came from
    pub fn capture_sized(document: &SceneDocument, file_size: Option<u64>) -> InspectionSnapshot {
        let root = match RootView::deserialize(document.json()) {
            Ok(root) => root,
            Err(e) => {
                log::warn!("unexpected glTF layout, inspecting an empty document: {e}");
                RootView::default()
            }
        };

        InspectionSnapshot {
            meshes: root.meshes.iter().map(|mesh| root.mesh_record(mesh)).collect(),
            materials: root
                .materials
                .iter()
                .map(|material| MaterialRecord {
                    texture_refs: count_texture_refs(material),
                })
                .collect(),
            textures: root.textures.as_ref().map(|t| t.len() as u64),
            animations: root.animations.iter().map(|a| a.channels.len() as u64).sum(),
            scenes: (!root.scenes.is_empty()).then(|| SceneAggregate {
                upload_vertex_count: root.upload_vertex_count(),
            }),
            file_size,
        }
    }
}

// The views below never reject a document. A malformed field degrades to its
// default, and a malformed array element to a default element so that index
// references into the array stay aligned.

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct RootView {
    #[serde(deserialize_with = "lenient_vec")]
    accessors: Vec<AccessorView>,
    #[serde(deserialize_with = "lenient_vec")]
    buffer_views: Vec<BufferViewView>,
    #[serde(deserialize_with = "lenient_vec")]
    meshes: Vec<MeshView>,
    #[serde(deserialize_with = "lenient_vec")]
    materials: Vec<Value>,
    #[serde(deserialize_with = "lenient")]
    textures: Option<Vec<Value>>,
    #[serde(deserialize_with = "lenient_vec")]
    animations: Vec<AnimationView>,
    #[serde(deserialize_with = "lenient_vec")]
    scenes: Vec<SceneView>,
    #[serde(deserialize_with = "lenient_vec")]
    nodes: Vec<NodeView>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct AccessorView {
    #[serde(deserialize_with = "lenient")]
    count: u64,
    #[serde(deserialize_with = "lenient")]
    component_type: u32,
    #[serde(rename = "type", deserialize_with = "lenient")]
    kind: String,
    #[serde(deserialize_with = "lenient")]
    buffer_view: Option<usize>,
}

impl AccessorView {
    fn component_size(&self) -> u64 {
        match self.component_type {
            5120 | 5121 => 1,
            5122 | 5123 => 2,
            5125 | 5126 => 4,
            _ => 0,
        }
    }

    fn component_count(&self) -> u64 {
        match self.kind.as_str() {
            "SCALAR" => 1,
            "VEC2" => 2,
            "VEC3" => 3,
            "VEC4" | "MAT2" => 4,
            "MAT3" => 9,
            "MAT4" => 16,
            _ => 0,
        }
    }

    fn stored_bytes(&self) -> u64 {
        match self.buffer_view {
            Some(_) => self
                .count
                .saturating_mul(self.component_size())
                .saturating_mul(self.component_count()),
            None => 0,
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
struct BufferViewView {
    #[serde(deserialize_with = "lenient")]
    byte_length: u64,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct MeshView {
    #[serde(deserialize_with = "lenient_vec")]
    primitives: Vec<PrimitiveView>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct PrimitiveView {
    #[serde(deserialize_with = "lenient_attributes")]
    attributes: BTreeMap<String, usize>,
    #[serde(deserialize_with = "lenient")]
    indices: Option<usize>,
    #[serde(deserialize_with = "lenient")]
    extensions: BTreeMap<String, Value>,
}

impl PrimitiveView {
    fn draco_buffer_view(&self) -> Option<usize> {
        self.extensions
            .get(KHR_DRACO_MESH_COMPRESSION)?
            .get("bufferView")
            .and_then(as_index)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct AnimationView {
    #[serde(deserialize_with = "lenient_vec")]
    channels: Vec<Value>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct SceneView {
    #[serde(deserialize_with = "lenient_indices")]
    nodes: Vec<usize>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct NodeView {
    #[serde(deserialize_with = "lenient")]
    mesh: Option<usize>,
    #[serde(deserialize_with = "lenient_indices")]
    children: Vec<usize>,
}

impl RootView {
    fn accessor_count(&self, index: usize) -> u64 {
        self.accessors.get(index).map_or(0, |a| a.count)
    }

    fn mesh_record(&self, mesh: &MeshView) -> MeshRecord {
        let mut accessors = BTreeSet::new();
        let mut draco_views = BTreeSet::new();
        let mut attribute_names = BTreeSet::new();
        let mut vertex_count: u64 = 0;

        for primitive in &mesh.primitives {
            for (name, &accessor) in &primitive.attributes {
                attribute_names.insert(name.clone());
                accessors.insert(accessor);
                if name == "POSITION" {
                    vertex_count = vertex_count.saturating_add(self.accessor_count(accessor));
                }
            }
            accessors.extend(primitive.indices);
            draco_views.extend(primitive.draco_buffer_view());
        }

        let accessor_bytes = saturating_total(
            accessors
                .iter()
                .filter_map(|&i| self.accessors.get(i))
                .map(AccessorView::stored_bytes),
        );
        let draco_bytes = saturating_total(
            draco_views
                .iter()
                .filter_map(|&i| self.buffer_views.get(i))
                .map(|view| view.byte_length),
        );

        MeshRecord {
            vertex_count,
            byte_size: accessor_bytes.saturating_add(draco_bytes),
            attribute_names,
        }
    }

    fn upload_vertex_count(&self) -> u64 {
        let mut visited = BTreeSet::new();
        let mut pending: Vec<usize> = self
            .scenes
            .iter()
            .flat_map(|scene| scene.nodes.iter().copied())
            .collect();
        let mut positions = BTreeSet::new();

        while let Some(index) = pending.pop() {
            if !visited.insert(index) {
                continue;
            }
            let Some(node) = self.nodes.get(index) else {
                continue;
            };
            if let Some(mesh) = node.mesh.and_then(|m| self.meshes.get(m)) {
                positions.extend(
                    mesh.primitives
                        .iter()
                        .filter_map(|p| p.attributes.get("POSITION").copied()),
                );
            }
            pending.extend(node.children.iter().copied());
        }

        saturating_total(positions.iter().map(|&i| self.accessor_count(i)))
    }
}

/// Sum that clamps at `u64::MAX` instead of overflowing on corrupt counts
fn saturating_total(values: impl IntoIterator<Item = u64>) -> u64 {
    values.into_iter().fold(0, u64::saturating_add)
}

fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(from_value_or_default(value))
}

fn lenient_vec<'de, D, T>(deserializer: D) -> Result<Vec<T>, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Array(items) => items.into_iter().map(from_value_or_default).collect(),
        Value::Null => Vec::new(),
        other => {
            log::warn!("expected a glTF array, ignoring {other}");
            Vec::new()
        }
    })
}

/// Index lists keep only entries that are valid indices
fn lenient_indices<'de, D>(deserializer: D) -> Result<Vec<usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_array()
        .map(|items| items.iter().filter_map(as_index).collect())
        .unwrap_or_default())
}

/// Attribute maps keep only semantics that point at a valid accessor index
fn lenient_attributes<'de, D>(deserializer: D) -> Result<BTreeMap<String, usize>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Value::deserialize(deserializer)?;
    Ok(value
        .as_object()
        .map(|map| {
            map.iter()
                .filter_map(|(name, index)| Some((name.clone(), as_index(index)?)))
                .collect()
        })
        .unwrap_or_default())
}

fn as_index(value: &Value) -> Option<usize> {
    value.as_u64().and_then(|v| usize::try_from(v).ok())
}

fn from_value_or_default<T: DeserializeOwned + Default>(value: Value) -> T {
    if value.is_null() {
        return T::default();
    }
    serde_json::from_value(value).unwrap_or_else(|e| {
        log::warn!("unexpected glTF value, using default: {e}");
        T::default()
    })
}

fn count_texture_refs(value: &Value) -> u64 {
    match value {
        Value::Object(map) => map
            .iter()
            .map(|(key, child)| {
                let is_ref = key.ends_with("Texture") && child.get("index").is_some();
                u64::from(is_ref) + count_texture_refs(child)
            })
            .sum(),
        Value::Array(items) => items.iter().map(count_texture_refs).sum(),
        _ => 0,
    }
}
