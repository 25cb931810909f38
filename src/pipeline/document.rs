//! In-memory scene document
//!
//! The document is the GLB container of the asset being optimized: the JSON
//! chunk kept as a lossless `serde_json::Value` (stages may add extensions this
//! crate has no typed model for) plus the optional binary chunk.

use serde_json::Value;
use std::borrow::Cow;
use std::collections::BTreeSet;
use std::io::Cursor;
use thiserror::Error;

/// Geometry compression codec extension
pub const KHR_DRACO_MESH_COMPRESSION: &str = "KHR_draco_mesh_compression";
/// Basis Universal texture extension
pub const KHR_TEXTURE_BASISU: &str = "KHR_texture_basisu";

/// Errors raised while decoding or encoding a document
#[derive(Error, Debug)]
pub enum DocumentError {
    /// GLB container could not be parsed or written
    #[error("invalid GLB container: {0}")]
    Container(#[from] gltf::Error),

    /// JSON chunk could not be parsed or written
    #[error("invalid glTF JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// JSON chunk is not an object
    #[error("glTF JSON root is not an object")]
    NotAnObject,

    /// Asset requires an extension no registered codec handles
    #[error("unsupported required extension: {0}")]
    UnsupportedExtension(String),
}

/// Extensions the pipeline (and the stages it runs) can read and write
#[derive(Debug, Clone)]
pub struct ExtensionRegistry {
    names: BTreeSet<String>,
}

impl ExtensionRegistry {
    /// Registry with the codecs used by the compression stages and the common
    /// material/texture extensions converters emit
    pub fn supported() -> Self {
        let mut registry = Self::empty();
        for name in [
            KHR_DRACO_MESH_COMPRESSION,
            KHR_TEXTURE_BASISU,
            "KHR_mesh_quantization",
            "EXT_meshopt_compression",
            "KHR_texture_transform",
            "KHR_materials_unlit",
            "KHR_materials_emissive_strength",
            "KHR_materials_clearcoat",
            "KHR_materials_transmission",
            "KHR_materials_volume",
            "KHR_materials_ior",
            "KHR_materials_specular",
            "KHR_materials_sheen",
            "KHR_lights_punctual",
            "EXT_texture_webp",
        ] {
            registry.register(name);
        }
        registry
    }

    /// Registry without any extension
    pub fn empty() -> Self {
        Self {
            names: BTreeSet::new(),
        }
    }

    /// Register an extension
    pub fn register(&mut self, name: impl Into<String>) {
        self.names.insert(name.into());
    }

    /// Whether an extension is registered
    pub fn is_registered(&self, name: &str) -> bool {
        self.names.contains(name)
    }

    /// Fail on the first required extension that is not registered
    pub fn check(&self, document: &SceneDocument) -> Result<(), DocumentError> {
        match document
            .extensions_required()
            .into_iter()
            .find(|name| !self.is_registered(name))
        {
            Some(name) => Err(DocumentError::UnsupportedExtension(name.to_string())),
            None => Ok(()),
        }
    }
}

impl Default for ExtensionRegistry {
    fn default() -> Self {
        Self::supported()
    }
}

/// A scene document held in memory between pipeline stages
#[derive(Debug, Clone, PartialEq)]
pub struct SceneDocument {
    json: Value,
    blob: Option<Vec<u8>>,
}

impl SceneDocument {
    /// Build a document from its JSON and binary chunk
    pub fn new(json: Value, blob: Option<Vec<u8>>) -> Result<Self, DocumentError> {
        if !json.is_object() {
            return Err(DocumentError::NotAnObject);
        }
        Ok(Self { json, blob })
    }

    /// Decode a GLB container
    pub fn from_glb(bytes: &[u8]) -> Result<Self, DocumentError> {
        let glb = gltf::binary::Glb::from_slice(bytes)?;
        let json: Value = serde_json::from_slice(&glb.json)?;
        Self::new(json, glb.bin.map(Cow::into_owned))
    }

    /// Decode a GLB container and verify its required extensions are registered
    pub fn load(bytes: &[u8], registry: &ExtensionRegistry) -> Result<Self, DocumentError> {
        let document = Self::from_glb(bytes)?;
        registry.check(&document)?;
        Ok(document)
    }

    /// Encode the document as a GLB container
    pub fn to_glb(&self) -> Result<Vec<u8>, DocumentError> {
        let json_bytes = serde_json::to_vec(&self.json)?;
        let bin_len = self.blob.as_ref().map_or(0, Vec::len);

        let glb = gltf::binary::Glb {
            header: gltf::binary::Header {
                magic: *b"glTF",
                version: 2,
                length: (json_bytes.len() + bin_len) as u32,
            },
            json: Cow::Owned(json_bytes),
            bin: self.blob.as_deref().map(Cow::Borrowed),
        };

        let mut result: Vec<u8> = Vec::new();
        glb.to_writer(Cursor::new(&mut result))?;
        Ok(result)
    }

    /// The glTF JSON
    pub fn json(&self) -> &Value {
        &self.json
    }

    /// The binary chunk, if any
    pub fn blob(&self) -> Option<&[u8]> {
        self.blob.as_deref()
    }

    /// Names listed in `extensionsRequired`
    pub fn extensions_required(&self) -> Vec<&str> {
        string_list(&self.json, "extensionsRequired")
    }

    /// Names listed in `extensionsUsed`
    pub fn extensions_used(&self) -> Vec<&str> {
        string_list(&self.json, "extensionsUsed")
    }
}

fn string_list<'a>(json: &'a Value, key: &str) -> Vec<&'a str> {
    json.get(key)
        .and_then(Value::as_array)
        .map(|items| items.iter().filter_map(Value::as_str).collect())
        .unwrap_or_default()
}
