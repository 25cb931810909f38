//! Configuration file data structures

use serde::{Deserialize, Serialize};

use crate::pipeline::{PipelineConfig, TextureFormat};
use crate::tools::ToolPaths;

/// Configuration file name
pub const CONFIG_FILE_NAME: &str = ".fbx2glb.toml";

/// fbx2glb configuration file structure
///
/// ```toml
/// [tools]
/// converter = "/opt/fbx2gltf/FBX2glTF"
///
/// [defaults]
/// draco = true
/// max-texture = 1024
/// texture-format = "uastc"
/// ```
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ConfigFile {
    /// External tool locations
    #[serde(default)]
    pub tools: ToolSettings,

    /// Pipeline defaults, overridden by command-line flags
    #[serde(default)]
    pub defaults: DefaultSettings,
}

/// External tool binaries (names on PATH or paths)
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ToolSettings {
    /// FBX converter
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converter: Option<String>,

    /// glTF transform CLI
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transformer: Option<String>,
}

/// Pipeline defaults
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct DefaultSettings {
    /// Apply Draco geometry compression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub draco: Option<bool>,

    /// Apply KTX2 texture compression
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ktx2: Option<bool>,

    /// Texture resize bound
    #[serde(rename = "max-texture", skip_serializing_if = "Option::is_none")]
    pub max_texture: Option<u32>,

    /// KTX2 encoding ("etc1s" or "uastc")
    #[serde(rename = "texture-format", skip_serializing_if = "Option::is_none")]
    pub texture_format: Option<TextureFormat>,

    /// Vertex weld tolerance
    #[serde(rename = "weld-tolerance", skip_serializing_if = "Option::is_none")]
    pub weld_tolerance: Option<f64>,
}

impl ConfigFile {
    /// Tool binaries, falling back to the default names
    pub fn tool_paths(&self) -> ToolPaths {
        let defaults = ToolPaths::default();
        ToolPaths {
            converter: self.tools.converter.clone().unwrap_or(defaults.converter),
            transformer: self
                .tools
                .transformer
                .clone()
                .unwrap_or(defaults.transformer),
        }
    }

    /// Pipeline configuration before command-line overrides
    pub fn pipeline_config(&self) -> PipelineConfig {
        let base = PipelineConfig::default();
        let defaults = &self.defaults;
        PipelineConfig {
            draco: defaults.draco.unwrap_or(base.draco),
            ktx2: defaults.ktx2.unwrap_or(base.ktx2),
            max_texture_dimension: defaults.max_texture.unwrap_or(base.max_texture_dimension),
            texture_format: defaults.texture_format.unwrap_or(base.texture_format),
            weld_tolerance: defaults.weld_tolerance.unwrap_or(base.weld_tolerance),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_yields_defaults() {
        let config: ConfigFile = toml_edit::de::from_str("").unwrap();
        assert_eq!(config, ConfigFile::default());
        assert_eq!(config.pipeline_config(), PipelineConfig::default());
        assert_eq!(config.tool_paths(), ToolPaths::default());
    }

    #[test]
    fn test_defaults_section_maps_to_pipeline_config() {
        let config: ConfigFile = toml_edit::de::from_str(
            r#"
[defaults]
draco = true
max-texture = 1024
texture-format = "uastc"
weld-tolerance = 0.001
"#,
        )
        .unwrap();

        let pipeline = config.pipeline_config();
        assert!(pipeline.draco);
        assert!(!pipeline.ktx2);
        assert_eq!(pipeline.max_texture_dimension, 1024);
        assert_eq!(pipeline.texture_format, TextureFormat::Uastc);
        assert_eq!(pipeline.weld_tolerance, 0.001);
    }

    #[test]
    fn test_tools_section_overrides_binaries() {
        let config: ConfigFile =
            toml_edit::de::from_str("[tools]\nconverter = \"/opt/FBX2glTF\"\n").unwrap();

        let paths = config.tool_paths();
        assert_eq!(paths.converter, "/opt/FBX2glTF");
        assert_eq!(paths.transformer, "gltf-transform");
    }

    #[test]
    fn test_unknown_keys_are_rejected() {
        let result: Result<ConfigFile, _> = toml_edit::de::from_str("[defaults]\ndracoo = true\n");
        assert!(result.is_err());
    }

    #[test]
    fn test_unknown_texture_format_is_rejected() {
        let result: Result<ConfigFile, _> =
            toml_edit::de::from_str("[defaults]\ntexture-format = \"png\"\n");
        assert!(result.is_err());
    }
}
