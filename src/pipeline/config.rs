//! Pipeline configuration types

use serde::{Deserialize, Serialize};

use super::error::PipelineError;

/// Default bound for texture resizing during texture compression
pub const DEFAULT_MAX_TEXTURE_DIMENSION: u32 = 2048;

/// Default positional tolerance for vertex welding
pub const DEFAULT_WELD_TOLERANCE: f64 = 1e-4;

/// GPU texture encoding used by the texture compression stage
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TextureFormat {
    /// Basis Universal ETC1S (small, lossy)
    #[default]
    Etc1s,
    /// Basis Universal UASTC (larger, higher quality)
    Uastc,
}

impl TextureFormat {
    /// Transform CLI command encoding this format
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Etc1s => "etc1s",
            Self::Uastc => "uastc",
        }
    }
}

/// Configuration for one conversion run
///
/// Immutable for the duration of the run; validated by [`PipelineConfig::validate`].
///
/// # Examples
///
/// ```
/// use fbx2glb::pipeline::PipelineConfig;
///
/// let config = PipelineConfig {
///     draco: true,
///     max_texture_dimension: 1024,
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// assert!(!config.ktx2);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PipelineConfig {
    /// Apply Draco geometry compression
    pub draco: bool,
    /// Apply KTX2 texture compression
    pub ktx2: bool,
    /// Resize bound (both axes) used by texture compression
    pub max_texture_dimension: u32,
    /// Texture encoding used by texture compression
    pub texture_format: TextureFormat,
    /// Positional tolerance used by vertex welding
    pub weld_tolerance: f64,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            draco: false,
            ktx2: false,
            max_texture_dimension: DEFAULT_MAX_TEXTURE_DIMENSION,
            texture_format: TextureFormat::default(),
            weld_tolerance: DEFAULT_WELD_TOLERANCE,
        }
    }
}

impl PipelineConfig {
    /// Reject configurations no stage can run with
    pub fn validate(&self) -> Result<(), PipelineError> {
        if self.max_texture_dimension == 0 {
            return Err(PipelineError::InvalidConfig(
                "max texture dimension must be greater than 0".to_string(),
            ));
        }
        if !self.weld_tolerance.is_finite() || self.weld_tolerance <= 0.0 {
            return Err(PipelineError::InvalidConfig(format!(
                "weld tolerance must be a positive number, got {}",
                self.weld_tolerance
            )));
        }
        Ok(())
    }

    /// Whether any compression stage was requested
    pub fn wants_compression(&self) -> bool {
        self.draco || self.ktx2
    }
}

/// Draco quantization bits per attribute semantic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuantizationBits {
    /// POSITION
    pub position: u8,
    /// NORMAL
    pub normal: u8,
    /// TEXCOORD_n
    pub texcoord: u8,
    /// COLOR_n
    pub color: u8,
    /// Any other attribute
    pub generic: u8,
}

/// Geometry compression parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DracoParams {
    /// Connectivity encoding method
    pub method: &'static str,
    /// Quantization bounding volume
    pub quantization_volume: &'static str,
    /// Bit budget per attribute semantic
    pub bits: QuantizationBits,
}

impl Default for DracoParams {
    fn default() -> Self {
        Self {
            method: "edgebreaker",
            quantization_volume: "mesh",
            bits: QuantizationBits {
                position: 14,
                normal: 10,
                texcoord: 12,
                color: 8,
                generic: 12,
            },
        }
    }
}

/// Texture compression parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureParams {
    /// Target encoding
    pub format: TextureFormat,
    /// Encoder quality level (ETC1S quality, UASTC level)
    pub quality: u8,
    /// Textures are resized to fit within this many pixels per axis
    pub max_dimension: u32,
}

impl TextureParams {
    /// ETC1S encoder quality
    pub const ETC1S_QUALITY: u8 = 128;
    /// UASTC encoder level
    pub const UASTC_LEVEL: u8 = 2;

    /// Derive texture parameters from the run configuration
    pub fn from_config(config: &PipelineConfig) -> Self {
        let quality = match config.texture_format {
            TextureFormat::Etc1s => Self::ETC1S_QUALITY,
            TextureFormat::Uastc => Self::UASTC_LEVEL,
        };
        Self {
            format: config.texture_format,
            quality,
            max_dimension: config.max_texture_dimension,
        }
    }
}
