//! Before/after comparison of two inspection snapshots
//!
//! Every metric has its own analyzer; [`ComparisonEngine::compare`] composes
//! them and evaluates the highlight rules in [`HighlightRule::ORDER`].

use serde::Serialize;

use super::config::PipelineConfig;
use super::inspect::InspectionSnapshot;
use super::stage::StageStatus;
use crate::fmt::{format_percent, percent_change, to_megabytes};

/// One numeric before/after record
///
/// `diff` is always `after - before`; `percent` is `diff / before * 100`
/// with one decimal, and `0.0%` when `before` is zero. A change too small
/// to show at one decimal is `0.0%` in both directions, never `-0.0%`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MetricDelta {
    /// Metric label
    pub metric: &'static str,
    /// Value in the before snapshot
    pub before: i64,
    /// Value in the after snapshot
    pub after: i64,
    /// `after - before`
    pub diff: i64,
    /// Relative change, formatted
    pub percent: String,
}

impl MetricDelta {
    /// Build a delta from raw counts
    ///
    /// # Examples
    ///
    /// ```
    /// use fbx2glb::pipeline::MetricDelta;
    ///
    /// let delta = MetricDelta::new("materials", 4, 2);
    /// assert_eq!(delta.diff, -2);
    /// assert_eq!(delta.percent, "-50.0%");
    ///
    /// assert_eq!(MetricDelta::new("textures", 0, 3).percent, "0.0%");
    /// ```
    pub fn new(metric: &'static str, before: u64, after: u64) -> Self {
        let before = saturating_i64(before);
        let after = saturating_i64(after);
        Self {
            metric,
            before,
            after,
            diff: after - before,
            percent: format_percent(percent_change(before, after)),
        }
    }

    /// Whether the value went down
    pub fn decreased(&self) -> bool {
        self.diff < 0
    }

    /// Whether the value went up
    pub fn increased(&self) -> bool {
        self.diff > 0
    }
}

fn saturating_i64(value: u64) -> i64 {
    i64::try_from(value).unwrap_or(i64::MAX)
}

/// Direction of the UV-bearing mesh count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum UvChange {
    /// Fewer meshes carry texture coordinates
    Removed,
    /// More meshes carry texture coordinates
    Added,
    /// Same number of UV-bearing meshes
    Unchanged,
}

/// UV-bearing mesh count
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UvMetric {
    /// Raw counts
    #[serde(flatten)]
    pub delta: MetricDelta,
    /// Classification of the change
    pub change: UvChange,
    /// Share of the before count that was removed or added
    pub change_percent: String,
}

/// Total geometry byte size
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GeometryMetric {
    /// Raw byte counts
    #[serde(flatten)]
    pub delta: MetricDelta,
    /// Before size in megabytes
    pub before_mb: f64,
    /// After size in megabytes
    pub after_mb: f64,
    /// Size difference in megabytes
    pub diff_mb: f64,
}

/// Direction of the material count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum MaterialChange {
    /// Identical materials were merged
    Deduplicated,
    /// The material count grew
    #[serde(rename = "increase")]
    Increased,
    /// Same material count
    Unchanged,
}

/// Material count
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MaterialMetric {
    /// Raw counts
    #[serde(flatten)]
    pub delta: MetricDelta,
    /// Classification of the change
    pub change: MaterialChange,
}

/// What happened to animation tracks
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum AnimationStatus {
    /// Same non-zero track count
    Preserved,
    /// The input had no animation
    NoneInInput,
    /// Tracks disappeared during processing
    Lost,
    /// Track count changed otherwise
    Changed,
}

/// Animation track count
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AnimationMetric {
    /// Raw counts
    #[serde(flatten)]
    pub delta: MetricDelta,
    /// Same non-zero track count before and after
    pub preserved: bool,
    /// Classification of the outcome
    pub status: AnimationStatus,
}

/// Where a texture count came from
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum TextureSource {
    /// The document texture registry
    Registry,
    /// Per-material texture references
    MaterialRefs,
    /// Neither was available
    None,
}

/// Texture count
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TextureMetric {
    /// Raw counts
    #[serde(flatten)]
    pub delta: MetricDelta,
    /// Source of the before count
    pub source: TextureSource,
    /// Whether texture compression has anything to act on
    pub compression_applicable: bool,
}

/// Status of the two compression passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CompressionStatus {
    /// Geometry compression
    pub draco: StageStatus,
    /// Texture compression
    pub ktx2: StageStatus,
}

impl CompressionStatus {
    /// Status derived from what the configuration requested
    pub fn from_config(config: &PipelineConfig) -> Self {
        Self {
            draco: StageStatus::from_requested(config.draco),
            ktx2: StageStatus::from_requested(config.ktx2),
        }
    }
}

/// Complete before/after comparison
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonResult {
    /// Vertex count
    pub vertices: MetricDelta,
    /// UV-bearing mesh count
    pub uv_meshes: UvMetric,
    /// Geometry byte size
    pub geometry: GeometryMetric,
    /// Material count
    pub materials: MaterialMetric,
    /// Animation track count
    pub animations: AnimationMetric,
    /// Texture count
    pub textures: TextureMetric,
    /// GLB file size, when both snapshots know it
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file_size: Option<MetricDelta>,
    /// Compression pass statuses
    pub compression: CompressionStatus,
    /// Explanations in rule order, without duplicates
    pub highlights: Vec<String>,
}

impl ComparisonResult {
    /// Every numeric record, in report order
    pub fn metrics(&self) -> Vec<&MetricDelta> {
        let mut metrics = vec![
            &self.vertices,
            &self.uv_meshes.delta,
            &self.geometry.delta,
            &self.materials.delta,
            &self.animations.delta,
            &self.textures.delta,
        ];
        metrics.extend(self.file_size.as_ref());
        metrics
    }
}

/// Explanation rules, evaluated in a fixed order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HighlightRule {
    /// UV data was removed from meshes
    UvRemoved,
    /// Materials were merged
    MaterialsDeduplicated,
    /// Geometry compression was requested
    GeometryCompressed,
    /// Texture compression was requested and had textures to act on
    TexturesCompressed,
}

impl HighlightRule {
    /// Evaluation order
    pub const ORDER: [HighlightRule; 4] = [
        Self::UvRemoved,
        Self::MaterialsDeduplicated,
        Self::GeometryCompressed,
        Self::TexturesCompressed,
    ];

    /// Message contributed by this rule, if it fires
    pub fn evaluate(&self, result: &ComparisonResult, config: &PipelineConfig) -> Option<String> {
        match self {
            Self::UvRemoved => (result.uv_meshes.change == UvChange::Removed).then(|| {
                format!(
                    "Unused UV data removed from {} of {} meshes ({}), reducing geometry volume",
                    -result.uv_meshes.delta.diff,
                    result.uv_meshes.delta.before,
                    result.uv_meshes.change_percent
                )
            }),
            Self::MaterialsDeduplicated => result.materials.delta.decreased().then(|| {
                format!(
                    "Deduplicated materials: {} → {}",
                    result.materials.delta.before, result.materials.delta.after
                )
            }),
            Self::GeometryCompressed => config
                .draco
                .then(|| "Draco geometry compression applied".to_string()),
            Self::TexturesCompressed => (config.ktx2 && result.textures.compression_applicable)
                .then(|| {
                    format!(
                        "KTX2 texture compression applied (max {}px)",
                        config.max_texture_dimension
                    )
                }),
        }
    }
}

/// Computes [`ComparisonResult`]s
pub struct ComparisonEngine;

impl ComparisonEngine {
    /// Compare two snapshots of the same asset
    pub fn compare(
        before: &InspectionSnapshot,
        after: &InspectionSnapshot,
        config: &PipelineConfig,
    ) -> ComparisonResult {
        let mut result = ComparisonResult {
            vertices: analyze_vertices(before, after),
            uv_meshes: analyze_uv(before, after),
            geometry: analyze_geometry(before, after),
            materials: analyze_materials(before, after),
            animations: analyze_animations(before, after),
            textures: analyze_textures(before, after),
            file_size: analyze_file_size(before, after),
            compression: CompressionStatus::from_config(config),
            highlights: Vec::new(),
        };
        result.highlights = evaluate_highlights(&result, config);
        result
    }
}

/// Evaluate every rule in order, dropping repeated messages
pub fn evaluate_highlights(result: &ComparisonResult, config: &PipelineConfig) -> Vec<String> {
    let mut highlights: Vec<String> = Vec::new();
    for message in HighlightRule::ORDER
        .iter()
        .filter_map(|rule| rule.evaluate(result, config))
    {
        if !highlights.contains(&message) {
            highlights.push(message);
        }
    }
    highlights
}

/// Vertex count of one snapshot: the scene aggregate when present and
/// non-zero, the sum of mesh vertex counts otherwise
pub fn vertex_total(snapshot: &InspectionSnapshot) -> u64 {
    match &snapshot.scenes {
        Some(scenes) if scenes.upload_vertex_count > 0 => scenes.upload_vertex_count,
        _ => snapshot.mesh_vertex_total(),
    }
}

/// Vertex metric
pub fn analyze_vertices(before: &InspectionSnapshot, after: &InspectionSnapshot) -> MetricDelta {
    MetricDelta::new("vertices", vertex_total(before), vertex_total(after))
}

/// UV-bearing mesh metric
pub fn analyze_uv(before: &InspectionSnapshot, after: &InspectionSnapshot) -> UvMetric {
    let delta = MetricDelta::new("uvMeshes", before.uv_mesh_count(), after.uv_mesh_count());
    let change = if delta.decreased() {
        UvChange::Removed
    } else if delta.increased() {
        UvChange::Added
    } else {
        UvChange::Unchanged
    };
    let change_percent = format_percent(percent_change(delta.before, delta.after).abs());
    UvMetric {
        delta,
        change,
        change_percent,
    }
}

/// Geometry byte size metric
pub fn analyze_geometry(before: &InspectionSnapshot, after: &InspectionSnapshot) -> GeometryMetric {
    let delta = MetricDelta::new("geometryBytes", before.geometry_bytes(), after.geometry_bytes());
    GeometryMetric {
        before_mb: to_megabytes(delta.before),
        after_mb: to_megabytes(delta.after),
        diff_mb: to_megabytes(delta.diff),
        delta,
    }
}

/// Material count metric
pub fn analyze_materials(before: &InspectionSnapshot, after: &InspectionSnapshot) -> MaterialMetric {
    let delta = MetricDelta::new(
        "materials",
        before.materials.len() as u64,
        after.materials.len() as u64,
    );
    let change = if delta.decreased() {
        MaterialChange::Deduplicated
    } else if delta.increased() {
        MaterialChange::Increased
    } else {
        MaterialChange::Unchanged
    };
    MaterialMetric { delta, change }
}

/// Animation track metric
pub fn analyze_animations(
    before: &InspectionSnapshot,
    after: &InspectionSnapshot,
) -> AnimationMetric {
    let delta = MetricDelta::new("animationTracks", before.animations, after.animations);
    let status = match (delta.before, delta.after) {
        (0, 0) => AnimationStatus::NoneInInput,
        (b, a) if b == a => AnimationStatus::Preserved,
        (b, a) if a < b => AnimationStatus::Lost,
        _ => AnimationStatus::Changed,
    };
    AnimationMetric {
        preserved: status == AnimationStatus::Preserved,
        status,
        delta,
    }
}

/// Texture count of one snapshot and where it came from
pub fn texture_total(snapshot: &InspectionSnapshot) -> (u64, TextureSource) {
    if let Some(count) = snapshot.textures {
        return (count, TextureSource::Registry);
    }
    if !snapshot.materials.is_empty() {
        return (snapshot.material_texture_refs(), TextureSource::MaterialRefs);
    }
    (0, TextureSource::None)
}

/// Texture count metric
pub fn analyze_textures(before: &InspectionSnapshot, after: &InspectionSnapshot) -> TextureMetric {
    let (before_count, source) = texture_total(before);
    let (after_count, _) = texture_total(after);
    TextureMetric {
        delta: MetricDelta::new("textures", before_count, after_count),
        source,
        compression_applicable: before_count > 0,
    }
}

/// File size metric, when both snapshots know their file size
pub fn analyze_file_size(
    before: &InspectionSnapshot,
    after: &InspectionSnapshot,
) -> Option<MetricDelta> {
    Some(MetricDelta::new("fileBytes", before.file_size?, after.file_size?))
}
