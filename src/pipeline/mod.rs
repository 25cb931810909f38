//! FBX → GLB conversion pipeline
//!
//! Implements the complete conversion and optimization pipeline:
//! 1. FBX2glTF --binary into a transient GLB
//! 2. weld → prune → dedup (always)
//! 3. Draco geometry compression, then KTX2 texture compression (optional)
//! 4. write the GLB, then compare before/after inspection snapshots

pub mod compare;
pub mod config;
pub mod document;
pub mod error;
pub mod executor;
pub mod inspect;
pub mod orchestrator;
pub mod paths;
pub mod report;
pub mod stage;
pub mod tool_runner;

pub use compare::{
    AnimationMetric, AnimationStatus, ComparisonEngine, ComparisonResult, CompressionStatus,
    GeometryMetric, HighlightRule, MaterialChange, MaterialMetric, MetricDelta, TextureMetric,
    TextureSource, UvChange, UvMetric,
};
pub use config::{DracoParams, PipelineConfig, QuantizationBits, TextureFormat, TextureParams};
pub use document::{DocumentError, ExtensionRegistry, SceneDocument};
pub use error::{PipelineError, PipelineStage};
pub use executor::{ConversionPipeline, DefaultBackend};
pub use inspect::{InspectionCollector, InspectionSnapshot, MaterialRecord, MeshRecord, SceneAggregate};
pub use orchestrator::{PipelineOrchestrator, RunSummary};
pub use paths::RunPaths;
pub use report::{ArtifactPaths, ComparisonRecord, ReportFormatter};
pub use stage::{plan_cleanup, plan_compression, GltfTransformCli, StageStatus, TransformBackend, TransformOp};
pub use tool_runner::ToolRunner;
