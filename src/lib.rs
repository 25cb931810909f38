#![warn(missing_docs)]
#![warn(clippy::unwrap_used)]
#![cfg_attr(test, allow(clippy::unwrap_used))]

//! fbx2glb library
//!
//! Converts FBX scenes into optimized GLB files and reports what the
//! optimization changed. It can be used programmatically in addition to the
//! CLI interface.
//!
//! # Basic Example
//!
//! Comparing two snapshots of the same asset:
//!
//! ```
//! use fbx2glb::pipeline::{
//!     ComparisonEngine, InspectionCollector, PipelineConfig, SceneDocument,
//! };
//! use serde_json::json;
//!
//! let before = SceneDocument::new(
//!     json!({ "asset": { "version": "2.0" }, "materials": [{}, {}, {}, {}] }),
//!     None,
//! )?;
//! let after = SceneDocument::new(
//!     json!({ "asset": { "version": "2.0" }, "materials": [{}, {}] }),
//!     None,
//! )?;
//!
//! let comparison = ComparisonEngine::compare(
//!     &InspectionCollector::capture(&before),
//!     &InspectionCollector::capture(&after),
//!     &PipelineConfig::default(),
//! );
//!
//! assert_eq!(comparison.materials.delta.diff, -2);
//! assert_eq!(comparison.highlights, vec!["Deduplicated materials: 4 → 2"]);
//! # Ok::<(), fbx2glb::pipeline::DocumentError>(())
//! ```
//!
//! # Advanced Example: Full Conversion
//!
//! ```no_run
//! use fbx2glb::pipeline::{ConversionPipeline, PipelineConfig};
//! use fbx2glb::tools::ToolPaths;
//! use std::path::Path;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = PipelineConfig {
//!     draco: true,
//!     ktx2: true,
//!     max_texture_dimension: 1024,
//!     ..Default::default()
//! };
//! let pipeline = ConversionPipeline::new(config, &ToolPaths::default());
//! let summary = pipeline.run(Path::new("robot.fbx"), Some(Path::new("web/robot.glb")))?;
//!
//! println!("vertices: {}", summary.comparison.vertices.percent);
//! # Ok(())
//! # }
//! ```

/// Command handlers for CLI operations
pub mod cmd;
/// Configuration file support
pub mod config;
/// Enhanced error types with contextual suggestions
pub mod error;
/// Shared formatting utilities
pub mod fmt;
/// Infrastructure traits for filesystem and command execution
pub mod infra;
/// Conversion pipeline orchestration
pub mod pipeline;
/// Tool detection and version checking
pub mod tools;
