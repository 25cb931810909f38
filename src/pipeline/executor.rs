//! Conversion pipeline executor
//!
//! Public entry point for one FBX → GLB run:
//! 1. FBX2glTF converts the input into a transient GLB
//! 2. gltf-transform welds, prunes and deduplicates the scene
//! 3. gltf-transform applies Draco and/or KTX2 compression (optional)
//! 4. the optimized GLB, both inspection snapshots and the comparison report are written

use crate::infra::{CommandExecutor, FileSystem, RealCommandExecutor, RealFileSystem};
use std::path::Path;

use crate::tools::ToolPaths;

use super::config::PipelineConfig;
use super::document::ExtensionRegistry;
use super::error::PipelineError;
use super::orchestrator::{PipelineOrchestrator, RunSummary};
use super::paths::RunPaths;
use super::stage::{GltfTransformCli, TransformBackend};

/// Default transform backend: the glTF-Transform CLI on the real filesystem
pub type DefaultBackend = GltfTransformCli<RealFileSystem, RealCommandExecutor>;

/// Main conversion pipeline
pub struct ConversionPipeline<
    FS: FileSystem = RealFileSystem,
    CE: CommandExecutor = RealCommandExecutor,
    TB: TransformBackend = DefaultBackend,
> {
    orchestrator: PipelineOrchestrator<FS, CE, TB>,
}

impl ConversionPipeline {
    /// Create a pipeline running the real external tools
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fbx2glb::pipeline::{ConversionPipeline, PipelineConfig};
    /// use fbx2glb::tools::ToolPaths;
    ///
    /// let config = PipelineConfig {
    ///     draco: true,
    ///     ..Default::default()
    /// };
    /// let pipeline = ConversionPipeline::new(config, &ToolPaths::default());
    /// ```
    pub fn new(config: PipelineConfig, tool_paths: &ToolPaths) -> Self {
        let backend = GltfTransformCli::new(
            tool_paths.transformer.clone(),
            ExtensionRegistry::supported(),
            RealFileSystem,
            RealCommandExecutor,
        );
        Self::with_executors(
            config,
            tool_paths,
            backend,
            RealFileSystem,
            RealCommandExecutor,
        )
    }
}

impl<FS, CE, TB> ConversionPipeline<FS, CE, TB>
where
    FS: FileSystem + Clone,
    CE: CommandExecutor + Clone,
    TB: TransformBackend,
{
    /// Create a pipeline with custom filesystem, command executor and transform backend
    pub fn with_executors(
        config: PipelineConfig,
        tool_paths: &ToolPaths,
        backend: TB,
        fs: FS,
        cmd_executor: CE,
    ) -> Self {
        Self {
            orchestrator: PipelineOrchestrator::new(config, tool_paths, backend, fs, cmd_executor),
        }
    }

    /// Convert `input`, writing to `output` or to the input path with a `.glb` extension
    ///
    /// # Errors
    /// Returns error if:
    /// - a required tool is not installed, or the input does not exist
    /// - the converter fails or produces no file
    /// - the converted asset cannot be parsed
    /// - a cleanup or compression stage fails (nothing is written)
    /// - the output or a side artifact cannot be written
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fbx2glb::pipeline::{ConversionPipeline, PipelineConfig};
    /// use fbx2glb::tools::ToolPaths;
    /// use std::path::Path;
    ///
    /// # fn main() -> anyhow::Result<()> {
    /// let pipeline = ConversionPipeline::new(PipelineConfig::default(), &ToolPaths::default());
    /// let summary = pipeline.run(Path::new("models/robot.fbx"), None)?;
    ///
    /// println!("wrote {}", summary.output.display());
    /// for highlight in &summary.comparison.highlights {
    ///     println!("  {highlight}");
    /// }
    /// # Ok(())
    /// # }
    /// ```
    pub fn run(&self, input: &Path, output: Option<&Path>) -> Result<RunSummary, PipelineError> {
        self.orchestrator.execute(&RunPaths::resolve(input, output))
    }
}
