//! Conversion orchestration
//!
//! Runs the fixed stage sequence: convert, load, snapshot, cleanup, optional
//! compression, write, snapshot, transient removal, comparison and report.
//! The transient asset is removed on every exit path.

use console::style;
use std::path::{Path, PathBuf};

use crate::fmt::{format_bytes, stage_spinner, CHECKMARK, INFO, MICROSCOPE, ROCKET, SPARKLES};
use crate::infra::{CommandExecutor, FileSystem};
use crate::tools::{ToolChain, ToolPaths};

use super::compare::{ComparisonEngine, ComparisonResult};
use super::config::PipelineConfig;
use super::document::{ExtensionRegistry, SceneDocument};
use super::error::{PipelineError, PipelineStage};
use super::inspect::InspectionCollector;
use super::paths::RunPaths;
use super::report::{ArtifactPaths, ComparisonRecord, ReportFormatter};
use super::stage::{plan_cleanup, plan_compression, TransformBackend, TransformOp};
use super::tool_runner::ToolRunner;

/// Outcome of a successful run
#[derive(Debug, Clone)]
pub struct RunSummary {
    /// Written GLB
    pub output: PathBuf,
    /// Before/after comparison
    pub comparison: ComparisonResult,
    /// Persisted side artifacts
    pub artifacts: ArtifactPaths,
}

/// Removes the transient asset when dropped, unless already removed
struct TransientGuard<'a, FS: FileSystem> {
    fs: &'a FS,
    path: Option<PathBuf>,
}

impl<'a, FS: FileSystem> TransientGuard<'a, FS> {
    fn new(fs: &'a FS, path: PathBuf) -> Self {
        Self {
            fs,
            path: Some(path),
        }
    }

    /// Best-effort removal; failures are logged
    fn release(&mut self) {
        let Some(path) = self.path.take() else {
            return;
        };
        if !self.fs.exists(&path) {
            return;
        }
        match self.fs.remove_file(&path) {
            Ok(()) => log::debug!("removed transient {}", path.display()),
            Err(e) => log::warn!("failed to remove transient {}: {}", path.display(), e),
        }
    }
}

impl<FS: FileSystem> Drop for TransientGuard<'_, FS> {
    fn drop(&mut self) {
        self.release();
    }
}

/// Orchestrates one FBX → GLB conversion
pub struct PipelineOrchestrator<FS: FileSystem, CE: CommandExecutor, TB: TransformBackend> {
    config: PipelineConfig,
    toolchain: ToolChain<CE>,
    tool_runner: ToolRunner<FS, CE>,
    backend: TB,
    registry: ExtensionRegistry,
    fs: FS,
}

impl<FS, CE, TB> PipelineOrchestrator<FS, CE, TB>
where
    FS: FileSystem + Clone,
    CE: CommandExecutor + Clone,
    TB: TransformBackend,
{
    /// Create a new orchestrator
    pub fn new(
        config: PipelineConfig,
        tool_paths: &ToolPaths,
        backend: TB,
        fs: FS,
        cmd_executor: CE,
    ) -> Self {
        Self {
            config,
            toolchain: ToolChain::with_executor(tool_paths, cmd_executor.clone()),
            tool_runner: ToolRunner::new(tool_paths.converter.clone(), fs.clone(), cmd_executor),
            backend,
            registry: ExtensionRegistry::supported(),
            fs,
        }
    }

    /// Replace the extension registry used when loading the transient asset
    pub fn with_registry(mut self, registry: ExtensionRegistry) -> Self {
        self.registry = registry;
        self
    }
}

impl<FS, CE, TB> PipelineOrchestrator<FS, CE, TB>
where
    FS: FileSystem,
    CE: CommandExecutor,
    TB: TransformBackend,
{
    /// Execute the complete conversion pipeline
    pub fn execute(&self, paths: &RunPaths) -> Result<RunSummary, PipelineError> {
        println!(
            "\n{} {} {}",
            ROCKET,
            style("Converting").bold(),
            style(paths.input.display()).cyan()
        );

        self.preflight(paths)?;

        // Registered before the converter runs: a failed conversion may still
        // leave a partial file behind.
        let mut transient = TransientGuard::new(&self.fs, paths.transient());

        println!("\n{} Step 1: Converting FBX → GLB...", SPARKLES);
        let spinner = stage_spinner("running converter");
        let converted = self.tool_runner.convert(paths);
        spinner.finish_and_clear();
        let transient_path = converted?;

        let (document, transient_size) = self.load(&transient_path)?;
        println!(
            "   {} Converted: {}",
            CHECKMARK,
            style(format_bytes(transient_size)).yellow()
        );

        let before = InspectionCollector::capture_sized(&document, Some(transient_size));
        ReportFormatter::write_snapshot(&self.fs, &paths.before_snapshot(), &before)?;
        println!(
            "   {} Inspected: {} meshes, {} materials",
            MICROSCOPE,
            before.meshes.len(),
            before.materials.len()
        );

        println!("\n{} Step 2: Cleaning up scene...", SPARKLES);
        let document = self.run_stages(&plan_cleanup(&self.config), document)?;

        println!("\n{} Step 3: Compression...", SPARKLES);
        if !self.config.wants_compression() {
            println!("   {} No compression requested, skipped", INFO);
        }
        let document = self.run_stages(&plan_compression(&self.config), document)?;

        let output_size = self.write_output(&document, &paths.output)?;
        println!(
            "\n{} Wrote {} ({})",
            CHECKMARK,
            style(paths.output.display()).cyan(),
            style(format_bytes(output_size)).green().bold()
        );

        let after = InspectionCollector::capture_sized(&document, Some(output_size));
        ReportFormatter::write_snapshot(&self.fs, &paths.after_snapshot(), &after)?;

        transient.release();

        let comparison = ComparisonEngine::compare(&before, &after, &self.config);
        ReportFormatter::print_report(&comparison);
        ReportFormatter::write_comparison(
            &self.fs,
            &paths.comparison(),
            &ComparisonRecord {
                input: &paths.input,
                output: &paths.output,
                config: &self.config,
                comparison: &comparison,
            },
        )?;

        Ok(RunSummary {
            output: paths.output.clone(),
            comparison,
            artifacts: ArtifactPaths::for_run(paths),
        })
    }

    fn preflight(&self, paths: &RunPaths) -> Result<(), PipelineError> {
        self.config.validate()?;
        self.toolchain.check_required()?;

        if !self.fs.exists(&paths.input) {
            return Err(PipelineError::InputNotFound(paths.input.clone()));
        }

        self.fs
            .create_dir_all(&paths.output_dir)
            .map_err(|source| PipelineError::Io {
                stage: PipelineStage::Preflight,
                path: paths.output_dir.clone(),
                source,
            })
    }

    fn load(&self, path: &Path) -> Result<(SceneDocument, u64), PipelineError> {
        let load_error = |message: String| PipelineError::Load {
            path: path.to_path_buf(),
            message,
        };
        let bytes = self.fs.read(path).map_err(|e| load_error(e.to_string()))?;
        let document =
            SceneDocument::load(&bytes, &self.registry).map_err(|e| load_error(e.to_string()))?;
        Ok((document, bytes.len() as u64))
    }

    fn run_stages(
        &self,
        ops: &[TransformOp],
        mut document: SceneDocument,
    ) -> Result<SceneDocument, PipelineError> {
        for op in ops {
            log::debug!("[{}] {}", op.stage(), op.name());
            let spinner = stage_spinner(op.name());
            let result = self.backend.apply(op, document);
            spinner.finish_and_clear();

            document = result.map_err(|message| PipelineError::Transform {
                stage: op.stage(),
                op: op.name(),
                message,
            })?;
            println!("   {} {}", CHECKMARK, op.name());
        }
        Ok(document)
    }

    fn write_output(&self, document: &SceneDocument, path: &Path) -> Result<u64, PipelineError> {
        let write_error = |source| PipelineError::Write {
            path: path.to_path_buf(),
            source,
        };
        let bytes = document
            .to_glb()
            .map_err(|e| write_error(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        self.fs.write(path, &bytes).map_err(write_error)?;
        Ok(bytes.len() as u64)
    }
}
