//! Convert command implementation
//!
//! Thin presentation layer for the conversion. Business logic lives in
//! `pipeline::ConversionPipeline`.

use anyhow::{Context, Result};
use console::style;
use std::env;
use std::path::PathBuf;

use crate::config::{ConfigFile, ConfigLoader};
use crate::error::Fbx2GlbError;
use crate::fmt::{CHECKMARK, INFO};
use crate::infra::RealCommandExecutor;
use crate::pipeline::{ConversionPipeline, PipelineConfig, PipelineError, RunSummary};
use crate::tools::ToolChain;

/// Command-line options of a conversion run
#[derive(Debug, Clone, Default)]
pub struct ConvertArgs {
    /// FBX input
    pub input: PathBuf,
    /// Explicit output path
    pub output: Option<PathBuf>,
    /// `--draco`
    pub draco: bool,
    /// `--ktx2`
    pub ktx2: bool,
    /// `--max-texture`
    pub max_texture: Option<u32>,
}

/// Main convert command handler (presentation layer)
///
/// # Examples
///
/// ```no_run
/// use fbx2glb::cmd::{cmd_convert, ConvertArgs};
///
/// cmd_convert(&ConvertArgs {
///     input: "models/robot.fbx".into(),
///     draco: true,
///     ..Default::default()
/// })?;
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn cmd_convert(args: &ConvertArgs) -> Result<()> {
    let config_file = load_config_file()?;
    let config = resolve_config(&config_file, args);
    log::debug!("pipeline config: {:?}", config);

    let pipeline = ConversionPipeline::new(config, &config_file.tool_paths());
    let summary = pipeline
        .run(&args.input, args.output.as_deref())
        .map_err(Fbx2GlbError::from)
        .with_context(|| format!("Failed to convert {}", args.input.display()))?;

    present_summary(&summary);
    Ok(())
}

/// Check the external tools and print their status
pub fn cmd_check_tools() -> Result<()> {
    let config_file = load_config_file()?;
    let toolchain = ToolChain::with_executor(&config_file.tool_paths(), RealCommandExecutor);

    toolchain
        .check_all()
        .map_err(|e| Fbx2GlbError::from(PipelineError::from(e)))?;

    println!("\n{} All tools available", CHECKMARK);
    Ok(())
}

fn load_config_file() -> Result<ConfigFile> {
    let cwd = env::current_dir().context("Failed to determine the current directory")?;
    Ok(ConfigLoader::load(&cwd)?)
}

/// Merge config file defaults with command-line flags
///
/// Flags only ever switch compression on; an explicit `--max-texture` wins
/// over the file.
pub fn resolve_config(file: &ConfigFile, args: &ConvertArgs) -> PipelineConfig {
    let base = file.pipeline_config();
    PipelineConfig {
        draco: base.draco || args.draco,
        ktx2: base.ktx2 || args.ktx2,
        max_texture_dimension: args.max_texture.unwrap_or(base.max_texture_dimension),
        ..base
    }
}

fn present_summary(summary: &RunSummary) {
    println!(
        "\n{} {} {}",
        CHECKMARK,
        style("Done:").green().bold(),
        style(summary.output.display()).cyan()
    );
    println!("\n{} Reports:", INFO);
    for path in [
        &summary.artifacts.before_snapshot,
        &summary.artifacts.after_snapshot,
        &summary.artifacts.comparison,
    ] {
        println!("   {} {}", style("→").dim(), path.display());
    }
}
