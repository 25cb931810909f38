//! Optimization stages
//!
//! Welding, pruning, deduplication and the two compression passes are owned by
//! an external transform tool. The pipeline only decides which operations run,
//! in what order and with which parameters; a [`TransformBackend`] carries them out.

use serde::Serialize;
use std::path::Path;

use crate::infra::{CommandExecutor, FileSystem};

use super::config::{DracoParams, PipelineConfig, TextureFormat, TextureParams};
use super::document::{ExtensionRegistry, SceneDocument};
use super::error::PipelineStage;

/// One operation of the fixed optimization sequence
#[derive(Debug, Clone, PartialEq)]
pub enum TransformOp {
    /// Merge vertices closer than `tolerance`
    Weld {
        /// Positional tolerance
        tolerance: f64,
    },
    /// Remove unreferenced resources
    Prune,
    /// Merge structurally identical resources
    Dedup,
    /// Draco geometry compression
    Draco(DracoParams),
    /// Resize and KTX2-encode textures
    TextureCompress(TextureParams),
}

impl TransformOp {
    /// Operation name used in logs, errors and reports
    pub fn name(&self) -> &'static str {
        match self {
            Self::Weld { .. } => "weld",
            Self::Prune => "prune",
            Self::Dedup => "dedup",
            Self::Draco(_) => "draco",
            Self::TextureCompress(_) => "ktx2",
        }
    }

    /// Stage group the operation belongs to
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::Weld { .. } | Self::Prune | Self::Dedup => PipelineStage::Cleanup,
            Self::Draco(_) | Self::TextureCompress(_) => PipelineStage::Compression,
        }
    }

    /// Transform CLI invocations for this operation, without input/output paths
    ///
    /// Each entry is `[command, args...]`; they run in order, each reading the
    /// previous one's output.
    pub fn invocations(&self) -> Vec<Vec<String>> {
        match self {
            Self::Weld { tolerance } => vec![vec![
                "weld".to_string(),
                "--tolerance".to_string(),
                tolerance.to_string(),
            ]],
            Self::Prune => vec![vec!["prune".to_string()]],
            Self::Dedup => vec![vec!["dedup".to_string()]],
            Self::Draco(params) => vec![vec![
                "draco".to_string(),
                "--method".to_string(),
                params.method.to_string(),
                "--quantization-volume".to_string(),
                params.quantization_volume.to_string(),
                "--quantize-position".to_string(),
                params.bits.position.to_string(),
                "--quantize-normal".to_string(),
                params.bits.normal.to_string(),
                "--quantize-texcoord".to_string(),
                params.bits.texcoord.to_string(),
                "--quantize-color".to_string(),
                params.bits.color.to_string(),
                "--quantize-generic".to_string(),
                params.bits.generic.to_string(),
            ]],
            Self::TextureCompress(params) => {
                let dimension = params.max_dimension.to_string();
                let quality_flag = match params.format {
                    TextureFormat::Etc1s => "--quality",
                    TextureFormat::Uastc => "--level",
                };
                vec![
                    vec![
                        "resize".to_string(),
                        "--width".to_string(),
                        dimension.clone(),
                        "--height".to_string(),
                        dimension,
                    ],
                    vec![
                        params.format.as_str().to_string(),
                        quality_flag.to_string(),
                        params.quality.to_string(),
                    ],
                ]
            }
        }
    }
}

/// Cleanup operations, always run and always in this order
pub fn plan_cleanup(config: &PipelineConfig) -> Vec<TransformOp> {
    vec![
        TransformOp::Weld {
            tolerance: config.weld_tolerance,
        },
        TransformOp::Prune,
        TransformOp::Dedup,
    ]
}

/// Requested compression operations: geometry first, then textures
pub fn plan_compression(config: &PipelineConfig) -> Vec<TransformOp> {
    let mut ops = Vec::new();
    if config.draco {
        ops.push(TransformOp::Draco(DracoParams::default()));
    }
    if config.ktx2 {
        ops.push(TransformOp::TextureCompress(TextureParams::from_config(
            config,
        )));
    }
    ops
}

/// Whether a compression pass ran
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum StageStatus {
    /// The pass was requested and completed
    Applied,
    /// The pass was not requested
    Skipped,
}

impl StageStatus {
    /// Status for a requested/not requested flag
    pub fn from_requested(requested: bool) -> Self {
        if requested {
            Self::Applied
        } else {
            Self::Skipped
        }
    }
}

/// Executes transform operations on a document
///
/// Implementations return the transformed document or a failure message; the
/// orchestrator attaches the stage context.
pub trait TransformBackend {
    /// Apply one operation
    fn apply(&self, op: &TransformOp, document: SceneDocument) -> Result<SceneDocument, String>;
}

/// Backend running the glTF-Transform CLI on a scratch copy of the document
pub struct GltfTransformCli<FS: FileSystem, CE: CommandExecutor> {
    binary: String,
    registry: ExtensionRegistry,
    fs: FS,
    cmd_executor: CE,
}

impl<FS: FileSystem, CE: CommandExecutor> GltfTransformCli<FS, CE> {
    /// Create a backend invoking `binary`
    pub fn new(
        binary: impl Into<String>,
        registry: ExtensionRegistry,
        fs: FS,
        cmd_executor: CE,
    ) -> Self {
        Self {
            binary: binary.into(),
            registry,
            fs,
            cmd_executor,
        }
    }

    fn run_invocation(&self, args: &[String], input: &Path, output: &Path) -> Result<(), String> {
        let Some((command, flags)) = args.split_first() else {
            return Ok(());
        };
        log::debug!(
            "{} {} {} {} {}",
            self.binary,
            command,
            input.display(),
            output.display(),
            flags.join(" ")
        );

        let result = self.cmd_executor.execute(
            |cmd| cmd.arg(command).arg(input).arg(output).args(flags),
            &self.binary,
        );

        match result {
            Ok(out) if out.status.success() => Ok(()),
            Ok(out) => Err(format!(
                "{} {} exited with {}: {}",
                self.binary,
                command,
                out.status,
                stderr_tail(&out.stderr)
            )),
            Err(e) => Err(format!("failed to run {}: {}", self.binary, e)),
        }
    }
}

impl<FS: FileSystem, CE: CommandExecutor> TransformBackend for GltfTransformCli<FS, CE> {
    fn apply(&self, op: &TransformOp, document: SceneDocument) -> Result<SceneDocument, String> {
        let scratch = tempfile::Builder::new()
            .prefix("fbx2glb-stage-")
            .tempdir()
            .map_err(|e| format!("failed to create scratch directory: {e}"))?;

        let mut current = scratch.path().join("stage-0.glb");
        let bytes = document
            .to_glb()
            .map_err(|e| format!("failed to encode document: {e}"))?;
        self.fs
            .write(&current, bytes)
            .map_err(|e| format!("failed to write {}: {e}", current.display()))?;

        for (step, args) in op.invocations().iter().enumerate() {
            let next = scratch.path().join(format!("stage-{}.glb", step + 1));
            self.run_invocation(args, &current, &next)?;
            current = next;
        }

        let bytes = self
            .fs
            .read(&current)
            .map_err(|e| format!("no output at {}: {e}", current.display()))?;
        SceneDocument::load(&bytes, &self.registry).map_err(|e| e.to_string())
    }
}

/// Last non-empty stderr line of a failed tool run
pub(crate) fn stderr_tail(stderr: &[u8]) -> String {
    String::from_utf8_lossy(stderr)
        .lines()
        .rev()
        .find(|line| !line.trim().is_empty())
        .map(|line| line.trim().to_string())
        .unwrap_or_else(|| "no error output".to_string())
}
