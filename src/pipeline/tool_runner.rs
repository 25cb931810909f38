//! External converter execution
//!
//! Runs the FBX → GLB converter and verifies it produced the transient asset.

use crate::infra::{CommandExecutor, FileSystem};
use std::path::PathBuf;

use super::error::PipelineError;
use super::paths::RunPaths;
use super::stage::stderr_tail;

/// Executes the FBX converter
pub struct ToolRunner<FS: FileSystem, CE: CommandExecutor> {
    converter: String,
    fs: FS,
    cmd_executor: CE,
}

impl<FS: FileSystem, CE: CommandExecutor> ToolRunner<FS, CE> {
    /// Create a new tool runner invoking `converter`
    pub fn new(converter: impl Into<String>, fs: FS, cmd_executor: CE) -> Self {
        Self {
            converter: converter.into(),
            fs,
            cmd_executor,
        }
    }

    /// Convert the input FBX into the transient GLB
    ///
    /// The converter is given the transient path without extension and appends
    /// `.glb` itself. A zero exit status without the expected file is a failure.
    pub fn convert(&self, paths: &RunPaths) -> Result<PathBuf, PipelineError> {
        let target = paths.converter_target();
        log::debug!(
            "{} --binary --input {} --output {}",
            self.converter,
            paths.input.display(),
            target.display()
        );

        let output = self
            .cmd_executor
            .execute(
                |cmd| {
                    cmd.arg("--binary")
                        .arg("--input")
                        .arg(&paths.input)
                        .arg("--output")
                        .arg(&target)
                },
                &self.converter,
            )
            .map_err(|e| {
                PipelineError::Conversion(format!("failed to run {}: {}", self.converter, e))
            })?;

        if !output.status.success() {
            return Err(PipelineError::Conversion(format!(
                "{} exited with {}: {}",
                self.converter,
                output.status,
                stderr_tail(&output.stderr)
            )));
        }

        let transient = paths.transient();
        if !self.fs.exists(&transient) {
            return Err(PipelineError::Conversion(format!(
                "{} reported success but {} was not created",
                self.converter,
                transient.display()
            )));
        }

        Ok(transient)
    }
}
