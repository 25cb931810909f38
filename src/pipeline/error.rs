//! Error types for the conversion pipeline

use std::fmt;
use std::path::PathBuf;
use thiserror::Error;

use crate::tools::ToolError;

/// Pipeline stage an error originated from
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PipelineStage {
    /// Tool, input and configuration checks before any work
    Preflight,
    /// External FBX → GLB conversion
    Convert,
    /// Parsing the transient asset
    Load,
    /// Snapshot capture
    Inspect,
    /// Weld, prune, dedup
    Cleanup,
    /// Draco and texture compression
    Compression,
    /// Serializing the output GLB
    Write,
    /// Persisting snapshots and the comparison report
    Report,
}

impl PipelineStage {
    /// Lowercase stage label used in messages
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Preflight => "preflight",
            Self::Convert => "convert",
            Self::Load => "load",
            Self::Inspect => "inspect",
            Self::Cleanup => "cleanup",
            Self::Compression => "compression",
            Self::Write => "write",
            Self::Report => "report",
        }
    }
}

impl fmt::Display for PipelineStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors that can occur during pipeline execution
///
/// Every variant is fatal for the run; none is retried.
#[derive(Error, Debug)]
pub enum PipelineError {
    /// An external tool is not on the execution path
    #[error("[preflight] {0}")]
    ToolUnavailable(#[from] ToolError),

    /// The input file does not exist
    #[error("[preflight] input file not found: {}", .0.display())]
    InputNotFound(PathBuf),

    /// The run configuration was rejected
    #[error("[preflight] invalid configuration: {0}")]
    InvalidConfig(String),

    /// The external converter failed
    #[error("[convert] conversion failed: {0}")]
    Conversion(String),

    /// The transient asset could not be parsed
    #[error("[load] failed to load {}: {message}", .path.display())]
    Load {
        /// Asset being loaded
        path: PathBuf,
        /// Parser message
        message: String,
    },

    /// A cleanup or compression stage failed
    #[error("[{stage}] {op} failed: {message}")]
    Transform {
        /// Stage group of the failing operation
        stage: PipelineStage,
        /// Name of the failing operation
        op: &'static str,
        /// Failure description
        message: String,
    },

    /// The output file could not be written
    #[error("[write] failed to write {}: {source}", .path.display())]
    Write {
        /// Output path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },

    /// A side artifact could not be persisted
    #[error("[{stage}] failed to write {}: {source}", .path.display())]
    Io {
        /// Stage persisting the artifact
        stage: PipelineStage,
        /// Artifact path
        path: PathBuf,
        /// Underlying error
        #[source]
        source: std::io::Error,
    },
}

impl PipelineError {
    /// Stage the error originated from
    pub fn stage(&self) -> PipelineStage {
        match self {
            Self::ToolUnavailable(_) | Self::InputNotFound(_) | Self::InvalidConfig(_) => {
                PipelineStage::Preflight
            }
            Self::Conversion(_) => PipelineStage::Convert,
            Self::Load { .. } => PipelineStage::Load,
            Self::Transform { stage, .. } => *stage,
            Self::Write { .. } => PipelineStage::Write,
            Self::Io { stage, .. } => *stage,
        }
    }
}
