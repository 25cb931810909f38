//! Enhanced error types with contextual suggestions
//!
//! Provides structured error types that include:
//! - Actionable error messages
//! - Suggested fixes and recovery actions
//! - Documentation links
//! - Proper exit codes for scripts and CI
//!
//! # Examples
//!
//! ```no_run
//! use fbx2glb::error::Fbx2GlbError;
//! use fbx2glb::pipeline::{ConversionPipeline, PipelineConfig};
//! use fbx2glb::tools::ToolPaths;
//! use std::path::Path;
//!
//! let pipeline = ConversionPipeline::new(PipelineConfig::default(), &ToolPaths::default());
//!
//! if let Err(e) = pipeline.run(Path::new("robot.fbx"), None) {
//!     let error = Fbx2GlbError::from(e);
//!     eprintln!("{}", error);
//!     std::process::exit(error.exit_code());
//! }
//! ```

use std::path::PathBuf;
use thiserror::Error;

use crate::pipeline::PipelineError;
use crate::tools::ToolError;

/// Top-level fbx2glb errors with contextual suggestions
#[derive(Error, Debug)]
pub enum Fbx2GlbError {
    /// Configuration file could not be read or parsed
    #[error("invalid configuration file {}: {message}", .path.display())]
    ConfigFile {
        /// Path to the config file
        path: PathBuf,
        /// Parser or I/O message
        message: String,
    },

    /// Generic I/O error with context
    #[error("I/O error: {context}")]
    Io {
        /// Context about where the error occurred
        context: String,
        #[source]
        /// IO error source
        source: std::io::Error,
    },

    /// Pipeline error during conversion
    #[error(transparent)]
    Pipeline(#[from] PipelineError),
}

impl Fbx2GlbError {
    /// Get actionable suggestion for resolving this error.
    ///
    /// # Examples
    ///
    /// ```
    /// use fbx2glb::error::Fbx2GlbError;
    /// use fbx2glb::pipeline::PipelineError;
    /// use std::path::PathBuf;
    ///
    /// let error = Fbx2GlbError::from(PipelineError::InputNotFound(PathBuf::from("robot.fbx")));
    /// assert!(error.suggestion().unwrap().contains("robot.fbx"));
    /// ```
    pub fn suggestion(&self) -> Option<String> {
        match self {
            Self::ConfigFile { .. } => Some(
                "Fix or remove .fbx2glb.toml; valid sections are [tools] and [defaults]"
                    .to_string(),
            ),
            Self::Io { context, .. } => Some(format!(
                "Check file permissions and that {} is accessible",
                context
            )),
            Self::Pipeline(e) => match e {
                PipelineError::ToolUnavailable(ToolError::MissingTool { install_cmd, .. }) => {
                    Some(format!(
                        "Install with: {}\nOr point [tools] in .fbx2glb.toml at the binary",
                        install_cmd
                    ))
                }
                PipelineError::ToolUnavailable(_) => {
                    Some("Run 'fbx2glb --check-tools' to inspect tool status".to_string())
                }
                PipelineError::InputNotFound(path) => Some(format!(
                    "Ensure {} exists and the path is spelled correctly",
                    path.display()
                )),
                PipelineError::InvalidConfig(_) => Some(
                    "--max-texture must be at least 1 and weld-tolerance must be a positive number"
                        .to_string(),
                ),
                PipelineError::Conversion(_) => Some(
                    "Run FBX2glTF on the file directly to see the full converter log".to_string(),
                ),
                PipelineError::Load { .. } => Some(
                    "The converted asset uses an unsupported extension or is corrupt; try re-exporting the FBX"
                        .to_string(),
                ),
                PipelineError::Transform { .. } => Some(
                    "Run with RUST_LOG=debug to see the gltf-transform command line".to_string(),
                ),
                PipelineError::Write { .. } | PipelineError::Io { .. } => Some(
                    "Check that the output directory is writable and has free space".to_string(),
                ),
            },
        }
    }

    /// Get documentation URL for this error.
    pub fn docs_url(&self) -> Option<&'static str> {
        match self {
            Self::Pipeline(PipelineError::ToolUnavailable(ToolError::MissingTool {
                binary, ..
            })) if binary.contains("gltf-transform") => Some("https://gltf-transform.dev/cli"),
            Self::Pipeline(PipelineError::ToolUnavailable(_))
            | Self::Pipeline(PipelineError::Conversion(_)) => {
                Some("https://github.com/godotengine/FBX2glTF")
            }
            Self::Pipeline(PipelineError::Transform { .. }) => Some("https://gltf-transform.dev/cli"),
            _ => None,
        }
    }

    /// Get appropriate exit code for this error.
    ///
    /// Returns Unix-style exit codes based on the error type, following sysexits.h conventions.
    ///
    /// # Examples
    ///
    /// ```
    /// use fbx2glb::error::Fbx2GlbError;
    /// use fbx2glb::pipeline::PipelineError;
    /// use std::path::PathBuf;
    ///
    /// let error = Fbx2GlbError::from(PipelineError::InputNotFound(PathBuf::from("robot.fbx")));
    /// assert_eq!(error.exit_code(), 66); // EX_NOINPUT
    ///
    /// let error = Fbx2GlbError::from(PipelineError::Conversion("exit status 1".to_string()));
    /// assert_eq!(error.exit_code(), 1);
    /// ```
    pub fn exit_code(&self) -> i32 {
        match self {
            Self::ConfigFile { .. } => 78, // EX_CONFIG
            Self::Io { .. } => 74,         // EX_IOERR
            Self::Pipeline(e) => match e {
                PipelineError::ToolUnavailable(_) => 127, // Command not found
                PipelineError::InputNotFound(_) => 66,    // EX_NOINPUT
                PipelineError::InvalidConfig(_) => 64,    // EX_USAGE
                PipelineError::Load { .. } => 65,         // EX_DATAERR
                PipelineError::Transform { .. } => 70,    // EX_SOFTWARE
                PipelineError::Write { .. } => 73,        // EX_CANTCREAT
                PipelineError::Io { .. } => 74,           // EX_IOERR
                PipelineError::Conversion(_) => 1,
            },
        }
    }

    /// Returns the pipeline error if this is a `Pipeline` variant.
    pub fn as_pipeline_error(&self) -> Option<&PipelineError> {
        match self {
            Self::Pipeline(e) => Some(e),
            _ => None,
        }
    }
}

/// Error formatter with colors and structured output
pub struct ErrorFormatter;

impl ErrorFormatter {
    /// Format error with suggestions and documentation links
    pub fn format(error: &anyhow::Error) -> String {
        use console::style;

        let mut output = String::new();

        // Main error message
        output.push_str(&format!("{} {}\n", style("error:").red().bold(), error));

        // Error chain (caused by)
        let mut source = error.source();
        let mut indent = 1;
        while let Some(err) = source {
            output.push_str(&format!(
                "{}{} {}\n",
                "  ".repeat(indent),
                style("caused by:").yellow(),
                err
            ));
            source = err.source();
            indent += 1;
        }

        if let Some(fbx_error) = Self::find(error) {
            if let Some(suggestion) = fbx_error.suggestion() {
                output.push_str(&format!(
                    "\n{} {}\n",
                    style("help:").cyan().bold(),
                    suggestion
                ));
            }

            if let Some(docs) = fbx_error.docs_url() {
                output.push_str(&format!("{} {}\n", style("docs:").blue(), docs));
            }
        }

        output
    }

    /// Get exit code from error
    pub fn exit_code(error: &anyhow::Error) -> i32 {
        Self::find(error).map_or(1, Fbx2GlbError::exit_code)
    }

    fn find(error: &anyhow::Error) -> Option<&Fbx2GlbError> {
        error
            .chain()
            .find_map(|cause| cause.downcast_ref::<Fbx2GlbError>())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pipeline::PipelineStage;

    fn missing_tool(binary: &str) -> Fbx2GlbError {
        PipelineError::ToolUnavailable(ToolError::MissingTool {
            tool: "glTF-Transform CLI".to_string(),
            binary: binary.to_string(),
            install_cmd: "npm install --global @gltf-transform/cli".to_string(),
        })
        .into()
    }

    #[test]
    fn test_missing_tool_has_install_suggestion() {
        let suggestion = missing_tool("gltf-transform")
            .suggestion()
            .expect("missing tool should have suggestion");
        assert!(suggestion.contains("npm install --global @gltf-transform/cli"));
        assert!(suggestion.contains(".fbx2glb.toml"));
    }

    #[test]
    fn test_missing_transformer_links_transformer_docs() {
        assert_eq!(
            missing_tool("gltf-transform").docs_url(),
            Some("https://gltf-transform.dev/cli")
        );
        assert_eq!(
            missing_tool("FBX2glTF").docs_url(),
            Some("https://github.com/godotengine/FBX2glTF")
        );
    }

    #[test]
    fn test_exit_codes_follow_conventions() {
        assert_eq!(missing_tool("x").exit_code(), 127);

        let cases: Vec<(PipelineError, i32)> = vec![
            (PipelineError::InputNotFound(PathBuf::from("a.fbx")), 66),
            (PipelineError::InvalidConfig("bad".to_string()), 64),
            (PipelineError::Conversion("exit 1".to_string()), 1),
            (
                PipelineError::Load {
                    path: PathBuf::from("t.glb"),
                    message: "bad magic".to_string(),
                },
                65,
            ),
            (
                PipelineError::Transform {
                    stage: PipelineStage::Cleanup,
                    op: "weld",
                    message: "exit 1".to_string(),
                },
                70,
            ),
            (
                PipelineError::Write {
                    path: PathBuf::from("o.glb"),
                    source: std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied"),
                },
                73,
            ),
            (
                PipelineError::Io {
                    stage: PipelineStage::Report,
                    path: PathBuf::from("r.json"),
                    source: std::io::Error::new(std::io::ErrorKind::Other, "disk full"),
                },
                74,
            ),
        ];

        for (error, code) in cases {
            let error = Fbx2GlbError::from(error);
            assert_eq!(error.exit_code(), code, "{}", error);
            assert!(error.suggestion().is_some(), "{} has no suggestion", error);
            assert_ne!(error.exit_code(), 0);
        }
    }

    #[test]
    fn test_config_file_error_exit_code() {
        let err = Fbx2GlbError::ConfigFile {
            path: PathBuf::from(".fbx2glb.toml"),
            message: "expected `=`".to_string(),
        };
        assert_eq!(err.exit_code(), 78);
        assert!(err.to_string().contains(".fbx2glb.toml"));
    }

    #[test]
    fn test_pipeline_display_is_transparent() {
        let err = Fbx2GlbError::from(PipelineError::Conversion("exit status 3".to_string()));
        assert_eq!(err.to_string(), "[convert] conversion failed: exit status 3");
        assert!(err.as_pipeline_error().is_some());
    }

    #[test]
    fn test_formatter_includes_help_and_exit_code() {
        console::set_colors_enabled(false);
        let error = anyhow::Error::from(Fbx2GlbError::from(PipelineError::InputNotFound(
            PathBuf::from("missing.fbx"),
        )));

        let formatted = ErrorFormatter::format(&error);
        assert!(formatted.contains("error: [preflight] input file not found: missing.fbx"));
        assert!(formatted.contains("help:"));
        assert_eq!(ErrorFormatter::exit_code(&error), 66);
    }

    #[test]
    fn test_formatter_finds_error_behind_context() {
        let error = anyhow::Error::from(missing_tool("gltf-transform")).context("conversion aborted");
        assert_eq!(ErrorFormatter::exit_code(&error), 127);
        assert!(ErrorFormatter::format(&error).contains("caused by:"));
    }

    #[test]
    fn test_formatter_generic_error_exit_code() {
        let error = anyhow::anyhow!("something else");
        assert_eq!(ErrorFormatter::exit_code(&error), 1);
    }
}
