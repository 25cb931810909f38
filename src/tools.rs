//! Tool detection and verification module
//!
//! Detects the external tools the conversion pipeline shells out to:
//! - FBX2glTF (required, performs the FBX → GLB conversion)
//! - gltf-transform (required, runs the cleanup and compression stages)

use crate::fmt::{CROSSMARK, INFO, WRENCH};
use crate::infra::{CommandExecutor, RealCommandExecutor};
use console::style;
use std::path::PathBuf;
use thiserror::Error;

/// Default binary name of the FBX converter
pub const DEFAULT_CONVERTER: &str = "FBX2glTF";

/// Default binary name of the glTF transform CLI
pub const DEFAULT_TRANSFORMER: &str = "gltf-transform";

/// Errors that can occur during tool operations
#[derive(Error, Debug)]
pub enum ToolError {
    /// I/O error during tool execution
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Tool execution failed
    #[error("Failed to get version for {0}")]
    VersionFailed(String),

    /// Required tool is missing
    #[error("{tool} not found on PATH (looked for '{binary}')")]
    MissingTool {
        /// Human-readable tool name
        tool: String,
        /// Binary that was looked up
        binary: String,
        /// Installation command
        install_cmd: String,
    },
}

/// Binary names (or paths) used to resolve the external tools
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolPaths {
    /// FBX converter binary
    pub converter: String,
    /// glTF transform CLI binary
    pub transformer: String,
}

impl Default for ToolPaths {
    fn default() -> Self {
        Self {
            converter: DEFAULT_CONVERTER.to_string(),
            transformer: DEFAULT_TRANSFORMER.to_string(),
        }
    }
}

/// Represents an external tool with detection capabilities
///
/// # Examples
///
/// ```
/// use fbx2glb::tools::ToolChain;
///
/// let toolchain = ToolChain::new();
/// match toolchain.check_required() {
///     Ok(_) => println!("All required tools found"),
///     Err(e) => eprintln!("Missing tools: {}", e),
/// }
/// ```
#[derive(Debug)]
pub struct Tool<CE: CommandExecutor = RealCommandExecutor> {
    /// Human-readable name
    pub name: &'static str,
    /// Binary name in PATH, or a path to the binary
    pub binary: String,
    /// Flag to get version (e.g., "--version")
    pub version_flag: &'static str,
    /// Command that installs the tool
    pub install_cmd: &'static str,
    cmd_executor: CE,
}

impl<CE: CommandExecutor> Tool<CE> {
    /// Create a new Tool with a custom command executor
    pub fn with_executor(
        name: &'static str,
        binary: impl Into<String>,
        version_flag: &'static str,
        install_cmd: &'static str,
        cmd_executor: CE,
    ) -> Self {
        Self {
            name,
            binary: binary.into(),
            version_flag,
            install_cmd,
            cmd_executor,
        }
    }

    /// Resolve the tool binary on the execution path
    pub fn locate(&self) -> Option<PathBuf> {
        which::which(&self.binary).ok()
    }

    /// Check if the tool is installed and available in PATH
    pub fn is_installed(&self) -> bool {
        self.locate().is_some()
    }

    /// Get the version string of the installed tool
    pub fn version(&self) -> Result<String, ToolError> {
        let output = self
            .cmd_executor
            .execute(|cmd| cmd.arg(self.version_flag), &self.binary)?;

        if !output.status.success() {
            return Err(ToolError::VersionFailed(self.name.to_string()));
        }

        let version = String::from_utf8_lossy(&output.stdout)
            .lines()
            .next()
            .unwrap_or("")
            .trim()
            .to_string();

        Ok(version)
    }

    /// Check and report the tool status
    pub fn check(&self) -> ToolStatus {
        if self.is_installed() {
            match self.version() {
                Ok(version) if !version.is_empty() => ToolStatus::Available(version),
                _ => ToolStatus::InstalledButVersionUnknown,
            }
        } else {
            ToolStatus::Missing
        }
    }

    /// Error describing this tool as missing
    pub fn missing(&self) -> ToolError {
        ToolError::MissingTool {
            tool: self.name.to_string(),
            binary: self.binary.clone(),
            install_cmd: self.install_cmd.to_string(),
        }
    }
}

/// Status of a tool check
#[derive(Debug)]
pub enum ToolStatus {
    /// Tool is available and version was successfully retrieved
    Available(String),
    /// Tool binary exists but version check failed
    InstalledButVersionUnknown,
    /// Tool binary not found
    Missing,
}

/// All external tools needed by the conversion pipeline
pub struct ToolChain<CE: CommandExecutor = RealCommandExecutor> {
    /// FBX → GLB converter
    pub converter: Tool<CE>,
    /// glTF transform CLI used by the cleanup and compression stages
    pub transformer: Tool<CE>,
}

impl Default for ToolChain<RealCommandExecutor> {
    fn default() -> Self {
        Self::new()
    }
}

impl ToolChain<RealCommandExecutor> {
    /// Create a new ToolChain with default binary names and real command execution
    pub fn new() -> Self {
        Self::with_executor(&ToolPaths::default(), RealCommandExecutor)
    }
}

impl<CE: CommandExecutor + Clone> ToolChain<CE> {
    /// Create a new ToolChain for the given binaries with a custom command executor
    pub fn with_executor(paths: &ToolPaths, cmd_executor: CE) -> Self {
        Self {
            converter: Tool::with_executor(
                "FBX2glTF",
                paths.converter.clone(),
                "--version",
                "npm install --global fbx2gltf  (or download a release from https://github.com/godotengine/FBX2glTF)",
                cmd_executor.clone(),
            ),
            transformer: Tool::with_executor(
                "glTF-Transform CLI",
                paths.transformer.clone(),
                "--version",
                "npm install --global @gltf-transform/cli",
                cmd_executor,
            ),
        }
    }
}

impl<CE: CommandExecutor> ToolChain<CE> {
    /// Check all tools and report their status
    pub fn check_all(&self) -> Result<(), ToolError> {
        println!("\n{} Checking external tools...", WRENCH);

        let mut missing: Vec<&Tool<CE>> = Vec::new();

        for tool in [&self.converter, &self.transformer] {
            match tool.check() {
                ToolStatus::Available(version) => {
                    println!(
                        "   {} {} - {}",
                        style("✓").green(),
                        style(tool.name).bold(),
                        style(version).dim()
                    );
                }
                ToolStatus::InstalledButVersionUnknown => {
                    println!(
                        "   {} {} - {}",
                        style("✓").green(),
                        style(tool.name).bold(),
                        style("(version unknown)").dim()
                    );
                }
                ToolStatus::Missing => {
                    println!(
                        "   {} {} - {}",
                        CROSSMARK,
                        style(tool.name).bold(),
                        style("NOT FOUND").red()
                    );
                    missing.push(tool);
                }
            }
        }

        if let Some(first) = missing.first() {
            println!("\n{} Installation instructions:", INFO);
            for tool in &missing {
                println!("\n   {}:", tool.name);
                println!("     {}", tool.install_cmd);
            }
            return Err(first.missing());
        }

        Ok(())
    }

    /// Check that every required tool resolves on the execution path
    ///
    /// Only looks the binaries up; nothing is executed.
    pub fn check_required(&self) -> Result<(), ToolError> {
        for tool in [&self.converter, &self.transformer] {
            if !tool.is_installed() {
                return Err(tool.missing());
            }
        }
        Ok(())
    }
}
