//! Command handlers for the fbx2glb CLI
//!
//! Each submodule is a thin presentation layer over the library.

pub mod completions;
pub mod convert;

// Re-export command functions for convenient access
pub use completions::cmd_completions;
pub use convert::{cmd_check_tools, cmd_convert, resolve_config, ConvertArgs};
