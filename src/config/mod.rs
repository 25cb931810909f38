//! Configuration file support for fbx2glb
//!
//! An optional `.fbx2glb.toml` in the working directory names the external
//! tool binaries and sets pipeline defaults. Command-line flags win.

pub mod file;
pub mod loader;

pub use file::{ConfigFile, DefaultSettings, ToolSettings, CONFIG_FILE_NAME};
pub use loader::ConfigLoader;
