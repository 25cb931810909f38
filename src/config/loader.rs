//! Configuration file loading

use super::file::{ConfigFile, CONFIG_FILE_NAME};
use crate::error::Fbx2GlbError;
use crate::infra::{FileSystem, RealFileSystem};
use std::path::Path;

/// Handles loading configuration files
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config from .fbx2glb.toml in the given directory
    ///
    /// A missing file yields the default configuration.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use fbx2glb::config::ConfigLoader;
    /// use std::path::Path;
    ///
    /// let config = ConfigLoader::load(Path::new("."))?;
    /// println!("converter: {}", config.tool_paths().converter);
    /// # Ok::<(), fbx2glb::error::Fbx2GlbError>(())
    /// ```
    pub fn load(dir: &Path) -> Result<ConfigFile, Fbx2GlbError> {
        Self::load_with_fs(dir, &RealFileSystem)
    }

    /// Load config with a custom filesystem implementation
    pub fn load_with_fs<FS: FileSystem>(dir: &Path, fs: &FS) -> Result<ConfigFile, Fbx2GlbError> {
        let config_path = dir.join(CONFIG_FILE_NAME);

        // Read directly; a missing file is not an error
        let contents = match fs.read_to_string(&config_path) {
            Ok(c) => c,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Ok(ConfigFile::default());
            }
            Err(source) => {
                return Err(Fbx2GlbError::Io {
                    context: config_path.display().to_string(),
                    source,
                });
            }
        };

        let config: ConfigFile =
            toml_edit::de::from_str(&contents).map_err(|e| Fbx2GlbError::ConfigFile {
                path: config_path.clone(),
                message: e.to_string(),
            })?;

        log::debug!("loaded {}", config_path.display());
        Ok(config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infra::MemoryFileSystem;
    use std::io;
    use std::path::PathBuf;

    // Mock FileSystem for testing read failures
    struct UnreadableFileSystem;

    impl FileSystem for UnreadableFileSystem {
        fn read_to_string(&self, _path: &Path) -> io::Result<String> {
            Err(io::Error::new(
                io::ErrorKind::PermissionDenied,
                "permission denied",
            ))
        }

        fn read(&self, _path: &Path) -> io::Result<Vec<u8>> {
            unimplemented!()
        }

        fn write(&self, _path: &Path, _contents: impl AsRef<[u8]>) -> io::Result<()> {
            unimplemented!()
        }

        fn metadata(&self, _path: &Path) -> io::Result<std::fs::Metadata> {
            unimplemented!()
        }

        fn create_dir_all(&self, _path: &Path) -> io::Result<()> {
            unimplemented!()
        }

        fn remove_file(&self, _path: &Path) -> io::Result<()> {
            unimplemented!()
        }
    }

    #[test]
    fn test_loader_loads_from_valid_toml() {
        // Use real filesystem with tempdir for this test
        let temp = tempfile::tempdir().unwrap();
        std::fs::write(
            temp.path().join(CONFIG_FILE_NAME),
            "[defaults]\nktx2 = true\nmax-texture = 512\n",
        )
        .unwrap();

        let config = ConfigLoader::load(temp.path()).unwrap();
        let pipeline = config.pipeline_config();
        assert!(pipeline.ktx2);
        assert_eq!(pipeline.max_texture_dimension, 512);
    }

    #[test]
    fn test_loader_missing_file_returns_default() {
        let config = ConfigLoader::load_with_fs(Path::new("/project"), &MemoryFileSystem::new())
            .unwrap();
        assert_eq!(config, ConfigFile::default());
    }

    #[test]
    fn test_loader_malformed_file_is_config_error() {
        let fs = MemoryFileSystem::new();
        fs.insert(
            PathBuf::from("/project").join(CONFIG_FILE_NAME),
            b"[defaults\ndraco = true".to_vec(),
        );

        let err = ConfigLoader::load_with_fs(Path::new("/project"), &fs).unwrap_err();
        assert!(matches!(err, Fbx2GlbError::ConfigFile { .. }));
        assert_eq!(err.exit_code(), 78);
    }

    #[test]
    fn test_loader_read_error_is_io_error() {
        let err = ConfigLoader::load_with_fs(Path::new("/project"), &UnreadableFileSystem)
            .unwrap_err();
        assert!(matches!(err, Fbx2GlbError::Io { .. }));
    }
}
