//! Output, transient and artifact path derivation

use std::path::{Path, PathBuf};

/// Suffix-less name the converter is asked to write to
pub const TRANSIENT_STEM: &str = ".fbx2glb-intermediate";
/// Before-optimization snapshot artifact
pub const BEFORE_SNAPSHOT_FILE: &str = "inspect-before.json";
/// After-optimization snapshot artifact
pub const AFTER_SNAPSHOT_FILE: &str = "inspect-after.json";
/// Comparison report artifact
pub const COMPARISON_FILE: &str = "comparison-report.json";

/// Every filesystem location one run touches
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RunPaths {
    /// FBX input
    pub input: PathBuf,
    /// Final GLB
    pub output: PathBuf,
    /// Directory holding the output and every side artifact
    pub output_dir: PathBuf,
}

impl RunPaths {
    /// Resolve paths for an input and an optional explicit output
    ///
    /// Without an explicit output the input's extension is replaced by `.glb`.
    /// An explicit output without extension gets `.glb` appended.
    ///
    /// # Examples
    ///
    /// ```
    /// use fbx2glb::pipeline::RunPaths;
    /// use std::path::Path;
    ///
    /// let paths = RunPaths::resolve(Path::new("assets/robot.fbx"), None);
    /// assert_eq!(paths.output, Path::new("assets/robot.glb"));
    /// assert_eq!(paths.transient(), Path::new("assets/.fbx2glb-intermediate.glb"));
    /// ```
    pub fn resolve(input: &Path, output: Option<&Path>) -> Self {
        let output = match output {
            Some(path) if path.extension().is_some() => path.to_path_buf(),
            Some(path) => path.with_extension("glb"),
            None => input.with_extension("glb"),
        };

        let output_dir = match output.parent() {
            Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
            _ => PathBuf::from("."),
        };

        Self {
            input: input.to_path_buf(),
            output,
            output_dir,
        }
    }

    /// Path handed to the converter (it appends `.glb` itself)
    pub fn converter_target(&self) -> PathBuf {
        self.output_dir.join(TRANSIENT_STEM)
    }

    /// Transient GLB the converter produces
    pub fn transient(&self) -> PathBuf {
        self.output_dir.join(format!("{TRANSIENT_STEM}.glb"))
    }

    /// Before-optimization snapshot artifact
    pub fn before_snapshot(&self) -> PathBuf {
        self.output_dir.join(BEFORE_SNAPSHOT_FILE)
    }

    /// After-optimization snapshot artifact
    pub fn after_snapshot(&self) -> PathBuf {
        self.output_dir.join(AFTER_SNAPSHOT_FILE)
    }

    /// Comparison report artifact
    pub fn comparison(&self) -> PathBuf {
        self.output_dir.join(COMPARISON_FILE)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_output_replaces_extension() {
        let paths = RunPaths::resolve(Path::new("/models/chair.FBX"), None);
        assert_eq!(paths.output, PathBuf::from("/models/chair.glb"));
        assert_eq!(paths.output_dir, PathBuf::from("/models"));
    }

    #[test]
    fn test_explicit_output_without_extension_gets_glb() {
        let paths = RunPaths::resolve(Path::new("chair.fbx"), Some(Path::new("/out/web/chair")));
        assert_eq!(paths.output, PathBuf::from("/out/web/chair.glb"));
        assert_eq!(paths.output_dir, PathBuf::from("/out/web"));
    }

    #[test]
    fn test_explicit_output_with_extension_is_kept() {
        let paths = RunPaths::resolve(Path::new("chair.fbx"), Some(Path::new("/out/final.glb")));
        assert_eq!(paths.output, PathBuf::from("/out/final.glb"));
    }

    #[test]
    fn test_bare_file_name_uses_current_directory() {
        let paths = RunPaths::resolve(Path::new("chair.fbx"), None);
        assert_eq!(paths.output_dir, PathBuf::from("."));
        assert_eq!(paths.transient(), PathBuf::from("./.fbx2glb-intermediate.glb"));
    }

    #[test]
    fn test_artifacts_live_beside_output() {
        let paths = RunPaths::resolve(Path::new("in/chair.fbx"), Some(Path::new("out/chair.glb")));
        assert_eq!(paths.before_snapshot(), PathBuf::from("out/inspect-before.json"));
        assert_eq!(paths.after_snapshot(), PathBuf::from("out/inspect-after.json"));
        assert_eq!(paths.comparison(), PathBuf::from("out/comparison-report.json"));
        assert_eq!(paths.converter_target(), PathBuf::from("out/.fbx2glb-intermediate"));
    }
}
