//! Integration tests for the conversion pipeline
//!
//! Drives complete runs against stand-in converter and transform tools
//! written as shell scripts, so these tests only run on Unix.

#![cfg(unix)]

use assert_cmd::Command;
use fbx2glb::pipeline::{
    AnimationStatus, ConversionPipeline, MaterialChange, PipelineConfig, PipelineError,
};
use fbx2glb::tools::ToolPaths;
use predicates::prelude::*;
use serde_json::Value;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

mod common;
use common::fixtures;

struct Workspace {
    dir: TempDir,
    converter: PathBuf,
    transformer: PathBuf,
    log: PathBuf,
}

impl Workspace {
    /// Input `robot.fbx`, a converter producing a 3-mesh, 4-material scene and
    /// a pass-through transformer logging its commands
    fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp dir");
        let tools = dir.path().join("tools");
        fs::create_dir(&tools).expect("Failed to create tools dir");

        let glb = fixtures::write_glb(&tools.join("converted.glb"), fixtures::scene_json(3, 4));
        let log = tools.join("transform.log");
        let converter = fixtures::fake_converter(&tools, &glb);
        let transformer = fixtures::passthrough_transformer(&tools, &log);
        fixtures::write_fbx(dir.path(), "robot.fbx");

        Self {
            dir,
            converter,
            transformer,
            log,
        }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn tool_paths(&self) -> ToolPaths {
        ToolPaths {
            converter: self.converter.display().to_string(),
            transformer: self.transformer.display().to_string(),
        }
    }

    fn write_config(&self) {
        common::write_tool_config(
            self.path(),
            &self.converter.display().to_string(),
            &self.transformer.display().to_string(),
        );
    }

    fn commands(&self) -> Vec<String> {
        fs::read_to_string(&self.log)
            .unwrap_or_default()
            .lines()
            .map(str::to_string)
            .collect()
    }

    fn report(&self, name: &str) -> Value {
        let contents = fs::read_to_string(self.path().join(name))
            .unwrap_or_else(|e| panic!("Failed to read {}: {}", name, e));
        serde_json::from_str(&contents).expect("report should be valid JSON")
    }

    fn bin(&self) -> Command {
        let mut cmd = Command::new(env!("CARGO_BIN_EXE_fbx2glb"));
        cmd.env("NO_EMOJI", "1").current_dir(self.path());
        cmd
    }
}

#[test]
fn test_default_run_writes_output_and_reports() {
    let ws = Workspace::new();
    ws.write_config();

    ws.bin()
        .arg("robot.fbx")
        .assert()
        .success()
        .stdout(predicate::str::contains("No compression requested, skipped"))
        .stdout(predicate::str::contains("Optimization Report"));

    assert!(ws.path().join("robot.glb").exists());
    assert!(!ws.path().join(".fbx2glb-intermediate.glb").exists());
    assert_eq!(ws.commands(), vec!["weld", "prune", "dedup"]);

    let before = ws.report("inspect-before.json");
    assert_eq!(before["meshes"].as_array().map(Vec::len), Some(3));
    assert_eq!(before["materials"].as_array().map(Vec::len), Some(4));

    let comparison = ws.report("comparison-report.json");
    assert_eq!(comparison["compression"]["draco"], "skipped");
    assert_eq!(comparison["compression"]["ktx2"], "skipped");
    assert_eq!(comparison["vertices"]["before"], 72);
    assert_eq!(comparison["vertices"]["percent"], "0.0%");
    assert_eq!(comparison["animations"]["status"], "preserved");
    assert_eq!(comparison["highlights"], serde_json::json!([]));
}

#[test]
fn test_compression_flags_run_compression_stages() {
    let ws = Workspace::new();
    ws.write_config();

    ws.bin()
        .args(["robot.fbx", "--draco", "--ktx2", "--max-texture", "1024"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Draco geometry compression applied"))
        .stdout(predicate::str::contains(
            "KTX2 texture compression applied (max 1024px)",
        ));

    assert_eq!(
        ws.commands(),
        vec!["weld", "prune", "dedup", "draco", "resize", "etc1s"]
    );

    let comparison = ws.report("comparison-report.json");
    assert_eq!(comparison["compression"]["draco"], "applied");
    assert_eq!(comparison["compression"]["ktx2"], "applied");
    assert_eq!(comparison["config"]["maxTextureDimension"], 1024);
}

#[test]
fn test_config_file_defaults_enable_compression() {
    let ws = Workspace::new();
    common::write_config(
        ws.path(),
        &format!(
            "[tools]\nconverter = {:?}\ntransformer = {:?}\n\n[defaults]\ndraco = true\n",
            ws.converter.display().to_string(),
            ws.transformer.display().to_string()
        ),
    );

    ws.bin().arg("robot.fbx").assert().success();

    assert!(ws.commands().contains(&"draco".to_string()));
    assert!(!ws.commands().contains(&"resize".to_string()));
}

#[test]
fn test_explicit_output_in_new_directory() {
    let ws = Workspace::new();
    ws.write_config();

    ws.bin()
        .args(["robot.fbx", "-o", "web/models/hero"])
        .assert()
        .success();

    let out_dir = ws.path().join("web/models");
    assert!(out_dir.join("hero.glb").exists());
    assert!(out_dir.join("comparison-report.json").exists());
    assert!(!out_dir.join(".fbx2glb-intermediate.glb").exists());
    assert!(!ws.path().join("robot.glb").exists());
}

#[test]
fn test_converter_failure_leaves_no_artifacts() {
    let ws = Workspace::new();
    let broken = fixtures::failing_converter(&ws.path().join("tools"));
    common::write_tool_config(
        ws.path(),
        &broken.display().to_string(),
        &ws.transformer.display().to_string(),
    );

    ws.bin()
        .arg("robot.fbx")
        .assert()
        .code(1)
        .stderr(predicate::str::contains("Unsupported FBX version"));

    assert!(!ws.path().join("robot.glb").exists());
    assert!(!common::has_artifacts(ws.path()));
    assert!(ws.commands().is_empty());
}

#[test]
fn test_cleanup_failure_writes_no_output() {
    let ws = Workspace::new();
    let flaky = fixtures::transformer_failing_on(&ws.path().join("tools"), "prune");
    common::write_tool_config(
        ws.path(),
        &ws.converter.display().to_string(),
        &flaky.display().to_string(),
    );

    ws.bin()
        .arg("robot.fbx")
        .assert()
        .code(70)
        .stderr(predicate::str::contains("prune"))
        .stderr(predicate::str::contains("prune exploded"));

    assert!(!ws.path().join("robot.glb").exists());
    assert!(!ws.path().join(".fbx2glb-intermediate.glb").exists());
    assert!(!ws.path().join("comparison-report.json").exists());
}

#[test]
fn test_library_run_returns_comparison() {
    let ws = Workspace::new();
    let pipeline = ConversionPipeline::new(PipelineConfig::default(), &ws.tool_paths());

    let summary = pipeline
        .run(&ws.path().join("robot.fbx"), None)
        .expect("conversion should succeed");

    assert_eq!(summary.output, ws.path().join("robot.glb"));
    assert_eq!(summary.comparison.materials.change, MaterialChange::Unchanged);
    assert_eq!(summary.comparison.animations.status, AnimationStatus::Preserved);
    assert_eq!(summary.comparison.animations.delta.before, 2);
    assert_eq!(summary.comparison.textures.delta.before, 1);
    assert!(summary.comparison.file_size.is_some());
    assert!(summary.artifacts.after_snapshot.exists());
}

#[test]
fn test_library_run_missing_input() {
    let ws = Workspace::new();
    let pipeline = ConversionPipeline::new(PipelineConfig::default(), &ws.tool_paths());

    let err = pipeline
        .run(&ws.path().join("absent.fbx"), None)
        .unwrap_err();

    assert!(matches!(err, PipelineError::InputNotFound(_)));
    assert!(!common::has_artifacts(ws.path()));
}
