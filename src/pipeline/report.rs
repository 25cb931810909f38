//! Comparison report rendering and artifact persistence

use console::style;
use serde::Serialize;
use std::path::{Path, PathBuf};

use crate::fmt::{format_bytes, CHART, SPARKLES};
use crate::infra::FileSystem;

use super::compare::{ComparisonResult, MetricDelta};
use super::config::PipelineConfig;
use super::error::{PipelineError, PipelineStage};
use super::inspect::InspectionSnapshot;
use super::paths::RunPaths;
use super::stage::StageStatus;

/// Persisted comparison record
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonRecord<'a> {
    /// FBX input
    pub input: &'a Path,
    /// Written GLB
    pub output: &'a Path,
    /// Configuration of the run
    pub config: &'a PipelineConfig,
    /// Metrics, statuses and highlights
    #[serde(flatten)]
    pub comparison: &'a ComparisonResult,
}

/// Side artifacts written by one run
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArtifactPaths {
    /// Before-optimization snapshot
    pub before_snapshot: PathBuf,
    /// After-optimization snapshot
    pub after_snapshot: PathBuf,
    /// Comparison report
    pub comparison: PathBuf,
}

impl ArtifactPaths {
    /// Artifact locations of a run
    pub fn for_run(paths: &RunPaths) -> Self {
        Self {
            before_snapshot: paths.before_snapshot(),
            after_snapshot: paths.after_snapshot(),
            comparison: paths.comparison(),
        }
    }
}

/// Renders comparisons to the console and persists JSON artifacts
pub struct ReportFormatter;

impl ReportFormatter {
    /// Print the comparison, one metric per line
    pub fn print_report(comparison: &ComparisonResult) {
        println!("\n{} {}", CHART, style("Optimization Report").bold());
        for metric in comparison.metrics() {
            println!("   {}", Self::metric_line(metric));
        }

        println!(
            "\n   {} Draco: {}   KTX2: {}",
            style("→").dim(),
            Self::status_label(comparison.compression.draco),
            Self::status_label(comparison.compression.ktx2)
        );

        if !comparison.highlights.is_empty() {
            println!("\n{} {}", SPARKLES, style("Highlights").bold());
            for highlight in &comparison.highlights {
                println!("   {} {}", style("•").cyan(), highlight);
            }
        }
    }

    /// One report line: label, before → after, diff and percent
    ///
    /// Reductions are green, increases red, unchanged values dim.
    pub fn metric_line(metric: &MetricDelta) -> String {
        let label = format!("{:<16}", metric.metric);
        let (before, after) = if metric.metric.ends_with("Bytes") {
            (
                format_bytes(metric.before.max(0) as u64),
                format_bytes(metric.after.max(0) as u64),
            )
        } else {
            (metric.before.to_string(), metric.after.to_string())
        };
        let change = format!("{:+} ({})", metric.diff, metric.percent);

        let change = if metric.decreased() {
            style(change).green()
        } else if metric.increased() {
            style(change).red()
        } else {
            style(change).dim()
        };

        format!(
            "{} {} {} {}  {}",
            style(label).bold(),
            before,
            style("→").dim(),
            after,
            change
        )
    }

    fn status_label(status: StageStatus) -> String {
        match status {
            StageStatus::Applied => style("applied").green().to_string(),
            StageStatus::Skipped => style("skipped").dim().to_string(),
        }
    }

    /// Persist a snapshot as pretty JSON
    pub fn write_snapshot<FS: FileSystem>(
        fs: &FS,
        path: &Path,
        snapshot: &InspectionSnapshot,
    ) -> Result<(), PipelineError> {
        Self::write_json(fs, path, snapshot, PipelineStage::Inspect)
    }

    /// Persist the comparison record as pretty JSON
    pub fn write_comparison<FS: FileSystem>(
        fs: &FS,
        path: &Path,
        record: &ComparisonRecord<'_>,
    ) -> Result<(), PipelineError> {
        Self::write_json(fs, path, record, PipelineStage::Report)
    }

    fn write_json<FS: FileSystem, T: Serialize>(
        fs: &FS,
        path: &Path,
        value: &T,
        stage: PipelineStage,
    ) -> Result<(), PipelineError> {
        let to_io = |source| PipelineError::Io {
            stage,
            path: path.to_path_buf(),
            source,
        };
        let json = serde_json::to_string_pretty(value)
            .map_err(|e| to_io(std::io::Error::new(std::io::ErrorKind::InvalidData, e)))?;
        fs.write(path, json).map_err(to_io)?;
        log::debug!("wrote {}", path.display());
        Ok(())
    }
}
