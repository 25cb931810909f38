//! Shared formatting utilities for size display and console output

use console::Emoji;
use indicatif::{ProgressBar, ProgressStyle};
use std::time::Duration;

/// Wrench emoji for tool operations
pub const WRENCH: Emoji = Emoji("🔧", "*");

/// Rocket emoji for launch/start operations
pub const ROCKET: Emoji = Emoji("🚀", ">");

/// Checkmark emoji for success
pub const CHECKMARK: Emoji = Emoji("✅", "[OK]");

/// Crossmark emoji for failure
pub const CROSSMARK: Emoji = Emoji("❌", "[FAIL]");

/// Sparkles emoji for pipeline steps
pub const SPARKLES: Emoji = Emoji("✨", "*");

/// Info emoji for informational messages
pub const INFO: Emoji = Emoji("ℹ️", "i");

/// Chart emoji for metrics/statistics
pub const CHART: Emoji = Emoji("📊", "~");

/// Microscope emoji for analysis/inspection
pub const MICROSCOPE: Emoji = Emoji("🔍", ">>");

const MB: f64 = 1024.0 * 1024.0;

/// Format bytes as human-readable size string
///
/// # Examples
///
/// ```
/// use fbx2glb::fmt::format_bytes;
///
/// assert_eq!(format_bytes(512), "512 B");
/// assert_eq!(format_bytes(1024), "1.00 KB");
/// assert_eq!(format_bytes(1_048_576), "1.00 MB");
/// ```
pub fn format_bytes(bytes: u64) -> String {
    const KB: u64 = 1024;
    const MB: u64 = KB * 1024;

    if bytes >= MB {
        format!("{:.2} MB", bytes as f64 / MB as f64)
    } else if bytes >= KB {
        format!("{:.2} KB", bytes as f64 / KB as f64)
    } else {
        format!("{} B", bytes)
    }
}

/// Convert a (possibly negative) byte count to megabytes
pub fn to_megabytes(bytes: i64) -> f64 {
    bytes as f64 / MB
}

/// Relative change of `after` against `before`, in percent
///
/// A zero `before` yields exactly `0.0` instead of dividing by zero.
pub fn percent_change(before: i64, after: i64) -> f64 {
    if before == 0 {
        return 0.0;
    }
    (after - before) as f64 / before as f64 * 100.0
}

/// Format a percentage with one decimal and a `%` suffix
///
/// Values that round to zero print as `0.0%` whatever their sign.
///
/// # Examples
///
/// ```
/// use fbx2glb::fmt::format_percent;
///
/// assert_eq!(format_percent(-50.0), "-50.0%");
/// assert_eq!(format_percent(12.345), "12.3%");
/// assert_eq!(format_percent(-0.01), "0.0%");
/// ```
pub fn format_percent(value: f64) -> String {
    let rounded = format!("{:.1}", value);
    if rounded == "-0.0" {
        return "0.0%".to_string();
    }
    format!("{}%", rounded)
}

/// Spinner shown while an external tool runs
///
/// Draws to stderr and stays hidden when stderr is not a terminal.
pub fn stage_spinner(message: impl Into<String>) -> ProgressBar {
    let spinner = ProgressBar::new_spinner();
    if let Ok(style) = ProgressStyle::with_template("   {spinner} {msg}") {
        spinner.set_style(style);
    }
    spinner.set_message(message.into());
    spinner.enable_steady_tick(Duration::from_millis(100));
    spinner
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bytes_various_sizes() {
        assert_eq!(format_bytes(0), "0 B");
        assert_eq!(format_bytes(512), "512 B");
        assert_eq!(format_bytes(1536), "1.50 KB");
        assert_eq!(format_bytes(2_621_440), "2.50 MB");
    }

    #[test]
    fn test_to_megabytes_handles_negative_deltas() {
        assert_eq!(to_megabytes(1_048_576), 1.0);
        assert_eq!(to_megabytes(-524_288), -0.5);
    }

    #[test]
    fn test_percent_change_with_zero_before_is_zero() {
        assert_eq!(percent_change(0, 100), 0.0);
        assert_eq!(percent_change(0, 0), 0.0);
    }

    #[test]
    fn test_percent_change_sign_follows_diff() {
        assert_eq!(percent_change(200, 100), -50.0);
        assert_eq!(percent_change(100, 150), 50.0);
        assert_eq!(percent_change(100, 100), 0.0);
    }

    #[test]
    fn test_format_percent_rounds_to_one_decimal() {
        assert_eq!(format_percent(0.0), "0.0%");
        assert_eq!(format_percent(100.0), "100.0%");
        assert_eq!(format_percent(-33.333), "-33.3%");
    }

    #[test]
    fn test_format_percent_near_zero_has_no_sign() {
        assert_eq!(format_percent(-0.01), "0.0%");
        assert_eq!(format_percent(0.01), "0.0%");
        assert_eq!(format_percent(-0.0), "0.0%");
        assert_eq!(format_percent(-0.06), "-0.1%");
    }

    #[test]
    fn test_stage_spinner_keeps_message() {
        let spinner = stage_spinner("Running weld");
        assert_eq!(spinner.message(), "Running weld");
        spinner.finish_and_clear();
    }
}
