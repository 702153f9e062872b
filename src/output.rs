//! CLI output formatting.
//!
//! Each command has a `format_*` function (returns `Vec<String>`) for
//! testability and a `print_*` wrapper that writes to stdout. Format
//! functions are pure — no I/O, no side effects.
//!
//! # Output Format
//!
//! ## Build
//!
//! ```text
//! Composed dist/index.html
//!     Includes resolved: 4
//!     Files copied: 12 (48211 bytes)
//!     Provenance map: dist/index.html.map
//!
//! Warnings
//!     Legacy asset source not found: src/vendor/jquery/jquery-1.9.1.min.js
//!
//! Missing assets
//!     ./assets/hero.png (expected at src/assets/hero.png)
//! ```
//!
//! ## Check
//!
//! ```text
//! Entry: src/templates/index.html
//! Includes
//!     001 header -> src/components/header.html
//!     002 footer -> src/components/footer.html
//!
//! Missing assets
//!     ./assets/hero.png (expected at src/assets/hero.png)
//! ```
//!
//! Missing assets and warnings are informational; neither affects the exit
//! status.

use crate::assets::MissingAsset;
use crate::build::{BuildReport, CheckReport};
use crate::paths::ProjectPaths;

/// Format a 1-based positional index as 3-digit zero-padded.
fn format_index(pos: usize) -> String {
    format!("{:0>3}", pos)
}

fn push_missing_assets(lines: &mut Vec<String>, missing: &[MissingAsset]) {
    if missing.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("Missing assets".to_string());
    for asset in missing {
        lines.push(format!(
            "    {} (expected at {})",
            asset.reference, asset.expected_source
        ));
    }
}

fn push_warnings(lines: &mut Vec<String>, warnings: &[String]) {
    if warnings.is_empty() {
        return;
    }
    lines.push(String::new());
    lines.push("Warnings".to_string());
    for warning in warnings {
        lines.push(format!("    {warning}"));
    }
}

/// Format the build summary: composed output, counters, then warnings and
/// missing assets as trailing sections.
pub fn format_build_report(report: &BuildReport, paths: &ProjectPaths) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Composed {}", paths.rel(&report.output_path)));
    lines.push(format!(
        "    Includes resolved: {}",
        report.stats.includes_resolved
    ));
    lines.push(format!(
        "    Files copied: {} ({} bytes)",
        report.stats.copied_files, report.stats.copied_bytes
    ));
    if let Some(map_path) = &report.provenance_path {
        lines.push(format!("    Provenance map: {}", paths.rel(map_path)));
    }

    push_warnings(&mut lines, &report.warnings);
    push_missing_assets(&mut lines, &report.missing_assets);

    lines
}

/// Print build output to stdout.
pub fn print_build_report(report: &BuildReport, paths: &ProjectPaths) {
    for line in format_build_report(report, paths) {
        println!("{}", line);
    }
}

/// Format the check summary: entry, resolved includes in substitution order,
/// then assets that would be missing.
pub fn format_check_report(report: &CheckReport, paths: &ProjectPaths) -> Vec<String> {
    let mut lines = Vec::new();

    lines.push(format!("Entry: {}", paths.rel(&report.entry)));

    if report.includes.is_empty() {
        lines.push("No includes".to_string());
    } else {
        lines.push("Includes".to_string());
        for (i, entry) in report.includes.iter().enumerate() {
            lines.push(format!(
                "    {} {} -> {}",
                format_index(i + 1),
                entry.include,
                entry.source
            ));
        }
    }

    push_missing_assets(&mut lines, &report.missing_assets);

    lines
}

/// Print check output to stdout.
pub fn print_check_report(report: &CheckReport, paths: &ProjectPaths) {
    for line in format_check_report(report, paths) {
        println!("{}", line);
    }
}
