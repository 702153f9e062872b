//! Asset materialization.
//!
//! Copies everything the composed page needs into the distribution tree:
//!
//! - **Referenced assets**: the final document is scanned for local asset
//!   references, and each is copied from its source-tree location to the
//!   mirrored path under the output root. A reference whose source file does
//!   not exist is collected into a missing-assets report, never a build
//!   failure.
//! - **Legacy assets**: vendor files copied to fixed names in the output
//!   root, plus an optional `index.css` compatibility shim.
//! - **Bulk directories**: whole trees (images, the phone-input widget)
//!   copied verbatim.
//!
//! All copies feed the shared [`BuildStats`] accumulator owned by the
//! orchestrator.

use crate::build::BuildStats;
use crate::config::AssetsConfig;
use crate::paths::ProjectPaths;
use crate::resolve;
use crate::rewrite;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// A referenced asset whose expected source file does not exist.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MissingAsset {
    /// The reference as written in the document.
    pub reference: String,
    /// Root-relative path the source was expected at.
    pub expected_source: String,
}

const COMPAT_CSS: &str = "/* Compatibility layer for Nicepage */\n@import \"./styles/main.css\";\n";

/// Copy every local asset the document references into the output tree.
///
/// References that are empty or directory-like (trailing `/`) are skipped.
/// Returns the missing-assets report.
pub fn copy_referenced_assets(
    html: &str,
    paths: &ProjectPaths,
    stats: &mut BuildStats,
) -> io::Result<Vec<MissingAsset>> {
    let mut missing = Vec::new();

    for (reference, normalized) in file_refs(html) {
        let from = resolve::asset_source_path(paths, &reference);
        let to = paths.output.join(&normalized);

        if !copy_file_if_exists(&from, &to, stats)? {
            missing.push(MissingAsset {
                reference,
                expected_source: paths.rel(&from),
            });
        }
    }

    Ok(missing)
}

/// Report the referenced assets whose sources do not exist, without copying.
///
/// The dry-run counterpart of [`copy_referenced_assets`], used by `check`.
pub fn find_missing_assets(html: &str, paths: &ProjectPaths) -> Vec<MissingAsset> {
    file_refs(html)
        .into_iter()
        .filter_map(|(reference, _)| {
            let from = resolve::asset_source_path(paths, &reference);
            if from.is_file() {
                None
            } else {
                Some(MissingAsset {
                    reference,
                    expected_source: paths.rel(&from),
                })
            }
        })
        .collect()
}

/// Local asset references paired with their output-relative form, with
/// empty and directory-like references dropped.
fn file_refs(html: &str) -> Vec<(String, String)> {
    rewrite::collect_asset_refs(html)
        .into_iter()
        .filter_map(|reference| {
            let normalized = resolve::normalize_asset_ref(&reference);
            if normalized.is_empty() || normalized.ends_with('/') {
                None
            } else {
                Some((reference, normalized))
            }
        })
        .collect()
}

/// Copy `from` to `to` if the source exists, creating intermediate
/// directories and counting the copy into `stats`. Returns whether a copy
/// happened.
pub fn copy_file_if_exists(
    from: &Path,
    to: &Path,
    stats: &mut BuildStats,
) -> io::Result<bool> {
    if !from.is_file() {
        return Ok(false);
    }
    if let Some(parent) = to.parent() {
        fs::create_dir_all(parent)?;
    }
    let bytes = fs::copy(from, to)?;
    stats.copied_files += 1;
    stats.copied_bytes += bytes;
    Ok(true)
}

/// Copy the configured legacy vendor files into the output root, and write
/// the `index.css` compatibility shim when enabled.
///
/// A missing source is a warning and that copy is skipped.
pub fn copy_legacy_assets(
    config: &AssetsConfig,
    paths: &ProjectPaths,
    stats: &mut BuildStats,
) -> io::Result<Vec<String>> {
    let mut warnings = Vec::new();

    for legacy in &config.legacy {
        let from = paths.source.join(&legacy.source);
        let to = paths.output.join(&legacy.dest);
        if !copy_file_if_exists(&from, &to, stats)? {
            warnings.push(format!(
                "Legacy asset source not found: {}",
                paths.rel(&from)
            ));
        }
    }

    if config.compat_css {
        fs::write(paths.output.join("index.css"), COMPAT_CSS)?;
    }

    Ok(warnings)
}

/// Copy the configured bulk directories wholesale into the output tree.
///
/// A missing source directory is a warning and that copy is skipped.
pub fn copy_bulk_dirs(
    config: &AssetsConfig,
    paths: &ProjectPaths,
    stats: &mut BuildStats,
) -> io::Result<Vec<String>> {
    let mut warnings = Vec::new();

    for dir in &config.copy_dirs {
        let from = paths.source.join(&dir.from);
        let to = paths.output.join(&dir.to);

        if !from.is_dir() {
            warnings.push(format!("Source folder not found: {}", paths.rel(&from)));
            continue;
        }

        copy_dir_recursive(&from, &to, stats)?;
    }

    Ok(warnings)
}

fn copy_dir_recursive(from: &Path, to: &Path, stats: &mut BuildStats) -> io::Result<()> {
    for entry in WalkDir::new(from) {
        let entry = entry.map_err(io::Error::from)?;
        let rel: &Path = entry.path().strip_prefix(from).unwrap();
        let dest: PathBuf = to.join(rel);

        if entry.file_type().is_dir() {
            fs::create_dir_all(&dest)?;
        } else {
            if let Some(parent) = dest.parent() {
                fs::create_dir_all(parent)?;
            }
            let bytes = fs::copy(entry.path(), &dest)?;
            stats.copied_files += 1;
            stats.copied_bytes += bytes;
        }
    }
    Ok(())
}
