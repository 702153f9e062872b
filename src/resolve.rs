//! Reference resolution for includes and assets.
//!
//! Two resolution kinds share this module:
//!
//! - **Includes**: a directive reference like `components/header` is
//!   normalized (separators, `.html` suffix) and probed against the shared
//!   source tree first, then the templates area. Zero or one location.
//! - **Assets**: a document reference like `./assets/img/logo.png` is mapped
//!   back to where the file lives in the source tree by its leading prefix
//!   (`assets/`, `vendor/`, `styles/`, `scripts/`). References outside the
//!   known prefixes fall back to the project root, which keeps hand-authored
//!   paths (a root-level favicon, say) working.
//!
//! A failed include resolution is fatal to the build; a failed asset
//! resolution is the caller's problem to collect and report.

use crate::paths::ProjectPaths;
use std::path::PathBuf;

/// Reference prefixes with a known home in the source tree.
///
/// Each maps to the same-named subdirectory of the source dir.
const ASSET_PREFIXES: &[&str] = &["assets/", "vendor/", "styles/", "scripts/"];

/// Normalize a raw include reference: trim, forward slashes, `.html` suffix.
///
/// `components\header ` becomes `components/header.html`.
pub fn normalize_include_ref(raw: &str) -> String {
    let reference = raw.trim().replace('\\', "/");
    if reference.ends_with(".html") {
        reference
    } else {
        format!("{reference}.html")
    }
}

/// Resolve an include reference to an existing file, probing the shared
/// source tree first and the templates area second.
pub fn resolve_include(paths: &ProjectPaths, raw: &str) -> Option<PathBuf> {
    let normalized = normalize_include_ref(raw);
    let candidates = [
        paths.source.join(&normalized),
        paths.templates.join(&normalized),
    ];
    candidates.into_iter().find(|candidate| candidate.is_file())
}

/// Strip a leading `./` and any leading `/` characters from a document
/// asset reference, yielding the output-relative form.
pub fn normalize_asset_ref(reference: &str) -> String {
    let stripped = reference.strip_prefix("./").unwrap_or(reference);
    stripped.trim_start_matches('/').to_string()
}

/// Map a document asset reference to the source file it should be copied
/// from.
///
/// Known prefixes live under the source dir; anything else resolves against
/// the project root. The returned path is where the file is *expected* —
/// existence is the caller's concern.
pub fn asset_source_path(paths: &ProjectPaths, reference: &str) -> PathBuf {
    let normalized = normalize_asset_ref(reference);

    if ASSET_PREFIXES
        .iter()
        .any(|prefix| normalized.starts_with(prefix))
    {
        return paths.source.join(&normalized);
    }

    paths.root.join(&normalized)
}
