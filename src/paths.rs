//! Resolved project directory layout.
//!
//! Turns the relative directory names from [`crate::config::DirsConfig`] into
//! concrete paths anchored at the project root, and provides root-relative
//! display for diagnostics so error messages and reports stay portable.

use crate::config::BuildConfig;
use std::path::{Path, PathBuf};

/// Absolute (root-anchored) locations of the project's directory layout.
///
/// Constructed once per invocation and shared by every pipeline stage.
#[derive(Debug, Clone)]
pub struct ProjectPaths {
    /// Project root all diagnostics are displayed relative to.
    pub root: PathBuf,
    /// Shared source tree (`src/` by default).
    pub source: PathBuf,
    /// Template area holding the entry template (`src/templates/` by default).
    pub templates: PathBuf,
    /// Distribution root (`dist/` by default).
    pub output: PathBuf,
}

impl ProjectPaths {
    pub fn new(root: &Path, config: &BuildConfig) -> Self {
        Self {
            root: root.to_path_buf(),
            source: root.join(&config.dirs.source),
            templates: root.join(&config.dirs.templates),
            output: root.join(&config.dirs.output),
        }
    }

    /// Location of the entry template.
    pub fn entry_template(&self, config: &BuildConfig) -> PathBuf {
        self.templates.join(&config.compose.entry)
    }

    /// Display a path relative to the project root.
    ///
    /// Falls back to the path as given when it is not under the root.
    pub fn rel(&self, path: &Path) -> String {
        path.strip_prefix(&self.root)
            .unwrap_or(path)
            .display()
            .to_string()
    }
}
