//! Build configuration module.
//!
//! Handles loading and validating `sitefuse.toml`. Configuration is optional:
//! a project with no config file builds with the stock layout below.
//!
//! ## Config File Location
//!
//! Place `sitefuse.toml` in the project root, next to the source directory:
//!
//! ```text
//! site/
//! ├── sitefuse.toml            # Build configuration (optional)
//! ├── src/
//! │   ├── templates/
//! │   │   └── index.html       # Entry template
//! │   ├── components/          # Include fragments
//! │   ├── assets/
//! │   ├── styles/
//! │   ├── scripts/
//! │   └── vendor/
//! └── dist/                    # Build output
//! ```
//!
//! ## Configuration Options
//!
//! ```toml
//! # All options are optional - defaults shown below
//!
//! [dirs]
//! source = "src"               # Shared source tree
//! templates = "src/templates"  # Template area (include probe fallback)
//! output = "dist"              # Distribution root
//!
//! [compose]
//! entry = "index.html"         # Entry template, relative to dirs.templates
//! output_file = "index.html"   # Composed page name under dirs.output
//!
//! [assets]
//! compat_css = true            # Emit an index.css shim importing styles/main.css
//!
//! # Single files copied into the output root under a fixed name
//! legacy = [
//!     { dest = "nicepage.css", source = "vendor/nicepage/nicepage.css" },
//!     { dest = "nicepage.js", source = "vendor/nicepage/nicepage.js" },
//!     { dest = "jquery.js", source = "vendor/jquery/jquery-1.9.1.min.js" },
//! ]
//!
//! # Directories copied wholesale into the output tree
//! copy_dirs = [
//!     { from = "assets/images", to = "images" },
//!     { from = "vendor/intlTelInput", to = "intlTelInput" },
//! ]
//! ```
//!
//! `legacy[].source` and `copy_dirs[].from` are relative to `dirs.source`;
//! `legacy[].dest` and `copy_dirs[].to` are relative to `dirs.output`.
//!
//! Config files are sparse — override just the values you want. Unknown keys
//! are rejected to catch typos early.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),
}

/// Build configuration loaded from `sitefuse.toml`.
///
/// All fields have stock defaults matching the conventional project layout.
/// User config files need only specify the values they want to override.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct BuildConfig {
    /// Directory layout relative to the project root.
    pub dirs: DirsConfig,
    /// Entry template and output file names.
    pub compose: ComposeConfig,
    /// Legacy/vendor asset copying.
    pub assets: AssetsConfig,
}

/// Directory layout, all paths relative to the project root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct DirsConfig {
    pub source: String,
    pub templates: String,
    pub output: String,
}

impl Default for DirsConfig {
    fn default() -> Self {
        Self {
            source: "src".to_string(),
            templates: "src/templates".to_string(),
            output: "dist".to_string(),
        }
    }
}

/// Entry template and composed output names.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ComposeConfig {
    /// Entry template filename, relative to the templates directory.
    pub entry: String,
    /// Composed page filename under the output directory.
    pub output_file: String,
}

impl Default for ComposeConfig {
    fn default() -> Self {
        Self {
            entry: "index.html".to_string(),
            output_file: "index.html".to_string(),
        }
    }
}

/// Fixed asset copying performed before template composition.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AssetsConfig {
    /// Emit `index.css` importing `./styles/main.css` into the output root.
    ///
    /// Exists for vendor-exported pages that hardcode an `index.css` link.
    pub compat_css: bool,
    /// Single files copied into the output root under a fixed name.
    pub legacy: Vec<LegacyAsset>,
    /// Directories copied wholesale into the output tree.
    pub copy_dirs: Vec<CopyDir>,
}

impl Default for AssetsConfig {
    fn default() -> Self {
        Self {
            compat_css: true,
            legacy: vec![
                LegacyAsset::new("nicepage.css", "vendor/nicepage/nicepage.css"),
                LegacyAsset::new("nicepage.js", "vendor/nicepage/nicepage.js"),
                LegacyAsset::new("jquery.js", "vendor/jquery/jquery-1.9.1.min.js"),
            ],
            copy_dirs: vec![
                CopyDir::new("assets/images", "images"),
                CopyDir::new("vendor/intlTelInput", "intlTelInput"),
            ],
        }
    }
}

/// A single vendor file copied to a fixed name in the output root.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LegacyAsset {
    /// Destination filename, relative to the output directory.
    pub dest: String,
    /// Source path, relative to the source directory.
    pub source: String,
}

impl LegacyAsset {
    fn new(dest: &str, source: &str) -> Self {
        Self {
            dest: dest.to_string(),
            source: source.to_string(),
        }
    }
}

/// A directory copied wholesale into the output tree.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CopyDir {
    /// Source directory, relative to the source directory.
    pub from: String,
    /// Destination directory, relative to the output directory.
    pub to: String,
}

impl CopyDir {
    fn new(from: &str, to: &str) -> Self {
        Self {
            from: from.to_string(),
            to: to.to_string(),
        }
    }
}

/// Load `sitefuse.toml` from the project root, falling back to defaults
/// when no config file exists.
pub fn load_config(root: &Path) -> Result<BuildConfig, ConfigError> {
    let config_path = root.join("sitefuse.toml");
    if !config_path.exists() {
        return Ok(BuildConfig::default());
    }
    let content = fs::read_to_string(&config_path)?;
    let config: BuildConfig = toml::from_str(&content)?;
    Ok(config)
}

/// Return a fully documented stock `sitefuse.toml` with all defaults.
pub fn stock_config_toml() -> String {
    r#"# sitefuse build configuration
# All options are optional - the values below are the defaults.

[dirs]
# Shared source tree, probed first for includes and asset sources.
source = "src"
# Template area, probed second for includes; holds the entry template.
templates = "src/templates"
# Distribution root the composed page and assets are written to.
output = "dist"

[compose]
# Entry template filename, relative to dirs.templates.
entry = "index.html"
# Composed page filename under dirs.output.
output_file = "index.html"

[assets]
# Emit an index.css shim importing ./styles/main.css into the output root.
compat_css = true

# Single files copied into the output root under a fixed name.
# Sources are relative to dirs.source.
legacy = [
    { dest = "nicepage.css", source = "vendor/nicepage/nicepage.css" },
    { dest = "nicepage.js", source = "vendor/nicepage/nicepage.js" },
    { dest = "jquery.js", source = "vendor/jquery/jquery-1.9.1.min.js" },
]

# Directories copied wholesale into the output tree.
copy_dirs = [
    { from = "assets/images", to = "images" },
    { from = "vendor/intlTelInput", to = "intlTelInput" },
]
"#
    .to_string()
}
