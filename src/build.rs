//! Build orchestration.
//!
//! Sequences the whole pipeline for one invocation:
//!
//! ```text
//! verify entry template
//!   → legacy assets + bulk directories     (copied up front)
//!   → include expansion                    (fatal on unresolved/circular)
//!   → asset path rewriting
//!   → minification                         (--minify)
//!   → provenance map emission              (--sourcemap)
//!   → referenced-asset copying             (missing = warnings)
//!   → write composed page
//! ```
//!
//! The pipeline is strictly sequential; the document text is handed off by
//! value from stage to stage, and the single [`BuildStats`] accumulator is
//! owned here and lent to the stages that count into it. Fatal errors
//! propagate unmodified; whatever side effects earlier stages performed
//! (legacy copies, say) are left as-is.

use crate::assets::{self, MissingAsset};
use crate::config::BuildConfig;
use crate::include::{self, IncludeError, ProvenanceEntry};
use crate::minify;
use crate::paths::ProjectPaths;
use crate::rewrite;
use chrono::Utc;
use serde::Serialize;
use std::fmt;
use std::fs;
use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum BuildError {
    #[error("Entry template not found: {0}")]
    MissingTemplate(String),
    #[error(transparent)]
    Include(#[from] IncludeError),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// CLI-selectable build behavior.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildOptions {
    pub minify: bool,
    pub sourcemap: bool,
}

/// Counters accumulated across one build invocation.
#[derive(Debug, Clone, Copy, Default)]
pub struct BuildStats {
    pub includes_resolved: usize,
    pub copied_files: usize,
    pub copied_bytes: u64,
}

impl fmt::Display for BuildStats {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} includes resolved, {} files copied ({} bytes)",
            self.includes_resolved, self.copied_files, self.copied_bytes
        )
    }
}

/// Provenance map artifact written next to the composed page.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct ProvenanceMap<'a> {
    version: u32,
    file: &'a str,
    source_root: &'a str,
    sources: Vec<String>,
    includes: &'a [ProvenanceEntry],
    generated_at: String,
}

/// Everything a completed build has to report.
#[derive(Debug)]
pub struct BuildReport {
    pub output_path: PathBuf,
    pub provenance_path: Option<PathBuf>,
    pub stats: BuildStats,
    pub missing_assets: Vec<MissingAsset>,
    pub warnings: Vec<String>,
}

/// Validation result from a dry run.
#[derive(Debug)]
pub struct CheckReport {
    pub entry: PathBuf,
    pub includes: Vec<ProvenanceEntry>,
    pub missing_assets: Vec<MissingAsset>,
}

/// Run the full build pipeline.
pub fn run(
    paths: &ProjectPaths,
    config: &BuildConfig,
    options: BuildOptions,
) -> Result<BuildReport, BuildError> {
    let entry = paths.entry_template(config);
    if !entry.is_file() {
        return Err(BuildError::MissingTemplate(paths.rel(&entry)));
    }

    let mut stats = BuildStats::default();
    let mut warnings = Vec::new();

    fs::create_dir_all(&paths.output)?;
    warnings.extend(assets::copy_legacy_assets(&config.assets, paths, &mut stats)?);
    warnings.extend(assets::copy_bulk_dirs(&config.assets, paths, &mut stats)?);

    let expansion = include::expand_entry(paths, &entry)?;
    stats.includes_resolved = expansion.provenance.len();

    let mut html = rewrite::rewrite_asset_paths(&expansion.text);

    if options.minify {
        html = minify::minify_html(&html);
    }

    let mut provenance_path = None;
    if options.sourcemap {
        let map_name = format!("{}.map", config.compose.output_file);
        let map = ProvenanceMap {
            version: 1,
            file: &config.compose.output_file,
            source_root: ".",
            sources: vec![paths.rel(&entry)],
            includes: &expansion.provenance,
            generated_at: Utc::now().to_rfc3339(),
        };
        let map_path = paths.output.join(&map_name);
        fs::write(&map_path, serde_json::to_string_pretty(&map)?)?;

        let separator = if options.minify { "" } else { "\n" };
        html.push_str(&format!(
            "{separator}<!--# sourceMappingURL={map_name} -->"
        ));
        provenance_path = Some(map_path);
    }

    let missing_assets = assets::copy_referenced_assets(&html, paths, &mut stats)?;

    let output_path = paths.output.join(&config.compose.output_file);
    fs::write(&output_path, &html)?;

    Ok(BuildReport {
        output_path,
        provenance_path,
        stats,
        missing_assets,
        warnings,
    })
}

/// Validate the project without writing the distribution.
///
/// Runs expansion and rewriting in memory, then reports which referenced
/// assets would be missing. Fatal conditions match [`run`].
pub fn check(paths: &ProjectPaths, config: &BuildConfig) -> Result<CheckReport, BuildError> {
    let entry = paths.entry_template(config);
    if !entry.is_file() {
        return Err(BuildError::MissingTemplate(paths.rel(&entry)));
    }

    let expansion = include::expand_entry(paths, &entry)?;
    let html = rewrite::rewrite_asset_paths(&expansion.text);
    let missing_assets = assets::find_missing_assets(&html, paths);

    Ok(CheckReport {
        entry,
        includes: expansion.provenance,
        missing_assets,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        config: BuildConfig,
        paths: ProjectPaths,
    }

    impl Fixture {
        /// Bare project: templates dir exists, no legacy/bulk sources.
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let mut config = BuildConfig::default();
            // Most tests don't stage vendor trees; keep reports quiet.
            config.assets.legacy.clear();
            config.assets.copy_dirs.clear();
            config.assets.compat_css = false;
            let paths = ProjectPaths::new(tmp.path(), &config);
            fs::create_dir_all(&paths.templates).unwrap();
            Self {
                _tmp: tmp,
                config,
                paths,
            }
        }

        fn entry(&self, content: &str) {
            fs::write(self.paths.templates.join("index.html"), content).unwrap();
        }

        fn fragment(&self, name: &str, content: &str) {
            let path = self.paths.source.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn run(&self, options: BuildOptions) -> Result<BuildReport, BuildError> {
            run(&self.paths, &self.config, options)
        }
    }

    #[test]
    fn missing_entry_template_is_fatal() {
        let fx = Fixture::new();
        let err = fx.run(BuildOptions::default()).unwrap_err();
        match err {
            BuildError::MissingTemplate(path) => {
                assert_eq!(path, "src/templates/index.html");
            }
            other => panic!("expected MissingTemplate, got {other:?}"),
        }
    }

    #[test]
    fn composes_and_writes_output() {
        let fx = Fixture::new();
        fx.entry("<!-- INCLUDE: header -->body<!-- INCLUDE: footer -->");
        fx.fragment("header.html", "<h1>Hi</h1>");
        fx.fragment("footer.html", "<footer></footer>");

        let report = fx.run(BuildOptions::default()).unwrap();

        let html = fs::read_to_string(&report.output_path).unwrap();
        assert_eq!(html, "<h1>Hi</h1>body<footer></footer>");
        assert_eq!(report.stats.includes_resolved, 2);
        assert!(report.provenance_path.is_none());
        assert!(report.missing_assets.is_empty());
    }

    #[test]
    fn rewrites_paths_in_composed_output() {
        let fx = Fixture::new();
        fx.entry(r#"<img src="../../assets/logo.png">"#);
        fx.fragment("assets/logo.png", "png");

        let report = fx.run(BuildOptions::default()).unwrap();

        let html = fs::read_to_string(&report.output_path).unwrap();
        assert!(html.contains(r#"src="./assets/logo.png""#));
        assert!(fx.paths.output.join("assets/logo.png").is_file());
        assert_eq!(report.stats.copied_files, 1);
    }

    #[test]
    fn missing_asset_is_warning_not_error() {
        let fx = Fixture::new();
        fx.entry(r#"<img src="./assets/missing.png">"#);

        let report = fx.run(BuildOptions::default()).unwrap();

        assert_eq!(report.missing_assets.len(), 1);
        assert_eq!(report.missing_assets[0].reference, "./assets/missing.png");
        assert!(report.output_path.is_file());
    }

    #[test]
    fn unresolved_include_aborts() {
        let fx = Fixture::new();
        fx.entry("<!-- INCLUDE: ghost -->");

        let err = fx.run(BuildOptions::default()).unwrap_err();
        assert!(matches!(err, BuildError::Include(IncludeError::NotFound(_))));
        // Composed page never written
        assert!(!fx.paths.output.join("index.html").exists());
    }

    #[test]
    fn circular_include_aborts() {
        let fx = Fixture::new();
        fx.entry("<!-- INCLUDE: a -->");
        fx.fragment("a.html", "<!-- INCLUDE: b -->");
        fx.fragment("b.html", "<!-- INCLUDE: a -->");

        let err = fx.run(BuildOptions::default()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("src/a.html -> src/b.html -> src/a.html"), "{message}");
    }

    #[test]
    fn minify_strips_comments_and_whitespace() {
        let fx = Fixture::new();
        fx.entry("<p>a</p>\n   <!-- gone -->\n   <p>b</p>");

        let report = fx
            .run(BuildOptions {
                minify: true,
                sourcemap: false,
            })
            .unwrap();

        let html = fs::read_to_string(&report.output_path).unwrap();
        assert_eq!(html, "<p>a</p><p>b</p>");
    }

    #[test]
    fn sourcemap_emits_map_and_reference_comment() {
        let fx = Fixture::new();
        fx.entry("<!-- INCLUDE: header -->");
        fx.fragment("header.html", "<h1>Hi</h1>");

        let report = fx
            .run(BuildOptions {
                minify: false,
                sourcemap: true,
            })
            .unwrap();

        let map_path = report.provenance_path.unwrap();
        let map: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&map_path).unwrap()).unwrap();
        assert_eq!(map["version"], 1);
        assert_eq!(map["file"], "index.html");
        assert_eq!(map["sourceRoot"], ".");
        assert_eq!(map["sources"][0], "src/templates/index.html");
        assert_eq!(map["includes"][0]["include"], "header");
        assert_eq!(map["includes"][0]["source"], "src/header.html");
        assert!(map["generatedAt"].as_str().unwrap().contains('T'));

        let html = fs::read_to_string(&report.output_path).unwrap();
        assert!(html.ends_with("\n<!--# sourceMappingURL=index.html.map -->"));
    }

    #[test]
    fn sourcemap_comment_unseparated_when_minified() {
        let fx = Fixture::new();
        fx.entry("<p>x</p>");

        let report = fx
            .run(BuildOptions {
                minify: true,
                sourcemap: true,
            })
            .unwrap();

        let html = fs::read_to_string(&report.output_path).unwrap();
        assert_eq!(html, "<p>x</p><!--# sourceMappingURL=index.html.map -->");
    }

    #[test]
    fn legacy_warnings_surface_in_report() {
        let fx = Fixture::new();
        let mut config = fx.config.clone();
        config.assets = crate::config::AssetsConfig::default();
        fx.entry("<p>x</p>");

        let report = run(&fx.paths, &config, BuildOptions::default()).unwrap();

        // 3 legacy files and 2 bulk dirs all absent
        assert_eq!(report.warnings.len(), 5);
        // Shim still written
        assert!(fx.paths.output.join("index.css").is_file());
    }

    #[test]
    fn check_reports_without_writing() {
        let fx = Fixture::new();
        fx.entry(r#"<!-- INCLUDE: header --><img src="assets/gone.png">"#);
        fx.fragment("header.html", "<h1/>");

        let report = check(&fx.paths, &fx.config).unwrap();

        assert_eq!(report.includes.len(), 1);
        assert_eq!(report.missing_assets.len(), 1);
        assert!(!fx.paths.output.exists());
    }

    #[test]
    fn check_surfaces_fatal_include_errors() {
        let fx = Fixture::new();
        fx.entry("<!-- INCLUDE: nope -->");

        assert!(matches!(
            check(&fx.paths, &fx.config),
            Err(BuildError::Include(IncludeError::NotFound(_)))
        ));
    }
}
