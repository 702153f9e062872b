//! Recursive include expansion.
//!
//! The heart of the build: flattens `<!-- INCLUDE: ref -->` directives in an
//! HTML document into a single composed page. Expansion is depth-first and
//! left-to-right; each directive is expanded exactly once because substitution
//! targets the directive text found in the *pre-substitution* scan, and any
//! directives inside an included fragment are handled by the recursive call,
//! never by re-scanning the parent.
//!
//! ## Cycle detection
//!
//! The recursion carries an ordered ancestor trace (the chain of files from
//! the entry template down to the current fragment). A resolved include that
//! already appears in the trace is a cycle, and the error message lists the
//! entire chain so a cycle through intermediaries is diagnosable. The trace is
//! deliberately a stack, not a visited set: the same fragment may appear in
//! two sibling branches, and only an ancestor repeat is a cycle.
//!
//! ## Provenance
//!
//! Every resolved directive appends a [`ProvenanceEntry`] to a single list
//! owned by the root call. Entries land in textual substitution order: a
//! fragment's own children are recorded before the fragment itself.

use crate::paths::ProjectPaths;
use crate::resolve;
use regex::Regex;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;
use thiserror::Error;

/// `<!-- INCLUDE: components/header -->`, whitespace-tolerant.
static INCLUDE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"<!--\s*INCLUDE:\s*([^\n\r]+?)\s*-->").expect("invalid include regex")
});

#[derive(Error, Debug)]
pub enum IncludeError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Include not found: \"{0}\"")]
    NotFound(String),
    #[error("Circular include detected: {}", .0.join(" -> "))]
    Circular(Vec<String>),
}

/// One resolved include directive: the raw reference as written in the
/// template, and the root-relative source file it resolved to.
#[derive(Debug, Clone, Serialize, PartialEq, Eq)]
pub struct ProvenanceEntry {
    pub include: String,
    pub source: String,
}

/// Result of expanding an entry template.
#[derive(Debug)]
pub struct Expansion {
    /// The fully composed document.
    pub text: String,
    /// One entry per resolved directive, in substitution order.
    pub provenance: Vec<ProvenanceEntry>,
}

/// Read the entry template and expand it fully.
///
/// The entry file itself seeds the ancestor trace, so a fragment that pulls
/// the entry template back in is reported as a cycle too.
pub fn expand_entry(paths: &ProjectPaths, entry: &Path) -> Result<Expansion, IncludeError> {
    let template = fs::read_to_string(entry)?;
    let mut provenance = Vec::new();
    let text = expand(
        paths,
        &template,
        &[entry.to_path_buf()],
        &mut provenance,
    )?;
    Ok(Expansion { text, provenance })
}

/// Expand all include directives in `text`, recursively.
///
/// `trace` is the ancestor chain for cycle detection; `provenance` is the
/// shared accumulator the whole expansion run appends to.
pub fn expand(
    paths: &ProjectPaths,
    text: &str,
    trace: &[PathBuf],
    provenance: &mut Vec<ProvenanceEntry>,
) -> Result<String, IncludeError> {
    // One scan of the pre-substitution text; owned copies so the working
    // result can be rewritten underneath.
    let directives: Vec<(String, String)> = INCLUDE_RE
        .captures_iter(text)
        .map(|caps| (caps[0].to_string(), caps[1].trim().to_string()))
        .collect();

    if directives.is_empty() {
        return Ok(text.to_string());
    }

    let mut result = text.to_string();

    for (directive, reference) in directives {
        let include_file = resolve::resolve_include(paths, &reference)
            .ok_or_else(|| IncludeError::NotFound(reference.clone()))?;

        if trace.contains(&include_file) {
            let chain = trace
                .iter()
                .chain(std::iter::once(&include_file))
                .map(|entry| paths.rel(entry))
                .collect();
            return Err(IncludeError::Circular(chain));
        }

        let fragment = fs::read_to_string(&include_file)?;

        let mut branch_trace = trace.to_vec();
        branch_trace.push(include_file.clone());
        let expanded = expand(paths, &fragment, &branch_trace, provenance)?;

        provenance.push(ProvenanceEntry {
            include: reference,
            source: paths.rel(&include_file),
        });

        result = result.replacen(&directive, &expanded, 1);
    }

    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::BuildConfig;
    use std::fs;
    use tempfile::TempDir;

    struct Fixture {
        _tmp: TempDir,
        paths: ProjectPaths,
    }

    impl Fixture {
        fn new() -> Self {
            let tmp = TempDir::new().unwrap();
            let paths = ProjectPaths::new(tmp.path(), &BuildConfig::default());
            fs::create_dir_all(&paths.templates).unwrap();
            Self { _tmp: tmp, paths }
        }

        fn fragment(&self, name: &str, content: &str) {
            let path = self.paths.source.join(name);
            fs::create_dir_all(path.parent().unwrap()).unwrap();
            fs::write(path, content).unwrap();
        }

        fn expand(&self, text: &str) -> Result<(String, Vec<ProvenanceEntry>), IncludeError> {
            let mut provenance = Vec::new();
            let root = self.paths.templates.join("index.html");
            expand(&self.paths, text, &[root], &mut provenance)
                .map(|expanded| (expanded, provenance))
        }
    }

    #[test]
    fn directive_free_text_is_identity() {
        let fx = Fixture::new();
        let input = "<html><body>nothing to do</body></html>";
        let (out, provenance) = fx.expand(input).unwrap();
        assert_eq!(out, input);
        assert!(provenance.is_empty());
    }

    #[test]
    fn single_include_substituted() {
        let fx = Fixture::new();
        fx.fragment("header.html", "<h1>Hi</h1>");

        let (out, provenance) = fx.expand("<!-- INCLUDE: header -->body").unwrap();
        assert_eq!(out, "<h1>Hi</h1>body");
        assert_eq!(provenance.len(), 1);
        assert_eq!(provenance[0].include, "header");
        assert_eq!(provenance[0].source, "src/header.html");
    }

    #[test]
    fn directive_whitespace_tolerant() {
        let fx = Fixture::new();
        fx.fragment("nav.html", "<nav/>");

        let (out, _) = fx.expand("<!--INCLUDE:nav-->").unwrap();
        assert_eq!(out, "<nav/>");
        let (out, _) = fx.expand("<!--   INCLUDE:   nav   -->").unwrap();
        assert_eq!(out, "<nav/>");
    }

    #[test]
    fn siblings_substituted_in_source_order() {
        let fx = Fixture::new();
        fx.fragment("header.html", "<h1>Hi</h1>");
        fx.fragment("footer.html", "<footer></footer>");

        let (out, provenance) = fx
            .expand("<!-- INCLUDE: header -->body<!-- INCLUDE: footer -->")
            .unwrap();
        assert_eq!(out, "<h1>Hi</h1>body<footer></footer>");
        let refs: Vec<&str> = provenance.iter().map(|p| p.include.as_str()).collect();
        assert_eq!(refs, ["header", "footer"]);
    }

    #[test]
    fn nested_includes_expand_depth_first() {
        let fx = Fixture::new();
        fx.fragment("page.html", "[<!-- INCLUDE: inner -->]");
        fx.fragment("inner.html", "deep");

        let (out, provenance) = fx.expand("<!-- INCLUDE: page -->").unwrap();
        assert_eq!(out, "[deep]");
        // Children recorded before their parent (substitution order)
        let refs: Vec<&str> = provenance.iter().map(|p| p.include.as_str()).collect();
        assert_eq!(refs, ["inner", "page"]);
    }

    #[test]
    fn provenance_counts_every_directive_across_the_tree() {
        let fx = Fixture::new();
        fx.fragment("a.html", "<!-- INCLUDE: b --><!-- INCLUDE: b -->");
        fx.fragment("b.html", "x");

        let (out, provenance) = fx.expand("<!-- INCLUDE: a -->").unwrap();
        assert_eq!(out, "xx");
        assert_eq!(provenance.len(), 3);
    }

    #[test]
    fn same_fragment_allowed_in_sibling_branches() {
        let fx = Fixture::new();
        fx.fragment("left.html", "<!-- INCLUDE: shared -->");
        fx.fragment("right.html", "<!-- INCLUDE: shared -->");
        fx.fragment("shared.html", "*");

        let (out, provenance) = fx
            .expand("<!-- INCLUDE: left --><!-- INCLUDE: right -->")
            .unwrap();
        assert_eq!(out, "**");
        assert_eq!(provenance.len(), 4);
    }

    #[test]
    fn repeated_sibling_under_same_parent_allowed() {
        let fx = Fixture::new();
        fx.fragment("chip.html", "o");

        let (out, _) = fx
            .expand("<!-- INCLUDE: chip --><!-- INCLUDE: chip -->")
            .unwrap();
        assert_eq!(out, "oo");
    }

    #[test]
    fn missing_include_names_raw_reference() {
        let fx = Fixture::new();
        let err = fx.expand("<!-- INCLUDE: ghost -->").unwrap_err();
        match err {
            IncludeError::NotFound(reference) => assert_eq!(reference, "ghost"),
            other => panic!("expected NotFound, got {other:?}"),
        }
    }

    #[test]
    fn self_include_is_a_cycle() {
        let fx = Fixture::new();
        fx.fragment("loop.html", "<!-- INCLUDE: loop -->");

        let err = fx.expand("<!-- INCLUDE: loop -->").unwrap_err();
        match err {
            IncludeError::Circular(chain) => {
                assert!(chain.len() >= 2);
                // Repeated file appears at both ends of its own sub-chain
                assert_eq!(chain[chain.len() - 1], "src/loop.html");
                assert_eq!(chain[chain.len() - 2], "src/loop.html");
            }
            other => panic!("expected Circular, got {other:?}"),
        }
    }

    #[test]
    fn three_node_cycle_lists_full_chain_in_order() {
        let fx = Fixture::new();
        fx.fragment("a.html", "<!-- INCLUDE: b -->");
        fx.fragment("b.html", "<!-- INCLUDE: c -->");
        fx.fragment("c.html", "<!-- INCLUDE: a -->");

        let err = fx.expand("<!-- INCLUDE: a -->").unwrap_err();
        let message = err.to_string();
        match err {
            IncludeError::Circular(chain) => {
                let tail: Vec<&str> = chain.iter().map(String::as_str).collect();
                assert_eq!(
                    &tail[1..],
                    ["src/a.html", "src/b.html", "src/c.html", "src/a.html"]
                );
            }
            other => panic!("expected Circular, got {other:?}"),
        }
        // Message enumerates the chain in traversal order
        let a = message.find("src/a.html").unwrap();
        let b = message.find("src/b.html").unwrap();
        let c = message.find("src/c.html").unwrap();
        assert!(a < b && b < c);
    }

    #[test]
    fn fragment_including_entry_template_is_a_cycle() {
        let fx = Fixture::new();
        fs::write(
            fx.paths.templates.join("index.html"),
            "<!-- INCLUDE: wrap -->",
        )
        .unwrap();
        fx.fragment("wrap.html", "<!-- INCLUDE: index -->");

        let entry = fx.paths.templates.join("index.html");
        let err = expand_entry(&fx.paths, &entry).unwrap_err();
        assert!(matches!(err, IncludeError::Circular(_)));
    }

    #[test]
    fn expand_entry_collects_provenance() {
        let fx = Fixture::new();
        fs::write(
            fx.paths.templates.join("index.html"),
            "<!-- INCLUDE: header -->body",
        )
        .unwrap();
        fx.fragment("header.html", "<h1>Hi</h1>");

        let entry = fx.paths.templates.join("index.html");
        let expansion = expand_entry(&fx.paths, &entry).unwrap();
        assert_eq!(expansion.text, "<h1>Hi</h1>body");
        assert_eq!(expansion.provenance.len(), 1);
    }

    #[test]
    fn include_with_explicit_extension_and_backslashes() {
        let fx = Fixture::new();
        fx.fragment("components/nav.html", "<nav/>");

        let (out, _) = fx.expand("<!-- INCLUDE: components\\nav.html -->").unwrap();
        assert_eq!(out, "<nav/>");
    }
}
