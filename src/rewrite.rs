//! Asset path rewriting.
//!
//! Pure text transforms over the composed document, no I/O. Fragments are
//! authored relative to wherever they live in the source tree, but the
//! composed page is served from the distribution root, so every URL-bearing
//! attribute (`src`, `href`, `poster`, `data-*src`) and CSS `url(...)` gets
//! its value rewritten into distribution-root-relative form:
//!
//! - external URLs and root-relative paths pass through untouched,
//! - leading `../` runs collapse to a single `./`,
//! - bare relative paths gain a `./` prefix.
//!
//! The rewrite is idempotent, so a document that round-trips through the
//! build again comes out unchanged.
//!
//! This module also owns asset-reference extraction ([`collect_asset_refs`]),
//! since it shares the same two scan patterns.

use regex::{Captures, Regex};
use std::collections::HashSet;
use std::sync::LazyLock;

/// URL-bearing HTML attributes with a quoted value.
static ATTR_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)(\s(?:src|href|poster|data-[\w-]*src)\s*=\s*)(?:"([^"]+)"|'([^']+)')"#)
        .expect("invalid attribute url regex")
});

/// CSS `url(...)` with optional single or double quotes.
static CSS_URL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r#"(?i)url\(\s*(?:"([^"]+)"|'([^']+)'|([^'")]+?))\s*\)"#)
        .expect("invalid css url regex")
});

/// True for references the rewriter must never touch: scheme-qualified and
/// protocol-relative URLs, `mailto:`/`tel:`/`javascript:`/`data:` schemes,
/// and fragment references.
pub fn is_external_url(value: &str) -> bool {
    if value.starts_with("//") || value.starts_with('#') {
        return true;
    }
    let lower = value.to_ascii_lowercase();
    if ["mailto:", "tel:", "javascript:", "data:"]
        .iter()
        .any(|scheme| lower.starts_with(scheme))
    {
        return true;
    }
    match lower.find("://") {
        Some(pos) if pos > 0 => lower[..pos].bytes().all(|b| b.is_ascii_alphabetic()),
        _ => false,
    }
}

/// Rewrite a single reference into distribution-root-relative form.
pub fn rewrite_relative_path(path: &str) -> String {
    if path.is_empty() || is_external_url(path) {
        return path.to_string();
    }

    // Root-relative: author said exactly where it lives
    if path.starts_with('/') {
        return path.to_string();
    }

    // Leading ../ runs escape the template directory; in the composed page
    // everything hangs off the distribution root
    if path.starts_with("../") {
        let mut rest = path;
        while let Some(stripped) = rest.strip_prefix("../") {
            rest = stripped;
        }
        return format!("./{rest}");
    }

    if !path.starts_with("./") {
        return format!("./{path}");
    }

    path.to_string()
}

/// Rewrite every URL-bearing attribute and CSS `url()` in the document.
pub fn rewrite_asset_paths(html: &str) -> String {
    let attrs_done = ATTR_URL_RE.replace_all(html, |caps: &Captures| {
        let prefix = &caps[1];
        let (quote, value) = match caps.get(2) {
            Some(value) => ('"', value.as_str()),
            None => ('\'', &caps[3]),
        };
        format!("{prefix}{quote}{}{quote}", rewrite_relative_path(value))
    });

    CSS_URL_RE
        .replace_all(&attrs_done, |caps: &Captures| {
            let (quote, value) = css_url_value(caps);
            format!("url({quote}{}{quote})", rewrite_relative_path(value))
        })
        .into_owned()
}

fn css_url_value<'a>(caps: &'a Captures) -> (&'static str, &'a str) {
    if let Some(value) = caps.get(1) {
        ("\"", value.as_str())
    } else if let Some(value) = caps.get(2) {
        ("'", value.as_str())
    } else {
        ("", &caps[3])
    }
}

/// Extract the unique local asset references from a document, in first
/// occurrence order. External URLs are excluded.
pub fn collect_asset_refs(html: &str) -> Vec<String> {
    let mut seen = HashSet::new();
    let mut refs = Vec::new();

    let attr_values = ATTR_URL_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(2).or_else(|| caps.get(3)))
        .map(|value| value.as_str());
    let css_values = CSS_URL_RE
        .captures_iter(html)
        .filter_map(|caps| caps.get(1).or_else(|| caps.get(2)).or_else(|| caps.get(3)))
        .map(|value| value.as_str());

    for value in attr_values.chain(css_values) {
        if value.is_empty() || is_external_url(value) {
            continue;
        }
        if seen.insert(value.to_string()) {
            refs.push(value.to_string());
        }
    }

    refs
}
