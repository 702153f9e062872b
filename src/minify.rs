//! Textual HTML minification.
//!
//! Three fixed rules, applied in order:
//!
//! 1. strip HTML comments, keeping `<!--[if` conditional comments,
//! 2. collapse whitespace between tags (`>   <` becomes `><`),
//! 3. collapse runs of 2+ whitespace characters to a single space, then trim.
//!
//! This is intentionally a blunt instrument — good enough for vendor-exported
//! marketing pages, not a general-purpose HTML minifier.

use regex::Regex;
use std::sync::LazyLock;

static INTER_TAG_WS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r">\s+<").expect("invalid inter-tag regex"));

static WS_RUN_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\s{2,}").expect("invalid whitespace regex"));

/// Minify the composed document.
pub fn minify_html(html: &str) -> String {
    let stripped = strip_comments(html);
    let collapsed = INTER_TAG_WS_RE.replace_all(&stripped, "><");
    WS_RUN_RE.replace_all(&collapsed, " ").trim().to_string()
}

/// Remove `<!-- ... -->` comments, preserving `<!--[if` conditional comments
/// and any unterminated trailing comment.
fn strip_comments(html: &str) -> String {
    let mut out = String::with_capacity(html.len());
    let mut rest = html;

    while let Some(start) = rest.find("<!--") {
        out.push_str(&rest[..start]);
        let body = &rest[start + 4..];

        match body.find("-->") {
            Some(end) if body.starts_with("[if") => {
                out.push_str(&rest[start..start + 4 + end + 3]);
                rest = &body[end + 3..];
            }
            Some(end) => {
                rest = &body[end + 3..];
            }
            None => {
                // Unterminated comment: keep it as written
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }

    out.push_str(rest);
    out
}
