//! # sitefuse
//!
//! A small static-site build tool that composes a deployable HTML page from a
//! root template plus `<!-- INCLUDE: ref -->` partials, then mirrors every
//! asset the page references into a distribution directory.
//!
//! # Architecture: One Sequential Pipeline
//!
//! A build is a straight line of pure text transforms bookended by
//! filesystem work:
//!
//! ```text
//! 1. Copy      legacy/vendor files and bulk dirs  →  dist/
//! 2. Expand    entry template + includes          →  one flattened document
//! 3. Rewrite   relative URLs                      →  dist-root-relative form
//! 4. Minify    (optional)                         →  compact document
//! 5. Map       (optional)                         →  provenance JSON artifact
//! 6. Copy      referenced assets                  →  dist/, mirroring paths
//! 7. Write     the composed page                  →  dist/index.html
//! ```
//!
//! The interesting part is step 2: include expansion is recursive with an
//! ordered ancestor trace for cycle detection and a shared provenance list
//! recording where every fragment came from. The rest is deliberately plain —
//! no concurrency, no retries, no partial recovery. A fatal error (missing
//! entry template, unresolvable include, include cycle) aborts the build; a
//! missing referenced asset is only ever a warning.
//!
//! # Module Map
//!
//! | Module | Role |
//! |--------|------|
//! | [`build`] | Orchestrator — sequences the pipeline, owns [`build::BuildStats`], emits the provenance map |
//! | [`include`] | Recursive include expansion with cycle detection and provenance |
//! | [`resolve`] | Maps include/asset references to source-tree locations |
//! | [`rewrite`] | Pure URL rewriting in attributes and CSS `url()`, plus reference extraction |
//! | [`minify`] | Fixed-rule textual HTML minification |
//! | [`assets`] | Copies referenced, legacy, and bulk assets into the distribution tree |
//! | [`config`] | `sitefuse.toml` loading with stock defaults |
//! | [`paths`] | Resolved directory layout and root-relative display |
//! | [`output`] | CLI output formatting — pure `format_*` plus `print_*` wrappers |
//!
//! # Design Decisions
//!
//! ## Textual Composition, Not a Template Engine
//!
//! Includes are literal text substitution. The input pages are vendor
//! exports, not hand-maintained templates; there is nothing to interpolate,
//! so a template language would only add a runtime to get out of sync with.
//! One regex scan per document, recursion per fragment, done.
//!
//! ## Ancestor Trace, Not a Visited Set
//!
//! Cycle detection walks an ordered stack of ancestors. A global visited set
//! would reject the legitimate case of the same fragment appearing in two
//! sibling branches; only a true ancestor repeat is a cycle, and the stack
//! doubles as the diagnostic chain printed to the user.
//!
//! ## Missing Assets Never Fail the Build
//!
//! Marketing pages accumulate dead references. The build copies what exists,
//! reports what does not, and exits zero — a broken image is a content
//! problem, not a build problem. Unresolvable *includes* are the opposite:
//! the page cannot be composed without them, so they abort.

pub mod assets;
pub mod build;
pub mod config;
pub mod include;
pub mod minify;
pub mod output;
pub mod paths;
pub mod resolve;
pub mod rewrite;
