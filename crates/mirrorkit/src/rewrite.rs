//! Markdown link rewriting for mirror serving
//!
//! A document written for a repository browser refers to its neighbors
//! with relative paths. Served from a mirror site those paths dangle, so
//! every relative target is rebased: images onto the raw-content base URL
//! (they must resolve to bytes), links onto the repository base URL (they
//! must resolve to a browsable page). Everything already absolute, empty
//! or fragment-only is left alone.
//!
//! The pipeline is parse → rewrite → re-serialize over the mdast tree,
//! executed under a process-wide lock: the renderer is shared and not
//! reentrant across independent documents, so exactly one rewrite runs at
//! a time. The lock guards bounded local work only, no I/O.

use std::sync::Mutex;

use markdown::mdast::Node;
use thiserror::Error;

/// One rewrite at a time, process-wide. Scoped guard, released on every
/// exit path including panics (with poison recovery).
static RENDERER_LOCK: Mutex<()> = Mutex::new(());

/// Classification of a single URL string
///
/// Only [`UrlClass::RelativePath`] targets are rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UrlClass {
    /// Already absolute (`scheme://…`, ASCII word-character scheme)
    SchemeQualified,
    /// In-document fragment (`#…`)
    FragmentOnly,
    /// Empty string or exactly `.`
    EmptyOrCurrent,
    /// Anything else: a relative path that needs rebasing
    RelativePath,
}

/// Classifies a URL for the rewrite rule
///
/// # Examples
///
/// ```
/// use mirrorkit::{UrlClass, classify_url};
///
/// assert_eq!(classify_url("https://example.com/x"), UrlClass::SchemeQualified);
/// assert_eq!(classify_url("#section"), UrlClass::FragmentOnly);
/// assert_eq!(classify_url(""), UrlClass::EmptyOrCurrent);
/// assert_eq!(classify_url("docs/readme.md"), UrlClass::RelativePath);
/// ```
pub fn classify_url(url: &str) -> UrlClass {
    if is_scheme_qualified(url) {
        return UrlClass::SchemeQualified;
    }
    if url.is_empty() || url == "." {
        return UrlClass::EmptyOrCurrent;
    }
    if url.starts_with('#') {
        return UrlClass::FragmentOnly;
    }
    UrlClass::RelativePath
}

/// Matches `^\w+://` with ASCII word characters
fn is_scheme_qualified(url: &str) -> bool {
    match url.split_once("://") {
        Some((scheme, _)) => {
            !scheme.is_empty()
                && scheme
                    .chars()
                    .all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        None => false,
    }
}

/// Markdown rewrite errors
#[derive(Debug, Error)]
pub enum RewriteError {
    /// The document could not be parsed
    #[error("Markdown parsing failed: {0}")]
    Parse(String),

    /// The rewritten tree could not be serialized back to Markdown
    #[error("Markdown rendering failed: {0}")]
    Render(String),
}

/// Rewrites relative link and image targets for mirror serving
///
/// # Arguments
///
/// * `content` - Markdown document (UTF-8; CRLF line endings normalized)
/// * `repos_url` - Base URL for browsable pages (links)
/// * `raw_url` - Base URL for raw content bytes (images)
/// * `verbose` - Log each performed rewrite (old → new) to stderr
///
/// # Returns
///
/// The re-serialized document with every relative target rebased. Targets
/// classified as scheme-qualified, fragment-only, empty or `.` are left
/// untouched, which also makes the transformation idempotent.
///
/// # Errors
///
/// Well-formed input does not fail; parser or renderer refusals are
/// surfaced as [`RewriteError`] without reinterpretation.
pub fn rewrite_markdown(
    content: &str,
    repos_url: &str,
    raw_url: &str,
    verbose: bool,
) -> Result<String, RewriteError> {
    let repos_url = repos_url.trim_end_matches('/');
    let raw_url = raw_url.trim_end_matches('/');
    let content = content.replace("\r\n", "\n");

    let _guard = RENDERER_LOCK
        .lock()
        .unwrap_or_else(|poisoned| poisoned.into_inner());

    let mut tree = markdown::to_mdast(&content, &markdown::ParseOptions::default())
        .map_err(|e| RewriteError::Parse(e.to_string()))?;

    rewrite_node(&mut tree, repos_url, raw_url, verbose);

    mdast_util_to_markdown::to_markdown(&tree).map_err(|e| RewriteError::Render(e.to_string()))
}

/// Depth-first traversal dispatching on node kind
fn rewrite_node(node: &mut Node, repos_url: &str, raw_url: &str, verbose: bool) {
    match node {
        // Images must resolve to raw content bytes, links to a browsable
        // page; reference-style definitions hold link targets too.
        Node::Image(image) => rewrite_url(&mut image.url, raw_url, verbose),
        Node::Link(link) => rewrite_url(&mut link.url, repos_url, verbose),
        Node::Definition(definition) => rewrite_url(&mut definition.url, repos_url, verbose),
        _ => {}
    }

    if let Some(children) = node.children_mut() {
        for child in children {
            rewrite_node(child, repos_url, raw_url, verbose);
        }
    }
}

/// Rebase a single target if (and only if) it is a relative path
fn rewrite_url(url: &mut String, base: &str, verbose: bool) {
    match classify_url(url) {
        UrlClass::SchemeQualified | UrlClass::FragmentOnly | UrlClass::EmptyOrCurrent => {}
        UrlClass::RelativePath => {
            let new_url = format!("{}/{}", base, url);
            if verbose {
                eprintln!("URL rewritten: {:?} -> {:?}", url, new_url);
            }
            *url = new_url;
        }
    }
}
