//! Mirroring-support toolkit for serving a GitHub-hosted catalogue from a
//! mirror site.
//!
//! # Architecture
//!
//! The crate has two independent cores and a set of small collaborators
//! around them:
//!
//! - [`github`]: conditional (ETag) fetching of GitHub API JSON with
//!   bounded retry on connection failures and rate-limit reporting
//! - [`rewrite`]: rewriting of relative link/image targets inside a
//!   Markdown document so it renders correctly when served from a mirror
//! - [`storage`]: JSON/text file persistence with gzip side-writing
//! - [`report`]: rate-limit reporting seam ([`RateLimitSink`])
//! - [`text`]: string trimming, Markdown escaping and byte-size formatting
//!
//! The two cores never call each other; callers drive them separately.
//!
//! # Examples
//!
//! ## Conditional API fetch
//!
//! ```no_run
//! use std::sync::Arc;
//! use mirrorkit::{ApiConfig, FetchResult, GithubApiClient, RateLimitTracker, RetryPolicy};
//!
//! # fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let tracker = Arc::new(RateLimitTracker::new());
//! let client = GithubApiClient::new(ApiConfig::from_env(), tracker.clone())?;
//!
//! let result = client.fetch(
//!     "https://api.github.com/repos/octocat/hello-world",
//!     "",
//!     &[],
//!     RetryPolicy::default(),
//! )?;
//!
//! match result {
//!     FetchResult::Unchanged { etag } => println!("cached copy still valid ({etag})"),
//!     FetchResult::Updated { data, etag } => println!("fresh data ({etag}): {data}"),
//! }
//! # Ok(())
//! # }
//! ```
//!
//! ## Markdown rewriting
//!
//! ```
//! use mirrorkit::rewrite_markdown;
//!
//! let output = rewrite_markdown(
//!     "![logo](logo.png)\n\n[docs](readme.md)\n",
//!     "https://example.com/repos",
//!     "https://example.com/raw",
//!     false,
//! ).unwrap();
//!
//! assert!(output.contains("https://example.com/raw/logo.png"));
//! assert!(output.contains("https://example.com/repos/readme.md"));
//! ```

pub mod github;
pub mod report;
pub mod rewrite;
pub mod storage;
pub mod text;

// Re-export commonly used types
pub use github::api::{ApiError, FetchResult, GithubApiClient};
pub use github::client::{ApiConfig, DEFAULT_TIMEOUT, USER_AGENT};
pub use github::transport::RetryPolicy;
pub use report::{RateLimitSink, RateLimitSnapshot, RateLimitTracker};
pub use rewrite::{RewriteError, UrlClass, classify_url, rewrite_markdown};
pub use storage::{SaveOptions, StorageError, load_json, save_json};
