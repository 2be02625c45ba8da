//! GitHub API interaction utilities
//!
//! This module provides the HTTP-facing half of the toolkit:
//! - HTTP client construction with user-agent, timeout and proxy settings
//! - Bounded-retry GET transport for connection-level failures
//! - Conditional (ETag) API fetching with rate-limit reporting

pub mod api;
pub mod client;
pub mod transport;

// Re-exports for convenient access
pub use api::{ApiError, FetchResult, GithubApiClient, normalize_etag};
pub use client::{ApiConfig, DEFAULT_TIMEOUT, TOKEN_ENV_VAR, USER_AGENT, build_client};
pub use transport::{RetryPolicy, get_with_retries};
