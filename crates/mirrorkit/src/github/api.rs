//! Conditional (ETag) GitHub API fetching
//!
//! Implements the conditional-GET pattern against the GitHub JSON API:
//! every request carries `If-None-Match`, every response must carry `ETag`,
//! and a `304 Not Modified` tells the caller its cached payload is still
//! valid without the API serving (or the rate limit charging for) a body.
//!
//! Rate-limit budget headers are extracted from every completed response
//! and reported outward through a [`RateLimitSink`]; what the sink does
//! with them is not this module's concern.

use std::sync::Arc;

use thiserror::Error;

use crate::github::client::{self, ApiConfig};
use crate::github::transport::{self, RetryPolicy};
use crate::report::{RateLimitSink, RateLimitSnapshot};

/// Outcome of a conditional fetch
#[derive(Debug, Clone, PartialEq)]
pub enum FetchResult {
    /// The resource did not change; the caller's cached payload is valid
    Unchanged {
        /// Normalized validator for the next conditional request
        etag: String,
    },

    /// The resource changed (or was fetched for the first time)
    Updated {
        /// Parsed JSON response body
        data: serde_json::Value,
        /// Normalized validator for the next conditional request
        etag: String,
    },
}

impl FetchResult {
    /// The normalized ETag carried by either variant
    pub fn etag(&self) -> &str {
        match self {
            FetchResult::Unchanged { etag } => etag,
            FetchResult::Updated { etag, .. } => etag,
        }
    }
}

/// Conditional fetch errors
///
/// Network faults keep their original `reqwest::Error` so callers can
/// distinguish them from protocol-contract violations, which are never
/// retried.
#[derive(Debug, Error)]
pub enum ApiError {
    /// Connection-level failure after the retry budget was exhausted, or
    /// any other transport error
    #[error("network error: {0}")]
    Network(#[from] reqwest::Error),

    /// The response carried no `ETag` header, violating the API contract
    #[error("no ETag in response: url={url} status={status}")]
    MissingEtag {
        /// Request URL
        url: String,
        /// Response status code
        status: u16,
        /// Raw response body, for diagnosis
        body: String,
    },

    /// Status code outside the conditional-GET contract ({200, 304})
    #[error("unexpected status code {status}: {body}")]
    UnexpectedStatus {
        /// Response status code
        status: u16,
        /// Raw response body, for diagnosis
        body: String,
    },

    /// A 200 response whose body is not valid JSON
    #[error("invalid JSON in response body: {0}")]
    InvalidJson(#[from] serde_json::Error),
}

/// Strips the weak-validator marker from an ETag
///
/// Some responses prepend `W/` to the validator. The prefix flips on and
/// off over time without the content changing, so it is removed before the
/// value is stored or compared.
pub fn normalize_etag(etag: &str) -> String {
    etag.strip_prefix("W/").unwrap_or(etag).to_string()
}

/// GitHub API client with conditional-GET support
///
/// Owns a blocking HTTP client built from an [`ApiConfig`] and a
/// [`RateLimitSink`] that receives the remaining/limit budget observed on
/// every completed request. Calls are independent; the client is safe to
/// share across threads.
pub struct GithubApiClient {
    client: reqwest::blocking::Client,
    config: ApiConfig,
    sink: Arc<dyn RateLimitSink>,
}

impl GithubApiClient {
    /// Creates a client from explicit configuration
    ///
    /// # Errors
    ///
    /// Returns error if the underlying HTTP client cannot be constructed
    /// (e.g. invalid proxy URL).
    pub fn new(config: ApiConfig, sink: Arc<dyn RateLimitSink>) -> Result<Self, reqwest::Error> {
        let client = client::build_client(&config)?;
        Ok(GithubApiClient {
            client,
            config,
            sink,
        })
    }

    /// Fetches a JSON resource conditionally
    ///
    /// # Arguments
    ///
    /// * `url` - API URL to fetch
    /// * `etag` - Last known validator; empty string means "no cached value"
    /// * `params` - Query parameters
    /// * `policy` - Retry budget for connection-level failures
    ///
    /// # Returns
    ///
    /// [`FetchResult::Unchanged`] on `304 Not Modified`, otherwise
    /// [`FetchResult::Updated`] with the parsed body. The returned ETag is
    /// always normalized.
    ///
    /// # Errors
    ///
    /// * [`ApiError::Network`] after the retry budget is exhausted
    /// * [`ApiError::MissingEtag`] when the response lacks the header
    /// * [`ApiError::UnexpectedStatus`] for statuses outside {200, 304}
    /// * [`ApiError::InvalidJson`] when a 200 body fails to parse
    pub fn fetch(
        &self,
        url: &str,
        etag: &str,
        params: &[(&str, &str)],
        policy: RetryPolicy,
    ) -> Result<FetchResult, ApiError> {
        let mut headers: Vec<(&str, String)> = vec![("If-None-Match", etag.to_string())];
        if let Some(token) = &self.config.token {
            headers.push(("Authorization", format!("token {}", token)));
        }

        let response = transport::get_with_retries(
            &self.client,
            url,
            params,
            &headers,
            policy,
            self.config.debug_requests,
        )?;
        let status = response.status().as_u16();

        // The API always emits an ETag; its absence means we are not
        // talking to what we think we are. Log everything before failing
        // so the contract violation can be escalated.
        let Some(raw_etag) = header_value(&response, "ETag") else {
            let body = response.text().unwrap_or_default();
            eprintln!(
                "No ETag in response! url={} params={:?} status_code={} content={}",
                url, params, status, body
            );
            return Err(ApiError::MissingEtag {
                url: url.to_string(),
                status,
                body,
            });
        };

        if let Some(snapshot) = rate_limit_snapshot(&response) {
            self.sink.record(snapshot);
            if self.config.debug_rate_limit {
                eprintln!("\tRateLimit: {}/{}", snapshot.remaining, snapshot.limit);
                eprintln!(
                    "\tETag: {} -> {}, url={} params={:?}",
                    etag, raw_etag, url, params
                );
            }
        }

        let new_etag = normalize_etag(&raw_etag);

        if status == 304 {
            // Cached payload still valid; the body is not read at all.
            return Ok(FetchResult::Unchanged { etag: new_etag });
        }
        if status != 200 {
            let body = response.text().unwrap_or_default();
            return Err(ApiError::UnexpectedStatus { status, body });
        }

        let body = response.text()?;
        let data: serde_json::Value = serde_json::from_str(&body)?;
        Ok(FetchResult::Updated {
            data,
            etag: new_etag,
        })
    }
}

/// Reads a response header as an owned string, if present and valid UTF-8
fn header_value(response: &reqwest::blocking::Response, name: &str) -> Option<String> {
    response
        .headers()
        .get(name)
        .and_then(|value| value.to_str().ok())
        .map(|value| value.to_string())
}

/// Extracts the rate-limit budget from response headers
///
/// Returns `None` when either header is missing or unparseable; reporting
/// is then skipped for this response.
fn rate_limit_snapshot(response: &reqwest::blocking::Response) -> Option<RateLimitSnapshot> {
    let remaining = header_value(response, "X-RateLimit-Remaining")?.parse().ok()?;
    let limit = header_value(response, "X-RateLimit-Limit")?.parse().ok()?;
    Some(RateLimitSnapshot { remaining, limit })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_etag_strips_weak_marker() {
        assert_eq!(normalize_etag("W/\"abc123\""), "\"abc123\"");
    }

    #[test]
    fn test_normalize_etag_keeps_strong_validator() {
        assert_eq!(normalize_etag("\"abc123\""), "\"abc123\"");
    }

    #[test]
    fn test_normalize_etag_strips_only_leading_marker() {
        assert_eq!(normalize_etag("W/W/\"x\""), "W/\"x\"");
        assert_eq!(normalize_etag("\"W/x\""), "\"W/x\"");
    }

    #[test]
    fn test_normalize_etag_empty() {
        assert_eq!(normalize_etag(""), "");
    }

    #[test]
    fn test_fetch_result_etag_accessor() {
        let unchanged = FetchResult::Unchanged {
            etag: "\"a\"".to_string(),
        };
        let updated = FetchResult::Updated {
            data: serde_json::json!({}),
            etag: "\"b\"".to_string(),
        };
        assert_eq!(unchanged.etag(), "\"a\"");
        assert_eq!(updated.etag(), "\"b\"");
    }
}
