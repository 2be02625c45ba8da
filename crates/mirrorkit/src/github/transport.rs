//! Bounded-retry GET transport
//!
//! A thin wrapper around `reqwest::blocking` that retries a GET a fixed
//! number of times when the connection itself cannot be established.
//! Anything past connection establishment (HTTP status handling, body
//! decoding) is the caller's concern; protocol-level failures are never
//! retried here.

use reqwest::blocking::{Client, Response};

/// Retry budget for a single logical GET
///
/// A budget below 1 is clamped to 1 at use site; disabling retries
/// entirely is not expressible (the first attempt always runs).
#[derive(Debug, Clone, Copy)]
pub struct RetryPolicy {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
}

impl RetryPolicy {
    /// Creates a policy with the given attempt budget
    pub fn new(max_attempts: u32) -> Self {
        RetryPolicy { max_attempts }
    }

    /// Effective number of attempts (at least 1)
    pub fn attempts(&self) -> u32 {
        self.max_attempts.max(1)
    }
}

impl Default for RetryPolicy {
    /// Three attempts, matching the historical default of the mirror jobs
    fn default() -> Self {
        RetryPolicy { max_attempts: 3 }
    }
}

/// Performs a GET with bounded retry on connection-level failures
///
/// # Arguments
///
/// * `client` - HTTP client to use
/// * `url` - Target URL
/// * `params` - Query parameters appended to the URL
/// * `headers` - Extra request headers
/// * `policy` - Retry budget
/// * `debug` - Log each attempt to stderr
///
/// # Errors
///
/// Returns the last connection error once the budget is exhausted, or the
/// first non-retryable `reqwest::Error` immediately. The error is returned
/// unwrapped so callers can still distinguish network faults from protocol
/// faults via `reqwest::Error` inspection.
pub fn get_with_retries(
    client: &Client,
    url: &str,
    params: &[(&str, &str)],
    headers: &[(&str, String)],
    policy: RetryPolicy,
    debug: bool,
) -> Result<Response, reqwest::Error> {
    let attempts = policy.attempts();

    run_with_retries(attempts, |attempt| {
        if debug {
            eprintln!(
                "\tRequesting {}/{} url={} params={:?}",
                attempt, attempts, url, params
            );
        }

        let mut request = client.get(url).query(params);
        for (name, value) in headers {
            request = request.header(*name, value.as_str());
        }
        request.send()
    })
}

/// Runs `attempt_fn` up to `attempts` times, retrying only retryable errors
///
/// Generic over the success type so the retry loop is testable without a
/// live socket on every path.
fn run_with_retries<T>(
    attempts: u32,
    mut attempt_fn: impl FnMut(u32) -> Result<T, reqwest::Error>,
) -> Result<T, reqwest::Error> {
    let mut attempt = 1;
    loop {
        match attempt_fn(attempt) {
            Ok(value) => return Ok(value),
            Err(err) if is_retryable(&err) && attempt < attempts => attempt += 1,
            Err(err) => return Err(err),
        }
    }
}

/// Whether an error is worth another attempt
///
/// Only failures to establish the connection qualify; reqwest surfaces TLS
/// handshake failures through the connector, so they land here too. Every
/// other error class (timeouts mid-body, redirects, builder misuse) is
/// propagated as-is.
fn is_retryable(err: &reqwest::Error) -> bool {
    err.is_connect()
}
