//! HTTP client construction and configuration for GitHub interactions

use reqwest::blocking::Client;
use std::time::Duration;

/// Default timeout for GitHub requests (30 seconds)
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default user agent for mirrorkit requests
pub const USER_AGENT: &str = "mirrorkit";

/// Environment variable holding the optional API token
pub const TOKEN_ENV_VAR: &str = "github_api_token";

/// Configuration for the GitHub API client
///
/// All ambient process state (token environment variable, proxy) is
/// captured here at construction time so callers and tests can inject
/// their own values without touching the process environment.
#[derive(Debug, Clone)]
pub struct ApiConfig {
    /// Optional API token; when present, requests carry an
    /// `Authorization: token <value>` header
    pub token: Option<String>,

    /// Optional proxy URL applied to all requests; `None` keeps reqwest's
    /// default behavior (which honors `http_proxy`/`https_proxy`)
    pub proxy: Option<String>,

    /// Per-request timeout
    pub timeout: Duration,

    /// Log each transport attempt to stderr
    pub debug_requests: bool,

    /// Log rate-limit budget and ETag transitions to stderr
    pub debug_rate_limit: bool,
}

impl Default for ApiConfig {
    fn default() -> Self {
        ApiConfig {
            token: None,
            proxy: None,
            timeout: DEFAULT_TIMEOUT,
            debug_requests: false,
            debug_rate_limit: false,
        }
    }
}

impl ApiConfig {
    /// Builds a configuration from the process environment
    ///
    /// Reads the `github_api_token` variable; absence (or an empty value)
    /// simply leaves the token unset, it is not an error.
    pub fn from_env() -> Self {
        ApiConfig {
            token: std::env::var(TOKEN_ENV_VAR).ok().filter(|t| !t.is_empty()),
            ..Default::default()
        }
    }
}

/// Builds an HTTP client with appropriate settings for the GitHub API
///
/// # Errors
///
/// Returns error if the proxy URL is invalid or client construction fails
pub fn build_client(config: &ApiConfig) -> Result<Client, reqwest::Error> {
    let mut builder = Client::builder()
        .user_agent(USER_AGENT)
        .timeout(config.timeout);

    if let Some(proxy_url) = &config.proxy {
        builder = builder.proxy(reqwest::Proxy::all(proxy_url)?);
    }

    builder.build()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = ApiConfig::default();
        assert!(config.token.is_none());
        assert!(config.proxy.is_none());
        assert_eq!(config.timeout, DEFAULT_TIMEOUT);
        assert!(!config.debug_requests);
        assert!(!config.debug_rate_limit);
    }

    #[test]
    fn test_from_env_with_token() {
        mirrorkit_testkit::with_github_token(Some("s3cr3t"), || {
            let config = ApiConfig::from_env();
            assert_eq!(config.token.as_deref(), Some("s3cr3t"));
        });
    }

    #[test]
    fn test_from_env_without_token() {
        mirrorkit_testkit::with_github_token(None, || {
            let config = ApiConfig::from_env();
            assert!(config.token.is_none());
        });
    }

    #[test]
    fn test_from_env_empty_token_is_none() {
        mirrorkit_testkit::with_github_token(Some(""), || {
            let config = ApiConfig::from_env();
            assert!(config.token.is_none());
        });
    }

    #[test]
    fn test_build_client_default() {
        let client = build_client(&ApiConfig::default());
        assert!(client.is_ok());
    }

    #[test]
    fn test_build_client_with_proxy() {
        let config = ApiConfig {
            proxy: Some("http://127.0.0.1:8080".to_string()),
            ..Default::default()
        };
        assert!(build_client(&config).is_ok());
    }

    #[test]
    fn test_build_client_invalid_proxy() {
        let config = ApiConfig {
            proxy: Some("not a proxy url".to_string()),
            ..Default::default()
        };
        assert!(build_client(&config).is_err());
    }
}
