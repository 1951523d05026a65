//! Client configuration

use std::time::Duration;

use url::Url;

/// API version sent with every request when none is configured.
pub const DEFAULT_API_VERSION: &str = "2019-09-01";

/// Header used for the API subscription key when none is configured.
pub const DEFAULT_API_KEY_HEADER: &str = "Subscription-Key";

/// Configuration for the IAM client.
#[derive(Debug, Clone)]
pub struct IamClientConfig {
    /// Base URL of the IAM API endpoint.
    pub base_url: Url,
    /// Value of the `api-version` query parameter appended to every request.
    pub api_version: String,
    /// API subscription key; the key header is omitted entirely when unset.
    pub api_key: Option<String>,
    /// Header name carrying the subscription key.
    pub api_key_header: String,
    /// Timeout applied to the underlying HTTP client.
    pub timeout: Duration,
    /// Optional User-Agent for outgoing requests.
    pub user_agent: Option<String>,
}

impl IamClientConfig {
    /// Configuration with defaults for everything but the endpoint.
    ///
    /// The base URL is normalized to a trailing slash so relative
    /// operation paths append instead of replacing the last segment.
    pub fn new(base_url: Url) -> Self {
        Self {
            base_url: ensure_trailing_slash(base_url),
            api_version: DEFAULT_API_VERSION.to_string(),
            api_key: None,
            api_key_header: DEFAULT_API_KEY_HEADER.to_string(),
            timeout: Duration::from_secs(30),
            user_agent: None,
        }
    }
}

fn ensure_trailing_slash(mut url: Url) -> Url {
    if !url.path().ends_with('/') {
        let path = format!("{}/", url.path());
        url.set_path(&path);
    }
    url
}
