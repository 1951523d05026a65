//! Token supplier boundary
//!
//! Token acquisition and refresh are owned by the caller; the client only
//! needs something that yields a bearer token on demand.

use async_trait::async_trait;
use tessera_domain::Result;

/// Trait for providing access tokens
///
/// This trait allows dependency injection and testing with mock providers.
#[async_trait]
pub trait AccessTokenProvider: Send + Sync {
    /// Get a valid access token, optionally forcing a refresh.
    async fn access_token(&self, force_refresh: bool) -> Result<String>;
}

/// Provider that always yields the same token.
///
/// Useful for development against local services and in tests; anything
/// real should implement [`AccessTokenProvider`] over its own token
/// client.
#[derive(Debug, Clone)]
pub struct StaticTokenProvider {
    token: String,
}

impl StaticTokenProvider {
    pub fn new(token: impl Into<String>) -> Self {
        Self { token: token.into() }
    }
}

#[async_trait]
impl AccessTokenProvider for StaticTokenProvider {
    async fn access_token(&self, _force_refresh: bool) -> Result<String> {
        Ok(self.token.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_static_provider_yields_token() {
        let provider = StaticTokenProvider::new("test-token");
        assert_eq!(provider.access_token(false).await.unwrap(), "test-token");
        assert_eq!(provider.access_token(true).await.unwrap(), "test-token");
    }
}
