//! Client configuration

use std::time::Duration;

use crate::{ApiClient, ClientResult};

/// Default wait for a callback-style response
pub const DEFAULT_CALLBACK_TIMEOUT: Duration = Duration::from_secs(12);

/// Client configuration for the ratings API
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// API base URL (the published web app endpoint)
    pub base_url: String,

    /// How long the callback transport waits before giving up
    pub callback_timeout: Duration,

    /// Request timeout in seconds for the direct fetch transport
    pub timeout: u64,
}

impl ClientConfig {
    /// Create a new client configuration
    pub fn new(base_url: impl Into<String>) -> Self {
        Self {
            base_url: base_url.into(),
            callback_timeout: DEFAULT_CALLBACK_TIMEOUT,
            timeout: 30,
        }
    }

    /// Set the callback transport timeout
    pub fn with_callback_timeout(mut self, timeout: Duration) -> Self {
        self.callback_timeout = timeout;
        self
    }

    /// Set the fetch request timeout
    pub fn with_timeout(mut self, seconds: u64) -> Self {
        self.timeout = seconds;
        self
    }

    /// Create an API client using the default transport chain
    pub fn build_api_client(&self) -> ClientResult<ApiClient> {
        ApiClient::new(self)
    }
}
