//! Transport strategies
//!
//! A [`Transport`] turns a fully built API URL into the decoded JSON body.
//! The default chain tries the callback-style transport first and falls
//! back to a direct fetch.

mod callback;
mod fetch;
mod script;

pub use callback::{CallbackRegistry, CallbackTransport, callback_name};
pub use fetch::FetchTransport;
pub use script::{HttpScriptLoader, ScriptInvocation, ScriptLoader};

use std::sync::Arc;

use async_trait::async_trait;
use reqwest::Url;
use serde_json::Value;

use crate::{ClientError, ClientResult};

/// Transport abstraction for API calls
#[async_trait]
pub trait Transport: Send + Sync + std::fmt::Debug {
    /// Short name used in logs
    fn name(&self) -> &'static str;

    async fn call(&self, url: &Url) -> ClientResult<Value>;
}

/// Tries each strategy in order and returns the first success
#[derive(Debug, Clone)]
pub struct FallbackTransport {
    strategies: Vec<Arc<dyn Transport>>,
}

impl FallbackTransport {
    pub fn new(strategies: Vec<Arc<dyn Transport>>) -> Self {
        Self { strategies }
    }

    /// Callback transport first, then direct fetch
    pub fn standard(callback: CallbackTransport, fetch: FetchTransport) -> Self {
        let strategies: Vec<Arc<dyn Transport>> = vec![Arc::new(callback), Arc::new(fetch)];
        Self::new(strategies)
    }

    pub fn strategies(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.strategies.iter().map(|s| s.name())
    }
}

#[async_trait]
impl Transport for FallbackTransport {
    fn name(&self) -> &'static str {
        "fallback"
    }

    async fn call(&self, url: &Url) -> ClientResult<Value> {
        for strategy in &self.strategies {
            tracing::debug!(transport = strategy.name(), "Trying transport");
            match strategy.call(url).await {
                Ok(value) => return Ok(value),
                Err(e) => {
                    tracing::warn!(transport = strategy.name(), error = %e, "Transport failed");
                }
            }
        }
        Err(ClientError::Unreachable)
    }
}
