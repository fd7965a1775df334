//! Direct fetch transport

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url, redirect};
use serde_json::Value;

use super::Transport;
use crate::ClientResult;

/// Plain GET, body parsed as JSON regardless of status
#[derive(Debug, Clone)]
pub struct FetchTransport {
    client: Client,
}

impl FetchTransport {
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        // Web app deployments answer through a redirect to the content host
        let client = Client::builder()
            .timeout(timeout)
            .redirect(redirect::Policy::limited(10))
            .build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Transport for FetchTransport {
    fn name(&self) -> &'static str {
        "fetch"
    }

    async fn call(&self, url: &Url) -> ClientResult<Value> {
        let response = self.client.get(url.clone()).send().await?;
        tracing::debug!(status = %response.status(), "Fetch response");
        let text = response.text().await?;
        Ok(serde_json::from_str(&text)?)
    }
}
