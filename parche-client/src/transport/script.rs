//! Script loading for the callback transport
//!
//! The backend answers callback-style requests with a script body of the
//! form `cb_123_abcde({...});`. Loading the script and executing it is
//! modelled as fetching that body and decoding the single invocation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, Url};
use serde_json::Value;

use crate::{ClientError, ClientResult};

/// Loads the body of an injected script
#[async_trait]
pub trait ScriptLoader: Send + Sync + std::fmt::Debug {
    async fn load(&self, src: &Url) -> ClientResult<String>;
}

/// Loads scripts over HTTP with reqwest
#[derive(Debug, Clone)]
pub struct HttpScriptLoader {
    client: Client,
}

impl HttpScriptLoader {
    pub fn new(timeout: Duration) -> ClientResult<Self> {
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }

    pub fn with_client(client: Client) -> Self {
        Self { client }
    }
}

#[async_trait]
impl ScriptLoader for HttpScriptLoader {
    async fn load(&self, src: &Url) -> ClientResult<String> {
        let response = self.client.get(src.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            // A <script> element fires `error` on non-2xx answers
            return Err(ClientError::ScriptLoad(format!("HTTP {status}")));
        }
        Ok(response.text().await?)
    }
}

/// One decoded `callback(payload)` call
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptInvocation {
    pub callback: String,
    pub payload: Value,
}

impl ScriptInvocation {
    pub fn parse(body: &str) -> ClientResult<Self> {
        let body = body.trim();
        let body = body.strip_prefix("/**/").unwrap_or(body).trim_start();

        let open = body
            .find('(')
            .ok_or_else(|| ClientError::ScriptLoad("script does not call a function".into()))?;
        let callback = body[..open].trim();
        if !is_identifier(callback) {
            return Err(ClientError::ScriptLoad(format!(
                "invalid callback name: {callback:?}"
            )));
        }

        let rest = body[open + 1..].trim_end();
        let rest = rest.strip_suffix(';').unwrap_or(rest).trim_end();
        let args = rest
            .strip_suffix(')')
            .ok_or_else(|| ClientError::ScriptLoad("unterminated callback call".into()))?;

        let payload = serde_json::from_str(args)?;
        Ok(Self {
            callback: callback.to_string(),
            payload,
        })
    }
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_' || c == '$')
}
