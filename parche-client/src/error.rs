//! Client error types

use std::time::Duration;

use thiserror::Error;

/// Message shown when every transport failed
pub const UNREACHABLE_MESSAGE: &str = "No se pudo conectar con el servidor";

/// Client error type
#[derive(Debug, Error)]
pub enum ClientError {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The API answered `success: false`; the message is the backend's own
    #[error("{0}")]
    Api(String),

    /// Invalid response format
    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    /// Callback never fired within the allotted time
    #[error("Callback timeout after {0:?}")]
    CallbackTimeout(Duration),

    /// Injected script could not be loaded or executed
    #[error("Script load error: {0}")]
    ScriptLoad(String),

    /// Every transport strategy failed
    #[error("{}", UNREACHABLE_MESSAGE)]
    Unreachable,

    /// Base URL could not be parsed
    #[error("Invalid URL: {0}")]
    InvalidUrl(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ClientError {
    /// Raised by the API itself rather than the network
    pub fn is_api(&self) -> bool {
        matches!(self, Self::Api(_))
    }
}

/// Result type for client operations
pub type ClientResult<T> = Result<T, ClientError>;
