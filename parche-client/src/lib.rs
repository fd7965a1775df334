//! Parche Client - client for the ratings API
//!
//! Provides the callback-style (JSONP) and direct fetch transports and the
//! typed `getConfig` / `getSedes` / `saveRating` calls on top of them.

pub mod api;
pub mod config;
pub mod error;
pub mod transport;

pub use api::ApiClient;
pub use config::{ClientConfig, DEFAULT_CALLBACK_TIMEOUT};
pub use error::{ClientError, ClientResult};
pub use transport::{
    CallbackRegistry, CallbackTransport, FallbackTransport, FetchTransport, HttpScriptLoader,
    ScriptInvocation, ScriptLoader, Transport,
};

// Re-export shared types for convenience
pub use reqwest::Url;
pub use shared::{
    ApiEnvelope, Category, Rating, RatingSubmission, SiteConfig, SiteSummary, TablePolicy,
};
