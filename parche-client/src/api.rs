//! Ratings API client
//!
//! Every operation is a GET against the configured web app URL with an
//! `action` query parameter. Responses are normalized through
//! [`ApiEnvelope`]; a `success: false` answer becomes [`ClientError::Api`].

use std::sync::Arc;
use std::time::Duration;

use reqwest::Url;
use shared::{ApiEnvelope, RatingSubmission, SiteConfig, SiteSummary};

use crate::transport::{CallbackTransport, FallbackTransport, FetchTransport, Transport};
use crate::{ClientConfig, ClientError, ClientResult};

const DEFAULT_ERROR: &str = "Error desconocido";
const SAVE_ERROR: &str = "Error al guardar";

/// Client for the `getConfig` / `getSedes` / `saveRating` actions
#[derive(Debug, Clone)]
pub struct ApiClient {
    base_url: Url,
    transport: Arc<dyn Transport>,
}

impl ApiClient {
    /// Create a client using the callback transport with fetch fallback
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let callback = CallbackTransport::http(config.callback_timeout)?;
        let fetch = FetchTransport::new(Duration::from_secs(config.timeout))?;
        let transport = FallbackTransport::standard(callback, fetch);
        Self::with_transport(&config.base_url, Arc::new(transport))
    }

    /// Create a client over an arbitrary transport
    pub fn with_transport(base_url: &str, transport: Arc<dyn Transport>) -> ClientResult<Self> {
        let base_url = Url::parse(base_url).map_err(|e| ClientError::InvalidUrl(e.to_string()))?;
        Ok(Self {
            base_url,
            transport,
        })
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn transport(&self) -> &Arc<dyn Transport> {
        &self.transport
    }

    /// Build `<base>?action=<action>&k=v...`
    pub fn action_url<K, V>(&self, action: &str, params: &[(K, V)]) -> Url
    where
        K: AsRef<str>,
        V: AsRef<str>,
    {
        let mut url = self.base_url.clone();
        {
            let mut query = url.query_pairs_mut();
            query.append_pair("action", action);
            for (key, value) in params {
                query.append_pair(key.as_ref(), value.as_ref());
            }
        }
        url
    }

    async fn request(&self, url: Url, default_error: &str) -> ClientResult<ApiEnvelope> {
        let value = self.transport.call(&url).await?;
        let envelope = ApiEnvelope::from_value(value)
            .map_err(|e| ClientError::InvalidResponse(e.to_string()))?;
        envelope.into_result(default_error).map_err(ClientError::Api)
    }

    // ========== Site API ==========

    /// Fetch branding and survey policy for one site
    pub async fn fetch_config(&self, site_id: &str) -> ClientResult<SiteConfig> {
        let url = self.action_url("getConfig", &[("codigo_pv", site_id)]);
        tracing::debug!(%url, "Fetching config");

        let mut envelope = self.request(url, DEFAULT_ERROR).await?;
        envelope
            .take::<SiteConfig>("config")
            .map_err(|e| ClientError::InvalidResponse(format!("config: {e}")))
    }

    /// Fetch the list of selectable sites
    pub async fn fetch_sites(&self) -> ClientResult<Vec<SiteSummary>> {
        let url = self.action_url::<&str, &str>("getSedes", &[]);
        tracing::debug!(%url, "Fetching sedes");

        let mut envelope = self.request(url, DEFAULT_ERROR).await?;
        envelope
            .take::<Vec<SiteSummary>>("sedes")
            .map_err(|e| ClientError::InvalidResponse(format!("sedes: {e}")))
    }

    // ========== Rating API ==========

    /// Submit one completed survey
    pub async fn save_rating(&self, submission: &RatingSubmission) -> ClientResult<ApiEnvelope> {
        tracing::debug!(?submission, "Submitting rating");
        let url = self.action_url("saveRating", &submission.query_pairs());
        self.request(url, SAVE_ERROR).await
    }
}
