//! HTTP client for the analysis service.
//!
//! Sends `POST {base_url}/analyze-url` with a JSON body and decodes the
//! JSON result. Any non-2xx status is a failure; the status-specific
//! detail is only kept for diagnostics.

use crate::client::AnalysisService;
use crate::error::RequestFailure;
use crate::models::{AnalysisRequest, AnalysisResult};
use async_trait::async_trait;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, info};

/// Path of the analysis endpoint, relative to the base URL.
pub const ANALYZE_PATH: &str = "/analyze-url";

/// Configuration for the HTTP client.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// Base address of the service, e.g. `http://127.0.0.1:8000`.
    pub base_url: String,
    /// Request timeout. `None` waits indefinitely.
    pub timeout_seconds: Option<u64>,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            base_url: "http://127.0.0.1:8000".to_string(),
            timeout_seconds: None,
        }
    }
}

/// Body of the service's root endpoint.
#[derive(Debug, Deserialize)]
struct HealthResponse {
    #[serde(default)]
    message: Option<String>,
}

/// reqwest-backed [`AnalysisService`].
pub struct HttpAnalysisClient {
    config: ClientConfig,
    http_client: reqwest::Client,
}

impl HttpAnalysisClient {
    /// Create a client for the configured service.
    pub fn new(config: ClientConfig) -> Result<Self, RequestFailure> {
        info!("Using analysis service at {}", config.base_url);

        let mut builder = reqwest::Client::builder();
        if let Some(secs) = config.timeout_seconds {
            builder = builder.timeout(Duration::from_secs(secs));
        }
        let http_client = builder.build()?;

        Ok(Self {
            config,
            http_client,
        })
    }

    /// Full URL of an endpoint path.
    fn endpoint(&self, path: &str) -> String {
        format!("{}{}", self.config.base_url.trim_end_matches('/'), path)
    }

    /// Probe the service root. Returns the status message it reports, if any.
    pub async fn health_check(&self) -> Result<Option<String>, RequestFailure> {
        let url = self.endpoint("/");
        debug!("GET {}", url);

        let response = self.http_client.get(&url).send().await?;
        let status = response.status();
        let body = response.text().await?;

        if !status.is_success() {
            return Err(RequestFailure::Status { status, body });
        }

        // A 2xx with an unexpected body still counts as healthy.
        Ok(serde_json::from_str::<HealthResponse>(&body)
            .ok()
            .and_then(|h| h.message))
    }
}

#[async_trait]
impl AnalysisService for HttpAnalysisClient {
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, RequestFailure> {
        let url = self.endpoint(ANALYZE_PATH);
        debug!("POST {} (language: {})", url, request.language);

        let response = self.http_client.post(&url).json(request).send().await?;

        let status = response.status();
        debug!("Analysis service responded with {}", status);

        let body = response.text().await?;
        if !status.is_success() {
            return Err(RequestFailure::Status { status, body });
        }

        let result: AnalysisResult = serde_json::from_str(&body)?;
        Ok(result)
    }
}
