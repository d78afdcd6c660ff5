//! Analysis service clients.
//!
//! The controller talks to the service through the [`AnalysisService`]
//! trait so it can be driven by the HTTP client in production and by an
//! in-memory double in tests.

pub mod http;

use crate::error::RequestFailure;
use crate::models::{AnalysisRequest, AnalysisResult};
use async_trait::async_trait;

pub use http::{ClientConfig, HttpAnalysisClient};

/// Something that can analyze a URL.
#[async_trait]
pub trait AnalysisService: Send + Sync {
    /// Submit one request and wait for the full result.
    async fn analyze(&self, request: &AnalysisRequest) -> Result<AnalysisResult, RequestFailure>;
}
