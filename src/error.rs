//! Error types for the analysis workflow.
//!
//! Only two kinds of failure are visible to the user. Everything that goes
//! wrong between sending the request and decoding the response collapses
//! into [`AnalysisError::Request`]; the wrapped [`RequestFailure`] carries
//! the diagnostic detail for logs.

use thiserror::Error;

/// Message shown when the URL field is empty.
pub const VALIDATION_MESSAGE: &str = "Please enter a URL to analyze";

/// Message shown for any request failure.
pub const REQUEST_FAILED_MESSAGE: &str = "Failed to analyze URL. Please try again.";

/// Failure of a single submission.
#[derive(Error, Debug)]
pub enum AnalysisError {
    /// Empty or whitespace-only URL; never reaches the network.
    #[error("{}", VALIDATION_MESSAGE)]
    Validation,

    /// Transport, status, or decoding failure.
    #[error("analysis request failed: {0}")]
    Request(#[from] RequestFailure),
}

impl AnalysisError {
    /// The message the user gets to see. Never includes the underlying cause.
    pub fn user_message(&self) -> &'static str {
        match self {
            AnalysisError::Validation => VALIDATION_MESSAGE,
            AnalysisError::Request(_) => REQUEST_FAILED_MESSAGE,
        }
    }
}

/// Why a request to the analysis service failed.
#[derive(Error, Debug)]
pub enum RequestFailure {
    #[error("could not reach analysis service: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("analysis service returned {status}: {body}")]
    Status {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("could not decode analysis response: {0}")]
    Decode(#[from] serde_json::Error),
}

impl From<reqwest::Error> for RequestFailure {
    fn from(e: reqwest::Error) -> Self {
        RequestFailure::Transport(e)
    }
}
