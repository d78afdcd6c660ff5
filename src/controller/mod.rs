//! Analysis request controller.
//!
//! Owns the pending input (URL and language) and the explicit UI state,
//! and drives one submission at a time through the analysis service.

pub mod state;

pub use state::{AnalysisController, UiState};
