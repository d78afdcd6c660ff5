//! UI state machine for the analysis workflow.
//!
//! State only changes through the controller's operations:
//! input edits, [`AnalysisController::begin_submit`], and
//! [`AnalysisController::complete`]. A submission is identified by a
//! [`Ticket`]; completions carrying any other ticket are dropped, which is
//! how late responses after teardown or from a superseded request are kept
//! out of the state.

use crate::client::AnalysisService;
use crate::error::{AnalysisError, RequestFailure};
use crate::models::{AnalysisRequest, AnalysisResult, Language};
use tracing::{debug, info, warn};

/// What the user currently sees.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum UiState {
    /// Nothing submitted yet, or input edited after an error.
    #[default]
    Idle,
    /// A request is in flight.
    Loading,
    /// Validation or request failure, with the user-facing message.
    Error(String),
    /// The last request succeeded.
    Loaded(AnalysisResult),
}

impl UiState {
    /// Short name for logs.
    pub fn name(&self) -> &'static str {
        match self {
            UiState::Idle => "idle",
            UiState::Loading => "loading",
            UiState::Error(_) => "error",
            UiState::Loaded(_) => "loaded",
        }
    }
}

/// Identifier of one submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Ticket(u64);

/// A submission that has been accepted and must be sent to the service.
#[derive(Debug, Clone)]
pub struct PendingRequest {
    pub ticket: Ticket,
    pub request: AnalysisRequest,
}

/// Whether a completion changed the state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Completion {
    Applied,
    Discarded,
}

/// Controller for a single analysis form.
#[derive(Debug, Default)]
pub struct AnalysisController {
    url: String,
    language: Language,
    state: UiState,
    in_flight: Option<Ticket>,
    next_ticket: u64,
    closed: bool,
}

impl AnalysisController {
    /// Create an idle controller with the given display language.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            ..Self::default()
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn state(&self) -> &UiState {
        &self.state
    }

    pub fn is_loading(&self) -> bool {
        matches!(self.state, UiState::Loading)
    }

    /// Input and submit are disabled while a request is in flight.
    pub fn input_disabled(&self) -> bool {
        self.is_loading()
    }

    /// Update the pending URL. No validation happens here.
    pub fn set_url(&mut self, text: impl Into<String>) {
        if self.input_disabled() {
            debug!("Ignoring URL edit while a request is in flight");
            return;
        }

        self.url = text.into();
        if matches!(self.state, UiState::Error(_)) {
            self.state = UiState::Idle;
        }
    }

    /// Switch the display language. A loaded result is re-rendered, not re-fetched.
    pub fn set_language(&mut self, language: Language) {
        if self.language != language {
            debug!("Language changed: {} -> {}", self.language, language);
        }
        self.language = language;
    }

    /// Validate input and move to `Loading`.
    ///
    /// Returns `Ok(None)` when the submission is ignored because another one
    /// is still in flight or the controller has been closed.
    pub fn begin_submit(&mut self) -> Result<Option<PendingRequest>, AnalysisError> {
        if self.closed {
            debug!("Ignoring submit on a closed controller");
            return Ok(None);
        }
        if self.in_flight.is_some() {
            debug!("Ignoring submit while a request is in flight");
            return Ok(None);
        }

        let url = self.url.trim();
        if url.is_empty() {
            self.state = UiState::Error(AnalysisError::Validation.user_message().to_string());
            return Err(AnalysisError::Validation);
        }

        let request = AnalysisRequest {
            url: url.to_string(),
            language: self.language,
        };

        let ticket = Ticket(self.next_ticket);
        self.next_ticket += 1;
        self.in_flight = Some(ticket);
        self.state = UiState::Loading;

        info!("Analyzing {}", request.url);
        Ok(Some(PendingRequest { ticket, request }))
    }

    /// Apply the outcome of the request identified by `ticket`.
    pub fn complete(
        &mut self,
        ticket: Ticket,
        outcome: Result<AnalysisResult, RequestFailure>,
    ) -> Completion {
        if self.closed || self.in_flight != Some(ticket) {
            debug!("Discarding stale completion for {:?}", ticket);
            return Completion::Discarded;
        }

        self.in_flight = None;
        self.state = match outcome {
            Ok(result) => {
                info!(
                    "Analysis complete: trust score {}, risk {}",
                    result.trust_score, result.risk_level
                );
                UiState::Loaded(result)
            }
            Err(failure) => {
                let err = AnalysisError::from(failure);
                warn!("{}", err);
                UiState::Error(err.user_message().to_string())
            }
        };

        Completion::Applied
    }

    /// Tear the controller down. Any later completion is discarded.
    pub fn close(&mut self) {
        self.closed = true;
        self.in_flight = None;
    }

    /// Run a full submission against `service` and return the resulting state.
    pub async fn submit_with<S>(&mut self, service: &S) -> &UiState
    where
        S: AnalysisService + ?Sized,
    {
        match self.begin_submit() {
            Ok(Some(pending)) => {
                let outcome = service.analyze(&pending.request).await;
                self.complete(pending.ticket, outcome);
            }
            Ok(None) => {}
            Err(err) => debug!("Submission rejected: {}", err),
        }
        &self.state
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{REQUEST_FAILED_MESSAGE, VALIDATION_MESSAGE};
    use crate::models::{LocalizedText, RiskLevel};
    use async_trait::async_trait;
    use std::sync::Mutex;

    /// Service double that records requests and replays a scripted outcome.
    struct ScriptedService {
        requests: Mutex<Vec<AnalysisRequest>>,
        respond_with: fn() -> Result<AnalysisResult, RequestFailure>,
    }

    impl ScriptedService {
        fn new(respond_with: fn() -> Result<AnalysisResult, RequestFailure>) -> Self {
            Self {
                requests: Mutex::new(Vec::new()),
                respond_with,
            }
        }

        fn requests(&self) -> Vec<AnalysisRequest> {
            self.requests.lock().unwrap().clone()
        }
    }

    #[async_trait]
    impl AnalysisService for ScriptedService {
        async fn analyze(
            &self,
            request: &AnalysisRequest,
        ) -> Result<AnalysisResult, RequestFailure> {
            self.requests.lock().unwrap().push(request.clone());
            (self.respond_with)()
        }
    }

    fn low_risk() -> Result<AnalysisResult, RequestFailure> {
        Ok(AnalysisResult {
            trust_score: 85,
            risk_level: RiskLevel::Low,
            summary: LocalizedText {
                english: Some("Looks safe".to_string()),
                kannada: Some("ಸುರಕ್ಷಿತ".to_string()),
            },
            ..AnalysisResult::default()
        })
    }

    fn server_error() -> Result<AnalysisResult, RequestFailure> {
        Err(RequestFailure::Status {
            status: reqwest::StatusCode::INTERNAL_SERVER_ERROR,
            body: "Analysis failed".to_string(),
        })
    }

    #[test]
    fn test_initial_state() {
        let controller = AnalysisController::new(Language::English);
        assert_eq!(controller.state(), &UiState::Idle);
        assert_eq!(controller.url(), "");
        assert!(!controller.input_disabled());
    }

    #[test]
    fn test_blank_url_never_reaches_service() {
        for input in ["", "   ", "\t\n "] {
            let service = ScriptedService::new(low_risk);
            let mut controller = AnalysisController::new(Language::English);
            controller.set_url(input);

            let state = tokio_test::block_on(controller.submit_with(&service)).clone();

            assert_eq!(state, UiState::Error(VALIDATION_MESSAGE.to_string()));
            assert!(service.requests().is_empty());
        }
    }

    #[test]
    fn test_begin_submit_returns_validation_error() {
        let mut controller = AnalysisController::new(Language::English);
        controller.set_url("  ");
        assert!(matches!(
            controller.begin_submit(),
            Err(AnalysisError::Validation)
        ));
    }

    #[tokio::test]
    async fn test_submit_sends_one_trimmed_request() {
        let service = ScriptedService::new(low_risk);
        let mut controller = AnalysisController::new(Language::Kannada);
        controller.set_url("  https://example.com/login \n");

        let state = controller.submit_with(&service).await;
        assert!(matches!(state, UiState::Loaded(r) if r.trust_score == 85));

        let requests = service.requests();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].url, "https://example.com/login");
        assert_eq!(requests[0].language, Language::Kannada);
    }

    #[tokio::test]
    async fn test_failure_clears_previous_result() {
        let ok = ScriptedService::new(low_risk);
        let failing = ScriptedService::new(server_error);
        let mut controller = AnalysisController::new(Language::English);
        controller.set_url("https://example.com");

        controller.submit_with(&ok).await;
        assert!(matches!(controller.state(), UiState::Loaded(_)));

        let state = controller.submit_with(&failing).await;
        assert_eq!(state, &UiState::Error(REQUEST_FAILED_MESSAGE.to_string()));
    }

    #[test]
    fn test_loading_clears_prior_error_and_result() {
        let mut controller = AnalysisController::new(Language::English);
        controller.set_url("https://example.com");

        let pending = controller.begin_submit().unwrap().unwrap();
        controller.complete(pending.ticket, low_risk());

        controller.begin_submit().unwrap().unwrap();
        assert_eq!(controller.state(), &UiState::Loading);
        assert!(controller.input_disabled());
    }

    #[test]
    fn test_submit_ignored_while_loading() {
        let mut controller = AnalysisController::new(Language::English);
        controller.set_url("https://example.com");

        let first = controller.begin_submit().unwrap();
        assert!(first.is_some());
        assert!(controller.begin_submit().unwrap().is_none());
        assert_eq!(controller.state(), &UiState::Loading);
    }

    #[test]
    fn test_url_edits_ignored_while_loading() {
        let mut controller = AnalysisController::new(Language::English);
        controller.set_url("https://example.com");
        controller.begin_submit().unwrap();

        controller.set_url("https://other.example");
        assert_eq!(controller.url(), "https://example.com");
    }

    #[test]
    fn test_url_edit_resets_error_to_idle() {
        let mut controller = AnalysisController::new(Language::English);
        let _ = controller.begin_submit();
        assert!(matches!(controller.state(), UiState::Error(_)));

        controller.set_url("h");
        assert_eq!(controller.state(), &UiState::Idle);
    }

    #[test]
    fn test_language_switch_keeps_loaded_result() {
        let service = ScriptedService::new(low_risk);
        let mut controller = AnalysisController::new(Language::English);
        controller.set_url("https://example.com");
        tokio_test::block_on(controller.submit_with(&service));

        controller.set_language(Language::Kannada);
        assert_eq!(controller.language(), Language::Kannada);
        assert!(matches!(controller.state(), UiState::Loaded(_)));
        assert_eq!(service.requests().len(), 1);
    }

    #[test]
    fn test_stale_ticket_is_discarded() {
        let mut controller = AnalysisController::new(Language::English);
        controller.set_url("https://example.com");

        let first = controller.begin_submit().unwrap().unwrap();
        assert_eq!(controller.complete(first.ticket, low_risk()), Completion::Applied);

        let second = controller.begin_submit().unwrap().unwrap();
        assert_ne!(first.ticket, second.ticket);
        assert_eq!(
            controller.complete(first.ticket, server_error()),
            Completion::Discarded
        );
        assert_eq!(controller.state(), &UiState::Loading);
    }

    #[test]
    fn test_completion_after_close_is_discarded() {
        let mut controller = AnalysisController::new(Language::English);
        controller.set_url("https://example.com");
        let pending = controller.begin_submit().unwrap().unwrap();

        controller.close();
        assert_eq!(
            controller.complete(pending.ticket, low_risk()),
            Completion::Discarded
        );
        assert_eq!(controller.state(), &UiState::Loading);
        assert!(controller.begin_submit().unwrap().is_none());
    }
}
