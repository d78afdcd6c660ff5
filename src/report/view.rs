//! View model derived from the controller state.
//!
//! Everything here is a pure function of a [`UiState`], the pending URL and
//! the selected [`Language`]. Renderers in [`crate::report::generator`]
//! only format these values.

use crate::controller::{AnalysisController, UiState};
use crate::models::{AnalysisResult, Language, RiskLevel};
use serde::Serialize;
use std::fmt;

/// Placeholder for missing text fields.
pub const NOT_AVAILABLE: &str = "N/A";

/// Colour band of the trust bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TrustBand {
    /// Score 70 and above
    Safe,
    /// Score 40 to 69
    Caution,
    /// Score below 40
    Danger,
}

impl TrustBand {
    pub fn from_score(score: i64) -> Self {
        if score >= 70 {
            TrustBand::Safe
        } else if score >= 40 {
            TrustBand::Caution
        } else {
            TrustBand::Danger
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            TrustBand::Safe => "🟢",
            TrustBand::Caution => "🟡",
            TrustBand::Danger => "🔴",
        }
    }
}

impl fmt::Display for TrustBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TrustBand::Safe => write!(f, "safe"),
            TrustBand::Caution => write!(f, "caution"),
            TrustBand::Danger => write!(f, "danger"),
        }
    }
}

/// Risk badge. Chosen from the risk level alone, never from the score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum RiskBadge {
    Low,
    Medium,
    High,
    Neutral,
}

impl From<&RiskLevel> for RiskBadge {
    fn from(level: &RiskLevel) -> Self {
        match level {
            RiskLevel::Low => RiskBadge::Low,
            RiskLevel::Medium => RiskBadge::Medium,
            RiskLevel::High => RiskBadge::High,
            RiskLevel::Other(_) => RiskBadge::Neutral,
        }
    }
}

impl RiskBadge {
    pub fn emoji(&self) -> &'static str {
        match self {
            RiskBadge::Low => "✅",
            RiskBadge::Medium => "⚠️",
            RiskBadge::High => "⛔",
            RiskBadge::Neutral => "🛡️",
        }
    }
}

/// Trust score bar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TrustBar {
    /// Bar width in percent; equal to the score, clamped to 0..=100.
    pub width_percent: u8,
    pub band: TrustBand,
}

impl TrustBar {
    pub fn from_score(score: i64) -> Self {
        Self {
            width_percent: score.clamp(0, 100) as u8,
            band: TrustBand::from_score(score),
        }
    }

    /// Number of filled cells when drawn `cells` wide.
    pub fn filled_cells(&self, cells: usize) -> usize {
        (self.width_percent as usize * cells + 50) / 100
    }
}

fn yes_no(value: bool) -> &'static str {
    if value {
        "Yes"
    } else {
        "No"
    }
}

/// Technical details with placeholders already applied.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DetailsView {
    pub domain: String,
    pub ssl_valid: &'static str,
    pub suspicious_patterns: usize,
    pub virustotal_detections: u64,
    pub phishing_detected: &'static str,
    /// Percentage, one decimal place.
    pub confidence: f64,
    pub urgency_language: &'static str,
    pub shortened_url: &'static str,
    /// Domain age in days, or `N/A`.
    pub domain_age: String,
    pub keyword_matches: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ai_reasoning: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub analyzer_errors: Vec<String>,
}

impl From<&AnalysisResult> for DetailsView {
    fn from(result: &AnalysisResult) -> Self {
        Self {
            domain: result.domain().unwrap_or(NOT_AVAILABLE).to_string(),
            ssl_valid: yes_no(result.has_ssl()),
            suspicious_patterns: result.suspicious_pattern_count(),
            virustotal_detections: result.virustotal_detections(),
            phishing_detected: yes_no(result.is_phishing()),
            confidence: result.confidence(),
            urgency_language: yes_no(result.urgency_detected()),
            shortened_url: yes_no(result.is_shortened()),
            domain_age: result
                .domain_age_days()
                .map_or_else(|| NOT_AVAILABLE.to_string(), |d| format!("{} days", d)),
            keyword_matches: result.keyword_match_count(),
            ai_reasoning: result.ai_reasoning().map(str::to_string),
            analyzer_errors: result
                .analyzer_errors()
                .into_iter()
                .map(str::to_string)
                .collect(),
        }
    }
}

/// A loaded result, rendered for one language.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ResultView {
    /// Language the text fields were picked for.
    pub language: Language,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    pub trust_score: i64,
    pub trust_bar: TrustBar,
    pub risk_badge: RiskBadge,
    /// e.g. `LOW RISK`
    pub risk_label: String,
    pub summary: String,
    pub recommendations: String,
    pub details: DetailsView,
}

impl ResultView {
    pub fn new(result: &AnalysisResult, language: Language) -> Self {
        Self {
            language,
            url: result.url.clone(),
            trust_score: result.trust_score,
            trust_bar: TrustBar::from_score(result.trust_score),
            risk_badge: RiskBadge::from(&result.risk_level),
            risk_label: format!("{} RISK", result.risk_level),
            summary: result
                .summary
                .get(language)
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            recommendations: result
                .recommendations
                .get(language)
                .unwrap_or(NOT_AVAILABLE)
                .to_string(),
            details: DetailsView::from(result),
        }
    }
}

/// The input form.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FormView {
    pub url: String,
    pub input_disabled: bool,
    pub submit_label: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

/// Everything on screen for one state.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ScreenView {
    pub language: Language,
    pub form: FormView,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultView>,
}

/// Render a state for the given input and language.
pub fn render_state(state: &UiState, url: &str, language: Language) -> ScreenView {
    let loading = matches!(state, UiState::Loading);

    let form = FormView {
        url: url.to_string(),
        input_disabled: loading,
        submit_label: if loading { "Analyzing..." } else { "Analyze" },
        error: match state {
            UiState::Error(message) => Some(message.clone()),
            _ => None,
        },
    };

    let result = match state {
        UiState::Loaded(result) => Some(ResultView::new(result, language)),
        _ => None,
    };

    ScreenView {
        language,
        form,
        result,
    }
}

/// Render the controller's current state.
pub fn render_controller(controller: &AnalysisController) -> ScreenView {
    render_state(controller.state(), controller.url(), controller.language())
}
