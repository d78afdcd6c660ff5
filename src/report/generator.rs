//! Report generation.
//!
//! Formats the outcome of one or more analyses as terminal text,
//! Markdown, or JSON. All wording comes from the view model; nothing here
//! looks at the raw response except to embed it in JSON output.

use crate::controller::{AnalysisController, UiState};
use crate::models::{AnalysisResult, Language};
use crate::report::view::{render_controller, DetailsView, ResultView, TrustBar};
use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::Serialize;

/// Width of the trust bar in terminal cells.
const BAR_CELLS: usize = 20;

/// Metadata about a run.
#[derive(Debug, Clone, Serialize)]
pub struct ReportMetadata {
    /// Base URL of the analysis service.
    pub service_url: String,
    /// Display language.
    pub language: Language,
    /// When the run started.
    pub analysis_date: DateTime<Utc>,
    pub urls_analyzed: usize,
    pub urls_failed: usize,
    pub duration_seconds: f64,
}

/// Outcome of one submitted URL.
#[derive(Debug, Clone, Serialize)]
pub struct ScanEntry {
    /// URL as entered.
    pub url: String,
    /// Final controller state name (`loaded` or `error`).
    pub status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view: Option<ResultView>,
    /// The same result rendered in the other supported languages.
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub translations: Vec<ResultView>,
    /// Raw response, kept for machine consumers.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<AnalysisResult>,
}

impl ScanEntry {
    /// Capture what the controller currently shows.
    pub fn capture(controller: &AnalysisController) -> Self {
        let screen = render_controller(controller);
        let result = match controller.state() {
            UiState::Loaded(result) => Some(result.clone()),
            _ => None,
        };

        Self {
            url: controller.url().trim().to_string(),
            status: controller.state().name(),
            error: screen.form.error,
            view: screen.result,
            translations: Vec::new(),
            result,
        }
    }

    /// Like [`ScanEntry::capture`], but also switches the controller through
    /// every other language to record the result in each. The controller's
    /// language is restored afterwards.
    pub fn capture_translated(controller: &mut AnalysisController) -> Self {
        let mut entry = Self::capture(controller);
        if entry.view.is_none() {
            return entry;
        }

        let selected = controller.language();
        for language in Language::ALL.into_iter().filter(|l| *l != selected) {
            controller.set_language(language);
            if let Some(view) = render_controller(controller).result {
                entry.translations.push(view);
            }
        }
        controller.set_language(selected);

        entry
    }

    pub fn is_failure(&self) -> bool {
        self.view.is_none()
    }
}

/// Results of a whole run.
#[derive(Debug, Clone, Serialize)]
pub struct ScanReport {
    pub metadata: ReportMetadata,
    pub entries: Vec<ScanEntry>,
}

/// Draw a trust bar, e.g. `[█████████████████░░░] 85%`.
fn draw_bar(bar: &TrustBar) -> String {
    let filled = bar.filled_cells(BAR_CELLS);
    format!(
        "[{}{}] {}%",
        "█".repeat(filled),
        "░".repeat(BAR_CELLS - filled),
        bar.width_percent
    )
}

/// Render one entry for the terminal.
pub fn generate_text_entry(entry: &ScanEntry) -> String {
    let mut out = String::new();

    let view = match &entry.view {
        Some(view) => view,
        None => {
            out.push_str(&format!("❌ {}\n", entry.url));
            if let Some(ref error) = entry.error {
                out.push_str(&format!("   {}\n", error));
            }
            return out;
        }
    };

    out.push_str(&format!("🔍 {}\n", entry.url));
    out.push_str(&format!(
        "   {} {}\n",
        view.risk_badge.emoji(),
        view.risk_label
    ));
    out.push_str(&format!("   Trust Score: {}/100\n", view.trust_score));
    out.push_str(&format!(
        "   {} {} {}\n\n",
        draw_bar(&view.trust_bar),
        view.trust_bar.band.emoji(),
        view.trust_bar.band
    ));

    out.push_str("   Analysis Summary:\n");
    out.push_str(&format!("     {}\n\n", view.summary));
    out.push_str("   Recommendations:\n");
    out.push_str(&format!("     {}\n\n", view.recommendations));

    out.push_str("   Technical Details:\n");
    out.push_str(&text_details(&view.details));

    out
}

fn text_details(details: &DetailsView) -> String {
    let mut out = String::new();

    out.push_str("     Domain Information\n");
    out.push_str(&format!("       Domain: {}\n", details.domain));
    out.push_str(&format!("       SSL Valid: {}\n", details.ssl_valid));
    out.push_str(&format!(
        "       Suspicious Patterns: {}\n",
        details.suspicious_patterns
    ));
    out.push_str(&format!(
        "       VirusTotal Detections: {}\n",
        details.virustotal_detections
    ));
    out.push_str(&format!("       Shortened URL: {}\n", details.shortened_url));
    out.push_str(&format!("       Domain Age: {}\n", details.domain_age));
    out.push_str("     AI Analysis\n");
    out.push_str(&format!(
        "       Phishing Detected: {}\n",
        details.phishing_detected
    ));
    out.push_str(&format!("       Confidence: {}%\n", details.confidence));
    out.push_str(&format!(
        "       Urgency Language: {}\n",
        details.urgency_language
    ));
    out.push_str(&format!(
        "       Keyword Matches: {}\n",
        details.keyword_matches
    ));
    if let Some(ref reasoning) = details.ai_reasoning {
        out.push_str(&format!("       Reasoning: {}\n", reasoning));
    }
    for note in &details.analyzer_errors {
        out.push_str(&format!("     ⚠️  {}\n", note));
    }

    out
}

/// Render a whole run for the terminal.
pub fn generate_text_report(report: &ScanReport) -> String {
    let mut out = String::new();

    for entry in &report.entries {
        out.push_str(&generate_text_entry(entry));
        out.push('\n');
    }

    out.push_str(&format!(
        "📊 {} analyzed, {} failed in {:.1}s\n",
        report.metadata.urls_analyzed, report.metadata.urls_failed, report.metadata.duration_seconds
    ));

    out
}

/// Generate a complete Markdown report.
pub fn generate_markdown_report(report: &ScanReport) -> String {
    let mut output = String::new();

    output.push_str("# Surakshak URL Report\n\n");
    output.push_str(&generate_metadata_section(&report.metadata));

    for entry in &report.entries {
        output.push_str(&generate_entry_section(entry));
    }

    output.push_str("---\n\n");
    output.push_str("*Report generated by Surakshak*\n");

    output
}

/// Generate the metadata section.
fn generate_metadata_section(metadata: &ReportMetadata) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!("- **Service:** {}\n", metadata.service_url));
    section.push_str(&format!("- **Language:** `{}`\n", metadata.language));
    section.push_str(&format!(
        "- **Analysis Date:** {}\n",
        metadata.analysis_date.format("%Y-%m-%d %H:%M:%S UTC")
    ));
    section.push_str(&format!("- **URLs Analyzed:** {}\n", metadata.urls_analyzed));
    if metadata.urls_failed > 0 {
        section.push_str(&format!("- **URLs Failed:** {}\n", metadata.urls_failed));
    }
    section.push_str(&format!(
        "- **Duration:** {:.1}s\n\n",
        metadata.duration_seconds
    ));

    section
}

/// Generate the section for one URL.
fn generate_entry_section(entry: &ScanEntry) -> String {
    let mut section = String::new();

    section.push_str(&format!("## `{}`\n\n", entry.url));

    let view = match &entry.view {
        Some(view) => view,
        None => {
            let error = entry.error.as_deref().unwrap_or("No result");
            section.push_str(&format!("> ❌ {}\n\n", error));
            return section;
        }
    };

    section.push_str(&format!(
        "**{} {}** | Trust Score: **{}/100** {} {}\n\n",
        view.risk_badge.emoji(),
        view.risk_label,
        view.trust_score,
        view.trust_bar.band.emoji(),
        view.trust_bar.band
    ));
    section.push_str(&format!("`{}`\n\n", draw_bar(&view.trust_bar)));

    section.push_str("### Analysis Summary\n\n");
    section.push_str(&format!("{}\n\n", view.summary));
    section.push_str("### Recommendations\n\n");
    section.push_str(&format!("> 💡 {}\n\n", view.recommendations));

    let d = &view.details;
    section.push_str("### Technical Details\n\n");
    section.push_str("| Domain Information | | AI Analysis | |\n");
    section.push_str("|:---|:---|:---|:---|\n");
    section.push_str(&format!(
        "| Domain | {} | Phishing Detected | {} |\n",
        d.domain, d.phishing_detected
    ));
    section.push_str(&format!(
        "| SSL Valid | {} | Confidence | {}% |\n",
        d.ssl_valid, d.confidence
    ));
    section.push_str(&format!(
        "| Suspicious Patterns | {} | Urgency Language | {} |\n",
        d.suspicious_patterns, d.urgency_language
    ));
    section.push_str(&format!(
        "| VirusTotal Detections | {} | Keyword Matches | {} |\n",
        d.virustotal_detections, d.keyword_matches
    ));
    section.push_str(&format!(
        "| Shortened URL | {} | | |\n",
        d.shortened_url
    ));
    section.push_str(&format!("| Domain Age | {} | | |\n\n", d.domain_age));
    if let Some(ref reasoning) = d.ai_reasoning {
        section.push_str(&format!("*Reasoning:* {}\n\n", reasoning));
    }
    for note in &d.analyzer_errors {
        section.push_str(&format!("> ⚠️ {}\n\n", note));
    }

    section
}

/// Generate a JSON report.
pub fn generate_json_report(report: &ScanReport) -> Result<String> {
    serde_json::to_string_pretty(report).map_err(Into::into)
}
