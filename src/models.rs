//! Data models for the URL analysis workflow.
//!
//! This module contains the request sent to the analysis service and the
//! result it returns. Every field of the result is optional on the wire:
//! the service forwards whatever its analyzers produced, so rendering code
//! works from accessors that fall back to placeholders.

use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use std::fmt;
use std::str::FromStr;

/// Display language for localized response fields.
///
/// Serialized as its wire code; parsed case-insensitively from either the
/// code or the English name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "String")]
pub enum Language {
    /// English (default)
    #[default]
    #[serde(rename = "en")]
    English,
    /// Kannada
    #[serde(rename = "kn")]
    Kannada,
}

impl Language {
    /// Every supported language, default first.
    pub const ALL: [Language; 2] = [Language::English, Language::Kannada];

    /// Returns the wire code for this language.
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Kannada => "kn",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "en" | "english" => Ok(Language::English),
            "kn" | "kannada" => Ok(Language::Kannada),
            other => Err(format!("Unsupported language '{}': expected 'en' or 'kn'", other)),
        }
    }
}

impl TryFrom<String> for Language {
    type Error = String;

    fn try_from(s: String) -> Result<Self, Self::Error> {
        s.parse()
    }
}

/// Body of `POST /analyze-url`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisRequest {
    /// URL to analyze, already trimmed.
    pub url: String,
    /// Language passed through to the service.
    pub language: Language,
}

/// Coarse risk classification supplied by the service.
///
/// Unrecognized values are kept verbatim so they can still be shown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RiskLevel {
    Low,
    Medium,
    High,
    Other(String),
}

impl From<String> for RiskLevel {
    fn from(s: String) -> Self {
        match s.as_str() {
            "LOW" => RiskLevel::Low,
            "MEDIUM" => RiskLevel::Medium,
            "HIGH" => RiskLevel::High,
            _ => RiskLevel::Other(s),
        }
    }
}

impl From<RiskLevel> for String {
    fn from(level: RiskLevel) -> Self {
        match level {
            RiskLevel::Low => "LOW".to_string(),
            RiskLevel::Medium => "MEDIUM".to_string(),
            RiskLevel::High => "HIGH".to_string(),
            RiskLevel::Other(s) => s,
        }
    }
}

impl Default for RiskLevel {
    fn default() -> Self {
        RiskLevel::Other(String::new())
    }
}

impl fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RiskLevel::Low => write!(f, "LOW"),
            RiskLevel::Medium => write!(f, "MEDIUM"),
            RiskLevel::High => write!(f, "HIGH"),
            RiskLevel::Other(s) if s.trim().is_empty() => write!(f, "UNKNOWN"),
            RiskLevel::Other(s) => write!(f, "{}", s),
        }
    }
}

impl RiskLevel {
    /// Ordering rank used for `--fail-on` thresholds. Unknown levels never rank.
    pub fn rank(&self) -> Option<u8> {
        match self {
            RiskLevel::Low => Some(1),
            RiskLevel::Medium => Some(2),
            RiskLevel::High => Some(3),
            RiskLevel::Other(_) => None,
        }
    }
}

/// Decode a response field, treating `null` or a value of the wrong shape
/// as absent instead of rejecting the whole response.
fn lenient<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: DeserializeOwned + Default,
{
    let value = Value::deserialize(deserializer)?;
    Ok(serde_json::from_value(value).unwrap_or_default())
}

/// Numeric field that may arrive as a number or a numeric string (`"85"`, `"85%"`).
fn lenient_number<'de, D>(deserializer: D) -> Result<Option<f64>, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(match Value::deserialize(deserializer)? {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().trim_end_matches('%').trim_end().parse::<f64>().ok(),
        _ => None,
    }
    .filter(|n| n.is_finite()))
}

fn lenient_score<'de, D>(deserializer: D) -> Result<i64, D::Error>
where
    D: Deserializer<'de>,
{
    Ok(lenient_number(deserializer)?.map_or(0, |n| n.round() as i64))
}

/// A text field the service returns in both supported languages.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalizedText {
    #[serde(default, deserialize_with = "lenient")]
    pub english: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub kannada: Option<String>,
}

impl LocalizedText {
    /// Text for the given language, falling back to English when the
    /// Kannada field is absent or blank.
    pub fn get(&self, language: Language) -> Option<&str> {
        match language {
            Language::English => non_blank(&self.english),
            Language::Kannada => non_blank(&self.kannada).or_else(|| non_blank(&self.english)),
        }
    }
}

fn non_blank(text: &Option<String>) -> Option<&str> {
    text.as_deref().filter(|t| !t.trim().is_empty())
}

/// Domain characteristics nested under `details.domain_info.domain_info`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainParts {
    #[serde(default, deserialize_with = "lenient")]
    pub domain: Option<String>,
}

/// URL-level analysis (`details.domain_info`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DomainInfo {
    #[serde(default, deserialize_with = "lenient")]
    pub domain_info: Option<DomainParts>,
    #[serde(default, deserialize_with = "lenient")]
    pub has_ssl: Option<bool>,
    /// Only the count is displayed, so entries stay untyped.
    #[serde(default, deserialize_with = "lenient")]
    pub suspicious_patterns: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub virustotal_detections: Option<u64>,
    #[serde(default, deserialize_with = "lenient")]
    pub is_shortened: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub domain_age_days: Option<i64>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
}

/// Content analysis (`details.ai_analysis`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AiAnalysis {
    #[serde(default, deserialize_with = "lenient")]
    pub is_phishing: Option<bool>,
    /// Confidence percentage, 0-100.
    #[serde(default, deserialize_with = "lenient_number")]
    pub confidence: Option<f64>,
    #[serde(default, deserialize_with = "lenient")]
    pub urgency_detected: Option<bool>,
    #[serde(default, deserialize_with = "lenient")]
    pub ai_reasoning: Option<String>,
    #[serde(default, deserialize_with = "lenient")]
    pub keyword_matches: Option<Vec<Value>>,
    #[serde(default, deserialize_with = "lenient")]
    pub error: Option<String>,
}

/// Technical details block of the result.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisDetails {
    #[serde(default, deserialize_with = "lenient")]
    pub domain_info: Option<DomainInfo>,
    #[serde(default, deserialize_with = "lenient")]
    pub ai_analysis: Option<AiAnalysis>,
}

/// Response of `POST /analyze-url`.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AnalysisResult {
    /// Echo of the analyzed URL.
    #[serde(
        default,
        deserialize_with = "lenient",
        skip_serializing_if = "Option::is_none"
    )]
    pub url: Option<String>,
    /// Trust score, higher is safer.
    #[serde(default, deserialize_with = "lenient_score")]
    pub trust_score: i64,
    #[serde(default, deserialize_with = "lenient")]
    pub risk_level: RiskLevel,
    #[serde(default, deserialize_with = "lenient")]
    pub summary: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    pub recommendations: LocalizedText,
    #[serde(default, deserialize_with = "lenient")]
    pub details: AnalysisDetails,
}

impl AnalysisResult {
    /// Domain name reported by the URL analyzer, if any.
    pub fn domain(&self) -> Option<&str> {
        self.details
            .domain_info
            .as_ref()?
            .domain_info
            .as_ref()?
            .domain
            .as_deref()
            .filter(|d| !d.is_empty())
    }

    pub fn has_ssl(&self) -> bool {
        self.details
            .domain_info
            .as_ref()
            .and_then(|d| d.has_ssl)
            .unwrap_or(false)
    }

    pub fn suspicious_pattern_count(&self) -> usize {
        self.details
            .domain_info
            .as_ref()
            .and_then(|d| d.suspicious_patterns.as_ref())
            .map_or(0, Vec::len)
    }

    pub fn virustotal_detections(&self) -> u64 {
        self.details
            .domain_info
            .as_ref()
            .and_then(|d| d.virustotal_detections)
            .unwrap_or(0)
    }

    pub fn is_phishing(&self) -> bool {
        self.details
            .ai_analysis
            .as_ref()
            .and_then(|a| a.is_phishing)
            .unwrap_or(false)
    }

    /// Confidence percentage to one decimal place, clamped to 0..=100.
    pub fn confidence(&self) -> f64 {
        self.details
            .ai_analysis
            .as_ref()
            .and_then(|a| a.confidence)
            .map_or(0.0, |c| ((c * 10.0).round() / 10.0).clamp(0.0, 100.0))
    }

    pub fn urgency_detected(&self) -> bool {
        self.details
            .ai_analysis
            .as_ref()
            .and_then(|a| a.urgency_detected)
            .unwrap_or(false)
    }

    pub fn is_shortened(&self) -> bool {
        self.details
            .domain_info
            .as_ref()
            .and_then(|d| d.is_shortened)
            .unwrap_or(false)
    }

    pub fn domain_age_days(&self) -> Option<i64> {
        self.details.domain_info.as_ref()?.domain_age_days
    }

    pub fn keyword_match_count(&self) -> usize {
        self.details
            .ai_analysis
            .as_ref()
            .and_then(|a| a.keyword_matches.as_ref())
            .map_or(0, Vec::len)
    }

    /// Errors the service's analyzers reported while still returning a result.
    pub fn analyzer_errors(&self) -> Vec<&str> {
        let domain = self.details.domain_info.as_ref().and_then(|d| d.error.as_deref());
        let ai = self.details.ai_analysis.as_ref().and_then(|a| a.error.as_deref());
        domain.into_iter().chain(ai).filter(|e| !e.is_empty()).collect()
    }

    /// Free-form reasoning from the content classifier, if it gave one.
    pub fn ai_reasoning(&self) -> Option<&str> {
        self.details
            .ai_analysis
            .as_ref()?
            .ai_reasoning
            .as_deref()
            .filter(|r| !r.trim().is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_language_codes() {
        assert_eq!(Language::English.code(), "en");
        assert_eq!(Language::Kannada.code(), "kn");
        assert_eq!("KN".parse::<Language>().unwrap(), Language::Kannada);
        assert_eq!("english".parse::<Language>().unwrap(), Language::English);
        assert!("fr".parse::<Language>().is_err());
    }

    #[test]
    fn test_request_serialization() {
        let request = AnalysisRequest {
            url: "https://example.com".to_string(),
            language: Language::Kannada,
        };
        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"url": "https://example.com", "language": "kn"})
        );
    }

    #[test]
    fn test_risk_level_parsing() {
        let low: RiskLevel = serde_json::from_str("\"LOW\"").unwrap();
        assert_eq!(low, RiskLevel::Low);

        let odd: RiskLevel = serde_json::from_str("\"SEVERE\"").unwrap();
        assert_eq!(odd, RiskLevel::Other("SEVERE".to_string()));
        assert_eq!(odd.to_string(), "SEVERE");
        assert_eq!(odd.rank(), None);

        assert_eq!(RiskLevel::default().to_string(), "UNKNOWN");
        assert!(RiskLevel::High.rank() > RiskLevel::Medium.rank());
    }

    #[test]
    fn test_full_result_parsing() {
        let raw = r#"{
            "url": "https://paypa1-secure.tk",
            "trust_score": 25,
            "risk_level": "HIGH",
            "summary": {"english": "Looks like phishing.", "kannada": "ಫಿಶಿಂಗ್"},
            "recommendations": {"english": "Do not visit.", "kannada": "ಭೇಟಿ ನೀಡಬೇಡಿ"},
            "details": {
                "domain_info": {
                    "original_url": "https://paypa1-secure.tk",
                    "domain_info": {"domain": "paypa1-secure", "suffix": "tk"},
                    "has_ssl": false,
                    "suspicious_patterns": ["verify.*account", "urgent"],
                    "virustotal_detections": 3
                },
                "ai_analysis": {
                    "is_phishing": true,
                    "confidence": 87.6,
                    "urgency_detected": true,
                    "form_analysis": {"has_password_field": true}
                }
            }
        }"#;

        let result: AnalysisResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.trust_score, 25);
        assert_eq!(result.risk_level, RiskLevel::High);
        assert_eq!(result.domain(), Some("paypa1-secure"));
        assert!(!result.has_ssl());
        assert_eq!(result.suspicious_pattern_count(), 2);
        assert_eq!(result.virustotal_detections(), 3);
        assert!(result.is_phishing());
        assert_eq!(result.confidence(), 87.6);
        assert!(result.urgency_detected());
        assert!(result.analyzer_errors().is_empty());
    }

    #[test]
    fn test_analyzer_errors_collected() {
        let raw = r#"{
            "trust_score": 55,
            "details": {
                "domain_info": {"error": "DNS lookup failed", "is_shortened": true},
                "ai_analysis": {"error": "Failed to fetch content", "is_phishing": false, "confidence": 0}
            }
        }"#;

        let result: AnalysisResult = serde_json::from_str(raw).unwrap();
        assert_eq!(
            result.analyzer_errors(),
            vec!["DNS lookup failed", "Failed to fetch content"]
        );
        assert!(result.is_shortened());
        assert_eq!(result.domain_age_days(), None);
    }

    #[test]
    fn test_sparse_result_defaults() {
        let result: AnalysisResult =
            serde_json::from_str(r#"{"trust_score": 60, "details": {"domain_info": {}}}"#)
                .unwrap();
        assert_eq!(result.domain(), None);
        assert!(!result.has_ssl());
        assert_eq!(result.suspicious_pattern_count(), 0);
        assert_eq!(result.virustotal_detections(), 0);
        assert!(!result.is_phishing());
        assert_eq!(result.confidence(), 0.0);
        assert!(!result.urgency_detected());
        assert_eq!(result.summary.get(Language::English), None);
    }

    #[test]
    fn test_language_deserializes_case_insensitively() {
        let lang: Language = serde_json::from_str("\"KN\"").unwrap();
        assert_eq!(lang, Language::Kannada);
        let lang: Language = serde_json::from_str("\"English\"").unwrap();
        assert_eq!(lang, Language::English);
        assert!(serde_json::from_str::<Language>("\"fr\"").is_err());

        assert_eq!(serde_json::to_string(&Language::Kannada).unwrap(), "\"kn\"");
    }

    #[test]
    fn test_null_fields_degrade_to_defaults() {
        let raw = r#"{
            "url": null,
            "trust_score": 85,
            "risk_level": null,
            "summary": null,
            "recommendations": {"english": "Be careful", "kannada": null},
            "details": {"domain_info": null, "ai_analysis": {"is_phishing": null}}
        }"#;

        let result: AnalysisResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.trust_score, 85);
        assert_eq!(result.risk_level, RiskLevel::default());
        assert_eq!(result.risk_level.to_string(), "UNKNOWN");
        assert_eq!(result.summary.get(Language::English), None);
        assert_eq!(result.recommendations.get(Language::Kannada), Some("Be careful"));
        assert_eq!(result.domain(), None);
        assert!(!result.is_phishing());
    }

    #[test]
    fn test_wrong_typed_fields_degrade_to_defaults() {
        let raw = r#"{
            "trust_score": "42",
            "risk_level": 3,
            "summary": "not an object",
            "details": {
                "domain_info": {
                    "domain_info": {"domain": "example"},
                    "has_ssl": "yes",
                    "suspicious_patterns": "none",
                    "virustotal_detections": -1
                },
                "ai_analysis": {
                    "confidence": "85",
                    "ai_reasoning": {"text": "odd"},
                    "urgency_detected": true,
                    "keyword_matches": ["prize", "urgent"]
                }
            }
        }"#;

        let result: AnalysisResult = serde_json::from_str(raw).unwrap();
        assert_eq!(result.trust_score, 42);
        assert_eq!(result.risk_level, RiskLevel::default());
        assert_eq!(result.summary, LocalizedText::default());
        assert_eq!(result.domain(), Some("example"));
        assert!(!result.has_ssl());
        assert_eq!(result.suspicious_pattern_count(), 0);
        assert_eq!(result.virustotal_detections(), 0);
        assert_eq!(result.confidence(), 85.0);
        assert_eq!(result.ai_reasoning(), None);
        assert!(result.urgency_detected());
        assert_eq!(result.keyword_match_count(), 2);
    }

    #[test]
    fn test_confidence_keeps_one_decimal() {
        let parse = |confidence: &str| {
            let raw = format!(
                r#"{{"details": {{"ai_analysis": {{"confidence": {}}}}}}}"#,
                confidence
            );
            serde_json::from_str::<AnalysisResult>(&raw).unwrap().confidence()
        };

        assert_eq!(parse("87.64"), 87.6);
        assert_eq!(parse("\"72.5%\""), 72.5);
        assert_eq!(parse("140"), 100.0);
        assert_eq!(parse("null"), 0.0);
    }

    #[test]
    fn test_localized_text_fallback() {
        let text = LocalizedText {
            english: Some("Safe".to_string()),
            kannada: None,
        };
        assert_eq!(text.get(Language::English), Some("Safe"));
        assert_eq!(text.get(Language::Kannada), Some("Safe"));

        let both = LocalizedText {
            english: Some("Safe".to_string()),
            kannada: Some("ಸುರಕ್ಷಿತ".to_string()),
        };
        assert_eq!(both.get(Language::Kannada), Some("ಸುರಕ್ಷಿತ"));
    }
}
