//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use crate::models::{Language, RiskLevel};
use clap::Parser;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Surakshak - check suspicious URLs for scams and phishing
///
/// Sends each URL to the Surakshak analysis service and shows its trust
/// score, risk level, summary, recommendations and technical details.
///
/// Examples:
///   surakshak https://suspicious-website.com
///   surakshak --language kn https://bit.ly/claim-prize
///   surakshak --format json -o report.json https://a.example https://b.example
///   surakshak --fail-on high https://login-verify.example
///   surakshak --check
///   surakshak --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// URLs to analyze
    ///
    /// Surrounding whitespace is trimmed. Each URL is analyzed in turn.
    #[arg(value_name = "URL", required_unless_present_any = ["check", "init_config"])]
    pub urls: Vec<String>,

    /// Language for summaries and recommendations (en, kn)
    #[arg(short, long, value_name = "LANG", env = "SURAKSHAK_LANGUAGE")]
    pub language: Option<Language>,

    /// Base URL of the analysis service
    ///
    /// Default: from config or http://127.0.0.1:8000
    #[arg(long, value_name = "URL", env = "SURAKSHAK_SERVICE_URL")]
    pub service_url: Option<String>,

    /// Request timeout in seconds
    ///
    /// Without this flag (or a config value) requests wait indefinitely.
    #[arg(long, value_name = "SECS")]
    pub timeout: Option<u64>,

    /// Output format (text, markdown, json)
    #[arg(long, value_name = "FORMAT")]
    pub format: Option<OutputFormat>,

    /// Write the report to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Fail if any URL is rated at or above this risk level
    ///
    /// Useful for scripts. Exit code 2 when the threshold is reached.
    /// Values: low, medium, high
    #[arg(long, value_name = "LEVEL")]
    pub fail_on: Option<FailOnLevel>,

    /// Path to configuration file
    ///
    /// If not specified, looks for .surakshak.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (minimal output)
    #[arg(short, long)]
    pub quiet: bool,

    /// Check that the analysis service is reachable and exit
    #[arg(long)]
    pub check: bool,

    /// Generate a default .surakshak.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the report.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Terminal text (default)
    #[default]
    Text,
    /// Markdown format
    Markdown,
    /// JSON format
    Json,
}

/// Risk threshold for --fail-on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, clap::ValueEnum)]
pub enum FailOnLevel {
    Low,
    Medium,
    High,
}

impl FailOnLevel {
    /// Whether a reported risk level reaches this threshold.
    ///
    /// Unrecognized levels never do.
    pub fn is_reached_by(&self, level: &RiskLevel) -> bool {
        let threshold = match self {
            FailOnLevel::Low => RiskLevel::Low,
            FailOnLevel::Medium => RiskLevel::Medium,
            FailOnLevel::High => RiskLevel::High,
        };
        match (level.rank(), threshold.rank()) {
            (Some(rank), Some(min)) => rank >= min,
            _ => false,
        }
    }
}

impl Args {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    /// Validate the parsed arguments.
    pub fn validate(&self) -> Result<(), String> {
        // Skip validation for --init-config
        if self.init_config {
            return Ok(());
        }

        if let Some(ref url) = self.service_url {
            if !url.starts_with("http://") && !url.starts_with("https://") {
                return Err("Service URL must start with 'http://' or 'https://'".to_string());
            }
        }

        if let Some(timeout) = self.timeout {
            if timeout == 0 {
                return Err("Timeout must be at least 1 second".to_string());
            }
        }

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        Ok(())
    }

    /// Returns the log level based on verbosity settings.
    pub fn log_level(&self) -> tracing::Level {
        if self.quiet {
            tracing::Level::ERROR
        } else if self.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }
}
