//! Surakshak - scam and phishing URL checker
//!
//! A CLI client for the Surakshak analysis service. Each URL is submitted
//! through the analysis controller and the resulting trust score, risk
//! level and details are printed or written as a report.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error, or at least one URL could not be analyzed
//!   2 - A URL was rated at or above the --fail-on threshold

mod cli;
mod client;
mod config;
mod controller;
mod error;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use client::HttpAnalysisClient;
use config::{Config, CONFIG_FILE_NAME};
use controller::{AnalysisController, UiState};
use indicatif::{ProgressBar, ProgressStyle};
use report::{ReportMetadata, ScanEntry, ScanReport};
use std::io::IsTerminal;
use std::time::{Duration, Instant};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    init_logging(&args);

    info!("Surakshak v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    match run(args).await {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Run failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .surakshak.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(CONFIG_FILE_NAME);

    if path.exists() {
        eprintln!(
            "⚠️  {} already exists. Remove it first or edit it manually.",
            CONFIG_FILE_NAME
        );
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content)
        .with_context(|| format!("Failed to write {}", CONFIG_FILE_NAME))?;

    println!("✅ Created {} with default settings.", CONFIG_FILE_NAME);
    println!("   Edit it to set the service URL, timeout, language and output format.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so reports on stdout stay machine-readable.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to set tracing subscriber: {}", e);
    }
}

/// Load configuration, build the client, and dispatch. Returns the exit code.
async fn run(args: Args) -> Result<i32> {
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);
    config.validate()?;

    let client = HttpAnalysisClient::new((&config.service).into())
        .context("Failed to create HTTP client")?;

    if args.check {
        return handle_check(&client, &config).await;
    }

    run_scan(&args, &config, &client).await
}

/// Handle --check: probe the service root.
async fn handle_check(client: &HttpAnalysisClient, config: &Config) -> Result<i32> {
    println!("🩺 Checking analysis service at {}", config.service.base_url);

    match client.health_check().await {
        Ok(message) => {
            println!(
                "✅ Service is up{}",
                message.map(|m| format!(": {}", m)).unwrap_or_default()
            );
            Ok(0)
        }
        Err(e) => {
            warn!("Health check failed: {}", e);
            println!("❌ Service is not reachable: {}", e);
            Ok(1)
        }
    }
}

/// Analyze every URL on the command line and emit the report.
async fn run_scan(args: &Args, config: &Config, client: &HttpAnalysisClient) -> Result<i32> {
    let start_time = Instant::now();
    let analysis_date = Utc::now();
    let format = config.general.format;

    // Text goes straight to the terminal as each result arrives.
    let stream_text = format == OutputFormat::Text && args.output.is_none();
    let show_spinner = stream_text && !args.quiet && std::io::stderr().is_terminal();

    let mut controller = AnalysisController::new(config.general.language);
    let mut entries = Vec::with_capacity(args.urls.len());

    for url in &args.urls {
        controller.set_url(url.as_str());

        let spinner = show_spinner.then(|| analyzing_spinner(url.trim()));
        let state = controller.submit_with(client).await;
        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }

        if let UiState::Error(message) = state {
            debug!("{} -> {}", url.trim(), message);
        }

        let entry = if format == OutputFormat::Json {
            ScanEntry::capture_translated(&mut controller)
        } else {
            ScanEntry::capture(&controller)
        };
        if stream_text {
            println!("{}", report::generate_text_entry(&entry));
        }
        entries.push(entry);
    }

    controller.close();

    let urls_failed = entries.iter().filter(|e| e.is_failure()).count();
    let scan_report = ScanReport {
        metadata: ReportMetadata {
            service_url: config.service.base_url.clone(),
            language: config.general.language,
            analysis_date,
            urls_analyzed: entries.len(),
            urls_failed,
            duration_seconds: start_time.elapsed().as_secs_f64(),
        },
        entries,
    };

    if stream_text {
        if !args.quiet {
            println!(
                "📊 {} analyzed, {} failed in {:.1}s",
                scan_report.metadata.urls_analyzed,
                urls_failed,
                scan_report.metadata.duration_seconds
            );
        }
    } else {
        let output = match format {
            OutputFormat::Json => report::generate_json_report(&scan_report)?,
            OutputFormat::Markdown => report::generate_markdown_report(&scan_report),
            OutputFormat::Text => report::generate_text_report(&scan_report),
        };

        match args.output {
            Some(ref path) => {
                std::fs::write(path, &output)
                    .with_context(|| format!("Failed to write report to {}", path.display()))?;
                if !args.quiet {
                    println!("✅ Report saved to: {}", path.display());
                }
            }
            None => print!("{}", output),
        }
    }

    Ok(exit_code(args, &scan_report))
}

/// Exit code for a finished scan.
fn exit_code(args: &Args, scan_report: &ScanReport) -> i32 {
    if let Some(fail_level) = args.fail_on {
        let reached = scan_report
            .entries
            .iter()
            .filter_map(|e| e.result.as_ref())
            .any(|r| fail_level.is_reached_by(&r.risk_level));

        if reached {
            eprintln!(
                "\n⛔ URL rated at or above {:?} risk. Failing (exit code 2).",
                fail_level
            );
            return 2;
        }
    }

    if scan_report.metadata.urls_failed > 0 {
        1
    } else {
        0
    }
}

/// Spinner shown while a request is in flight.
fn analyzing_spinner(url: &str) -> ProgressBar {
    let pb = ProgressBar::new_spinner();
    match ProgressStyle::with_template("{spinner:.blue} {msg}") {
        Ok(style) => pb.set_style(style),
        Err(e) => debug!("Invalid spinner template: {}", e),
    }
    pb.set_message(format!("Analyzing {}...", url));
    pb.enable_steady_tick(Duration::from_millis(100));
    pb
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from {}", CONFIG_FILE_NAME);
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {:#}", e);
            Ok(Config::default())
        }
    }
}
