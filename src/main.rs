//! ScrapeStats - summary statistics for image-scraper reports
//!
//! Reads the JSON report of a scraping run and renders overview, file,
//! duplicate, timing and quality statistics as text, Markdown or JSON.
//!
//! Exit codes:
//!   0 - Success (success rate at or above --fail-below, or no --fail-below set)
//!   1 - Runtime error (unreadable report, bad config, etc.)
//!   2 - Overall success rate below --fail-below

use anyhow::{Context, Result};
use scrapestats::cli::{Args, OutputFormat};
use scrapestats::config::{Config, CONFIG_FILE_NAME};
use scrapestats::report::{self, format_percent};
use scrapestats::{AnalysisSummary, Report};
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
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

    // Load configuration before logging so its verbosity applies
    let (mut config, source) = match load_config(&args) {
        Ok(loaded) => loaded,
        Err(e) => {
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    };
    config.merge_with_args(&args);

    // Initialize logging
    init_logging(config.log_level(&args));

    info!("ScrapeStats v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);
    source.log();

    match run(&args, &config) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Summary failed: {:#}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .scrapestats.toml.
fn handle_init_config() -> Result<()> {
    let path = Path::new(CONFIG_FILE_NAME);

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
    println!("   Edit it to customize output, table sizes and quality thresholds.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
///
/// Logs go to stderr so rendered output on stdout stays clean.
fn init_logging(level: tracing::Level) {
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

/// Load, summarize and render the report. Returns exit code (0 or 2).
fn run(args: &Args, config: &Config) -> Result<i32> {
    let start_time = Instant::now();

    let report = Report::load(&args.report)?;
    let summary = AnalysisSummary::from_report(&report)?;

    if !summary.duplicates.is_consistent() {
        warn!(
            "Hash counts disagree: unique {} + duplicate {} != total {}",
            summary.duplicates.unique_count,
            summary.duplicates.duplicate_count,
            summary.duplicates.total_count
        );
    }

    let output = match args.format {
        OutputFormat::Text => report::generate_text_summary(&summary, &config.display),
        OutputFormat::Markdown => report::generate_markdown_report(&summary, config),
        OutputFormat::Json => report::generate_json_report(&summary)?,
    };

    match config.output_path() {
        Some(path) => {
            std::fs::write(path, &output)
                .with_context(|| format!("Failed to write summary to {}", path.display()))?;
            info!("Summary saved to: {}", path.display());
        }
        None => println!("{}", output),
    }

    debug!("Finished in {:.3}s", start_time.elapsed().as_secs_f64());

    // Check --fail-below threshold
    if let Some(threshold) = args.fail_below {
        let rate = summary.quality.success_rate;
        if rate < threshold {
            eprintln!(
                "\n⛔ Success rate {} is below {}. Failing (exit code 2).",
                format_percent(rate, config.display.decimals),
                format_percent(threshold, config.display.decimals)
            );
            return Ok(2);
        }
    }

    Ok(0)
}

/// Where the configuration came from, reported once logging is up.
enum ConfigSource {
    Explicit(PathBuf),
    DefaultFile,
    Builtin,
    Fallback(anyhow::Error),
}

impl ConfigSource {
    fn log(&self) {
        match self {
            ConfigSource::Explicit(path) => info!("Loaded config from: {}", path.display()),
            ConfigSource::DefaultFile => info!("Loaded default config from {}", CONFIG_FILE_NAME),
            ConfigSource::Builtin => debug!("No config file found, using defaults"),
            ConfigSource::Fallback(e) => warn!("Failed to load config: {:#}", e),
        }
    }
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<(Config, ConfigSource)> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        let config = Config::load(config_path)?;
        return Ok((config, ConfigSource::Explicit(config_path.clone())));
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => Ok((config, ConfigSource::DefaultFile)),
        Ok(None) => Ok((Config::default(), ConfigSource::Builtin)),
        Err(e) => Ok((Config::default(), ConfigSource::Fallback(e))),
    }
}
