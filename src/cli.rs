//! Command-line interface argument parsing.
//!
//! This module handles all CLI argument parsing using clap,
//! including validation and default values.

use clap::Parser;
use std::path::PathBuf;

/// ScrapeStats - summary statistics for image-scraper reports
///
/// Reads the JSON report of a scraping run and prints overview, file size,
/// duplicate, timing and download-quality statistics.
///
/// Examples:
///   scrapestats report.json
///   scrapestats report.json --format markdown -o summary.md
///   scrapestats report.json --format json --fail-below 90
///   scrapestats --init-config
#[derive(Parser, Debug, Clone)]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Args {
    /// Path to the report JSON file
    #[arg(value_name = "REPORT", default_value = "report.json", env = "SCRAPESTATS_REPORT")]
    pub report: PathBuf,

    /// Write the output to a file instead of stdout
    #[arg(short, long, value_name = "FILE")]
    pub output: Option<PathBuf>,

    /// Output format (text, markdown, json)
    #[arg(long, default_value = "text", value_name = "FORMAT")]
    pub format: OutputFormat,

    /// Path to configuration file
    ///
    /// If not specified, looks for .scrapestats.toml in the current directory
    #[arg(short, long, value_name = "FILE")]
    pub config: Option<PathBuf>,

    /// Enable verbose logging output
    #[arg(short, long)]
    pub verbose: bool,

    /// Run in quiet mode (errors only)
    #[arg(short, long)]
    pub quiet: bool,

    /// Rows shown in distribution tables
    #[arg(long, value_name = "COUNT")]
    pub top: Option<usize>,

    /// Decimal places for percentages
    #[arg(long, value_name = "DIGITS")]
    pub decimals: Option<usize>,

    /// Exit with code 2 when the overall success rate is below this percentage
    ///
    /// Useful for CI pipelines that gate on scrape quality.
    #[arg(long, value_name = "RATE")]
    pub fail_below: Option<f64>,

    /// Generate a default .scrapestats.toml configuration file
    #[arg(long)]
    pub init_config: bool,
}

/// Output format for the summary.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, clap::ValueEnum)]
pub enum OutputFormat {
    /// Console text (default)
    #[default]
    Text,
    /// Markdown document
    Markdown,
    /// JSON document
    Json,
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

        if self.verbose && self.quiet {
            return Err("Cannot use both --verbose and --quiet".to_string());
        }

        if self.top == Some(0) {
            return Err("--top must be at least 1".to_string());
        }

        if let Some(decimals) = self.decimals {
            if decimals > 6 {
                return Err("--decimals must be at most 6".to_string());
            }
        }

        if let Some(rate) = self.fail_below {
            if !(0.0..=100.0).contains(&rate) {
                return Err("--fail-below must be between 0 and 100".to_string());
            }
        }

        Ok(())
    }
}
