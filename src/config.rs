//! Configuration file handling.
//!
//! This module handles loading and merging configuration from
//! `.scrapestats.toml` files. The resulting [`Config`] is passed
//! explicitly to the renderers.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Default configuration file name, looked up in the working directory.
pub const CONFIG_FILE_NAME: &str = ".scrapestats.toml";

/// Root configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    /// General settings.
    #[serde(default)]
    pub general: GeneralConfig,

    /// Output formatting settings.
    #[serde(default)]
    pub display: DisplayConfig,

    /// Success-rate thresholds.
    #[serde(default)]
    pub quality: QualityConfig,
}

/// General application settings.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct GeneralConfig {
    /// Default output file path. Empty means stdout.
    #[serde(default)]
    pub output: String,

    /// Enable verbose logging by default.
    #[serde(default)]
    pub verbose: bool,
}

/// How numbers and tables are rendered.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DisplayConfig {
    /// Decimal places for percentages and rates.
    #[serde(default = "default_decimals")]
    pub decimals: usize,

    /// Rows shown in distribution tables.
    #[serde(default = "default_top_n")]
    pub top_n: usize,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            decimals: default_decimals(),
            top_n: default_top_n(),
        }
    }
}

fn default_decimals() -> usize {
    2
}

fn default_top_n() -> usize {
    10
}

/// Thresholds used to band success rates.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct QualityConfig {
    /// Rates at or above this are good.
    #[serde(default = "default_good_rate")]
    pub good_rate: f64,

    /// Rates at or above this (and below `good_rate`) are fair.
    #[serde(default = "default_fair_rate")]
    pub fair_rate: f64,
}

impl Default for QualityConfig {
    fn default() -> Self {
        Self {
            good_rate: default_good_rate(),
            fair_rate: default_fair_rate(),
        }
    }
}

fn default_good_rate() -> f64 {
    95.0
}

fn default_fair_rate() -> f64 {
    85.0
}

impl Config {
    /// Load configuration from a file path.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        let config: Config = toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))?;

        config.validate()?;
        Ok(config)
    }

    /// Try to load configuration from the default location.
    ///
    /// Returns `Ok(None)` if the file doesn't exist, `Err` if it exists but can't be parsed.
    pub fn load_default() -> Result<Option<Self>> {
        let default_path = Path::new(CONFIG_FILE_NAME);

        if default_path.exists() {
            Ok(Some(Self::load(default_path)?))
        } else {
            Ok(None)
        }
    }

    /// Check that thresholds are ordered and within 0..=100.
    pub fn validate(&self) -> Result<()> {
        let QualityConfig {
            good_rate,
            fair_rate,
        } = self.quality;

        if !(0.0..=100.0).contains(&good_rate) || !(0.0..=100.0).contains(&fair_rate) {
            anyhow::bail!("Quality thresholds must be between 0 and 100");
        }
        if fair_rate > good_rate {
            anyhow::bail!(
                "quality.fair_rate ({fair_rate}) must not exceed quality.good_rate ({good_rate})"
            );
        }
        if self.display.top_n == 0 {
            anyhow::bail!("display.top_n must be at least 1");
        }
        Ok(())
    }

    /// Merge this configuration with CLI arguments.
    ///
    /// CLI arguments take precedence over config file settings, but only
    /// when they were given explicitly.
    pub fn merge_with_args(&mut self, args: &crate::cli::Args) {
        if let Some(ref output) = args.output {
            self.general.output = output.display().to_string();
        }
        if let Some(top) = args.top {
            self.display.top_n = top;
        }
        if let Some(decimals) = args.decimals {
            self.display.decimals = decimals;
        }

        // Flags always override
        if args.verbose {
            self.general.verbose = true;
        }
    }

    /// Log level after merging: `--quiet` wins, then `verbose` from either source.
    pub fn log_level(&self, args: &crate::cli::Args) -> tracing::Level {
        if args.quiet {
            tracing::Level::ERROR
        } else if self.general.verbose || args.verbose {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        }
    }

    /// Output path, if the report should go to a file.
    pub fn output_path(&self) -> Option<&Path> {
        if self.general.output.is_empty() {
            None
        } else {
            Some(Path::new(&self.general.output))
        }
    }

    /// Generate a default configuration file content.
    pub fn default_toml() -> String {
        let config = Config::default();
        toml::to_string_pretty(&config).unwrap_or_else(|_| String::new())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(config.display.decimals, 2);
        assert_eq!(config.display.top_n, 10);
        assert_eq!(config.quality.good_rate, 95.0);
        assert_eq!(config.quality.fair_rate, 85.0);
        assert!(config.output_path().is_none());
    }

    #[test]
    fn test_parse_config() {
        let toml_content = r#"
[general]
output = "summary.md"
verbose = true

[display]
top_n = 5

[quality]
good_rate = 99.0
"#;

        let config: Config = toml::from_str(toml_content).unwrap();
        assert_eq!(config.general.output, "summary.md");
        assert!(config.general.verbose);
        assert_eq!(config.display.top_n, 5);
        assert_eq!(config.display.decimals, 2);
        assert_eq!(config.quality.good_rate, 99.0);
        assert_eq!(config.quality.fair_rate, 85.0);
        assert_eq!(config.output_path(), Some(Path::new("summary.md")));
    }

    #[test]
    fn test_validate_rejects_inverted_thresholds() {
        let mut config = Config::default();
        config.quality.fair_rate = 97.0;
        assert!(config.validate().is_err());

        config.quality.fair_rate = 50.0;
        config.quality.good_rate = 120.0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_load_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join(CONFIG_FILE_NAME);
        std::fs::write(&path, "[display]\ndecimals = 1\n").unwrap();

        let config = Config::load(&path).unwrap();
        assert_eq!(config.display.decimals, 1);

        std::fs::write(&path, "[display\n").unwrap();
        assert!(Config::load(&path).is_err());
    }

    #[test]
    fn test_log_level_honors_config_verbose() {
        use crate::cli::Args;
        use clap::Parser;

        let args = Args::try_parse_from(["scrapestats"]).unwrap();
        let mut config = Config::default();
        assert_eq!(config.log_level(&args), tracing::Level::INFO);

        config.general.verbose = true;
        assert_eq!(config.log_level(&args), tracing::Level::DEBUG);

        let quiet = Args::try_parse_from(["scrapestats", "--quiet"]).unwrap();
        assert_eq!(config.log_level(&quiet), tracing::Level::ERROR);

        let verbose = Args::try_parse_from(["scrapestats", "-v"]).unwrap();
        let mut merged = Config::default();
        merged.merge_with_args(&verbose);
        assert_eq!(merged.log_level(&verbose), tracing::Level::DEBUG);
    }

    #[test]
    fn test_default_toml_generation() {
        let toml_str = Config::default_toml();
        assert!(!toml_str.is_empty());
        assert!(toml_str.contains("[general]"));
        assert!(toml_str.contains("[display]"));
        assert!(toml_str.contains("[quality]"));
    }
}
