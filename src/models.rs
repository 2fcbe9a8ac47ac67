//! Data models for extracted report metrics.
//!
//! This module contains the typed results returned by the extractor
//! and the derived-metric helpers, plus the [`AnalysisSummary`] that
//! bundles all of them for rendering.

use crate::analysis;
use crate::error::Result;
use crate::report::Report;
use serde::ser::Serializer;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Ordered name → count mapping (formats, color modes, classes, ...).
///
/// Keeps the report's key order and serializes as a JSON object.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Counts(Vec<(String, u64)>);

impl Counts {
    pub fn new(entries: Vec<(String, u64)>) -> Self {
        Self(entries)
    }

    /// Count recorded for `name`, if any.
    pub fn get(&self, name: &str) -> Option<u64> {
        self.0.iter().find(|(n, _)| n == name).map(|(_, c)| *c)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all counts, saturating at `u64::MAX`.
    pub fn total(&self) -> u64 {
        self.0.iter().fold(0u64, |acc, (_, c)| acc.saturating_add(*c))
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, u64)> {
        self.0.iter().map(|(n, c)| (n.as_str(), *c))
    }

    /// Rows in document order.
    pub fn rows(&self) -> Vec<CountRow> {
        self.iter()
            .map(|(name, count)| CountRow {
                name: name.to_string(),
                count,
            })
            .collect()
    }
}

impl Serialize for Counts {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.collect_map(self.0.iter().map(|(name, count)| (name, count)))
    }
}

/// One row of a distribution table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountRow {
    pub name: String,
    pub count: u64,
}

/// Headline numbers for a report.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OverviewMetrics {
    /// `total_image_count` as recorded (not cross-checked against the per-class counts).
    pub total_images: u64,
    /// Number of entries in `images_per_class`.
    pub total_classes: usize,
    /// Number of entries in `images_per_category`.
    pub total_categories: usize,
    /// Number of distinct image formats.
    pub total_formats: usize,
    /// Overall download success rate in percent.
    pub success_rate: f64,
    pub total_urls_found: u64,
    pub total_downloaded: u64,
    /// Average file size in MiB.
    pub avg_file_size_mb: f64,
}

/// File size statistics in bytes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FileSizeStats {
    pub average_bytes: f64,
    pub min_bytes: u64,
    pub max_bytes: u64,
    pub total_bytes: u64,
}

/// Image dimension statistics in pixels.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DimensionStats {
    pub avg_width: f64,
    pub avg_height: f64,
    pub min_width: u64,
    pub min_height: u64,
    pub max_width: u64,
    pub max_height: u64,
}

/// Format and color-mode distributions.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct QuantitativeStats {
    pub formats: Counts,
    pub color_modes: Counts,
}

/// Download timing.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TemporalMetrics {
    pub earliest: Option<String>,
    pub latest: Option<String>,
    pub duration_hours: f64,
    pub avg_interval_seconds: f64,
    pub avg_interval_minutes: f64,
}

/// Counts of duplicated hashes by kind.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateSummary {
    /// Hashes shared by files in more than one class.
    pub inter_class_duplicate_hashes: u64,
    /// Hashes repeated within a single class.
    pub intra_class_duplicate_hashes: u64,
    pub total_duplicate_hashes: u64,
    /// Files carrying any duplicated hash.
    pub total_duplicate_files: u64,
}

/// Hash-based duplicate detection results.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DuplicateStats {
    pub total_count: u64,
    pub unique_count: u64,
    pub duplicate_count: u64,
    pub duplicate_summary: DuplicateSummary,
}

impl DuplicateStats {
    /// Whether `unique_count + duplicate_count == total_count`.
    ///
    /// Reports without any hashes are trivially consistent.
    pub fn is_consistent(&self) -> bool {
        self.total_count == 0
            || self.unique_count.checked_add(self.duplicate_count) == Some(self.total_count)
    }
}

/// Overall download quality.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct QualityStats {
    pub total_urls_found: u64,
    pub total_downloaded: u64,
    pub urls_found_but_missing_metadata: u64,
    /// Success rate in percent, as recorded by the producer.
    pub success_rate: f64,
    /// `total_downloaded / total_urls_found` in percent.
    pub download_efficiency: f64,
}

/// A class that is missing some of its downloads.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QualityIssueRow {
    pub class: String,
    pub urls_found: u64,
    pub urls_downloaded: u64,
    pub missing_downloads: u64,
    /// `urls_downloaded / urls_found` in percent.
    pub success_rate: f64,
}

/// Uniqueness of downloaded content.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct HashEfficiency {
    pub uniqueness_rate: f64,
    pub duplicate_rate: f64,
    pub efficiency_score: f64,
}

/// Share of the dataset taken up by duplicated files.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DuplicateImpact {
    pub total_images: u64,
    pub duplicate_files: u64,
    pub duplicate_hashes: u64,
    /// Percentage of images that could be dropped as duplicates.
    pub storage_saved_pct: f64,
}

/// Scraping throughput.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Throughput {
    pub images_per_hour: f64,
    pub images_per_minute: f64,
    /// Rate implied by the average download interval.
    pub theoretical_per_hour: f64,
    /// Actual rate as a percentage of the theoretical one.
    pub efficiency: f64,
}

/// Success-rate band used to flag classes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum RateBand {
    /// Below the fair threshold
    Poor,
    /// Between the fair and good thresholds
    Fair,
    /// At or above the good threshold
    Good,
}

impl fmt::Display for RateBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RateBand::Poor => write!(f, "Poor"),
            RateBand::Fair => write!(f, "Fair"),
            RateBand::Good => write!(f, "Good"),
        }
    }
}

impl RateBand {
    /// Classify a success rate against the good/fair thresholds.
    pub fn classify(rate: f64, good: f64, fair: f64) -> Self {
        if rate >= good {
            RateBand::Good
        } else if rate >= fair {
            RateBand::Fair
        } else {
            RateBand::Poor
        }
    }

    /// Returns an emoji representation of the band.
    pub fn emoji(&self) -> &'static str {
        match self {
            RateBand::Good => "🟢",
            RateBand::Fair => "🟡",
            RateBand::Poor => "🔴",
        }
    }
}

/// Everything the renderers need, extracted once from a report.
#[derive(Debug, Clone, Serialize)]
pub struct AnalysisSummary {
    pub generated_at: Option<String>,
    pub overview: OverviewMetrics,
    pub file_size: FileSizeStats,
    pub dimensions: DimensionStats,
    pub aspect_ratio: f64,
    pub images_per_class: Counts,
    pub images_per_category: Counts,
    pub quantitative: QuantitativeStats,
    pub duplicates: DuplicateStats,
    pub hash_efficiency: HashEfficiency,
    pub duplicate_impact: DuplicateImpact,
    pub temporal: TemporalMetrics,
    pub throughput: Throughput,
    pub quality: QualityStats,
    pub quality_issues: Vec<QualityIssueRow>,
}

impl AnalysisSummary {
    /// Run every extractor over `report`.
    pub fn from_report(report: &Report) -> Result<Self> {
        let overview = analysis::overview_metrics(report)?;
        let dimensions = analysis::dimension_stats(report)?;
        let duplicates = analysis::duplicate_stats(report)?;
        let temporal = analysis::temporal_metrics(report)?;

        Ok(Self {
            generated_at: report.generated_at()?,
            file_size: analysis::file_size_stats(report)?,
            aspect_ratio: analysis::aspect_ratio(&dimensions),
            dimensions,
            images_per_class: analysis::class_distribution(report)?,
            images_per_category: analysis::category_distribution(report)?,
            quantitative: analysis::quantitative_stats(report)?,
            hash_efficiency: analysis::hash_efficiency(&duplicates),
            duplicate_impact: analysis::duplicate_impact(&duplicates, &overview),
            duplicates,
            throughput: analysis::throughput(&temporal, overview.total_images),
            temporal,
            quality: analysis::quality_stats(report)?,
            quality_issues: analysis::quality_issues_table(report)?,
            overview,
        })
    }
}
