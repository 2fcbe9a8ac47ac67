//! Report metrics extraction.
//!
//! Each function here is a pure read of a [`Report`]. Missing sections and
//! keys fall back to zero, empty, or `None`; a present key with the wrong
//! JSON type is reported as [`ReportError::FieldType`] rather than hidden.

use super::derived::{percent, BYTES_PER_MB};
use crate::error::{ReportError, Result};
use crate::models::{
    Counts, DimensionStats, DuplicateStats, DuplicateSummary, FileSizeStats, OverviewMetrics,
    QualityIssueRow, QualityStats, QuantitativeStats, TemporalMetrics,
};
use crate::report::{Report, Section};
use chrono::{DateTime, NaiveDateTime, Utc};
use tracing::debug;

const FILE_SIZE_KEYS: [&str; 2] = ["file_size", "file_size_bytes"];
const HASH_KEYS: [&str; 2] = ["hashes", "hash_analysis"];
const BREAKDOWN_KEYS: [&str; 2] = ["per_class", "classes"];

/// Headline numbers.
///
/// Fails with [`ReportError::MissingData`] when `quantitative_statistics`
/// is absent; every other field defaults to 0.
pub fn overview_metrics(report: &Report) -> Result<OverviewMetrics> {
    if !report.root().contains("quantitative_statistics") {
        return Err(ReportError::MissingData(
            "report has no quantitative_statistics section".to_string(),
        ));
    }

    let quant = report.quantitative()?;
    let quality = quality_stats(report)?;
    let file_size = quant.section_any(&FILE_SIZE_KEYS)?;

    Ok(OverviewMetrics {
        total_images: quant.count("total_image_count")?,
        total_classes: quant.len_of("images_per_class")?,
        total_categories: quant.len_of("images_per_category")?,
        total_formats: quant.len_of("formats")?,
        success_rate: quality.success_rate,
        total_urls_found: quality.total_urls_found,
        total_downloaded: quality.total_downloaded,
        avg_file_size_mb: file_size.float("average_bytes")? / BYTES_PER_MB,
    })
}

/// `file_size` statistics (also read from `file_size_bytes`).
pub fn file_size_stats(report: &Report) -> Result<FileSizeStats> {
    let section = report.quantitative()?.section_any(&FILE_SIZE_KEYS)?;
    if !section.is_present() {
        debug!("No file size statistics, using defaults");
    }

    Ok(FileSizeStats {
        average_bytes: section.float("average_bytes")?,
        min_bytes: section.count("min_bytes")?,
        max_bytes: section.count("max_bytes")?,
        total_bytes: section.count("total_bytes")?,
    })
}

/// `dimensions` statistics.
pub fn dimension_stats(report: &Report) -> Result<DimensionStats> {
    let section = report.quantitative()?.section("dimensions")?;

    Ok(DimensionStats {
        avg_width: section.float("avg_width")?,
        avg_height: section.float("avg_height")?,
        min_width: section.count("min_width")?,
        min_height: section.count("min_height")?,
        max_width: section.count("max_width")?,
        max_height: section.count("max_height")?,
    })
}

/// `formats` and `color_modes`, in report order.
pub fn quantitative_stats(report: &Report) -> Result<QuantitativeStats> {
    let quant = report.quantitative()?;

    Ok(QuantitativeStats {
        formats: Counts::new(quant.counts("formats")?),
        color_modes: Counts::new(quant.counts("color_modes")?),
    })
}

/// Download timing.
///
/// Reads the flat keys first and falls back to the nested `time_span` /
/// `average_interval` layout. `avg_interval_minutes` is derived from the
/// seconds when absent; `duration_hours` is derived from `earliest` and
/// `latest` when absent and both timestamps parse.
pub fn temporal_metrics(report: &Report) -> Result<TemporalMetrics> {
    let temporal = report.temporal()?;
    let span = temporal.section("time_span")?;
    let interval = temporal.section("average_interval")?;

    let earliest = or_fallback(temporal.text("earliest")?, || span.text("earliest"))?;
    let latest = or_fallback(temporal.text("latest")?, || span.text("latest"))?;

    let avg_interval_seconds = or_fallback(temporal.opt_float("avg_interval_seconds")?, || {
        interval.opt_float("seconds")
    })?
    .unwrap_or(0.0);

    let avg_interval_minutes = or_fallback(temporal.opt_float("avg_interval_minutes")?, || {
        interval.opt_float("minutes")
    })?
    .unwrap_or(avg_interval_seconds / 60.0);

    let duration_hours = match or_fallback(temporal.opt_float("duration_hours")?, || {
        span.opt_float("duration_hours")
    })? {
        Some(hours) => hours,
        None => span_hours(earliest.as_deref(), latest.as_deref()),
    };

    Ok(TemporalMetrics {
        earliest,
        latest,
        duration_hours,
        avg_interval_seconds,
        avg_interval_minutes,
    })
}

/// Hash-based duplicate counts (also read from `hash_analysis`).
pub fn duplicate_stats(report: &Report) -> Result<DuplicateStats> {
    let hashes = report.quantitative()?.section_any(&HASH_KEYS)?;
    if !hashes.is_present() {
        debug!("No hash statistics, duplicate counts default to 0");
    }
    let summary = hashes.section("duplicate_summary")?;

    Ok(DuplicateStats {
        total_count: hashes.count("total_count")?,
        unique_count: hashes.count("unique_count")?,
        duplicate_count: hashes.count("duplicate_count")?,
        duplicate_summary: DuplicateSummary {
            inter_class_duplicate_hashes: summary.count("inter_class_duplicate_hashes")?,
            intra_class_duplicate_hashes: summary.count("intra_class_duplicate_hashes")?,
            total_duplicate_hashes: summary.count("total_duplicate_hashes")?,
            total_duplicate_files: summary.count("total_duplicate_files")?,
        },
    })
}

/// Top-level `quality_checks` numbers.
///
/// `total_downloaded` defaults to found minus missing, and `success_rate`
/// to the matching percentage, when the report does not record them.
pub fn quality_stats(report: &Report) -> Result<QualityStats> {
    let quality = report.quality()?;

    let total_urls_found = quality.count("total_urls_found")?;
    let missing = quality.count("urls_found_but_missing_metadata")?;
    let retained = total_urls_found.saturating_sub(missing);

    let total_downloaded = quality.opt_count("total_downloaded")?.unwrap_or(retained);
    let success_rate = quality
        .opt_float("success_rate")?
        .unwrap_or_else(|| percent(retained as f64, total_urls_found as f64));

    Ok(QualityStats {
        total_urls_found,
        total_downloaded,
        urls_found_but_missing_metadata: missing,
        success_rate,
        download_efficiency: percent(total_downloaded as f64, total_urls_found as f64),
    })
}

/// Classes with missing downloads, in the order the report lists them.
///
/// The breakdown is read from the `per_class` (or `classes`) mapping when
/// present, otherwise from the `classes_with_issues` array.
pub fn quality_issues_table(report: &Report) -> Result<Vec<QualityIssueRow>> {
    let quality = report.quality()?;
    let breakdown = quality.section_any(&BREAKDOWN_KEYS)?;
    let mut rows = Vec::new();

    if breakdown.is_present() {
        for (class, value) in breakdown.entries() {
            let entry = Section::of(format!("{}.{}", breakdown.path(), class), value)?;
            if let Some(row) = issue_row(class.clone(), &entry)? {
                rows.push(row);
            }
        }
    } else {
        let items = quality.array("classes_with_issues")?;
        for (i, item) in items.iter().enumerate() {
            let path = format!("{}.classes_with_issues[{}]", quality.path(), i);
            let entry = Section::of(path, item)?;
            let class = entry.text("class")?.unwrap_or_default();
            if let Some(row) = issue_row(class, &entry)? {
                rows.push(row);
            }
        }
    }

    debug!("{} classes with missing downloads", rows.len());
    Ok(rows)
}

/// Builds a row when the class is short of downloads.
///
/// With both counts recorded the shortfall is `urls_found - urls_downloaded`;
/// the explicit `missing_downloads` is only used when a count is absent.
fn issue_row(class: String, entry: &Section<'_>) -> Result<Option<QualityIssueRow>> {
    let found = entry.opt_count_any(&["urls_found", "total_urls_found"])?;
    let downloaded = entry.opt_count_any(&["urls_downloaded", "total_downloaded"])?;

    let missing_downloads = match (found, downloaded) {
        (Some(found), Some(downloaded)) => found.saturating_sub(downloaded),
        _ => entry
            .opt_count_any(&["missing_downloads", "urls_found_but_missing_metadata"])?
            .unwrap_or_else(|| found.unwrap_or(0).saturating_sub(downloaded.unwrap_or(0))),
    };

    if missing_downloads == 0 {
        return Ok(None);
    }

    let urls_found = found.unwrap_or(0);
    let urls_downloaded = downloaded.unwrap_or(0);

    Ok(Some(QualityIssueRow {
        class,
        urls_found,
        urls_downloaded,
        missing_downloads,
        success_rate: percent(urls_downloaded as f64, urls_found as f64),
    }))
}

fn or_fallback<T>(
    value: Option<T>,
    fallback: impl FnOnce() -> Result<Option<T>>,
) -> Result<Option<T>> {
    match value {
        Some(v) => Ok(Some(v)),
        None => fallback(),
    }
}

/// Parse an ISO-8601 timestamp, with or without an offset (naive is read as UTC).
pub(crate) fn parse_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .map(|naive| naive.and_utc())
}

fn span_hours(earliest: Option<&str>, latest: Option<&str>) -> f64 {
    match (earliest.and_then(parse_timestamp), latest.and_then(parse_timestamp)) {
        (Some(start), Some(end)) => {
            let hours = (end - start).num_milliseconds() as f64 / 3_600_000.0;
            hours.max(0.0)
        }
        _ => 0.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn report(value: serde_json::Value) -> Report {
        Report::from_value(value).unwrap()
    }

    #[test]
    fn test_overview_counts_classes() {
        let r = report(json!({
            "quantitative_statistics": {
                "total_image_count": 8,
                "images_per_class": {"cat": 3, "dog": 5},
                "images_per_category": {"Go": 8},
                "file_size": {"average_bytes": 2097152.0}
            }
        }));

        let overview = overview_metrics(&r).unwrap();
        assert_eq!(overview.total_images, 8);
        assert_eq!(overview.total_classes, 2);
        assert_eq!(overview.total_categories, 1);
        assert_eq!(overview.avg_file_size_mb, 2.0);
        assert_eq!(overview.success_rate, 0.0);
    }

    #[test]
    fn test_overview_requires_quantitative_section() {
        let err = overview_metrics(&report(json!({"quality_checks": {}}))).unwrap_err();
        assert!(matches!(err, ReportError::MissingData(_)));

        let err = overview_metrics(&report(json!({"quantitative_statistics": null}))).unwrap_err();
        assert!(matches!(err, ReportError::MissingData(_)));
    }

    #[test]
    fn test_overview_rejects_list_for_mapping() {
        let r = report(json!({
            "quantitative_statistics": {"images_per_class": [3, 5]}
        }));
        let err = overview_metrics(&r).unwrap_err();
        assert!(matches!(err, ReportError::FieldType { .. }));
    }

    #[test]
    fn test_partial_report_defaults() {
        let r = report(json!({}));
        assert_eq!(file_size_stats(&r).unwrap(), FileSizeStats::default());
        assert_eq!(dimension_stats(&r).unwrap(), DimensionStats::default());
        assert_eq!(duplicate_stats(&r).unwrap(), DuplicateStats::default());
        assert_eq!(temporal_metrics(&r).unwrap(), TemporalMetrics::default());
        assert!(quantitative_stats(&r).unwrap().formats.is_empty());
        assert!(quality_issues_table(&r).unwrap().is_empty());

        let quality = quality_stats(&r).unwrap();
        assert_eq!(quality.success_rate, 0.0);
        assert_eq!(quality.download_efficiency, 0.0);
    }

    #[test]
    fn test_file_size_alias() {
        let r = report(json!({
            "quantitative_statistics": {
                "file_size_bytes": {
                    "average_bytes": 1536.5,
                    "min_bytes": 10,
                    "max_bytes": 4000,
                    "total_bytes": 9000
                }
            }
        }));
        let stats = file_size_stats(&r).unwrap();
        assert_eq!(stats.average_bytes, 1536.5);
        assert_eq!(stats.min_bytes, 10);
        assert_eq!(stats.total_bytes, 9000);
    }

    #[test]
    fn test_duplicate_stats_from_hash_analysis() {
        let r = report(json!({
            "quantitative_statistics": {
                "hash_analysis": {
                    "unique_count": 90,
                    "duplicate_count": 10,
                    "total_count": 100,
                    "duplicate_summary": {
                        "inter_class_duplicate_hashes": 3,
                        "intra_class_duplicate_hashes": 4,
                        "total_duplicate_hashes": 7,
                        "total_duplicate_files": 17
                    }
                }
            }
        }));
        let stats = duplicate_stats(&r).unwrap();
        assert_eq!(stats.unique_count + stats.duplicate_count, stats.total_count);
        assert_eq!(stats.duplicate_summary.total_duplicate_files, 17);
        assert!(stats.is_consistent());
    }

    #[test]
    fn test_temporal_recomputes_minutes() {
        let r = report(json!({
            "temporal_statistics": {
                "earliest": "2025-06-01T10:00:00",
                "latest": "2025-06-01T12:00:00",
                "duration_hours": 2.0,
                "avg_interval_seconds": 90.0
            }
        }));
        let t = temporal_metrics(&r).unwrap();
        assert_eq!(t.avg_interval_minutes, 1.5);
        assert_eq!(t.duration_hours, 2.0);
        assert_eq!(t.earliest.as_deref(), Some("2025-06-01T10:00:00"));
    }

    #[test]
    fn test_temporal_nested_layout() {
        let r = report(json!({
            "temporal_statistics": {
                "time_span": {
                    "earliest": "2025-06-01T10:00:00+00:00",
                    "latest": "2025-06-02T22:00:00+00:00",
                    "duration_hours": 36.0
                },
                "average_interval": {"seconds": 30.0, "minutes": 0.5}
            }
        }));
        let t = temporal_metrics(&r).unwrap();
        assert_eq!(t.duration_hours, 36.0);
        assert_eq!(t.avg_interval_seconds, 30.0);
        assert_eq!(t.avg_interval_minutes, 0.5);
        assert!(t.latest.is_some());
    }

    #[test]
    fn test_temporal_derives_duration_from_timestamps() {
        let r = report(json!({
            "temporal_statistics": {
                "earliest": "2025-06-01T10:00:00Z",
                "latest": "2025-06-01T11:30:00Z"
            }
        }));
        assert_eq!(temporal_metrics(&r).unwrap().duration_hours, 1.5);

        let r = report(json!({
            "temporal_statistics": {"earliest": "yesterday", "latest": "today"}
        }));
        assert_eq!(temporal_metrics(&r).unwrap().duration_hours, 0.0);
    }

    #[test]
    fn test_quality_stats_zero_urls() {
        let r = report(json!({
            "quality_checks": {"total_urls_found": 0, "total_downloaded": 0}
        }));
        let q = quality_stats(&r).unwrap();
        assert_eq!(q.download_efficiency, 0.0);
        assert_eq!(q.success_rate, 0.0);
    }

    #[test]
    fn test_quality_stats_derives_missing_fields() {
        let r = report(json!({
            "quality_checks": {"total_urls_found": 200, "urls_found_but_missing_metadata": 20}
        }));
        let q = quality_stats(&r).unwrap();
        assert_eq!(q.total_downloaded, 180);
        assert_eq!(q.success_rate, 90.0);
        assert_eq!(q.download_efficiency, 90.0);
    }

    #[test]
    fn test_quality_issues_from_mapping_keeps_order() {
        let r = report(json!({
            "quality_checks": {
                "per_class": {
                    "zebra": {"urls_found": 10, "urls_downloaded": 5},
                    "apple": {"urls_found": 4, "urls_downloaded": 4},
                    "mango": {"urls_found": 3, "urls_downloaded": 0},
                    "kiwi": {"urls_found": 0, "urls_downloaded": 0}
                }
            }
        }));
        let rows = quality_issues_table(&r).unwrap();
        let classes: Vec<_> = rows.iter().map(|r| r.class.as_str()).collect();
        assert_eq!(classes, vec!["zebra", "mango"]);
        assert_eq!(rows[0].missing_downloads, 5);
        assert_eq!(rows[0].success_rate, 50.0);
        assert_eq!(rows[1].missing_downloads, 3);
        assert_eq!(rows[1].success_rate, 0.0);
    }

    #[test]
    fn test_quality_issues_counts_override_recorded_missing() {
        let r = report(json!({
            "quality_checks": {
                "per_class": {
                    "equal": {"urls_found": 5, "urls_downloaded": 5, "missing_downloads": 2},
                    "short": {"urls_found": 10, "urls_downloaded": 4, "missing_downloads": 0}
                }
            }
        }));
        let rows = quality_issues_table(&r).unwrap();
        let got: Vec<_> = rows
            .iter()
            .map(|r| (r.class.as_str(), r.missing_downloads))
            .collect();
        assert_eq!(got, vec![("short", 6)]);
    }

    #[test]
    fn test_quality_issues_recorded_missing_without_counts() {
        let r = report(json!({
            "quality_checks": {
                "classes_with_issues": [
                    {"class": "Go/bus", "urls_found": 12, "missing_downloads": 4},
                    {"class": "Go/van", "missing_downloads": 0}
                ]
            }
        }));
        let rows = quality_issues_table(&r).unwrap();
        assert_eq!(rows.len(), 1);
        assert_eq!(rows[0].class, "Go/bus");
        assert_eq!(rows[0].missing_downloads, 4);
        assert_eq!(rows[0].urls_downloaded, 0);
    }

    #[test]
    fn test_quality_issues_from_array() {
        let r = report(json!({
            "quality_checks": {
                "classes_with_issues": [
                    {
                        "class": "Go/car",
                        "urls_found": 40,
                        "urls_downloaded": 30,
                        "missing_downloads": 10
                    },
                    {"class": "Grow/tree", "urls_found": 8, "urls_downloaded": 2}
                ]
            }
        }));
        let rows = quality_issues_table(&r).unwrap();
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].class, "Go/car");
        assert_eq!(rows[0].success_rate, 75.0);
        assert_eq!(rows[1].missing_downloads, 6);
    }

    #[test]
    fn test_quality_issues_empty_when_all_downloaded() {
        let r = report(json!({
            "quality_checks": {
                "per_class": {
                    "a": {"urls_found": 3, "urls_downloaded": 3},
                    "b": {"urls_found": 0, "urls_downloaded": 0}
                }
            }
        }));
        assert!(quality_issues_table(&r).unwrap().is_empty());
    }

    #[test]
    fn test_parse_timestamp_variants() {
        assert!(parse_timestamp("2025-06-01T10:00:00Z").is_some());
        assert!(parse_timestamp("2025-06-01T10:00:00.123456+02:00").is_some());
        assert!(parse_timestamp("2025-06-01T10:00:00.123456").is_some());
        assert!(parse_timestamp("2025-06-01 10:00:00").is_some());
        assert!(parse_timestamp("June 1st").is_none());
    }
}
