//! Derived metrics and distribution tables.
//!
//! Every ratio here goes through [`ratio`] or [`percent`], so a zero
//! denominator yields 0 instead of NaN or infinity.

use crate::error::Result;
use crate::models::{
    CountRow, Counts, DimensionStats, DuplicateImpact, DuplicateStats, FileSizeStats,
    HashEfficiency, OverviewMetrics, TemporalMetrics, Throughput,
};
use crate::report::Report;

/// Bytes in one MiB.
pub const BYTES_PER_MB: f64 = 1024.0 * 1024.0;

/// `numerator / denominator`, or 0 when the result would not be finite.
pub fn ratio(numerator: f64, denominator: f64) -> f64 {
    if denominator == 0.0 {
        return 0.0;
    }
    let value = numerator / denominator;
    if value.is_finite() {
        value
    } else {
        0.0
    }
}

/// `100 * numerator / denominator`, guarded like [`ratio`].
pub fn percent(numerator: f64, denominator: f64) -> f64 {
    ratio(numerator, denominator) * 100.0
}

/// Images per class, in report order.
pub fn class_distribution(report: &Report) -> Result<Counts> {
    Ok(Counts::new(report.quantitative()?.counts("images_per_class")?))
}

/// Images per category, in report order.
pub fn category_distribution(report: &Report) -> Result<Counts> {
    Ok(Counts::new(
        report.quantitative()?.counts("images_per_category")?,
    ))
}

/// Formats with upper-cased names, most common first.
pub fn format_distribution(report: &Report) -> Result<Vec<CountRow>> {
    Ok(format_rows(&Counts::new(
        report.quantitative()?.counts("formats")?,
    )))
}

/// Color modes, most common first.
pub fn color_mode_distribution(report: &Report) -> Result<Vec<CountRow>> {
    Ok(color_mode_rows(&Counts::new(
        report.quantitative()?.counts("color_modes")?,
    )))
}

/// Table rows for already-extracted formats, as in [`format_distribution`].
pub fn format_rows(formats: &Counts) -> Vec<CountRow> {
    let mut rows: Vec<CountRow> = formats
        .iter()
        .map(|(name, count)| CountRow {
            name: name.to_uppercase(),
            count,
        })
        .collect();
    sort_by_count(&mut rows);
    rows
}

/// Table rows for already-extracted color modes, as in [`color_mode_distribution`].
pub fn color_mode_rows(modes: &Counts) -> Vec<CountRow> {
    let mut rows = modes.rows();
    sort_by_count(&mut rows);
    rows
}

/// Sort rows by count, highest first. Ties keep their original order.
pub fn sort_by_count(rows: &mut [CountRow]) {
    rows.sort_by(|a, b| b.count.cmp(&a.count));
}

/// The `n` largest rows.
pub fn top_n(rows: &[CountRow], n: usize) -> Vec<CountRow> {
    let mut sorted = rows.to_vec();
    sort_by_count(&mut sorted);
    sorted.truncate(n);
    sorted
}

/// Uniqueness and duplicate rates of the hashed images.
pub fn hash_efficiency(stats: &DuplicateStats) -> HashEfficiency {
    let total = stats.total_count as f64;
    let duplicate_rate = percent(stats.duplicate_count as f64, total);

    HashEfficiency {
        uniqueness_rate: percent(stats.unique_count as f64, total),
        duplicate_rate,
        efficiency_score: 100.0 - duplicate_rate,
    }
}

/// How much of the dataset is duplicated files.
pub fn duplicate_impact(stats: &DuplicateStats, overview: &OverviewMetrics) -> DuplicateImpact {
    let duplicate_files = stats.duplicate_summary.total_duplicate_files;

    DuplicateImpact {
        total_images: overview.total_images,
        duplicate_files,
        duplicate_hashes: stats.duplicate_summary.total_duplicate_hashes,
        storage_saved_pct: percent(duplicate_files as f64, overview.total_images as f64),
    }
}

/// Actual versus interval-implied download rate.
pub fn throughput(temporal: &TemporalMetrics, total_images: u64) -> Throughput {
    let images_per_hour = ratio(total_images as f64, temporal.duration_hours);
    let theoretical_per_hour = ratio(3600.0, temporal.avg_interval_seconds);

    Throughput {
        images_per_hour,
        images_per_minute: images_per_hour / 60.0,
        theoretical_per_hour,
        efficiency: percent(images_per_hour, theoretical_per_hour),
    }
}

/// Average width over average height; 0 when the height is 0.
pub fn aspect_ratio(dimensions: &DimensionStats) -> f64 {
    ratio(dimensions.avg_width, dimensions.avg_height)
}

/// `(min, average, max)` file size in MiB.
pub fn size_range_mb(stats: &FileSizeStats) -> (f64, f64, f64) {
    (
        stats.min_bytes as f64 / BYTES_PER_MB,
        stats.average_bytes / BYTES_PER_MB,
        stats.max_bytes as f64 / BYTES_PER_MB,
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::DuplicateSummary;
    use serde_json::json;

    fn row(name: &str, count: u64) -> CountRow {
        CountRow {
            name: name.to_string(),
            count,
        }
    }

    #[test]
    fn test_percent_guards_zero() {
        assert_eq!(percent(5.0, 0.0), 0.0);
        assert_eq!(percent(0.0, 0.0), 0.0);
        assert_eq!(percent(1.0, 4.0), 25.0);
        assert_eq!(ratio(1.0, f64::MIN_POSITIVE / 1e10), 0.0);
    }

    #[test]
    fn test_format_distribution_sorted_uppercase() {
        let report = Report::from_value(json!({
            "quantitative_statistics": {"formats": {"png": 3, "jpeg": 10, "webp": 3}}
        }))
        .unwrap();

        let rows = format_distribution(&report).unwrap();
        assert_eq!(rows, vec![row("JPEG", 10), row("PNG", 3), row("WEBP", 3)]);
    }

    #[test]
    fn test_color_mode_distribution() {
        let report = Report::from_value(json!({
            "quantitative_statistics": {"color_modes": {"L": 2, "RGB": 40, "RGBA": 5}}
        }))
        .unwrap();

        let rows = color_mode_distribution(&report).unwrap();
        assert_eq!(rows[0], row("RGB", 40));
        assert_eq!(rows[2], row("L", 2));
    }

    #[test]
    fn test_top_n() {
        let rows = vec![row("a", 1), row("b", 5), row("c", 3)];
        let top = top_n(&rows, 2);
        assert_eq!(top, vec![row("b", 5), row("c", 3)]);
        assert_eq!(top_n(&rows, 10).len(), 3);
    }

    #[test]
    fn test_hash_efficiency() {
        let stats = DuplicateStats {
            total_count: 200,
            unique_count: 190,
            duplicate_count: 10,
            duplicate_summary: DuplicateSummary::default(),
        };
        let eff = hash_efficiency(&stats);
        assert_eq!(eff.uniqueness_rate, 95.0);
        assert_eq!(eff.duplicate_rate, 5.0);
        assert_eq!(eff.efficiency_score, 95.0);

        let empty = hash_efficiency(&DuplicateStats::default());
        assert_eq!(empty.uniqueness_rate, 0.0);
        assert_eq!(empty.efficiency_score, 100.0);
    }

    #[test]
    fn test_duplicate_impact() {
        let stats = DuplicateStats {
            duplicate_summary: DuplicateSummary {
                total_duplicate_files: 25,
                total_duplicate_hashes: 10,
                ..Default::default()
            },
            ..Default::default()
        };
        let overview = OverviewMetrics {
            total_images: 500,
            ..Default::default()
        };
        let impact = duplicate_impact(&stats, &overview);
        assert_eq!(impact.storage_saved_pct, 5.0);
        assert_eq!(impact.duplicate_hashes, 10);

        let none = duplicate_impact(&stats, &OverviewMetrics::default());
        assert_eq!(none.storage_saved_pct, 0.0);
    }

    #[test]
    fn test_throughput() {
        let temporal = TemporalMetrics {
            duration_hours: 2.0,
            avg_interval_seconds: 30.0,
            ..Default::default()
        };
        let t = throughput(&temporal, 120);
        assert_eq!(t.images_per_hour, 60.0);
        assert_eq!(t.images_per_minute, 1.0);
        assert_eq!(t.theoretical_per_hour, 120.0);
        assert_eq!(t.efficiency, 50.0);

        let idle = throughput(&TemporalMetrics::default(), 120);
        assert_eq!(idle.images_per_hour, 0.0);
        assert_eq!(idle.efficiency, 0.0);
    }

    #[test]
    fn test_aspect_ratio_zero_height() {
        let dims = DimensionStats {
            avg_width: 800.0,
            avg_height: 0.0,
            ..Default::default()
        };
        assert_eq!(aspect_ratio(&dims), 0.0);

        let dims = DimensionStats {
            avg_width: 800.0,
            avg_height: 600.0,
            ..Default::default()
        };
        assert!((aspect_ratio(&dims) - 4.0 / 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_size_range_mb() {
        let stats = FileSizeStats {
            average_bytes: BYTES_PER_MB,
            min_bytes: 0,
            max_bytes: 4 * 1024 * 1024,
            total_bytes: 0,
        };
        assert_eq!(size_range_mb(&stats), (0.0, 1.0, 4.0));
    }
}
