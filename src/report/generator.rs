//! Summary rendering.
//!
//! This module turns an [`AnalysisSummary`] into console text, a
//! Markdown document, or JSON.

use super::format::{format_bytes, format_duration, format_number, format_percent};
use crate::analysis::{color_mode_rows, format_rows, percent, size_range_mb, top_n};
use crate::config::{Config, DisplayConfig, QualityConfig};
use crate::models::{AnalysisSummary, CountRow, Counts, QualityIssueRow, RateBand};
use anyhow::Result;

/// Generate a complete Markdown report.
pub fn generate_markdown_report(summary: &AnalysisSummary, config: &Config) -> String {
    let display = &config.display;
    let mut output = String::new();

    // Title
    output.push_str("# Scrape Report Summary\n\n");

    output.push_str(&generate_metadata_section(summary));
    output.push_str(&generate_table_of_contents());
    output.push_str(&generate_overview_section(summary, display));
    output.push_str(&generate_files_section(summary));
    output.push_str(&generate_distribution_section(summary, display));
    output.push_str(&generate_duplicates_section(summary, display));
    output.push_str(&generate_temporal_section(summary, display));
    output.push_str(&generate_quality_section(summary, display, &config.quality));

    // Footer
    output.push_str(&generate_footer());

    output
}

/// Generate the metadata section.
fn generate_metadata_section(summary: &AnalysisSummary) -> String {
    let mut section = String::new();

    section.push_str("## Metadata\n\n");
    section.push_str(&format!(
        "- **Report Generated:** {}\n",
        summary.generated_at.as_deref().unwrap_or("unknown")
    ));
    section.push_str(&format!(
        "- **Total Images:** {}\n",
        format_number(summary.overview.total_images)
    ));
    section.push_str(&format!(
        "- **Classes:** {} | **Categories:** {}\n",
        summary.overview.total_classes, summary.overview.total_categories
    ));
    section.push('\n');

    section
}

/// Generate the table of contents.
fn generate_table_of_contents() -> String {
    let mut toc = String::new();

    toc.push_str("## Table of Contents\n\n");
    for title in [
        "Overview",
        "Files",
        "Distributions",
        "Duplicates",
        "Temporal",
        "Quality",
    ] {
        toc.push_str(&format!("- [{}](#{})\n", title, title.to_lowercase()));
    }
    toc.push('\n');

    toc
}

fn generate_overview_section(summary: &AnalysisSummary, display: &DisplayConfig) -> String {
    let o = &summary.overview;
    let mut section = String::new();

    section.push_str("## Overview\n\n");
    section.push_str("| Metric | Value |\n");
    section.push_str("|:---|---:|\n");
    section.push_str(&format!("| Total images | {} |\n", format_number(o.total_images)));
    section.push_str(&format!("| Classes | {} |\n", o.total_classes));
    section.push_str(&format!("| Categories | {} |\n", o.total_categories));
    section.push_str(&format!("| Formats | {} |\n", o.total_formats));
    section.push_str(&format!(
        "| URLs found | {} |\n",
        format_number(o.total_urls_found)
    ));
    section.push_str(&format!(
        "| Downloaded | {} |\n",
        format_number(o.total_downloaded)
    ));
    section.push_str(&format!(
        "| Success rate | {} |\n",
        format_percent(o.success_rate, display.decimals)
    ));
    section.push_str(&format!(
        "| Average file size | {:.2} MB |\n\n",
        o.avg_file_size_mb
    ));

    section
}

fn generate_files_section(summary: &AnalysisSummary) -> String {
    let fs = &summary.file_size;
    let dims = &summary.dimensions;
    let (min_mb, avg_mb, max_mb) = size_range_mb(fs);
    let mut section = String::new();

    section.push_str("## Files\n\n");
    section.push_str("### File Sizes\n\n");
    section.push_str("| Min | Average | Max | Total |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        format_bytes(fs.min_bytes as f64),
        format_bytes(fs.average_bytes),
        format_bytes(fs.max_bytes as f64),
        format_bytes(fs.total_bytes as f64)
    ));
    section.push_str(&format!(
        "*Range: {:.2} MB to {:.2} MB, average {:.2} MB*\n\n",
        min_mb, max_mb, avg_mb
    ));

    section.push_str("### Dimensions\n\n");
    section.push_str("| | Width | Height |\n");
    section.push_str("|:---|:---:|:---:|\n");
    section.push_str(&format!(
        "| Min | {} | {} |\n",
        dims.min_width, dims.min_height
    ));
    section.push_str(&format!(
        "| Average | {:.0} | {:.0} |\n",
        dims.avg_width, dims.avg_height
    ));
    section.push_str(&format!(
        "| Max | {} | {} |\n\n",
        dims.max_width, dims.max_height
    ));
    section.push_str(&format!(
        "*Average aspect ratio: {:.2}*\n\n",
        summary.aspect_ratio
    ));

    section
}

/// Render a name/count table with share of total, largest first.
fn count_table(header: &str, rows: &[CountRow], total: u64, display: &DisplayConfig) -> String {
    let mut table = String::new();

    table.push_str(&format!("| {} | Count | Share |\n", header));
    table.push_str("|:---|:---:|:---:|\n");
    for row in top_n(rows, display.top_n) {
        table.push_str(&format!(
            "| {} | {} | {} |\n",
            row.name,
            format_number(row.count),
            format_percent(
                percent(row.count as f64, total as f64),
                display.decimals
            )
        ));
    }
    if rows.len() > display.top_n {
        table.push_str(&format!(
            "\n*{} more not shown*\n",
            rows.len() - display.top_n
        ));
    }
    table.push('\n');

    table
}

fn generate_distribution_section(summary: &AnalysisSummary, display: &DisplayConfig) -> String {
    let mut section = String::new();

    section.push_str("## Distributions\n\n");

    let quant = &summary.quantitative;
    let tables: [(&str, &str, Vec<CountRow>, &Counts); 4] = [
        (
            "Images per Class",
            "Class",
            summary.images_per_class.rows(),
            &summary.images_per_class,
        ),
        (
            "Images per Category",
            "Category",
            summary.images_per_category.rows(),
            &summary.images_per_category,
        ),
        ("Formats", "Format", format_rows(&quant.formats), &quant.formats),
        (
            "Color Modes",
            "Mode",
            color_mode_rows(&quant.color_modes),
            &quant.color_modes,
        ),
    ];

    for (title, header, rows, counts) in tables {
        if rows.is_empty() {
            continue;
        }
        section.push_str(&format!("### {}\n\n", title));
        section.push_str(&count_table(header, &rows, counts.total(), display));
    }

    section
}

fn generate_duplicates_section(summary: &AnalysisSummary, display: &DisplayConfig) -> String {
    let d = &summary.duplicates;
    let s = &d.duplicate_summary;
    let eff = &summary.hash_efficiency;
    let mut section = String::new();

    section.push_str("## Duplicates\n\n");
    section.push_str("| Hashed | Unique | Duplicate | Uniqueness | Duplicate rate |\n");
    section.push_str("|:---:|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} | {} |\n\n",
        format_number(d.total_count),
        format_number(d.unique_count),
        format_number(d.duplicate_count),
        format_percent(eff.uniqueness_rate, display.decimals),
        format_percent(eff.duplicate_rate, display.decimals)
    ));

    section.push_str(&format!(
        "- Inter-class duplicate hashes: {}\n",
        s.inter_class_duplicate_hashes
    ));
    section.push_str(&format!(
        "- Intra-class duplicate hashes: {}\n",
        s.intra_class_duplicate_hashes
    ));
    section.push_str(&format!(
        "- Duplicate files: {} ({} of all images)\n\n",
        s.total_duplicate_files,
        format_percent(summary.duplicate_impact.storage_saved_pct, display.decimals)
    ));

    if !d.is_consistent() {
        section.push_str(
            "> ⚠️ Unique and duplicate counts do not add up to the hashed total.\n\n",
        );
    }

    section
}

fn generate_temporal_section(summary: &AnalysisSummary, display: &DisplayConfig) -> String {
    let t = &summary.temporal;
    let tp = &summary.throughput;
    let mut section = String::new();

    section.push_str("## Temporal\n\n");
    section.push_str(&format!(
        "- **First download:** {}\n",
        t.earliest.as_deref().unwrap_or("n/a")
    ));
    section.push_str(&format!(
        "- **Last download:** {}\n",
        t.latest.as_deref().unwrap_or("n/a")
    ));
    section.push_str(&format!(
        "- **Duration:** {}\n",
        format_duration(t.duration_hours)
    ));
    section.push_str(&format!(
        "- **Average interval:** {:.2}s ({:.3} min)\n",
        t.avg_interval_seconds, t.avg_interval_minutes
    ));
    section.push_str(&format!(
        "- **Throughput:** {:.1} images/hour ({:.2}/min)\n",
        tp.images_per_hour, tp.images_per_minute
    ));
    section.push_str(&format!(
        "- **Efficiency:** {} of the interval-implied rate\n\n",
        format_percent(tp.efficiency, display.decimals)
    ));

    section
}

fn generate_quality_section(
    summary: &AnalysisSummary,
    display: &DisplayConfig,
    thresholds: &QualityConfig,
) -> String {
    let q = &summary.quality;
    let band = RateBand::classify(q.success_rate, thresholds.good_rate, thresholds.fair_rate);
    let mut section = String::new();

    section.push_str("## Quality\n\n");
    section.push_str(&format!(
        "{} **Success rate:** {} ({})\n\n",
        band.emoji(),
        format_percent(q.success_rate, display.decimals),
        band
    ));
    section.push_str("| URLs Found | Downloaded | Missing | Efficiency |\n");
    section.push_str("|:---:|:---:|:---:|:---:|\n");
    section.push_str(&format!(
        "| {} | {} | {} | {} |\n\n",
        format_number(q.total_urls_found),
        format_number(q.total_downloaded),
        format_number(q.urls_found_but_missing_metadata),
        format_percent(q.download_efficiency, display.decimals)
    ));

    if summary.quality_issues.is_empty() {
        section.push_str("All classes downloaded successfully. 🎉\n\n");
        return section;
    }

    section.push_str("### Classes with Missing Downloads\n\n");
    section.push_str("| Class | Found | Downloaded | Missing | Success | |\n");
    section.push_str("|:---|:---:|:---:|:---:|:---:|:---:|\n");
    for row in &summary.quality_issues {
        section.push_str(&generate_issue_row(row, display, thresholds));
    }
    section.push('\n');

    section
}

fn generate_issue_row(
    row: &QualityIssueRow,
    display: &DisplayConfig,
    thresholds: &QualityConfig,
) -> String {
    let band = RateBand::classify(row.success_rate, thresholds.good_rate, thresholds.fair_rate);
    format!(
        "| {} | {} | {} | {} | {} | {} |\n",
        row.class,
        row.urls_found,
        row.urls_downloaded,
        row.missing_downloads,
        format_percent(row.success_rate, display.decimals),
        band.emoji()
    )
}

/// Generate the report footer.
fn generate_footer() -> String {
    let mut footer = String::new();

    footer.push_str("---\n\n");
    footer.push_str("*Generated by scrapestats*\n");

    footer
}

/// Generate a console summary.
pub fn generate_text_summary(summary: &AnalysisSummary, display: &DisplayConfig) -> String {
    let o = &summary.overview;
    let fs = &summary.file_size;
    let d = &summary.duplicates;
    let t = &summary.temporal;
    let q = &summary.quality;
    let mut lines = Vec::new();

    lines.push("📊 Report Overview".to_string());
    if let Some(ref generated) = summary.generated_at {
        lines.push(format!("   Generated: {}", generated));
    }
    lines.push(format!("   Images: {}", format_number(o.total_images)));
    lines.push(format!(
        "   Classes: {} | Categories: {} | Formats: {}",
        o.total_classes, o.total_categories, o.total_formats
    ));

    lines.push(String::new());
    lines.push("📁 Files".to_string());
    lines.push(format!(
        "   Size: avg {} | min {} | max {} | total {}",
        format_bytes(fs.average_bytes),
        format_bytes(fs.min_bytes as f64),
        format_bytes(fs.max_bytes as f64),
        format_bytes(fs.total_bytes as f64)
    ));
    lines.push(format!(
        "   Dimensions: avg {:.0}x{:.0} | min {}x{} | max {}x{}",
        summary.dimensions.avg_width,
        summary.dimensions.avg_height,
        summary.dimensions.min_width,
        summary.dimensions.min_height,
        summary.dimensions.max_width,
        summary.dimensions.max_height
    ));

    let formats = top_n(&format_rows(&summary.quantitative.formats), display.top_n);
    if !formats.is_empty() {
        let list: Vec<String> = formats
            .iter()
            .map(|r| format!("{} {}", r.name, r.count))
            .collect();
        lines.push(format!("   Formats: {}", list.join(", ")));
    }
    let modes = top_n(&color_mode_rows(&summary.quantitative.color_modes), display.top_n);
    if !modes.is_empty() {
        let list: Vec<String> = modes
            .iter()
            .map(|r| format!("{} {}", r.name, r.count))
            .collect();
        lines.push(format!("   Color modes: {}", list.join(", ")));
    }

    lines.push(String::new());
    lines.push("🔁 Duplicates".to_string());
    lines.push(format!(
        "   Hashed: {} | Unique: {} | Duplicate: {} ({})",
        d.total_count,
        d.unique_count,
        d.duplicate_count,
        format_percent(summary.hash_efficiency.duplicate_rate, display.decimals)
    ));
    lines.push(format!(
        "   Inter-class: {} | Intra-class: {} | Files: {}",
        d.duplicate_summary.inter_class_duplicate_hashes,
        d.duplicate_summary.intra_class_duplicate_hashes,
        d.duplicate_summary.total_duplicate_files
    ));

    lines.push(String::new());
    lines.push("⏱️  Timing".to_string());
    lines.push(format!("   Duration: {}", format_duration(t.duration_hours)));
    lines.push(format!(
        "   Average interval: {:.2}s | {:.1} images/hour",
        t.avg_interval_seconds, summary.throughput.images_per_hour
    ));

    lines.push(String::new());
    lines.push("✅ Quality".to_string());
    lines.push(format!(
        "   URLs found: {} | Downloaded: {} | Missing: {}",
        q.total_urls_found, q.total_downloaded, q.urls_found_but_missing_metadata
    ));
    lines.push(format!(
        "   Success rate: {}",
        format_percent(q.success_rate, display.decimals)
    ));

    if summary.quality_issues.is_empty() {
        lines.push("   No classes with missing downloads.".to_string());
    } else {
        lines.push(format!(
            "   Classes with missing downloads ({}):",
            summary.quality_issues.len()
        ));
        for row in &summary.quality_issues {
            lines.push(format!(
                "     - {}: {}/{} downloaded, {} missing ({})",
                row.class,
                row.urls_downloaded,
                row.urls_found,
                row.missing_downloads,
                format_percent(row.success_rate, display.decimals)
            ));
        }
    }

    lines.join("\n")
}

/// Generate a JSON report.
pub fn generate_json_report(summary: &AnalysisSummary) -> Result<String> {
    serde_json::to_string_pretty(summary).map_err(Into::into)
}
