//! ScrapeStats - summary statistics for image-scraper reports
//!
//! Loads the JSON report written by the scraping pipeline and derives the
//! numbers the analysis views need: overview counts, file sizes and
//! dimensions, format distributions, duplicate hashes, download timing
//! and download quality.
//!
//! ```no_run
//! use scrapestats::{analysis, Report};
//!
//! # fn main() -> scrapestats::Result<()> {
//! let report = Report::load(std::path::Path::new("report.json"))?;
//! let overview = analysis::overview_metrics(&report)?;
//! println!("{} images in {} classes", overview.total_images, overview.total_classes);
//! # Ok(())
//! # }
//! ```

pub mod analysis;
pub mod cli;
pub mod config;
pub mod error;
pub mod models;
pub mod report;

pub use error::{ReportError, Result};
pub use models::AnalysisSummary;
pub use report::Report;
