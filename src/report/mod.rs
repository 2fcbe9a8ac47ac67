//! The scraping report document and its rendering.
//!
//! [`Report`] is the read-only input of every extractor. Building one
//! checks the top-level shape once; after that all nested access goes
//! through [`Section`], which defaults missing fields.

pub mod format;
pub mod generator;
pub mod section;

pub use format::*;
pub use generator::*;
pub use section::Section;

use crate::error::{kind_of, ReportError, Result};
use serde_json::{Map, Value};
use std::path::Path;
use std::str::FromStr;
use tracing::{debug, info};

/// A parsed scraping report.
#[derive(Debug, Clone, PartialEq)]
pub struct Report {
    root: Map<String, Value>,
}

impl Report {
    /// Build a report from an already-parsed JSON value.
    ///
    /// Fails with [`ReportError::Malformed`] when the value is not an object.
    pub fn from_value(value: Value) -> Result<Self> {
        match value {
            Value::Object(root) => Ok(Self { root }),
            other => Err(ReportError::Malformed(kind_of(&other))),
        }
    }

    /// Read and parse a report file.
    pub fn load(path: &Path) -> Result<Self> {
        info!("Loading report from: {}", path.display());

        let content = std::fs::read_to_string(path).map_err(|source| ReportError::Io {
            path: path.to_path_buf(),
            source,
        })?;

        let report: Report = content.parse()?;
        debug!("Report has {} top-level sections", report.root.len());
        Ok(report)
    }

    /// Defaulting view over the top-level object.
    pub fn root(&self) -> Section<'_> {
        Section::root(&self.root)
    }

    /// `quantitative_statistics`, empty when absent.
    pub fn quantitative(&self) -> Result<Section<'_>> {
        self.root().section("quantitative_statistics")
    }

    /// `temporal_statistics`, empty when absent.
    pub fn temporal(&self) -> Result<Section<'_>> {
        self.root().section("temporal_statistics")
    }

    /// `quality_checks`, empty when absent.
    pub fn quality(&self) -> Result<Section<'_>> {
        self.root().section("quality_checks")
    }

    /// When the report was generated, if recorded.
    pub fn generated_at(&self) -> Result<Option<String>> {
        self.root().text("generated_at")
    }

    /// The underlying JSON object.
    pub fn as_map(&self) -> &Map<String, Value> {
        &self.root
    }
}

impl FromStr for Report {
    type Err = ReportError;

    fn from_str(s: &str) -> Result<Self> {
        let value: Value = serde_json::from_str(s)?;
        Self::from_value(value)
    }
}

impl TryFrom<Value> for Report {
    type Error = ReportError;

    fn try_from(value: Value) -> Result<Self> {
        Self::from_value(value)
    }
}
