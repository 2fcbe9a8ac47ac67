//! Defaulting accessor over a JSON object.
//!
//! A [`Section`] wraps an optional JSON object together with its dotted
//! path inside the report. Reads of absent (or `null`) keys return the
//! documented default; reads of present keys with the wrong JSON type
//! fail with [`ReportError::FieldType`].

use crate::error::{kind_of, ReportError, Result};
use serde_json::{Map, Value};
use tracing::debug;

/// A view over one JSON object of the report, possibly absent.
#[derive(Debug, Clone)]
pub struct Section<'a> {
    path: String,
    map: Option<&'a Map<String, Value>>,
}

impl<'a> Section<'a> {
    /// View over the report root.
    pub(crate) fn root(map: &'a Map<String, Value>) -> Self {
        Self {
            path: String::new(),
            map: Some(map),
        }
    }

    /// An absent section at the given path. Every read returns its default.
    pub fn empty(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            map: None,
        }
    }

    /// Wrap an arbitrary value that is expected to be an object.
    ///
    /// `null` yields an empty section.
    pub fn of(path: impl Into<String>, value: &'a Value) -> Result<Self> {
        let path = path.into();
        match value {
            Value::Object(map) => Ok(Self {
                path,
                map: Some(map),
            }),
            Value::Null => Ok(Self { path, map: None }),
            other => Err(ReportError::FieldType {
                path,
                expected: "an object",
                found: kind_of(other),
            }),
        }
    }

    /// Dotted path of this section inside the report (empty for the root).
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Whether the underlying object exists.
    pub fn is_present(&self) -> bool {
        self.map.is_some()
    }

    /// Whether `key` holds a non-null value.
    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Raw value for `key`, treating `null` as absent.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map
            .and_then(|m| m.get(key))
            .filter(|v| !v.is_null())
    }

    fn field_path(&self, key: &str) -> String {
        if self.path.is_empty() {
            key.to_string()
        } else {
            format!("{}.{}", self.path, key)
        }
    }

    fn type_error(&self, key: &str, expected: &'static str, value: &Value) -> ReportError {
        ReportError::FieldType {
            path: self.field_path(key),
            expected,
            found: kind_of(value),
        }
    }

    /// Nested object at `key`; absent yields an empty section.
    pub fn section(&self, key: &str) -> Result<Section<'a>> {
        match self.get(key) {
            Some(value) => Section::of(self.field_path(key), value),
            None => Ok(Section::empty(self.field_path(key))),
        }
    }

    /// First present nested object among `keys` (primary name first, then aliases).
    pub fn section_any(&self, keys: &[&str]) -> Result<Section<'a>> {
        for (i, key) in keys.iter().enumerate() {
            if self.contains(key) {
                if i > 0 {
                    debug!("Using `{}` in place of `{}`", self.field_path(key), keys[0]);
                }
                return self.section(key);
            }
        }
        Ok(Section::empty(self.field_path(keys.first().copied().unwrap_or(""))))
    }

    /// Non-negative integer at `key`, or `None` when absent.
    ///
    /// Integral floats such as `3.0` are accepted.
    pub fn opt_count(&self, key: &str) -> Result<Option<u64>> {
        let Some(value) = self.get(key) else {
            return Ok(None);
        };

        if let Some(n) = value.as_u64() {
            return Ok(Some(n));
        }

        match value.as_f64() {
            Some(f) if f >= 0.0 && f.fract() == 0.0 && f <= u64::MAX as f64 => Ok(Some(f as u64)),
            _ => Err(self.type_error(key, "a non-negative integer", value)),
        }
    }

    /// First non-negative integer found among `keys` (primary name first, then aliases).
    pub fn opt_count_any(&self, keys: &[&str]) -> Result<Option<u64>> {
        for key in keys {
            if let Some(n) = self.opt_count(key)? {
                return Ok(Some(n));
            }
        }
        Ok(None)
    }

    /// Non-negative integer at `key`, defaulting to 0.
    pub fn count(&self, key: &str) -> Result<u64> {
        Ok(self.opt_count(key)?.unwrap_or(0))
    }

    /// Number at `key`, or `None` when absent.
    pub fn opt_float(&self, key: &str) -> Result<Option<f64>> {
        match self.get(key) {
            None => Ok(None),
            Some(value) => value
                .as_f64()
                .map(Some)
                .ok_or_else(|| self.type_error(key, "a number", value)),
        }
    }

    /// Number at `key`, defaulting to 0.0.
    pub fn float(&self, key: &str) -> Result<f64> {
        Ok(self.opt_float(key)?.unwrap_or(0.0))
    }

    /// String at `key`, or `None` when absent.
    pub fn text(&self, key: &str) -> Result<Option<String>> {
        match self.get(key) {
            None => Ok(None),
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(value) => Err(self.type_error(key, "a string", value)),
        }
    }

    /// Name → count mapping at `key`, in document order. Absent yields an empty list.
    pub fn counts(&self, key: &str) -> Result<Vec<(String, u64)>> {
        let nested = self.section(key)?;
        let mut counts = Vec::with_capacity(nested.len());
        for (name, _) in nested.entries() {
            counts.push((name.clone(), nested.count(name)?));
        }
        Ok(counts)
    }

    /// Number of entries in the mapping at `key` (0 when absent).
    pub fn len_of(&self, key: &str) -> Result<usize> {
        Ok(self.section(key)?.len())
    }

    /// Array at `key`; absent yields an empty slice.
    pub fn array(&self, key: &str) -> Result<&'a [Value]> {
        match self.get(key) {
            None => Ok(&[]),
            Some(Value::Array(items)) => Ok(items.as_slice()),
            Some(value) => Err(self.type_error(key, "an array", value)),
        }
    }

    /// Number of keys in this object (0 when absent).
    pub fn len(&self) -> usize {
        self.map.map_or(0, |m| m.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Key/value pairs of this object in document order.
    pub fn entries(&self) -> impl Iterator<Item = (&'a String, &'a Value)> + 'a {
        self.map.into_iter().flat_map(|m| m.iter())
    }
}
