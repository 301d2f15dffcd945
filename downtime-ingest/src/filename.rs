//! Month keys from export filenames, and discovery of candidate files.
//!
//! Expected shape: `detenciones-Llenado_V2-{YYYYMM}{DD}-{8 digits}.xlsx`.
//! Renamed copies still usually carry the date, so any run of six digits is
//! accepted as a fallback.

use anyhow::{Context, Result};
use regex::Regex;
use std::fs;
use std::path::{Path, PathBuf};

use downtime_core::MonthKey;

/// Which pattern produced the month key.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MonthSource {
    Primary,
    Fallback,
}

#[derive(Debug, Clone)]
pub struct MonthExtractor {
    marker: String,
    extension: String,
    primary: Regex,
    fallback: Regex,
}

impl MonthExtractor {
    pub fn new(marker: &str, extension: &str) -> Result<Self> {
        let primary = Regex::new(&format!(
            r"^{}-(?P<month>\d{{6}})\d{{2}}-\d{{8}}\.{}",
            regex::escape(marker),
            regex::escape(extension)
        ))?;
        let fallback = Regex::new(r"(?P<month>\d{6})")?;
        Ok(Self {
            marker: marker.to_string(),
            extension: extension.to_string(),
            primary,
            fallback,
        })
    }

    /// Whether a filename looks like a downtime export.
    pub fn is_candidate(&self, filename: &str) -> bool {
        filename.ends_with(&format!(".{}", self.extension)) && filename.contains(&self.marker)
    }

    /// Month key for a filename, or `None` when it cannot be resolved.
    pub fn extract(&self, filename: &str) -> Option<(MonthKey, MonthSource)> {
        if let Some(caps) = self.primary.captures(filename) {
            return MonthKey::parse(&caps["month"])
                .ok()
                .map(|key| (key, MonthSource::Primary));
        }
        let caps = self.fallback.captures(filename)?;
        MonthKey::parse(&caps["month"])
            .ok()
            .map(|key| (key, MonthSource::Fallback))
    }
}

/// Regular files in `dir` (not recursive) that pass `is_candidate`, in
/// directory-listing order.
pub fn discover_files(dir: &Path, extractor: &MonthExtractor) -> Result<Vec<PathBuf>> {
    let entries = fs::read_dir(dir).with_context(|| format!("listing {}", dir.display()))?;

    let mut out = Vec::new();
    for entry in entries {
        let entry = entry.with_context(|| format!("listing {}", dir.display()))?;
        let path = entry.path();
        if !path.is_file() {
            continue;
        }
        let Some(name) = path.file_name().and_then(|n| n.to_str()) else {
            continue;
        };
        if extractor.is_candidate(name) {
            out.push(path);
        }
    }
    Ok(out)
}
