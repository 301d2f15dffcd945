//! Directory pipeline: discover exports, summarise each one, feed the aggregator.
//!
//! Files are processed one at a time in listing order. A file that cannot be
//! dated or read is logged and skipped; nothing here aborts the run.

use anyhow::Result;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

use downtime_core::{Aggregator, FileTotals, MonthKey, Snapshot};
use downtime_ingest::{LoaderOptions, MonthExtractor, SheetSource, discover_files};

use crate::file_summary::{SummaryOptions, grand_total, summarize};

#[derive(Debug, Clone, Default)]
pub struct PipelineOptions {
    pub loader: LoaderOptions,
    pub summary: SummaryOptions,
}

/// What happened to one file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileOutcome {
    /// Total and category breakdown recorded.
    Categorized(MonthKey),
    /// Only the grand total recorded.
    TotalOnly(MonthKey),
    /// Nothing recorded.
    Skipped,
}

pub struct Pipeline {
    extractor: MonthExtractor,
    options: PipelineOptions,
    aggregator: Aggregator,
}

impl Pipeline {
    pub fn new(extractor: MonthExtractor, options: PipelineOptions) -> Self {
        Self {
            extractor,
            options,
            aggregator: Aggregator::new(),
        }
    }

    /// Process every candidate file in `dir`.
    pub fn run_dir(&mut self, dir: &Path) -> Result<Vec<(PathBuf, FileOutcome)>> {
        let files = discover_files(dir, &self.extractor)?;
        info!(dir = %dir.display(), files = files.len(), "scanning downtime exports");

        let mut outcomes = Vec::with_capacity(files.len());
        for path in files {
            let outcome = self.process_file(&path);
            outcomes.push((path, outcome));
        }
        Ok(outcomes)
    }

    pub fn process_file(&mut self, path: &Path) -> FileOutcome {
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();

        let Some((month, source)) = self.extractor.extract(&name) else {
            warn!("could not extract a month from {name}; skipping");
            return FileOutcome::Skipped;
        };
        debug!(file = %name, %month, ?source, "month resolved");

        match load_totals(path, &self.options) {
            Ok(Some(totals)) => {
                let categorized = totals.breakdown.is_some();
                info!(
                    file = %name,
                    %month,
                    minutes = totals.total_minutes,
                    categorized,
                    "file processed"
                );
                self.aggregator.add(month, totals);
                if categorized {
                    FileOutcome::Categorized(month)
                } else {
                    FileOutcome::TotalOnly(month)
                }
            }
            Ok(None) => {
                warn!("no duration column found in {name}; skipping");
                FileOutcome::Skipped
            }
            Err(e) => {
                warn!("error reading {name}: {e:#}");
                FileOutcome::Skipped
            }
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        self.aggregator.snapshot()
    }
}

/// `Ok(None)` means no sheet exposed a duration column.
fn load_totals(path: &Path, options: &PipelineOptions) -> Result<Option<FileTotals>> {
    let mut source = SheetSource::open(path)?;
    let loaded = source.load_preferred(&options.loader)?;

    if let Some(duration) = loaded.duration.index() {
        debug!(sheet = %loaded.dataset.sheet, header_row = loaded.header_row, duration = ?loaded.duration, "duration column");
        return match summarize(&loaded.dataset, duration, &options.summary) {
            Ok(totals) => Ok(Some(totals)),
            Err(e) => {
                warn!(
                    "category breakdown failed for {}: {e:#}; recording total only",
                    path.display()
                );
                Ok(Some(FileTotals::total_only(grand_total(&loaded.dataset, duration))))
            }
        };
    }

    // Degraded path: a grand total from another sheet, no categories.
    let Some(other) = source.first_other_sheet(&options.loader) else {
        return Ok(None);
    };
    if other == loaded.dataset.sheet {
        return Ok(None);
    }
    let fallback = source.load_sheet(&other, &options.loader)?;
    Ok(fallback
        .duration
        .index()
        .map(|d| FileTotals::total_only(grand_total(&fallback.dataset, d))))
}
