//! Per-file totals: grand total, bucket sums and sample values.

use anyhow::{Result, bail};
use downtime_core::{Bucket, BucketTotals, FileTotals, Samples};
use downtime_ingest::Dataset;

use crate::category_rules::classify;

#[derive(Debug, Clone)]
pub struct SummaryOptions {
    /// Header of the free-text category column.
    pub category_column: String,
    /// Raw values kept per bucket for spot-checking.
    pub sample_size: usize,
}

impl Default for SummaryOptions {
    fn default() -> Self {
        Self {
            category_column: "CODIGO DETENCION".to_string(),
            sample_size: 5,
        }
    }
}

/// Sum of the duration column; non-numeric and missing cells count as zero.
pub fn grand_total(dataset: &Dataset, duration: usize) -> f64 {
    dataset.column(duration).filter_map(|c| c.as_number()).sum()
}

/// Grand total plus category breakdown. Fails when the category column is
/// missing; callers fall back to `grand_total` alone.
pub fn summarize(dataset: &Dataset, duration: usize, options: &SummaryOptions) -> Result<FileTotals> {
    let Some(category) = dataset.column_index(&options.category_column) else {
        bail!(
            "column '{}' not found in sheet '{}'",
            options.category_column,
            dataset.sheet
        );
    };

    let mut breakdown = BucketTotals::default();
    let mut samples = Samples {
        total: Vec::new(),
        buckets: Bucket::ALL.iter().map(|b| (*b, Vec::new())).collect(),
    };
    let mut total = 0.0;

    for row in &dataset.rows {
        let cell = row.get(duration);
        let minutes = cell.and_then(|c| c.as_number());
        let raw = cell.map(|c| c.display()).unwrap_or_else(|| "nan".to_string());
        total += minutes.unwrap_or(0.0);
        if samples.total.len() < options.sample_size {
            samples.total.push(raw.clone());
        }

        let label = row.get(category).and_then(|c| c.as_text());
        for bucket in classify(label).iter() {
            breakdown.add(bucket, minutes.unwrap_or(0.0));
            let kept = samples.buckets.entry(bucket).or_default();
            if kept.len() < options.sample_size {
                kept.push(raw.clone());
            }
        }
    }

    Ok(FileTotals {
        total_minutes: total,
        breakdown: Some(breakdown),
        samples: Some(samples),
    })
}
