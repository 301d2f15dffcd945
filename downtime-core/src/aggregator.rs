//! Monthly and annual accumulation of per-file downtime totals.
//!
//! The aggregator is the only owner of the running totals. Files are added
//! one at a time; sums only ever grow. `snapshot()` freezes the months in
//! chronological order together with the annual roll-up.

use serde::Serialize;
use std::collections::BTreeMap;

use crate::bucket::{Bucket, BucketTotals};
use crate::month::MonthKey;

/// First raw duration values seen for the whole file and for each bucket.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct Samples {
    pub total: Vec<String>,
    pub buckets: BTreeMap<Bucket, Vec<String>>,
}

/// Everything one file contributes to its month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FileTotals {
    /// Sum of every duration in the file, missing values counted as zero.
    pub total_minutes: f64,
    /// `None` when only the grand total could be computed.
    pub breakdown: Option<BucketTotals>,
    pub samples: Option<Samples>,
}

impl FileTotals {
    pub fn total_only(total_minutes: f64) -> Self {
        Self {
            total_minutes,
            breakdown: None,
            samples: None,
        }
    }
}

/// Grand total and bucket sums for a month or a year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct Summary {
    pub total_minutes: f64,
    pub buckets: BucketTotals,
}

impl Summary {
    pub fn total_hours(&self) -> f64 {
        self.total_minutes / 60.0
    }

    pub fn hours(&self, bucket: Bucket) -> f64 {
        self.buckets.get(bucket) / 60.0
    }

    /// Grand total minus the six named buckets. Negative when buckets overlap.
    pub fn other_minutes(&self) -> f64 {
        self.total_minutes - self.buckets.categorized()
    }

    pub fn other_hours(&self) -> f64 {
        self.other_minutes() / 60.0
    }

    /// Share of the grand total, or `None` when the grand total is zero.
    pub fn percentage(&self, bucket: Bucket) -> Option<f64> {
        self.share(self.buckets.get(bucket))
    }

    pub fn other_percentage(&self) -> Option<f64> {
        self.share(self.other_minutes())
    }

    fn share(&self, minutes: f64) -> Option<f64> {
        if self.total_minutes == 0.0 {
            return None;
        }
        Some(minutes / self.total_minutes * 100.0)
    }

    fn merge(&mut self, other: &Summary) {
        self.total_minutes += other.total_minutes;
        self.buckets.merge(&other.buckets);
    }
}

/// Accumulated state of one month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyRecord {
    pub month: MonthKey,
    pub summary: Summary,
    /// Files that contributed to this month.
    pub files: usize,
    /// Files that contributed a grand total but no category breakdown.
    pub total_only_files: usize,
    /// Samples of the last file with a breakdown.
    pub samples: Option<Samples>,
}

impl MonthlyRecord {
    fn new(month: MonthKey) -> Self {
        Self {
            month,
            summary: Summary::default(),
            files: 0,
            total_only_files: 0,
            samples: None,
        }
    }
}

/// Frozen view of all months plus the annual roll-up.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub months: Vec<MonthlyRecord>,
    pub annual: Summary,
}

impl Snapshot {
    pub fn is_empty(&self) -> bool {
        self.months.is_empty()
    }

    /// Year of the earliest month, used to title the annual block.
    pub fn year(&self) -> Option<i32> {
        self.months.first().map(|m| m.month.year())
    }
}

#[derive(Debug, Default)]
pub struct Aggregator {
    months: BTreeMap<MonthKey, MonthlyRecord>,
}

impl Aggregator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add one file's totals to its month.
    pub fn add(&mut self, month: MonthKey, file: FileTotals) {
        let record = self
            .months
            .entry(month)
            .or_insert_with(|| MonthlyRecord::new(month));

        record.files += 1;
        record.summary.total_minutes += file.total_minutes;
        match file.breakdown {
            Some(breakdown) => {
                record.summary.buckets.merge(&breakdown);
                if file.samples.is_some() {
                    record.samples = file.samples;
                }
            }
            None => record.total_only_files += 1,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        let months: Vec<MonthlyRecord> = self.months.values().cloned().collect();
        let mut annual = Summary::default();
        for record in &months {
            annual.merge(&record.summary);
        }
        Snapshot { months, annual }
    }
}
