//! downtime-rules: downtime category rules, per-file totals and the directory pipeline

pub mod category_rules;
pub mod file_summary;
pub mod pipeline;

pub use category_rules::classify;
pub use file_summary::{SummaryOptions, summarize};
pub use pipeline::{FileOutcome, Pipeline, PipelineOptions};
