//! downtime-core: month keys, downtime buckets and the monthly/annual aggregator

pub mod aggregator;
pub mod bucket;
pub mod month;

pub use aggregator::{Aggregator, FileTotals, MonthlyRecord, Samples, Snapshot, Summary};
pub use bucket::{Bucket, BucketSet, BucketTotals};
pub use month::MonthKey;
