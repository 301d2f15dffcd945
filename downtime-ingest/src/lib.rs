//! downtime-ingest: workbook loading, duration-column detection and filename month keys.

pub mod column;
pub mod filename;
pub mod sheet;
pub mod types;

pub use column::{ColumnResolution, MatchRule, resolve_duration_column};
pub use filename::{MonthExtractor, MonthSource, discover_files};
pub use sheet::{LoadedSheet, LoaderOptions, SheetSource};
pub use types::{Cell, Dataset};
