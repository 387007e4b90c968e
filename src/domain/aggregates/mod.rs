//! Aggregates module
pub mod bucket;
pub mod snapshot;
pub mod report;

pub use bucket::{Bucket, BucketMetrics};
pub use snapshot::{Snapshot, SnapshotChange};
pub use report::{KpiReport, TrendPoint, CONVERSION_RATE_GOAL};
