//! Analytics engine
//!
//! Pure functions over `(orders, period, now)`. Nothing here performs I/O or
//! keeps state between calls.

pub mod aggregator;
pub mod bucketer;
pub mod classifier;
pub mod kpi;
pub mod trend;

pub use aggregator::{aggregate, summarize};
pub use bucketer::{build_buckets, slot_of};
pub use classifier::{classify, classify_raw, classify_status, resolve_status, Resolution};
pub use kpi::{compare_windows, kpi_report, percent_change, snapshot, window_bounds};
pub use trend::build_trend;
