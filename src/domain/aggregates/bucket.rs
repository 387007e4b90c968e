//! Bucket Aggregate

use serde::Serialize;
use crate::domain::value_objects::{BucketKey, Classification, StatusBucket};

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketMetrics {
    pub total: u64,
    pub completed: u64,
    pub dispatched: u64,
    pub in_progress: u64,
    pub revenue: f64,
}

impl BucketMetrics {
    /// Folds one classified order in. `revenue` is the amount it contributes, if any.
    pub fn record(&mut self, class: &Classification, revenue: Option<f64>) {
        if class.counts_toward_orders { self.total += 1; }
        match class.status_bucket {
            StatusBucket::Completed => self.completed += 1,
            StatusBucket::Dispatched => self.dispatched += 1,
            StatusBucket::InProgress => self.in_progress += 1,
            StatusBucket::Cancelled => {}
        }
        if let Some(amount) = revenue { self.revenue += amount; }
    }

    pub fn merge(&mut self, other: &BucketMetrics) {
        self.total += other.total;
        self.completed += other.completed;
        self.dispatched += other.dispatched;
        self.in_progress += other.in_progress;
        self.revenue += other.revenue;
    }

    pub fn is_empty(&self) -> bool { *self == Self::default() }
}

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Bucket {
    pub key: BucketKey,
    #[serde(flatten)]
    pub metrics: BucketMetrics,
}

impl Bucket {
    pub fn empty(key: BucketKey) -> Self { Self { key, metrics: BucketMetrics::default() } }
}
