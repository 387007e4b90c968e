//! Snapshot Aggregate

use serde::Serialize;
use crate::domain::value_objects::Classification;

/// Aggregate over a single time window.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub total_revenue: f64,
    pub total_orders: u64,
    /// Orders whose amount went into `total_revenue`; the AOV denominator.
    pub revenue_orders: u64,
    pub average_order_value: f64,
}

impl Snapshot {
    pub fn record(&mut self, class: &Classification, revenue: Option<f64>) {
        if class.counts_toward_orders { self.total_orders += 1; }
        if let Some(amount) = revenue {
            self.total_revenue += amount;
            self.revenue_orders += 1;
        }
        self.average_order_value = if self.revenue_orders > 0 {
            self.total_revenue / self.revenue_orders as f64
        } else {
            0.0
        };
    }
}

/// Percentage change per KPI between two snapshots.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SnapshotChange {
    pub revenue: f64,
    pub order_count: f64,
    pub average_order_value: f64,
}
