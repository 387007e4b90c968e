//! KPI report and trend points

use serde::Serialize;
use crate::domain::aggregates::snapshot::{Snapshot, SnapshotChange};
use crate::domain::value_objects::KpiWindow;

pub const CONVERSION_RATE_GOAL: f64 = 3.0;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct TrendPoint {
    pub label: String,
    pub value: f64,
}

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiReport {
    pub window: KpiWindow,
    pub current: Snapshot,
    pub previous: Snapshot,
    pub change: SnapshotChange,
    pub revenue_trend: Vec<TrendPoint>,
    pub orders_trend: Vec<TrendPoint>,
    /// Orders per hundred visitors; absent without a visitor count.
    pub conversion_rate: Option<f64>,
    pub conversion_rate_goal: f64,
}
