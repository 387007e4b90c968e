//! Period-over-period KPI comparison

use chrono::DateTime;
use chrono_tz::Tz;

use crate::analytics::classifier::{classify, revenue_contribution};
use crate::analytics::trend::build_trend;
use crate::domain::aggregates::{KpiReport, Snapshot, SnapshotChange, CONVERSION_RATE_GOAL};
use crate::domain::value_objects::{KpiWindow, TrendMetric, TrendResolution};
use crate::Order;

/// Rounds to one decimal place, half away from zero.
pub fn round1(value: f64) -> f64 { (value * 10.0).round() / 10.0 }

/// Percentage change from `previous` to `current`.
///
/// A zero baseline yields 100 when anything was gained and 0 otherwise.
pub fn percent_change(current: f64, previous: f64) -> f64 {
    if previous == 0.0 {
        return if current > 0.0 { 100.0 } else { 0.0 };
    }
    round1((current - previous) / previous * 100.0)
}

/// Aggregate over orders placed in `(start, end]`.
pub fn snapshot(orders: &[Order], start: &DateTime<Tz>, end: &DateTime<Tz>) -> Snapshot {
    orders
        .iter()
        .filter(|o| o.date > *start && o.date <= *end)
        .fold(Snapshot::default(), |mut snap, order| {
            let class = classify(order);
            snap.record(&class, revenue_contribution(order, &class));
            snap
        })
}

pub fn compare_windows(current: &Snapshot, previous: &Snapshot) -> SnapshotChange {
    SnapshotChange {
        revenue: percent_change(current.total_revenue, previous.total_revenue),
        order_count: percent_change(current.total_orders as f64, previous.total_orders as f64),
        average_order_value: percent_change(current.average_order_value, previous.average_order_value),
    }
}

/// `(current, previous)` window bounds, each as `(exclusive start, inclusive end)`.
pub fn window_bounds(window: KpiWindow, now: &DateTime<Tz>) -> ((DateTime<Tz>, DateTime<Tz>), (DateTime<Tz>, DateTime<Tz>)) {
    let current_start = *now - window.length();
    let previous_start = current_start - window.length();
    ((current_start, *now), (previous_start, current_start))
}

/// Full dashboard KPI block for `window` ending at `now`.
pub fn kpi_report(orders: &[Order], window: KpiWindow, now: &DateTime<Tz>, visitors: Option<u64>) -> KpiReport {
    let ((cur_start, cur_end), (prev_start, prev_end)) = window_bounds(window, now);
    let current = snapshot(orders, &cur_start, &cur_end);
    let previous = snapshot(orders, &prev_start, &prev_end);
    let change = compare_windows(&current, &previous);

    let days = window.days() as usize;
    let revenue_trend = build_trend(orders, TrendMetric::Revenue, days, TrendResolution::Daily, now);
    let orders_trend = build_trend(orders, TrendMetric::OrderCount, days, TrendResolution::Daily, now);

    let conversion_rate = visitors
        .filter(|v| *v > 0)
        .map(|v| current.total_orders as f64 / v as f64 * 100.0);

    tracing::debug!(%window, revenue = current.total_revenue, orders = current.total_orders, "Built KPI report");

    KpiReport {
        window,
        current,
        previous,
        change,
        revenue_trend,
        orders_trend,
        conversion_rate,
        conversion_rate_goal: CONVERSION_RATE_GOAL,
    }
}
