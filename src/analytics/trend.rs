//! Fixed-window trend series
//!
//! Independent of the bucketer: each point covers one whole local calendar day
//! (or clock hour), clipped to `[start, start + unit - 1ms]`.

use chrono::{DateTime, Duration, NaiveTime};
use chrono_tz::Tz;

use crate::analytics::bucketer::{hour_start, local_earliest, local_latest, trailing_days};
use crate::analytics::classifier::{classify, revenue_contribution};
use crate::domain::aggregates::TrendPoint;
use crate::domain::value_objects::{TrendMetric, TrendResolution};
use crate::Order;

/// `count` consecutive points ending with the unit that contains `now`.
pub fn build_trend(
    orders: &[Order],
    metric: TrendMetric,
    count: usize,
    resolution: TrendResolution,
    now: &DateTime<Tz>,
) -> Vec<TrendPoint> {
    slot_bounds(resolution, count, now)
        .into_iter()
        .enumerate()
        .map(|(i, (start, end))| TrendPoint {
            label: format!("{} {}", resolution.label(), i + 1),
            value: slot_value(orders, metric, &start, &end),
        })
        .collect()
}

/// Inclusive `(start, end)` bounds of every slot, oldest first.
fn slot_bounds(resolution: TrendResolution, count: usize, now: &DateTime<Tz>) -> Vec<(DateTime<Tz>, DateTime<Tz>)> {
    let tz = now.timezone();
    match resolution {
        TrendResolution::Daily => {
            let last_milli = NaiveTime::from_hms_milli_opt(23, 59, 59, 999).unwrap_or(NaiveTime::MIN);
            trailing_days(now.date_naive(), count as u64)
                .map(|day| (local_earliest(day.and_time(NaiveTime::MIN), tz), local_latest(day.and_time(last_milli), tz)))
                .collect()
        }
        TrendResolution::Hourly => {
            let current = hour_start(now);
            (0..count as i64)
                .rev()
                .map(|back| {
                    let start = current - Duration::hours(back);
                    (start, start + Duration::hours(1) - Duration::milliseconds(1))
                })
                .collect()
        }
    }
}

fn slot_value(orders: &[Order], metric: TrendMetric, start: &DateTime<Tz>, end: &DateTime<Tz>) -> f64 {
    let in_slot = orders.iter().filter(|o| o.date >= *start && o.date <= *end);
    match metric {
        TrendMetric::Revenue => in_slot
            .filter_map(|o| revenue_contribution(o, &classify(o)))
            .sum(),
        TrendMetric::OrderCount => in_slot.filter(|o| classify(o).counts_toward_orders).count() as f64,
    }
}
