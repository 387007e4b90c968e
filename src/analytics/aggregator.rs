//! Bucketed aggregation

use chrono::DateTime;
use chrono_tz::Tz;

use crate::analytics::bucketer::{build_buckets, slot_of};
use crate::analytics::classifier::{classify, revenue_contribution};
use crate::domain::aggregates::{Bucket, BucketMetrics};
use crate::domain::value_objects::Period;
use crate::Order;

/// Folds `orders` into the bucket skeleton for `period`.
///
/// Buckets come back in calendar order and every bucket is present even when
/// empty. Orders outside the covered window are skipped.
pub fn aggregate(orders: &[Order], period: Period, now: &DateTime<Tz>) -> Vec<Bucket> {
    let mut buckets: Vec<Bucket> = build_buckets(period, now).into_iter().map(Bucket::empty).collect();
    let mut skipped = 0usize;

    for order in orders {
        let Some(bucket) = slot_of(period, now, &order.date).and_then(|slot| buckets.get_mut(slot)) else {
            skipped += 1;
            continue;
        };
        let class = classify(order);
        bucket.metrics.record(&class, revenue_contribution(order, &class));
    }

    tracing::debug!(%period, orders = orders.len(), skipped, "Aggregated orders");
    buckets
}

/// Sums every metric across a bucket series.
pub fn summarize(buckets: &[Bucket]) -> BucketMetrics {
    buckets.iter().fold(BucketMetrics::default(), |mut acc, b| {
        acc.merge(&b.metrics);
        acc
    })
}
