//! Order status classification

use crate::domain::value_objects::{Classification, StatusBucket, UnknownStatusPolicy};
use crate::{Order, OrderStatus, Result};

pub fn classify_status(status: OrderStatus) -> Classification {
    let status_bucket = match status {
        OrderStatus::Completed => StatusBucket::Completed,
        OrderStatus::Dispatched => StatusBucket::Dispatched,
        OrderStatus::Pending | OrderStatus::Accepted => StatusBucket::InProgress,
        OrderStatus::Cancelled => StatusBucket::Cancelled,
    };
    Classification {
        counts_toward_orders: status != OrderStatus::Cancelled,
        counts_toward_revenue: matches!(status, OrderStatus::Completed | OrderStatus::Dispatched),
        status_bucket,
    }
}

pub fn classify(order: &Order) -> Classification { classify_status(order.status) }

/// Outcome of parsing a raw status under an [`UnknownStatusPolicy`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Resolution {
    Recognised(OrderStatus),
    /// Unknown value kept as in-progress.
    Fallback(OrderStatus),
}

impl Resolution {
    pub fn status(self) -> OrderStatus {
        match self { Self::Recognised(s) | Self::Fallback(s) => s }
    }
}

pub fn resolve_status(raw: &str, policy: UnknownStatusPolicy) -> Result<Resolution> {
    match raw.parse::<OrderStatus>() {
        Ok(status) => Ok(Resolution::Recognised(status)),
        Err(err) => match policy {
            UnknownStatusPolicy::Reject => Err(err),
            UnknownStatusPolicy::TreatAsInProgress => Ok(Resolution::Fallback(OrderStatus::Pending)),
        },
    }
}

/// Classifies a raw status string, surfacing unknown values as errors under `Reject`.
pub fn classify_raw(raw: &str, policy: UnknownStatusPolicy) -> Result<Classification> {
    resolve_status(raw, policy).map(|r| classify_status(r.status()))
}

/// Amount the order adds to revenue sums, if any.
pub fn revenue_contribution(order: &Order, class: &Classification) -> Option<f64> {
    if !class.counts_toward_revenue { return None; }
    let amount = order.revenue_amount();
    if amount.is_none() {
        tracing::warn!(order_id = %order.id, amount = order.amount, "Excluding invalid amount from revenue");
    }
    amount
}
