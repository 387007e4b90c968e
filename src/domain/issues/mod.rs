//! Data-quality issues raised while normalising orders
use serde::Serialize;

#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "camelCase", rename_all_fields = "camelCase")]
pub enum DataIssue {
    /// Record is not an order object at all.
    MalformedRecord { index: usize, reason: String },
    /// Missing or unparseable timestamp; the order is excluded.
    MalformedDate { order_id: String, raw: Option<String> },
    /// Status outside the closed set. `counted_as_in_progress` tells whether the record was kept.
    UnknownStatus { order_id: String, raw: String, counted_as_in_progress: bool },
    /// Negative, non-finite or non-numeric amount; excluded from revenue.
    InvalidAmount { order_id: String, raw: String },
}

impl DataIssue {
    pub fn order_id(&self) -> Option<&str> {
        match self {
            Self::MalformedRecord { .. } => None,
            Self::MalformedDate { order_id, .. }
            | Self::UnknownStatus { order_id, .. }
            | Self::InvalidAmount { order_id, .. } => Some(order_id),
        }
    }

    /// Whether the affected record was dropped from every aggregation.
    pub fn excludes_order(&self) -> bool {
        match self {
            Self::MalformedRecord { .. } | Self::MalformedDate { .. } => true,
            Self::UnknownStatus { counted_as_in_progress, .. } => !counted_as_in_progress,
            Self::InvalidAmount { .. } => false,
        }
    }
}
