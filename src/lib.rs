//! Order Analytics
//!
//! Time-bucketed sales and order rollups for the e-commerce admin dashboard.
//!
//! ## Features
//! - Period bucketing (yearly, monthly, weekly, daily)
//! - Order status classification
//! - Bucketed order and revenue aggregation
//! - Period-over-period KPI comparison
//! - Daily and hourly trend series
//! - Normalisation of raw REST order payloads

pub mod analytics;
pub mod api;
pub mod config;
pub mod domain;
pub mod ingest;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use thiserror::Error;

// =============================================================================
// Core Types
// =============================================================================

/// Canonical order record as seen by the analytics engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct Order {
    pub id: String,
    pub date: DateTime<Utc>,
    pub status: OrderStatus,
    pub amount: f64,
}

impl Order {
    pub fn new(id: impl Into<String>, date: DateTime<Utc>, status: OrderStatus, amount: f64) -> Self {
        Self { id: id.into(), date, status, amount }
    }

    /// Amount usable in revenue sums. Negative and non-finite amounts yield `None`.
    pub fn revenue_amount(&self) -> Option<f64> {
        (self.amount.is_finite() && self.amount >= 0.0).then_some(self.amount)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    #[default]
    Pending,
    Accepted,
    Dispatched,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Accepted,
        OrderStatus::Dispatched,
        OrderStatus::Completed,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Accepted => "Accepted",
            Self::Dispatched => "Dispatched",
            Self::Completed => "Completed",
            Self::Cancelled => "Cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for OrderStatus {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pending" => Ok(Self::Pending),
            "accepted" => Ok(Self::Accepted),
            "dispatched" => Ok(Self::Dispatched),
            "completed" => Ok(Self::Completed),
            "cancelled" | "canceled" => Ok(Self::Cancelled),
            _ => Err(AnalyticsError::UnknownStatus(s.to_string())),
        }
    }
}

// =============================================================================
// Error Types
// =============================================================================

#[derive(Error, Debug, Clone, PartialEq)]
pub enum AnalyticsError {
    #[error("Unknown order status: {0:?}")]
    UnknownStatus(String),

    #[error("Unknown period: {0:?}")]
    UnknownPeriod(String),

    #[error("Unknown KPI window: {0:?}")]
    UnknownKpiWindow(String),

    #[error("Unknown trend metric: {0:?}")]
    UnknownMetric(String),

    #[error("Unknown trend resolution: {0:?}")]
    UnknownResolution(String),

    #[error("Unknown unknown-status policy: {0:?}")]
    UnknownPolicy(String),

    #[error("Unknown time zone: {0:?}")]
    UnknownTimeZone(String),

    #[error("Invalid timestamp: {0:?}")]
    InvalidTimestamp(String),

    #[error("Invalid parameter: {0}")]
    InvalidParameter(String),

    #[error("Invalid payload: {0}")]
    InvalidPayload(String),
}

pub type Result<T> = std::result::Result<T, AnalyticsError>;
