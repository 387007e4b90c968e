//! Value Objects for order analytics

use chrono::Duration;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::{AnalyticsError, Result};

/// Reporting granularity of a bucketed series.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Period {
    Yearly,
    Monthly,
    Weekly,
    /// Rolling 24 hours, one bucket per hour. Also selected by `24h`.
    #[serde(alias = "24h")]
    Daily,
}

impl Period {
    pub const ALL: [Period; 4] = [Period::Yearly, Period::Monthly, Period::Weekly, Period::Daily];

    pub fn as_str(&self) -> &'static str {
        match self { Self::Yearly => "Yearly", Self::Monthly => "Monthly", Self::Weekly => "Weekly", Self::Daily => "Daily" }
    }
}

impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Period {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "yearly" => Ok(Self::Yearly),
            "monthly" => Ok(Self::Monthly),
            "weekly" => Ok(Self::Weekly),
            "daily" | "24h" => Ok(Self::Daily),
            _ => Err(AnalyticsError::UnknownPeriod(s.to_string())),
        }
    }
}

/// Length of the rolling window compared by the KPI report.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KpiWindow {
    #[serde(rename = "30d")]
    Last30Days,
    #[serde(rename = "7d")]
    Last7Days,
    #[serde(rename = "24h")]
    Last24Hours,
}

impl KpiWindow {
    pub fn days(&self) -> i64 {
        match self { Self::Last30Days => 30, Self::Last7Days => 7, Self::Last24Hours => 1 }
    }

    pub fn length(&self) -> Duration { Duration::days(self.days()) }

    pub fn as_str(&self) -> &'static str {
        match self { Self::Last30Days => "30d", Self::Last7Days => "7d", Self::Last24Hours => "24h" }
    }
}

impl fmt::Display for KpiWindow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for KpiWindow {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "30d" => Ok(Self::Last30Days),
            "7d" => Ok(Self::Last7Days),
            "24h" => Ok(Self::Last24Hours),
            _ => Err(AnalyticsError::UnknownKpiWindow(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendMetric {
    Revenue,
    OrderCount,
}

impl FromStr for TrendMetric {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "revenue" => Ok(Self::Revenue),
            "orders" | "ordercount" | "order_count" => Ok(Self::OrderCount),
            _ => Err(AnalyticsError::UnknownMetric(s.to_string())),
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum TrendResolution {
    #[default]
    Daily,
    Hourly,
}

impl TrendResolution {
    pub fn label(&self) -> &'static str {
        match self { Self::Daily => "Day", Self::Hourly => "Hour" }
    }
}

impl FromStr for TrendResolution {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "daily" | "day" => Ok(Self::Daily),
            "hourly" | "hour" => Ok(Self::Hourly),
            _ => Err(AnalyticsError::UnknownResolution(s.to_string())),
        }
    }
}

/// What to do with a status outside the closed set.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UnknownStatusPolicy {
    /// Exclude the record and report it.
    #[default]
    Reject,
    /// Keep the record as in-progress and still report it.
    TreatAsInProgress,
}

impl FromStr for UnknownStatusPolicy {
    type Err = AnalyticsError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reject" | "strict" => Ok(Self::Reject),
            "in_progress" | "treat_as_in_progress" | "lenient" => Ok(Self::TreatAsInProgress),
            _ => Err(AnalyticsError::UnknownPolicy(s.to_string())),
        }
    }
}

/// Label of one bucket: month name, day of month, weekday name or `HH:00`.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct BucketKey(String);

impl BucketKey {
    pub fn new(value: impl Into<String>) -> Self { Self(value.into()) }
    pub fn as_str(&self) -> &str { &self.0 }
}

impl fmt::Display for BucketKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { write!(f, "{}", self.0) }
}

impl PartialEq<&str> for BucketKey {
    fn eq(&self, other: &&str) -> bool { self.0 == *other }
}

/// Metric slot an order lands in. Cancelled orders land in none.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "camelCase")]
pub enum StatusBucket {
    Completed,
    Dispatched,
    InProgress,
    Cancelled,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Classification {
    pub counts_toward_orders: bool,
    pub counts_toward_revenue: bool,
    pub status_bucket: StatusBucket,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_period_parse() {
        assert_eq!("Yearly".parse::<Period>().unwrap(), Period::Yearly);
        assert_eq!("monthly".parse::<Period>().unwrap(), Period::Monthly);
        assert_eq!("24h".parse::<Period>().unwrap(), Period::Daily);
        assert_eq!("Daily".parse::<Period>().unwrap(), Period::Daily);
        assert!(matches!("fortnightly".parse::<Period>(), Err(AnalyticsError::UnknownPeriod(_))));
    }

    #[test]
    fn test_kpi_window() {
        let w: KpiWindow = "7d".parse().unwrap();
        assert_eq!(w.days(), 7);
        assert_eq!(KpiWindow::Last24Hours.length(), Duration::days(1));
        assert_eq!(serde_json::to_string(&KpiWindow::Last30Days).unwrap(), "\"30d\"");
        assert!("1y".parse::<KpiWindow>().is_err());
    }

    #[test]
    fn test_policy_parse() {
        assert_eq!("reject".parse::<UnknownStatusPolicy>().unwrap(), UnknownStatusPolicy::Reject);
        assert_eq!("in_progress".parse::<UnknownStatusPolicy>().unwrap(), UnknownStatusPolicy::TreatAsInProgress);
        assert!("coerce".parse::<UnknownStatusPolicy>().is_err());
    }
}
