//! Order ingestion
//!
//! Turns the REST order payload into canonical [`Order`]s. Bad records never
//! abort the batch: each one becomes a [`DataIssue`] and the rest go through.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use chrono_tz::Tz;
use serde::Deserialize;
use serde_json::Value;

use crate::analytics::bucketer::local_earliest;
use crate::analytics::classifier::{resolve_status, Resolution};
use crate::domain::issues::DataIssue;
use crate::domain::value_objects::UnknownStatusPolicy;
use crate::{AnalyticsError, Order, Result};

/// Order record as the API returns it. Field names vary between endpoints.
#[derive(Debug, Default, Deserialize)]
pub struct RawOrder {
    #[serde(default)]
    pub id: Option<Value>,
    #[serde(default)]
    pub created_at: Option<Value>,
    #[serde(default)]
    pub date: Option<Value>,
    #[serde(default, rename = "createdAt")]
    pub created_at_camel: Option<Value>,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub total_amount: Option<Value>,
    #[serde(default)]
    pub amount: Option<Value>,
    #[serde(default, rename = "totalAmount")]
    pub total_amount_camel: Option<Value>,
}

impl RawOrder {
    fn timestamp(&self) -> Option<&Value> {
        first_present([&self.created_at, &self.date, &self.created_at_camel])
    }

    fn raw_amount(&self) -> Option<&Value> {
        first_present([&self.total_amount, &self.amount, &self.total_amount_camel])
    }
}

fn first_present<const N: usize>(fields: [&Option<Value>; N]) -> Option<&Value> {
    fields.into_iter().find_map(|v| v.as_ref().filter(|v| !v.is_null()))
}

#[derive(Debug, Default)]
pub struct Ingested {
    pub orders: Vec<Order>,
    pub issues: Vec<DataIssue>,
}

/// Normalises a payload that is either an array of orders or a paginated `{ "results": [...] }`.
pub fn normalize(payload: &Value, tz: Tz, policy: UnknownStatusPolicy) -> Result<Ingested> {
    let records = match payload {
        Value::Array(items) => items,
        Value::Object(map) => match map.get("results") {
            Some(Value::Array(items)) => items,
            _ => return Err(AnalyticsError::InvalidPayload("expected an array or an object with `results`".into())),
        },
        _ => return Err(AnalyticsError::InvalidPayload("expected an array of orders".into())),
    };

    let mut out = Ingested::default();
    for (index, record) in records.iter().enumerate() {
        match RawOrder::deserialize(record) {
            Ok(raw) => normalize_one(index, &raw, tz, policy, &mut out),
            Err(e) => out.issues.push(DataIssue::MalformedRecord { index, reason: e.to_string() }),
        }
    }

    for issue in &out.issues {
        tracing::warn!(?issue, "Order data issue");
    }
    tracing::debug!(received = records.len(), accepted = out.orders.len(), issues = out.issues.len(), "Normalized orders");
    Ok(out)
}

fn normalize_one(index: usize, raw: &RawOrder, tz: Tz, policy: UnknownStatusPolicy, out: &mut Ingested) {
    let id = match &raw.id {
        Some(Value::String(s)) => s.clone(),
        Some(Value::Number(n)) => n.to_string(),
        _ => format!("record-{index}"),
    };

    let parsed = match raw.timestamp() {
        Some(Value::String(s)) => parse_timestamp(s, tz).ok(),
        _ => None,
    };
    let Some(date) = parsed else {
        let raw = raw.timestamp().map(|v| match v {
            Value::String(s) => s.clone(),
            other => other.to_string(),
        });
        out.issues.push(DataIssue::MalformedDate { order_id: id, raw });
        return;
    };

    let raw_status = raw.status.as_deref().unwrap_or_default();
    let status = match resolve_status(raw_status, policy) {
        Ok(Resolution::Recognised(status)) => status,
        Ok(Resolution::Fallback(status)) => {
            out.issues.push(DataIssue::UnknownStatus { order_id: id.clone(), raw: raw_status.to_string(), counted_as_in_progress: true });
            status
        }
        Err(_) => {
            out.issues.push(DataIssue::UnknownStatus { order_id: id, raw: raw_status.to_string(), counted_as_in_progress: false });
            return;
        }
    };

    let amount = match raw.raw_amount() {
        None => 0.0,
        Some(value) => {
            let parsed = parse_amount(value);
            match parsed {
                Some(a) if a.is_finite() && a >= 0.0 => a,
                _ => {
                    out.issues.push(DataIssue::InvalidAmount { order_id: id.clone(), raw: value.to_string() });
                    parsed.unwrap_or(f64::NAN)
                }
            }
        }
    };

    out.orders.push(Order::new(id, date, status, amount));
}

fn parse_amount(value: &Value) -> Option<f64> {
    match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Parses an ISO-8601 timestamp. Values without an offset are read in `tz`;
/// a bare date means local midnight.
pub fn parse_timestamp(raw: &str, tz: Tz) -> Result<DateTime<Utc>> {
    let s = raw.trim();
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Ok(dt.with_timezone(&Utc));
    }
    for fmt in ["%Y-%m-%dT%H:%M:%S%.f", "%Y-%m-%d %H:%M:%S%.f", "%Y-%m-%dT%H:%M"] {
        if let Ok(naive) = NaiveDateTime::parse_from_str(s, fmt) {
            return Ok(local_earliest(naive, tz).with_timezone(&Utc));
        }
    }
    NaiveDate::parse_from_str(s, "%Y-%m-%d")
        .map(|d| local_earliest(d.and_time(NaiveTime::MIN), tz).with_timezone(&Utc))
        .map_err(|_| AnalyticsError::InvalidTimestamp(raw.to_string()))
}
