//! Stateless HTTP surface over the analytics engine
//!
//! Every request carries its own order payload; nothing is stored between calls.

use std::sync::Arc;

use axum::{extract::{Query, State}, http::StatusCode, response::{IntoResponse, Response}, routing::{get, post}, Json, Router};
use chrono::{DateTime, Utc};
use chrono_tz::Tz;
use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::analytics::{aggregate, build_trend, kpi_report, summarize};
use crate::config::AnalyticsConfig;
use crate::domain::aggregates::{Bucket, BucketMetrics, KpiReport, TrendPoint};
use crate::domain::issues::DataIssue;
use crate::domain::value_objects::{KpiWindow, Period, TrendMetric, TrendResolution};
use crate::ingest::{self, Ingested};
use crate::{AnalyticsError, Result};

#[derive(Clone)]
pub struct AppState { pub config: Arc<AnalyticsConfig> }

impl AppState {
    pub fn new(config: AnalyticsConfig) -> Self { Self { config: Arc::new(config) } }
}

pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(|| async { Json(serde_json::json!({"status": "healthy", "service": "order-analytics"})) }))
        .route("/api/v1/analytics/buckets", post(bucket_series))
        .route("/api/v1/analytics/kpis", post(kpis))
        .route("/api/v1/analytics/trend", post(trend))
        .with_state(state)
}

impl IntoResponse for AnalyticsError {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, Json(serde_json::json!({"error": self.to_string()}))).into_response()
    }
}

#[derive(Debug, Deserialize)] pub struct BucketParams { pub period: String, pub now: Option<String> }
#[derive(Debug, Deserialize)] pub struct KpiParams { pub window: String, pub now: Option<String>, pub visitors: Option<u64> }

#[derive(Debug, Deserialize, Validate)]
pub struct TrendParams {
    pub metric: String,
    #[validate(range(min = 1, max = 366))]
    pub count: u32,
    pub resolution: Option<String>,
    pub now: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BucketResponse { pub period: Period, pub buckets: Vec<Bucket>, pub totals: BucketMetrics, pub issues: Vec<DataIssue> }

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KpiResponse { #[serde(flatten)] pub report: KpiReport, pub issues: Vec<DataIssue> }

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TrendResponse { pub metric: TrendMetric, pub resolution: TrendResolution, pub points: Vec<TrendPoint>, pub issues: Vec<DataIssue> }

/// Reference instant in the configured zone; the current time unless `now` is given.
fn reference_now(now: Option<&str>, tz: Tz) -> Result<DateTime<Tz>> {
    match now {
        Some(raw) => DateTime::parse_from_rfc3339(raw.trim())
            .map(|dt| dt.with_timezone(&tz))
            .map_err(|_| AnalyticsError::InvalidTimestamp(raw.to_string())),
        None => Ok(Utc::now().with_timezone(&tz)),
    }
}

fn ingest_payload(config: &AnalyticsConfig, payload: &serde_json::Value) -> Result<Ingested> {
    ingest::normalize(payload, config.timezone, config.unknown_status)
}

async fn bucket_series(State(s): State<AppState>, Query(p): Query<BucketParams>, Json(payload): Json<serde_json::Value>) -> Result<Json<BucketResponse>> {
    let period: Period = p.period.parse()?;
    let now = reference_now(p.now.as_deref(), s.config.timezone)?;
    let Ingested { orders, issues } = ingest_payload(&s.config, &payload)?;
    let buckets = aggregate(&orders, period, &now);
    let totals = summarize(&buckets);
    Ok(Json(BucketResponse { period, buckets, totals, issues }))
}

async fn kpis(State(s): State<AppState>, Query(p): Query<KpiParams>, Json(payload): Json<serde_json::Value>) -> Result<Json<KpiResponse>> {
    let window: KpiWindow = p.window.parse()?;
    let now = reference_now(p.now.as_deref(), s.config.timezone)?;
    let Ingested { orders, issues } = ingest_payload(&s.config, &payload)?;
    let report = kpi_report(&orders, window, &now, p.visitors);
    Ok(Json(KpiResponse { report, issues }))
}

async fn trend(State(s): State<AppState>, Query(p): Query<TrendParams>, Json(payload): Json<serde_json::Value>) -> Result<Json<TrendResponse>> {
    p.validate().map_err(|e| AnalyticsError::InvalidParameter(e.to_string()))?;
    let metric: TrendMetric = p.metric.parse()?;
    let resolution = p.resolution.as_deref().map(str::parse::<TrendResolution>).transpose()?.unwrap_or_default();
    let now = reference_now(p.now.as_deref(), s.config.timezone)?;
    let Ingested { orders, issues } = ingest_payload(&s.config, &payload)?;
    let points = build_trend(&orders, metric, p.count as usize, resolution, &now);
    Ok(Json(TrendResponse { metric, resolution, points, issues }))
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use serde_json::{json, Value};
    use tower::ServiceExt;

    fn app() -> Router { router(AppState::new(AnalyticsConfig::default())) }

    async fn post_json(uri: &str, body: Value) -> (StatusCode, Value) {
        let req = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json")
            .body(Body::from(body.to_string()))
            .unwrap();
        let resp = app().oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, serde_json::from_slice(&bytes).unwrap_or(Value::Null))
    }

    fn scenario() -> Value {
        json!([
            {"id": 1, "date": "2024-03-14T00:00:00Z", "status": "Completed", "amount": 100},
            {"id": 2, "date": "2024-03-10T00:00:00Z", "status": "Cancelled", "amount": 50},
            {"id": 3, "date": "2024-03-09T00:00:00Z", "status": "Pending", "amount": 30},
            {"id": 4, "date": "garbage", "status": "Completed", "amount": 10},
        ])
    }

    #[tokio::test]
    async fn test_health() {
        let req = Request::builder().uri("/health").body(Body::empty()).unwrap();
        let resp = app().oneshot(req).await.unwrap();
        assert_eq!(resp.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_weekly_buckets() {
        let (status, body) = post_json("/api/v1/analytics/buckets?period=Weekly&now=2024-03-15T12:00:00Z", scenario()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["period"], "Weekly");
        assert_eq!(body["buckets"].as_array().unwrap().len(), 7);
        assert_eq!(body["buckets"][5], json!({"key": "Thu", "total": 1, "completed": 1, "dispatched": 0, "inProgress": 0, "revenue": 100.0}));
        assert_eq!(body["totals"]["total"], 2);
        assert_eq!(body["issues"][0]["kind"], "malformedDate");
        assert_eq!(body["issues"][0]["orderId"], "4");
    }

    #[tokio::test]
    async fn test_kpis() {
        let (status, body) = post_json("/api/v1/analytics/kpis?window=7d&now=2024-03-15T12:00:00Z&visitors=50", scenario()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["window"], "7d");
        assert_eq!(body["current"]["totalRevenue"], 100.0);
        assert_eq!(body["change"]["revenue"], 100.0);
        assert_eq!(body["revenueTrend"].as_array().unwrap().len(), 7);
        assert_eq!(body["conversionRate"], 4.0);
    }

    #[tokio::test]
    async fn test_trend() {
        let (status, body) = post_json("/api/v1/analytics/trend?metric=orders&count=3&now=2024-03-15T12:00:00Z", scenario()).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resolution"], "daily");
        assert_eq!(body["points"], json!([
            {"label": "Day 1", "value": 0.0},
            {"label": "Day 2", "value": 1.0},
            {"label": "Day 3", "value": 0.0},
        ]));
    }

    #[tokio::test]
    async fn test_bad_selectors() {
        let (status, body) = post_json("/api/v1/analytics/buckets?period=Hourly", json!([])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert!(body["error"].as_str().unwrap().contains("Unknown period"));

        let (status, _) = post_json("/api/v1/analytics/trend?metric=revenue&count=0", json!([])).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);

        let (status, _) = post_json("/api/v1/analytics/kpis?window=7d", json!({"orders": []})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }
}
