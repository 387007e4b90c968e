//! Order Analytics - stateless dashboard analytics service

use anyhow::Result;
use order_analytics::api::{self, AppState};
use order_analytics::config::AnalyticsConfig;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry().with(tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| "info".into())).with(tracing_subscriber::fmt::layer()).init();

    let config = AnalyticsConfig::from_env()?;
    let port = config.port;
    tracing::info!(timezone = %config.timezone, unknown_status = ?config.unknown_status, "Loaded configuration");

    let app = api::router(AppState::new(config)).layer(TraceLayer::new_for_http()).layer(CorsLayer::permissive());

    tracing::info!("Order analytics listening on 0.0.0.0:{}", port);
    axum::serve(tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?, app).await?;
    Ok(())
}
