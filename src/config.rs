//! Service configuration

use chrono_tz::Tz;

use crate::domain::value_objects::UnknownStatusPolicy;
use crate::{AnalyticsError, Result};

#[derive(Debug, Clone)]
pub struct AnalyticsConfig {
    /// HTTP port (env: PORT)
    pub port: u16,
    /// Zone used for calendar bucketing (env: ANALYTICS_TZ, IANA name)
    pub timezone: Tz,
    /// Handling of statuses outside the closed set (env: UNKNOWN_STATUS_POLICY)
    pub unknown_status: UnknownStatusPolicy,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self { port: 8083, timezone: Tz::UTC, unknown_status: UnknownStatusPolicy::Reject }
    }
}

impl AnalyticsConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let defaults = Self::default();
        let var = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        let port = match var("PORT") {
            Some(p) => p.trim().parse().map_err(|_| AnalyticsError::InvalidParameter(format!("PORT must be a port number, got {p:?}")))?,
            None => defaults.port,
        };
        let timezone = match var("ANALYTICS_TZ") {
            Some(name) => name.trim().parse::<Tz>().map_err(|_| AnalyticsError::UnknownTimeZone(name.clone()))?,
            None => defaults.timezone,
        };
        let unknown_status = match var("UNKNOWN_STATUS_POLICY") {
            Some(policy) => policy.parse()?,
            None => defaults.unknown_status,
        };

        Ok(Self { port, timezone, unknown_status })
    }
}
