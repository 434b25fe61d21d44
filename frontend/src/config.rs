use crate::analytics::{DEBUG_LOG_CAPACITY, JOURNEY_CAPACITY};

/// Debug builds talk to `clinic-backend` on its default port.
#[cfg(debug_assertions)]
pub fn get_backend_url() -> &'static str {
    "http://localhost:3001"
}

/// Release builds are served behind the same origin as the API.
#[cfg(not(debug_assertions))]
pub fn get_backend_url() -> &'static str {
    ""
}

#[derive(Debug, Clone, PartialEq)]
pub struct TrackingConfig {
    /// Release builds post to the ingestion endpoint; debug builds keep a local event log instead.
    pub production: bool,
    pub ingest_url: String,
    pub analytics_id: Option<String>,
    pub replay_project_id: Option<String>,
    pub currency: String,
    pub journey_capacity: usize,
    pub debug_capacity: usize,
}

impl TrackingConfig {
    pub fn from_build() -> Self {
        Self {
            production: !cfg!(debug_assertions),
            ingest_url: format!("{}/api/analytics/events", get_backend_url()),
            analytics_id: option_env!("CLINIC_ANALYTICS_ID").map(str::to_string),
            replay_project_id: option_env!("CLINIC_REPLAY_ID").map(str::to_string),
            ..Self::default()
        }
    }
}

impl Default for TrackingConfig {
    fn default() -> Self {
        Self {
            production: false,
            ingest_url: "/api/analytics/events".to_string(),
            analytics_id: None,
            replay_project_id: None,
            currency: "USD".to_string(),
            journey_capacity: JOURNEY_CAPACITY,
            debug_capacity: DEBUG_LOG_CAPACITY,
        }
    }
}
