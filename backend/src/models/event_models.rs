use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

pub const KNOWN_EVENT_TYPES: [&str; 12] = [
    "page_view",
    "cta_click",
    "phone_click",
    "form_started",
    "form_step_completed",
    "form_submitted",
    "form_error",
    "scroll_depth",
    "performance_metric",
    "error",
    "conversion",
    "experiment_assigned",
];

/// Flat wire shape posted by the site: context fields plus free-form properties.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct IncomingEvent {
    #[serde(rename = "type")]
    pub kind: String,
    pub session_id: String,
    pub user_id: String,
    pub timestamp: String,
    #[serde(default)]
    pub url: String,
    #[serde(flatten)]
    pub properties: Map<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
pub struct StoredEvent {
    pub kind: String,
    pub session_id: String,
    pub user_id: String,
    pub timestamp: DateTime<Utc>,
    pub received_at: DateTime<Utc>,
    pub url: String,
    pub properties: Map<String, Value>,
}

#[derive(Debug, Serialize, PartialEq)]
pub struct EventSummary {
    pub total: usize,
    pub sessions: usize,
    pub by_type: BTreeMap<String, usize>,
}
