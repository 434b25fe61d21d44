use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Free-form event payload.
pub type Properties = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    PageView,
    CtaClick,
    PhoneClick,
    FormStarted,
    FormStepCompleted,
    FormSubmitted,
    FormError,
    ScrollDepth,
    PerformanceMetric,
    Error,
    Conversion,
    ExperimentAssigned,
}

impl EventKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            EventKind::PageView => "page_view",
            EventKind::CtaClick => "cta_click",
            EventKind::PhoneClick => "phone_click",
            EventKind::FormStarted => "form_started",
            EventKind::FormStepCompleted => "form_step_completed",
            EventKind::FormSubmitted => "form_submitted",
            EventKind::FormError => "form_error",
            EventKind::ScrollDepth => "scroll_depth",
            EventKind::PerformanceMetric => "performance_metric",
            EventKind::Error => "error",
            EventKind::Conversion => "conversion",
            EventKind::ExperimentAssigned => "experiment_assigned",
        }
    }
}

impl std::fmt::Display for EventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One enriched observation. Built once by the tracker and never mutated.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
    #[serde(rename = "type")]
    pub kind: EventKind,
    pub session_id: String,
    pub user_id: String,
    pub timestamp: String,
    pub url: String,
    #[serde(default)]
    pub properties: Properties,
}

impl Event {
    /// Flat wire shape: context fields first, caller properties on top.
    pub fn payload(&self) -> Value {
        let mut body = Map::new();
        body.insert("type".to_string(), Value::from(self.kind.as_str()));
        body.insert("sessionId".to_string(), Value::from(self.session_id.clone()));
        body.insert("userId".to_string(), Value::from(self.user_id.clone()));
        body.insert("timestamp".to_string(), Value::from(self.timestamp.clone()));
        body.insert("url".to_string(), Value::from(self.url.clone()));
        for (key, value) in &self.properties {
            body.insert(key.clone(), value.clone());
        }
        Value::Object(body)
    }
}

/// A line item of the e-commerce style conversion report.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseItem {
    pub item_id: String,
    pub item_name: String,
    pub item_category: String,
    pub price: f64,
    pub quantity: u32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Purchase {
    pub transaction_id: String,
    pub value: f64,
    pub currency: String,
    pub items: Vec<PurchaseItem>,
}

/// Builds a property map from `key => value` pairs.
#[macro_export]
macro_rules! props {
    () => { $crate::analytics::Properties::new() };
    ($($key:expr => $value:expr),+ $(,)?) => {{
        let mut map = $crate::analytics::Properties::new();
        $( map.insert(($key).to_string(), ::serde_json::json!($value)); )+
        map
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample() -> Event {
        Event {
            kind: EventKind::CtaClick,
            session_id: "session_1".to_string(),
            user_id: "user_1".to_string(),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            url: "https://clinic.test/".to_string(),
            properties: crate::props! { "url" => "https://clinic.test/offer", "foo" => 1 },
        }
    }

    #[test]
    fn payload_lets_caller_properties_win() {
        let payload = sample().payload();
        assert_eq!(payload["type"], json!("cta_click"));
        assert_eq!(payload["sessionId"], json!("session_1"));
        assert_eq!(payload["url"], json!("https://clinic.test/offer"));
        assert_eq!(payload["foo"], json!(1));
    }

    #[test]
    fn event_kind_serializes_as_snake_case() {
        let value = serde_json::to_value(EventKind::PerformanceMetric).unwrap();
        assert_eq!(value, json!("performance_metric"));
        assert_eq!(EventKind::PerformanceMetric.to_string(), "performance_metric");
    }

    #[test]
    fn stored_event_keeps_nested_properties() {
        let event = sample();
        let stored = serde_json::to_value(&event).unwrap();
        assert_eq!(stored["properties"]["foo"], json!(1));
        let back: Event = serde_json::from_value(stored).unwrap();
        assert_eq!(back, event);
    }
}
