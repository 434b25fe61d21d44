use serde::Serialize;
use serde_json::{json, Value};
use wasm_bindgen::prelude::*;
use web_sys::js_sys::Reflect;

use super::{js_error, MissingScript, Sink, SinkError};
use crate::analytics::environment::EnvironmentSnapshot;
use crate::analytics::event::{Event, Purchase};

#[wasm_bindgen]
extern "C" {
    #[wasm_bindgen(catch, js_namespace = window, js_name = gtag)]
    fn gtag_call(command: &str, target: &str, params: JsValue) -> Result<(), JsValue>;
}

fn gtag_loaded() -> bool {
    web_sys::window()
        .map(|w| Reflect::has(&w, &JsValue::from_str("gtag")).unwrap_or(false))
        .unwrap_or(false)
}

fn to_js(value: &Value) -> Result<JsValue, SinkError> {
    value
        .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
        .map_err(|e| SinkError::Encode(e.to_string()))
}

/// Google Analytics `gtag` dispatcher. Does nothing while `gtag` is absent.
pub struct GtagSink {
    measurement_id: String,
    is_loaded: fn() -> bool,
    missing: MissingScript,
}

impl GtagSink {
    pub fn new(measurement_id: impl Into<String>) -> Self {
        Self::with_loader(measurement_id, gtag_loaded)
    }

    fn with_loader(measurement_id: impl Into<String>, is_loaded: fn() -> bool) -> Self {
        Self {
            measurement_id: measurement_id.into(),
            is_loaded,
            missing: MissingScript::new("gtag"),
        }
    }

    fn send(&self, command: &str, target: &str, params: &Value) -> Result<(), SinkError> {
        if !(self.is_loaded)() {
            self.missing.note();
            return Ok(());
        }
        gtag_call(command, target, to_js(params)?).map_err(js_error)
    }
}

impl Sink for GtagSink {
    fn name(&self) -> &'static str {
        "gtag"
    }

    fn setup(&self, env: &EnvironmentSnapshot) -> Result<(), SinkError> {
        let config = json!({
            "page_location": env.url,
            "page_title": env.title,
            "send_page_view": false,
        });
        self.send("config", &self.measurement_id, &config)
    }

    fn deliver(&self, event: &Event) -> Result<(), SinkError> {
        let mut params = Value::Object(event.properties.clone());
        params["session_id"] = Value::from(event.session_id.clone());
        params["page_location"] = Value::from(event.url.clone());
        self.send("event", event.kind.as_str(), &params)
    }

    fn deliver_purchase(&self, purchase: &Purchase) -> Result<(), SinkError> {
        let params = serde_json::to_value(purchase).map_err(|e| SinkError::Encode(e.to_string()))?;
        self.send("event", "purchase", &params)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::event::{EventKind, PurchaseItem};

    #[test]
    fn absent_gtag_is_a_silent_no_op() {
        let sink = GtagSink::with_loader("G-TEST", || false);
        let event = Event {
            kind: EventKind::CtaClick,
            session_id: "session_1".to_string(),
            user_id: "user_1".to_string(),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            url: "https://clinic.test/".to_string(),
            properties: crate::props! { "label" => "Book now" },
        };
        let purchase = Purchase {
            transaction_id: "txn_1".to_string(),
            value: 0.0,
            currency: "USD".to_string(),
            items: vec![PurchaseItem {
                item_id: "contact_request".to_string(),
                item_name: "whitening".to_string(),
                item_category: "dental_service".to_string(),
                price: 0.0,
                quantity: 1,
            }],
        };

        assert!(sink.setup(&EnvironmentSnapshot::default()).is_ok());
        assert!(sink.deliver(&event).is_ok());
        assert!(sink.deliver_purchase(&purchase).is_ok());
    }
}
