use serde::Serialize;
use serde_json::Value;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use web_sys::js_sys::{Function, Reflect};

use super::{js_error, MissingScript, Sink, SinkError};
use crate::analytics::environment::EnvironmentSnapshot;
use crate::analytics::event::Event;

pub const DEFAULT_REPLAY_GLOBAL: &str = "LogRocket";

fn window_global(name: &str) -> Option<JsValue> {
    let window = web_sys::window()?;
    Reflect::get(&window, &JsValue::from_str(name))
        .ok()
        .filter(|v| !v.is_undefined() && !v.is_null())
}

/// Session-replay script exposing `init(projectId)` and `track(name, props)`
/// on a window global.
pub struct SessionReplaySink {
    global: &'static str,
    project_id: String,
    find_global: fn(&str) -> Option<JsValue>,
    missing: MissingScript,
}

impl SessionReplaySink {
    pub fn new(project_id: impl Into<String>) -> Self {
        Self::with_lookup(project_id, window_global)
    }

    fn with_lookup(project_id: impl Into<String>, find_global: fn(&str) -> Option<JsValue>) -> Self {
        Self {
            global: DEFAULT_REPLAY_GLOBAL,
            project_id: project_id.into(),
            find_global,
            missing: MissingScript::new(DEFAULT_REPLAY_GLOBAL),
        }
    }

    /// `None` when the script is not on the page.
    fn method(&self, name: &str) -> Result<Option<(JsValue, Function)>, SinkError> {
        let Some(target) = (self.find_global)(self.global) else {
            self.missing.note();
            return Ok(None);
        };
        let method = Reflect::get(&target, &JsValue::from_str(name))
            .map_err(js_error)?
            .dyn_into::<Function>()
            .map_err(js_error)?;
        Ok(Some((target, method)))
    }
}

impl Sink for SessionReplaySink {
    fn name(&self) -> &'static str {
        "session_replay"
    }

    fn setup(&self, _env: &EnvironmentSnapshot) -> Result<(), SinkError> {
        let Some((target, init)) = self.method("init")? else {
            return Ok(());
        };
        init.call1(&target, &JsValue::from_str(&self.project_id))
            .map(|_| ())
            .map_err(js_error)
    }

    fn deliver(&self, event: &Event) -> Result<(), SinkError> {
        let Some((target, track)) = self.method("track")? else {
            return Ok(());
        };
        let props = Value::Object(event.properties.clone())
            .serialize(&serde_wasm_bindgen::Serializer::json_compatible())
            .map_err(|e| SinkError::Encode(e.to_string()))?;
        track
            .call2(&target, &JsValue::from_str(event.kind.as_str()), &props)
            .map(|_| ())
            .map_err(js_error)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::event::EventKind;

    #[test]
    fn absent_replay_script_is_a_silent_no_op() {
        let sink = SessionReplaySink::with_lookup("clinic/site", |_| None);
        let event = Event {
            kind: EventKind::PageView,
            session_id: "session_1".to_string(),
            user_id: "user_1".to_string(),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            url: "https://clinic.test/".to_string(),
            properties: crate::props! {},
        };
        assert!(sink.setup(&EnvironmentSnapshot::default()).is_ok());
        assert!(sink.deliver(&event).is_ok());
    }
}
