use chrono::{DateTime, SecondsFormat, Utc};

/// Ambient page context captured at a point in time.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct EnvironmentSnapshot {
    pub url: String,
    pub referrer: String,
    pub user_agent: String,
    pub language: String,
    pub title: String,
    pub viewport_width: u32,
    pub viewport_height: u32,
}

impl EnvironmentSnapshot {
    pub fn viewport(&self) -> String {
        format!("{}x{}", self.viewport_width, self.viewport_height)
    }
}

pub trait EnvironmentProvider {
    fn snapshot(&self) -> EnvironmentSnapshot;

    fn current_url(&self) -> String {
        self.snapshot().url
    }

    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

pub fn iso_timestamp(at: DateTime<Utc>) -> String {
    at.to_rfc3339_opts(SecondsFormat::Millis, true)
}

/// Reads the live browser window.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrowserEnvironment;

impl EnvironmentProvider for BrowserEnvironment {
    fn snapshot(&self) -> EnvironmentSnapshot {
        let Some(window) = web_sys::window() else {
            return EnvironmentSnapshot::default();
        };
        let document = window.document();
        let navigator = window.navigator();
        let dimension = |value: Result<wasm_bindgen::JsValue, wasm_bindgen::JsValue>| {
            value.ok().and_then(|v| v.as_f64()).unwrap_or(0.0) as u32
        };

        EnvironmentSnapshot {
            url: window.location().href().unwrap_or_default(),
            referrer: document.as_ref().map(|d| d.referrer()).unwrap_or_default(),
            user_agent: navigator.user_agent().unwrap_or_default(),
            language: navigator.language().unwrap_or_default(),
            title: document.as_ref().map(|d| d.title()).unwrap_or_default(),
            viewport_width: dimension(window.inner_width()),
            viewport_height: dimension(window.inner_height()),
        }
    }

    fn current_url(&self) -> String {
        web_sys::window()
            .and_then(|w| w.location().href().ok())
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn timestamps_are_rfc3339_with_millis() {
        let at = Utc.with_ymd_and_hms(2026, 3, 4, 5, 6, 7).unwrap();
        assert_eq!(iso_timestamp(at), "2026-03-04T05:06:07.000Z");
    }

    #[test]
    fn viewport_is_width_by_height() {
        let env = EnvironmentSnapshot {
            viewport_width: 390,
            viewport_height: 844,
            ..Default::default()
        };
        assert_eq!(env.viewport(), "390x844");
    }
}
