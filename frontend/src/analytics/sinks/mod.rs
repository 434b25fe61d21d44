use std::cell::Cell;

use log::debug;
use thiserror::Error;

use super::environment::EnvironmentSnapshot;
use super::event::{Event, Purchase};

mod gtag;
mod remote;
mod replay;

pub use gtag::GtagSink;
pub use remote::RemoteSink;
pub use replay::SessionReplaySink;

#[derive(Debug, Error)]
pub enum SinkError {
    #[error("failed to encode payload: {0}")]
    Encode(String),
    #[error("script call failed: {0}")]
    Script(String),
}

/// Downstream consumer of tracked events.
///
/// Implementations own the knowledge of whether their backing library is
/// present and succeed silently when it is not. The tracker logs and drops
/// every error they return.
pub trait Sink {
    fn name(&self) -> &'static str;

    fn setup(&self, _env: &EnvironmentSnapshot) -> Result<(), SinkError> {
        Ok(())
    }

    fn deliver(&self, event: &Event) -> Result<(), SinkError>;

    fn deliver_purchase(&self, _purchase: &Purchase) -> Result<(), SinkError> {
        Ok(())
    }
}

pub(crate) fn js_error(value: wasm_bindgen::JsValue) -> SinkError {
    SinkError::Script(format!("{:?}", value))
}

/// Notes once per sink that its script is absent, e.g. blocked by an ad blocker.
pub(crate) struct MissingScript {
    script: &'static str,
    noted: Cell<bool>,
}

impl MissingScript {
    pub(crate) fn new(script: &'static str) -> Self {
        Self {
            script,
            noted: Cell::new(false),
        }
    }

    pub(crate) fn note(&self) {
        if !self.noted.replace(true) {
            debug!("{} is not loaded on this page, skipping", self.script);
        }
    }
}
