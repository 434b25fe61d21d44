use gloo_net::http::Request;
use log::warn;
use wasm_bindgen_futures::spawn_local;

use super::{Sink, SinkError};
use crate::analytics::event::Event;

/// Fire-and-forget POST of each event to the ingestion endpoint.
pub struct RemoteSink {
    endpoint: String,
}

impl RemoteSink {
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            endpoint: endpoint.into(),
        }
    }
}

impl Sink for RemoteSink {
    fn name(&self) -> &'static str {
        "remote"
    }

    fn deliver(&self, event: &Event) -> Result<(), SinkError> {
        let request = Request::post(&self.endpoint)
            .json(&event.payload())
            .map_err(|e| SinkError::Encode(e.to_string()))?;
        let kind = event.kind;
        spawn_local(async move {
            match request.send().await {
                Ok(response) if !response.ok() => {
                    warn!("Ingestion rejected {} event with status {}", kind, response.status());
                }
                Ok(_) => {}
                Err(e) => warn!("Failed to send {} event: {}", kind, e),
            }
        });
        Ok(())
    }
}
