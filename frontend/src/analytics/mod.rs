//! Client-side event tracking: identity, enrichment and fan-out to sinks.

mod debug_log;
mod environment;
mod event;
mod experiments;
pub mod hooks;
mod journey;
mod scroll;
pub mod sinks;
mod storage;
mod tracker;
mod vitals;

use std::ops::Deref;
use std::rc::Rc;

pub use debug_log::DEBUG_LOG_CAPACITY;
pub use environment::BrowserEnvironment;
pub use event::{EventKind, Properties};
pub use experiments::Variant;
pub use journey::JOURNEY_CAPACITY;
pub use scroll::scroll_depth_percent;
pub use storage::{KeyValueStore, MemoryStore, WebStorage};
pub use tracker::Tracker;
pub use vitals::Metric;

use crate::config::TrackingConfig;
use sinks::{GtagSink, RemoteSink, SessionReplaySink};

/// Shared handle given to components through a Yew context.
#[derive(Clone)]
pub struct TrackerHandle(Rc<Tracker>);

impl TrackerHandle {
    pub fn new(tracker: Tracker) -> Self {
        Self(Rc::new(tracker))
    }
}

impl PartialEq for TrackerHandle {
    fn eq(&self, other: &Self) -> bool {
        Rc::ptr_eq(&self.0, &other.0)
    }
}

impl Deref for TrackerHandle {
    type Target = Tracker;

    fn deref(&self) -> &Tracker {
        &self.0
    }
}

/// Tracker wired to browser storage and the sinks enabled by `config`.
pub fn browser_tracker(config: TrackingConfig) -> Tracker {
    let durable: Rc<dyn KeyValueStore> = match WebStorage::local() {
        Some(storage) => Rc::new(storage),
        None => {
            log::warn!("localStorage unavailable, user id and experiments will not persist");
            Rc::new(MemoryStore::new())
        }
    };
    let session: Rc<dyn KeyValueStore> = match WebStorage::session() {
        Some(storage) => Rc::new(storage),
        None => Rc::new(MemoryStore::new()),
    };

    let mut tracker = Tracker::new(config.clone(), durable, session, Rc::new(BrowserEnvironment));
    if config.production {
        tracker = tracker.with_sink(Box::new(RemoteSink::new(config.ingest_url.clone())));
    }
    if let Some(id) = config.analytics_id {
        tracker = tracker.with_sink(Box::new(GtagSink::new(id)));
    }
    if let Some(id) = config.replay_project_id {
        tracker = tracker.with_sink(Box::new(SessionReplaySink::new(id)));
    }
    tracker
}
