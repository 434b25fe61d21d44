use std::cell::{Cell, RefCell};
use std::collections::HashMap;
use std::rc::Rc;

use log::{debug, info, warn};
use rand::rngs::StdRng;
use serde_json::Value;
use uuid::Uuid;

use super::debug_log::DebugLog;
use super::environment::{iso_timestamp, EnvironmentProvider};
use super::event::{Event, EventKind, Properties, Purchase, PurchaseItem};
use super::experiments::{ExperimentBook, Variant};
use super::journey::{JourneyLog, JourneyStep};
use super::scroll::ScrollDepthTracker;
use super::sinks::Sink;
use super::storage::{KeyValueStore, USER_ID_KEY};
use super::vitals::{Metric, Rating};
use crate::config::TrackingConfig;

const CONVERSION_CATEGORY: &str = "dental_service";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Identity {
    pub session_id: String,
    pub user_id: String,
}

/// Client-side event pipeline.
///
/// Enriches events with session, user and page context and hands them to
/// every configured sink. No public operation returns an error: storage and
/// sink failures are logged and dropped so tracking can never break the page.
/// Interior mutability is `Cell`/`RefCell` because the host is a single
/// threaded event loop.
pub struct Tracker {
    config: TrackingConfig,
    durable: Rc<dyn KeyValueStore>,
    env: Rc<dyn EnvironmentProvider>,
    sinks: Vec<Box<dyn Sink>>,
    journey: JourneyLog,
    experiments: ExperimentBook,
    debug_log: Option<DebugLog>,
    identity: RefCell<Option<Identity>>,
    initialized: Cell<bool>,
    scroll: RefCell<ScrollDepthTracker>,
    vitals: RefCell<HashMap<Metric, f64>>,
}

impl Tracker {
    pub fn new(
        config: TrackingConfig,
        durable: Rc<dyn KeyValueStore>,
        session: Rc<dyn KeyValueStore>,
        env: Rc<dyn EnvironmentProvider>,
    ) -> Self {
        let debug_log =
            (!config.production).then(|| DebugLog::new(durable.clone(), config.debug_capacity));
        Self {
            journey: JourneyLog::new(session, config.journey_capacity),
            experiments: ExperimentBook::new(durable.clone()),
            debug_log,
            config,
            durable,
            env,
            sinks: Vec::new(),
            identity: RefCell::new(None),
            initialized: Cell::new(false),
            scroll: RefCell::new(ScrollDepthTracker::new()),
            vitals: RefCell::new(HashMap::new()),
        }
    }

    pub fn with_sink(mut self, sink: Box<dyn Sink>) -> Self {
        self.sinks.push(sink);
        self
    }

    pub fn with_experiment_rng(mut self, rng: StdRng) -> Self {
        self.experiments = ExperimentBook::with_rng(self.durable.clone(), rng);
        self
    }

    pub fn config(&self) -> &TrackingConfig {
        &self.config
    }

    pub fn is_initialized(&self) -> bool {
        self.initialized.get()
    }

    /// Session and user ids, created on first use.
    pub fn identity(&self) -> Identity {
        if let Some(identity) = self.identity.borrow().as_ref() {
            return identity.clone();
        }
        let identity = Identity {
            session_id: format!("session_{}", Uuid::new_v4().simple()),
            user_id: self.load_or_create_user_id(),
        };
        *self.identity.borrow_mut() = Some(identity.clone());
        identity
    }

    fn load_or_create_user_id(&self) -> String {
        if let Some(existing) = self.durable.get(USER_ID_KEY).filter(|id| !id.is_empty()) {
            return existing;
        }
        let user_id = format!("user_{}", Uuid::new_v4().simple());
        if let Err(e) = self.durable.set(USER_ID_KEY, &user_id) {
            warn!("Failed to persist user id, it will not survive a reload: {}", e);
        }
        user_id
    }

    /// Establishes identity, sets up sinks and emits the page view. Runs once.
    pub fn initialize(&self) {
        if self.initialized.replace(true) {
            debug!("Tracker already initialized");
            return;
        }
        let identity = self.identity();
        let env = self.env.snapshot();
        for sink in &self.sinks {
            if let Err(e) = sink.setup(&env) {
                warn!("Setup of {} sink failed: {}", sink.name(), e);
            }
        }
        info!(
            "Tracking initialized for session {} ({} sinks, production: {})",
            identity.session_id,
            self.sinks.len(),
            self.config.production
        );
        self.track(
            EventKind::PageView,
            crate::props! {
                "referrer" => env.referrer,
                "user_agent" => env.user_agent,
                "language" => env.language,
                "viewport" => env.viewport(),
                "title" => env.title,
            },
        );
    }

    pub fn track(&self, kind: EventKind, properties: Properties) -> Event {
        let identity = self.identity();
        let event = Event {
            kind,
            session_id: identity.session_id,
            user_id: identity.user_id,
            timestamp: iso_timestamp(self.env.now()),
            url: self.env.current_url(),
            properties,
        };
        self.dispatch(&event);
        event
    }

    fn dispatch(&self, event: &Event) {
        if let Some(log) = &self.debug_log {
            log.append(event);
            debug!("[analytics] {} {:?}", event.kind, event.properties);
        }
        for sink in &self.sinks {
            if let Err(e) = sink.deliver(event) {
                warn!("{} sink dropped {} event: {}", sink.name(), event.kind, e);
            }
        }
    }

    /// Emits a conversion carrying a copy of the journey, then reports it as
    /// a purchase to sinks that understand one.
    pub fn track_conversion(&self, conversion_type: &str, properties: Properties) -> Event {
        let value = properties
            .get("conversion_value")
            .or_else(|| properties.get("value"))
            .and_then(Value::as_f64)
            .unwrap_or(0.0);
        let item_name = properties
            .get("service")
            .and_then(Value::as_str)
            .unwrap_or(conversion_type)
            .to_string();
        let journey = serde_json::to_value(self.user_journey()).unwrap_or_else(|e| {
            warn!("Failed to snapshot user journey: {}", e);
            Value::Array(Vec::new())
        });

        let mut properties = properties;
        properties.insert("conversion_type".to_string(), Value::from(conversion_type));
        properties.insert("conversion_value".to_string(), Value::from(value));
        properties.insert("user_journey".to_string(), journey);
        let event = self.track(EventKind::Conversion, properties);

        let purchase = Purchase {
            transaction_id: format!("txn_{}", Uuid::new_v4().simple()),
            value,
            currency: self.config.currency.clone(),
            items: vec![PurchaseItem {
                item_id: conversion_type.to_string(),
                item_name,
                item_category: CONVERSION_CATEGORY.to_string(),
                price: value,
                quantity: 1,
            }],
        };
        for sink in &self.sinks {
            if let Err(e) = sink.deliver_purchase(&purchase) {
                warn!("{} sink dropped purchase report: {}", sink.name(), e);
            }
        }
        event
    }

    /// Returns the durable variant for `experiment_id`, drawing one on first use.
    pub fn experiment_variant(&self, experiment_id: &str) -> Variant {
        if experiment_id.trim().is_empty() {
            warn!("Empty experiment id, serving variant A without assignment");
            return Variant::A;
        }
        if let Some(variant) = self.experiments.lookup(experiment_id) {
            return variant;
        }
        let variant = self.experiments.assign(experiment_id);
        self.track(
            EventKind::ExperimentAssigned,
            crate::props! {
                "experiment_id" => experiment_id,
                "variant" => variant.as_str(),
            },
        );
        variant
    }

    pub fn add_to_user_journey(&self, action: &str, properties: Properties) {
        self.journey.push(JourneyStep {
            action: action.to_string(),
            timestamp: iso_timestamp(self.env.now()),
            url: self.env.current_url(),
            properties,
        });
    }

    pub fn user_journey(&self) -> Vec<JourneyStep> {
        self.journey.steps()
    }

    /// Feeds one scroll sample (percent) and emits any newly crossed milestones.
    pub fn record_scroll_depth(&self, depth: f64) -> Vec<u8> {
        let (crossed, max_depth) = {
            let mut scroll = self.scroll.borrow_mut();
            let crossed = scroll.observe(depth);
            (crossed, scroll.max_depth())
        };
        for milestone in &crossed {
            self.track(
                EventKind::ScrollDepth,
                crate::props! {
                    "depth" => milestone,
                    "max_depth" => max_depth.round(),
                },
            );
        }
        crossed
    }

    /// Rates a performance reading and emits it unless it repeats the last one.
    pub fn record_web_vital(&self, metric: Metric, value: f64) -> Option<Rating> {
        if self.vitals.borrow_mut().insert(metric, value) == Some(value) {
            return None;
        }
        let rating = metric.rate(value);
        self.track(
            EventKind::PerformanceMetric,
            crate::props! {
                "metric" => metric.name(),
                "value" => value,
                "rating" => rating.as_str(),
            },
        );
        Some(rating)
    }

    pub fn track_cta_click(&self, label: &str, location: &str) {
        let properties = crate::props! { "label" => label, "location" => location };
        self.add_to_user_journey("cta_click", properties.clone());
        self.track(EventKind::CtaClick, properties);
    }

    pub fn track_phone_click(&self, location: &str) {
        let properties = crate::props! { "location" => location };
        self.add_to_user_journey("phone_click", properties.clone());
        self.track(EventKind::PhoneClick, properties);
    }

    pub fn track_form_started(&self, form: &str) {
        let properties = crate::props! { "form" => form };
        self.add_to_user_journey("form_started", properties.clone());
        self.track(EventKind::FormStarted, properties);
    }

    pub fn track_form_step(&self, form: &str, step: u8) {
        let properties = crate::props! { "form" => form, "step" => step };
        self.add_to_user_journey("form_step_completed", properties.clone());
        self.track(EventKind::FormStepCompleted, properties);
    }

    pub fn track_form_submitted(&self, form: &str, mut properties: Properties) {
        properties.insert("form".to_string(), Value::from(form));
        self.add_to_user_journey("form_submitted", crate::props! { "form" => form });
        self.track(EventKind::FormSubmitted, properties);
    }

    pub fn track_error(&self, message: &str, source: &str) {
        self.track(
            EventKind::Error,
            crate::props! { "message" => message, "source" => source },
        );
    }

    /// Events kept in the non-production debug log, most recent last.
    pub fn debug_events(&self) -> Vec<Event> {
        self.debug_log
            .as_ref()
            .map(DebugLog::entries)
            .unwrap_or_default()
    }

    pub fn clear_debug_events(&self) {
        if let Some(log) = &self.debug_log {
            log.clear();
        }
    }
}
