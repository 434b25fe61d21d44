use std::collections::VecDeque;
use std::rc::Rc;

use log::warn;
use serde::{Deserialize, Serialize};

use super::event::Properties;
use super::storage::{KeyValueStore, JOURNEY_KEY};

pub const JOURNEY_CAPACITY: usize = 50;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JourneyStep {
    pub action: String,
    pub timestamp: String,
    pub url: String,
    #[serde(default)]
    pub properties: Properties,
}

/// Session-scoped, FIFO-bounded path of user actions.
pub struct JourneyLog {
    store: Rc<dyn KeyValueStore>,
    capacity: usize,
}

impl JourneyLog {
    pub fn new(store: Rc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self { store, capacity }
    }

    pub fn push(&self, step: JourneyStep) {
        let mut steps: VecDeque<JourneyStep> = self.steps().into();
        steps.push_back(step);
        while steps.len() > self.capacity {
            steps.pop_front();
        }
        match serde_json::to_string(&steps) {
            Ok(raw) => {
                if let Err(e) = self.store.set(JOURNEY_KEY, &raw) {
                    warn!("Failed to persist user journey: {}", e);
                }
            }
            Err(e) => warn!("Failed to serialize user journey: {}", e),
        }
    }

    /// Oldest first. Owned copy, unaffected by later pushes.
    pub fn steps(&self) -> Vec<JourneyStep> {
        let Some(raw) = self.store.get(JOURNEY_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Discarding unreadable user journey: {}", e);
            Vec::new()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::storage::MemoryStore;

    fn step(n: usize) -> JourneyStep {
        JourneyStep {
            action: format!("step_{}", n),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            url: "https://clinic.test/".to_string(),
            properties: Properties::new(),
        }
    }

    #[test]
    fn keeps_only_the_newest_entries_in_order() {
        let log = JourneyLog::new(Rc::new(MemoryStore::new()), 3);
        for n in 0..5 {
            log.push(step(n));
        }
        let actions: Vec<_> = log.steps().into_iter().map(|s| s.action).collect();
        assert_eq!(actions, vec!["step_2", "step_3", "step_4"]);
    }

    #[test]
    fn corrupt_storage_reads_as_empty() {
        let store = Rc::new(MemoryStore::new());
        store.set(JOURNEY_KEY, "{not json").unwrap();
        let log = JourneyLog::new(store, JOURNEY_CAPACITY);
        assert!(log.steps().is_empty());
        log.push(step(1));
        assert_eq!(log.steps().len(), 1);
    }
}
