use std::collections::VecDeque;
use std::rc::Rc;

use log::warn;

use super::event::Event;
use super::storage::{KeyValueStore, DEBUG_EVENTS_KEY};

pub const DEBUG_LOG_CAPACITY: usize = 100;

/// Non-production ring of recently emitted events, most recent last.
pub struct DebugLog {
    store: Rc<dyn KeyValueStore>,
    capacity: usize,
}

impl DebugLog {
    pub fn new(store: Rc<dyn KeyValueStore>, capacity: usize) -> Self {
        Self { store, capacity }
    }

    pub fn append(&self, event: &Event) {
        let mut events: VecDeque<Event> = self.entries().into();
        events.push_back(event.clone());
        while events.len() > self.capacity {
            events.pop_front();
        }
        let raw = match serde_json::to_string(&events) {
            Ok(raw) => raw,
            Err(e) => {
                warn!("Failed to serialize debug events: {}", e);
                return;
            }
        };
        if let Err(e) = self.store.set(DEBUG_EVENTS_KEY, &raw) {
            warn!("Failed to persist debug events: {}", e);
        }
    }

    pub fn entries(&self) -> Vec<Event> {
        let Some(raw) = self.store.get(DEBUG_EVENTS_KEY) else {
            return Vec::new();
        };
        serde_json::from_str(&raw).unwrap_or_else(|e| {
            warn!("Discarding unreadable debug events: {}", e);
            Vec::new()
        })
    }

    pub fn clear(&self) {
        if let Err(e) = self.store.remove(DEBUG_EVENTS_KEY) {
            warn!("Failed to clear debug events: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::event::EventKind;
    use crate::analytics::storage::MemoryStore;

    fn event(n: usize) -> Event {
        Event {
            kind: EventKind::CtaClick,
            session_id: "session_1".to_string(),
            user_id: "user_1".to_string(),
            timestamp: "2026-01-01T00:00:00.000Z".to_string(),
            url: "https://clinic.test/".to_string(),
            properties: crate::props! { "n" => n },
        }
    }

    #[test]
    fn keeps_newest_entries_last() {
        let log = DebugLog::new(Rc::new(MemoryStore::new()), 3);
        for n in 0..5 {
            log.append(&event(n));
        }
        let kept: Vec<usize> = log
            .entries()
            .iter()
            .filter_map(|e| e.properties["n"].as_u64())
            .map(|n| n as usize)
            .collect();
        assert_eq!(kept, vec![2, 3, 4]);
    }

    #[test]
    fn unreadable_log_starts_over() {
        let store = Rc::new(MemoryStore::new());
        store.set(DEBUG_EVENTS_KEY, "{not json").unwrap();
        let log = DebugLog::new(store.clone(), 10);
        assert!(log.entries().is_empty());

        log.append(&event(7));
        assert_eq!(log.entries(), vec![event(7)]);
    }
}
