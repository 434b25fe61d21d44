use std::collections::{BTreeMap, HashSet, VecDeque};

use tokio::sync::Mutex;

use crate::models::event_models::{EventSummary, StoredEvent};

/// Bounded in-memory buffer of the newest ingested events.
pub struct EventRepository {
    capacity: usize,
    events: Mutex<VecDeque<StoredEvent>>,
}

impl EventRepository {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity: capacity.max(1),
            events: Mutex::new(VecDeque::new()),
        }
    }

    pub async fn record(&self, event: StoredEvent) {
        let mut events = self.events.lock().await;
        events.push_back(event);
        while events.len() > self.capacity {
            events.pop_front();
        }
    }

    pub async fn summary(&self) -> EventSummary {
        let events = self.events.lock().await;
        let mut by_type = BTreeMap::new();
        let mut sessions = HashSet::new();
        for event in events.iter() {
            *by_type.entry(event.kind.clone()).or_insert(0) += 1;
            sessions.insert(event.session_id.as_str());
        }
        EventSummary {
            total: events.len(),
            sessions: sessions.len(),
            by_type,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use serde_json::Map;

    fn event(kind: &str, session: &str) -> StoredEvent {
        StoredEvent {
            kind: kind.to_string(),
            session_id: session.to_string(),
            user_id: "user_1".to_string(),
            timestamp: Utc::now(),
            received_at: Utc::now(),
            url: "https://clinic.test/".to_string(),
            properties: Map::new(),
        }
    }

    #[tokio::test]
    async fn evicts_oldest_beyond_capacity() {
        let repository = EventRepository::new(2);
        repository.record(event("page_view", "s1")).await;
        repository.record(event("cta_click", "s1")).await;
        repository.record(event("cta_click", "s2")).await;

        let summary = repository.summary().await;
        assert_eq!(summary.total, 2);
        assert_eq!(summary.sessions, 2);
        assert_eq!(summary.by_type.get("cta_click"), Some(&2));
        assert_eq!(summary.by_type.get("page_view"), None);
    }
}
