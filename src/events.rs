// 📜 Audit Trail - Every successful change is recorded as an event
// Rejected operations record nothing

use chrono::{DateTime, Utc};
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};
use std::sync::Arc;

/// Event for audit trail
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Event {
    pub event_id: String,
    pub timestamp: DateTime<Utc>,
    pub event_type: String,
    pub entity_type: String,
    pub entity_id: String,
    pub data: serde_json::Value,
    pub actor: String,
}

impl Event {
    pub fn new(
        event_type: &str,
        entity_type: &str,
        entity_id: &str,
        data: serde_json::Value,
        actor: &str,
    ) -> Self {
        Self {
            event_id: uuid::Uuid::new_v4().to_string(),
            timestamp: Utc::now(),
            event_type: event_type.to_string(),
            entity_type: entity_type.to_string(),
            entity_id: entity_id.to_string(),
            data,
            actor: actor.to_string(),
        }
    }
}

/// Append-only, shared event log (clones see the same events)
#[derive(Debug, Clone)]
pub struct EventLog {
    actor: String,
    events: Arc<RwLock<Vec<Event>>>,
}

impl EventLog {
    pub fn new(actor: &str) -> Self {
        EventLog {
            actor: actor.to_string(),
            events: Arc::new(RwLock::new(Vec::new())),
        }
    }

    pub fn record(
        &self,
        event_type: &str,
        entity_type: &str,
        entity_id: impl ToString,
        data: serde_json::Value,
    ) {
        let event = Event::new(
            event_type,
            entity_type,
            &entity_id.to_string(),
            data,
            &self.actor,
        );
        self.events.write().push(event);
    }

    /// All events, oldest first
    pub fn events(&self) -> Vec<Event> {
        self.events.read().clone()
    }

    pub fn events_for(&self, entity_id: &str) -> Vec<Event> {
        self.events
            .read()
            .iter()
            .filter(|e| e.entity_id == entity_id)
            .cloned()
            .collect()
    }

    pub fn len(&self) -> usize {
        self.events.read().len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.read().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_creation() {
        let event = Event::new(
            "AccountCreated",
            "account",
            "1001",
            serde_json::json!({"balance": 0.0}),
            "bank_account_manager",
        );

        assert!(!event.event_id.is_empty());
        assert_eq!(event.event_type, "AccountCreated");
        assert_eq!(event.entity_id, "1001");
        assert_eq!(event.data["balance"], 0.0);
    }

    #[test]
    fn test_event_log_filters_by_entity() {
        let log = EventLog::new("test");
        log.record("Created", "account", 1001, serde_json::json!({}));
        log.record("Created", "account", 1002, serde_json::json!({}));
        log.record("Deposited", "account", 1001, serde_json::json!({"amount": 5.0}));

        assert_eq!(log.len(), 3);
        let for_1001 = log.events_for("1001");
        assert_eq!(for_1001.len(), 2);
        assert_eq!(for_1001[1].event_type, "Deposited");
        assert_eq!(for_1001[1].actor, "test");
    }

    #[test]
    fn test_event_log_shared_between_clones() {
        let log = EventLog::new("test");
        let other = log.clone();
        other.record("Created", "product", 1, serde_json::json!({}));
        assert!(!log.is_empty());
    }
}
