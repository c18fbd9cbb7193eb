//! Event emission.
//!
//! Events are pushed from the daemon to UI subscribers as JSON-RPC
//! notifications. Each subscriber has an independent buffer; a subscriber
//! that falls behind loses the oldest events.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

pub const DAEMON_STARTED: &str = "DaemonStarted";
pub const PAYOUT_REQUESTED: &str = "PayoutRequested";
pub const PAYOUT_PARTIALLY_FAILED: &str = "PayoutPartiallyFailed";
pub const PAYOUT_FAILED: &str = "PayoutFailed";
pub const REVENUE_REFRESHED: &str = "RevenueRefreshed";

/// An event emitted by the daemon.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Event {
    /// Event type name (e.g. "PayoutRequested").
    pub event_type: String,
    /// Unix timestamp.
    pub timestamp: u64,
    /// Type-specific payload.
    pub payload: serde_json::Value,
}

impl Event {
    /// Build an event stamped with the current time.
    pub fn now(event_type: &str, payload: serde_json::Value) -> Self {
        Self {
            event_type: event_type.to_string(),
            timestamp: std::time::SystemTime::now()
                .duration_since(std::time::UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs(),
            payload,
        }
    }
}

/// Filter for event subscriptions.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EventFilter {
    /// Category filter: "payout", "revenue", "system".
    #[serde(default)]
    pub categories: Option<Vec<String>>,
}

/// Event bus for broadcasting events to subscribers.
#[derive(Clone)]
pub struct EventBus {
    sender: broadcast::Sender<Event>,
    sequence: Arc<AtomicU64>,
}

impl EventBus {
    /// Create a new event bus with the given buffer capacity.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity.max(1));
        Self {
            sender,
            sequence: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Emit an event to all subscribers.
    pub fn emit(&self, event: Event) {
        self.sequence.fetch_add(1, Ordering::SeqCst);
        // Ignore send errors (no subscribers)
        let _ = self.sender.send(event);
    }

    /// Subscribe to events. Returns a receiver.
    pub fn subscribe(&self) -> broadcast::Receiver<Event> {
        self.sender.subscribe()
    }

    /// Get the current sequence number.
    pub fn sequence(&self) -> u64 {
        self.sequence.load(Ordering::SeqCst)
    }
}

impl EventFilter {
    /// Check if an event matches this filter.
    pub fn matches(&self, event: &Event) -> bool {
        match self.categories {
            Some(ref categories) => {
                let category = categorize_event(&event.event_type);
                categories.iter().any(|c| c == category)
            }
            None => true,
        }
    }
}

/// Categorize an event type into a category.
fn categorize_event(event_type: &str) -> &'static str {
    match event_type {
        s if s.starts_with("Payout") => "payout",
        s if s.starts_with("Revenue") => "revenue",
        _ => "system",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_bus_emit_subscribe() {
        let bus = EventBus::new(16);
        let mut rx = bus.subscribe();

        bus.emit(Event::now(DAEMON_STARTED, serde_json::json!({"version": "0.1.0"})));

        let event = rx.try_recv().expect("receive event");
        assert_eq!(event.event_type, DAEMON_STARTED);
        assert_eq!(bus.sequence(), 1);
    }

    #[test]
    fn test_emit_without_subscribers() {
        let bus = EventBus::new(4);
        bus.emit(Event::now(REVENUE_REFRESHED, serde_json::json!({})));
        assert_eq!(bus.sequence(), 1);
    }

    #[test]
    fn test_event_filter_categories() {
        let filter = EventFilter {
            categories: Some(vec!["payout".to_string()]),
        };

        assert!(filter.matches(&Event::now(PAYOUT_REQUESTED, serde_json::json!({}))));
        assert!(filter.matches(&Event::now(PAYOUT_FAILED, serde_json::json!({}))));
        assert!(!filter.matches(&Event::now(REVENUE_REFRESHED, serde_json::json!({}))));
        assert!(EventFilter::default().matches(&Event::now(DAEMON_STARTED, serde_json::json!({}))));
    }

    #[test]
    fn test_categorize_event() {
        assert_eq!(categorize_event(PAYOUT_PARTIALLY_FAILED), "payout");
        assert_eq!(categorize_event(REVENUE_REFRESHED), "revenue");
        assert_eq!(categorize_event(DAEMON_STARTED), "system");
    }
}
