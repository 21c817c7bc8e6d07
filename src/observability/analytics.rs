//! Analytics sink capability.
//!
//! The router never talks to a concrete analytics backend. It is handed an
//! [`AnalyticsSink`] and only ever calls `send` and `set` on it.

use std::sync::Mutex;

use serde::Serialize;
use serde_json::Value;

/// An event the router reports.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AnalyticsEvent {
    /// A duration measurement, in whole milliseconds.
    Timing {
        category: String,
        variable: String,
        value_ms: u64,
    },
    /// A page view.
    PageView {
        page: String,
        /// `true` for views produced by client-side navigation, as opposed to
        /// the initial full page load.
        client_nav: bool,
    },
}

/// Destination for analytics events and dimensions.
pub trait AnalyticsSink: Send + Sync {
    /// Emit an event.
    fn send(&self, event: AnalyticsEvent);

    /// Set a dimension that applies to subsequent events.
    fn set(&self, key: &str, value: Value);
}

/// Everything a [`RecordingSink`] has seen, in call order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum SinkEntry {
    Event(AnalyticsEvent),
    Set { key: String, value: Value },
}

/// Sink that keeps every call in memory.
#[derive(Debug, Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<SinkEntry>>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of recorded calls.
    pub fn entries(&self) -> Vec<SinkEntry> {
        self.entries.lock().expect("sink mutex poisoned").clone()
    }

    /// Recorded events only, dropping dimension updates.
    pub fn events(&self) -> Vec<AnalyticsEvent> {
        self.entries()
            .into_iter()
            .filter_map(|entry| match entry {
                SinkEntry::Event(event) => Some(event),
                SinkEntry::Set { .. } => None,
            })
            .collect()
    }

    /// Drop everything recorded so far.
    pub fn clear(&self) {
        self.entries.lock().expect("sink mutex poisoned").clear();
    }

    fn push(&self, entry: SinkEntry) {
        self.entries.lock().expect("sink mutex poisoned").push(entry);
    }
}

impl AnalyticsSink for RecordingSink {
    fn send(&self, event: AnalyticsEvent) {
        self.push(SinkEntry::Event(event));
    }

    fn set(&self, key: &str, value: Value) {
        self.push(SinkEntry::Set {
            key: key.to_string(),
            value,
        });
    }
}

/// Sink that writes every call to the log.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingSink;

impl AnalyticsSink for TracingSink {
    fn send(&self, event: AnalyticsEvent) {
        match event {
            AnalyticsEvent::Timing {
                category,
                variable,
                value_ms,
            } => tracing::info!(%category, %variable, value_ms, "analytics timing"),
            AnalyticsEvent::PageView { page, client_nav } => {
                tracing::info!(%page, client_nav, "analytics page view")
            }
        }
    }

    fn set(&self, key: &str, value: Value) {
        tracing::debug!(key, %value, "analytics dimension");
    }
}
