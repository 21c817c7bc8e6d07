//! Navigation performance tracking.
//!
//! # Responsibilities
//! - Mark the start of a client-side navigation
//! - Measure time-to-fetch and time-to-render from that start
//! - Report both durations to the analytics sink and the metrics recorder
//!
//! # Design Decisions
//! - One in-flight record; a new `start` overwrites the previous marks
//! - Reporting consumes the record, so a superseded navigation's late
//!   completion finds the tracker `Idle` and reports nothing

use std::sync::Mutex;
use std::time::Duration;

use tokio::time::Instant;

use crate::config::AnalyticsConfig;
use crate::observability::analytics::{AnalyticsEvent, AnalyticsSink};
use crate::observability::metrics;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum TrackerState {
    Idle,
    InFlight {
        started: Instant,
        fetch: Option<Duration>,
    },
}

/// Durations reported for one navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NavigationTiming {
    pub fetch: Duration,
    pub render: Duration,
}

/// Tracks the single in-flight navigation.
#[derive(Debug)]
pub struct NavigationTracker {
    state: Mutex<TrackerState>,
    names: AnalyticsConfig,
}

impl NavigationTracker {
    pub fn new(names: AnalyticsConfig) -> Self {
        Self {
            state: Mutex::new(TrackerState::Idle),
            names,
        }
    }

    /// Begin timing a navigation, discarding any earlier marks.
    pub fn start(&self) {
        *self.lock() = TrackerState::InFlight {
            started: Instant::now(),
            fetch: None,
        };
    }

    /// Record time-to-fetch. No-op unless a navigation is in flight.
    pub fn mark_fetch_complete(&self) {
        if let TrackerState::InFlight { started, fetch } = &mut *self.lock() {
            *fetch = Some(started.elapsed());
        }
    }

    /// Finish the in-flight navigation and report both timings.
    ///
    /// Returns `None`, and reports nothing, when no navigation is in flight.
    pub fn mark_render_complete_and_report(
        &self,
        sink: &dyn AnalyticsSink,
        route: &str,
    ) -> Option<NavigationTiming> {
        let timing = {
            let mut state = self.lock();
            let TrackerState::InFlight { started, fetch } = *state else {
                return None;
            };
            *state = TrackerState::Idle;
            NavigationTiming {
                fetch: fetch.unwrap_or_default(),
                render: started.elapsed(),
            }
        };

        sink.send(self.timing_event(&self.names.fetch_variable, timing.fetch));
        sink.send(self.timing_event(&self.names.render_variable, timing.render));
        metrics::record_navigation_timing(route, timing.fetch, timing.render);

        tracing::debug!(
            route,
            fetch_ms = round_ms(timing.fetch),
            render_ms = round_ms(timing.render),
            "Navigation timing reported"
        );
        Some(timing)
    }

    /// Whether a navigation is currently being timed.
    pub fn in_flight(&self) -> bool {
        matches!(*self.lock(), TrackerState::InFlight { .. })
    }

    fn timing_event(&self, variable: &str, duration: Duration) -> AnalyticsEvent {
        AnalyticsEvent::Timing {
            category: self.names.timing_category.clone(),
            variable: variable.to_string(),
            value_ms: round_ms(duration),
        }
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, TrackerState> {
        self.state.lock().expect("tracker mutex poisoned")
    }
}

/// Round a duration to the nearest millisecond.
pub fn round_ms(duration: Duration) -> u64 {
    (duration.as_secs_f64() * 1000.0).round() as u64
}
