//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Router engine produces:
//!     → performance.rs (fetch/render timing per navigation)
//!     → analytics.rs (timing events, route dimensions, page views)
//!     → metrics.rs (counters, histograms)
//!     → logging.rs (structured log events with navigation IDs)
//!
//! Consumers:
//!     → Injected AnalyticsSink (any backend)
//!     → Metrics endpoint (Prometheus scrape)
//!     → stdout
//! ```
//!
//! # Design Decisions
//! - The router depends on the `AnalyticsSink` trait only
//! - Each navigation carries a UUID in its span for correlation
//! - Metrics are cheap (facade no-ops without a recorder)

pub mod analytics;
pub mod logging;
pub mod metrics;
pub mod performance;

pub use analytics::{AnalyticsEvent, AnalyticsSink, RecordingSink, SinkEntry, TracingSink};
pub use performance::{NavigationTiming, NavigationTracker};
