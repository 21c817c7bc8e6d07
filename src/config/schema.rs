//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the router.
//! All types derive Serde traits for deserialization from config files.

use serde::{Deserialize, Serialize};

/// Root configuration for the navigation router.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Loading indicator behaviour.
    pub loading: LoadingConfig,

    /// Navigation behaviour (scrolling, superseded fetches).
    pub navigation: NavigationConfig,

    /// Names used for the analytics events the router emits.
    pub analytics: AnalyticsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,

    /// Page routes, in registration order. Used by the simulator binary;
    /// applications usually register their own descriptors in code.
    pub routes: Vec<RouteConfig>,
}

/// Loading indicator configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct LoadingConfig {
    /// Delay before the indicator is stopped once a page has rendered.
    /// Client-side navigations are often too fast to notice otherwise.
    pub stop_delay_ms: u64,
}

impl Default for LoadingConfig {
    fn default() -> Self {
        Self { stop_delay_ms: 250 }
    }
}

/// Navigation behaviour.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct NavigationConfig {
    /// Scroll the viewport to the top when fetched data arrives.
    pub scroll_to_top: bool,

    /// Drop the result of a fetch that was superseded by a newer navigation.
    ///
    /// Off by default: a late resolution still commits, and whichever commit
    /// lands last is what gets rendered.
    pub discard_superseded: bool,
}

impl Default for NavigationConfig {
    fn default() -> Self {
        Self {
            scroll_to_top: true,
            discard_superseded: false,
        }
    }
}

/// Analytics event naming.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct AnalyticsConfig {
    /// Category of the two timing events.
    pub timing_category: String,

    /// Variable name of the fetch duration timing event.
    pub fetch_variable: String,

    /// Variable name of the render duration timing event.
    pub render_variable: String,
}

impl Default for AnalyticsConfig {
    fn default() -> Self {
        Self {
            timing_category: "client-nav".to_string(),
            fetch_variable: "fetch".to_string(),
            render_variable: "render".to_string(),
        }
    }
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            metrics_enabled: false,
            metrics_address: "127.0.0.1:9090".to_string(),
        }
    }
}

/// A page route definition.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RouteConfig {
    /// Route identifier for logging/metrics.
    pub name: String,

    /// Path pattern, e.g. `/{locale}/docs/{slug}`.
    pub pattern: String,

    /// Fixed locale captured at construction.
    pub locale: Option<String>,

    /// Title template; `{name}` placeholders are filled from params.
    pub title: Option<String>,

    /// Simulated loader latency in milliseconds.
    #[serde(default)]
    pub latency_ms: u64,
}
