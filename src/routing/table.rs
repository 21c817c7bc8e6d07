//! Route lookup.
//!
//! # Responsibilities
//! - Store descriptors in registration order
//! - Look up the first descriptor that owns a URL
//! - Return the match or an explicit no-match
//!
//! # Design Decisions
//! - Immutable after construction (shared without locks)
//! - O(n) scan; route counts are small and order is the contract

use std::sync::Arc;

use crate::routing::{Params, RouteDescriptor};

/// A successful lookup.
#[derive(Debug, Clone)]
pub struct RouteMatch {
    pub route: Arc<dyn RouteDescriptor>,
    pub params: Params,
}

/// Ordered set of registered descriptors.
#[derive(Debug, Default)]
pub struct RouteTable {
    routes: Vec<Arc<dyn RouteDescriptor>>,
}

impl RouteTable {
    pub fn new(routes: Vec<Arc<dyn RouteDescriptor>>) -> Self {
        Self { routes }
    }

    /// First descriptor, in registration order, whose matcher accepts `url`.
    pub fn resolve(&self, url: &str) -> Option<RouteMatch> {
        self.routes.iter().find_map(|route| {
            route.match_url(url).map(|params| RouteMatch {
                route: Arc::clone(route),
                params,
            })
        })
    }
}
