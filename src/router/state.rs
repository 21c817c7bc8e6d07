//! Navigation state.

use std::sync::Arc;

use serde_json::Value;

use crate::render::component::PageComponent;
use crate::routing::{Params, RouteDescriptor};

/// The router's single current-page record.
///
/// Replaced wholesale on every commit, never mutated in place.
#[derive(Clone, Default)]
pub struct NavigationState {
    pub url: Option<String>,
    pub route: Option<Arc<dyn RouteDescriptor>>,
    pub component: Option<Arc<dyn PageComponent>>,
    pub params: Params,
    /// `None` exactly while the page's fetch is outstanding.
    pub data: Option<Value>,
}

impl NavigationState {
    /// A candidate state for `url` whose data has not arrived yet.
    pub fn pending(url: impl Into<String>, route: Arc<dyn RouteDescriptor>, params: Params) -> Self {
        Self {
            url: Some(url.into()),
            component: Some(route.component()),
            route: Some(route),
            params,
            data: None,
        }
    }

    pub fn with_data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// Whether this state was produced by `route` (pointer identity).
    pub fn is_route(&self, route: &Arc<dyn RouteDescriptor>) -> bool {
        self.route
            .as_ref()
            .is_some_and(|current| Arc::ptr_eq(current, route))
    }

    pub fn route_name(&self) -> Option<&str> {
        self.route.as_deref().map(|route| route.name())
    }
}

impl std::fmt::Debug for NavigationState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NavigationState")
            .field("url", &self.url)
            .field("route", &self.route_name())
            .field("params", &self.params)
            .field("data", &self.data)
            .finish()
    }
}
