//! Shared fixtures for router integration tests.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use serde_json::{json, Value};

use spa_router::config::RouterConfig;
use spa_router::environment::MemoryBrowser;
use spa_router::observability::analytics::RecordingSink;
use spa_router::render::{JsonPage, PageComponent};
use spa_router::routing::matcher::PathPrefixMatcher;
use spa_router::{AnalyticsSink, Fetch, FetchError, PageRoute, Params, RouteDescriptor, Router};

pub const ORIGIN: &str = "http://localhost";

/// Owns every URL containing `"test"` and loads `{ uppercase: URL }`.
#[derive(Debug, Default)]
pub struct TestRoute {
    fetches: AtomicUsize,
    delays: HashMap<String, Duration>,
    failing: HashSet<String>,
    untitled: bool,
}

impl TestRoute {
    pub fn new() -> Self {
        Self::default()
    }

    /// Delay the fetch for `url`.
    pub fn delayed(mut self, url: &str, ms: u64) -> Self {
        self.delays.insert(url.to_string(), Duration::from_millis(ms));
        self
    }

    /// Reject the fetch for `url`.
    pub fn failing(mut self, url: &str) -> Self {
        self.failing.insert(url.to_string());
        self
    }

    /// Never produce a title.
    pub fn untitled(mut self) -> Self {
        self.untitled = true;
        self
    }

    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

/// Title the test route computes for `path`.
pub fn title_for(path: &str) -> String {
    format!("{path} | Test")
}

impl RouteDescriptor for TestRoute {
    fn name(&self) -> &str {
        "test"
    }

    fn match_url(&self, url: &str) -> Option<Params> {
        if !url.contains("test") {
            return None;
        }
        let mut params = Params::new();
        params.insert("path".into(), json!(url));
        Some(params)
    }

    fn component(&self) -> Arc<dyn PageComponent> {
        Arc::new(JsonPage)
    }

    fn fetch(&self, params: &Params) -> Fetch {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        let url = params["path"].as_str().unwrap_or_default().to_string();
        let delay = self.delays.get(&url).copied().unwrap_or(Duration::from_millis(5));
        let fails = self.failing.contains(&url);
        Fetch::pending(async move {
            tokio::time::sleep(delay).await;
            if fails {
                return Err(FetchError::Status(500));
            }
            Ok(json!({ "uppercase": url.to_uppercase() }))
        })
    }

    fn title(&self, params: &Params, _data: &Value) -> Option<String> {
        if self.untitled {
            return None;
        }
        params["path"].as_str().map(title_for)
    }

    fn analytics_hook(&self, sink: &dyn AnalyticsSink, params: &Params, _data: &Value) {
        sink.set("dimension1", params["path"].clone());
    }
}

/// A second page family under `/other`, with no loader.
pub fn other_route() -> PageRoute {
    PageRoute::new("other", PathPrefixMatcher::new("/other"), Arc::new(JsonPage))
}

pub struct Harness {
    pub router: Arc<Router>,
    pub browser: Arc<MemoryBrowser>,
    pub sink: Arc<RecordingSink>,
    pub route: Arc<TestRoute>,
}

/// Router with the test route, the `/other` route and a browser at `path`.
pub fn harness(route: TestRoute, config: RouterConfig, path: &str) -> Harness {
    let browser = Arc::new(MemoryBrowser::new(&format!("{ORIGIN}{path}")).unwrap());
    let sink = Arc::new(RecordingSink::new());
    let route = Arc::new(route);
    let routes: Vec<Arc<dyn RouteDescriptor>> = vec![
        route.clone() as Arc<dyn RouteDescriptor>,
        Arc::new(other_route()),
    ];

    let router = Router::builder()
        .config(config)
        .routes(routes)
        .sink(sink.clone())
        .browser(browser.clone())
        .build();

    Harness {
        router,
        browser,
        sink,
        route,
    }
}

/// Config whose loading indicator stops as soon as a page is reported.
pub fn immediate_config() -> RouterConfig {
    let mut config = RouterConfig::default();
    config.loading.stop_delay_ms = 0;
    config
}
