//! The navigation state machine.
//!
//! # Responsibilities
//! - Resolve a URL to the first matching descriptor
//! - Commit cross-route navigations immediately, same-route ones on arrival
//! - Fetch page data, then scroll, retitle, commit and report
//! - Fall back to a full page load when a fetch fails
//!
//! # Design Decisions
//! - The current state lives in an `ArcSwap` cell that fetch continuations
//!   read and write when they resume, not when they were started
//! - Navigations are not queued or cancelled. A late resolution still
//!   commits and the latest commit is what is painted, unless
//!   `navigation.discard_superseded` is set
//! - No retries and no in-app error UI: a failed fetch hands the URL to
//!   the browser

use std::sync::atomic::{AtomicBool, AtomicU64, AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use serde_json::Value;
use tokio::runtime::Handle;
use tokio::sync::watch;
use tokio::task::JoinHandle;
use tracing::Instrument;
use uuid::Uuid;

use crate::config::RouterConfig;
use crate::environment::Browser;
use crate::observability::analytics::{AnalyticsEvent, AnalyticsSink, TracingSink};
use crate::observability::metrics;
use crate::observability::performance::NavigationTracker;
use crate::render::{Frame, LoadingIndicator, RenderingSurface};
use crate::router::state::NavigationState;
use crate::routing::{FetchError, RouteDescriptor, RouteMatch, RouteTable};

/// Where the router is in its navigation cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Phase {
    /// No fetch outstanding.
    Idle,
    /// At least one fetch outstanding.
    Resolving,
}

/// Outcome of [`Router::navigate`].
#[must_use = "a fetching navigation can be awaited with `settled`"]
#[derive(Debug)]
pub enum Navigation {
    /// No descriptor owns the URL; the browser should handle it.
    Unhandled,
    /// The URL is already displayed.
    Unchanged,
    /// Committed synchronously with data already available.
    Committed,
    /// Data is being fetched.
    Fetching(JoinHandle<()>),
}

impl Navigation {
    /// Whether the router took the navigation over from the browser.
    pub fn is_handled(&self) -> bool {
        !matches!(self, Navigation::Unhandled)
    }

    /// Wait for the fetch continuation, if any, to finish.
    pub async fn settled(self) {
        if let Navigation::Fetching(handle) = self {
            if let Err(e) = handle.await {
                tracing::error!(error = %e, "Navigation task failed");
            }
        }
    }
}

/// Client-side navigation router.
pub struct Router {
    config: RouterConfig,
    routes: RouteTable,
    state: ArcSwap<NavigationState>,
    generation: AtomicU64,
    outstanding: AtomicUsize,
    mounted: AtomicBool,
    browser: Option<Arc<dyn Browser>>,
    sink: Arc<dyn AnalyticsSink>,
    tracker: NavigationTracker,
    loading: LoadingIndicator,
    surface: RenderingSurface,
}

/// Builder for [`Router`].
pub struct RouterBuilder {
    config: RouterConfig,
    routes: Vec<Arc<dyn RouteDescriptor>>,
    sink: Option<Arc<dyn AnalyticsSink>>,
    browser: Option<Arc<dyn Browser>>,
}

impl RouterBuilder {
    pub fn config(mut self, config: RouterConfig) -> Self {
        self.config = config;
        self
    }

    /// Register a descriptor. Registration order is match order.
    pub fn route(mut self, route: impl RouteDescriptor + 'static) -> Self {
        self.routes.push(Arc::new(route));
        self
    }

    pub fn routes(mut self, routes: impl IntoIterator<Item = Arc<dyn RouteDescriptor>>) -> Self {
        self.routes.extend(routes);
        self
    }

    /// Analytics destination. Defaults to [`TracingSink`].
    pub fn sink(mut self, sink: Arc<dyn AnalyticsSink>) -> Self {
        self.sink = Some(sink);
        self
    }

    /// Browser environment. Leave unset for server-side rendering.
    pub fn browser(mut self, browser: Arc<dyn Browser>) -> Self {
        self.browser = Some(browser);
        self
    }

    pub fn build(self) -> Arc<Router> {
        tracing::debug!(
            routes = self.routes.len(),
            browser = self.browser.is_some(),
            "Router built"
        );
        Arc::new(Router {
            tracker: NavigationTracker::new(self.config.analytics.clone()),
            config: self.config,
            routes: RouteTable::new(self.routes),
            state: ArcSwap::from_pointee(NavigationState::default()),
            generation: AtomicU64::new(0),
            outstanding: AtomicUsize::new(0),
            mounted: AtomicBool::new(false),
            browser: self.browser,
            sink: self.sink.unwrap_or_else(|| Arc::new(TracingSink)),
            loading: LoadingIndicator::new(),
            surface: RenderingSurface::new(),
        })
    }
}

impl Router {
    pub fn builder() -> RouterBuilder {
        RouterBuilder {
            config: RouterConfig::default(),
            routes: Vec::new(),
            sink: None,
            browser: None,
        }
    }

    /// First paint. With `initial_data` (typically handed over from
    /// server-side rendering) nothing is fetched and no client-side page
    /// view is reported.
    pub fn boot(self: &Arc<Self>, url: &str, initial_data: Option<Value>) -> Navigation {
        self.begin(url, initial_data, false)
    }

    /// Navigate to `url`.
    ///
    /// `Unhandled` means no descriptor owns the URL and the caller must let
    /// the browser navigate normally.
    pub fn navigate(self: &Arc<Self>, url: &str, initial_data: Option<Value>) -> Navigation {
        self.begin(url, initial_data, true)
    }

    fn begin(self: &Arc<Self>, url: &str, initial_data: Option<Value>, report: bool) -> Navigation {
        let current = self.state.load_full();
        if current.url.as_deref() == Some(url) {
            tracing::debug!(url, "URL already displayed");
            return Navigation::Unchanged;
        }

        let Some(RouteMatch { route, params }) = self.routes.resolve(url) else {
            tracing::debug!(url, "No route matched");
            metrics::record_unhandled();
            return Navigation::Unhandled;
        };

        let generation = self.generation.fetch_add(1, Ordering::SeqCst) + 1;
        let candidate = NavigationState::pending(url, Arc::clone(&route), params);

        if let Some(data) = initial_data {
            tracing::info!(url, route = route.name(), "Navigating with initial data");
            metrics::record_navigation(route.name(), "initial");
            self.commit(candidate.with_data(data), report, None);
            return Navigation::Committed;
        }

        let Ok(runtime) = Handle::try_current() else {
            tracing::warn!(url, "No async runtime available to fetch page data");
            return Navigation::Unhandled;
        };

        let same_route = current.is_route(&route);
        metrics::record_navigation(
            route.name(),
            if same_route { "same_route" } else { "cross_route" },
        );

        let span = tracing::info_span!(
            "navigation",
            id = %Uuid::new_v4(),
            url,
            route = route.name()
        );
        span.in_scope(|| tracing::info!(same_route, "Fetching page data"));

        let epoch = self.loading.start();
        if same_route {
            // Same template: keep the old page up until the new data lands.
            self.repaint();
        } else {
            self.commit(candidate.clone(), false, None);
        }
        self.tracker.start();

        let fetch = route.fetch(&candidate.params).into_future();
        self.outstanding.fetch_add(1, Ordering::SeqCst);
        let router = Arc::clone(self);
        let handle = runtime.spawn(
            async move {
                let outcome = fetch.await;
                router.outstanding.fetch_sub(1, Ordering::SeqCst);
                router.settle(generation, epoch, candidate, outcome);
            }
            .instrument(span),
        );
        Navigation::Fetching(handle)
    }

    fn settle(
        self: &Arc<Self>,
        generation: u64,
        epoch: u64,
        candidate: NavigationState,
        outcome: Result<Value, FetchError>,
    ) {
        if self.config.navigation.discard_superseded
            && self.generation.load(Ordering::SeqCst) != generation
        {
            tracing::debug!("Discarding superseded navigation");
            return;
        }

        let (Some(route), Some(url)) = (candidate.route.clone(), candidate.url.clone()) else {
            return;
        };

        match outcome {
            Ok(data) => {
                self.tracker.mark_fetch_complete();
                if let Some(browser) = &self.browser {
                    if self.config.navigation.scroll_to_top {
                        browser.scroll_to(0, 0);
                    }
                    if let Some(title) = route.title(&candidate.params, &data) {
                        browser.set_title(&title);
                    }
                }
                tracing::info!("Page data arrived");
                self.commit(candidate.with_data(data), true, Some(epoch));
            }
            Err(error) => {
                tracing::warn!(%error, "Fetch failed, falling back to full page load");
                metrics::record_hard_fallback(route.name());
                match &self.browser {
                    Some(browser) => browser.assign(&url),
                    None => tracing::warn!(url, "No browser to fall back to"),
                }
            }
        }
    }

    /// `epoch` is the loading epoch the navigation opened, if it fetched.
    fn commit(self: &Arc<Self>, state: NavigationState, report: bool, epoch: Option<u64>) {
        let state = Arc::new(state);
        self.state.store(Arc::clone(&state));
        self.repaint();

        if report && state.is_loaded() {
            self.after_render(&state, epoch);
        }
    }

    fn after_render(self: &Arc<Self>, state: &NavigationState, epoch: Option<u64>) {
        let (Some(route), Some(url), Some(data)) = (&state.route, &state.url, &state.data) else {
            return;
        };

        let sink = self.sink.as_ref();
        self.tracker.mark_render_complete_and_report(sink, route.name());
        route.analytics_hook(sink, &state.params, data);
        sink.send(AnalyticsEvent::PageView {
            page: url.clone(),
            client_nav: true,
        });

        if let Some(epoch) = epoch {
            self.schedule_loading_stop(epoch);
        }
    }

    /// A stop for an epoch that a newer navigation has replaced is a no-op.
    fn schedule_loading_stop(self: &Arc<Self>, epoch: u64) {
        let delay = Duration::from_millis(self.config.loading.stop_delay_ms);

        match Handle::try_current() {
            Ok(runtime) if !delay.is_zero() => {
                let router = Arc::clone(self);
                runtime.spawn(async move {
                    tokio::time::sleep(delay).await;
                    router.stop_loading(epoch);
                });
            }
            _ => self.stop_loading(epoch),
        }
    }

    fn stop_loading(&self, epoch: u64) {
        if self.loading.stop(epoch) {
            self.repaint();
        }
    }

    fn repaint(&self) {
        let state = self.state.load_full();
        self.surface.paint(&state, self.loading.is_active());
    }

    /// The committed navigation state.
    pub fn state(&self) -> Arc<NavigationState> {
        self.state.load_full()
    }

    pub fn phase(&self) -> Phase {
        if self.outstanding.load(Ordering::SeqCst) > 0 {
            Phase::Resolving
        } else {
            Phase::Idle
        }
    }

    pub fn is_loading(&self) -> bool {
        self.loading.is_active()
    }

    /// The most recent frame painted.
    pub fn frame(&self) -> Frame {
        self.surface.current()
    }

    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.surface.subscribe()
    }

    pub fn surface(&self) -> &RenderingSurface {
        &self.surface
    }

    pub(super) fn browser(&self) -> Option<&Arc<dyn Browser>> {
        self.browser.as_ref()
    }

    /// Returns `true` the first time only.
    pub(super) fn claim_mount(&self) -> bool {
        !self.mounted.swap(true, Ordering::SeqCst)
    }
}
