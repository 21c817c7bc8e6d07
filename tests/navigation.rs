//! Router engine integration tests.

use std::sync::Arc;
use std::time::Duration;

use serde_json::json;
use url::Url;

use spa_router::config::{AnalyticsConfig, RouterConfig};
use spa_router::observability::analytics::{RecordingSink, SinkEntry};
use spa_router::observability::NavigationTracker;
use spa_router::{AnalyticsEvent, Navigation, Phase};

mod common;
use common::{harness, immediate_config, title_for, TestRoute};

#[tokio::test]
async fn test_unmatched_url_is_left_to_browser() {
    let h = harness(TestRoute::new(), immediate_config(), "/test");
    let _ = h.router.boot("/test", Some(json!({ "uppercase": "/TEST" })));
    let before = h.router.state();

    let nav = h.router.navigate("/nowhere", None);

    assert!(!nav.is_handled());
    assert!(Arc::ptr_eq(&before, &h.router.state()));
    assert_eq!(h.route.fetch_count(), 0);
}

#[tokio::test]
async fn test_same_url_does_nothing() {
    let h = harness(TestRoute::new(), immediate_config(), "/test");
    let _ = h.router.boot("/test", Some(json!({ "uppercase": "/TEST" })));
    let paints = h.router.surface().paint_count();

    let nav = h.router.navigate("/test", None);

    assert!(matches!(nav, Navigation::Unchanged));
    assert!(nav.is_handled());
    assert_eq!(h.route.fetch_count(), 0);
    assert_eq!(h.browser.push_count(), 0);
    assert_eq!(h.router.surface().paint_count(), paints);
}

#[tokio::test]
async fn test_initial_data_renders_without_fetch() {
    let h = harness(TestRoute::new(), immediate_config(), "/test");

    let nav = h.router.boot("/test", Some(json!({ "uppercase": "/TEST" })));

    assert!(matches!(nav, Navigation::Committed));
    assert_eq!(h.route.fetch_count(), 0);
    let state = h.router.state();
    assert_eq!(state.url.as_deref(), Some("/test"));
    assert_eq!(state.data, Some(json!({ "uppercase": "/TEST" })));

    let page = h.router.frame().page.unwrap();
    assert!(page.loaded);
    assert!(page.markup.contains(r#""uppercase":"/TEST""#));
    assert!(h.sink.entries().is_empty());
}

#[tokio::test]
async fn test_cross_route_commits_before_fetch_resolves() {
    let h = harness(TestRoute::new(), immediate_config(), "/other");
    let _ = h.router.boot("/other", Some(json!({})));

    let nav = h.router.navigate("/test/1", None);

    let pending = h.router.state();
    assert_eq!(pending.url.as_deref(), Some("/test/1"));
    assert_eq!(pending.route_name(), Some("test"));
    assert!(pending.data.is_none());
    let frame = h.router.frame();
    assert!(frame.loading);
    assert!(!frame.is_loaded());
    assert_eq!(h.router.phase(), Phase::Resolving);

    nav.settled().await;

    assert_eq!(
        h.router.state().data,
        Some(json!({ "uppercase": "/TEST/1" }))
    );
    assert!(h.router.frame().is_loaded());
    assert_eq!(h.router.phase(), Phase::Idle);
}

#[tokio::test]
async fn test_same_route_keeps_page_until_data_arrives() {
    let h = harness(TestRoute::new(), immediate_config(), "/test");
    let _ = h.router.boot("/test", Some(json!({ "uppercase": "/TEST" })));

    let nav = h.router.navigate("/test/2", None);

    let current = h.router.state();
    assert_eq!(current.url.as_deref(), Some("/test"));
    assert_eq!(current.data, Some(json!({ "uppercase": "/TEST" })));
    assert!(h.router.frame().loading);
    assert!(h.router.frame().is_loaded());

    nav.settled().await;

    let state = h.router.state();
    assert_eq!(state.url.as_deref(), Some("/test/2"));
    assert_eq!(state.data, Some(json!({ "uppercase": "/TEST/2" })));
}

#[tokio::test]
async fn test_success_scrolls_titles_and_reports_in_order() {
    let h = harness(TestRoute::new(), immediate_config(), "/test");
    let _ = h.router.boot("/test", Some(json!({ "uppercase": "/TEST" })));

    h.router.navigate("/test/2", None).settled().await;

    assert_eq!(h.browser.scrolls(), vec![(0, 0)]);
    assert_eq!(h.browser.title(), title_for("/test/2"));

    let entries = h.sink.entries();
    assert_eq!(entries.len(), 4);
    assert!(matches!(
        &entries[0],
        SinkEntry::Event(AnalyticsEvent::Timing { category, variable, .. })
            if category == "client-nav" && variable == "fetch"
    ));
    assert!(matches!(
        &entries[1],
        SinkEntry::Event(AnalyticsEvent::Timing { variable, .. }) if variable == "render"
    ));
    assert_eq!(
        entries[2],
        SinkEntry::Set {
            key: "dimension1".into(),
            value: json!("/test/2"),
        }
    );
    assert_eq!(
        entries[3],
        SinkEntry::Event(AnalyticsEvent::PageView {
            page: "/test/2".into(),
            client_nav: true,
        })
    );
    assert!(!h.router.is_loading());
}

#[tokio::test]
async fn test_untitled_route_leaves_title_alone() {
    let h = harness(TestRoute::new().untitled(), immediate_config(), "/test");
    let _ = h.router.boot("/test", Some(json!({})));

    h.router.navigate("/test/2", None).settled().await;

    assert_eq!(h.browser.title(), "");
    assert_eq!(h.browser.scrolls().len(), 1);
}

#[tokio::test]
async fn test_scroll_can_be_disabled() {
    let mut config = immediate_config();
    config.navigation.scroll_to_top = false;
    let h = harness(TestRoute::new(), config, "/test");
    let _ = h.router.boot("/test", Some(json!({})));

    h.router.navigate("/test/2", None).settled().await;

    assert!(h.browser.scrolls().is_empty());
    assert_eq!(h.browser.title(), title_for("/test/2"));
}

#[tokio::test]
async fn test_fetch_failure_falls_back_to_full_load() {
    let h = harness(
        TestRoute::new().failing("/test/broken"),
        immediate_config(),
        "/test",
    );
    let _ = h.router.boot("/test", Some(json!({ "uppercase": "/TEST" })));
    let paints = h.router.surface().paint_count();

    let nav = h.router.navigate("/test/broken", None);
    assert!(nav.is_handled());
    nav.settled().await;

    assert_eq!(
        h.browser.assigned(),
        vec![Url::parse("http://localhost/test/broken").unwrap()]
    );
    let state = h.router.state();
    assert_eq!(state.url.as_deref(), Some("/test"));
    assert_eq!(state.data, Some(json!({ "uppercase": "/TEST" })));
    assert!(h.browser.scrolls().is_empty());
    assert_eq!(h.browser.title(), "");
    assert!(h.sink.entries().is_empty());
    // Only the loading indicator was painted.
    assert_eq!(h.router.surface().paint_count(), paints + 1);
}

#[tokio::test]
async fn test_cross_route_failure_keeps_pending_state() {
    let h = harness(
        TestRoute::new().failing("/test/broken"),
        immediate_config(),
        "/other",
    );
    let _ = h.router.boot("/other", Some(json!({})));

    let nav = h.router.navigate("/test/broken", None);
    let pending = h.router.state();
    nav.settled().await;

    assert_eq!(
        h.browser.assigned(),
        vec![Url::parse("http://localhost/test/broken").unwrap()]
    );
    let state = h.router.state();
    assert!(Arc::ptr_eq(&pending, &state));
    assert_eq!(state.url.as_deref(), Some("/test/broken"));
    assert_eq!(state.route_name(), Some("test"));
    assert!(state.data.is_none());
    assert!(!h.router.frame().is_loaded());
    assert!(h.browser.scrolls().is_empty());
    assert!(h.sink.entries().is_empty());
}

#[tokio::test]
async fn test_late_resolution_still_commits() {
    let h = harness(
        TestRoute::new().delayed("/test/slow", 80),
        immediate_config(),
        "/other",
    );
    let _ = h.router.boot("/other", Some(json!({})));

    let slow = h.router.navigate("/test/slow", None);
    let fast = h.router.navigate("/test/fast", None);

    fast.settled().await;
    assert_eq!(h.router.state().url.as_deref(), Some("/test/fast"));

    slow.settled().await;
    assert_eq!(h.router.state().url.as_deref(), Some("/test/slow"));
    assert_eq!(
        h.router.frame().page.unwrap().url,
        "/test/slow"
    );
    // The tracker reports once per timed navigation.
    let timings = h
        .sink
        .events()
        .into_iter()
        .filter(|event| matches!(event, AnalyticsEvent::Timing { .. }))
        .count();
    assert_eq!(timings, 2);
}

#[tokio::test]
async fn test_superseded_resolution_can_be_discarded() {
    let mut config = immediate_config();
    config.navigation.discard_superseded = true;
    let h = harness(TestRoute::new().delayed("/test/slow", 80), config, "/other");
    let _ = h.router.boot("/other", Some(json!({})));

    let slow = h.router.navigate("/test/slow", None);
    let fast = h.router.navigate("/test/fast", None);
    fast.settled().await;
    slow.settled().await;

    assert_eq!(h.router.state().url.as_deref(), Some("/test/fast"));
    assert_eq!(h.browser.scrolls().len(), 1);
}

#[tokio::test]
async fn test_loading_indicator_stops_after_delay() {
    let mut config = RouterConfig::default();
    config.loading.stop_delay_ms = 40;
    let h = harness(TestRoute::new(), config, "/test");
    let _ = h.router.boot("/test", Some(json!({})));

    h.router.navigate("/test/2", None).settled().await;
    assert!(h.router.is_loading());
    assert!(h.router.frame().loading);

    tokio::time::sleep(Duration::from_millis(120)).await;
    assert!(!h.router.is_loading());
    assert!(!h.router.frame().loading);
}

#[tokio::test]
async fn test_earlier_navigation_does_not_stop_newer_indicator() {
    let mut config = RouterConfig::default();
    config.loading.stop_delay_ms = 20;
    let h = harness(
        TestRoute::new().delayed("/test/a", 50).delayed("/test/b", 400),
        config,
        "/other",
    );
    let _ = h.router.boot("/other", Some(json!({})));

    let first = h.router.navigate("/test/a", None);
    let second = h.router.navigate("/test/b", None);

    first.settled().await;
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert_eq!(h.router.phase(), Phase::Resolving);
    assert!(h.router.is_loading());
    assert!(h.router.frame().loading);

    second.settled().await;
    tokio::time::sleep(Duration::from_millis(60)).await;
    assert!(!h.router.is_loading());
    assert!(!h.router.frame().loading);
    assert_eq!(h.router.state().url.as_deref(), Some("/test/b"));
}

#[tokio::test]
async fn test_observers_see_loaded_frame() {
    let h = harness(TestRoute::new(), immediate_config(), "/other");
    let _ = h.router.boot("/other", Some(json!({})));
    let mut frames = h.router.subscribe();

    h.router.navigate("/test/3", None).settled().await;

    assert!(frames.has_changed().unwrap());
    let frame = frames.borrow_and_update().clone();
    assert!(frame.is_loaded());
    assert_eq!(frame.page.unwrap().route, "test");
}

#[test]
fn test_tracker_reports_once() {
    let tracker = NavigationTracker::new(AnalyticsConfig::default());
    let sink = RecordingSink::new();

    tracker.start();
    tracker.mark_fetch_complete();
    assert!(tracker
        .mark_render_complete_and_report(&sink, "test")
        .is_some());
    assert!(tracker
        .mark_render_complete_and_report(&sink, "test")
        .is_none());

    assert_eq!(sink.events().len(), 2);
    assert!(!tracker.in_flight());
}
