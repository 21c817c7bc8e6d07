//! Router simulator.
//!
//! Drives the navigation router against an in-memory browser so route
//! tables and configuration can be exercised from the command line.
//!
//! # Overview
//!
//! ```text
//!   steps (click / submit / back / forward)
//!        │
//!        ▼
//!   ┌───────────┐    ┌──────────────┐    ┌──────────────┐
//!   │ Listeners │───▶│    Router    │───▶│  RouteTable  │
//!   │ (DOM)     │    │   engine     │    │  PageRoute…  │
//!   └───────────┘    └──────┬───────┘    └──────────────┘
//!                           │ fetch (simulated latency)
//!                           ▼
//!                   ┌───────────────┐    ┌──────────────┐
//!                   │   Rendering   │    │ MemoryBrowser│
//!                   │    surface    │    │ history/title│
//!                   └───────┬───────┘    └──────────────┘
//!                           ▼
//!                   one JSON line per step on stdout
//! ```

use std::path::PathBuf;
use std::str::FromStr;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use serde_json::{json, Value};
use thiserror::Error;
use url::Url;

use spa_router::config::{load_config, RouterConfig};
use spa_router::environment::{
    relative_url, Browser, ClickEvent, Element, FormElement, MemoryBrowser, SubmitEvent,
};
use spa_router::observability::analytics::RecordingSink;
use spa_router::observability::{logging, metrics};
use spa_router::render::JsonPage;
use spa_router::router::{Listeners, Navigation, Router};
use spa_router::routing::{Fetch, PageRoute, Params, RouteDescriptor};

#[derive(Parser)]
#[command(name = "router-sim")]
#[command(about = "Simulate client-side navigations against a route table", long_about = None)]
struct Cli {
    /// Configuration file (TOML) with `[[routes]]`.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Origin the simulated page is served from.
    #[arg(long, default_value = "https://localhost")]
    origin: String,

    /// URL of the first page.
    #[arg(short, long, default_value = "/")]
    initial: String,

    /// JSON handed over for the first page instead of fetching it.
    #[arg(long)]
    initial_data: Option<String>,

    /// Steps to run: `click:<href>`, `submit:<action?query>`, `back`, `forward`.
    steps: Vec<Step>,
}

#[derive(Debug, Error)]
enum SimulationError {
    #[error("unknown step `{0}` (expected click:<href>, submit:<url>, back or forward)")]
    InvalidStep(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Step {
    Click(String),
    Submit(String),
    Back,
    Forward,
}

impl FromStr for Step {
    type Err = SimulationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.split_once(':') {
            Some(("click", href)) => Ok(Step::Click(href.to_string())),
            Some(("submit", action)) => Ok(Step::Submit(action.to_string())),
            None if s == "back" => Ok(Step::Back),
            None if s == "forward" => Ok(Step::Forward),
            _ => Err(SimulationError::InvalidStep(s.to_string())),
        }
    }
}

/// Loader that resolves to the matched params after `latency`.
fn echo_loader(latency: Duration) -> impl Fn(&Params) -> Fetch + Send + Sync + 'static {
    move |params: &Params| {
        let params = params.clone();
        Fetch::pending(async move {
            tokio::time::sleep(latency).await;
            Ok(Value::Object(params))
        })
    }
}

fn build_routes(config: &RouterConfig) -> Result<Vec<Arc<dyn RouteDescriptor>>, Box<dyn std::error::Error>> {
    let mut routes: Vec<Arc<dyn RouteDescriptor>> = Vec::with_capacity(config.routes.len());
    for route in &config.routes {
        let page = PageRoute::from_config(route, Arc::new(JsonPage))?
            .with_loader(echo_loader(Duration::from_millis(route.latency_ms)));
        routes.push(Arc::new(page));
    }
    Ok(routes)
}

fn run_step(
    step: &Step,
    listeners: &Listeners,
    browser: &MemoryBrowser,
) -> Result<Navigation, Box<dyn std::error::Error>> {
    let navigation = match step {
        Step::Click(href) => listeners.on_click(&mut ClickEvent::on(Element::anchor(href.as_str()))),
        Step::Submit(target) => {
            let target = browser.location().join(target)?;
            let mut form = FormElement::get(target.path());
            for (name, value) in target.query_pairs() {
                form = form.with_field(name, value);
            }
            listeners.on_submit(&mut SubmitEvent::new(form))
        }
        Step::Back => match browser.back() {
            Some(event) => listeners.on_popstate(&event),
            None => Navigation::Unhandled,
        },
        Step::Forward => match browser.forward() {
            Some(event) => listeners.on_popstate(&event),
            None => Navigation::Unhandled,
        },
    };
    Ok(navigation)
}

fn report(label: &str, handled: bool, router: &Router, browser: &MemoryBrowser, sink: &RecordingSink) {
    let line = json!({
        "step": label,
        "handled": handled,
        "location": relative_url(&browser.location()),
        "title": browser.title(),
        "frame": router.frame(),
        "analytics": sink.entries(),
    });
    sink.clear();
    println!("{line}");
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    logging::init_logging(&config.observability);

    tracing::info!(
        routes = config.routes.len(),
        stop_delay_ms = config.loading.stop_delay_ms,
        discard_superseded = config.navigation.discard_superseded,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        metrics::init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let start = Url::parse(&cli.origin)?.join(&cli.initial)?;
    let browser = Arc::new(MemoryBrowser::new(start.as_str())?);
    let sink = Arc::new(RecordingSink::new());
    let settle_delay = Duration::from_millis(config.loading.stop_delay_ms + 10);

    let router = Router::builder()
        .routes(build_routes(&config)?)
        .config(config)
        .sink(sink.clone())
        .browser(browser.clone())
        .build();

    let initial_data = cli
        .initial_data
        .as_deref()
        .map(serde_json::from_str::<Value>)
        .transpose()?;
    let boot = router.boot(&relative_url(&start), initial_data);
    let handled = boot.is_handled();
    boot.settled().await;
    report("boot", handled, &router, &browser, &sink);

    let listeners = router.mount().ok_or("router could not be mounted")?;

    for step in &cli.steps {
        let navigation = run_step(step, &listeners, &browser)?;
        let handled = navigation.is_handled();
        navigation.settled().await;
        tokio::time::sleep(settle_delay).await;
        report(&format!("{step:?}"), handled, &router, &browser, &sink);
    }

    tracing::info!("Simulation complete");
    Ok(())
}
