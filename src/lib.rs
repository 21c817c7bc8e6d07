//! Client-side navigation router for single-page applications.
//!
//! Intercepts in-app link clicks, GET form submissions and back/forward
//! events, resolves the URL to a page family, fetches the page's data and
//! re-renders without a full reload. Anything the router cannot handle,
//! including a failed fetch, degrades to an ordinary browser navigation.

pub mod config;
pub mod environment;
pub mod observability;
pub mod render;
pub mod router;
pub mod routing;

pub use config::RouterConfig;
pub use environment::{Browser, MemoryBrowser};
pub use observability::{AnalyticsEvent, AnalyticsSink};
pub use render::{Frame, PageComponent, PageProps};
pub use router::{Listeners, Navigation, NavigationState, Phase, Router};
pub use routing::{Fetch, FetchError, PageRoute, Params, RouteDescriptor};
