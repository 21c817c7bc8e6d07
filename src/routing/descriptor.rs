//! The Route Descriptor contract.
//!
//! A descriptor describes one page family: which URLs it owns, how to load
//! the data a page needs, what the document title should be, and how to
//! annotate analytics once the page has rendered.

use std::future::Future;
use std::sync::Arc;

use futures_util::future::{self, BoxFuture, FutureExt};
use serde_json::Value;
use thiserror::Error;

use crate::observability::analytics::AnalyticsSink;
use crate::render::component::PageComponent;
use crate::routing::Params;

/// Errors a data loader can resolve with.
///
/// Any of these abandons client-side navigation for a full page load.
#[derive(Debug, Error)]
pub enum FetchError {
    /// The data endpoint answered with a non-success status.
    #[error("data request failed with status {0}")]
    Status(u16),

    /// The request never produced a response.
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body could not be decoded.
    #[error("failed to decode page data: {0}")]
    Decode(#[from] serde_json::Error),
}

/// The pending half of a [`Fetch`].
pub type FetchFuture = BoxFuture<'static, Result<Value, FetchError>>;

/// What a descriptor hands back from [`RouteDescriptor::fetch`].
pub enum Fetch {
    /// Data that is already available.
    Ready(Value),
    /// Data that arrives later.
    Pending(FetchFuture),
}

impl Fetch {
    /// Wrap a future as a pending fetch.
    pub fn pending<F>(fut: F) -> Self
    where
        F: Future<Output = Result<Value, FetchError>> + Send + 'static,
    {
        Fetch::Pending(fut.boxed())
    }

    /// Turn either variant into a future.
    pub fn into_future(self) -> FetchFuture {
        match self {
            Fetch::Ready(value) => future::ready(Ok(value)).boxed(),
            Fetch::Pending(fut) => fut,
        }
    }
}

impl std::fmt::Debug for Fetch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Fetch::Ready(value) => f.debug_tuple("Ready").field(value).finish(),
            Fetch::Pending(_) => f.write_str("Pending(..)"),
        }
    }
}

/// One navigable page family.
///
/// Descriptors are built once at startup and are consulted in registration
/// order; the first whose [`match_url`](Self::match_url) succeeds owns the URL.
pub trait RouteDescriptor: Send + Sync + std::fmt::Debug {
    /// Name used in logs and metrics. Not an identity.
    fn name(&self) -> &str;

    /// Parameters for `url` if this page family owns it.
    ///
    /// Must be pure: no I/O and no shared state.
    fn match_url(&self, url: &str) -> Option<Params>;

    /// The component mounted for pages of this family.
    fn component(&self) -> Arc<dyn PageComponent>;

    /// Load the data a page needs. Defaults to no data.
    fn fetch(&self, _params: &Params) -> Fetch {
        Fetch::Ready(Value::Null)
    }

    /// The document title, or `None` to leave it alone.
    fn title(&self, _params: &Params, _data: &Value) -> Option<String> {
        None
    }

    /// Annotate the sink with route dimensions before the page view is sent.
    fn analytics_hook(&self, _sink: &dyn AnalyticsSink, _params: &Params, _data: &Value) {}
}
