//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Candidate URL (link click, form submit, popstate, boot)
//!     → table.rs (registration-order lookup)
//!     → descriptor.rs (each RouteDescriptor::match_url)
//!     → Return: RouteMatch { route, params } or no match
//!
//! Route registration (at startup):
//!     Vec<Arc<dyn RouteDescriptor>>
//!     → RouteTable (frozen, immutable)
//! ```
//!
//! # Design Decisions
//! - Descriptors are built once and never mutated
//! - No regex in hot path (prefix and segment matching only)
//! - Deterministic: same input always matches same route
//! - First match wins (registration order)

pub mod descriptor;
pub mod matcher;
pub mod page_route;
pub mod table;

pub use descriptor::{Fetch, FetchError, FetchFuture, RouteDescriptor};
pub use page_route::PageRoute;
pub use table::{RouteMatch, RouteTable};

/// Parameters extracted from a URL by a descriptor.
pub type Params = serde_json::Map<String, serde_json::Value>;
