//! Router engine subsystem.
//!
//! # Data Flow
//! ```text
//! click / submit / popstate
//!     → intercept.rs (filter, compute in-app URL)
//!     → engine.rs navigate()
//!         → RouteTable::resolve (first match wins)
//!         → cross-route: commit pending state now
//!         → same-route: keep current page
//!         → spawn fetch
//!             → Ok: scroll, title, commit, report
//!             → Err: Browser::assign(url)
//!     → state.rs (NavigationState in an ArcSwap cell)
//!     → RenderingSurface repaint
//! ```

pub mod engine;
pub mod intercept;
pub mod state;

pub use engine::{Navigation, Phase, Router, RouterBuilder};
pub use intercept::{form_target, link_target, Listeners};
pub use state::NavigationState;
