//! Host environment subsystem.
//!
//! # Data Flow
//! ```text
//! Document events (click, submit, popstate)
//!     → dom.rs (typed events, element tree)
//!     → router listeners (decide, navigate, prevent default)
//!
//! Router side effects
//!     → browser.rs (Browser trait: location, history, title, scroll)
//!     → memory.rs (in-memory implementation) or a real window binding
//! ```
//!
//! # Design Decisions
//! - The router owns `Option<Arc<dyn Browser>>`; `None` means server-side
//!   rendering and every browser-only step is skipped

pub mod browser;
pub mod dom;
pub mod memory;

pub use browser::{relative_url, Browser, HistoryState};
pub use dom::{
    ClickEvent, Element, EventTarget, FormElement, FormField, Modifiers, PopStateEvent,
    SubmitEvent,
};
pub use memory::MemoryBrowser;
