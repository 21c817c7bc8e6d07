//! Rendering subsystem.
//!
//! # Data Flow
//! ```text
//! Router commit / indicator change
//!     → surface.rs (read NavigationState, paint Frame)
//!     → component.rs (PageComponent::render({ ...params, data }))
//!     → loading.rs (indicator flag)
//!     → watch channel → observers
//! ```
//!
//! # Design Decisions
//! - The surface never mutates navigation state
//! - A page with `data == None` is painted but never reported as loaded

pub mod component;
pub mod loading;
pub mod surface;

pub use component::{JsonPage, PageComponent, PageProps};
pub use loading::LoadingIndicator;
pub use surface::{Frame, RenderedPage, RenderingSurface};
