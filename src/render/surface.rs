//! The rendering surface.
//!
//! Paints the loading indicator and mounts the current page component with
//! its params and data. It only reads navigation state; the router decides
//! when to repaint.

use std::sync::atomic::{AtomicUsize, Ordering};

use serde::Serialize;
use tokio::sync::watch;

use crate::render::component::PageProps;
use crate::router::state::NavigationState;

/// The mounted page.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RenderedPage {
    pub route: String,
    pub url: String,
    /// `false` while data is outstanding.
    pub loaded: bool,
    pub markup: String,
}

/// One paint of the surface.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Frame {
    pub loading: bool,
    pub page: Option<RenderedPage>,
}

impl Frame {
    /// Whether a page is mounted and has its data.
    pub fn is_loaded(&self) -> bool {
        self.page.as_ref().is_some_and(|page| page.loaded)
    }
}

#[derive(Debug)]
pub struct RenderingSurface {
    frames: watch::Sender<Frame>,
    paints: AtomicUsize,
}

impl RenderingSurface {
    pub fn new() -> Self {
        let (frames, _) = watch::channel(Frame::default());
        Self {
            frames,
            paints: AtomicUsize::new(0),
        }
    }

    /// Render `state` and publish the frame.
    pub fn paint(&self, state: &NavigationState, loading: bool) -> Frame {
        let page = match (&state.route, &state.component, &state.url) {
            (Some(route), Some(component), Some(url)) => {
                let props = PageProps::new(state.params.clone(), state.data.clone());
                Some(RenderedPage {
                    route: route.name().to_string(),
                    url: url.clone(),
                    loaded: props.is_loaded(),
                    markup: component.render(&props),
                })
            }
            _ => None,
        };

        let frame = Frame { loading, page };
        self.paints.fetch_add(1, Ordering::SeqCst);
        self.frames.send_replace(frame.clone());
        frame
    }

    /// The most recent frame.
    pub fn current(&self) -> Frame {
        self.frames.borrow().clone()
    }

    /// Observe frames as they are painted.
    pub fn subscribe(&self) -> watch::Receiver<Frame> {
        self.frames.subscribe()
    }

    /// Number of paints so far.
    pub fn paint_count(&self) -> usize {
        self.paints.load(Ordering::SeqCst)
    }
}

impl Default for RenderingSurface {
    fn default() -> Self {
        Self::new()
    }
}
