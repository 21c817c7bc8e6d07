//! In-memory [`Browser`].
//!
//! Keeps a session history stack, the document title, scroll calls and full
//! navigations. Used as the stand-in where there is no real window: tests,
//! the simulator, and server-side rendering hosts that still want to drive
//! the router.

use std::sync::{Mutex, MutexGuard};

use url::Url;

use crate::environment::browser::{Browser, HistoryState};
use crate::environment::dom::PopStateEvent;

#[derive(Debug, Clone)]
struct Entry {
    url: Url,
    state: Option<HistoryState>,
}

#[derive(Debug)]
struct Inner {
    entries: Vec<Entry>,
    index: usize,
    title: String,
    scrolls: Vec<(i32, i32)>,
    assigned: Vec<Url>,
    pushes: usize,
    replaces: usize,
}

#[derive(Debug)]
pub struct MemoryBrowser {
    inner: Mutex<Inner>,
}

impl MemoryBrowser {
    /// Start at an absolute URL.
    pub fn new(url: &str) -> Result<Self, url::ParseError> {
        let url = Url::parse(url)?;
        Ok(Self {
            inner: Mutex::new(Inner {
                entries: vec![Entry { url, state: None }],
                index: 0,
                title: String::new(),
                scrolls: Vec::new(),
                assigned: Vec::new(),
                pushes: 0,
                replaces: 0,
            }),
        })
    }

    pub fn title(&self) -> String {
        self.lock().title.clone()
    }

    /// Every `scroll_to` call, in order.
    pub fn scrolls(&self) -> Vec<(i32, i32)> {
        self.lock().scrolls.clone()
    }

    /// Every full navigation, in order.
    pub fn assigned(&self) -> Vec<Url> {
        self.lock().assigned.clone()
    }

    pub fn push_count(&self) -> usize {
        self.lock().pushes
    }

    pub fn replace_count(&self) -> usize {
        self.lock().replaces
    }

    pub fn history_len(&self) -> usize {
        self.lock().entries.len()
    }

    /// State of the current history entry.
    pub fn current_state(&self) -> Option<HistoryState> {
        let inner = self.lock();
        inner.entries[inner.index].state.clone()
    }

    /// Move back one entry. Returns the `popstate` event the page would see.
    pub fn back(&self) -> Option<PopStateEvent> {
        let mut inner = self.lock();
        if inner.index == 0 {
            return None;
        }
        inner.index -= 1;
        Some(PopStateEvent {
            state: inner.entries[inner.index].state.clone(),
        })
    }

    /// Move forward one entry.
    pub fn forward(&self) -> Option<PopStateEvent> {
        let mut inner = self.lock();
        if inner.index + 1 >= inner.entries.len() {
            return None;
        }
        inner.index += 1;
        Some(PopStateEvent {
            state: inner.entries[inner.index].state.clone(),
        })
    }

    fn lock(&self) -> MutexGuard<'_, Inner> {
        self.inner.lock().expect("browser mutex poisoned")
    }
}

impl Inner {
    fn resolve(&self, url: &str) -> Option<Url> {
        self.entries[self.index].url.join(url).ok()
    }

    fn push(&mut self, entry: Entry) {
        self.entries.truncate(self.index + 1);
        self.entries.push(entry);
        self.index += 1;
    }
}

impl Browser for MemoryBrowser {
    fn location(&self) -> Url {
        let inner = self.lock();
        inner.entries[inner.index].url.clone()
    }

    fn assign(&self, url: &str) {
        let mut inner = self.lock();
        let Some(url) = inner.resolve(url) else {
            tracing::warn!(url, "Ignoring assignment of unparseable URL");
            return;
        };
        inner.assigned.push(url.clone());
        inner.push(Entry { url, state: None });
    }

    fn push_state(&self, state: HistoryState, url: &str) {
        let mut inner = self.lock();
        let Some(url) = inner.resolve(url) else {
            tracing::warn!(url, "Ignoring pushState with unparseable URL");
            return;
        };
        inner.pushes += 1;
        inner.push(Entry {
            url,
            state: Some(state),
        });
    }

    fn replace_state(&self, state: HistoryState, url: &str) {
        let mut inner = self.lock();
        let Some(url) = inner.resolve(url) else {
            tracing::warn!(url, "Ignoring replaceState with unparseable URL");
            return;
        };
        inner.replaces += 1;
        let index = inner.index;
        inner.entries[index] = Entry {
            url,
            state: Some(state),
        };
    }

    fn set_title(&self, title: &str) {
        self.lock().title = title.to_string();
    }

    fn scroll_to(&self, x: i32, y: i32) {
        self.lock().scrolls.push((x, y));
    }
}
