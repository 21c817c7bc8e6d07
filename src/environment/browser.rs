//! Browser capability.
//!
//! Location, history, document title and scrolling are the only
//! process-wide resources the router touches, and it reaches them through
//! this trait. Server-side rendering simply has no `Browser`.

use serde::{Deserialize, Serialize};
use url::{Position, Url};

/// State the router stores on history entries it creates.
///
/// A `popstate` carrying this state is routable; one without it (a plain
/// fragment change) is left alone.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryState {
    pub url: String,
}

impl HistoryState {
    pub fn new(url: impl Into<String>) -> Self {
        Self { url: url.into() }
    }
}

pub trait Browser: Send + Sync {
    /// The current absolute location.
    fn location(&self) -> Url;

    /// Full navigation, leaving the single-page app (`window.location = url`).
    fn assign(&self, url: &str);

    fn push_state(&self, state: HistoryState, url: &str);

    fn replace_state(&self, state: HistoryState, url: &str);

    fn set_title(&self, title: &str);

    fn scroll_to(&self, x: i32, y: i32);
}

/// Path, query and fragment of `url`, i.e. the part the router routes on.
pub fn relative_url(url: &Url) -> String {
    url[Position::BeforePath..].to_string()
}
