//! Document event interception.
//!
//! # Responsibilities
//! - Decide whether a click or submit is an in-app navigation
//! - Route it, suppress the browser default, and record a history entry
//! - Route `popstate` events that carry router state
//!
//! # Design Decisions
//! - Anything unusual (modifier keys, other origins, explicit targets,
//!   non-GET forms) is left to the browser
//! - Listeners only exist after `mount`, which needs a browser

use std::sync::Arc;

use url::form_urlencoded;
use url::Url;

use crate::environment::{
    relative_url, Browser, ClickEvent, EventTarget, FormElement, HistoryState, PopStateEvent,
    SubmitEvent,
};
use crate::router::engine::{Navigation, Router};

impl Router {
    /// Install document listeners.
    ///
    /// Records the current URL in history state so that a later Back press
    /// is routable. Returns `None` without a browser environment, and on any
    /// call after the first.
    pub fn mount(self: &Arc<Self>) -> Option<Listeners> {
        let Some(browser) = self.browser().cloned() else {
            tracing::debug!("No browser environment, skipping event interception");
            return None;
        };
        if !self.claim_mount() {
            tracing::warn!("Router already mounted");
            return None;
        }

        let url = relative_url(&browser.location());
        browser.replace_state(HistoryState::new(url.clone()), &url);
        tracing::debug!(url, "Router mounted");

        Some(Listeners {
            router: Arc::clone(self),
            browser,
        })
    }
}

/// Click, submit and popstate handlers bound to a mounted router.
pub struct Listeners {
    router: Arc<Router>,
    browser: Arc<dyn Browser>,
}

impl Listeners {
    pub fn on_click(&self, event: &mut ClickEvent) -> Navigation {
        let Some(url) = link_target(event, &self.browser.location()) else {
            return Navigation::Unhandled;
        };
        self.take_over(url, || event.prevent_default())
    }

    pub fn on_submit(&self, event: &mut SubmitEvent) -> Navigation {
        let Some(url) = form_target(&event.form, &self.browser.location()) else {
            return Navigation::Unhandled;
        };
        self.take_over(url, || event.prevent_default())
    }

    /// Entries without router state are plain fragment changes and are
    /// ignored.
    pub fn on_popstate(&self, event: &PopStateEvent) -> Navigation {
        match &event.state {
            Some(state) => self.router.navigate(&state.url, None),
            None => Navigation::Unhandled,
        }
    }

    pub fn router(&self) -> &Arc<Router> {
        &self.router
    }

    fn take_over(&self, url: String, prevent_default: impl FnOnce()) -> Navigation {
        let navigation = self.router.navigate(&url, None);
        match &navigation {
            Navigation::Unhandled => {}
            // Linking to the page being shown: nothing to load or record.
            Navigation::Unchanged => prevent_default(),
            Navigation::Committed | Navigation::Fetching(_) => {
                prevent_default();
                self.browser.push_state(HistoryState::new(url.clone()), &url);
            }
        }
        navigation
    }
}

/// The in-app URL a click navigates to, or `None` if the browser should
/// handle it.
pub fn link_target(event: &ClickEvent, location: &Url) -> Option<String> {
    if event.button != 0 || event.detail > 1 || event.modifiers.any() {
        return None;
    }
    let EventTarget::Element(element) = &event.target else {
        return None;
    };

    let anchor = element.closest("a")?;
    let href = anchor.attr("href").filter(|href| !href.is_empty())?;
    if href.starts_with('#') || anchor.attr("target").is_some() {
        return None;
    }

    let resolved = location.join(href).ok()?;
    if resolved.origin() != location.origin() {
        return None;
    }
    Some(relative_url(&resolved))
}

/// The in-app URL a form submission navigates to, or `None` if the browser
/// should handle it.
///
/// Named fields replace the action URL's query string, as a browser does for
/// GET forms.
pub fn form_target(form: &FormElement, location: &Url) -> Option<String> {
    let method = form.method.as_deref().unwrap_or("get");
    if !method.eq_ignore_ascii_case("get") || form.target.is_some() {
        return None;
    }

    let mut action = match form.action.as_deref().filter(|a| !a.is_empty()) {
        Some(action) => location.join(action).ok()?,
        None => location.clone(),
    };
    if action.origin() != location.origin() {
        return None;
    }

    let query = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(
            form.fields
                .iter()
                .filter(|field| !field.name.is_empty())
                .map(|field| (field.name.as_str(), field.value.as_str())),
        )
        .finish();
    action.set_query((!query.is_empty()).then_some(query.as_str()));
    action.set_fragment(None);

    Some(relative_url(&action))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::environment::{Element, Modifiers};

    fn location() -> Url {
        Url::parse("https://example.com/en-US/docs/Web").unwrap()
    }

    fn click(href: &str) -> ClickEvent {
        ClickEvent::on(Element::anchor(href))
    }

    #[test]
    fn test_plain_link() {
        assert_eq!(
            link_target(&click("/en-US/search?q=a"), &location()).as_deref(),
            Some("/en-US/search?q=a")
        );
        assert_eq!(
            link_target(&click("CSS"), &location()).as_deref(),
            Some("/en-US/docs/CSS")
        );
        assert_eq!(
            link_target(&click("https://example.com/fr/"), &location()).as_deref(),
            Some("/fr/")
        );
    }

    #[test]
    fn test_click_inside_anchor() {
        let anchor = Arc::new(Element::anchor("/en-US/docs/HTML"));
        let event = ClickEvent::on(Element::new("code").with_parent(anchor));
        assert_eq!(
            link_target(&event, &location()).as_deref(),
            Some("/en-US/docs/HTML")
        );
    }

    #[test]
    fn test_ignored_clicks() {
        let loc = location();

        let mut right = click("/a");
        right.button = 2;
        assert!(link_target(&right, &loc).is_none());

        let mut double = click("/a");
        double.detail = 2;
        assert!(link_target(&double, &loc).is_none());

        for modifiers in [
            Modifiers { ctrl: true, ..Modifiers::default() },
            Modifiers { meta: true, ..Modifiers::default() },
            Modifiers { shift: true, ..Modifiers::default() },
            Modifiers { alt: true, ..Modifiers::default() },
        ] {
            assert!(link_target(&click("/a").with_modifiers(modifiers), &loc).is_none());
        }

        assert!(link_target(&ClickEvent::primary(EventTarget::Other), &loc).is_none());
        assert!(link_target(&ClickEvent::on(Element::new("div")), &loc).is_none());
        assert!(link_target(&ClickEvent::on(Element::new("a")), &loc).is_none());
        assert!(link_target(&click(""), &loc).is_none());
        assert!(link_target(&click("#section"), &loc).is_none());
        assert!(link_target(&click("https://other.org/a"), &loc).is_none());
        assert!(link_target(&click("http://example.com/a"), &loc).is_none());

        let blank = ClickEvent::on(Element::anchor("/a").with_attr("target", "_blank"));
        assert!(link_target(&blank, &loc).is_none());
    }

    #[test]
    fn test_form_target() {
        let loc = location();
        let form = FormElement::get("/en-US/search")
            .with_field("q", "flex box")
            .with_field("", "unnamed")
            .with_field("page", "2");
        assert_eq!(
            form_target(&form, &loc).as_deref(),
            Some("/en-US/search?q=flex+box&page=2")
        );

        let replaces_query = FormElement::get("/en-US/search?old=1#frag").with_field("q", "x");
        assert_eq!(
            form_target(&replaces_query, &loc).as_deref(),
            Some("/en-US/search?q=x")
        );

        let no_action = FormElement::default();
        assert_eq!(form_target(&no_action, &loc).as_deref(), Some("/en-US/docs/Web"));
    }

    #[test]
    fn test_ignored_forms() {
        let loc = location();

        let post = FormElement {
            method: Some("POST".into()),
            ..FormElement::get("/search")
        };
        assert!(form_target(&post, &loc).is_none());

        let targeted = FormElement {
            target: Some("_blank".into()),
            ..FormElement::get("/search")
        };
        assert!(form_target(&targeted, &loc).is_none());

        assert!(form_target(&FormElement::get("https://other.org/search"), &loc).is_none());

        let upper_get = FormElement {
            method: Some("GET".into()),
            ..FormElement::get("/search")
        };
        assert!(form_target(&upper_get, &loc).is_some());
    }
}
