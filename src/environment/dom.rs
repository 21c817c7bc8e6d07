//! DOM event model.
//!
//! Just enough of the document to decide whether a click or submit is an
//! in-app navigation: elements with attributes and a parent chain, and the
//! three event kinds the router listens for.

use std::collections::BTreeMap;
use std::sync::Arc;

use crate::environment::browser::HistoryState;

/// An element with its ancestors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    tag: String,
    attributes: BTreeMap<String, String>,
    parent: Option<Arc<Element>>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into().to_ascii_lowercase(),
            attributes: BTreeMap::new(),
            parent: None,
        }
    }

    /// Shorthand for `<a href="...">`.
    pub fn anchor(href: impl Into<String>) -> Self {
        Self::new("a").with_attr("href", href)
    }

    pub fn with_attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes
            .insert(name.into().to_ascii_lowercase(), value.into());
        self
    }

    pub fn with_parent(mut self, parent: Arc<Element>) -> Self {
        self.parent = Some(parent);
        self
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    pub fn attr(&self, name: &str) -> Option<&str> {
        self.attributes.get(name).map(String::as_str)
    }

    pub fn parent(&self) -> Option<&Element> {
        self.parent.as_deref()
    }

    /// This element or the nearest ancestor with the given tag.
    pub fn closest(&self, tag: &str) -> Option<&Element> {
        let mut node = Some(self);
        while let Some(el) = node {
            if el.tag.eq_ignore_ascii_case(tag) {
                return Some(el);
            }
            node = el.parent();
        }
        None
    }
}

/// What an event was dispatched on.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EventTarget {
    Element(Arc<Element>),
    /// A text node, the document, or anything else that is not an element.
    Other,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Modifiers {
    pub ctrl: bool,
    pub meta: bool,
    pub shift: bool,
    pub alt: bool,
}

impl Modifiers {
    pub fn any(&self) -> bool {
        self.ctrl || self.meta || self.shift || self.alt
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClickEvent {
    /// 0 is the primary button.
    pub button: i16,
    /// Click count; 2 for a double click.
    pub detail: u32,
    pub modifiers: Modifiers,
    pub target: EventTarget,
    default_prevented: bool,
}

impl ClickEvent {
    /// A single primary-button click with no modifiers.
    pub fn primary(target: EventTarget) -> Self {
        Self {
            button: 0,
            detail: 1,
            modifiers: Modifiers::default(),
            target,
            default_prevented: false,
        }
    }

    /// A plain click on `element`.
    pub fn on(element: Element) -> Self {
        Self::primary(EventTarget::Element(Arc::new(element)))
    }

    pub fn with_modifiers(mut self, modifiers: Modifiers) -> Self {
        self.modifiers = modifiers;
        self
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FormField {
    pub name: String,
    pub value: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormElement {
    /// Defaults to GET when absent.
    pub method: Option<String>,
    /// Defaults to the current location when absent or empty.
    pub action: Option<String>,
    pub target: Option<String>,
    pub fields: Vec<FormField>,
}

impl FormElement {
    /// A GET form submitting to `action`.
    pub fn get(action: impl Into<String>) -> Self {
        Self {
            action: Some(action.into()),
            ..Self::default()
        }
    }

    pub fn with_field(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField {
            name: name.into(),
            value: value.into(),
        });
        self
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitEvent {
    pub form: FormElement,
    default_prevented: bool,
}

impl SubmitEvent {
    pub fn new(form: FormElement) -> Self {
        Self {
            form,
            default_prevented: false,
        }
    }

    pub fn prevent_default(&mut self) {
        self.default_prevented = true;
    }

    pub fn default_prevented(&self) -> bool {
        self.default_prevented
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PopStateEvent {
    pub state: Option<HistoryState>,
}
