//! Page component contract.
//!
//! A page component receives `{ ...params, data }` as its entire input. What
//! it renders is up to the application.

use serde_json::Value;

use crate::routing::Params;

/// Input handed to a page component.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PageProps {
    pub params: Params,
    /// `None` while the page's data is still loading.
    pub data: Option<Value>,
}

impl PageProps {
    pub fn new(params: Params, data: Option<Value>) -> Self {
        Self { params, data }
    }

    /// Whether the page has its data.
    pub fn is_loaded(&self) -> bool {
        self.data.is_some()
    }

    /// The flattened `{ ...params, data }` object.
    ///
    /// `data` is `null` while loading; a `data` param is shadowed.
    pub fn to_value(&self) -> Value {
        let mut object = self.params.clone();
        object.insert("data".into(), self.data.clone().unwrap_or(Value::Null));
        Value::Object(object)
    }
}

/// A renderable page.
pub trait PageComponent: Send + Sync {
    fn render(&self, props: &PageProps) -> String;
}

impl<F> PageComponent for F
where
    F: Fn(&PageProps) -> String + Send + Sync,
{
    fn render(&self, props: &PageProps) -> String {
        self(props)
    }
}

/// Renders the props as compact JSON.
#[derive(Debug, Default, Clone, Copy)]
pub struct JsonPage;

impl PageComponent for JsonPage {
    fn render(&self, props: &PageProps) -> String {
        props.to_value().to_string()
    }
}
