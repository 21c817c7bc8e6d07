//! A configurable [`RouteDescriptor`] for the common case.
//!
//! Most page families are "a URL shape, a loader, a title". `PageRoute`
//! assembles those from a matcher and closures so applications do not have
//! to hand-write a descriptor per page.

use std::sync::Arc;

use serde_json::Value;

use crate::config::RouteConfig;
use crate::observability::analytics::AnalyticsSink;
use crate::render::component::PageComponent;
use crate::routing::matcher::{resolve, PatternError, PatternMatcher, UrlMatcher};
use crate::routing::{Fetch, Params, RouteDescriptor};

type LoaderFn = Arc<dyn Fn(&Params) -> Fetch + Send + Sync>;
type TitleFn = Arc<dyn Fn(&Params, &Value) -> Option<String> + Send + Sync>;
type AnalyticsFn = Arc<dyn Fn(&dyn AnalyticsSink, &Params, &Value) + Send + Sync>;

/// Descriptor built from a matcher and optional closures.
///
/// Params always carry `path`; `query` is added when the URL has a query
/// string, and `locale` when the route was built with one.
pub struct PageRoute {
    name: String,
    matcher: Box<dyn UrlMatcher>,
    locale: Option<String>,
    component: Arc<dyn PageComponent>,
    loader: Option<LoaderFn>,
    title: Option<TitleFn>,
    analytics: Option<AnalyticsFn>,
}

impl PageRoute {
    pub fn new(
        name: impl Into<String>,
        matcher: impl UrlMatcher + 'static,
        component: Arc<dyn PageComponent>,
    ) -> Self {
        Self {
            name: name.into(),
            matcher: Box::new(matcher),
            locale: None,
            component,
            loader: None,
            title: None,
            analytics: None,
        }
    }

    /// Build from a config entry. The title template, if any, has its
    /// `{param}` placeholders filled from the matched params.
    pub fn from_config(
        config: &RouteConfig,
        component: Arc<dyn PageComponent>,
    ) -> Result<Self, PatternError> {
        let mut route = Self::new(
            config.name.clone(),
            PatternMatcher::parse(&config.pattern)?,
            component,
        );
        if let Some(locale) = &config.locale {
            route = route.with_locale(locale.clone());
        }
        if let Some(template) = config.title.clone() {
            route = route.with_title(move |params, _| Some(fill_template(&template, params)));
        }
        Ok(route)
    }

    /// Pin the route to one locale.
    ///
    /// A `locale` capture that disagrees makes the URL unmatched.
    pub fn with_locale(mut self, locale: impl Into<String>) -> Self {
        self.locale = Some(locale.into());
        self
    }

    pub fn with_loader<F>(mut self, loader: F) -> Self
    where
        F: Fn(&Params) -> Fetch + Send + Sync + 'static,
    {
        self.loader = Some(Arc::new(loader));
        self
    }

    pub fn with_title<F>(mut self, title: F) -> Self
    where
        F: Fn(&Params, &Value) -> Option<String> + Send + Sync + 'static,
    {
        self.title = Some(Arc::new(title));
        self
    }

    pub fn with_analytics<F>(mut self, hook: F) -> Self
    where
        F: Fn(&dyn AnalyticsSink, &Params, &Value) + Send + Sync + 'static,
    {
        self.analytics = Some(Arc::new(hook));
        self
    }
}

impl std::fmt::Debug for PageRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PageRoute")
            .field("name", &self.name)
            .field("matcher", &self.matcher)
            .field("locale", &self.locale)
            .field("loader", &self.loader.is_some())
            .finish_non_exhaustive()
    }
}

impl RouteDescriptor for PageRoute {
    fn name(&self) -> &str {
        &self.name
    }

    fn match_url(&self, url: &str) -> Option<Params> {
        let parsed = resolve(url)?;
        let mut params = self.matcher.match_path(parsed.path())?;

        if let Some(locale) = &self.locale {
            match params.get("locale").and_then(Value::as_str) {
                Some(captured) if captured != locale.as_str() => return None,
                _ => {
                    params.insert("locale".into(), Value::String(locale.clone()));
                }
            }
        }

        params.insert("path".into(), Value::String(parsed.path().to_string()));
        let query: Params = parsed
            .query_pairs()
            .map(|(k, v)| (k.into_owned(), Value::String(v.into_owned())))
            .collect();
        if !query.is_empty() {
            params.insert("query".into(), Value::Object(query));
        }
        Some(params)
    }

    fn component(&self) -> Arc<dyn PageComponent> {
        Arc::clone(&self.component)
    }

    fn fetch(&self, params: &Params) -> Fetch {
        match &self.loader {
            Some(loader) => loader(params),
            None => Fetch::Ready(Value::Null),
        }
    }

    fn title(&self, params: &Params, data: &Value) -> Option<String> {
        self.title.as_ref().and_then(|title| title(params, data))
    }

    fn analytics_hook(&self, sink: &dyn AnalyticsSink, params: &Params, data: &Value) {
        if let Some(hook) = &self.analytics {
            hook(sink, params, data);
        }
    }
}

/// Replace `{key}` with the string form of `params[key]`.
/// Unknown keys are left as-is.
pub fn fill_template(template: &str, params: &Params) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;
    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let key = &after[..close];
                match params.get(key) {
                    Some(Value::String(s)) => out.push_str(s),
                    Some(other) => out.push_str(&other.to_string()),
                    None => {
                        out.push('{');
                        out.push_str(key);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
