//! URL matching logic.
//!
//! # Responsibilities
//! - Normalise absolute and relative URLs to a path
//! - Match path prefixes and `{name}` segment patterns
//! - Combine conditions with AND semantics
//!
//! # Design Decisions
//! - Matching is pure: no I/O, no shared state
//! - Path matching is case-sensitive
//! - No regex, segment-by-segment comparison only

use std::sync::OnceLock;

use serde_json::Value;
use thiserror::Error;
use url::Url;

use crate::routing::Params;

fn relative_base() -> &'static Url {
    static BASE: OnceLock<Url> = OnceLock::new();
    BASE.get_or_init(|| Url::parse("http://localhost/").expect("static base URL is valid"))
}

/// Resolve an absolute or relative URL.
///
/// Relative URLs are resolved against a placeholder origin, so only the path,
/// query and fragment of the result are meaningful for them.
pub fn resolve(url: &str) -> Option<Url> {
    match Url::parse(url) {
        Ok(parsed) => Some(parsed),
        Err(url::ParseError::RelativeUrlWithoutBase) => relative_base().join(url).ok(),
        Err(_) => None,
    }
}

/// Trait for matching a URL path against a condition.
pub trait UrlMatcher: Send + Sync + std::fmt::Debug {
    /// Returns the captured parameters if the path matches.
    fn match_path(&self, path: &str) -> Option<Params>;
}

/// Matches a path prefix.
#[derive(Debug, Clone)]
pub struct PathPrefixMatcher {
    prefix: String,
}

impl PathPrefixMatcher {
    /// Create a new path prefix matcher.
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
        }
    }
}

impl UrlMatcher for PathPrefixMatcher {
    fn match_path(&self, path: &str) -> Option<Params> {
        path.starts_with(&self.prefix).then(Params::new)
    }
}

/// Error returned when a path pattern cannot be compiled.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PatternError {
    #[error("pattern `{0}` must start with '/'")]
    MissingLeadingSlash(String),

    #[error("segment `{0}` has an unbalanced brace")]
    UnbalancedBrace(String),

    #[error("segment `{0}` has an empty capture name")]
    EmptyCapture(String),

    #[error("capture `{0}` appears more than once")]
    DuplicateCapture(String),

    #[error("wildcard `{0}` must be the last segment")]
    WildcardNotLast(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Capture(String),
    Rest(String),
}

/// Matches paths segment by segment, e.g. `/{locale}/docs/{slug}`.
///
/// A trailing `{*name}` captures the remainder of the path.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    pattern: String,
    segments: Vec<Segment>,
}

impl PatternMatcher {
    /// Compile a pattern.
    pub fn parse(pattern: &str) -> Result<Self, PatternError> {
        let Some(body) = pattern.strip_prefix('/') else {
            return Err(PatternError::MissingLeadingSlash(pattern.to_string()));
        };

        let raw: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.trim_end_matches('/').split('/').collect()
        };

        let mut segments = Vec::with_capacity(raw.len());
        for (i, part) in raw.iter().enumerate() {
            let segment = match (part.strip_prefix('{'), part.ends_with('}')) {
                (Some(inner), true) => {
                    let name = &inner[..inner.len() - 1];
                    if let Some(rest) = name.strip_prefix('*') {
                        if i + 1 != raw.len() {
                            return Err(PatternError::WildcardNotLast(part.to_string()));
                        }
                        Segment::Rest(rest.to_string())
                    } else {
                        Segment::Capture(name.to_string())
                    }
                }
                (None, false) if !part.contains('{') && !part.contains('}') => {
                    Segment::Literal(part.to_string())
                }
                _ => return Err(PatternError::UnbalancedBrace(part.to_string())),
            };

            if let Segment::Capture(name) | Segment::Rest(name) = &segment {
                if name.is_empty() {
                    return Err(PatternError::EmptyCapture(part.to_string()));
                }
                let seen = segments.iter().any(|s| {
                    matches!(s, Segment::Capture(n) | Segment::Rest(n) if n == name)
                });
                if seen {
                    return Err(PatternError::DuplicateCapture(name.clone()));
                }
            }
            segments.push(segment);
        }

        Ok(Self {
            pattern: pattern.to_string(),
            segments,
        })
    }

    /// The source pattern.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }
}

impl UrlMatcher for PatternMatcher {
    fn match_path(&self, path: &str) -> Option<Params> {
        let body = path.strip_prefix('/')?.trim_end_matches('/');
        let parts: Vec<&str> = if body.is_empty() {
            Vec::new()
        } else {
            body.split('/').collect()
        };

        let mut params = Params::new();
        let mut idx = 0;
        for segment in &self.segments {
            match segment {
                Segment::Literal(lit) => {
                    if parts.get(idx) != Some(&lit.as_str()) {
                        return None;
                    }
                }
                Segment::Capture(name) => {
                    let value = parts.get(idx).filter(|v| !v.is_empty())?;
                    params.insert(name.clone(), Value::String((*value).to_string()));
                }
                Segment::Rest(name) => {
                    let rest = parts.get(idx..).unwrap_or_default().join("/");
                    params.insert(name.clone(), Value::String(rest));
                    return Some(params);
                }
            }
            idx += 1;
        }

        (idx == parts.len()).then_some(params)
    }
}

/// Combines multiple matchers with AND semantics.
///
/// Captures are merged left to right; later matchers win on key collisions.
#[derive(Debug)]
pub struct AndMatcher {
    matchers: Vec<Box<dyn UrlMatcher>>,
}

impl AndMatcher {
    pub fn new(matchers: Vec<Box<dyn UrlMatcher>>) -> Self {
        Self { matchers }
    }
}

impl UrlMatcher for AndMatcher {
    fn match_path(&self, path: &str) -> Option<Params> {
        let mut merged = Params::new();
        for matcher in &self.matchers {
            merged.extend(matcher.match_path(path)?);
        }
        Some(merged)
    }
}
