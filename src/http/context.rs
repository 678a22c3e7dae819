//! Request-scoped route attributes.
//!
//! Stages exchange the `RouteResult` through the request's extensions,
//! under a string key every cooperating stage is configured with.

use std::borrow::Cow;
use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use axum::http::Request;

use crate::routing::RouteResult;

/// Key under which a `RouteResult` is attached to a request.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AttributeKey(Cow<'static, str>);

impl AttributeKey {
    pub const DEFAULT: AttributeKey = AttributeKey(Cow::Borrowed("route_negotiator::RouteResult"));

    pub fn new(key: impl Into<Cow<'static, str>>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl Default for AttributeKey {
    fn default() -> Self {
        Self::DEFAULT
    }
}

impl fmt::Display for AttributeKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&'static str> for AttributeKey {
    fn from(key: &'static str) -> Self {
        Self(Cow::Borrowed(key))
    }
}

impl From<String> for AttributeKey {
    fn from(key: String) -> Self {
        Self(Cow::Owned(key))
    }
}

/// Extension holding every attached result, by key.
#[derive(Debug, Clone, Default)]
pub struct RouteAttributes {
    results: HashMap<AttributeKey, Arc<RouteResult>>,
}

impl RouteAttributes {
    pub fn get(&self, key: &AttributeKey) -> Option<&Arc<RouteResult>> {
        self.results.get(key)
    }

    pub fn insert(&mut self, key: AttributeKey, result: RouteResult) {
        self.results.insert(key, Arc::new(result));
    }
}

/// Route-attribute access on requests.
pub trait RequestExt {
    fn route_result(&self, key: &AttributeKey) -> Option<Arc<RouteResult>>;

    /// Attach (or replace) the result under `key`.
    fn set_route_result(&mut self, key: AttributeKey, result: RouteResult);
}

impl<B> RequestExt for Request<B> {
    fn route_result(&self, key: &AttributeKey) -> Option<Arc<RouteResult>> {
        self.extensions()
            .get::<RouteAttributes>()
            .and_then(|attributes| attributes.get(key))
            .cloned()
    }

    fn set_route_result(&mut self, key: AttributeKey, result: RouteResult) {
        let extensions = self.extensions_mut();
        match extensions.get_mut::<RouteAttributes>() {
            Some(attributes) => attributes.insert(key, result),
            None => {
                let mut attributes = RouteAttributes::default();
                attributes.insert(key, result);
                extensions.insert(attributes);
            }
        }
    }
}
