//! Resolution result attached to each request.

use std::collections::BTreeMap;
use std::sync::Arc;

use axum::http::Method;

use super::dispatcher::Dispatch;
use super::route::Route;

/// Path variables captured by the matching engine.
pub type Params = BTreeMap<String, String>;

/// Outcome of one dispatch attempt.
///
/// Successful results carry the matched route and its parameters. Failed
/// results carry the methods allowed at the path, which is empty for a plain
/// miss and non-empty for a method mismatch.
#[derive(Debug, Clone)]
pub struct RouteResult {
    route: Option<Arc<Route>>,
    params: Params,
    methods: Vec<Method>,
}

impl RouteResult {
    pub fn from_route_success(route: Arc<Route>, params: Params) -> Self {
        Self {
            route: Some(route),
            params,
            methods: Vec::new(),
        }
    }

    pub fn from_route_failure(methods: Vec<Method>) -> Self {
        Self {
            route: None,
            params: Params::new(),
            methods,
        }
    }

    pub fn is_success(&self) -> bool {
        self.route.is_some()
    }

    /// True when the path exists but not for the requested method.
    pub fn is_method_failure(&self) -> bool {
        !self.is_success() && !self.methods.is_empty()
    }

    pub fn route(&self) -> Option<&Arc<Route>> {
        self.route.as_ref()
    }

    pub fn params(&self) -> &Params {
        &self.params
    }

    pub fn param(&self, name: &str) -> Option<&str> {
        self.params.get(name).map(String::as_str)
    }

    /// Methods allowed at the path, in the order the engine reported them.
    pub fn allowed_methods(&self) -> &[Method] {
        &self.methods
    }
}

impl From<Dispatch> for RouteResult {
    fn from(dispatch: Dispatch) -> Self {
        match dispatch {
            Dispatch::NotFound => Self::from_route_failure(Vec::new()),
            Dispatch::MethodNotAllowed(allowed) => Self::from_route_failure(allowed),
            Dispatch::Found(route, params) => Self::from_route_success(route, params),
        }
    }
}
