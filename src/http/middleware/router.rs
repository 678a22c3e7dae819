//! Resolver stage: matches the request and attaches the result.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use tracing::debug;

use super::request_path;
use crate::error::Result;
use crate::http::context::{AttributeKey, RequestExt};
use crate::http::handler::{Handler, Middleware};
use crate::observability::metrics;
use crate::routing::{Dispatch, Dispatcher, RouteResult};

/// Runs the matching engine for every request and always forwards.
pub struct RouteResolver {
    dispatcher: Arc<dyn Dispatcher>,
    attribute: AttributeKey,
}

impl RouteResolver {
    pub fn new(dispatcher: Arc<dyn Dispatcher>) -> Self {
        Self {
            dispatcher,
            attribute: AttributeKey::DEFAULT,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<AttributeKey>) -> Self {
        self.attribute = attribute.into();
        self
    }

    pub fn attribute(&self) -> &AttributeKey {
        &self.attribute
    }

    /// Resolve without running the chain.
    pub fn resolve(&self, request: &Request<Body>) -> RouteResult {
        let path = request_path(request);
        let dispatch = self.dispatcher.dispatch(request.method(), &path);

        let outcome = match &dispatch {
            Dispatch::Found(route, _) => {
                debug!(method = %request.method(), path = %path, route = %route.name(), "Route matched");
                "found"
            }
            Dispatch::MethodNotAllowed(allowed) => {
                debug!(method = %request.method(), path = %path, allowed = ?allowed, "Method not allowed");
                "method_not_allowed"
            }
            Dispatch::NotFound => {
                debug!(method = %request.method(), path = %path, "No route matched");
                "not_found"
            }
        };
        metrics::record_resolution(outcome);

        RouteResult::from(dispatch)
    }
}

#[async_trait]
impl Middleware for RouteResolver {
    async fn process(&self, mut request: Request<Body>, next: Arc<dyn Handler>) -> Result<Response> {
        let result = self.resolve(&request);
        request.set_route_result(self.attribute.clone(), result);
        next.handle(request).await
    }
}
