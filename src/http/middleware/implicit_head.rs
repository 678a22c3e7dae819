//! Implicit HEAD: answer HEAD from a GET route when no HEAD route exists.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request},
    response::Response,
};
use tracing::debug;

use super::request_path;
use crate::error::Result;
use crate::http::context::{AttributeKey, RequestExt};
use crate::http::handler::{Handler, Middleware};
use crate::http::response::strip_body;
use crate::observability::metrics;
use crate::routing::{Dispatch, Dispatcher, RouteResult};

/// On a HEAD method failure, re-resolves the path as GET once. If that
/// matches, the rest of the chain runs as GET and the body is dropped from
/// whatever it returns.
pub struct ImplicitHead {
    dispatcher: Arc<dyn Dispatcher>,
    attribute: AttributeKey,
}

impl ImplicitHead {
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
}

#[async_trait]
impl Middleware for ImplicitHead {
    async fn process(&self, mut request: Request<Body>, next: Arc<dyn Handler>) -> Result<Response> {
        if request.method() != Method::HEAD {
            return next.handle(request).await;
        }
        match request.route_result(&self.attribute) {
            Some(result) if result.is_method_failure() => {}
            _ => return next.handle(request).await,
        }

        let dispatch = self.dispatcher.dispatch(&Method::GET, &request_path(&request));
        let Dispatch::Found(route, params) = dispatch else {
            return next.handle(request).await;
        };

        debug!(path = %request.uri().path(), route = %route.name(), "Serving HEAD from GET route");
        metrics::record_negotiation("implicit_head");

        *request.method_mut() = Method::GET;
        request.set_route_result(
            self.attribute.clone(),
            RouteResult::from_route_success(route, params),
        );

        let response = next.handle(request).await?;
        Ok(strip_body(response))
    }
}
