//! 405 for any method failure, with `Allow`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use tracing::debug;

use crate::error::Result;
use crate::http::context::{AttributeKey, RequestExt};
use crate::http::handler::{Handler, Middleware};
use crate::http::response::{set_allow, ResponseSource};
use crate::observability::metrics;

pub struct MethodNotAllowed {
    response: ResponseSource,
    attribute: AttributeKey,
}

impl MethodNotAllowed {
    pub fn new(response: ResponseSource) -> Self {
        Self {
            response,
            attribute: AttributeKey::DEFAULT,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<AttributeKey>) -> Self {
        self.attribute = attribute.into();
        self
    }
}

#[async_trait]
impl Middleware for MethodNotAllowed {
    async fn process(&self, request: Request<Body>, next: Arc<dyn Handler>) -> Result<Response> {
        let result = match request.route_result(&self.attribute) {
            Some(result) if result.is_method_failure() => result,
            _ => return next.handle(request).await,
        };

        debug!(
            method = %request.method(),
            path = %request.uri().path(),
            allowed = ?result.allowed_methods(),
            "Method not allowed"
        );
        metrics::record_negotiation("method_not_allowed");

        let mut response = self
            .response
            .respond(StatusCode::METHOD_NOT_ALLOWED, request, next)
            .await?;
        set_allow(&mut response, result.allowed_methods());
        Ok(response)
    }
}
