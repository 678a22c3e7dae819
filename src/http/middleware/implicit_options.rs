//! Implicit OPTIONS: answer OPTIONS on a method failure with `Allow`.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Method, Request, StatusCode},
    response::Response,
};
use tracing::debug;

use crate::error::Result;
use crate::http::context::{AttributeKey, RequestExt};
use crate::http::handler::{Handler, Middleware};
use crate::http::response::{set_allow, ResponseSource};
use crate::observability::metrics;

pub struct ImplicitOptions {
    response: ResponseSource,
    attribute: AttributeKey,
}

impl ImplicitOptions {
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
impl Middleware for ImplicitOptions {
    async fn process(&self, request: Request<Body>, next: Arc<dyn Handler>) -> Result<Response> {
        if request.method() != Method::OPTIONS {
            return next.handle(request).await;
        }
        let result = match request.route_result(&self.attribute) {
            Some(result) if result.is_method_failure() => result,
            _ => return next.handle(request).await,
        };

        debug!(path = %request.uri().path(), allowed = ?result.allowed_methods(), "Answering implicit OPTIONS");
        metrics::record_negotiation("implicit_options");

        // factories are not given a status override here
        let mut response = self.response.respond(StatusCode::OK, request, next).await?;
        set_allow(&mut response, result.allowed_methods());
        Ok(response)
    }
}
