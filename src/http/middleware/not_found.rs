//! Terminal fallback stage.

use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::Body,
    http::{Request, StatusCode},
    response::Response,
};
use tracing::debug;

use crate::error::Result;
use crate::http::handler::{Handler, Middleware};
use crate::http::response::ResponseSource;
use crate::observability::metrics;

/// Answers every request that reaches it. Wire it last.
pub struct NotFound {
    response: ResponseSource,
}

impl NotFound {
    pub fn new(response: ResponseSource) -> Self {
        Self { response }
    }
}

#[async_trait]
impl Middleware for NotFound {
    async fn process(&self, request: Request<Body>, next: Arc<dyn Handler>) -> Result<Response> {
        debug!(method = %request.method(), path = %request.uri().path(), "Request reached not-found stage");
        metrics::record_negotiation("not_found");
        self.response.respond(StatusCode::NOT_FOUND, request, next).await
    }
}
