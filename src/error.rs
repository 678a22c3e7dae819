//! Routing errors.
//!
//! # Design Decisions
//! - 404 and 405 are not errors; they are `RouteResult` outcomes
//! - Errors raised while serving a request become a generic 500; the
//!   diagnostic only reaches the log

use axum::{
    body::Body,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use thiserror::Error;

/// Boxed error raised by application handlers.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Result alias used by every pipeline stage.
pub type Result<T, E = RouteError> = std::result::Result<T, E>;

/// Errors raised while building the route table or serving a request.
#[derive(Debug, Error)]
pub enum RouteError {
    /// The matched route's handler could not be turned into something invocable.
    #[error("route handler is not a middleware, handler or callable, got {found}")]
    UnresolvableHandler { found: String },

    /// The matching engine rejected a route pattern at build time.
    #[error("route pattern `{path}` conflicts with an existing route")]
    Conflict {
        path: String,
        #[source]
        source: matchit::InsertError,
    },

    /// Every stage forwarded and no terminal handler was configured.
    #[error("pipeline exhausted without producing a response")]
    PipelineExhausted,

    /// An application handler failed.
    #[error("handler failed: {0}")]
    Handler(#[source] BoxError),
}

impl RouteError {
    pub fn handler(err: impl Into<BoxError>) -> Self {
        Self::Handler(err.into())
    }

    pub(crate) fn unresolvable(found: impl Into<String>) -> Self {
        Self::UnresolvableHandler {
            found: found.into(),
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        tracing::error!(error = %self, "Request failed inside the routing pipeline");
        let mut response = Response::new(Body::from("Internal Server Error"));
        *response.status_mut() = StatusCode::INTERNAL_SERVER_ERROR;
        response
    }
}
