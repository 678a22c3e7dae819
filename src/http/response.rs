//! Response construction for the negotiation stages.
//!
//! # Responsibilities
//! - Reusable canned responses (`FixedResponse`)
//! - The three ways a stage can be told what to answer (`ResponseSource`)
//! - `Allow` header formatting and HEAD body stripping

use std::fmt;
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
    body::{Body, Bytes},
    http::{header, HeaderMap, HeaderName, HeaderValue, Method, Request, StatusCode},
    response::Response,
};
use tracing::warn;

use super::handler::{callable, Callable, Handler};
use crate::error::Result;

/// Response template that can be served any number of times.
#[derive(Debug, Clone)]
pub struct FixedResponse {
    status: StatusCode,
    headers: HeaderMap,
    body: Bytes,
}

impl FixedResponse {
    pub fn new(status: StatusCode) -> Self {
        Self {
            status,
            headers: HeaderMap::new(),
            body: Bytes::new(),
        }
    }

    pub fn with_header(mut self, name: HeaderName, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    pub fn with_body(mut self, body: impl Into<Bytes>) -> Self {
        self.body = body.into();
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn to_response(&self) -> Response {
        let mut response = Response::new(Body::from(self.body.clone()));
        *response.status_mut() = self.status;
        *response.headers_mut() = self.headers.clone();
        response
    }
}

impl From<StatusCode> for FixedResponse {
    fn from(status: StatusCode) -> Self {
        Self::new(status)
    }
}

#[async_trait]
impl Handler for FixedResponse {
    async fn handle(&self, _request: Request<Body>) -> Result<Response> {
        Ok(self.to_response())
    }
}

/// Creates fresh responses for a given status.
pub trait ResponseFactory: Send + Sync {
    fn create_response(&self, status: StatusCode) -> Response;
}

impl<F> ResponseFactory for F
where
    F: Fn(StatusCode) -> Response + Send + Sync,
{
    fn create_response(&self, status: StatusCode) -> Response {
        self(status)
    }
}

/// Factory producing an empty body with the requested status.
#[derive(Debug, Clone, Copy, Default)]
pub struct EmptyResponseFactory;

impl ResponseFactory for EmptyResponseFactory {
    fn create_response(&self, status: StatusCode) -> Response {
        let mut response = Response::new(Body::empty());
        *response.status_mut() = status;
        response
    }
}

/// What a terminal stage answers with.
#[derive(Clone)]
pub enum ResponseSource {
    /// Served as-is; the stage's status is ignored.
    Fixed(FixedResponse),
    /// Invoked with the stage's status.
    Factory(Arc<dyn ResponseFactory>),
    /// Receives the request and the remaining chain.
    Callback(Callable),
}

impl ResponseSource {
    pub fn fixed(response: impl Into<FixedResponse>) -> Self {
        Self::Fixed(response.into())
    }

    pub fn factory(factory: impl ResponseFactory + 'static) -> Self {
        Self::Factory(Arc::new(factory))
    }

    pub fn callback<F, Fut>(f: F) -> Self
    where
        F: Fn(Request<Body>, Arc<dyn Handler>) -> Fut + Send + Sync + 'static,
        Fut: std::future::Future<Output = Result<Response>> + Send + 'static,
    {
        Self::Callback(callable(f))
    }

    pub(crate) async fn respond(
        &self,
        status: StatusCode,
        request: Request<Body>,
        next: Arc<dyn Handler>,
    ) -> Result<Response> {
        match self {
            Self::Fixed(response) => Ok(response.to_response()),
            Self::Factory(factory) => Ok(factory.create_response(status)),
            Self::Callback(callback) => callback(request, next).await,
        }
    }
}

impl fmt::Debug for ResponseSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(response) => f.debug_tuple("Fixed").field(response).finish(),
            Self::Factory(_) => f.write_str("Factory(..)"),
            Self::Callback(_) => f.write_str("Callback(..)"),
        }
    }
}

/// `GET, POST` style header value.
pub fn allow_value(methods: &[Method]) -> String {
    methods
        .iter()
        .map(Method::as_str)
        .collect::<Vec<_>>()
        .join(", ")
}

/// Set `Allow` on `response`, replacing any existing value.
pub(crate) fn set_allow(response: &mut Response, methods: &[Method]) {
    let value = allow_value(methods);
    match HeaderValue::from_str(&value) {
        Ok(value) => {
            response.headers_mut().insert(header::ALLOW, value);
        }
        Err(err) => warn!(allow = %value, error = %err, "Allow header value rejected"),
    }
}

/// Keep status and headers, drop the body.
pub(crate) fn strip_body(response: Response) -> Response {
    let (parts, _) = response.into_parts();
    Response::from_parts(parts, Body::empty())
}
