//! Matching engine contract.
//!
//! # Responsibilities
//! - `RouteCollector`: accept routes at build time
//! - `Dispatcher`: answer (method, path) lookups at request time
//!
//! # Design Decisions
//! - Exactly three outcomes, as a closed enum; there is no "unknown" case
//! - The engine is shared read-only after the build, so `Dispatcher` takes `&self`

use std::borrow::Cow;
use std::sync::Arc;

use axum::http::Method;

use super::result::Params;
use super::route::Route;
use crate::error::Result;

/// Outcome of a lookup.
#[derive(Debug, Clone)]
pub enum Dispatch {
    NotFound,
    /// The path exists; these methods are registered for it.
    MethodNotAllowed(Vec<Method>),
    Found(Arc<Route>, Params),
}

/// Build-time side of the engine.
pub trait RouteCollector {
    fn add_route(&mut self, methods: &[Method], path: &str, route: Arc<Route>) -> Result<()>;
}

/// Request-time side of the engine.
pub trait Dispatcher: Send + Sync {
    fn dispatch(&self, method: &Method, path: &str) -> Dispatch;
}

impl<T: Dispatcher + ?Sized> Dispatcher for Arc<T> {
    fn dispatch(&self, method: &Method, path: &str) -> Dispatch {
        (**self).dispatch(method, path)
    }
}

/// Percent-decode a URI path before lookup (`%20` becomes a space; `+` is
/// left alone). Invalid UTF-8 sequences are replaced rather than rejected.
pub fn decode_path(path: &str) -> Cow<'_, str> {
    match urlencoding::decode_binary(path.as_bytes()) {
        Cow::Borrowed(_) => Cow::Borrowed(path),
        Cow::Owned(bytes) => Cow::Owned(String::from_utf8_lossy(&bytes).into_owned()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("/hello%20world"), "/hello world");
        assert_eq!(decode_path("/a+b"), "/a+b");
        assert_eq!(decode_path("/plain"), "/plain");
        assert_eq!(decode_path("/caf%C3%A9"), "/café");
    }
}
