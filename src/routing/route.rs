//! Route descriptor.
//!
//! # Design Decisions
//! - Immutable once built: fields are private and there are no setters
//! - `name` and `priority` are settled in `build()` and never recomputed
//! - Method tokens form an ordered set (duplicates dropped, first kept)

use std::fmt;
use std::sync::Arc;

use axum::http::Method;

use crate::http::handler::{Callable, Handler, Middleware};

/// What a route forwards to once matched.
#[derive(Clone)]
pub enum RouteHandler {
    /// Identifier resolved through the container at invocation time.
    Service(String),
    /// Class identifier resolved through the container, bound to an action.
    Method { class: String, method: String },
    /// Plain invocable.
    Callable(Callable),
    /// Pipeline stage that also receives the remaining chain.
    Middleware(Arc<dyn Middleware>),
    /// Terminal handler; the remaining chain is discarded.
    Handler(Arc<dyn Handler>),
}

impl RouteHandler {
    pub fn service(id: impl Into<String>) -> Self {
        Self::Service(id.into())
    }

    pub fn method(class: impl Into<String>, method: impl Into<String>) -> Self {
        Self::Method {
            class: class.into(),
            method: method.into(),
        }
    }

    pub fn middleware(middleware: impl Middleware + 'static) -> Self {
        Self::Middleware(Arc::new(middleware))
    }

    pub fn handler(handler: impl Handler + 'static) -> Self {
        Self::Handler(Arc::new(handler))
    }

    /// Short label used in diagnostics.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Service(_) => "service",
            Self::Method { .. } => "method",
            Self::Callable(_) => "callable",
            Self::Middleware(_) => "middleware",
            Self::Handler(_) => "handler",
        }
    }
}

impl From<&str> for RouteHandler {
    fn from(id: &str) -> Self {
        Self::Service(id.to_string())
    }
}

impl From<String> for RouteHandler {
    fn from(id: String) -> Self {
        Self::Service(id)
    }
}

impl From<Callable> for RouteHandler {
    fn from(callable: Callable) -> Self {
        Self::Callable(callable)
    }
}

impl fmt::Debug for RouteHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(id) => f.debug_tuple("Service").field(id).finish(),
            Self::Method { class, method } => f
                .debug_struct("Method")
                .field("class", class)
                .field("method", method)
                .finish(),
            other => write!(f, "{}(..)", other.kind()),
        }
    }
}

impl fmt::Display for RouteHandler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Service(id) => f.write_str(id),
            Self::Method { class, method } => write!(f, "{class}::{method}"),
            other => write!(f, "<{}>", other.kind()),
        }
    }
}

/// One (methods, path, handler, name, priority) mapping.
#[derive(Debug, Clone)]
pub struct Route {
    methods: Vec<Method>,
    path: String,
    handler: RouteHandler,
    name: String,
    priority: i32,
}

impl Route {
    /// Route with the default name and priority 0.
    pub fn new(
        methods: impl IntoIterator<Item = Method>,
        path: impl Into<String>,
        handler: impl Into<RouteHandler>,
    ) -> Self {
        Self::builder(methods, path, handler).build()
    }

    pub fn builder(
        methods: impl IntoIterator<Item = Method>,
        path: impl Into<String>,
        handler: impl Into<RouteHandler>,
    ) -> RouteBuilder {
        let path: String = path.into();
        RouteBuilder {
            methods: methods.into_iter().collect(),
            path: compose_path("", &path),
            handler: handler.into(),
            name: None,
            priority: None,
        }
    }

    /// `GET:POST^/users/{id}` style name.
    pub fn default_name(methods: &[Method], path: &str) -> String {
        let joined = methods
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>()
            .join(":");
        format!("{joined}^{path}")
    }

    pub fn methods(&self) -> &[Method] {
        &self.methods
    }

    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn handler(&self) -> &RouteHandler {
        &self.handler
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Lower value wins.
    pub fn priority(&self) -> i32 {
        self.priority
    }
}

pub struct RouteBuilder {
    methods: Vec<Method>,
    path: String,
    handler: RouteHandler,
    name: Option<String>,
    priority: Option<i32>,
}

impl RouteBuilder {
    /// Explicit name. An empty string keeps the default.
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    pub fn build(self) -> Route {
        let methods = dedup_methods(self.methods);
        debug_assert!(!methods.is_empty(), "a route needs at least one method");

        let name = match self.name {
            Some(name) if !name.is_empty() => name,
            _ => Route::default_name(&methods, &self.path),
        };

        Route {
            methods,
            name,
            path: self.path,
            handler: self.handler,
            priority: self.priority.unwrap_or(0),
        }
    }
}

/// Keep the first occurrence of each method.
pub fn dedup_methods(methods: impl IntoIterator<Item = Method>) -> Vec<Method> {
    let mut unique: Vec<Method> = Vec::new();
    for method in methods {
        if !unique.contains(&method) {
            unique.push(method);
        }
    }
    unique
}

/// Join a group prefix and a route path into `/a/b` form with no empty
/// segments and no trailing slash.
pub fn compose_path(prefix: &str, path: &str) -> String {
    let segments: Vec<&str> = prefix
        .split('/')
        .chain(path.split('/'))
        .filter(|segment| !segment.is_empty())
        .collect();
    format!("/{}", segments.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_name_single_method() {
        let route = Route::new([Method::GET], "/test", "H");
        assert_eq!(route.name(), "GET^/test");
        assert_eq!(route.priority(), 0);
    }

    #[test]
    fn test_default_name_multiple_methods() {
        let route = Route::new([Method::GET, Method::POST], "/users/{id}", "H");
        assert_eq!(route.name(), "GET:POST^/users/{id}");
    }

    #[test]
    fn test_explicit_name_and_priority() {
        let route = Route::builder([Method::DELETE], "/users/{id}", "H")
            .name("users.delete")
            .priority(-3)
            .build();
        assert_eq!(route.name(), "users.delete");
        assert_eq!(route.priority(), -3);
    }

    #[test]
    fn test_empty_name_falls_back_to_default() {
        let route = Route::builder([Method::PUT], "/a", "H").name("").build();
        assert_eq!(route.name(), "PUT^/a");
    }

    #[test]
    fn test_methods_are_an_ordered_set() {
        let route = Route::new([Method::POST, Method::GET, Method::POST], "/x", "H");
        assert_eq!(route.methods(), &[Method::POST, Method::GET]);
    }

    #[test]
    fn test_path_is_normalized() {
        let route = Route::new([Method::GET], "users/", "H");
        assert_eq!(route.path(), "/users");
        assert_eq!(route.name(), "GET^/users");

        assert_eq!(Route::new([Method::GET], "//a//{id}/", "H").path(), "/a/{id}");
        assert_eq!(Route::new([Method::GET], "", "H").path(), "/");
    }

    #[test]
    fn test_handler_display() {
        assert_eq!(RouteHandler::service("UserController").to_string(), "UserController");
        assert_eq!(RouteHandler::method("Users", "show").to_string(), "Users::show");
        assert_eq!(RouteHandler::method("Users", "show").kind(), "method");
    }
}
