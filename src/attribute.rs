//! Declarative route metadata.
//!
//! Handler classes carry an optional [`Group`] and, per method, any number of
//! [`RouteAttribute`]s. The loader turns these records into routes; how the
//! records are produced (manifests, explicit registration) does not matter.

use axum::http::Method;

/// Verbs covered by [`RouteAttribute::any`].
pub const ANY_METHODS: [Method; 7] = [
    Method::GET,
    Method::POST,
    Method::PUT,
    Method::PATCH,
    Method::DELETE,
    Method::HEAD,
    Method::OPTIONS,
];

/// Per-method route declaration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RouteAttribute {
    pub path: String,
    pub methods: Vec<Method>,
    pub name: Option<String>,
    pub priority: Option<i32>,
}

impl RouteAttribute {
    /// Route for an explicit method list; an empty list means `GET`.
    pub fn route(path: impl Into<String>, methods: impl IntoIterator<Item = Method>) -> Self {
        let mut methods: Vec<Method> = methods.into_iter().collect();
        if methods.is_empty() {
            methods.push(Method::GET);
        }
        Self {
            path: path.into(),
            methods,
            name: None,
            priority: None,
        }
    }

    pub fn get(path: impl Into<String>) -> Self {
        Self::route(path, [Method::GET])
    }

    pub fn post(path: impl Into<String>) -> Self {
        Self::route(path, [Method::POST])
    }

    pub fn put(path: impl Into<String>) -> Self {
        Self::route(path, [Method::PUT])
    }

    pub fn patch(path: impl Into<String>) -> Self {
        Self::route(path, [Method::PATCH])
    }

    pub fn delete(path: impl Into<String>) -> Self {
        Self::route(path, [Method::DELETE])
    }

    pub fn any(path: impl Into<String>) -> Self {
        Self::route(path, ANY_METHODS)
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// Class-level path prefix and base priority.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Group {
    pub path: String,
    pub priority: Option<i32>,
}

impl Group {
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            priority: None,
        }
    }

    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }
}

/// A method on a handler class and its route declarations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerMethod {
    pub name: String,
    pub routes: Vec<RouteAttribute>,
}

/// A handler class as seen by the loader.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HandlerClass {
    pub id: String,
    /// Only the first group applies.
    pub groups: Vec<Group>,
    pub methods: Vec<HandlerMethod>,
}

impl HandlerClass {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            groups: Vec::new(),
            methods: Vec::new(),
        }
    }

    pub fn group(mut self, group: Group) -> Self {
        self.groups.push(group);
        self
    }

    pub fn method(
        mut self,
        name: impl Into<String>,
        routes: impl IntoIterator<Item = RouteAttribute>,
    ) -> Self {
        self.methods.push(HandlerMethod {
            name: name.into(),
            routes: routes.into_iter().collect(),
        });
        self
    }

    /// The group in effect for this class.
    pub fn effective_group(&self) -> Option<&Group> {
        self.groups.first()
    }
}
