//! Dependency lookup for string and class-method route handlers.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use crate::http::handler::{Callable, Handler, Middleware};

/// Object exposing named actions; what a (class, method) handler binds to.
pub trait Controller: Send + Sync {
    fn action(&self, name: &str) -> Option<Callable>;
}

/// Instance a container resolves an identifier to.
#[derive(Clone)]
pub enum Service {
    Handler(Arc<dyn Handler>),
    Middleware(Arc<dyn Middleware>),
    Callable(Callable),
    Controller(Arc<dyn Controller>),
}

impl Service {
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Handler(_) => "handler",
            Self::Middleware(_) => "middleware",
            Self::Callable(_) => "callable",
            Self::Controller(_) => "controller",
        }
    }
}

impl fmt::Debug for Service {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Service::{}(..)", self.kind())
    }
}

pub trait Container: Send + Sync {
    fn has(&self, id: &str) -> bool;
    fn get(&self, id: &str) -> Option<Service>;
}

impl<T: Container + ?Sized> Container for Arc<T> {
    fn has(&self, id: &str) -> bool {
        (**self).has(id)
    }

    fn get(&self, id: &str) -> Option<Service> {
        (**self).get(id)
    }
}

/// Map-backed container.
#[derive(Debug, Clone, Default)]
pub struct ServiceContainer {
    services: HashMap<String, Service>,
}

impl ServiceContainer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, id: impl Into<String>, service: Service) {
        self.services.insert(id.into(), service);
    }

    pub fn with(mut self, id: impl Into<String>, service: Service) -> Self {
        self.register(id, service);
        self
    }

    pub fn len(&self) -> usize {
        self.services.len()
    }

    pub fn is_empty(&self) -> bool {
        self.services.is_empty()
    }
}

impl Container for ServiceContainer {
    fn has(&self, id: &str) -> bool {
        self.services.contains_key(id)
    }

    fn get(&self, id: &str) -> Option<Service> {
        self.services.get(id).cloned()
    }
}

/// Controller backed by a map of named callables.
#[derive(Clone, Default)]
pub struct Actions {
    actions: HashMap<String, Callable>,
}

impl Actions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_action(mut self, name: impl Into<String>, callable: Callable) -> Self {
        self.actions.insert(name.into(), callable);
        self
    }
}

impl Controller for Actions {
    fn action(&self, name: &str) -> Option<Callable> {
        self.actions.get(name).cloned()
    }
}
