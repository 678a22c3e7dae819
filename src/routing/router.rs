//! Route table: the bundled matching engine.
//!
//! # Responsibilities
//! - Store registered routes in registration order
//! - Look up (method, path) and report found / method-not-allowed / not-found
//!
//! # Design Decisions
//! - One `matchit` tree per method; a lookup only consults the requested
//!   method's tree, so a static pattern registered for another method never
//!   hides a parameterised one registered for this method
//! - Immutable after the build (shared via `Arc`, no locks on lookup)
//! - First registration of a (method, pattern) pair wins; later duplicates
//!   are logged and ignored
//! - Allowed methods are reported in the order each method was first
//!   registered
//! - HEAD is never derived from GET here

use std::collections::HashMap;
use std::sync::Arc;

use axum::http::Method;
use tracing::{debug, warn};

use super::dispatcher::{Dispatch, Dispatcher, RouteCollector};
use super::result::Params;
use super::route::Route;
use crate::error::{Result, RouteError};

/// Every pattern registered for one method.
#[derive(Debug)]
struct MethodTable {
    method: Method,
    matcher: matchit::Router<Arc<Route>>,
    patterns: HashMap<String, Arc<Route>>,
}

impl MethodTable {
    fn new(method: Method) -> Self {
        Self {
            method,
            matcher: matchit::Router::new(),
            patterns: HashMap::new(),
        }
    }

    fn insert(&mut self, path: &str, route: &Arc<Route>) -> Result<()> {
        if let Some(kept) = self.patterns.get(path) {
            warn!(
                method = %self.method,
                path = %path,
                kept = %kept.name(),
                ignored = %route.name(),
                "Duplicate route registration ignored"
            );
            return Ok(());
        }

        self.matcher
            .insert(path, Arc::clone(route))
            .map_err(|source| RouteError::Conflict {
                path: path.to_string(),
                source,
            })?;
        self.patterns.insert(path.to_string(), Arc::clone(route));
        Ok(())
    }
}

/// Matching engine backed by per-method radix trees.
#[derive(Debug, Default)]
pub struct RouteTable {
    tables: Vec<MethodTable>,
    routes: Vec<Arc<Route>>,
}

impl RouteTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every route, in registration order.
    pub fn routes(&self) -> &[Arc<Route>] {
        &self.routes
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    fn table_mut(&mut self, method: &Method) -> &mut MethodTable {
        let index = match self.tables.iter().position(|t| &t.method == method) {
            Some(index) => index,
            None => {
                self.tables.push(MethodTable::new(method.clone()));
                self.tables.len() - 1
            }
        };
        &mut self.tables[index]
    }
}

impl RouteCollector for RouteTable {
    fn add_route(&mut self, methods: &[Method], path: &str, route: Arc<Route>) -> Result<()> {
        for method in methods {
            self.table_mut(method).insert(path, &route)?;
        }

        debug!(name = %route.name(), path = %path, priority = route.priority(), "Route registered");
        self.routes.push(route);
        Ok(())
    }
}

impl Dispatcher for RouteTable {
    fn dispatch(&self, method: &Method, path: &str) -> Dispatch {
        if let Some(table) = self.tables.iter().find(|t| &t.method == method) {
            if let Ok(matched) = table.matcher.at(path) {
                let params: Params = matched
                    .params
                    .iter()
                    .map(|(key, value)| (key.to_string(), value.to_string()))
                    .collect();
                return Dispatch::Found(Arc::clone(matched.value), params);
            }
        }

        let allowed: Vec<Method> = self
            .tables
            .iter()
            .filter(|t| &t.method != method && t.matcher.at(path).is_ok())
            .map(|t| t.method.clone())
            .collect();

        if allowed.is_empty() {
            Dispatch::NotFound
        } else {
            Dispatch::MethodNotAllowed(allowed)
        }
    }
}
