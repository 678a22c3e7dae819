//! Route table builder.
//!
//! # Data Flow
//! ```text
//! ClassSource::candidates()
//!     → ClassSource::load()      (None = not a handler class, skipped)
//!     → first Group + per-method RouteAttributes
//!     → compose path / name / priority
//!     → stable sort by priority
//!     → RouteCollector::add_route (in sorted order)
//! ```
//!
//! # Design Decisions
//! - Discovery order is the source's candidate order, then method and
//!   attribute declaration order; equal priorities keep it
//! - The default name uses the scan root, not the composed path, so fallback
//!   names survive moving classes between groups
//! - Each route's handler is the class identifier, resolved by the container
//!   when the route is invoked

pub mod manifest;

use std::sync::Arc;

use tracing::{debug, info};

use crate::attribute::HandlerClass;
use crate::error::Result;
use crate::routing::{dedup_methods, Route, RouteCollector, RouteHandler, RouteTable};

pub use crate::routing::compose_path;

pub use manifest::ManifestSource;

/// Supplies the handler-class universe.
pub trait ClassSource {
    /// Candidate identifiers, in discovery order.
    fn candidates(&self) -> Vec<String>;

    /// Resolve a candidate; `None` means it is not a loadable class.
    fn load(&self, candidate: &str) -> Option<HandlerClass>;
}

/// In-memory class universe.
#[derive(Debug, Clone, Default)]
pub struct StaticClasses {
    classes: Vec<HandlerClass>,
}

impl StaticClasses {
    pub fn new(classes: impl IntoIterator<Item = HandlerClass>) -> Self {
        Self {
            classes: classes.into_iter().collect(),
        }
    }
}

impl ClassSource for StaticClasses {
    fn candidates(&self) -> Vec<String> {
        self.classes.iter().map(|c| c.id.clone()).collect()
    }

    fn load(&self, candidate: &str) -> Option<HandlerClass> {
        self.classes.iter().find(|c| c.id == candidate).cloned()
    }
}

/// Builds the priority-ordered route list from attribute records.
#[derive(Debug, Clone)]
pub struct AttributeRouteLoader {
    scan_root: String,
}

impl AttributeRouteLoader {
    pub fn new(scan_root: impl Into<String>) -> Self {
        let scan_root: String = scan_root.into();
        Self {
            scan_root: scan_root.trim_end_matches(['/', '\\']).to_string(),
        }
    }

    pub fn scan_root(&self) -> &str {
        &self.scan_root
    }

    /// Discover and sort routes without registering them.
    pub fn collect(&self, source: &dyn ClassSource) -> Vec<Arc<Route>> {
        let mut routes = Vec::new();
        for candidate in source.candidates() {
            let Some(class) = source.load(&candidate) else {
                debug!(candidate = %candidate, "Skipping candidate that is not a handler class");
                continue;
            };
            routes.extend(self.class_routes(&class));
        }

        // stable: equal priorities keep discovery order
        routes.sort_by_key(Route::priority);
        routes.into_iter().map(Arc::new).collect()
    }

    /// Discover, sort, and register every route with `collector`.
    pub fn load<C: RouteCollector>(
        &self,
        source: &dyn ClassSource,
        collector: &mut C,
    ) -> Result<Vec<Arc<Route>>> {
        let routes = self.collect(source);
        for route in &routes {
            collector.add_route(route.methods(), route.path(), Arc::clone(route))?;
        }
        info!(routes = routes.len(), scan_root = %self.scan_root, "Attribute routes loaded");
        Ok(routes)
    }

    /// Convenience: load into a fresh [`RouteTable`].
    pub fn build_table(&self, source: &dyn ClassSource) -> Result<RouteTable> {
        let mut table = RouteTable::new();
        self.load(source, &mut table)?;
        Ok(table)
    }

    fn class_routes(&self, class: &HandlerClass) -> Vec<Route> {
        let (prefix, base_priority) = match class.effective_group() {
            Some(group) => (group.path.as_str(), group.priority.unwrap_or(0)),
            None => ("", 0),
        };

        let mut routes = Vec::new();
        for method in &class.methods {
            for attribute in &method.routes {
                let path = compose_path(prefix, &attribute.path);
                let methods = dedup_methods(attribute.methods.iter().cloned());
                let name = attribute
                    .name
                    .clone()
                    .filter(|name| !name.is_empty())
                    .unwrap_or_else(|| Route::default_name(&methods, &self.scan_root));
                let priority = base_priority + attribute.priority.unwrap_or(0);

                routes.push(
                    Route::builder(
                        methods,
                        path,
                        RouteHandler::service(class.id.clone()),
                    )
                    .name(name)
                    .priority(priority)
                    .build(),
                );
            }
        }
        routes
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::attribute::{Group, RouteAttribute};
    use crate::routing::{Dispatch, Dispatcher};
    use axum::http::Method;

    fn user_controller() -> HandlerClass {
        HandlerClass::new("app.UserController")
            .group(Group::new("api").with_priority(5))
            .method(
                "index",
                [RouteAttribute::get("users").with_name("users.index").with_priority(1)],
            )
            .method(
                "store",
                [RouteAttribute::post("users").with_name("users.store").with_priority(2)],
            )
    }

    #[test]
    fn test_compose_path() {
        assert_eq!(compose_path("api/", "/users"), "/api/users");
        assert_eq!(compose_path("", "/"), "/");
        assert_eq!(compose_path("/", ""), "/");
        assert_eq!(compose_path("//api//v1/", "users//{id}/"), "/api/v1/users/{id}");
        assert_eq!(compose_path("", "health"), "/health");
    }

    #[test]
    fn test_group_path_and_priority() {
        let loader = AttributeRouteLoader::new("/srv/handlers/");
        let routes = loader.collect(&StaticClasses::new([user_controller()]));

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].path(), "/api/users");
        assert_eq!(routes[0].name(), "users.index");
        assert_eq!(routes[0].priority(), 6);
        assert_eq!(routes[1].methods(), &[Method::POST]);
        assert_eq!(routes[1].priority(), 7);
        assert_eq!(routes[1].handler().to_string(), "app.UserController");
    }

    #[test]
    fn test_default_name_uses_scan_root() {
        let class = HandlerClass::new("app.Health").method("show", [RouteAttribute::get("/health")]);
        let loader = AttributeRouteLoader::new("/srv/handlers/");
        let routes = loader.collect(&StaticClasses::new([class]));

        assert_eq!(routes[0].name(), "GET^/srv/handlers");
        assert_eq!(routes[0].path(), "/health");
    }

    #[test]
    fn test_sort_is_stable_for_equal_priorities() {
        let first = HandlerClass::new("A")
            .method("a1", [RouteAttribute::get("/a1")])
            .method("a2", [RouteAttribute::get("/a2").with_priority(-1)]);
        let second = HandlerClass::new("B").method(
            "b",
            [RouteAttribute::get("/b1"), RouteAttribute::get("/b2")],
        );

        let routes = AttributeRouteLoader::new("root").collect(&StaticClasses::new([first, second]));
        let paths: Vec<_> = routes.iter().map(|r| r.path()).collect();
        assert_eq!(paths, vec!["/a2", "/a1", "/b1", "/b2"]);
    }

    #[test]
    fn test_default_name_lists_each_method_once() {
        let class = HandlerClass::new("app.Dup")
            .method("x", [RouteAttribute::route("x", [Method::GET, Method::POST, Method::GET])]);
        let routes = AttributeRouteLoader::new("root").collect(&StaticClasses::new([class]));

        assert_eq!(routes[0].methods(), &[Method::GET, Method::POST]);
        assert_eq!(routes[0].name(), "GET:POST^root");
    }

    #[test]
    fn test_only_first_group_applies() {
        let class = HandlerClass::new("C")
            .group(Group::new("v1").with_priority(10))
            .group(Group::new("v2").with_priority(20))
            .method("m", [RouteAttribute::get("x")]);
        let routes = AttributeRouteLoader::new("root").collect(&StaticClasses::new([class]));
        assert_eq!(routes[0].path(), "/v1/x");
        assert_eq!(routes[0].priority(), 10);
    }

    #[test]
    fn test_class_without_routes_contributes_nothing() {
        let class = HandlerClass::new("Empty").method("index", []);
        let table = AttributeRouteLoader::new("root")
            .build_table(&StaticClasses::new([class]))
            .unwrap();
        assert!(table.is_empty());
    }

    #[test]
    fn test_unloadable_candidate_is_skipped() {
        struct Gappy;
        impl ClassSource for Gappy {
            fn candidates(&self) -> Vec<String> {
                vec!["Missing".into(), "Present".into()]
            }
            fn load(&self, candidate: &str) -> Option<HandlerClass> {
                (candidate == "Present")
                    .then(|| HandlerClass::new("Present").method("m", [RouteAttribute::get("/p")]))
            }
        }

        let routes = AttributeRouteLoader::new("root").collect(&Gappy);
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].handler().to_string(), "Present");
    }

    #[test]
    fn test_lower_priority_registers_first_and_wins() {
        let late = HandlerClass::new("Late").method("m", [RouteAttribute::get("/same").with_priority(5)]);
        let early = HandlerClass::new("Early").method("m", [RouteAttribute::get("/same")]);

        let table = AttributeRouteLoader::new("root")
            .build_table(&StaticClasses::new([late, early]))
            .unwrap();
        match table.dispatch(&Method::GET, "/same") {
            Dispatch::Found(route, _) => assert_eq!(route.handler().to_string(), "Early"),
            other => panic!("expected Found, got {:?}", other),
        }
    }
}
