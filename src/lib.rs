//! HTTP route assembly and resolution negotiation.

pub mod attribute;
pub mod config;
pub mod container;
pub mod error;
pub mod http;
pub mod loader;
pub mod observability;
pub mod routing;

pub use config::schema::RouterConfig;
pub use container::{Container, Service, ServiceContainer};
pub use error::{Result, RouteError};
pub use http::{HttpServer, Pipeline};
pub use loader::{AttributeRouteLoader, ManifestSource};
pub use routing::{Route, RouteResult, RouteTable};
