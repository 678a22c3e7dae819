//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route Compilation (at startup):
//!     HandlerClass[] (attribute records)
//!     → loader (compose paths, priorities, names)
//!     → Sort by priority (stable)
//!     → RouteTable::add_route (matchit)
//!     → Freeze as immutable Arc<RouteTable>
//!
//! Incoming Request (method, path):
//!     → decode_path
//!     → Dispatcher::dispatch
//!     → Dispatch::{Found, MethodNotAllowed, NotFound}
//!     → RouteResult (attached to the request)
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Deterministic: same input always matches same route
//! - Lower priority value registers first

pub mod dispatcher;
pub mod result;
pub mod route;
pub mod router;

pub use dispatcher::{decode_path, Dispatch, Dispatcher, RouteCollector};
pub use result::{Params, RouteResult};
pub use route::{compose_path, dedup_methods, Route, RouteBuilder, RouteHandler};
pub use router::RouteTable;
