//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, timeout and trace layers)
//!     → handler.rs (Pipeline as the fallback tower service)
//!     → middleware/ (resolve, negotiate, dispatch, not-found)
//!     → response.rs (canned responses, Allow header)
//!     → Send to client
//! ```

pub mod context;
pub mod handler;
pub mod middleware;
pub mod response;
pub mod server;

pub use context::{AttributeKey, RequestExt, RouteAttributes};
pub use handler::{callable, Callable, Handler, Middleware, Pipeline, PipelineBuilder, PipelineService};
pub use response::{EmptyResponseFactory, FixedResponse, ResponseFactory, ResponseSource};
pub use server::{build_pipeline, HttpServer};
