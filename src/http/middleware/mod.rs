//! Routing pipeline stages.
//!
//! # Data Flow
//! ```text
//! Request
//!     → RouteResolver     (attach RouteResult, always forwards)
//!     → ImplicitHead      (HEAD on a GET-only path: run GET, drop body)
//!     → ImplicitOptions   (OPTIONS on a method failure: answer with Allow)
//!     → MethodNotAllowed  (any method failure: 405 with Allow)
//!     → RouteDispatcher   (invoke the matched route's handler)
//!     → NotFound          (whatever is left)
//! ```
//!
//! # Design Decisions
//! - Every stage reads the result through its own `AttributeKey`; a
//!   pipeline's stages must all be built with the same key
//! - Negotiation stages are independent and may be wired in any order
//! - Stages hold no per-request state

pub mod dispatch;
pub mod implicit_head;
pub mod implicit_options;
pub mod method_not_allowed;
pub mod not_found;
pub mod router;

pub use dispatch::RouteDispatcher;
pub use implicit_head::ImplicitHead;
pub use implicit_options::ImplicitOptions;
pub use method_not_allowed::MethodNotAllowed;
pub use not_found::NotFound;
pub use router::RouteResolver;

use std::borrow::Cow;

use axum::http::Request;

use crate::routing::decode_path;

/// Decoded path component of the request URI, as the route table expects it.
pub(crate) fn request_path<B>(request: &Request<B>) -> Cow<'_, str> {
    decode_path(request.uri().path())
}
