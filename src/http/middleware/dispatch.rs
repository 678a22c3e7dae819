//! Handler invocation stage.
//!
//! # Responsibilities
//! - Read the attached `RouteResult`; forward untouched when there is none or
//!   when it is a failure
//! - Resolve string and (class, method) handlers through the container
//! - Invoke the resolved target exactly once
//!
//! # Design Decisions
//! - Precedence: middleware, then terminal handler, then plain callable
//! - Anything else is an `UnresolvableHandler` error raised at invocation
//!   time, never at build time

use std::sync::Arc;

use async_trait::async_trait;
use axum::{body::Body, http::Request, response::Response};
use tracing::debug;

use crate::container::{Container, Service};
use crate::error::{Result, RouteError};
use crate::http::context::{AttributeKey, RequestExt};
use crate::http::handler::{Callable, Handler, Middleware};
use crate::routing::RouteHandler;

/// A handler reference after container substitution.
enum Target {
    Middleware(Arc<dyn Middleware>),
    Handler(Arc<dyn Handler>),
    Callable(Callable),
}

/// Invokes the matched route's handler.
pub struct RouteDispatcher {
    container: Arc<dyn Container>,
    attribute: AttributeKey,
}

impl RouteDispatcher {
    pub fn new(container: Arc<dyn Container>) -> Self {
        Self {
            container,
            attribute: AttributeKey::DEFAULT,
        }
    }

    pub fn with_attribute(mut self, attribute: impl Into<AttributeKey>) -> Self {
        self.attribute = attribute.into();
        self
    }

    fn resolve(&self, handler: &RouteHandler) -> Result<Target> {
        match handler {
            RouteHandler::Service(id) => {
                if !self.container.has(id) {
                    return Err(RouteError::unresolvable(format!("unregistered service `{id}`")));
                }
                match self.container.get(id) {
                    Some(Service::Middleware(middleware)) => Ok(Target::Middleware(middleware)),
                    Some(Service::Handler(handler)) => Ok(Target::Handler(handler)),
                    Some(Service::Callable(callable)) => Ok(Target::Callable(callable)),
                    Some(Service::Controller(_)) => {
                        Err(RouteError::unresolvable(format!("controller `{id}` without an action")))
                    }
                    None => Err(RouteError::unresolvable(format!("unregistered service `{id}`"))),
                }
            }
            RouteHandler::Method { class, method } => match self.container.get(class) {
                Some(Service::Controller(controller)) => controller
                    .action(method)
                    .map(Target::Callable)
                    .ok_or_else(|| {
                        RouteError::unresolvable(format!("controller `{class}` has no action `{method}`"))
                    }),
                Some(other) => Err(RouteError::unresolvable(format!(
                    "{} `{class}` bound to action `{method}`",
                    other.kind()
                ))),
                None => Err(RouteError::unresolvable(format!("unregistered service `{class}`"))),
            },
            RouteHandler::Callable(callable) => Ok(Target::Callable(Arc::clone(callable))),
            RouteHandler::Middleware(middleware) => Ok(Target::Middleware(Arc::clone(middleware))),
            RouteHandler::Handler(handler) => Ok(Target::Handler(Arc::clone(handler))),
        }
    }
}

#[async_trait]
impl Middleware for RouteDispatcher {
    async fn process(&self, request: Request<Body>, next: Arc<dyn Handler>) -> Result<Response> {
        let Some(result) = request.route_result(&self.attribute) else {
            return next.handle(request).await;
        };
        let Some(route) = result.route() else {
            return next.handle(request).await;
        };

        debug!(route = %route.name(), handler = %route.handler(), "Dispatching to route handler");

        match self.resolve(route.handler())? {
            Target::Middleware(middleware) => middleware.process(request, next).await,
            Target::Handler(handler) => handler.handle(request).await,
            Target::Callable(callable) => callable(request, next).await,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Actions, ServiceContainer};
    use crate::http::handler::callable;
    use crate::http::response::FixedResponse;
    use crate::routing::{Params, Route, RouteResult};
    use axum::http::{Method, StatusCode};

    /// Marks responses that reached the rest of the chain.
    struct Downstream;

    #[async_trait]
    impl Handler for Downstream {
        async fn handle(&self, _request: Request<Body>) -> Result<Response> {
            Ok(FixedResponse::new(StatusCode::IM_A_TEAPOT).to_response())
        }
    }

    struct PassThrough;

    #[async_trait]
    impl Middleware for PassThrough {
        async fn process(&self, request: Request<Body>, next: Arc<dyn Handler>) -> Result<Response> {
            next.handle(request).await
        }
    }

    fn routed(handler: RouteHandler) -> Request<Body> {
        let route = Arc::new(Route::new([Method::GET], "/test", handler));
        let mut request = Request::new(Body::empty());
        request.set_route_result(
            AttributeKey::DEFAULT,
            RouteResult::from_route_success(route, Params::new()),
        );
        request
    }

    async fn dispatch(container: ServiceContainer, request: Request<Body>) -> Result<Response> {
        RouteDispatcher::new(Arc::new(container))
            .process(request, Arc::new(Downstream))
            .await
    }

    #[tokio::test]
    async fn test_no_result_forwards() {
        let response = dispatch(ServiceContainer::new(), Request::new(Body::empty()))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_failed_result_forwards() {
        let mut request = Request::new(Body::empty());
        request.set_route_result(AttributeKey::DEFAULT, RouteResult::from_route_failure(vec![Method::POST]));
        let response = dispatch(ServiceContainer::new(), request).await.unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_service_resolved_to_handler() {
        let container = ServiceContainer::new().with(
            "UserController",
            Service::Handler(Arc::new(FixedResponse::new(StatusCode::OK))),
        );
        let response = dispatch(container, routed("UserController".into())).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    #[tokio::test]
    async fn test_service_resolved_to_middleware_gets_chain() {
        let container = ServiceContainer::new().with("Pass", Service::Middleware(Arc::new(PassThrough)));
        let response = dispatch(container, routed("Pass".into())).await.unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }

    #[tokio::test]
    async fn test_unknown_service_fails_at_invocation() {
        let err = dispatch(ServiceContainer::new(), routed("Missing".into()))
            .await
            .unwrap_err();
        match err {
            RouteError::UnresolvableHandler { found } => assert!(found.contains("Missing")),
            other => panic!("expected UnresolvableHandler, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_callable_handler() {
        let handler = RouteHandler::Callable(callable(|_request, _next| async {
            Ok(FixedResponse::new(StatusCode::CREATED).to_response())
        }));
        let response = dispatch(ServiceContainer::new(), routed(handler)).await.unwrap();
        assert_eq!(response.status(), StatusCode::CREATED);
    }

    #[tokio::test]
    async fn test_inline_handler_discards_chain() {
        let handler = RouteHandler::handler(FixedResponse::new(StatusCode::ACCEPTED));
        let response = dispatch(ServiceContainer::new(), routed(handler)).await.unwrap();
        assert_eq!(response.status(), StatusCode::ACCEPTED);
    }

    #[tokio::test]
    async fn test_class_method_pair() {
        let actions = Actions::new().with_action(
            "show",
            callable(|_request, _next| async { Ok(FixedResponse::new(StatusCode::OK).to_response()) }),
        );
        let container = ServiceContainer::new().with("Users", Service::Controller(Arc::new(actions)));

        let response = dispatch(container.clone(), routed(RouteHandler::method("Users", "show")))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let err = dispatch(container, routed(RouteHandler::method("Users", "destroy")))
            .await
            .unwrap_err();
        assert!(matches!(err, RouteError::UnresolvableHandler { .. }));
    }

    #[tokio::test]
    async fn test_controller_without_action_is_unresolvable() {
        let container = ServiceContainer::new().with("Users", Service::Controller(Arc::new(Actions::new())));
        let err = dispatch(container, routed("Users".into())).await.unwrap_err();
        assert!(matches!(err, RouteError::UnresolvableHandler { .. }));
    }

    #[tokio::test]
    async fn test_custom_attribute_key() {
        let container = ServiceContainer::new().with(
            "H",
            Service::Handler(Arc::new(FixedResponse::new(StatusCode::OK))),
        );
        // result stored under the default key is invisible to a custom-key stage
        let response = RouteDispatcher::new(Arc::new(container))
            .with_attribute("custom.route.attribute")
            .process(routed("H".into()), Arc::new(Downstream))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::IM_A_TEAPOT);
    }
}
