//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Assemble the stage pipeline from config
//! - Mount it as the Axum fallback service
//! - Wire up middleware (tracing, timeout)
//! - Bind server to listener with graceful shutdown

use std::sync::Arc;
use std::time::Duration;

use axum::{
    http::{header, HeaderValue, StatusCode},
    Router,
};
use tokio::net::TcpListener;
use tower_http::{timeout::TimeoutLayer, trace::TraceLayer};
use tracing::info;

use crate::config::{PipelineConfig, RouterConfig, StageKind};
use crate::container::Container;
use crate::http::context::AttributeKey;
use crate::http::handler::Pipeline;
use crate::http::middleware::{
    ImplicitHead, ImplicitOptions, MethodNotAllowed, NotFound, RouteDispatcher, RouteResolver,
};
use crate::http::response::{EmptyResponseFactory, FixedResponse, ResponseSource};
use crate::routing::Dispatcher;

/// Resolver → configured negotiation stages → handler invocation → not-found.
///
/// Every stage shares the configured attribute key.
pub fn build_pipeline(
    config: &PipelineConfig,
    dispatcher: Arc<dyn Dispatcher>,
    container: Arc<dyn Container>,
) -> Pipeline {
    let key = AttributeKey::new(config.attribute_key.clone());

    let mut builder = Pipeline::builder()
        .stage(RouteResolver::new(Arc::clone(&dispatcher)).with_attribute(key.clone()));

    for stage in &config.stages {
        builder = match stage {
            StageKind::ImplicitHead => builder
                .stage(ImplicitHead::new(Arc::clone(&dispatcher)).with_attribute(key.clone())),
            StageKind::ImplicitOptions => builder.stage(
                ImplicitOptions::new(ResponseSource::factory(EmptyResponseFactory))
                    .with_attribute(key.clone()),
            ),
            StageKind::MethodNotAllowed => builder.stage(
                MethodNotAllowed::new(ResponseSource::factory(EmptyResponseFactory))
                    .with_attribute(key.clone()),
            ),
        };
    }

    let not_found = FixedResponse::new(StatusCode::NOT_FOUND)
        .with_header(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; charset=utf-8"),
        )
        .with_body(config.not_found_body.clone());

    builder
        .stage(RouteDispatcher::new(container).with_attribute(key))
        .stage(NotFound::new(ResponseSource::fixed(not_found)))
        .build()
}

/// HTTP server serving a single pipeline.
pub struct HttpServer {
    router: Router,
}

impl HttpServer {
    pub fn new(config: &RouterConfig, pipeline: Pipeline) -> Self {
        info!(stages = pipeline.len(), "Pipeline assembled");
        Self {
            router: Self::build_router(config, pipeline),
        }
    }

    /// Build the Axum router with all middleware layers.
    #[allow(deprecated)]
    fn build_router(config: &RouterConfig, pipeline: Pipeline) -> Router {
        Router::new()
            .fallback_service(pipeline.into_service())
            .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
            .layer(TraceLayer::new_for_http())
    }

    pub fn router(&self) -> Router {
        self.router.clone()
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(self, listener: TcpListener) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        info!(address = %addr, "HTTP server starting");

        axum::serve(listener, self.router)
            .with_graceful_shutdown(shutdown_signal())
            .await?;

        info!("HTTP server stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    match tokio::signal::ctrl_c().await {
        Ok(()) => info!("Shutdown signal received"),
        Err(err) => {
            tracing::error!(error = %err, "Failed to install Ctrl+C handler");
            std::future::pending::<()>().await;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::container::{Service, ServiceContainer};
    use crate::routing::{Route, RouteCollector, RouteTable};
    use axum::body::Body;
    use axum::http::{Method, Request};
    use tower::ServiceExt;

    fn server(stages: Vec<StageKind>) -> HttpServer {
        let mut table = RouteTable::new();
        let route = Arc::new(Route::new([Method::GET], "/ping", "Ping"));
        table.add_route(&[Method::GET], "/ping", route).unwrap();

        let container = ServiceContainer::new().with(
            "Ping",
            Service::Handler(Arc::new(FixedResponse::new(StatusCode::OK).with_body("pong"))),
        );

        let mut config = RouterConfig::default();
        config.pipeline.stages = stages;
        let pipeline = build_pipeline(&config.pipeline, Arc::new(table), Arc::new(container));
        HttpServer::new(&config, pipeline)
    }

    fn request(method: Method, uri: &str) -> Request<Body> {
        Request::builder().method(method).uri(uri).body(Body::empty()).unwrap()
    }

    #[tokio::test]
    async fn test_router_serves_pipeline() {
        let router = server(RouterConfig::default().pipeline.stages).router();

        let response = router.clone().oneshot(request(Method::GET, "/ping")).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let response = router.oneshot(request(Method::GET, "/nope")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
        assert_eq!(
            response.headers()[header::CONTENT_TYPE],
            "text/plain; charset=utf-8"
        );
    }

    #[tokio::test]
    async fn test_without_negotiation_method_failure_falls_to_not_found() {
        let router = server(vec![]).router();
        let response = router.oneshot(request(Method::POST, "/ping")).await.unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_configured_method_not_allowed() {
        let router = server(vec![StageKind::MethodNotAllowed]).router();
        let response = router.oneshot(request(Method::POST, "/ping")).await.unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
        assert_eq!(response.headers()[header::ALLOW], "GET");
    }

    #[test]
    fn test_pipeline_stage_count() {
        let config = PipelineConfig::default();
        let pipeline = build_pipeline(
            &config,
            Arc::new(RouteTable::new()),
            Arc::new(ServiceContainer::new()),
        );
        // resolver + three negotiation stages + dispatcher + not-found
        assert_eq!(pipeline.len(), 6);
    }
}
