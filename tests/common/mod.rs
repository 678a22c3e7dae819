//! Shared utilities for integration testing.
#![allow(dead_code)]

use std::fs;
use std::path::Path;
use std::sync::Arc;

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{HeaderValue, Method, Request, StatusCode};
use axum::response::Response;
use axum::Router;

use route_negotiator::attribute::{Group, HandlerClass, RouteAttribute};
use route_negotiator::config::RouterConfig;
use route_negotiator::container::{Service, ServiceContainer};
use route_negotiator::http::{build_pipeline, AttributeKey, Handler, HttpServer, RequestExt};
use route_negotiator::loader::{AttributeRouteLoader, StaticClasses};
use route_negotiator::Result;

/// Terminal handler reporting what it was invoked with: the route name as
/// body, the `id` parameter and the request method as headers.
pub struct Echo {
    pub key: AttributeKey,
}

#[async_trait]
impl Handler for Echo {
    async fn handle(&self, request: Request<Body>) -> Result<Response> {
        let result = request.route_result(&self.key);
        let name = result
            .as_ref()
            .and_then(|r| r.route())
            .map(|route| route.name().to_string())
            .unwrap_or_default();

        let mut response = Response::new(Body::from(name));
        let headers = response.headers_mut();
        headers.insert("x-method", HeaderValue::from_str(request.method().as_str()).unwrap());
        if let Some(id) = result.as_ref().and_then(|r| r.param("id")) {
            headers.insert("x-id", HeaderValue::from_str(id).unwrap());
        }
        Ok(response)
    }
}

/// `app.Users` under group `api`, `app.Status` answering only HEAD, and
/// `app.Broken` which the container does not know.
pub fn classes() -> StaticClasses {
    StaticClasses::new([
        HandlerClass::new("app.Users")
            .group(Group::new("api"))
            .method("index", [RouteAttribute::get("users").with_name("users.index")])
            .method("show", [RouteAttribute::get("users/{id}").with_name("users.show")])
            .method("store", [RouteAttribute::post("users").with_name("users.store")]),
        HandlerClass::new("app.Status").method(
            "probe",
            [RouteAttribute::route("status", [Method::HEAD]).with_name("status.probe")],
        ),
        HandlerClass::new("app.Broken").method("run", [RouteAttribute::get("broken")]),
    ])
}

pub fn container(key: &AttributeKey) -> ServiceContainer {
    let echo: Arc<dyn Handler> = Arc::new(Echo { key: key.clone() });
    ServiceContainer::new()
        .with("app.Users", Service::Handler(Arc::clone(&echo)))
        .with("app.Status", Service::Handler(echo))
}

/// Full axum router over [`classes`] with the given config.
pub fn app(config: &RouterConfig) -> Router {
    let key = AttributeKey::new(config.pipeline.attribute_key.clone());
    let table = AttributeRouteLoader::new("src/Controller")
        .build_table(&classes())
        .unwrap();
    let pipeline = build_pipeline(&config.pipeline, Arc::new(table), Arc::new(container(&key)));
    HttpServer::new(config, pipeline).router()
}

pub fn request(method: Method, uri: &str) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .body(Body::empty())
        .unwrap()
}

pub async fn body_string(response: Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub fn assert_status(response: &Response, status: StatusCode) {
    assert_eq!(response.status(), status, "unexpected status for response {:?}", response);
}

/// Write `content` to `relative` under `root`, creating parent directories.
pub fn write_manifest(root: &Path, relative: &str, content: &str) {
    let path = root.join(relative);
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).unwrap();
    }
    fs::write(path, content).unwrap();
}
