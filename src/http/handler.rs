//! Handler and middleware protocol.
//!
//! # Responsibilities
//! - Define the two shapes every pipeline participant takes
//! - Compose ordered middleware stages in front of a terminal handler
//! - Expose the composed pipeline as a `tower::Service`
//!
//! # Design Decisions
//! - A middleware receives the rest of the chain as `Arc<dyn Handler>` and
//!   decides whether to call it
//! - Stages are shared (`Arc`) and stateless; one chain cursor is allocated
//!   per hop
//! - Errors travel as `RouteError` until the service boundary, where they
//!   become a generic 500

use std::convert::Infallible;
use std::future::Future;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use axum::{
    body::Body,
    http::Request,
    response::{IntoResponse, Response},
};
use futures_util::future::BoxFuture;
use tower::Service;

use crate::error::{Result, RouteError};

/// Terminal request handler.
#[async_trait]
pub trait Handler: Send + Sync {
    async fn handle(&self, request: Request<Body>) -> Result<Response>;
}

#[async_trait]
impl<T: Handler + ?Sized> Handler for Arc<T> {
    async fn handle(&self, request: Request<Body>) -> Result<Response> {
        (**self).handle(request).await
    }
}

/// Pipeline stage: inspects the request and either answers it or forwards
/// it to `next`.
#[async_trait]
pub trait Middleware: Send + Sync {
    async fn process(&self, request: Request<Body>, next: Arc<dyn Handler>) -> Result<Response>;
}

#[async_trait]
impl<T: Middleware + ?Sized> Middleware for Arc<T> {
    async fn process(&self, request: Request<Body>, next: Arc<dyn Handler>) -> Result<Response> {
        (**self).process(request, next).await
    }
}

/// Plain invocable taking the request and the remaining chain.
pub type Callable =
    Arc<dyn Fn(Request<Body>, Arc<dyn Handler>) -> BoxFuture<'static, Result<Response>> + Send + Sync>;

/// Box an async closure into a [`Callable`].
pub fn callable<F, Fut>(f: F) -> Callable
where
    F: Fn(Request<Body>, Arc<dyn Handler>) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = Result<Response>> + Send + 'static,
{
    Arc::new(move |request, next| -> BoxFuture<'static, Result<Response>> {
        Box::pin(f(request, next))
    })
}

/// Ordered middleware stages in front of a terminal handler.
#[derive(Clone)]
pub struct Pipeline {
    stages: Arc<[Arc<dyn Middleware>]>,
    terminal: Arc<dyn Handler>,
}

impl Pipeline {
    pub fn builder() -> PipelineBuilder {
        PipelineBuilder::default()
    }

    /// Number of middleware stages.
    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Wrap the pipeline as an infallible `tower::Service`.
    pub fn into_service(self) -> PipelineService {
        PipelineService { pipeline: self }
    }
}

#[async_trait]
impl Handler for Pipeline {
    async fn handle(&self, request: Request<Body>) -> Result<Response> {
        let chain = Chain {
            stages: Arc::clone(&self.stages),
            position: 0,
            terminal: Arc::clone(&self.terminal),
        };
        chain.handle(request).await
    }
}

/// Builder for [`Pipeline`]. Stages run in the order they are added.
#[derive(Default)]
pub struct PipelineBuilder {
    stages: Vec<Arc<dyn Middleware>>,
}

impl PipelineBuilder {
    pub fn stage(mut self, stage: impl Middleware + 'static) -> Self {
        self.stages.push(Arc::new(stage));
        self
    }

    pub fn shared_stage(mut self, stage: Arc<dyn Middleware>) -> Self {
        self.stages.push(stage);
        self
    }

    /// Finish with no terminal handler; a request that falls through every
    /// stage fails with [`RouteError::PipelineExhausted`].
    pub fn build(self) -> Pipeline {
        self.build_with(Exhausted)
    }

    pub fn build_with(self, terminal: impl Handler + 'static) -> Pipeline {
        Pipeline {
            stages: self.stages.into(),
            terminal: Arc::new(terminal),
        }
    }
}

/// Cursor over the remaining stages; handed to each stage as `next`.
struct Chain {
    stages: Arc<[Arc<dyn Middleware>]>,
    position: usize,
    terminal: Arc<dyn Handler>,
}

#[async_trait]
impl Handler for Chain {
    async fn handle(&self, request: Request<Body>) -> Result<Response> {
        match self.stages.get(self.position) {
            Some(stage) => {
                let next = Arc::new(Chain {
                    stages: Arc::clone(&self.stages),
                    position: self.position + 1,
                    terminal: Arc::clone(&self.terminal),
                });
                stage.process(request, next).await
            }
            None => self.terminal.handle(request).await,
        }
    }
}

struct Exhausted;

#[async_trait]
impl Handler for Exhausted {
    async fn handle(&self, _request: Request<Body>) -> Result<Response> {
        Err(RouteError::PipelineExhausted)
    }
}

/// `tower::Service` view of a [`Pipeline`].
#[derive(Clone)]
pub struct PipelineService {
    pipeline: Pipeline,
}

impl Service<Request<Body>> for PipelineService {
    type Response = Response;
    type Error = Infallible;
    type Future = BoxFuture<'static, Result<Response, Infallible>>;

    fn poll_ready(&mut self, _cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
        Poll::Ready(Ok(()))
    }

    fn call(&mut self, request: Request<Body>) -> Self::Future {
        let pipeline = self.pipeline.clone();
        Box::pin(async move {
            match pipeline.handle(request).await {
                Ok(response) => Ok(response),
                Err(err) => Ok(err.into_response()),
            }
        })
    }
}
