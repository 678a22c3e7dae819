//! Route negotiation server.
//!
//! # Architecture Overview
//!
//! ```text
//!     routes/*.toml ──▶ ManifestSource ──▶ AttributeRouteLoader ──▶ RouteTable
//!                                                                      │
//!     Client Request                                                   ▼
//!     ──────────────▶ axum ──▶ RouteResolver ──▶ ImplicitHead ──▶ ImplicitOptions
//!                                                                      │
//!     Client Response                                                  ▼
//!     ◀────────────── axum ◀── NotFound ◀── RouteDispatcher ◀── MethodNotAllowed
//!                                                  │
//!                                                  ▼
//!                                          ServiceContainer
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use clap::Parser;
use tokio::net::TcpListener;

use route_negotiator::config::{load_config, RouterConfig};
use route_negotiator::container::{Service, ServiceContainer};
use route_negotiator::http::{build_pipeline, HttpServer};
use route_negotiator::loader::{AttributeRouteLoader, ManifestSource};
use route_negotiator::observability::{init_logging, init_metrics};

#[derive(Parser)]
#[command(name = "route-negotiator")]
#[command(about = "Serve attribute-declared routes with HEAD/OPTIONS/405 negotiation", long_about = None)]
struct Cli {
    /// TOML config file; defaults are used when omitted.
    #[arg(short, long)]
    config: Option<PathBuf>,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };

    init_logging(&config.observability)?;
    tracing::info!("route-negotiator v{} starting", env!("CARGO_PKG_VERSION"));
    tracing::info!(
        bind_address = %config.listener.bind_address,
        routes = %config.routes.directory.display(),
        request_timeout_secs = config.timeouts.request_secs,
        "Configuration loaded"
    );

    if config.observability.metrics_enabled {
        init_metrics(config.observability.metrics_address.parse()?)?;
    }

    let source = ManifestSource::new(config.routes.directory.clone(), config.routes.namespace.clone());
    let loader = AttributeRouteLoader::new(config.routes.directory.to_string_lossy());
    let table = loader.build_table(&source)?;

    let mut container = ServiceContainer::new();
    for (id, response) in source.responders() {
        tracing::debug!(class = %id, status = %response.status(), "Registering static responder");
        container.register(id, Service::Handler(Arc::new(response)));
    }
    tracing::info!(
        routes = table.len(),
        services = container.len(),
        "Route table built"
    );

    let pipeline = build_pipeline(&config.pipeline, Arc::new(table), Arc::new(container));

    let listener = TcpListener::bind(&config.listener.bind_address).await?;
    tracing::info!(address = %listener.local_addr()?, "Listening for connections");

    HttpServer::new(&config, pipeline).run(listener).await?;

    tracing::info!("Shutdown complete");
    Ok(())
}
