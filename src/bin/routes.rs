use std::path::PathBuf;
use std::sync::Arc;

use axum::http::Method;
use clap::{Parser, Subcommand};
use serde_json::{json, Value};

use route_negotiator::config::{load_config, RouterConfig};
use route_negotiator::loader::{AttributeRouteLoader, ManifestSource};
use route_negotiator::routing::{decode_path, Dispatcher, Route, RouteResult};

#[derive(Parser)]
#[command(name = "routes")]
#[command(about = "Inspect the route table built from manifests", long_about = None)]
struct Cli {
    /// Router config file; its `[routes]` section is used.
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Manifest directory (overrides config)
    #[arg(short, long)]
    dir: Option<PathBuf>,

    /// Class id namespace (overrides config)
    #[arg(short, long)]
    namespace: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print routes in registration order
    List,
    /// Resolve a method and path against the table
    Resolve {
        method: String,
        path: String,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => load_config(path)?,
        None => RouterConfig::default(),
    };
    if let Some(dir) = cli.dir {
        config.routes.directory = dir;
    }
    if let Some(namespace) = cli.namespace {
        config.routes.namespace = namespace;
    }

    let source = ManifestSource::new(config.routes.directory.clone(), config.routes.namespace.clone());
    let loader = AttributeRouteLoader::new(config.routes.directory.to_string_lossy());
    let table = loader.build_table(&source)?;

    let output = match cli.command {
        Commands::List => Value::Array(table.routes().iter().map(route_json).collect()),
        Commands::Resolve { method, path } => {
            let method = Method::from_bytes(method.to_ascii_uppercase().as_bytes())?;
            let dispatch = table.dispatch(&method, &decode_path(&path));
            result_json(&RouteResult::from(dispatch))
        }
    };

    println!("{}", serde_json::to_string_pretty(&output)?);
    Ok(())
}

fn route_json(route: &Arc<Route>) -> Value {
    json!({
        "name": route.name(),
        "methods": route.methods().iter().map(Method::as_str).collect::<Vec<_>>(),
        "path": route.path(),
        "priority": route.priority(),
        "handler": route.handler().to_string(),
    })
}

fn result_json(result: &RouteResult) -> Value {
    json!({
        "success": result.is_success(),
        "method_failure": result.is_method_failure(),
        "route": result.route().map(route_json),
        "params": result.params(),
        "allowed_methods": result
            .allowed_methods()
            .iter()
            .map(Method::as_str)
            .collect::<Vec<_>>(),
    })
}
