//! Configuration schema definitions.
//!
//! All types derive Serde traits for deserialization from config files.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Root configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct RouterConfig {
    /// Listener configuration.
    pub listener: ListenerConfig,

    /// Where route manifests are discovered.
    pub routes: RoutesConfig,

    /// Stage wiring.
    pub pipeline: PipelineConfig,

    /// Timeout configuration.
    pub timeouts: TimeoutConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ListenerConfig {
    /// Bind address (e.g., "0.0.0.0:8080").
    pub bind_address: String,
}

impl Default for ListenerConfig {
    fn default() -> Self {
        Self {
            bind_address: "0.0.0.0:8080".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct RoutesConfig {
    /// Manifest directory, scanned recursively.
    pub directory: PathBuf,

    /// Prefix for class ids derived from manifest paths.
    pub namespace: String,
}

impl Default for RoutesConfig {
    fn default() -> Self {
        Self {
            directory: PathBuf::from("routes"),
            namespace: "app".to_string(),
        }
    }
}

/// Negotiation stage that can be placed between resolver and dispatcher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum StageKind {
    ImplicitHead,
    ImplicitOptions,
    MethodNotAllowed,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Request attribute every stage reads and writes the result under.
    pub attribute_key: String,

    /// Negotiation stages, in order.
    pub stages: Vec<StageKind>,

    /// Body of the final 404 response.
    pub not_found_body: String,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            attribute_key: crate::http::context::AttributeKey::DEFAULT.to_string(),
            stages: vec![
                StageKind::ImplicitHead,
                StageKind::ImplicitOptions,
                StageKind::MethodNotAllowed,
            ],
            not_found_body: "Not Found".to_string(),
        }
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct TimeoutConfig {
    /// Request timeout (total time for request/response) in seconds.
    pub request_secs: u64,
}

impl Default for TimeoutConfig {
    fn default() -> Self {
        Self { request_secs: 30 }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    #[default]
    Pretty,
    Json,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error), or any `EnvFilter` directive.
    pub log_level: String,

    pub log_format: LogFormat,

    /// Enable metrics endpoint.
    pub metrics_enabled: bool,

    /// Metrics endpoint bind address.
    pub metrics_address: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
            log_format: LogFormat::Pretty,
            metrics_enabled: false,
            metrics_address: "0.0.0.0:9090".to_string(),
        }
    }
}
