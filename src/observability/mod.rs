//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! Resolver and negotiation stages produce:
//!     → logging.rs (structured log events via tracing)
//!     → metrics.rs (outcome counters)
//!
//! Consumers:
//!     → stdout (pretty or JSON)
//!     → Prometheus scrape endpoint (optional)
//! ```

pub mod logging;
pub mod metrics;

pub use logging::init_logging;
pub use metrics::init_metrics;
