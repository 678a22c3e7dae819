//! Configuration validation.
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: RouterConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted into the system

use std::collections::HashSet;
use std::net::SocketAddr;

use thiserror::Error;

use crate::config::schema::{RouterConfig, StageKind};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    #[error("invalid listener bind address `{0}`")]
    BindAddress(String),

    #[error("pipeline attribute key must not be empty")]
    EmptyAttributeKey,

    #[error("negotiation stage {0:?} listed more than once")]
    DuplicateStage(StageKind),

    #[error("request timeout must be greater than zero")]
    ZeroTimeout,

    #[error("invalid metrics address `{0}`")]
    MetricsAddress(String),
}

pub fn validate_config(config: &RouterConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::BindAddress(config.listener.bind_address.clone()));
    }

    if config.pipeline.attribute_key.trim().is_empty() {
        errors.push(ValidationError::EmptyAttributeKey);
    }

    let mut seen = HashSet::new();
    for stage in &config.pipeline.stages {
        if !seen.insert(*stage) {
            errors.push(ValidationError::DuplicateStage(*stage));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }

    // only checked when it will actually be bound
    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::MetricsAddress(
            config.observability.metrics_address.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
