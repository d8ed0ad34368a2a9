//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate value ranges (timeouts > 0)
//! - Check URLs parse and the selected catalog source is usable
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Pure function: AppConfig → Result<(), Vec<ValidationError>>

use thiserror::Error;
use url::Url;

use crate::config::schema::{AppConfig, CatalogSource};

const LOG_LEVELS: [&str; 5] = ["trace", "debug", "info", "warn", "error"];

#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("catalog.timeout_secs must be greater than zero")]
    ZeroTimeout,

    #[error("watch.poll_interval_secs must be greater than zero")]
    ZeroPollInterval,

    #[error("catalog.path must be set for the file source")]
    MissingCatalogPath,

    #[error("{field} is not a valid URL: {value}")]
    InvalidUrl { field: &'static str, value: String },

    #[error("unknown log level: {0}")]
    UnknownLogLevel(String),
}

pub fn validate_config(config: &AppConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.catalog.timeout_secs == 0 {
        errors.push(ValidationError::ZeroTimeout);
    }
    if config.watch.poll && config.watch.poll_interval_secs == 0 {
        errors.push(ValidationError::ZeroPollInterval);
    }

    match config.catalog.source {
        CatalogSource::File if config.catalog.path.trim().is_empty() => {
            errors.push(ValidationError::MissingCatalogPath);
        }
        CatalogSource::Http => check_url(&mut errors, "catalog.base_url", &config.catalog.base_url),
        _ => {}
    }

    check_url(&mut errors, "ota.firmware_resource_url", &config.ota.firmware_resource_url);
    check_url(&mut errors, "ota.software_resource_url", &config.ota.software_resource_url);

    let level = config.observability.log_level.to_ascii_lowercase();
    if !LOG_LEVELS.contains(&level.as_str()) {
        errors.push(ValidationError::UnknownLogLevel(
            config.observability.log_level.clone(),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(errors: &mut Vec<ValidationError>, field: &'static str, value: &str) {
    if Url::parse(value).is_err() {
        errors.push(ValidationError::InvalidUrl {
            field,
            value: value.to_string(),
        });
    }
}
