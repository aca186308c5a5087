//! Configuration validation.
//!
//! Serde handles syntax; this module checks value ranges, address formats
//! and URLs. Every problem is reported, not just the first.

use std::net::SocketAddr;

use thiserror::Error;
use url::Url;

use crate::config::schema::RelayConfig;

/// A single semantic problem with the configuration.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct ValidationError {
    pub field: &'static str,
    pub message: String,
}

impl ValidationError {
    fn new(field: &'static str, message: impl Into<String>) -> Self {
        Self {
            field,
            message: message.into(),
        }
    }
}

/// Validate a loaded configuration.
pub fn validate_config(config: &RelayConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.listener.bind_address.parse::<SocketAddr>().is_err() {
        errors.push(ValidationError::new(
            "listener.bind_address",
            format!("'{}' is not a socket address", config.listener.bind_address),
        ));
    }

    let base_path = &config.listener.base_path;
    if !base_path.is_empty() && (!base_path.starts_with('/') || base_path.ends_with('/')) {
        errors.push(ValidationError::new(
            "listener.base_path",
            "must be empty or start with '/' and not end with '/'",
        ));
    }

    check_url("sui.rpc_url", &config.sui.rpc_url, &mut errors);
    for url in &config.sui.failover_urls {
        check_url("sui.failover_urls", url, &mut errors);
    }

    if config.sui.rpc_timeout_secs == 0 {
        errors.push(ValidationError::new("sui.rpc_timeout_secs", "must be greater than 0"));
    }

    if config.sui.package_id.is_empty() {
        errors.push(ValidationError::new(
            "sui.package_id",
            "is required (set LINKTREE_PACKAGE_ID)",
        ));
    } else if !is_hex_address(&config.sui.package_id) {
        errors.push(ValidationError::new(
            "sui.package_id",
            format!("'{}' is not a 0x-prefixed hex id", config.sui.package_id),
        ));
    }

    if !is_move_identifier(&config.sui.module_name) {
        errors.push(ValidationError::new(
            "sui.module_name",
            format!("'{}' is not a valid Move identifier", config.sui.module_name),
        ));
    }

    if config.sui.default_gas_budget == 0 {
        errors.push(ValidationError::new("sui.default_gas_budget", "must be greater than 0"));
    }

    if let Some(address) = &config.sui.sponsor_address {
        if !is_hex_address(address) {
            errors.push(ValidationError::new(
                "sui.sponsor_address",
                format!("'{}' is not a 0x-prefixed hex address", address),
            ));
        }
    }

    if config.timeouts.request_secs == 0 {
        errors.push(ValidationError::new("timeouts.request_secs", "must be greater than 0"));
    }

    if config.rate_limit.enabled {
        if config.rate_limit.requests_per_second == 0 {
            errors.push(ValidationError::new(
                "rate_limit.requests_per_second",
                "must be greater than 0 when rate limiting is enabled",
            ));
        }
        if config.rate_limit.burst_size == 0 {
            errors.push(ValidationError::new(
                "rate_limit.burst_size",
                "must be greater than 0 when rate limiting is enabled",
            ));
        }
    }

    if config.security.max_body_size == 0 {
        errors.push(ValidationError::new("security.max_body_size", "must be greater than 0"));
    }

    if config.observability.metrics_enabled
        && config.observability.metrics_address.parse::<SocketAddr>().is_err()
    {
        errors.push(ValidationError::new(
            "observability.metrics_address",
            format!(
                "'{}' is not a socket address",
                config.observability.metrics_address
            ),
        ));
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

fn check_url(field: &'static str, value: &str, errors: &mut Vec<ValidationError>) {
    match Url::parse(value) {
        Ok(url) if url.scheme() == "http" || url.scheme() == "https" => {}
        Ok(url) => errors.push(ValidationError::new(
            field,
            format!("unsupported scheme '{}' in '{}'", url.scheme(), value),
        )),
        Err(e) => errors.push(ValidationError::new(field, format!("'{}': {}", value, e))),
    }
}

/// `0x` followed by 1..=64 hex digits.
pub(crate) fn is_hex_address(value: &str) -> bool {
    match value.strip_prefix("0x") {
        Some(hex) => !hex.is_empty() && hex.len() <= 64 && hex.chars().all(|c| c.is_ascii_hexdigit()),
        None => false,
    }
}

fn is_move_identifier(value: &str) -> bool {
    let mut chars = value.chars();
    match chars.next() {
        Some(first) if first.is_ascii_alphabetic() || first == '_' => {
            chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
        }
        _ => false,
    }
}
