//! Configuration loading from disk and the process environment.

use std::fs;
use std::path::Path;

use crate::config::schema::{RelayConfig, DEFAULT_GAS_BUDGET};
use crate::config::validation::{validate_config, ValidationError};

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load configuration from an optional TOML file, apply environment
/// overrides, and validate the result.
///
/// Also returns the overrides that were ignored. Logging is not installed
/// yet at this point, so the caller logs them.
pub fn load_config(path: Option<&Path>) -> Result<(RelayConfig, Vec<String>), ConfigError> {
    let mut config = match path {
        Some(path) => {
            let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
            toml::from_str(&content).map_err(ConfigError::Parse)?
        }
        None => RelayConfig::default(),
    };

    let warnings = apply_env_overrides(&mut config, |key| std::env::var(key).ok());

    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok((config, warnings))
}

/// Overlay environment variables onto `config`.
///
/// `lookup` abstracts the environment so tests can supply their own values.
/// Returns one message per variable that was set but could not be used.
pub fn apply_env_overrides<F>(config: &mut RelayConfig, lookup: F) -> Vec<String>
where
    F: Fn(&str) -> Option<String>,
{
    let mut warnings = Vec::new();
    let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

    if let Some(addr) = get("BIND_ADDRESS") {
        config.listener.bind_address = addr;
    } else if let Some(port) = get("PORT") {
        config.listener.bind_address = format!("0.0.0.0:{}", port.trim());
    }
    if let Some(base_path) = get("BASE_PATH") {
        config.listener.base_path = base_path;
    }
    if let Some(origins) = get("CORS_ORIGINS") {
        config.listener.cors_origins = origins
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();
    }

    if let Some(network) = get("SUI_NETWORK") {
        config.sui.network = network;
    }
    if let Some(rpc_url) = get("SUI_RPC_URL") {
        config.sui.rpc_url = rpc_url;
    }
    if let Some(timeout) = get("SUI_RPC_TIMEOUT_SECS") {
        match timeout.trim().parse() {
            Ok(secs) => config.sui.rpc_timeout_secs = secs,
            Err(_) => warnings.push(format!(
                "ignoring invalid SUI_RPC_TIMEOUT_SECS '{}', keeping {}",
                timeout, config.sui.rpc_timeout_secs
            )),
        }
    }
    if let Some(package_id) = get("LINKTREE_PACKAGE_ID") {
        config.sui.package_id = package_id;
    }
    if let Some(module_name) = get("LINKTREE_MODULE_NAME") {
        config.sui.module_name = module_name;
    }
    if let Some(budget) = get("DEFAULT_GAS_BUDGET") {
        // An unparsable or zero budget falls back to the default.
        config.sui.default_gas_budget = match budget.trim().parse::<u64>() {
            Ok(value) if value > 0 => value,
            _ => {
                warnings.push(format!(
                    "ignoring invalid DEFAULT_GAS_BUDGET '{}', using {}",
                    budget, DEFAULT_GAS_BUDGET
                ));
                DEFAULT_GAS_BUDGET
            }
        };
    }
    if let Some(sponsor) = get("SPONSOR_ADDRESS") {
        config.sui.sponsor_address = Some(sponsor);
    }

    warnings
}
