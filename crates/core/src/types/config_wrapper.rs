use alloy::primitives::Address;
use eyre::{Result, eyre};
use log::debug;
use std::{env, fs};
use toml::Value;

use crate::encoding::multi::DEFAULT_MULTI_SEND_ADDRESS;
use crate::utils::parse::parse_address;

/// Per-network addresses read from `config.toml`.
///
/// ```toml
/// [multi_send_address]
/// default = "0x8D29bE29923b68abfDD21e541b9374737B49cdAD"
/// 100 = "0x..."
///
/// [safe_address]
/// 1 = "env:SAFE_ADDRESS"
/// ```
pub struct ConfigWrapper {
    raw_config: Value,
}

impl ConfigWrapper {
    pub fn new(raw_config: Value) -> Self {
        Self { raw_config }
    }

    pub fn from_file(path: Option<&str>) -> Result<Self> {
        let path = path.unwrap_or("config.toml");
        let config_content = fs::read_to_string(path)?;
        let raw_config: Value = toml::from_str(&config_content)?;
        debug!("Loaded config from {}", path);

        Ok(Self { raw_config })
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let raw_config: Value = toml::from_str(content)?;
        Ok(Self { raw_config })
    }

    /// Network specific entry first, then `default`, then the published
    /// MultiSend deployment.
    pub fn get_multisend_address(&self, network_id: u64) -> Result<Address> {
        match self.lookup("multi_send_address", network_id)? {
            Some(s) => parse_address(&s).map_err(|e| eyre!("multi_send_address: {}", e)),
            None => Ok(DEFAULT_MULTI_SEND_ADDRESS),
        }
    }

    pub fn get_safe_address(&self, network_id: u64) -> Result<Option<Address>> {
        self.lookup("safe_address", network_id)?
            .map(|s| parse_address(&s).map_err(|e| eyre!("safe_address: {}", e)))
            .transpose()
    }

    fn lookup(&self, table: &str, network_id: u64) -> Result<Option<String>> {
        // Try network specific value first
        let network_value = self
            .raw_config
            .get(table)
            .and_then(|t| t.get(&network_id.to_string()));

        // Fallback to default if network specific not found
        let default_value = self.raw_config.get(table).and_then(|t| t.get("default"));

        let Some(value) = network_value.or(default_value) else {
            return Ok(None);
        };

        let value_str = value
            .as_str()
            .ok_or_else(|| eyre!("{} for network_id {} must be a string", table, network_id))?;

        resolve_env(value_str).map(Some)
    }
}

fn resolve_env(value: &str) -> Result<String> {
    if let Some(env_var) = value.strip_prefix("env:") {
        env::var(env_var).map_err(|_| eyre!("Environment variable {} not set", env_var))
    } else {
        Ok(value.to_string())
    }
}
