/*
 * Configuration management for the dxsp clients
 */

use crate::models::{DxspError, Result};
use crate::utils::format_address;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct Config {
    pub chain_id: u64,
    pub wallet_address: String,
    pub protocol: Protocol,
    pub oneinch: AggregatorConfig,
    pub zerox: AggregatorConfig,
    pub explorer: ExplorerConfig,
    pub trading: TradingConfig,
    pub http: HttpConfig,
    pub log_level: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct AggregatorConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ExplorerConfig {
    pub base_url: String,
    pub api_key: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct TradingConfig {
    /// Slippage tolerance in percent, passed through to the swap endpoint.
    pub slippage: Decimal,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct HttpConfig {
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Protocol {
    OneInch,
    ZeroEx,
}

pub const DEFAULT_ONEINCH_URL: &str = "https://api.1inch.io/v5.0";
pub const DEFAULT_ZEROX_URL: &str = "https://api.0x.org";
pub const DEFAULT_EXPLORER_URL: &str = "https://api.etherscan.io/api";

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenv::dotenv().ok();
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Builds the configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());
        let optional = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());

        let wallet_address = lookup("WALLET_ADDRESS")
            .ok_or_else(|| DxspError::ConfigError("WALLET_ADDRESS not set".to_string()))?;

        Ok(Config {
            chain_id: var("CHAIN_ID", "1")
                .parse()
                .map_err(|e| DxspError::ConfigError(format!("Invalid chain id: {e}")))?,
            wallet_address: format_address(&wallet_address)?,
            protocol: var("DEX_PROTOCOL", "1inch").parse()?,
            oneinch: AggregatorConfig {
                base_url: var("DEX_1INCH_URL", DEFAULT_ONEINCH_URL),
                api_key: optional("DEX_1INCH_API_KEY"),
            },
            zerox: AggregatorConfig {
                base_url: var("DEX_0X_URL", DEFAULT_ZEROX_URL),
                api_key: optional("DEX_0X_API_KEY"),
            },
            explorer: ExplorerConfig {
                base_url: var("DEX_BLOCK_EXPLORER_URL", DEFAULT_EXPLORER_URL),
                api_key: optional("DEX_BLOCK_EXPLORER_API"),
            },
            trading: TradingConfig {
                slippage: Decimal::from_str(&var("DEX_TRADING_SLIPPAGE", "2"))
                    .map_err(|e| DxspError::ConfigError(format!("Invalid slippage: {e}")))?,
            },
            http: HttpConfig {
                timeout_secs: var("HTTP_TIMEOUT_SECS", "10")
                    .parse()
                    .map_err(|e| DxspError::ConfigError(format!("Invalid HTTP timeout: {e}")))?,
            },
            log_level: var("LOG_LEVEL", "info"),
        })
    }
}

impl FromStr for Protocol {
    type Err = DxspError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "1inch" | "oneinch" => Ok(Protocol::OneInch),
            "0x" | "zerox" => Ok(Protocol::ZeroEx),
            _ => Err(DxspError::ConfigError(format!("Unknown DEX protocol: {s}"))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    const WALLET: &str = "0x1234567890123456789012345678901234567899";

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_apply_when_only_wallet_is_set() {
        let config = Config::from_lookup(lookup(&[("WALLET_ADDRESS", WALLET)])).unwrap();

        assert_eq!(config.chain_id, 1);
        assert_eq!(config.protocol, Protocol::OneInch);
        assert_eq!(config.oneinch.base_url, DEFAULT_ONEINCH_URL);
        assert_eq!(config.trading.slippage, Decimal::from(2));
        assert_eq!(config.http.timeout_secs, 10);
        assert!(config.explorer.api_key.is_none());
    }

    #[test]
    fn missing_wallet_is_a_config_error() {
        let err = Config::from_lookup(lookup(&[])).unwrap_err();
        assert!(matches!(err, DxspError::ConfigError(_)));
    }

    #[test]
    fn empty_explorer_key_counts_as_absent() {
        let config = Config::from_lookup(lookup(&[
            ("WALLET_ADDRESS", WALLET),
            ("DEX_BLOCK_EXPLORER_API", "  "),
        ]))
        .unwrap();
        assert!(config.explorer.api_key.is_none());
    }

    #[test]
    fn parses_overrides() {
        let config = Config::from_lookup(lookup(&[
            ("WALLET_ADDRESS", "0xEeeeeEeeeEeEeeEeEeEeeEEEeeeeEeeeeeeeEEeE"),
            ("CHAIN_ID", "10"),
            ("DEX_PROTOCOL", "0x"),
            ("DEX_0X_API_KEY", "secret"),
            ("DEX_TRADING_SLIPPAGE", "0.5"),
        ]))
        .unwrap();

        assert_eq!(config.chain_id, 10);
        assert_eq!(config.protocol, Protocol::ZeroEx);
        assert_eq!(config.zerox.api_key.as_deref(), Some("secret"));
        assert_eq!(config.trading.slippage, Decimal::new(5, 1));
        assert_eq!(config.wallet_address, "0xeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeeee");
    }

    #[test]
    fn rejects_unknown_protocol() {
        assert!("uniswap".parse::<Protocol>().is_err());
        assert_eq!("1INCH".parse::<Protocol>().unwrap(), Protocol::OneInch);
    }
}
