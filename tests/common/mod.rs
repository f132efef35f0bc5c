#![allow(dead_code)]

use dxsp::config::{
    AggregatorConfig, Config, ExplorerConfig, HttpConfig, Protocol, TradingConfig,
};
use rust_decimal::Decimal;

pub const WALLET: &str = "0x1234567890123456789012345678901234567899";
pub const WBTC: &str = "0x2260fac5e5542a773aa44fbcfedf7c193bc2c599";
pub const USDT: &str = "0xdac17f958d2ee523a2206206994597c13d831ec7";

/// Points every provider at `url` (a mockito server).
pub fn config(url: &str, protocol: Protocol) -> Config {
    Config {
        chain_id: 1,
        wallet_address: WALLET.to_string(),
        protocol,
        oneinch: AggregatorConfig {
            base_url: url.to_string(),
            api_key: None,
        },
        zerox: AggregatorConfig {
            base_url: url.to_string(),
            api_key: Some("test-key".to_string()),
        },
        explorer: ExplorerConfig {
            base_url: format!("{url}/api"),
            api_key: Some("explorer-key".to_string()),
        },
        trading: TradingConfig {
            slippage: Decimal::from(2),
        },
        http: HttpConfig { timeout_secs: 5 },
        log_level: "debug".to_string(),
    }
}

/// An address nothing listens on.
pub const DEAD_URL: &str = "http://127.0.0.1:1";
