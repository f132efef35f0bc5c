/*
 * DEX aggregator clients for quotes, approvals and swaps
 */

mod oneinch;
mod zerox;

use async_trait::async_trait;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use crate::config::{Config, Protocol};
use crate::http::HttpClient;
use crate::models::{CallError, DxspError, Result, SwapOrder};

pub use oneinch::OneInchClient;
pub use zerox::{OrderSigner, ZeroExClient};

#[async_trait]
pub trait AggregatorClient: Send + Sync {
    fn name(&self) -> &'static str;

    /// Price of `amount` units of `asset_in` expressed in `asset_out`.
    ///
    /// `Ok(None)` means the provider had nothing to quote for the pair; it is
    /// not an error.
    async fn get_quote(
        &self,
        asset_in: &str,
        asset_out: &str,
        amount: Decimal,
    ) -> Result<Option<Decimal>>;

    /// Approval transaction payload when `token` still needs an allowance,
    /// `None` when already approved or the provider has no approval step.
    async fn get_approve(&self, _token: &str) -> Result<Option<Value>> {
        Ok(None)
    }

    /// Sells `amount` of `asset_out` for `asset_in`.
    async fn get_swap(
        &self,
        asset_out: &str,
        asset_in: &str,
        amount: Decimal,
    ) -> Result<Option<SwapOrder>>;
}

pub fn create_aggregator_client(
    config: &Config,
    http: HttpClient,
    signer: Option<Arc<dyn OrderSigner>>,
) -> Result<Box<dyn AggregatorClient>> {
    match config.protocol {
        Protocol::OneInch => Ok(Box::new(OneInchClient::new(config, http)?)),
        Protocol::ZeroEx => Ok(Box::new(ZeroExClient::new(config, http, signer)?)),
    }
}

fn calculation(err: DxspError) -> CallError {
    CallError::Calculation(err.to_string())
}
