/*
 * 0x aggregator client implementation
 */

use async_trait::async_trait;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use tracing::{debug, info, warn};
use crate::aggregator::{calculation, AggregatorClient};
use crate::config::Config;
use crate::http::{build_headers, HttpClient};
use crate::models::{CallError, DxspError, Result, SwapOrder};
use crate::utils::{
    from_base_units, is_empty_payload, parse_base_units, to_base_units, DEFAULT_DECIMALS,
};

const QUOTE_PRECISION: u32 = 6;
const NO_LIQUIDITY_REASON: &str = "INSUFFICIENT_ASSET_LIQUIDITY";

/// Signs a 0x quote into a submittable order. Key management lives outside
/// this crate.
#[async_trait]
pub trait OrderSigner: Send + Sync {
    async fn sign(&self, quote: &Value) -> std::result::Result<Value, String>;
}

pub struct ZeroExClient {
    http: HttpClient,
    headers: HeaderMap,
    base_url: String,
    signer: Option<Arc<dyn OrderSigner>>,
}

impl ZeroExClient {
    pub fn new(
        config: &Config,
        http: HttpClient,
        signer: Option<Arc<dyn OrderSigner>>,
    ) -> Result<Self> {
        let headers = build_headers(&[("0x-api-key", config.zerox.api_key.as_deref())])?;

        Ok(Self {
            http,
            headers,
            base_url: config.zerox.base_url.trim_end_matches('/').to_string(),
            signer,
        })
    }

    /// Quote with explicit token decimals: `amount` is in `asset_in` units and
    /// the result is in `asset_out` units.
    pub async fn get_quote_with_decimals(
        &self,
        asset_in: &str,
        asset_out: &str,
        amount: Decimal,
        in_decimals: u8,
        out_decimals: u8,
    ) -> Result<Option<Decimal>> {
        self.fetch_quote(asset_in, asset_out, amount, in_decimals, out_decimals)
            .await
            .map_err(DxspError::QuoteFailed)
    }

    async fn fetch_quote(
        &self,
        asset_in: &str,
        asset_out: &str,
        amount: Decimal,
        in_decimals: u8,
        out_decimals: u8,
    ) -> std::result::Result<Option<Decimal>, CallError> {
        let Some(body) = self.fetch_quote_payload(asset_in, asset_out, amount, in_decimals).await? else {
            return Ok(None);
        };

        let buy_amount = parse_base_units(&body["buyAmount"], "buyAmount")?;
        let quote = from_base_units(&buy_amount, out_decimals).map_err(calculation)?;

        Ok(Some(quote.round_dp(QUOTE_PRECISION).normalize()))
    }

    async fn fetch_quote_payload(
        &self,
        asset_in: &str,
        asset_out: &str,
        amount: Decimal,
        in_decimals: u8,
    ) -> std::result::Result<Option<Value>, CallError> {
        let amount = to_base_units(amount, in_decimals).map_err(calculation)?;
        let query = [
            ("sellToken", asset_in.to_string()),
            ("buyToken", asset_out.to_string()),
            ("sellAmount", amount.to_string()),
        ];

        let response = self
            .http
            .get(&format!("{}/swap/v1/quote", self.base_url), &query, &self.headers)
            .await?;
        debug!("0x quote response ({}): {}", response.status, response.body);

        if response.status == StatusCode::BAD_REQUEST && reports_no_liquidity(&response.body) {
            info!("0x has no liquidity for {} -> {}", asset_in, asset_out);
            return Ok(None);
        }

        let body = response.into_success()?;
        if is_empty_payload(&body) {
            return Ok(None);
        }

        Ok(Some(body))
    }

    async fn fetch_swap(
        &self,
        asset_out: &str,
        asset_in: &str,
        amount: Decimal,
    ) -> std::result::Result<Option<SwapOrder>, CallError> {
        let Some(quote) = self
            .fetch_quote_payload(asset_out, asset_in, amount, DEFAULT_DECIMALS)
            .await?
        else {
            return Ok(None);
        };

        let signed = match &self.signer {
            Some(signer) => Some(signer.sign(&quote).await.map_err(CallError::Signing)?),
            None => {
                warn!("No order signer configured, returning unsigned 0x quote");
                None
            }
        };

        Ok(Some(SwapOrder::ZeroEx { quote, signed }))
    }
}

fn reports_no_liquidity(body: &Value) -> bool {
    body.get("validationErrors")
        .and_then(Value::as_array)
        .is_some_and(|errors| {
            errors
                .iter()
                .any(|e| e.get("reason").and_then(Value::as_str) == Some(NO_LIQUIDITY_REASON))
        })
}

#[async_trait]
impl AggregatorClient for ZeroExClient {
    fn name(&self) -> &'static str {
        "0x"
    }

    async fn get_quote(
        &self,
        asset_in: &str,
        asset_out: &str,
        amount: Decimal,
    ) -> Result<Option<Decimal>> {
        self.get_quote_with_decimals(asset_in, asset_out, amount, DEFAULT_DECIMALS, DEFAULT_DECIMALS)
            .await
    }

    async fn get_swap(
        &self,
        asset_out: &str,
        asset_in: &str,
        amount: Decimal,
    ) -> Result<Option<SwapOrder>> {
        self.fetch_swap(asset_out, asset_in, amount)
            .await
            .map_err(DxspError::SwapFailed)
    }
}
