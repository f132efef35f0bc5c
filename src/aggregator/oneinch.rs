/*
 * 1inch aggregator client implementation
 */

use async_trait::async_trait;
use num_traits::Zero;
use reqwest::header::HeaderMap;
use reqwest::StatusCode;
use rust_decimal::Decimal;
use serde_json::Value;
use tracing::{debug, info};
use crate::aggregator::{calculation, AggregatorClient};
use crate::config::Config;
use crate::http::{build_headers, HttpClient};
use crate::models::{CallError, DxspError, Result, SwapOrder};
use crate::utils::{
    from_base_units, is_empty_payload, parse_base_units, to_base_units, DEFAULT_DECIMALS,
};

const QUOTE_PRECISION: u32 = 2;
const NO_LIQUIDITY_DESCRIPTION: &str = "insufficient liquidity";

pub struct OneInchClient {
    http: HttpClient,
    headers: HeaderMap,
    base_url: String,
    chain_id: u64,
    wallet_address: String,
    slippage: Decimal,
}

impl OneInchClient {
    pub fn new(config: &Config, http: HttpClient) -> Result<Self> {
        let bearer = config.oneinch.api_key.as_ref().map(|key| format!("Bearer {key}"));
        let headers = build_headers(&[("authorization", bearer.as_deref())])?;

        Ok(Self {
            http,
            headers,
            base_url: config.oneinch.base_url.trim_end_matches('/').to_string(),
            chain_id: config.chain_id,
            wallet_address: config.wallet_address.clone(),
            slippage: config.trading.slippage,
        })
    }

    fn endpoint(&self, path: &str) -> String {
        format!("{}/{}/{path}", self.base_url, self.chain_id)
    }

    async fn fetch_quote(
        &self,
        asset_in: &str,
        asset_out: &str,
        amount: Decimal,
    ) -> std::result::Result<Option<Decimal>, CallError> {
        let amount = to_base_units(amount, DEFAULT_DECIMALS).map_err(calculation)?;
        let query = [
            ("fromTokenAddress", asset_in.to_string()),
            ("toTokenAddress", asset_out.to_string()),
            ("amount", amount.to_string()),
        ];

        let response = self
            .http
            .get(&self.endpoint("quote"), &query, &self.headers)
            .await?;
        debug!("1inch quote response ({}): {}", response.status, response.body);

        if response.status == StatusCode::BAD_REQUEST && reports_no_liquidity(&response.body) {
            info!("1inch has no liquidity for {} -> {}", asset_in, asset_out);
            return Ok(None);
        }

        let body = response.into_success()?;
        if is_empty_payload(&body) {
            return Ok(None);
        }

        let to_amount = parse_base_units(&body["toTokenAmount"], "toTokenAmount")?;
        let quote = from_base_units(&to_amount, DEFAULT_DECIMALS).map_err(calculation)?;

        Ok(Some(quote.round_dp(QUOTE_PRECISION).normalize()))
    }

    async fn fetch_approval(&self, token: &str) -> std::result::Result<Option<Value>, CallError> {
        let query = [
            ("tokenAddress", token.to_string()),
            ("walletAddress", self.wallet_address.clone()),
        ];
        let body = self
            .http
            .get(&self.endpoint("approve/allowance"), &query, &self.headers)
            .await?
            .into_success()?;

        let allowance = parse_base_units(&body["allowance"], "allowance")?;
        debug!("1inch allowance for {}: {}", token, allowance);

        if !allowance.is_zero() {
            return Ok(None);
        }

        let payload = self
            .http
            .get(
                &self.endpoint("approve/transaction"),
                &[("tokenAddress", token.to_string())],
                &self.headers,
            )
            .await?
            .into_success()?;

        Ok(Some(payload))
    }

    async fn fetch_swap(
        &self,
        asset_out: &str,
        asset_in: &str,
        amount: Decimal,
    ) -> std::result::Result<Option<SwapOrder>, CallError> {
        let amount = to_base_units(amount, DEFAULT_DECIMALS).map_err(calculation)?;
        let query = [
            ("fromTokenAddress", asset_out.to_string()),
            ("toTokenAddress", asset_in.to_string()),
            ("amount", amount.to_string()),
            ("fromAddress", self.wallet_address.clone()),
            ("slippage", self.slippage.to_string()),
        ];

        let response = self
            .http
            .get(&self.endpoint("swap"), &query, &self.headers)
            .await?;

        // Error replies carry their own `statusCode`, which wins over the HTTP status.
        let status = response
            .body
            .get("statusCode")
            .and_then(Value::as_u64)
            .unwrap_or_else(|| u64::from(response.status.as_u16()));

        if status != 200 || is_empty_payload(&response.body) {
            info!("1inch swap not available (status {}): {}", status, response.body);
            return Ok(None);
        }

        Ok(Some(SwapOrder::OneInch(response.body)))
    }
}

fn reports_no_liquidity(body: &Value) -> bool {
    body.get("description")
        .and_then(Value::as_str)
        .is_some_and(|d| d.to_lowercase().contains(NO_LIQUIDITY_DESCRIPTION))
}

#[async_trait]
impl AggregatorClient for OneInchClient {
    fn name(&self) -> &'static str {
        "1inch"
    }

    async fn get_quote(
        &self,
        asset_in: &str,
        asset_out: &str,
        amount: Decimal,
    ) -> Result<Option<Decimal>> {
        self.fetch_quote(asset_in, asset_out, amount)
            .await
            .map_err(DxspError::QuoteFailed)
    }

    async fn get_approve(&self, token: &str) -> Result<Option<Value>> {
        self.fetch_approval(token)
            .await
            .map_err(DxspError::ApprovalFailed)
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
