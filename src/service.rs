/*
 * DexSwap facade wiring the configured aggregator and the explorer client
 */

use rust_decimal::Decimal;
use serde_json::Value;
use std::sync::Arc;
use std::time::Duration;
use tracing::info;
use crate::{
    aggregator::{create_aggregator_client, AggregatorClient, OrderSigner},
    config::Config,
    explorer::ExplorerClient,
    http::HttpClient,
    models::{PnlAggregate, Result, SwapOrder},
};

pub struct DexSwap {
    config: Config,
    aggregator: Arc<dyn AggregatorClient>,
    explorer: ExplorerClient,
}

impl DexSwap {
    pub fn new(config: Config) -> Result<Self> {
        Self::with_signer(config, None)
    }

    pub fn with_signer(config: Config, signer: Option<Arc<dyn OrderSigner>>) -> Result<Self> {
        let http = HttpClient::new(Duration::from_secs(config.http.timeout_secs))?;

        let aggregator: Arc<dyn AggregatorClient> =
            Arc::from(create_aggregator_client(&config, http.clone(), signer)?);
        info!("{} aggregator client initialized", aggregator.name());

        let explorer = ExplorerClient::new(&config, http)?;

        Ok(Self {
            config,
            aggregator,
            explorer,
        })
    }

    #[must_use]
    pub fn config(&self) -> &Config {
        &self.config
    }

    #[must_use]
    pub fn aggregator(&self) -> &dyn AggregatorClient {
        self.aggregator.as_ref()
    }

    pub async fn get_quote(
        &self,
        asset_in: &str,
        asset_out: &str,
        amount: Decimal,
    ) -> Result<Option<Decimal>> {
        info!("Requesting {} quote for {} {} -> {}", self.aggregator.name(), amount, asset_in, asset_out);
        let quote = self.aggregator.get_quote(asset_in, asset_out, amount).await?;
        match quote {
            Some(price) => info!("Quote: {}", price),
            None => info!("No quote available for {} -> {}", asset_in, asset_out),
        }
        Ok(quote)
    }

    pub async fn get_approve(&self, token: &str) -> Result<Option<Value>> {
        info!("Checking {} allowance for {}", self.aggregator.name(), token);
        self.aggregator.get_approve(token).await
    }

    pub async fn get_swap(
        &self,
        asset_out: &str,
        asset_in: &str,
        amount: Decimal,
    ) -> Result<Option<SwapOrder>> {
        info!("Requesting {} swap of {} {} -> {}", self.aggregator.name(), amount, asset_out, asset_in);
        self.aggregator.get_swap(asset_out, asset_in, amount).await
    }

    pub async fn get_abi(&self, address: &str) -> Result<Option<String>> {
        self.explorer.get_abi(address).await
    }

    /// Transfer totals of `contract_address` for the configured wallet.
    pub async fn get_account_transactions(
        &self,
        contract_address: &str,
        period_hours: u32,
    ) -> Result<PnlAggregate> {
        self.explorer
            .get_account_transactions(contract_address, &self.config.wallet_address, period_hours)
            .await
    }
}
