/*
 * Etherscan-style block explorer client: contract ABIs and token transfer history
 */

use chrono::{DateTime, Duration, Utc};
use num_bigint::BigUint;
use reqwest::header::HeaderMap;
use serde::Deserialize;
use serde_json::Value;
use tracing::{debug, info, warn};
use crate::config::Config;
use crate::http::{build_headers, HttpClient};
use crate::models::{CallError, DxspError, PnlAggregate, Result, TransferEntry};
use crate::utils::parse_base_units;

pub const DEFAULT_PERIOD_HOURS: u32 = 24;

/// The explorer serves at most this many transfers per call. Only the first
/// page is read.
pub const TRANSFER_PAGE_SIZE: usize = 100;

pub struct ExplorerClient {
    http: HttpClient,
    headers: HeaderMap,
    base_url: String,
    api_key: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ExplorerResponse {
    #[serde(default)]
    status: Value,
    #[serde(default)]
    result: Value,
}

impl ExplorerResponse {
    fn is_ok(&self) -> bool {
        self.status.as_str() == Some("1")
    }
}

#[derive(Debug, Deserialize)]
struct RawTransfer {
    #[serde(rename = "tokenSymbol", default)]
    token_symbol: Option<String>,
    #[serde(default)]
    value: Value,
    #[serde(rename = "timeStamp", default)]
    time_stamp: Value,
}

impl ExplorerClient {
    pub fn new(config: &Config, http: HttpClient) -> Result<Self> {
        Ok(Self {
            http,
            headers: build_headers(&[])?,
            base_url: config.explorer.base_url.clone(),
            api_key: config.explorer.api_key.clone(),
        })
    }

    fn api_key(&self) -> Result<&str> {
        self.api_key
            .as_deref()
            .ok_or(DxspError::NotConfigured("block explorer API key"))
    }

    async fn fetch(&self, query: &[(&str, String)]) -> std::result::Result<ExplorerResponse, CallError> {
        let body = self
            .http
            .get(&self.base_url, query, &self.headers)
            .await?
            .into_success()?;
        Ok(serde_json::from_value(body)?)
    }

    /// Verified ABI for `address`, or `None` when the explorer key is absent,
    /// the contract is unverified, or the explorer refused the call.
    pub async fn get_abi(&self, address: &str) -> Result<Option<String>> {
        let api_key = match self.api_key() {
            Ok(key) => key.to_string(),
            Err(e) => {
                debug!("{}, skipping ABI lookup", e);
                return Ok(None);
            }
        };

        let query = [
            ("module", "contract".to_string()),
            ("action", "getabi".to_string()),
            ("address", address.to_string()),
            ("apikey", api_key),
        ];
        let response = self.fetch(&query).await.map_err(DxspError::ExplorerFailed)?;

        if !response.is_ok() {
            debug!("No ABI for {}: {}", address, response.result);
            return Ok(None);
        }

        Ok(match response.result {
            Value::String(abi) => Some(abi),
            other => {
                debug!("Unexpected ABI payload for {}: {}", address, other);
                None
            }
        })
    }

    /// Sums transferred value per token symbol over the last `period_hours`.
    ///
    /// Only the most recent `TRANSFER_PAGE_SIZE` transfers are considered;
    /// `page_full` on the result flags that the window may be truncated.
    pub async fn get_account_transactions(
        &self,
        contract_address: &str,
        wallet_address: &str,
        period_hours: u32,
    ) -> Result<PnlAggregate> {
        let api_key = match self.api_key() {
            Ok(key) => key.to_string(),
            Err(e) => {
                debug!("{}, returning empty aggregate", e);
                return Ok(PnlAggregate::default());
            }
        };

        let query = [
            ("module", "account".to_string()),
            ("action", "tokentx".to_string()),
            ("contractaddress", contract_address.to_string()),
            ("address", wallet_address.to_string()),
            ("page", "1".to_string()),
            ("offset", TRANSFER_PAGE_SIZE.to_string()),
            ("startblock", "0".to_string()),
            ("endblock", "99999999".to_string()),
            ("sort", "desc".to_string()),
            ("apikey", api_key),
        ];
        let response = self.fetch(&query).await.map_err(DxspError::ExplorerFailed)?;

        if !response.is_ok() {
            debug!("No transfers for {}: {}", wallet_address, response.result);
            return Ok(PnlAggregate::default());
        }

        let raw: Vec<RawTransfer> = serde_json::from_value(response.result)
            .map_err(|e| DxspError::ExplorerFailed(e.into()))?;
        let page_full = raw.len() >= TRANSFER_PAGE_SIZE;

        let mut entries = Vec::with_capacity(raw.len());
        for transfer in raw {
            if let Some(entry) = to_entry(transfer).map_err(DxspError::ExplorerFailed)? {
                entries.push(entry);
            }
        }

        let mut aggregate =
            aggregate_transfers(&entries, Utc::now(), Duration::hours(i64::from(period_hours)));
        aggregate.page_full = page_full;

        if page_full {
            warn!(
                "Explorer returned a full page of {} transfers, totals may under-count",
                TRANSFER_PAGE_SIZE
            );
        }
        info!(
            "Aggregated {} transfers for {} over {}h: total {}",
            entries.len(),
            wallet_address,
            period_hours,
            aggregate.total
        );

        Ok(aggregate)
    }
}

/// Entries without a timestamp yield `None`. A missing value counts as zero.
fn to_entry(raw: RawTransfer) -> std::result::Result<Option<TransferEntry>, CallError> {
    let seconds = match &raw.time_stamp {
        Value::Null => return Ok(None),
        Value::String(s) => s.trim().parse::<i64>().ok(),
        Value::Number(n) => n.as_i64(),
        _ => None,
    };
    let timestamp = seconds
        .and_then(|s| DateTime::from_timestamp(s, 0))
        .ok_or_else(|| CallError::MalformedField {
            field: "timeStamp",
            value: raw.time_stamp.to_string(),
        })?;

    let value = if raw.value.is_null() {
        BigUint::default()
    } else {
        parse_base_units(&raw.value, "value")?
    };

    Ok(Some(TransferEntry {
        token_symbol: raw.token_symbol,
        value,
        timestamp,
    }))
}

/// Sums entries whose timestamp lies in `[now - period, now]` and that carry
/// a non-empty token symbol.
#[must_use]
pub fn aggregate_transfers(
    entries: &[TransferEntry],
    now: DateTime<Utc>,
    period: Duration,
) -> PnlAggregate {
    // A window reaching past chrono's range covers all history.
    let start = now.checked_sub_signed(period).unwrap_or(DateTime::<Utc>::MIN_UTC);
    let mut aggregate = PnlAggregate::default();

    for entry in entries {
        if entry.timestamp < start || entry.timestamp > now {
            continue;
        }
        let Some(symbol) = entry.token_symbol.as_deref().filter(|s| !s.is_empty()) else {
            continue;
        };

        *aggregate.by_token.entry(symbol.to_string()).or_default() += &entry.value;
        aggregate.total += &entry.value;
    }

    aggregate
}
