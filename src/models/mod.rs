/*
 * Data models and error types shared by the aggregator and explorer clients
 */

use chrono::{DateTime, Utc};
use num_bigint::BigUint;
use serde::Serialize;
use serde_json::Value;
use std::collections::BTreeMap;
use thiserror::Error;

/// A swap order as returned by the provider. Shapes are kept verbatim.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "provider", content = "order", rename_all = "lowercase")]
pub enum SwapOrder {
    /// Transaction payload from the 1inch `/swap` endpoint.
    OneInch(Value),
    /// 0x quote, plus the signed order when a signer was available.
    ZeroEx { quote: Value, signed: Option<Value> },
}

/// One ERC-20 transfer from the explorer's `tokentx` listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferEntry {
    pub token_symbol: Option<String>,
    pub value: BigUint,
    pub timestamp: DateTime<Utc>,
}

/// Transferred value summed per token symbol over a trailing window.
///
/// The explorer serves a single page of at most 100 transfers. When
/// `page_full` is set, older transfers inside the window may be missing
/// and the totals under-count.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PnlAggregate {
    pub total: BigUint,
    pub by_token: BTreeMap<String, BigUint>,
    pub page_full: bool,
}

/// Underlying cause of a failed provider call.
#[derive(Debug, Error)]
pub enum CallError {
    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("HTTP status {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Missing field `{0}` in response")]
    MissingField(&'static str),

    #[error("Malformed field `{field}`: {value}")]
    MalformedField { field: &'static str, value: String },

    #[error("Calculation error: {0}")]
    Calculation(String),

    #[error("Signing error: {0}")]
    Signing(String),
}

#[derive(Debug, Error)]
pub enum DxspError {
    #[error("Quote failed: {0}")]
    QuoteFailed(#[source] CallError),

    #[error("Approval failed: {0}")]
    ApprovalFailed(#[source] CallError),

    #[error("Swap failed: {0}")]
    SwapFailed(#[source] CallError),

    #[error("Explorer request failed: {0}")]
    ExplorerFailed(#[source] CallError),

    #[error("{0} is not configured")]
    NotConfigured(&'static str),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Calculation error: {0}")]
    CalculationError(String),
}

pub type Result<T> = std::result::Result<T, DxspError>;
