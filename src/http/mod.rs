/*
 * Thin JSON-over-HTTP GET wrapper shared by the provider clients
 */

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, StatusCode};
use serde_json::Value;
use std::time::Duration;
use tracing::debug;
use crate::models::{CallError, DxspError, Result};

#[derive(Debug, Clone)]
pub struct HttpClient {
    client: Client,
}

#[derive(Debug, Clone)]
pub struct JsonResponse {
    pub status: StatusCode,
    pub body: Value,
}

impl JsonResponse {
    /// Returns the body, or the status as an error for non-2xx replies.
    pub fn into_success(self) -> std::result::Result<Value, CallError> {
        if self.status.is_success() {
            Ok(self.body)
        } else {
            Err(CallError::Status {
                status: self.status.as_u16(),
                body: self.body.to_string(),
            })
        }
    }
}

impl HttpClient {
    pub fn new(timeout: Duration) -> Result<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| DxspError::ConfigError(format!("Failed to build HTTP client: {e}")))?;
        Ok(Self { client })
    }

    pub async fn get(
        &self,
        url: &str,
        query: &[(&str, String)],
        headers: &HeaderMap,
    ) -> std::result::Result<JsonResponse, CallError> {
        debug!("GET {} {:?}", url, query);

        let response = self
            .client
            .get(url)
            .headers(headers.clone())
            .query(query)
            .send()
            .await?;

        let status = response.status();
        let text = response.text().await?;

        if text.trim().is_empty() {
            return Ok(JsonResponse { status, body: Value::Null });
        }

        match serde_json::from_str(&text) {
            Ok(body) => Ok(JsonResponse { status, body }),
            Err(_) if !status.is_success() => Err(CallError::Status {
                status: status.as_u16(),
                body: text,
            }),
            Err(e) => Err(CallError::Serialization(e)),
        }
    }
}

/// Builds a header map from static names and configured values.
pub fn build_headers(pairs: &[(&'static str, Option<&str>)]) -> Result<HeaderMap> {
    let mut headers = HeaderMap::new();
    headers.insert(
        HeaderName::from_static("accept"),
        HeaderValue::from_static("application/json"),
    );

    for (name, value) in pairs {
        let Some(value) = value else { continue };
        let value = HeaderValue::from_str(value)
            .map_err(|e| DxspError::ConfigError(format!("Invalid value for header {name}: {e}")))?;
        headers.insert(HeaderName::from_static(*name), value);
    }

    Ok(headers)
}
