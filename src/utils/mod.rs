/*
 * Utility functions and helpers
 */

use num_bigint::BigUint;
use num_traits::ToPrimitive;
use rust_decimal::Decimal;
use serde_json::Value;
use crate::models::{CallError, DxspError, Result};

/// Decimal count assumed when a token's decimals are not looked up.
pub const DEFAULT_DECIMALS: u8 = 18;

const MAX_SCALE: u32 = 28;

fn pow10(exponent: u32) -> BigUint {
    BigUint::from(10u32).pow(exponent)
}

/// Converts a human-readable amount into base units. Fractional digits beyond
/// `decimals` are truncated.
pub fn to_base_units(amount: Decimal, decimals: u8) -> Result<BigUint> {
    if amount.is_sign_negative() && !amount.is_zero() {
        return Err(DxspError::CalculationError(format!("Negative amount: {amount}")));
    }

    let mantissa = BigUint::from(amount.mantissa().unsigned_abs());
    let scale = amount.scale();
    let decimals = u32::from(decimals);

    if decimals >= scale {
        Ok(mantissa * pow10(decimals - scale))
    } else {
        Ok(mantissa / pow10(scale - decimals))
    }
}

/// Converts base units back into a human-readable amount.
///
/// Values wider than a `Decimal` mantissa lose their least significant
/// digits; only an integer part too large to represent is an error.
pub fn from_base_units(amount: &BigUint, decimals: u8) -> Result<Decimal> {
    let limit = BigUint::from(1u128 << 96);
    let mut mantissa = amount.clone();
    let mut scale = u32::from(decimals);

    while scale > MAX_SCALE || mantissa >= limit {
        if scale == 0 {
            return Err(DxspError::CalculationError(format!(
                "Amount {amount} exceeds decimal range"
            )));
        }
        mantissa /= 10u32;
        scale -= 1;
    }

    let mantissa = mantissa.to_i128().ok_or_else(|| {
        DxspError::CalculationError(format!("Failed to convert amount {amount}"))
    })?;

    Decimal::try_from_i128_with_scale(mantissa, scale)
        .map_err(|e| DxspError::CalculationError(format!("Failed to convert amount: {e}")))
}

/// Reads an integer base-unit amount from a JSON string or number.
pub fn parse_base_units(value: &Value, field: &'static str) -> std::result::Result<BigUint, CallError> {
    let raw = match value {
        Value::String(s) => s.trim().to_string(),
        Value::Number(n) => n.to_string(),
        Value::Null => return Err(CallError::MissingField(field)),
        other => other.to_string(),
    };

    raw.parse::<BigUint>().map_err(|_| CallError::MalformedField { field, value: raw })
}

/// `null`, `{}`, `[]`, `""` and `false` all mean the provider returned nothing.
#[must_use]
pub fn is_empty_payload(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
        Value::Number(_) => false,
    }
}

pub fn format_address(address: &str) -> Result<String> {
    let hex = address.strip_prefix("0x").unwrap_or_default();
    if !address.starts_with("0x") || address.len() != 42 || !hex.chars().all(|c| c.is_ascii_hexdigit()) {
        return Err(DxspError::ConfigError(format!("Invalid address format: {address}")));
    }
    Ok(address.to_lowercase())
}
