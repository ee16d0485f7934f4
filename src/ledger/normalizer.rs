//! Raw integer amounts to human-scale decimals.
//!
//! Amounts stay in `rust_decimal` from parsing through the running balances,
//! so 18-decimal values never pass through `f64`.

use rust_decimal::Decimal;
use tracing::{debug, warn};

use crate::error::LedgerError;
use crate::models::{AssetCategory, Network, NormalizedTransaction, RawTransferRecord};
use crate::Result;

/// Decimals assumed for a token whose contract metadata is unavailable
pub const DEFAULT_TOKEN_DECIMALS: u32 = 6;

/// Largest power of ten a single `Decimal` division step may use
const MAX_SCALE_STEP: u32 = 28;

/// Significant digits kept from a raw amount
const MAX_SIGNIFICANT_DIGITS: usize = 28;

/// Largest scale a `Decimal` can carry
const MAX_DECIMAL_SCALE: i64 = 28;

fn integer_digits(raw: &str) -> Result<&str> {
    let digits = raw.trim();
    if digits.is_empty() {
        return Err(LedgerError::invalid_amount(raw, "empty amount"));
    }
    if !digits.bytes().all(|b| b.is_ascii_digit()) {
        return Err(LedgerError::invalid_amount(raw, "not a non-negative integer"));
    }
    Ok(digits)
}

/// Parse a non-negative integer string, rounded to 28 significant digits
pub fn parse_raw_amount(raw: &str) -> Result<Decimal> {
    normalize(raw, 0)
}

fn power_of_ten(exp: u32) -> Result<Decimal> {
    let value = 10i128
        .checked_pow(exp)
        .ok_or_else(|| LedgerError::invalid_amount(format!("1e{}", exp), "scale overflow"))?;
    Decimal::try_from_i128_with_scale(value, 0)
        .map_err(|e| LedgerError::invalid_amount(format!("1e{}", exp), e.to_string()))
}

/// Divide by 10^decimals without leaving decimal arithmetic
pub fn scale_down(value: Decimal, decimals: u32) -> Result<Decimal> {
    let mut result = value;
    let mut remaining = decimals;
    while remaining > 0 {
        let step = remaining.min(MAX_SCALE_STEP);
        result = result
            .checked_div(power_of_ten(step)?)
            .ok_or_else(|| LedgerError::invalid_amount(value.to_string(), "division overflow"))?;
        remaining -= step;
    }
    Ok(result.normalize())
}

/// Round `mantissa / 10^places` half up
fn drop_digits(mantissa: i128, places: u32) -> i128 {
    match 10i128.checked_pow(places) {
        Some(divisor) => {
            let quotient = mantissa / divisor;
            if (mantissa % divisor) * 2 >= divisor {
                quotient + 1
            } else {
                quotient
            }
        }
        None => 0,
    }
}

/// `raw / 10^decimals`, always non-negative.
///
/// The decimal point is placed on the digit string, so raw integers of any
/// length are accepted. The result keeps 28 significant digits; only a
/// scaled value above `Decimal::MAX` is rejected.
pub fn normalize(raw: &str, decimals: u32) -> Result<Decimal> {
    let significant = integer_digits(raw)?.trim_start_matches('0');
    if significant.is_empty() {
        return Ok(Decimal::ZERO);
    }

    // value = mantissa * 10^exponent
    let keep = significant.len().min(MAX_SIGNIFICANT_DIGITS);
    let (head, tail) = significant.split_at(keep);
    let mut mantissa: i128 = head
        .parse()
        .map_err(|_| LedgerError::invalid_amount(raw, "not a non-negative integer"))?;
    if tail.bytes().next().is_some_and(|b| b >= b'5') {
        mantissa += 1;
    }
    let mut exponent = tail.len() as i64 - i64::from(decimals);

    if exponent < -MAX_DECIMAL_SCALE {
        mantissa = drop_digits(mantissa, (-MAX_DECIMAL_SCALE - exponent) as u32);
        exponent = -MAX_DECIMAL_SCALE;
    }

    let value = if exponent >= 0 {
        u32::try_from(exponent)
            .ok()
            .and_then(|e| 10i128.checked_pow(e))
            .and_then(|p| mantissa.checked_mul(p))
            .and_then(|v| Decimal::try_from_i128_with_scale(v, 0).ok())
    } else {
        Decimal::try_from_i128_with_scale(mantissa, (-exponent) as u32).ok()
    };
    value
        .map(|d| d.normalize())
        .ok_or_else(|| LedgerError::invalid_amount(raw, "exceeds the decimal range"))
}

/// Decimal count for an asset:
///
/// | network  | native / internal | token                     |
/// |----------|-------------------|---------------------------|
/// | Ethereum | 18                | contract decimals, else 6 |
/// | Tron     | 6                 | contract decimals, else 6 |
pub fn resolve_decimals(network: Network, category: AssetCategory, contract_decimals: Option<u32>) -> u32 {
    match category {
        AssetCategory::Native | AssetCategory::Internal => network.native_decimals(),
        AssetCategory::Token => contract_decimals.unwrap_or(DEFAULT_TOKEN_DECIMALS),
    }
}

fn require<'a>(value: &'a Option<String>, hash: &str, field: &'static str) -> Result<&'a str> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(LedgerError::MalformedRecord {
            hash: hash.to_string(),
            field,
        }),
    }
}

/// Validate one raw record and scale its amount
pub fn normalize_record(raw: RawTransferRecord) -> Result<NormalizedTransaction> {
    let hash = raw.display_hash().to_string();
    let timestamp = raw.timestamp.ok_or_else(|| LedgerError::MalformedRecord {
        hash: hash.clone(),
        field: "timestamp",
    })?;
    let from = require(&raw.from, &hash, "from")?.to_string();
    let to = require(&raw.to, &hash, "to")?.to_string();
    let raw_amount = require(&raw.raw_amount, &hash, "amount")?.to_string();

    if raw.category == AssetCategory::Token && raw.decimals.is_none() {
        warn!(
            "No contract decimals for {} transfer {}, assuming {}",
            raw.asset_symbol, hash, DEFAULT_TOKEN_DECIMALS
        );
    }
    let decimals = resolve_decimals(raw.network, raw.category, raw.decimals);
    let amount = normalize(&raw_amount, decimals)?;

    Ok(NormalizedTransaction {
        hash: raw.hash,
        block_height: raw.block_height,
        timestamp,
        from,
        to,
        raw_amount,
        amount,
        decimals,
        asset_symbol: raw.asset_symbol.trim().to_ascii_uppercase(),
        category: raw.category,
        network: raw.network,
        gas_price: raw.gas_price,
        gas_used: raw.gas_used,
    })
}

/// Normalize a batch, skipping (and counting) records that fail on their own.
/// Reverted transactions moved no value and are dropped without counting.
pub fn normalize_batch(records: Vec<RawTransferRecord>) -> (Vec<NormalizedTransaction>, usize) {
    let total = records.len();
    let mut normalized = Vec::with_capacity(total);
    let mut skipped = 0;
    let mut reverted = 0;

    for record in records {
        if record.failed {
            debug!("Dropping reverted transaction {}", record.display_hash());
            reverted += 1;
            continue;
        }
        match normalize_record(record) {
            Ok(tx) => normalized.push(tx),
            Err(e) => {
                warn!("Skipping record: {}", e);
                skipped += 1;
            }
        }
    }

    debug!(
        "Normalized {} of {} records ({} skipped, {} reverted)",
        normalized.len(),
        total,
        skipped,
        reverted
    );
    (normalized, skipped)
}
