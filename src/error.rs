use thiserror::Error;

use crate::models::network::Network;

/// Errors produced while building a wallet ledger
#[derive(Error, Debug)]
pub enum LedgerError {
    /// Raw amount is not a non-negative integer string
    #[error("invalid amount {raw:?}: {reason}")]
    InvalidAmount { raw: String, reason: String },

    /// Upstream explorer call failed, timed out or returned an unexpected shape
    #[error("{source_name} unavailable: {detail}")]
    SourceUnavailable { source_name: String, detail: String },

    /// Record is missing a field the ledger needs
    #[error("malformed record {hash}: missing {field}")]
    MalformedRecord { hash: String, field: &'static str },

    /// Nothing left to show after fetching and filtering
    #[error("no transactions found for {address} ({filter}) on {network}")]
    NoTransactionsFound {
        address: String,
        network: Network,
        filter: String,
    },

    /// Asset filter names a token the registry does not know for this network
    #[error("no token contract registered for {symbol} on {network}")]
    UnknownAsset { symbol: String, network: Network },

    #[error("configuration error: {0}")]
    Config(String),
}

impl LedgerError {
    pub fn source_unavailable(source_name: impl Into<String>, detail: impl Into<String>) -> Self {
        Self::SourceUnavailable {
            source_name: source_name.into(),
            detail: detail.into(),
        }
    }

    pub fn invalid_amount(raw: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidAmount {
            raw: raw.into(),
            reason: reason.into(),
        }
    }

    /// Per-record errors are skipped and counted instead of failing the request
    pub fn is_record_level(&self) -> bool {
        matches!(self, Self::InvalidAmount { .. } | Self::MalformedRecord { .. })
    }

    /// Map an HTTP client failure from a named provider
    pub fn from_http(source_name: &str, err: reqwest::Error) -> Self {
        let detail = if err.is_timeout() {
            format!("request timed out: {}", err)
        } else if let Some(status) = err.status() {
            format!("HTTP {}: {}", status, err)
        } else {
            err.to_string()
        };
        Self::source_unavailable(source_name, detail)
    }

    /// Map a response decoding failure from a named provider
    pub fn from_decode(source_name: &str, err: serde_json::Error) -> Self {
        Self::source_unavailable(source_name, format!("malformed response: {}", err))
    }
}
