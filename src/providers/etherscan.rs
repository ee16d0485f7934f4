// In src/providers/etherscan.rs

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::error::LedgerError;
use crate::utils::serde_helpers::{opt_i64, opt_string_or_number, opt_u32, opt_u64};
use crate::Result;

pub const SOURCE_NAME: &str = "etherscan";

/// Etherscan answers "nothing here" with status 0 and this message
const EMPTY_MESSAGE: &str = "No transactions found";

/// Envelope shared by every `module=account` response
#[derive(Debug, Deserialize)]
struct Envelope {
    status: String,
    #[serde(default)]
    message: String,
    #[serde(default)]
    result: Value,
}

/// One row of `txlist`, `txlistinternal` or `tokentx`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EtherscanTx {
    #[serde(default)]
    pub hash: Option<String>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub block_number: Option<u64>,
    #[serde(default, deserialize_with = "opt_i64")]
    pub time_stamp: Option<i64>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub value: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub gas_price: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub gas_used: Option<String>,
    #[serde(default)]
    pub contract_address: Option<String>,
    #[serde(default)]
    pub token_symbol: Option<String>,
    #[serde(default, deserialize_with = "opt_u32")]
    pub token_decimal: Option<u32>,
    /// "1" when the call reverted
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub is_error: Option<String>,
    /// "0" when the receipt reports failure (`txlist` only)
    #[serde(default, rename = "txreceipt_status", deserialize_with = "opt_string_or_number")]
    pub txreceipt_status: Option<String>,
}

impl EtherscanTx {
    /// Reverted transactions still show the value they tried to move
    pub fn is_failed(&self) -> bool {
        self.is_error.as_deref().map(str::trim) == Some("1")
            || self.txreceipt_status.as_deref().map(str::trim) == Some("0")
    }
}

/// Primitive Etherscan calls the EVM adapter composes
#[async_trait]
pub trait EtherscanApi: Send + Sync {
    /// Normal transactions (`txlist`)
    async fn fetch_native_transfers(&self, address: &str) -> Result<Vec<EtherscanTx>>;

    /// Contract-triggered value transfers (`txlistinternal`)
    async fn fetch_internal_transfers(&self, address: &str) -> Result<Vec<EtherscanTx>>;

    /// ERC20 transfers of one contract (`tokentx`)
    async fn fetch_token_transfers(&self, address: &str, contract_address: &str) -> Result<Vec<EtherscanTx>>;
}

/// HTTP client for the Etherscan account API
#[derive(Debug, Clone)]
pub struct EtherscanClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
}

impl EtherscanClient {
    /// Create a client whose every request gives up after `timeout`
    pub fn new(base_url: impl Into<String>, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wallet-ledger/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LedgerError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key,
        })
    }

    async fn account_query(&self, action: &str, params: &[(&str, &str)]) -> Result<Vec<EtherscanTx>> {
        let mut query: Vec<(&str, &str)> = vec![
            ("module", "account"),
            ("action", action),
            ("startblock", "0"),
            ("endblock", "99999999"),
            ("sort", "asc"),
        ];
        query.extend_from_slice(params);
        if let Some(key) = &self.api_key {
            query.push(("apikey", key.as_str()));
        }

        debug!("GET {} action={}", self.base_url, action);
        let response = self
            .http
            .get(&self.base_url)
            .query(&query)
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| LedgerError::from_http(SOURCE_NAME, e))?;
        let body = response
            .text()
            .await
            .map_err(|e| LedgerError::from_http(SOURCE_NAME, e))?;

        let rows = parse_account_response(&body)?;
        debug!("Etherscan {} returned {} rows", action, rows.len());
        Ok(rows)
    }
}

#[async_trait]
impl EtherscanApi for EtherscanClient {
    async fn fetch_native_transfers(&self, address: &str) -> Result<Vec<EtherscanTx>> {
        self.account_query("txlist", &[("address", address)]).await
    }

    async fn fetch_internal_transfers(&self, address: &str) -> Result<Vec<EtherscanTx>> {
        self.account_query("txlistinternal", &[("address", address)]).await
    }

    async fn fetch_token_transfers(&self, address: &str, contract_address: &str) -> Result<Vec<EtherscanTx>> {
        self.account_query("tokentx", &[("address", address), ("contractaddress", contract_address)])
            .await
    }
}

/// Decode an account response. "No transactions found" is an empty list,
/// any other status 0 is an upstream failure.
pub fn parse_account_response(body: &str) -> Result<Vec<EtherscanTx>> {
    let envelope: Envelope = serde_json::from_str(body).map_err(|e| LedgerError::from_decode(SOURCE_NAME, e))?;

    if envelope.status == "1" {
        return match envelope.result {
            Value::Array(_) => {
                serde_json::from_value(envelope.result).map_err(|e| LedgerError::from_decode(SOURCE_NAME, e))
            }
            other => Err(LedgerError::source_unavailable(
                SOURCE_NAME,
                format!("expected a result array, got {}", other),
            )),
        };
    }

    let empty_result = matches!(&envelope.result, Value::Array(rows) if rows.is_empty());
    if envelope.message.starts_with(EMPTY_MESSAGE) || empty_result {
        return Ok(Vec::new());
    }

    let detail = match envelope.result {
        Value::String(s) => format!("{}: {}", envelope.message, s),
        Value::Null => envelope.message,
        other => format!("{}: {}", envelope.message, other),
    };
    Err(LedgerError::source_unavailable(SOURCE_NAME, detail))
}
