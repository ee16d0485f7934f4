use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Deserialize;
use tracing::debug;

use crate::error::LedgerError;
use crate::utils::serde_helpers::{opt_i64, opt_string_or_number, opt_u32, opt_u64};
use crate::Result;

pub const SOURCE_NAME: &str = "tronscan";

const API_KEY_HEADER: &str = "TRON-PRO-API-KEY";

/// Page wrapper of the `/transfer/*` endpoints
#[derive(Debug, Deserialize)]
struct TransferPage {
    #[serde(default)]
    data: Option<Vec<TronscanTransfer>>,
    #[serde(default)]
    message: Option<String>,
}

/// Token metadata embedded in transfer rows
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TokenInfo {
    #[serde(default, rename = "tokenAbbr")]
    pub symbol: Option<String>,
    #[serde(default, deserialize_with = "opt_u32")]
    pub decimals: Option<u32>,
    #[serde(default, rename = "tokenDecimal", deserialize_with = "opt_u32")]
    pub token_decimal: Option<u32>,
}

impl TokenInfo {
    /// Decimals stated by the token, whichever key the endpoint used
    pub fn decimals(&self) -> Option<u32> {
        self.decimals.or(self.token_decimal)
    }
}

/// One row of `/transfer/trx` or `/transfer/trc20`
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct TronscanTransfer {
    /// Set by `/transfer/trx`
    #[serde(default)]
    pub hash: Option<String>,
    /// Set by `/transfer/trc20`
    #[serde(default, rename = "transactionHash")]
    pub transaction_hash: Option<String>,
    #[serde(default, deserialize_with = "opt_u64")]
    pub block: Option<u64>,
    /// Milliseconds since the epoch
    #[serde(default, deserialize_with = "opt_i64")]
    pub block_timestamp: Option<i64>,
    #[serde(default)]
    pub from: Option<String>,
    #[serde(default)]
    pub to: Option<String>,
    #[serde(default, deserialize_with = "opt_string_or_number")]
    pub amount: Option<String>,
    #[serde(default, alias = "tokenInfo")]
    pub token_info: Option<TokenInfo>,
    /// Contract execution result, "SUCCESS" unless the transaction failed
    #[serde(default, rename = "contractRet")]
    pub contract_ret: Option<String>,
}

impl TronscanTransfer {
    /// Block time truncated to whole seconds
    pub fn timestamp_seconds(&self) -> Option<i64> {
        self.block_timestamp.map(|ms| ms.div_euclid(1000))
    }

    pub fn tx_hash(&self) -> Option<&str> {
        self.hash.as_deref().or(self.transaction_hash.as_deref())
    }

    pub fn token_decimals(&self) -> Option<u32> {
        self.token_info.as_ref().and_then(TokenInfo::decimals)
    }

    pub fn is_failed(&self) -> bool {
        self.contract_ret
            .as_deref()
            .is_some_and(|ret| !ret.trim().eq_ignore_ascii_case("SUCCESS"))
    }
}

/// Primitive Tronscan calls the Tron adapter composes
#[async_trait]
pub trait TronscanApi: Send + Sync {
    /// TRX transfers (`/transfer/trx`)
    async fn fetch_trx_transfers(&self, address: &str) -> Result<Vec<TronscanTransfer>>;

    /// TRC20 transfers of one contract (`/transfer/trc20`)
    async fn fetch_trc20_transfers(&self, address: &str, contract_address: &str) -> Result<Vec<TronscanTransfer>>;
}

/// HTTP client for the Tronscan transfer API
#[derive(Debug, Clone)]
pub struct TronscanClient {
    http: Client,
    base_url: String,
    api_key: Option<String>,
    page_limit: u32,
}

impl TronscanClient {
    /// Create a client whose every request gives up after `timeout`
    pub fn new(
        base_url: impl Into<String>,
        api_key: Option<String>,
        timeout: Duration,
        page_limit: u32,
    ) -> Result<Self> {
        let http = Client::builder()
            .timeout(timeout)
            .user_agent(concat!("wallet-ledger/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| LedgerError::Config(format!("failed to create HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key,
            page_limit,
        })
    }

    async fn transfers(&self, path: &str, params: &[(&str, &str)]) -> Result<Vec<TronscanTransfer>> {
        let url = format!("{}/{}", self.base_url, path);
        let limit = self.page_limit.to_string();
        let mut query: Vec<(&str, &str)> = vec![
            ("start", "0"),
            ("limit", limit.as_str()),
            ("direction", "0"),
            ("reverse", "true"),
            ("db_version", "1"),
        ];
        query.extend_from_slice(params);

        let mut request = self.http.get(&url).query(&query);
        if let Some(key) = &self.api_key {
            request = request.header(API_KEY_HEADER, key);
        }

        debug!("GET {}", url);
        let response = request
            .send()
            .await
            .and_then(|r| r.error_for_status())
            .map_err(|e| LedgerError::from_http(SOURCE_NAME, e))?;
        let body = response
            .text()
            .await
            .map_err(|e| LedgerError::from_http(SOURCE_NAME, e))?;

        let rows = parse_transfer_page(&body)?;
        debug!("Tronscan {} returned {} rows", path, rows.len());
        Ok(rows)
    }
}

#[async_trait]
impl TronscanApi for TronscanClient {
    async fn fetch_trx_transfers(&self, address: &str) -> Result<Vec<TronscanTransfer>> {
        self.transfers(
            "transfer/trx",
            &[("address", address), ("sort", "-timestamp"), ("fee", "true")],
        )
        .await
    }

    async fn fetch_trc20_transfers(&self, address: &str, contract_address: &str) -> Result<Vec<TronscanTransfer>> {
        self.transfers("transfer/trc20", &[("address", address), ("trc20Id", contract_address)])
            .await
    }
}

/// Decode a transfer page; a body without a `data` array is an upstream failure
pub fn parse_transfer_page(body: &str) -> Result<Vec<TronscanTransfer>> {
    let page: TransferPage = serde_json::from_str(body).map_err(|e| LedgerError::from_decode(SOURCE_NAME, e))?;
    page.data.ok_or_else(|| {
        let detail = page
            .message
            .map(|m| format!("response has no data array: {}", m))
            .unwrap_or_else(|| "response has no data array".to_string());
        LedgerError::source_unavailable(SOURCE_NAME, detail)
    })
}
