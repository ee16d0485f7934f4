use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use crate::error::LedgerError;
use crate::ledger::NoiseRule;
use crate::Result;

pub const DEFAULT_ETHERSCAN_API_URL: &str = "https://api.etherscan.io/api";
pub const DEFAULT_TRONSCAN_API_URL: &str = "https://apilist.tronscanapi.com/api";
pub const DEFAULT_TIMEOUT_MS: u64 = 15_000;
pub const DEFAULT_TRONSCAN_PAGE_LIMIT: u32 = 10_000;

/// Settings for building a `LedgerTracker` against the live explorers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackerConfig {
    pub etherscan_api_url: String,
    pub etherscan_api_key: Option<String>,
    pub tronscan_api_url: String,
    pub tronscan_api_key: Option<String>,
    pub request_timeout: Duration,
    pub tronscan_page_limit: u32,
    pub token_registry_path: Option<PathBuf>,
    pub noise_rule: NoiseRule,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            etherscan_api_url: DEFAULT_ETHERSCAN_API_URL.to_string(),
            etherscan_api_key: None,
            tronscan_api_url: DEFAULT_TRONSCAN_API_URL.to_string(),
            tronscan_api_key: None,
            request_timeout: Duration::from_millis(DEFAULT_TIMEOUT_MS),
            tronscan_page_limit: DEFAULT_TRONSCAN_PAGE_LIMIT,
            token_registry_path: None,
            noise_rule: NoiseRule::default(),
        }
    }
}

impl TrackerConfig {
    /// Read configuration from the process environment
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Read configuration through an arbitrary variable lookup
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        // Unset and blank are the same thing
        let var = |key: &str| lookup(key).map(|v| v.trim().to_string()).filter(|v| !v.is_empty());
        let defaults = Self::default();

        let timeout_ms: u64 = parse_var("REQUEST_TIMEOUT_MS", var("REQUEST_TIMEOUT_MS"))?.unwrap_or(DEFAULT_TIMEOUT_MS);
        if timeout_ms == 0 {
            return Err(LedgerError::Config("REQUEST_TIMEOUT_MS must be positive".to_string()));
        }

        let page_limit: u32 =
            parse_var("TRONSCAN_PAGE_LIMIT", var("TRONSCAN_PAGE_LIMIT"))?.unwrap_or(DEFAULT_TRONSCAN_PAGE_LIMIT);
        if page_limit == 0 {
            return Err(LedgerError::Config("TRONSCAN_PAGE_LIMIT must be positive".to_string()));
        }

        let noise_rule = match var("NOISE_RULE") {
            Some(raw) => raw.parse::<NoiseRule>()?,
            None => defaults.noise_rule,
        };

        Ok(Self {
            etherscan_api_url: var("ETHERSCAN_API_URL").unwrap_or(defaults.etherscan_api_url),
            etherscan_api_key: var("ETHERSCAN_API_KEY"),
            tronscan_api_url: var("TRONSCAN_API_URL").unwrap_or(defaults.tronscan_api_url),
            tronscan_api_key: var("TRONSCAN_API_KEY"),
            request_timeout: Duration::from_millis(timeout_ms),
            tronscan_page_limit: page_limit,
            token_registry_path: var("TOKEN_REGISTRY_PATH").map(PathBuf::from),
            noise_rule,
        })
    }
}

fn parse_var<T>(key: &str, value: Option<String>) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
{
    value
        .map(|raw| {
            raw.parse::<T>()
                .map_err(|e| LedgerError::Config(format!("invalid {} {:?}: {}", key, raw, e)))
        })
        .transpose()
}
