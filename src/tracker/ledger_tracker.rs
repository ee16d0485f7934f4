//src/tracker/ledger_tracker.rs
use std::collections::HashMap;
use std::sync::Arc;

use chrono::Utc;
use tracing::{debug, info, warn};

use crate::config::TrackerConfig;
use crate::error::LedgerError;
use crate::ledger::{aggregator, builder, noise_filter, normalizer, NoiseRule};
use crate::models::{AssetFilter, LedgerReport, Network};
use crate::providers::{EtherscanClient, EvmAdapter, TronAdapter, TronscanClient};
use crate::traits::{LedgerEventHandler, SourceAdapter, TokenRegistry};
use crate::Result;

/// Pipeline entry point: one source adapter per network, selected per request
pub struct LedgerTracker {
    adapters: HashMap<Network, Arc<dyn SourceAdapter>>,
    noise_rule: NoiseRule,
    event_handler: Option<Arc<dyn LedgerEventHandler>>,
}

impl LedgerTracker {
    /// Create a tracker with no adapters registered
    pub fn new() -> Self {
        Self {
            adapters: HashMap::new(),
            noise_rule: NoiseRule::default(),
            event_handler: None,
        }
    }

    /// Tracker wired to the live Etherscan and Tronscan APIs
    pub fn from_config(config: &TrackerConfig, registry: Arc<dyn TokenRegistry>) -> Result<Self> {
        let etherscan = EtherscanClient::new(
            config.etherscan_api_url.clone(),
            config.etherscan_api_key.clone(),
            config.request_timeout,
        )?;
        let tronscan = TronscanClient::new(
            config.tronscan_api_url.clone(),
            config.tronscan_api_key.clone(),
            config.request_timeout,
            config.tronscan_page_limit,
        )?;

        if config.etherscan_api_key.is_none() {
            warn!("ETHERSCAN_API_KEY is not set, Etherscan requests will be heavily rate limited");
        }

        Ok(Self::new()
            .with_adapter(Arc::new(EvmAdapter::new(etherscan, registry.clone())))
            .with_adapter(Arc::new(TronAdapter::new(tronscan, registry)))
            .with_noise_rule(config.noise_rule))
    }

    /// Register the adapter for its network, replacing any previous one
    pub fn with_adapter(mut self, adapter: Arc<dyn SourceAdapter>) -> Self {
        self.adapters.insert(adapter.network(), adapter);
        self
    }

    pub fn with_noise_rule(mut self, rule: NoiseRule) -> Self {
        self.noise_rule = rule;
        self
    }

    /// Notify a handler with every finished report or terminal error
    pub fn with_event_handler(mut self, handler: Arc<dyn LedgerEventHandler>) -> Self {
        self.event_handler = Some(handler);
        self
    }

    pub fn noise_rule(&self) -> NoiseRule {
        self.noise_rule
    }

    /// Build the ordered ledger and counterparty summary for an address.
    ///
    /// Fails with `SourceUnavailable` when any sub-fetch fails, and with
    /// `NoTransactionsFound` when nothing survives normalization and filtering.
    pub async fn get_ledger(&self, address: &str, filter: &AssetFilter, network: Network) -> Result<LedgerReport> {
        let result = self.run(address, filter, network).await;

        if let Some(handler) = &self.event_handler {
            match &result {
                Ok(report) => handler.handle_report(report).await,
                Err(e) => handler.handle_error(e).await,
            }
        }

        result
    }

    async fn run(&self, address: &str, filter: &AssetFilter, network: Network) -> Result<LedgerReport> {
        let address = address.trim();
        if address.is_empty() {
            return Err(LedgerError::Config("wallet address must not be empty".to_string()));
        }

        let adapter = self
            .adapters
            .get(&network)
            .ok_or_else(|| LedgerError::Config(format!("no source adapter registered for {}", network)))?;

        info!("Building {} ledger for {} ({})", network, address, filter);

        let raw = adapter.fetch(address, filter).await?;
        let fetched = raw.len();

        let (normalized, skipped) = normalizer::normalize_batch(raw);
        if skipped > 0 {
            warn!("Skipped {} of {} records for {}", skipped, fetched, address);
        }

        let filtered = noise_filter::filter_with(normalized, network, self.noise_rule);
        if filtered.is_empty() {
            return Err(LedgerError::NoTransactionsFound {
                address: address.to_string(),
                network,
                filter: filter.to_string(),
            });
        }

        let (ledger, overflowed) = builder::build_counted(filtered, address);
        let skipped = skipped + overflowed;
        let summary = aggregator::aggregate(&ledger, address);
        debug!("{} ledger entries, {} counterparties", ledger.len(), summary.len());

        Ok(LedgerReport {
            generated_at: Utc::now(),
            address: address.to_string(),
            network,
            asset_filter: filter.to_string(),
            ledger,
            summary,
            skipped,
        })
    }
}

impl Default for LedgerTracker {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{AssetCategory, RawTransferRecord};
    use async_trait::async_trait;
    use std::sync::Mutex;

    struct StaticAdapter {
        network: Network,
        records: Vec<RawTransferRecord>,
    }

    #[async_trait]
    impl SourceAdapter for StaticAdapter {
        fn network(&self) -> Network {
            self.network
        }

        async fn fetch(&self, _address: &str, _filter: &AssetFilter) -> Result<Vec<RawTransferRecord>> {
            Ok(self.records.clone())
        }
    }

    #[derive(Default)]
    struct RecordingHandler {
        events: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl LedgerEventHandler for RecordingHandler {
        async fn handle_report(&self, report: &LedgerReport) {
            self.events.lock().unwrap().push(format!("report:{}", report.ledger.len()));
        }

        async fn handle_error(&self, error: &LedgerError) {
            self.events.lock().unwrap().push(format!("error:{}", error));
        }
    }

    fn trx(hash: &str, from: &str, to: &str, amount: &str, ts: i64) -> RawTransferRecord {
        let mut r = RawTransferRecord::new(Network::Tron, AssetCategory::Native, "TRX");
        r.hash = Some(hash.into());
        r.timestamp = Some(ts);
        r.from = Some(from.into());
        r.to = Some(to.into());
        r.raw_amount = Some(amount.into());
        r
    }

    fn tracker(records: Vec<RawTransferRecord>) -> LedgerTracker {
        LedgerTracker::new().with_adapter(Arc::new(StaticAdapter {
            network: Network::Tron,
            records,
        }))
    }

    #[tokio::test]
    async fn builds_report_for_registered_network() {
        let tracker = tracker(vec![trx("a", "TOther", "TMe", "2000000", 5)]);
        let report = tracker.get_ledger("TMe", &AssetFilter::All, Network::Tron).await.unwrap();
        assert_eq!(report.ledger.len(), 1);
        assert_eq!(report.summary.len(), 1);
        assert_eq!(report.asset_filter, "ALL");
        assert_eq!(report.final_balances()["TRX"], rust_decimal::Decimal::from(2));
    }

    #[tokio::test]
    async fn unregistered_network_is_a_config_error() {
        let err = tracker(vec![])
            .get_ledger("0xaa", &AssetFilter::All, Network::Ethereum)
            .await
            .unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[tokio::test]
    async fn blank_address_is_rejected() {
        let err = tracker(vec![]).get_ledger("  ", &AssetFilter::All, Network::Tron).await.unwrap_err();
        assert!(matches!(err, LedgerError::Config(_)));
    }

    #[tokio::test]
    async fn handler_sees_reports_and_errors() {
        let handler = Arc::new(RecordingHandler::default());
        let ok = tracker(vec![trx("a", "TOther", "TMe", "1", 5)]).with_event_handler(handler.clone());
        ok.get_ledger("TMe", &AssetFilter::All, Network::Tron).await.unwrap();

        let empty = tracker(vec![]).with_event_handler(handler.clone());
        assert!(empty.get_ledger("TMe", &AssetFilter::All, Network::Tron).await.is_err());

        let events = handler.events.lock().unwrap();
        assert_eq!(events[0], "report:1");
        assert!(events[1].starts_with("error:no transactions found"));
    }
}
