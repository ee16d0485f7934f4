use std::io::Write;

use async_trait::async_trait;
use serde_json::json;
use tracing::error;

use crate::error::LedgerError;
use crate::models::LedgerReport;
use crate::traits::event_handler::LedgerEventHandler;

/// Writes each report to stdout as pretty-printed JSON
pub struct JsonEventHandler;

impl JsonEventHandler {
    pub fn new() -> Self {
        Self
    }

    /// `{ledger, summary}` plus request metadata and final balances
    pub fn render(report: &LedgerReport) -> serde_json::Result<String> {
        let document = json!({
            "address": report.address,
            "network": report.network,
            "asset_filter": report.asset_filter,
            "generated_at": report.generated_at,
            "ledger": report.ledger,
            "summary": report.summary,
            "final_balances": report.final_balances(),
            "skipped": report.skipped,
        });
        serde_json::to_string_pretty(&document)
    }

    /// Error document; `kind` separates "nothing to show" from a failed fetch
    pub fn render_error(error: &LedgerError) -> serde_json::Result<String> {
        let kind = match error {
            LedgerError::InvalidAmount { .. } => "invalid_amount",
            LedgerError::SourceUnavailable { .. } => "source_unavailable",
            LedgerError::MalformedRecord { .. } => "malformed_record",
            LedgerError::NoTransactionsFound { .. } => "no_transactions_found",
            LedgerError::UnknownAsset { .. } => "unknown_asset",
            LedgerError::Config(_) => "config",
        };
        serde_json::to_string_pretty(&json!({ "error": kind, "message": error.to_string() }))
    }

    fn emit(rendered: serde_json::Result<String>) {
        match rendered {
            Ok(text) => {
                let stdout = std::io::stdout();
                let mut out = stdout.lock();
                if let Err(e) = writeln!(out, "{}", text) {
                    error!("Failed to write JSON output: {}", e);
                }
            }
            Err(e) => error!("Failed to serialize JSON output: {}", e),
        }
    }
}

impl Default for JsonEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerEventHandler for JsonEventHandler {
    async fn handle_report(&self, report: &LedgerReport) {
        Self::emit(Self::render(report));
    }

    async fn handle_error(&self, error: &LedgerError) {
        Self::emit(Self::render_error(error));
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Network;
    use chrono::Utc;

    #[test]
    fn report_document_shape() {
        let report = LedgerReport {
            generated_at: Utc::now(),
            address: "TMe".into(),
            network: Network::Tron,
            asset_filter: "USDT".into(),
            ledger: vec![],
            summary: vec![],
            skipped: 0,
        };
        let value: serde_json::Value = serde_json::from_str(&JsonEventHandler::render(&report).unwrap()).unwrap();
        assert_eq!(value["network"], "TRON");
        assert_eq!(value["asset_filter"], "USDT");
        assert!(value["ledger"].as_array().unwrap().is_empty());
        assert!(value["final_balances"].as_object().unwrap().is_empty());
    }

    #[test]
    fn error_kinds_are_distinct() {
        let empty = LedgerError::NoTransactionsFound {
            address: "TMe".into(),
            network: Network::Tron,
            filter: "ALL".into(),
        };
        let failed = LedgerError::source_unavailable("tronscan", "HTTP 503");
        let a: serde_json::Value = serde_json::from_str(&JsonEventHandler::render_error(&empty).unwrap()).unwrap();
        let b: serde_json::Value = serde_json::from_str(&JsonEventHandler::render_error(&failed).unwrap()).unwrap();
        assert_eq!(a["error"], "no_transactions_found");
        assert_eq!(b["error"], "source_unavailable");
    }
}
