use async_trait::async_trait;
use tracing::{error, info, warn};

use crate::error::LedgerError;
use crate::models::{Direction, LedgerReport};
use crate::traits::event_handler::LedgerEventHandler;
use crate::utils::helper::{format_address, truncate_string};

/// Console logging event handler
pub struct ConsoleEventHandler {
    /// Print full addresses instead of `0x1234...abcd`
    full_addresses: bool,
}

impl ConsoleEventHandler {
    /// Create a new console event handler
    pub fn new() -> Self {
        Self { full_addresses: false }
    }

    pub fn with_full_addresses(mut self, full: bool) -> Self {
        self.full_addresses = full;
        self
    }

    fn addr(&self, address: &str) -> String {
        if self.full_addresses {
            address.to_string()
        } else {
            format_address(address)
        }
    }

    /// Render the ledger, final balances and counterparties as text lines
    pub fn format_report(&self, report: &LedgerReport) -> Vec<String> {
        let mut lines = Vec::new();

        lines.push("=".repeat(80));
        lines.push(format!("LEDGER {} on {} ({})", report.address, report.network, report.asset_filter));
        lines.push("=".repeat(80));

        for entry in &report.ledger {
            let tx = &entry.transaction;
            let (arrow, other) = match entry.direction {
                Direction::In => ("IN ", &tx.from),
                Direction::Out => ("OUT", &tx.to),
            };
            let mut line = format!(
                "{}  {:<14} {} {:>24} {:<6} {} {}  balance {}",
                entry.human_time,
                truncate_string(tx.hash.as_deref().unwrap_or("-"), 14),
                arrow,
                entry.signed_amount(),
                tx.asset_symbol,
                if entry.direction == Direction::In { "from" } else { "to  " },
                self.addr(other),
                entry.running_balance
            );
            if let Some(fee) = tx.fee() {
                line.push_str(&format!("  fee {} {}", fee, tx.network.native_symbol()));
            }
            lines.push(line);
        }

        lines.push("-".repeat(80));
        lines.push("FINAL BALANCES".to_string());
        for (symbol, balance) in report.final_balances() {
            lines.push(format!("  {:<6} {}", symbol, balance));
        }

        lines.push("-".repeat(80));
        lines.push(format!("COUNTERPARTIES ({})", report.summary.len()));
        for (i, counterparty) in report.summary.iter().enumerate() {
            lines.push(format!(
                "{}. {} ({} transactions)",
                i + 1,
                self.addr(&counterparty.address),
                counterparty.total_transactions
            ));
            for (symbol, flow) in &counterparty.assets {
                lines.push(format!(
                    "     {:<6} sent {}  received {}  net {}",
                    symbol,
                    flow.sent,
                    flow.received,
                    flow.net()
                ));
            }
        }

        if report.skipped > 0 {
            lines.push(format!("Skipped records: {}", report.skipped));
        }
        lines.push("=".repeat(80));
        lines
    }
}

impl Default for ConsoleEventHandler {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl LedgerEventHandler for ConsoleEventHandler {
    async fn handle_report(&self, report: &LedgerReport) {
        for line in self.format_report(report) {
            info!("{}", line);
        }
    }

    async fn handle_error(&self, error: &LedgerError) {
        match error {
            LedgerError::NoTransactionsFound { .. } => warn!("Nothing to show: {}", error),
            _ => error!("Ledger request failed: {}", error),
        }
    }
}
