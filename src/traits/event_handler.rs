use async_trait::async_trait;

use crate::error::LedgerError;
use crate::models::LedgerReport;

/// Handler for finished ledger requests
#[async_trait]
pub trait LedgerEventHandler: Send + Sync {
    /// Handle a populated ledger and its counterparty summary
    async fn handle_report(&self, report: &LedgerReport);

    /// Handle the terminal error of a request
    async fn handle_error(&self, error: &LedgerError);
}
