//! Data models for the wallet ledger

pub mod network;
pub mod asset;
pub mod transaction;
pub mod summary;
pub mod report;

// Re-export for convenience
pub use network::Network;
pub use asset::{AssetCategory, AssetFilter, TokenContract};
pub use transaction::{RawTransferRecord, NormalizedTransaction, Direction, LedgerEntry};
pub use summary::{AssetFlow, CounterpartySummary};
pub use report::LedgerReport;
