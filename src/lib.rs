//! Wallet Ledger Library
//!
//! Pulls transaction history for an Ethereum or Tron wallet from block
//! explorers and turns it into one ordered ledger with per-asset running
//! balances and a per-counterparty summary.

// Public modules - these are the API surface
pub mod config;
pub mod error;
pub mod models;
pub mod traits;
pub mod providers;
pub mod ledger;
pub mod handlers;
pub mod tracker;
pub mod utils;

// Re-export commonly used items for easier access
pub use config::TrackerConfig;
pub use error::LedgerError;
pub use models::{
    AssetCategory, AssetFilter, CounterpartySummary, Direction, LedgerEntry, LedgerReport, Network,
    NormalizedTransaction, RawTransferRecord, TokenContract,
};
pub use traits::{LedgerEventHandler, SourceAdapter, TokenRegistry};
pub use providers::{EvmAdapter, StaticTokenRegistry, TronAdapter};
pub use handlers::{CompositeEventHandler, ConsoleEventHandler, JsonEventHandler};
pub use ledger::NoiseRule;
pub use tracker::LedgerTracker;

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Result type for the library
pub type Result<T> = std::result::Result<T, LedgerError>;
