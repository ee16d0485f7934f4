pub mod ledger_tracker;

pub use ledger_tracker::LedgerTracker;
