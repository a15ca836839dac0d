//! Statistics collection module
//!
//! This module tracks the numbers the miner reports back to its user:
//! - Smoothed hashrate from worker progress reports
//! - Amounts earned over the trailing 24 hours
//!

/// Hashrate estimation and formatting
pub mod hashrate;

/// Rolling 24h ledger of earned amounts
pub mod ledger;

// Re-export main components
pub use hashrate::{HashrateEstimator, format_hashrate};
pub use ledger::RecentMinedLedger;
