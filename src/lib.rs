//! Pool Miner - proof-of-work mining orchestration in Rust
//!
//! This crate drives an external compute worker with jobs from a JSON-RPC
//! mining pool:
//! - Requests work and submits proofs with unbounded, jittered retries
//! - Tunes difficulty so proofs arrive about once per configured period
//! - Tracks hashrate and earnings over the last 24 hours
//! - Supervises the worker process and reports faults without exiting

#![warn(missing_docs)]
#![forbid(unsafe_code)]

/// Miner core implementation including the control loop and worker protocol
pub mod miner;

/// Network communication components for the mining pool
pub mod network;

/// Statistics collection: hashrate and earnings
pub mod stats;

/// Utility functions and error handling
pub mod utils;

/// Command-line interface definitions
pub mod cli;

/// Configuration management
pub mod config;

/// Shared type definitions
pub mod types;

// Core exports
pub use cli::Commands;
pub use config::Config;
pub use miner::{Miner, MinerEvent, MinerObserver, MinerSettings, WorkItem};
pub use network::{HttpTransport, PoolClient};
pub use stats::{HashrateEstimator, RecentMinedLedger};
pub use types::Target;
pub use utils::{MinerError, init_logging};
