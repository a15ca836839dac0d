// src/miner/mod.rs
//! Core mining functionality
//!
//! This module contains all components related to the mining process:
//! - The compute worker process and its line protocol
//! - Correlation of worker answers with dispatched jobs
//! - Difficulty tuning
//! - The control loop tying worker and pool together

/// Difficulty and worker tuning controller
pub mod difficulty;

/// Events reported to the user of the miner
pub mod events;

/// Mining control loop and lifecycle
///
/// Owns the worker process, requests jobs, submits proofs and supervises
/// the whole session.
pub mod orchestrator;

/// Compute worker wire protocol
pub mod protocol;

/// FIFO of jobs awaiting a worker answer
pub mod queue;

/// Compute worker process management
///
/// Spawns the external hashing program, forwards its diagnostics and
/// interrupts it on stop.
pub mod worker;

// Re-export main components for cleaner imports
pub use self::difficulty::{DifficultyController, DifficultyState};
pub use self::events::{MinerEvent, MinerObserver};
pub use self::orchestrator::{Miner, MinerSettings, Session};
pub use self::protocol::{ProofResult, WorkItem, WorkerEvent};
pub use self::queue::RequestQueue;
pub use self::worker::ComputeWorker;
