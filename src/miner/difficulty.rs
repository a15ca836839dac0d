// src/miner/difficulty.rs
//! Difficulty and worker tuning controller
//!
//! Keeps the expected time to find a proof close to the configured proof
//! period by deriving the difficulty target from the current hashrate
//! estimate. The same estimate sizes the worker's sync interval and the
//! number of hashes it may spend on a job before reporting exhaustion.

use crate::types::{INITIAL_TARGET, MAX_HASH, Target};
use num_bigint::BigUint;

/// Iterations per worker sync before any hashrate is known
pub const INITIAL_THREAD_ITERATIONS: u64 = 600_000;

/// Hash limit per job before any hashrate is known
pub const INITIAL_HASH_LIMIT: u64 = 100_000_000;

/// Seconds of work a single job is sized for
const JOB_SECONDS: u64 = 60;

/// Progress syncs per second requested from each parallel unit
const SYNCS_PER_SECOND: u64 = 2;

/// Snapshot of the controller's tuning
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DifficultyState {
    /// Hashrate the tuning was computed from (at least 1)
    pub hash_rate: u64,
    /// Iterations each worker thread runs between syncs
    pub thread_iterations: u64,
    /// Iterations before the worker gives up on a job
    pub hash_limit: u64,
    /// Target handed to the pool with the next request
    pub difficulty_target: Target,
    /// Desired average seconds between proofs
    pub proof_period_seconds: u64,
}

/// Recomputes difficulty and tuning from hashrate estimates
#[derive(Debug, Clone)]
pub struct DifficultyController {
    state: DifficultyState,
    worker_parallelism: u64,
}

impl DifficultyController {
    /// Creates a controller starting from the fixed 32-bit initial difficulty
    ///
    /// # Arguments
    /// * `proof_period_seconds` - Desired average seconds between proofs
    /// * `worker_parallelism` - Number of parallel units inside the worker
    pub fn new(proof_period_seconds: u64, worker_parallelism: usize) -> Self {
        DifficultyController {
            state: DifficultyState {
                hash_rate: 1,
                thread_iterations: INITIAL_THREAD_ITERATIONS,
                hash_limit: INITIAL_HASH_LIMIT,
                difficulty_target: INITIAL_TARGET.clone(),
                proof_period_seconds,
            },
            worker_parallelism: worker_parallelism.max(1) as u64,
        }
    }

    /// Current tuning
    pub fn state(&self) -> &DifficultyState {
        &self.state
    }

    /// Recomputes the tuning from a hashrate estimate
    ///
    /// A missing or zero estimate is treated as 1 H/s.
    pub fn adjust(&mut self, hash_rate: Option<u64>) -> &DifficultyState {
        let hash_rate = hash_rate.unwrap_or(0).max(1);
        let period = self.state.proof_period_seconds;

        self.state = DifficultyState {
            hash_rate,
            thread_iterations: (hash_rate / (SYNCS_PER_SECOND * self.worker_parallelism)).max(1),
            hash_limit: hash_rate.saturating_mul(JOB_SECONDS),
            difficulty_target: difficulty_target(hash_rate, period),
            proof_period_seconds: period,
        };

        log::debug!(
            "Difficulty adjusted for {} H/s: target {}, {} iterations, limit {}",
            hash_rate,
            self.state.difficulty_target,
            self.state.thread_iterations,
            self.state.hash_limit
        );
        &self.state
    }
}

/// Target for which `hash_rate` is expected to find a proof every
/// `proof_period_seconds`
///
/// Computes `floor((2^256 - 1) / (max(hash_rate, 1) * max(period, 1)))`.
pub fn difficulty_target(hash_rate: u64, proof_period_seconds: u64) -> Target {
    let hashes_per_period =
        BigUint::from(hash_rate.max(1)) * BigUint::from(proof_period_seconds.max(1));
    Target::new(&*MAX_HASH / hashes_per_period)
}
