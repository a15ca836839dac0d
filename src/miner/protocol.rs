// src/miner/protocol.rs
//! Compute worker wire protocol
//!
//! Jobs go to the worker as a single line of whitespace-separated fields
//! terminated by `;\n`. The worker answers asynchronously with lines
//! classified by marker:
//! - `F:...;` the hash limit was exhausted without a solution
//! - `N:<hex nonce>;` a solution was found
//! - `H:<time> <cumulative hashes>;` progress report

use crate::types::pad_hex;
use crate::utils::error::MinerError;
use serde::{Deserialize, Serialize};

/// A job handed to the compute worker
///
/// Deserialized from the pool's task responses. The pool does not size
/// the job, so `thread_iterations` and `hash_limit` default to zero until
/// the orchestrator applies its own tuning with [`WorkItem::with_tuning`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkItem {
    /// Opaque block context
    pub seed: String,
    /// 256-bit hash of the work input
    pub secured_hash: String,
    /// 256-bit target the solution must fall below
    pub partial_target: String,
    /// 256-bit starting point of the nonce search
    #[serde(rename = "iniNonce", alias = "initialNonce")]
    pub initial_nonce: String,
    /// Iterations per worker sync
    #[serde(default)]
    pub thread_iterations: u64,
    /// Iterations before the worker gives up
    #[serde(default)]
    pub hash_limit: u64,
}

impl WorkItem {
    /// Returns the item re-wrapped with the controller's tuning
    pub fn with_tuning(self, thread_iterations: u64, hash_limit: u64) -> Self {
        WorkItem {
            thread_iterations,
            hash_limit,
            ..self
        }
    }

    /// Serializes the job as one worker input line
    pub fn to_worker_line(&self) -> String {
        format!(
            "{} {} {} {} {} {};\n",
            self.seed,
            self.secured_hash,
            self.partial_target,
            self.initial_nonce,
            self.thread_iterations,
            self.hash_limit
        )
    }

    /// Short identifier for log lines, taken from the initial nonce
    pub fn task_id(&self) -> &str {
        self.initial_nonce
            .get(46..52)
            .unwrap_or(self.initial_nonce.as_str())
    }
}

/// Pool answer to a proof submission
///
/// Carries the next job alongside the amount earned for the proof, if any.
/// When a submission is abandoned in favor of a fresh task request the
/// amount is absent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProofResult {
    /// Next job to dispatch
    #[serde(flatten)]
    pub work: WorkItem,
    /// Amount earned for the submitted proof
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub wkoins: Option<f64>,
}

impl ProofResult {
    /// Amount earned, if the pool credited a non-zero one
    pub fn earned(&self) -> Option<f64> {
        self.wkoins.filter(|amount| *amount != 0.0 && !amount.is_nan())
    }
}

/// Events emitted by the compute worker
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WorkerEvent {
    /// The hash limit was reached without finding a nonce
    Finished,
    /// A nonce satisfying the target, as `0x` + 64 hex digits
    Nonce(String),
    /// An `N:` marker whose payload is not a 256-bit hex value
    ///
    /// The worker has still answered its job; carries the raw output.
    MalformedNonce(String),
    /// Cumulative hashes computed on the current job
    Progress(u64),
}

impl WorkerEvent {
    /// Classifies one chunk of worker output
    ///
    /// Markers are checked in the order `F:`, `N:`, `H:`.
    ///
    /// # Errors
    /// Returns `MinerError::WorkerProtocol` for output that carries no
    /// known marker or whose progress count cannot be parsed
    pub fn parse(output: &str) -> Result<Self, MinerError> {
        if output.contains("F:") {
            return Ok(WorkerEvent::Finished);
        }

        if let Some(payload) = marker_payload(output, "N:") {
            return Ok(match pad_hex(payload) {
                Ok(nonce) => WorkerEvent::Nonce(nonce),
                Err(_) => WorkerEvent::MalformedNonce(output.to_string()),
            });
        }

        if let Some(payload) = marker_payload(output, "H:") {
            return payload
                .split_whitespace()
                .nth(1)
                .and_then(|count| count.parse().ok())
                .map(WorkerEvent::Progress)
                .ok_or_else(|| MinerError::WorkerProtocol(output.to_string()));
        }

        Err(MinerError::WorkerProtocol(output.to_string()))
    }
}

/// Text between `marker` and the next `;` (or the end of the chunk)
fn marker_payload<'a>(output: &'a str, marker: &str) -> Option<&'a str> {
    let start = output.find(marker)? + marker.len();
    let rest = &output[start..];
    Some(rest.find(';').map_or(rest, |end| &rest[..end]))
}
