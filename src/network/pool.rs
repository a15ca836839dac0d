// src/network/pool.rs

//! Mining pool client implementation
//!
//! Talks JSON-RPC to the pool through an [`RpcTransport`]. Both calls the
//! miner makes are retried until they succeed, so callers always get a job
//! back:
//! - `requestTask2` fetches a job at a given difficulty
//! - `mine2` submits a proof and returns the next job, falling back to
//!   `requestTask2` after repeated failures
use crate::miner::protocol::{ProofResult, WorkItem};
use crate::network::retry::Backoff;
use crate::network::rpc::{RpcRequest, RpcTransport};
use crate::types::Target;
use crate::utils::error::MinerError;
use rand::rngs::StdRng;
use rand::{Rng, RngCore, SeedableRng};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Prefix of every pool log line
pub const POOL_CONTEXT: &str = "[Pool]";

/// Submission attempts before giving up on a proof and requesting new work
pub const SUBMIT_ATTEMPTS: u32 = 3;

/// Exclusive upper bound of generated request ids
const MAX_REQUEST_ID: u32 = 10_000;

/// Pool method returning a new job
const REQUEST_TASK: &str = "requestTask2";

/// Pool method accepting a proof
const SUBMIT_PROOF: &str = "mine2";

/// Configuration for connecting to a mining pool
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PoolConfig {
    /// Pool base URL (e.g., "https://api.koinos.club")
    pub url: String,
    /// Account credited for submitted proofs
    pub user: String,
    /// HTTP timeout per request in seconds
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_timeout_secs() -> u64 {
    30
}

/// Client for communicating with a mining pool
pub struct PoolClient<T> {
    /// Transport carrying the JSON-RPC calls
    transport: T,
    /// Account credited for submitted proofs
    user: String,
    /// Source of request ids
    ids: StdRng,
    /// Retrier shared by both calls
    backoff: Backoff<StdRng>,
}

impl<T: RpcTransport> PoolClient<T> {
    /// Creates a client with an entropy-seeded random source
    ///
    /// # Arguments
    /// * `transport` - Transport delivering requests to the pool
    /// * `user` - Account credited for submitted proofs
    pub fn new(transport: T, user: &str) -> Self {
        Self::with_rng(transport, user, StdRng::from_entropy())
    }

    /// Creates a client drawing request ids and retry jitter from `rng`
    pub fn with_rng(transport: T, user: &str, mut rng: StdRng) -> Self {
        let backoff = Backoff::new(StdRng::seed_from_u64(rng.next_u64()));
        PoolClient {
            transport,
            user: user.trim().to_string(),
            ids: rng,
            backoff,
        }
    }

    /// Account credited for submitted proofs
    pub fn user(&self) -> &str {
        &self.user
    }

    /// Requests a new job at the given difficulty
    ///
    /// Retries until the pool answers with a well-formed job.
    pub async fn request_work(&mut self, target: &Target) -> WorkItem {
        let params = json!([self.user, target.to_string()]);
        let transport = &self.transport;
        let ids = &mut self.ids;

        self.backoff
            .retry("request work from the pool", POOL_CONTEXT, |_, _| {
                let id = ids.gen_range(0..MAX_REQUEST_ID);
                let request = RpcRequest::new(REQUEST_TASK, params.clone(), id);
                async move { call(transport, request).await }
            })
            .await
    }

    /// Submits a proof and returns the next job
    ///
    /// After [`SUBMIT_ATTEMPTS`] failed submissions the proof is abandoned
    /// and a fresh job is requested instead, so the miner keeps making
    /// progress while the pool is struggling. The returned result then
    /// carries no earned amount.
    ///
    /// # Arguments
    /// * `nonce` - Solution found by the worker
    /// * `new_target` - Difficulty for the next job
    pub async fn submit_proof(&mut self, nonce: &str, new_target: &Target) -> ProofResult {
        let proof_params = json!([nonce, new_target.to_string()]);
        let task_params = json!([self.user, new_target.to_string()]);
        let transport = &self.transport;
        let ids = &mut self.ids;

        self.backoff
            .retry("send proof to the pool", POOL_CONTEXT, |attempt, _| {
                let (method, params) = if attempt < SUBMIT_ATTEMPTS {
                    (SUBMIT_PROOF, proof_params.clone())
                } else {
                    log::warn!(
                        "{} Aborting proof submission, requesting a new task",
                        POOL_CONTEXT
                    );
                    (REQUEST_TASK, task_params.clone())
                };
                let id = ids.gen_range(0..MAX_REQUEST_ID);
                let request = RpcRequest::new(method, params, id);
                async move { call(transport, request).await }
            })
            .await
    }
}

/// Performs one JSON-RPC call and decodes its result
///
/// # Errors
/// Returns `MinerError::ProtocolError` if the response id does not match the
/// request, the pool returned an error object, or the result is missing;
/// transport and decoding failures are passed through
async fn call<T, R>(transport: &T, request: RpcRequest) -> Result<R, MinerError>
where
    T: RpcTransport,
    R: DeserializeOwned,
{
    let response = transport.post(&request).await?;

    if response.id.as_ref().and_then(Value::as_u64) != Some(u64::from(request.id)) {
        return Err(MinerError::ProtocolError(format!(
            "Invalid response when calling '{}': Expected id {}. Received id {}",
            request.method,
            request.id,
            response.id.unwrap_or(Value::Null)
        )));
    }

    if let Some(error) = response.error {
        return Err(MinerError::ProtocolError(format!(
            "Pool rejected '{}': {}",
            request.method, error
        )));
    }

    let result = response.result.ok_or_else(|| {
        MinerError::ProtocolError(format!(
            "Invalid response when calling '{}': No result present in the response",
            request.method
        ))
    })?;

    Ok(serde_json::from_value(result)?)
}
