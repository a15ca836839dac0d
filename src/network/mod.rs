// src/network/mod.rs
//! Network communication components
//!
//! This module handles all interactions with the mining pool:
//! - `rpc`: JSON-RPC envelopes and the HTTP transport
//! - `retry`: jittered exponential backoff shared by pool calls
//! - `pool`: the `PoolClient` requesting work and submitting proofs

/// Mining pool client implementation
///
/// Requests jobs and submits proofs over JSON-RPC, retrying until the pool
/// answers.
pub mod pool;

/// Retry with jittered exponential backoff
pub mod retry;

/// JSON-RPC envelopes and transports
pub mod rpc;

#[cfg(test)]
pub(crate) mod mock;

// Re-export main components for cleaner imports
pub use pool::{PoolClient, PoolConfig};
pub use retry::Backoff;
pub use rpc::{HttpTransport, RpcRequest, RpcResponse, RpcTransport};
