// src/utils/error.rs
use serde_json;
use std::io;
use thiserror::Error;
use url;

/// Main error type for the mining application
///
/// This enum represents all possible error conditions that can occur
/// while talking to the pool, driving the compute worker, or loading
/// configuration.
#[derive(Error, Debug)]
pub enum MinerError {
    /// Errors in protocol handling or invalid JSON-RPC messages
    #[error("Protocol violation: {0}")]
    ProtocolError(String),

    /// Pool answered with a non-success HTTP status
    #[error("Pool responded with status {status}: {body}")]
    PoolResponse {
        /// HTTP status code returned by the pool
        status: u16,
        /// Raw response payload
        body: String,
    },

    /// Output from the compute worker that matches no known marker
    #[error("Unrecognized response from the compute worker: {0}")]
    WorkerProtocol(String),

    /// The compute worker closed its output stream while the session was running
    #[error("Compute worker exited unexpectedly")]
    WorkerExited,

    /// Standard I/O operation errors
    #[error("I/O error: {0}")]
    IoError(#[from] io::Error),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    /// URL parsing errors
    #[error("URL parse error: {0}")]
    UrlError(#[from] url::ParseError),

    /// HTTP request/response errors
    #[error("HTTP error: {0}")]
    HttpError(#[from] reqwest::Error),

    /// Configuration file or parameter errors
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Invalid user input or parameter errors
    #[error("Invalid input: {0}")]
    InputError(String),

    /// Async task execution errors
    #[error("Task execution error: {0}")]
    TaskError(String),
}

impl MinerError {
    /// Detail handed to the next retry attempt
    ///
    /// Prefers the pool's response payload when one was received,
    /// otherwise falls back to the error message.
    pub fn detail(&self) -> String {
        match self {
            MinerError::PoolResponse { body, .. } if !body.is_empty() => body.clone(),
            other => other.to_string(),
        }
    }
}

/// Converts hex decoding errors into MinerError
///
/// Used when invalid hex data is encountered in:
/// - Nonces reported by the compute worker
/// - 256-bit targets received from the pool
/// Wraps the original error in an `InputError` variant.
impl From<hex::FromHexError> for MinerError {
    fn from(e: hex::FromHexError) -> Self {
        MinerError::InputError(format!("Hex conversion failed: {}", e))
    }
}

/// Converts async task join errors into MinerError
///
/// Used when the mining control loop panics or is aborted.
/// Wraps the original error in a `TaskError` variant.
impl From<tokio::task::JoinError> for MinerError {
    fn from(e: tokio::task::JoinError) -> Self {
        MinerError::TaskError(format!("Async task failed: {}", e))
    }
}
