// src/network/mock.rs
//! Scripted in-memory pool transport for tests

use crate::network::rpc::{RpcRequest, RpcResponse, RpcTransport};
use crate::utils::error::MinerError;
use serde_json::{Value, json};
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// Canned answer to the next request
#[derive(Debug, Clone)]
pub enum MockReply {
    /// Well-formed response carrying `result`
    Result(Value),
    /// Response whose id does not match the request
    WrongId(Value),
    /// JSON-RPC error object
    Error(Value),
    /// Empty HTTP body
    Empty,
    /// Transport failure
    Fail(String),
}

#[derive(Default)]
struct MockState {
    replies: VecDeque<MockReply>,
    calls: Vec<RpcRequest>,
}

/// Transport answering from a script and recording every request
///
/// Once the script runs dry every request fails, which keeps retrying
/// callers parked in backoff.
#[derive(Clone, Default)]
pub struct MockTransport {
    state: Arc<Mutex<MockState>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues a reply
    pub fn push(&self, reply: MockReply) {
        self.state.lock().unwrap().replies.push_back(reply);
    }

    /// Requests received so far
    pub fn calls(&self) -> Vec<RpcRequest> {
        self.state.lock().unwrap().calls.clone()
    }
}

impl RpcTransport for MockTransport {
    async fn post(&self, request: &RpcRequest) -> Result<RpcResponse, MinerError> {
        let reply = {
            let mut state = self.state.lock().unwrap();
            state.calls.push(request.clone());
            state.replies.pop_front()
        };

        let id = Some(json!(request.id));
        match reply {
            Some(MockReply::Result(result)) => Ok(RpcResponse {
                id,
                result: Some(result),
                error: None,
            }),
            Some(MockReply::WrongId(result)) => Ok(RpcResponse {
                id: Some(json!(request.id + 1)),
                result: Some(result),
                error: None,
            }),
            Some(MockReply::Error(error)) => Ok(RpcResponse {
                id,
                result: None,
                error: Some(error),
            }),
            Some(MockReply::Empty) => Err(MinerError::ProtocolError(
                "No data present in the response".into(),
            )),
            Some(MockReply::Fail(message)) => Err(MinerError::ProtocolError(message)),
            None => Err(MinerError::ProtocolError("no scripted reply".into())),
        }
    }
}

/// Task result whose fields are all tagged with `tag`
pub fn task_json(tag: &str) -> Value {
    json!({
        "seed": format!("0x{}", tag),
        "securedHash": format!("0x{}", tag.repeat(2)),
        "partialTarget": format!("0x{}", tag.repeat(3)),
        "iniNonce": format!("0x{}", tag.repeat(4)),
    })
}
