// src/miner/queue.rs
//! Correlation of worker output with dispatched jobs
//!
//! The worker answers jobs in the order it received them, so the next
//! terminal event (finished or nonce) always belongs to the oldest pending
//! job. The orchestrator keeps at most one job in flight, but the queue
//! does not rely on that: any depth is tracked correctly.

use crate::miner::protocol::WorkItem;
use std::collections::VecDeque;

/// FIFO of jobs sent to the worker and not yet answered
#[derive(Debug, Default)]
pub struct RequestQueue {
    pending: VecDeque<WorkItem>,
}

impl RequestQueue {
    /// Creates an empty queue
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a job as sent
    pub fn push(&mut self, item: WorkItem) {
        self.pending.push_back(item);
    }

    /// Removes and returns the oldest pending job
    pub fn pop_front(&mut self) -> Option<WorkItem> {
        self.pending.pop_front()
    }

    /// Oldest pending job, if any
    pub fn head(&self) -> Option<&WorkItem> {
        self.pending.front()
    }

    /// Number of jobs in flight
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Whether no job is in flight
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }
}
