// src/miner/events.rs
//! Events reported by a running miner
//!
//! The orchestrator never prints anything itself. Hashrate updates, credited
//! proofs and errors are handed to a [`MinerObserver`]; a
//! `crossbeam_channel::Sender<MinerEvent>` is one, so callers can simply
//! drain a channel.

use crossbeam_channel::Sender;

/// Something the user of the miner may want to know about
#[derive(Debug, Clone, PartialEq)]
pub enum MinerEvent {
    /// New hashrate estimate
    Hashrate {
        /// Hashes per second
        rate: u64,
        /// Human readable form, e.g. `"1.250 KH/s"`
        formatted: String,
    },
    /// The pool credited a proof
    Proof {
        /// Amount earned by this proof
        amount: f64,
        /// Amount earned over the trailing 24 hours, this proof included
        total_24h: f64,
    },
    /// Something went wrong
    ///
    /// Worker protocol errors leave the session running; faults carry their
    /// underlying cause and leave it stopped.
    Error {
        /// What happened
        description: String,
        /// Underlying fault, if any
        cause: Option<String>,
    },
}

/// Receives miner events
pub trait MinerObserver: Send + Sync {
    /// Handles one event; must not block
    fn notify(&self, event: MinerEvent);
}

impl MinerObserver for Sender<MinerEvent> {
    fn notify(&self, event: MinerEvent) {
        // A disconnected receiver means nobody is listening anymore
        let _ = self.send(event);
    }
}
