// src/stats/ledger.rs
//! Rolling record of amounts earned over the last 24 hours

use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Length of the trailing window
pub const LEDGER_WINDOW: Duration = Duration::from_secs(24 * 60 * 60);

/// Earned amounts within a trailing 24h window, oldest first
#[derive(Debug, Clone, Default)]
pub struct RecentMinedLedger {
    entries: VecDeque<(Instant, f64)>,
}

impl RecentMinedLedger {
    /// Creates an empty ledger
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an amount earned at `now` and prunes expired entries
    ///
    /// # Returns
    /// Total earned within the window, including this entry
    pub fn record_at(&mut self, now: Instant, amount: f64) -> f64 {
        self.entries.push_back((now, amount));
        self.prune_at(now);
        self.total()
    }

    /// Drops every entry older than 24 hours before `now`
    pub fn prune_at(&mut self, now: Instant) {
        let Some(cutoff) = now.checked_sub(LEDGER_WINDOW) else {
            return;
        };
        while let Some(&(at, _)) = self.entries.front() {
            if at > cutoff {
                break;
            }
            self.entries.pop_front();
        }
    }

    /// Sum of all retained amounts
    pub fn total(&self) -> f64 {
        self.entries.iter().map(|(_, amount)| amount).sum()
    }

    /// Number of retained entries
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the ledger holds no entries
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
