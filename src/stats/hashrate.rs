// src/stats/hashrate.rs
//! Smoothed hashrate estimation from worker progress reports
//!
//! The compute worker periodically reports a cumulative hash counter for
//! the job it is working on. Each report yields an instantaneous rate over
//! the interval since the previous report, which is averaged with the
//! running estimate (exponential smoothing with a factor of one half).

use std::time::Instant;

/// Exponentially smoothed estimate of hashes per second
#[derive(Debug, Clone)]
pub struct HashrateEstimator {
    /// Current estimate, `None` until the first report arrives
    estimate: Option<u64>,
    /// Cumulative counter seen in the last report
    last_hashes: u64,
    /// Time of the last report (or of the last re-anchoring)
    last_report: Instant,
}

impl HashrateEstimator {
    /// Creates an estimator anchored at `now` with no estimate
    pub fn new(now: Instant) -> Self {
        HashrateEstimator {
            estimate: None,
            last_hashes: 0,
            last_report: now,
        }
    }

    /// Current estimate in hashes per second, if any report has arrived
    pub fn estimate(&self) -> Option<u64> {
        self.estimate
    }

    /// Feeds a progress report carrying the worker's cumulative counter
    ///
    /// # Returns
    /// The updated estimate
    pub fn record_at(&mut self, now: Instant, cumulative_hashes: u64) -> u64 {
        let delta_hashes = cumulative_hashes.saturating_sub(self.last_hashes);
        // +1 keeps the denominator non-zero for back-to-back reports
        let delta_ms = now.saturating_duration_since(self.last_report).as_millis() + 1;
        let instant_rate = (delta_hashes as u128 * 1000 / delta_ms) as u64;

        let estimate = match self.estimate {
            Some(previous) => ((previous as u128 + instant_rate as u128) / 2) as u64,
            None => instant_rate,
        };

        self.estimate = Some(estimate);
        self.last_hashes = cumulative_hashes;
        self.last_report = now;
        estimate
    }

    /// Re-anchors the report clock, used when a job finishes
    pub fn restart_at(&mut self, now: Instant) {
        self.last_report = now;
    }

    /// Resets the cumulative counter, used when a new job is dispatched
    pub fn reset_counter(&mut self) {
        self.last_hashes = 0;
    }
}

/// Formats a hashrate for humans using base-1000 units
///
/// Values below 1000 print as whole `H/s`; larger values print with a
/// three-digit zero-padded fraction in `KH/s`, `MH/s` or `GH/s`.
pub fn format_hashrate(rate: u64) -> String {
    let digits = rate.checked_ilog10().unwrap_or(0);
    match digits / 3 {
        0 => format!("{} H/s", rate),
        1 => format!("{}.{:03} KH/s", rate / 1_000, rate % 1_000),
        2 => format!("{}.{:03} MH/s", rate / 1_000_000, (rate / 1_000) % 1_000),
        _ => format!(
            "{}.{:03} GH/s",
            rate / 1_000_000_000,
            (rate / 1_000_000) % 1_000
        ),
    }
}
