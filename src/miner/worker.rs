// src/miner/worker.rs
//! Compute worker process management
//!
//! The hashing itself happens in an external program. It reads jobs from
//! its stdin and writes events to its stdout, one line each; anything it
//! prints on stderr is diagnostic text and is forwarded to the log.

use crate::utils::error::MinerError;
use std::path::Path;
use std::process::Stdio;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Duration;
use tokio::io::{AsyncBufReadExt, BufReader};
use tokio::process::{Child, ChildStdin, ChildStdout, Command};

/// Standard streams of a running worker
pub struct WorkerIo {
    /// Job input
    pub input: ChildStdin,
    /// Event output
    pub output: BufReader<ChildStdout>,
}

/// Handle to the compute worker process
pub struct ComputeWorker {
    child: Child,
    interrupter: Interrupter,
}

impl ComputeWorker {
    /// Spawns the worker at `path`
    ///
    /// Must be called from within a tokio runtime. The process is killed if
    /// the handle is dropped without being reaped.
    ///
    /// # Errors
    /// Returns `MinerError::IoError` if the process cannot be started
    pub fn spawn(path: &Path) -> Result<(Self, WorkerIo), MinerError> {
        let mut child = Command::new(path)
            .stdin(Stdio::piped())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| {
                MinerError::IoError(std::io::Error::new(
                    e.kind(),
                    format!("Failed to start compute worker {}: {}", path.display(), e),
                ))
            })?;

        let (Some(input), Some(output), Some(stderr)) =
            (child.stdin.take(), child.stdout.take(), child.stderr.take())
        else {
            return Err(MinerError::TaskError(
                "Compute worker streams are not available".into(),
            ));
        };

        tokio::spawn(async move {
            let mut lines = BufReader::new(stderr).lines();
            while let Ok(Some(line)) = lines.next_line().await {
                log::debug!(target: "worker", "{}", line);
            }
        });

        let interrupter = Interrupter {
            pid: child.id(),
            exited: Arc::new(AtomicBool::new(false)),
        };
        log::info!(
            "Started compute worker {} (pid {:?})",
            path.display(),
            interrupter.pid
        );

        let io = WorkerIo {
            input,
            output: BufReader::new(output),
        };
        Ok((ComputeWorker { child, interrupter }, io))
    }

    /// Handle able to interrupt this worker from elsewhere
    pub fn interrupter(&self) -> Interrupter {
        self.interrupter.clone()
    }

    /// Waits for the worker to exit, killing it after `grace`
    pub async fn reap(mut self, grace: Duration) {
        match tokio::time::timeout(grace, self.child.wait()).await {
            Ok(Ok(status)) => log::info!("Compute worker exited with {}", status),
            Ok(Err(e)) => log::warn!("Failed to wait for compute worker: {}", e),
            Err(_) => {
                log::warn!(
                    "Compute worker still running after {:?}, killing it",
                    grace
                );
                if let Err(e) = self.child.kill().await {
                    log::warn!("Failed to kill compute worker: {}", e);
                }
            }
        }
        self.interrupter.exited.store(true, Ordering::SeqCst);
    }
}

/// Sends SIGINT to a worker process
///
/// Becomes a no-op once the worker has been reaped, so a recycled pid is
/// never signalled.
#[derive(Debug, Clone)]
pub struct Interrupter {
    pid: Option<u32>,
    exited: Arc<AtomicBool>,
}

impl Interrupter {
    /// Asks the worker to stop
    pub fn interrupt(&self) {
        if self.exited.load(Ordering::SeqCst) {
            return;
        }
        let Some(pid) = self.pid else {
            return;
        };
        send_sigint(pid);
    }
}

#[cfg(unix)]
fn send_sigint(pid: u32) {
    use nix::sys::signal::{Signal, kill};
    use nix::unistd::Pid;

    if let Err(errno) = kill(Pid::from_raw(pid as i32), Signal::SIGINT) {
        log::warn!("Failed to interrupt compute worker {}: {}", pid, errno);
    }
}

#[cfg(not(unix))]
fn send_sigint(pid: u32) {
    log::warn!(
        "Interrupting compute worker {} is not supported on this platform; it is killed when its handle is dropped",
        pid
    );
}
