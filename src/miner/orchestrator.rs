// src/miner/orchestrator.rs
//! Mining control loop
//!
//! A [`Miner`] owns one compute worker and drives it with jobs from the pool:
//!
//! 1. Request a job at the current difficulty and write it to the worker
//! 2. Wait for the worker's answer
//!    - progress: update the hashrate estimate
//!    - exhausted: retune, request a new job, dispatch it
//!    - nonce: retune, submit the proof, dispatch the job that comes back
//! 3. Repeat until stopped
//!
//! The loop runs as a [`Session`] inside a supervisor task. Anything that
//! escapes the session (a dead worker, a broken pipe, a panic) is caught by
//! the supervisor, which interrupts the worker, reports the fault and leaves
//! the miner stopped.

use crate::miner::difficulty::DifficultyController;
use crate::miner::events::{MinerEvent, MinerObserver};
use crate::miner::protocol::{WorkItem, WorkerEvent};
use crate::miner::queue::RequestQueue;
use crate::miner::worker::{ComputeWorker, Interrupter};
use crate::network::pool::PoolClient;
use crate::network::rpc::RpcTransport;
use crate::stats::{HashrateEstimator, RecentMinedLedger, format_hashrate};
use crate::utils::error::MinerError;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader};
use tokio::process::{ChildStdin, ChildStdout};
use tokio::sync::watch;
use tokio::task::JoinHandle;

/// Time a worker gets to exit after SIGINT before it is killed
const REAP_GRACE: Duration = Duration::from_secs(5);

/// Settings of a mining session
#[derive(Debug, Clone)]
pub struct MinerSettings {
    /// Account credited for proofs
    pub user: String,
    /// Path of the compute worker executable
    pub worker_path: PathBuf,
    /// Desired average seconds between proofs
    pub proof_period_seconds: u64,
    /// Parallel units used by the worker
    pub worker_parallelism: usize,
}

/// The serialized control loop of one mining session
///
/// Generic over the worker's input so it can be driven by any async writer.
/// At most one job is in flight at a time: a new job is only dispatched
/// after the worker answered the previous one.
pub struct Session<T, W> {
    pool: PoolClient<T>,
    input: W,
    queue: RequestQueue,
    controller: DifficultyController,
    estimator: HashrateEstimator,
    ledger: RecentMinedLedger,
    last_proof: Instant,
    observer: Arc<dyn MinerObserver>,
}

impl<T, W> Session<T, W>
where
    T: RpcTransport,
    W: AsyncWrite + Unpin + Send,
{
    /// Creates a session writing jobs to `input`
    pub fn new(
        pool: PoolClient<T>,
        input: W,
        settings: &MinerSettings,
        observer: Arc<dyn MinerObserver>,
    ) -> Self {
        let now = Instant::now();
        Session {
            pool,
            input,
            queue: RequestQueue::new(),
            controller: DifficultyController::new(
                settings.proof_period_seconds,
                settings.worker_parallelism,
            ),
            estimator: HashrateEstimator::new(now),
            ledger: RecentMinedLedger::new(),
            last_proof: now,
            observer,
        }
    }

    /// Runs the loop until the worker's output ends
    ///
    /// Output is split on `\n` and decoded lossily, so bytes that are not
    /// UTF-8 end up as unrecognized output rather than breaking the loop.
    ///
    /// # Errors
    /// Returns `MinerError::WorkerExited` when the output stream closes, or
    /// the I/O error that broke communication with the worker
    pub async fn run<R>(mut self, output: R) -> Result<(), MinerError>
    where
        R: AsyncBufRead + Unpin + Send,
    {
        let target = self.controller.state().difficulty_target.clone();
        let work = self.pool.request_work(&target).await;
        self.dispatch(work).await?;

        let mut lines = output.split(b'\n');
        while let Some(line) = lines.next_segment().await? {
            self.handle_output(&String::from_utf8_lossy(&line)).await?;
        }

        Err(MinerError::WorkerExited)
    }

    /// Processes one line of worker output
    ///
    /// Unrecognized output is reported to the observer and otherwise
    /// ignored. A nonce that cannot be read is reported as well, and its
    /// job is then retired as if the worker had finished without one.
    pub async fn handle_output(&mut self, line: &str) -> Result<(), MinerError> {
        let line = line.trim();
        if line.is_empty() {
            return Ok(());
        }

        match WorkerEvent::parse(line) {
            Ok(WorkerEvent::Finished) => self.on_finished().await,
            Ok(WorkerEvent::Nonce(nonce)) => self.on_nonce(nonce).await,
            Ok(WorkerEvent::MalformedNonce(output)) => {
                self.report(MinerError::WorkerProtocol(output));
                self.on_finished().await
            }
            Ok(WorkerEvent::Progress(hashes)) => {
                self.on_progress(hashes);
                Ok(())
            }
            Err(e) => {
                self.report(e);
                Ok(())
            }
        }
    }

    fn report(&self, e: MinerError) {
        log::warn!("{}", e);
        self.observer.notify(MinerEvent::Error {
            description: e.to_string(),
            cause: None,
        });
    }

    async fn on_finished(&mut self) -> Result<(), MinerError> {
        log::info!("Finished without nonce");
        self.complete_head(Instant::now());

        let target = self
            .controller
            .adjust(self.estimator.estimate())
            .difficulty_target
            .clone();
        let work = self.pool.request_work(&target).await;
        self.dispatch(work).await
    }

    async fn on_nonce(&mut self, nonce: String) -> Result<(), MinerError> {
        log::info!("Nonce: {}", nonce);
        let now = Instant::now();
        self.complete_head(now);
        log::info!(
            "Time to find proof: {:.2} seconds",
            now.duration_since(self.last_proof).as_secs_f64()
        );
        self.last_proof = now;

        let target = self
            .controller
            .adjust(self.estimator.estimate())
            .difficulty_target
            .clone();
        let result = self.pool.submit_proof(&nonce, &target).await;

        if let Some(amount) = result.earned() {
            let total_24h = self.ledger.record_at(Instant::now(), amount);
            log::info!(
                "Proof credited: {:.8}, {:.8} in the last 24h",
                amount,
                total_24h
            );
            self.observer.notify(MinerEvent::Proof { amount, total_24h });
        }

        self.dispatch(result.work).await
    }

    fn on_progress(&mut self, hashes: u64) {
        let rate = self.estimator.record_at(Instant::now(), hashes);
        self.observer.notify(MinerEvent::Hashrate {
            rate,
            formatted: format_hashrate(rate),
        });
    }

    /// Retires the oldest in-flight job
    fn complete_head(&mut self, now: Instant) {
        match self.queue.pop_front() {
            Some(work) => log::debug!("Job {} answered", work.task_id()),
            None => log::warn!("Worker answered but no job was in flight"),
        }
        self.estimator.restart_at(now);
    }

    async fn dispatch(&mut self, work: WorkItem) -> Result<(), MinerError> {
        log::info!("New task received. Task Id: {}", work.task_id());
        let state = self.controller.state();
        let work = work.with_tuning(state.thread_iterations, state.hash_limit);

        // The worker's counter restarts with every job
        self.estimator.reset_counter();
        self.input
            .write_all(work.to_worker_line().as_bytes())
            .await?;
        self.input.flush().await?;
        self.queue.push(work);
        Ok(())
    }
}

struct RunningSession {
    interrupter: Interrupter,
    shutdown: watch::Sender<bool>,
    supervisor: JoinHandle<()>,
}

impl RunningSession {
    fn stopping(&self) -> bool {
        *self.shutdown.borrow()
    }
}

/// Mining lifecycle: owns the worker process and its control loop
pub struct Miner<T> {
    settings: MinerSettings,
    transport: T,
    observer: Arc<dyn MinerObserver>,
    session: Option<RunningSession>,
}

impl<T> Miner<T>
where
    T: RpcTransport + Clone + 'static,
{
    /// Creates a stopped miner
    ///
    /// # Arguments
    /// * `settings` - Session settings
    /// * `transport` - Transport to the pool, cloned into each session
    /// * `observer` - Receiver of hashrate, proof and error events
    pub fn new(settings: MinerSettings, transport: T, observer: Arc<dyn MinerObserver>) -> Self {
        Miner {
            settings,
            transport,
            observer,
            session: None,
        }
    }

    /// Spawns the worker and starts mining
    ///
    /// Does nothing if the miner is already running. Must be called from
    /// within a tokio runtime. Each start begins a fresh session at the
    /// initial difficulty.
    ///
    /// # Errors
    /// Returns `MinerError` if the worker process cannot be started
    pub fn start(&mut self) -> Result<(), MinerError> {
        if self.is_running() {
            log::info!("Miner has already started");
            return Ok(());
        }

        let (worker, io) = ComputeWorker::spawn(&self.settings.worker_path)?;
        let (shutdown, shutdown_rx) = watch::channel(false);
        let pool = PoolClient::new(self.transport.clone(), &self.settings.user);
        let session = Session::new(pool, io.input, &self.settings, self.observer.clone());
        let interrupter = worker.interrupter();

        let supervisor = tokio::spawn(supervise(
            session,
            io.output,
            worker,
            shutdown_rx,
            self.observer.clone(),
        ));

        self.session = Some(RunningSession {
            interrupter,
            shutdown,
            supervisor,
        });
        Ok(())
    }

    /// Waits until the current session ends, by stop or by fault
    ///
    /// After [`Miner::stop`] this returns once the worker has been reaped.
    /// Returns immediately when there is no session.
    pub async fn wait(&mut self) {
        let Some(session) = self.session.as_mut() else {
            return;
        };
        if let Err(e) = (&mut session.supervisor).await {
            log::error!("Mining supervisor failed: {}", e);
        }
        self.session = None;
    }
}

impl<T> Miner<T> {
    /// Whether a session is running and no stop was requested
    pub fn is_running(&self) -> bool {
        self.session
            .as_ref()
            .is_some_and(|session| !session.supervisor.is_finished() && !session.stopping())
    }

    /// Interrupts the worker and ends the session
    ///
    /// Idempotent. A pool call still in flight is abandoned and its result
    /// discarded. The worker is reaped in the background; use
    /// [`Miner::wait`] to block until it has exited.
    pub fn stop(&mut self) {
        match self.session.as_ref() {
            Some(session) if !session.supervisor.is_finished() && !session.stopping() => {
                log::info!("Stopping miner");
                let _ = session.shutdown.send(true);
                session.interrupter.interrupt();
            }
            _ => log::info!("Miner has already stopped"),
        }
    }
}

impl<T> Drop for Miner<T> {
    fn drop(&mut self) {
        if self.is_running() {
            self.stop();
        }
    }
}

/// Fault boundary around a session
async fn supervise<T>(
    session: Session<T, ChildStdin>,
    output: BufReader<ChildStdout>,
    worker: ComputeWorker,
    mut shutdown: watch::Receiver<bool>,
    observer: Arc<dyn MinerObserver>,
) where
    T: RpcTransport + 'static,
{
    let interrupter = worker.interrupter();
    let mut control = tokio::spawn(session.run(output));

    let outcome = tokio::select! {
        joined = &mut control => joined.map_err(MinerError::from).and_then(|result| result),
        _ = stopped(&mut shutdown) => {
            control.abort();
            Ok(())
        }
    };

    let stopping = *shutdown.borrow();
    match outcome {
        Err(_) if stopping => {}
        Err(e) => {
            log::error!("An uncaught fault stopped the mining session: {}", e);
            interrupter.interrupt();
            observer.notify(MinerEvent::Error {
                description: "An uncaught fault stopped the mining session".into(),
                cause: Some(e.to_string()),
            });
        }
        Ok(()) => {}
    }

    worker.reap(REAP_GRACE).await;
}

/// Resolves once a stop was requested or the miner is gone
async fn stopped(shutdown: &mut watch::Receiver<bool>) {
    let _ = shutdown.wait_for(|stop| *stop).await;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::miner::difficulty::{
        INITIAL_HASH_LIMIT, INITIAL_THREAD_ITERATIONS, difficulty_target,
    };
    use crate::network::mock::{MockReply, MockTransport, task_json};
    use crate::types::{INITIAL_TARGET, pad_hex};
    use crossbeam_channel::Receiver;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use serde_json::json;
    use tokio::io::{DuplexStream, Lines};

    fn settings() -> MinerSettings {
        MinerSettings {
            user: "alice".into(),
            worker_path: PathBuf::from("/nonexistent/compute-worker"),
            proof_period_seconds: 60,
            worker_parallelism: 2,
        }
    }

    /// A session wired to in-memory pipes standing in for the worker
    struct Harness {
        worker_out: DuplexStream,
        jobs: Lines<BufReader<DuplexStream>>,
        transport: MockTransport,
        events: Receiver<MinerEvent>,
        control: JoinHandle<Result<(), MinerError>>,
    }

    impl Harness {
        fn start(transport: MockTransport) -> Self {
            let (session_in, job_reader) = tokio::io::duplex(4096);
            let (worker_out, session_out) = tokio::io::duplex(4096);
            let (tx, events) = crossbeam_channel::unbounded();

            let pool =
                PoolClient::with_rng(transport.clone(), "alice", StdRng::seed_from_u64(3));
            let session = Session::new(pool, session_in, &settings(), Arc::new(tx));
            let control = tokio::spawn(session.run(BufReader::new(session_out)));

            Harness {
                worker_out,
                jobs: BufReader::new(job_reader).lines(),
                transport,
                events,
                control,
            }
        }

        async fn emit(&mut self, output: &str) {
            self.emit_bytes(output.as_bytes()).await;
        }

        async fn emit_bytes(&mut self, output: &[u8]) {
            self.worker_out.write_all(output).await.unwrap();
        }

        async fn next_job(&mut self) -> Vec<String> {
            let line = tokio::time::timeout(Duration::from_secs(5), self.jobs.next_line())
                .await
                .expect("no job dispatched")
                .unwrap()
                .expect("job stream closed");
            assert!(line.ends_with(';'), "{}", line);
            line.trim_end_matches(';')
                .split(' ')
                .map(str::to_string)
                .collect()
        }

        fn drain_events(&self) -> Vec<MinerEvent> {
            self.events.try_iter().collect()
        }
    }

    fn tagged(tag: &str) -> Vec<String> {
        vec![
            format!("0x{}", tag),
            format!("0x{}", tag.repeat(2)),
            format!("0x{}", tag.repeat(3)),
            format!("0x{}", tag.repeat(4)),
        ]
    }

    #[tokio::test]
    async fn dispatches_initial_job_at_starting_difficulty() {
        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        let mut harness = Harness::start(transport);

        let job = harness.next_job().await;
        assert_eq!(job[..4], tagged("01")[..]);
        assert_eq!(job[4], INITIAL_THREAD_ITERATIONS.to_string());
        assert_eq!(job[5], INITIAL_HASH_LIMIT.to_string());

        let calls = harness.transport.calls();
        assert_eq!(calls[0].method, "requestTask2");
        assert_eq!(calls[0].params, json!(["alice", INITIAL_TARGET.to_string()]));
    }

    #[tokio::test]
    async fn finished_requests_and_dispatches_new_work() {
        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        transport.push(MockReply::Result(task_json("02")));
        let mut harness = Harness::start(transport);
        harness.next_job().await;

        harness.emit("F:1;\n").await;
        let job = harness.next_job().await;
        assert_eq!(job[..4], tagged("02")[..]);
        // No hashrate known yet: tuned for 1 H/s
        assert_eq!(job[4], "1");
        assert_eq!(job[5], "60");

        let calls = harness.transport.calls();
        assert_eq!(calls.len(), 2);
        assert_eq!(calls[1].method, "requestTask2");
        assert_eq!(
            calls[1].params,
            json!(["alice", difficulty_target(1, 60).to_string()])
        );
        assert!(
            !harness
                .drain_events()
                .iter()
                .any(|e| matches!(e, MinerEvent::Proof { .. }))
        );
    }

    #[tokio::test]
    async fn nonce_submits_proof_and_reports_earnings() {
        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        let mut paid = task_json("03");
        paid["wkoins"] = json!(0.5);
        transport.push(MockReply::Result(paid));
        let mut paid_again = task_json("04");
        paid_again["wkoins"] = json!(0.25);
        transport.push(MockReply::Result(paid_again));
        let mut harness = Harness::start(transport);
        harness.next_job().await;

        harness.emit("N:abc;\n").await;
        let job = harness.next_job().await;
        assert_eq!(job[..4], tagged("03")[..]);

        let calls = harness.transport.calls();
        assert_eq!(calls[1].method, "mine2");
        assert_eq!(
            calls[1].params,
            json!([pad_hex("abc").unwrap(), difficulty_target(1, 60).to_string()])
        );
        assert_eq!(
            harness.drain_events(),
            vec![MinerEvent::Proof {
                amount: 0.5,
                total_24h: 0.5
            }]
        );

        harness.emit("N:abd;\n").await;
        harness.next_job().await;
        assert_eq!(
            harness.drain_events(),
            vec![MinerEvent::Proof {
                amount: 0.25,
                total_24h: 0.75
            }]
        );
    }

    #[tokio::test]
    async fn abandoned_proof_reports_nothing() {
        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        for _ in 0..3 {
            transport.push(MockReply::Fail("timeout".into()));
        }
        transport.push(MockReply::Result(task_json("05")));
        let mut harness = Harness::start(transport);
        harness.next_job().await;

        harness.emit("N:abc;\n").await;
        let job = harness.next_job().await;
        assert_eq!(job[..4], tagged("05")[..]);

        let methods: Vec<_> = harness
            .transport
            .calls()
            .into_iter()
            .map(|c| c.method)
            .collect();
        assert_eq!(
            methods,
            vec!["requestTask2", "mine2", "mine2", "mine2", "requestTask2"]
        );
        assert!(harness.drain_events().is_empty());
    }

    #[tokio::test]
    async fn progress_updates_hashrate_and_tuning() {
        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        transport.push(MockReply::Result(task_json("02")));
        let mut harness = Harness::start(transport);
        harness.next_job().await;

        tokio::time::sleep(Duration::from_millis(20)).await;
        harness.emit("H:2021-01-15T10:00:00 5000;\n").await;
        harness.emit("F:1;\n").await;
        let job = harness.next_job().await;

        let events = harness.drain_events();
        let rate = match events.as_slice() {
            [MinerEvent::Hashrate { rate, formatted }] => {
                assert_eq!(formatted, &format_hashrate(*rate));
                *rate
            }
            other => panic!("unexpected events: {:?}", other),
        };
        assert!(rate > 0);
        assert_eq!(job[5], (rate * 60).to_string());
        assert_eq!(job[4], (rate / 4).max(1).to_string());
    }

    #[tokio::test]
    async fn unrecognized_output_is_reported_and_ignored() {
        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        transport.push(MockReply::Result(task_json("02")));
        let mut harness = Harness::start(transport);
        harness.next_job().await;

        harness.emit("\nsomething odd\n").await;
        harness.emit("F:1;\n").await;
        let job = harness.next_job().await;
        assert_eq!(job[..4], tagged("02")[..]);

        match harness.drain_events().as_slice() {
            [MinerEvent::Error { description, cause }] => {
                assert!(description.contains("something odd"));
                assert!(cause.is_none());
            }
            other => panic!("unexpected events: {:?}", other),
        }
        assert!(!harness.control.is_finished());
    }

    #[tokio::test]
    async fn invalid_utf8_output_is_not_fatal() {
        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        transport.push(MockReply::Result(task_json("02")));
        let mut harness = Harness::start(transport);
        harness.next_job().await;

        harness.emit_bytes(b"\xff\xfe garbage\n").await;
        harness.emit("F:1;\n").await;
        let job = harness.next_job().await;
        assert_eq!(job[..4], tagged("02")[..]);

        match harness.drain_events().as_slice() {
            [MinerEvent::Error { description, cause }] => {
                assert!(description.contains("garbage"), "{}", description);
                assert!(cause.is_none());
            }
            other => panic!("unexpected events: {:?}", other),
        }
        assert!(!harness.control.is_finished());
    }

    #[tokio::test]
    async fn malformed_nonce_retires_the_job() {
        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        transport.push(MockReply::Result(task_json("02")));
        let mut harness = Harness::start(transport);
        harness.next_job().await;

        harness.emit("N:not-hex;\n").await;
        let job = harness.next_job().await;
        assert_eq!(job[..4], tagged("02")[..]);

        let methods: Vec<_> = harness
            .transport
            .calls()
            .into_iter()
            .map(|c| c.method)
            .collect();
        assert_eq!(methods, vec!["requestTask2", "requestTask2"]);
        match harness.drain_events().as_slice() {
            [MinerEvent::Error { description, cause }] => {
                assert!(description.contains("N:not-hex;"), "{}", description);
                assert!(cause.is_none());
            }
            other => panic!("unexpected events: {:?}", other),
        }
    }

    #[tokio::test]
    async fn worker_exit_ends_the_session() {
        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        let mut harness = Harness::start(transport);
        harness.next_job().await;

        drop(harness.worker_out);
        let result = harness.control.await.unwrap();
        assert!(matches!(result, Err(MinerError::WorkerExited)));
    }

    #[tokio::test]
    async fn start_fails_without_worker_binary() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut miner = Miner::new(settings(), MockTransport::new(), Arc::new(tx));
        assert!(miner.start().is_err());
        assert!(!miner.is_running());
    }

    #[tokio::test]
    async fn stop_is_idempotent() {
        let (tx, _rx) = crossbeam_channel::unbounded();
        let mut miner = Miner::new(settings(), MockTransport::new(), Arc::new(tx));
        miner.stop();
        miner.stop();
        assert!(!miner.is_running());
    }

    #[cfg(unix)]
    fn wait_for_error(events: Receiver<MinerEvent>) -> JoinHandle<MinerEvent> {
        tokio::task::spawn_blocking(move || loop {
            match events.recv_timeout(Duration::from_secs(10)) {
                Ok(event @ MinerEvent::Error { .. }) => break event,
                Ok(_) => continue,
                Err(e) => panic!("no error event: {}", e),
            }
        })
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn runs_and_stops_a_real_worker() {
        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut miner = Miner::new(
            MinerSettings {
                worker_path: PathBuf::from("/bin/cat"),
                ..settings()
            },
            transport,
            Arc::new(tx),
        );

        miner.start().unwrap();
        assert!(miner.is_running());
        // Starting twice is a no-op
        miner.start().unwrap();

        // cat echoes the job back, which is not a worker event
        match wait_for_error(rx).await.unwrap() {
            MinerEvent::Error { description, cause } => {
                assert!(description.contains("0x01"));
                assert!(cause.is_none());
            }
            other => panic!("unexpected event: {:?}", other),
        }
        assert!(miner.is_running());

        miner.stop();
        assert!(!miner.is_running());
        miner.stop();
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn wait_after_stop_lets_the_worker_exit() {
        use std::os::unix::fs::PermissionsExt;

        // Cleans up for a moment after SIGINT, then leaves a marker
        let script = std::env::temp_dir().join(format!(
            "pool-miner-slow-worker-{}.sh",
            std::process::id()
        ));
        let marker = script.with_extension("done");
        let _ = std::fs::remove_file(&marker);
        std::fs::write(
            &script,
            format!(
                "#!/bin/sh\ntrap 'sleep 1; touch \"{}\"; exit 0' INT\necho ready\nwhile :; do sleep 0.1; done\n",
                marker.display()
            ),
        )
        .unwrap();
        std::fs::set_permissions(&script, std::fs::Permissions::from_mode(0o755)).unwrap();

        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut miner = Miner::new(
            MinerSettings {
                worker_path: script.clone(),
                ..settings()
            },
            transport,
            Arc::new(tx),
        );

        miner.start().unwrap();
        // "ready" is printed once the trap is installed
        match wait_for_error(rx).await.unwrap() {
            MinerEvent::Error { description, .. } => assert!(description.contains("ready")),
            other => panic!("unexpected event: {:?}", other),
        }

        miner.stop();
        assert!(!miner.is_running());
        miner.wait().await;
        assert!(marker.exists(), "worker was not given time to exit");

        let _ = std::fs::remove_file(&script);
        let _ = std::fs::remove_file(&marker);
    }

    #[cfg(unix)]
    #[tokio::test(flavor = "multi_thread", worker_threads = 2)]
    async fn worker_crash_is_reported_as_fault() {
        let transport = MockTransport::new();
        transport.push(MockReply::Result(task_json("01")));
        let (tx, rx) = crossbeam_channel::unbounded();
        let mut miner = Miner::new(
            MinerSettings {
                worker_path: PathBuf::from("/bin/true"),
                ..settings()
            },
            transport,
            Arc::new(tx),
        );

        miner.start().unwrap();
        match wait_for_error(rx).await.unwrap() {
            MinerEvent::Error { cause, .. } => assert!(cause.is_some()),
            other => panic!("unexpected event: {:?}", other),
        }

        miner.wait().await;
        assert!(!miner.is_running());
    }
}
