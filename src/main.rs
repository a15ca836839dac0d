// src/main.rs
use clap::Parser;
use crossbeam_channel::{Receiver, unbounded};
use pool_miner_rs::*;
use std::sync::Arc;
use std::time::Duration;
use tokio::runtime::Runtime;

/// Main entry point for the pool miner
///
/// # Returns
/// - `Ok(())` on successful execution
/// - `Err(MinerError)` if any operation fails
///
/// # Flow
/// 1. Parses command line arguments
/// 2. Delegates to appropriate subcommand handler
/// 3. Propagates any errors upward
fn main() -> Result<(), MinerError> {
    let cli = cli::Commands::parse();

    match cli.action {
        cli::Action::Start(opts) => start_mining(opts),
        cli::Action::Config(opts) => generate_config(opts),
    }
}

/// Starts the mining operation with given configuration options
///
/// # Arguments
/// * `opts` - Command line options for mining operation
///
/// # Operations
/// 1. Initializes logging
/// 2. Loads, overrides and validates configuration
/// 3. Starts logging miner events
/// 4. Runs the miner until Ctrl-C or a fault
fn start_mining(opts: cli::StartOptions) -> Result<(), MinerError> {
    utils::init_logging();

    let mut config = config::load(&opts.config)?;
    // Apply CLI overrides
    if let Some(user) = opts.user {
        config.pool.user = user;
    }
    if let Some(url) = opts.pool_endpoint {
        config.pool.url = url;
    }
    if let Some(period) = opts.proof_period {
        config.miner.proof_period = period;
    }
    if let Some(worker) = opts.worker {
        config.miner.worker_path = worker;
    }
    config.validate()?;

    let settings = config.settings();
    log::info!("Mining for {}", settings.user);
    log::info!("Proof every {}s (average)", settings.proof_period_seconds);
    log::info!("Pool: {}", config.pool.url);
    log::info!(
        "Worker: {} ({} parallel units)",
        settings.worker_path.display(),
        settings.worker_parallelism
    );

    let transport = HttpTransport::new(
        &config.pool.url,
        Duration::from_secs(config.pool.timeout_secs),
    )?;

    let (event_sender, event_receiver) = unbounded();
    std::thread::spawn(move || log_events(event_receiver));

    let rt = Runtime::new()?;
    rt.block_on(async {
        let mut miner = Miner::new(settings, transport, Arc::new(event_sender));
        miner.start()?;

        tokio::select! {
            signal = tokio::signal::ctrl_c() => {
                signal?;
                log::info!("Interrupted, shutting down");
                miner.stop();
                miner.wait().await;
                Ok(())
            }
            _ = miner.wait() => {
                Err(MinerError::TaskError("Mining session ended unexpectedly".into()))
            }
        }
    })
}

/// Logs miner events until every sender is gone
fn log_events(events: Receiver<MinerEvent>) {
    for event in events {
        match event {
            MinerEvent::Hashrate { formatted, .. } => log::info!("Hashrate: {}", formatted),
            MinerEvent::Proof { amount, total_24h } => log::info!(
                "Proof accepted: {:.8} (last 24h: {:.8})",
                amount,
                total_24h
            ),
            MinerEvent::Error {
                description,
                cause: Some(cause),
            } => log::error!("{}: {}", description, cause),
            MinerEvent::Error { description, .. } => log::warn!("{}", description),
        }
    }
}

/// Generates configuration template file
///
/// # Arguments
/// * `opts` - Configuration generation options
///
/// # Operations
/// 1. Generates template content
/// 2. Writes template to specified output file
fn generate_config(opts: cli::ConfigOptions) -> Result<(), MinerError> {
    let config = config::generate_template();
    std::fs::write(&opts.output, config)?;
    println!("Configuration template written to {}", opts.output.display());
    Ok(())
}
