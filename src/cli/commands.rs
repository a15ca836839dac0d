// src/cli/commands.rs
use clap::{Parser, Subcommand};
use std::path::PathBuf;

/// Pool Miner CLI - proof-of-work pool mining in Rust
#[derive(Parser, Debug)]
#[command(name = "pool-miner")]
#[command(version, about, long_about = None)]
pub struct Commands {
    /// The action to perform (start mining or generate config)
    #[command(subcommand)]
    pub action: Action,
}

/// Top-level commands for the miner application
#[derive(Subcommand, Debug)]
pub enum Action {
    /// Start mining operation with specified options
    Start(StartOptions),

    /// Generate configuration file template
    Config(ConfigOptions),
}

/// Options for starting the mining operation
#[derive(Parser, Debug)]
pub struct StartOptions {
    /// Path to configuration file
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Account credited for proofs (overrides config)
    #[arg(short, long)]
    pub user: Option<String>,

    /// Mining pool base URL (overrides config)
    #[arg(short = 'e', long)]
    pub pool_endpoint: Option<String>,

    /// Average seconds between proofs (overrides config)
    #[arg(short, long)]
    pub proof_period: Option<u64>,

    /// Path of the compute worker executable (overrides config)
    #[arg(short, long)]
    pub worker: Option<PathBuf>,
}

/// Options for generating configuration files
#[derive(Parser, Debug)]
pub struct ConfigOptions {
    /// Output file path
    #[arg(short, long, default_value = "config.toml")]
    pub output: PathBuf,
}
