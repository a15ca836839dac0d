// src/config/config.rs
use crate::{
    miner::MinerSettings, network::pool::PoolConfig, network::rpc::rpc_endpoint,
    utils::error::MinerError,
};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Main configuration structure for the mining application
///
/// Contains all settings needed to run a mining session: where the pool
/// is and who gets credited, and how the compute worker is driven.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Mining pool connection
    pub pool: PoolConfig,

    /// Compute worker and difficulty tuning
    #[serde(default)]
    pub miner: WorkerConfig,
}

/// Compute worker settings
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Path of the compute worker executable
    #[serde(default = "default_worker_path")]
    pub worker_path: PathBuf,

    /// Average seconds between proofs the difficulty is tuned for
    /// (default: 60)
    #[serde(default = "default_proof_period")]
    pub proof_period: u64,

    /// Parallel units inside the worker
    /// (default: 0, meaning the number of CPU cores)
    #[serde(default)]
    pub worker_parallelism: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        WorkerConfig {
            worker_path: default_worker_path(),
            proof_period: default_proof_period(),
            worker_parallelism: 0,
        }
    }
}

const DEFAULT_WORKER_PATH: &str = if cfg!(windows) {
    "bin/koinos_miner.exe"
} else {
    "bin/koinos_miner"
};

fn default_worker_path() -> PathBuf {
    PathBuf::from(DEFAULT_WORKER_PATH)
}

fn default_proof_period() -> u64 {
    60
}

impl Config {
    /// Loads configuration from a file
    ///
    /// # Arguments
    /// * `path` - Path to the configuration file (TOML format)
    ///
    /// # Returns
    /// * `Ok(Config)` - Successfully loaded configuration
    /// * `Err(MinerError)` - If file couldn't be read or parsed
    pub fn load(path: impl Into<PathBuf>) -> Result<Self, MinerError> {
        let path = path.into();
        let config_str = std::fs::read_to_string(&path).map_err(|e| {
            MinerError::ConfigError(format!(
                "Failed to read config at {}: {}",
                path.display(),
                e
            ))
        })?;

        Self::parse(&config_str)
    }

    /// Parses configuration from TOML text
    pub fn parse(config_str: &str) -> Result<Self, MinerError> {
        toml::from_str(config_str)
            .map_err(|e| MinerError::ConfigError(format!("Invalid config format: {}", e)))
    }

    /// Checks values that would otherwise fail later at runtime
    ///
    /// # Errors
    /// Returns `MinerError::ConfigError` for an empty user, a zero proof
    /// period or an unusable pool URL
    pub fn validate(&self) -> Result<(), MinerError> {
        if self.pool.user.trim().is_empty() {
            return Err(MinerError::ConfigError("pool.user must not be empty".into()));
        }
        if self.miner.proof_period == 0 {
            return Err(MinerError::ConfigError(
                "miner.proof_period must be at least 1 second".into(),
            ));
        }
        rpc_endpoint(&self.pool.url).map_err(|e| {
            MinerError::ConfigError(format!("Invalid pool URL '{}': {}", self.pool.url, e))
        })?;
        Ok(())
    }

    /// Session settings derived from this configuration
    ///
    /// A parallelism of 0 resolves to the number of CPU cores.
    pub fn settings(&self) -> MinerSettings {
        let worker_parallelism = match self.miner.worker_parallelism {
            0 => num_cpus::get(),
            n => n,
        };

        MinerSettings {
            user: self.pool.user.trim().to_string(),
            worker_path: self.miner.worker_path.clone(),
            proof_period_seconds: self.miner.proof_period,
            worker_parallelism,
        }
    }

    /// Generates a configuration template string
    ///
    /// # Returns
    /// String containing a commented TOML configuration template
    pub fn generate_template() -> String {
        let mut template = String::new();
        template.push_str("# Pool Miner Configuration\n\n");
        template.push_str("# Pool mining configuration\n");
        template.push_str("[pool]\n");
        template.push_str("url = \"https://api.koinos.club\"\n");
        template.push_str("user = \"your_account\"\n");
        template.push_str("# HTTP timeout per request in seconds\n");
        template.push_str("timeout_secs = 30\n\n");

        template.push_str("# Compute worker configuration\n");
        template.push_str("[miner]\n");
        template.push_str(&format!("worker_path = \"{}\"\n", DEFAULT_WORKER_PATH));
        template.push_str("# How often to submit a proof on average, in seconds\n");
        template.push_str("proof_period = 60\n");
        template.push_str("# Parallel units inside the worker (0 = auto-detect)\n");
        template.push_str("worker_parallelism = 0\n");

        template
    }
}
