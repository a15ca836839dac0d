// src/utils/logging.rs
//! Logging configuration and utilities
//!
//! This module handles logging setup for the miner application:
//! - Standard logging configuration
//! - Custom log formatting
//!
//! Uses `env_logger` under the hood with custom formatting and filtering.

use env_logger::{Builder, Target};
use log::{LevelFilter, Record};
use std::env;
use std::fmt;
use std::io::{self, Write};

/// Initializes the logging subsystem with sensible defaults
///
/// # Configuration
/// - Logs to stdout
/// - Default log level: Info
/// - Custom timestamp and source location formatting
/// - Respects `RUST_LOG` environment variable if set
pub fn init_logging() {
    let mut builder = common_log_config();

    if env::var("RUST_LOG").is_err() {
        builder.filter_level(LevelFilter::Info);
    } else {
        builder.parse_env("RUST_LOG");
    }

    builder.init();
}

/// Creates and configures a base logger builder with common settings
///
/// # Features
/// - Custom log format including:
///   - Timestamp (seconds since epoch)
///   - Log level
///   - Log target (the module path, or `worker` for worker output)
///   - Line number
///   - Message
/// - Output to stdout
fn common_log_config() -> Builder {
    let mut builder = Builder::new();

    builder
        .format(|buf, record| {
            let ts = buf.timestamp_seconds();
            write_record(buf, ts, record)
        })
        .target(Target::Stdout);

    builder
}

/// Writes one `[ts level target:line] message` log line
fn write_record(
    out: &mut impl Write,
    ts: impl fmt::Display,
    record: &Record<'_>,
) -> io::Result<()> {
    let level = record.level();
    let module = record.target();
    let line = record.line().unwrap_or(0);

    writeln!(
        out,
        "[{} {} {}:{}] {}",
        ts,
        level,
        module,
        line,
        record.args()
    )
}
