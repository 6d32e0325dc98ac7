//! Logging infrastructure for gatepass.
//!
//! This module provides structured logging using the `log` facade and `env_logger` backend.
//! Log levels are determined by (in priority order):
//!
//! 1. `RUST_LOG` environment variable (if set)
//! 2. CLI flags: `--quiet` (error only) or `--verbose` (debug/trace)
//! 3. Default: info level
//!
//! While the kiosk owns the terminal, anything written to stderr would tear
//! the screen, so logs go to a file ([`LogTarget::File`]) or nowhere.
//!
//! # Example
//!
//! ```rust,no_run
//! use gatepass::logging::{init_logging, LogTarget};
//!
//! // Headless commands log to stderr
//! init_logging(0, false, LogTarget::Stderr).unwrap();
//! log::info!("Application started");
//! ```

use std::env;
use std::fs::OpenOptions;
use std::io::Write;
use std::path::PathBuf;

use anyhow::{Context, Result};
use env_logger::{Builder, Target};
use log::LevelFilter;

/// Where log records are written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LogTarget {
    /// Standard error.
    Stderr,
    /// Appended to a file.
    File(PathBuf),
    /// Dropped.
    Discard,
}

/// Initialize the logging subsystem based on CLI verbosity flags.
///
/// Call once at start-up, before any logging calls are made.
///
/// # Arguments
///
/// * `verbose` - Verbosity count from CLI (0=normal, 1=debug, 2+=trace)
/// * `quiet` - If true, only show errors (overridden by RUST_LOG)
/// * `target` - Where records go
///
/// # Errors
///
/// Fails if the log file cannot be opened or a logger is already installed.
pub fn init_logging(verbose: u8, quiet: bool, target: LogTarget) -> Result<()> {
    let use_env = env::var("RUST_LOG").is_ok();
    let mut builder = Builder::new();

    match &target {
        LogTarget::Discard => {
            builder.filter_level(LevelFilter::Off);
        }
        _ if use_env => {
            builder.parse_default_env();
        }
        _ => {
            builder.filter_level(determine_level(verbose, quiet));
        }
    }

    if let LogTarget::File(path) = &target {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .with_context(|| format!("Failed to open log file: {}", path.display()))?;
        builder.target(Target::Pipe(Box::new(file)));
        builder.write_style(env_logger::WriteStyle::Never);
    }

    configure_format(&mut builder, verbose);
    builder.try_init().context("Logger already initialized")?;

    log::debug!(
        "Logging initialized at level {} ({:?})",
        current_level_name(),
        target
    );
    Ok(())
}

/// Determine the log level from CLI flags.
fn determine_level(verbose: u8, quiet: bool) -> LevelFilter {
    if quiet {
        LevelFilter::Error
    } else {
        match verbose {
            0 => LevelFilter::Info,
            1 => LevelFilter::Debug,
            _ => LevelFilter::Trace,
        }
    }
}

/// Configure the log format based on verbosity.
///
/// Debug and trace include the module path.
fn configure_format(builder: &mut Builder, verbose: u8) {
    builder.format(move |buf, record| {
        let timestamp = buf.timestamp_seconds();
        let level = record.level();
        let level_style = buf.default_level_style(level);

        if verbose >= 1 {
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} [{}] {}",
                timestamp,
                level,
                record.module_path().unwrap_or("unknown"),
                record.args()
            )
        } else {
            writeln!(
                buf,
                "{} {level_style}{:<5}{level_style:#} {}",
                timestamp,
                level,
                record.args()
            )
        }
    });
}

/// Get the current log level as a string.
pub fn current_level_name() -> &'static str {
    match log::max_level() {
        LevelFilter::Off => "off",
        LevelFilter::Error => "error",
        LevelFilter::Warn => "warn",
        LevelFilter::Info => "info",
        LevelFilter::Debug => "debug",
        LevelFilter::Trace => "trace",
    }
}
