//! Command-line interface definitions for gatepass.
//!
//! This module defines all CLI arguments, subcommands, and options using the clap derive API.
//! With no subcommand the interactive kiosk starts.
//!
//! # Example
//!
//! ```bash
//! # Run the kiosk against a configured endpoint
//! gatepass --endpoint https://script.example.com/exec
//!
//! # Kiosk with a USB badge scanner
//! gatepass kiosk --input device --scanner-device /dev/ttyACM0
//!
//! # Scripted check-in using the stored session
//! gatepass login -u A1
//! gatepass check-in W-0042 --output json
//! ```

use clap::{Args, Parser, Subcommand, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

use crate::input::InputMode;

/// Terminal check-in kiosk for badge-based access control.
///
/// A guard logs in, scans or types a worker's badge code, and the access
/// service answers with the worker's name and permission, which is shown and
/// spoken aloud.
#[derive(Debug, Parser)]
#[command(name = "gatepass")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase verbosity level (-v for debug, -vv for trace)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    /// Disable colored output
    #[arg(long, global = true, env = "NO_COLOR")]
    pub no_color: bool,

    /// Print fatal errors as JSON
    #[arg(long, global = true)]
    pub json_errors: bool,

    /// Configuration file (default: platform config directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// Write logs to this file (the kiosk otherwise discards them)
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,

    /// Access service URL
    #[arg(long, global = true, value_name = "URL")]
    pub endpoint: Option<String>,

    /// Session file (default: platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    pub session_file: Option<PathBuf>,

    /// Subcommand to execute (default: kiosk)
    #[command(subcommand)]
    pub command: Option<Commands>,
}

/// Available subcommands.
#[derive(Debug, Subcommand)]
pub enum Commands {
    /// Run the interactive check-in kiosk
    Kiosk(KioskArgs),
    /// Log in without the kiosk and store the session
    Login(LoginArgs),
    /// Check a worker in using the stored session
    CheckIn(CheckInArgs),
    /// Show the stored session
    Whoami,
}

/// Arguments for the kiosk subcommand.
#[derive(Debug, Args, Default)]
pub struct KioskArgs {
    /// How worker-IDs are entered
    #[arg(long, value_enum)]
    pub input: Option<InputMode>,

    /// Scanner device emitting one code per line (for --input device)
    #[arg(long, value_name = "PATH")]
    pub scanner_device: Option<PathBuf>,

    /// Color theme
    #[arg(long, value_enum)]
    pub theme: Option<ThemeArg>,
}

/// Arguments for the login subcommand.
#[derive(Debug, Args)]
pub struct LoginArgs {
    /// Username
    #[arg(short, long)]
    pub username: String,

    /// Password (read from GATEPASS_PASSWORD if not given)
    #[arg(short, long, env = "GATEPASS_PASSWORD", hide_env_values = true)]
    pub password: String,
}

/// Arguments for the check-in subcommand.
#[derive(Debug, Args)]
pub struct CheckInArgs {
    /// Worker-ID as encoded in the badge
    #[arg(value_name = "WORKER_ID")]
    pub worker_id: String,

    /// Submit on behalf of this username instead of the stored one
    #[arg(long, value_name = "NAME")]
    pub username: Option<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    pub output: OutputFormat,

    /// Do not speak the result
    #[arg(long)]
    pub silent: bool,
}

/// Output format for scripted check-ins.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human readable
    Text,
    /// JSON object
    Json,
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            OutputFormat::Text => write!(f, "text"),
            OutputFormat::Json => write!(f, "json"),
        }
    }
}

/// Color theme selection.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeArg {
    /// Detect from the terminal
    #[default]
    Auto,
    Dark,
    Light,
}
