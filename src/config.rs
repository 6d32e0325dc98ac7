//! Application configuration management.
//!
//! Settings are layered with figment, lowest priority first:
//!
//! 1. Built-in defaults
//! 2. TOML file (`--config`, or `config.toml` in the platform config directory)
//! 3. `GATEPASS_*` environment variables
//! 4. CLI flags
//!
//! # Example
//!
//! ```toml
//! endpoint = "https://script.example.com/macros/s/XYZ/exec"
//! input_mode = "device"  # or "manual" (default)
//! scanner_device = "/dev/ttyACM0"
//! speech_command = ["espeak-ng", "-v", "cmn"]
//! request_timeout_secs = 15
//! ```

use std::path::{Path, PathBuf};
use std::time::Duration;

use anyhow::{Context, Result};
use directories::ProjectDirs;
use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::cli::{Cli, Commands, ThemeArg};
use crate::input::InputMode;
use crate::service::response::{
    DEFAULT_LOGIN_SUCCESS_MARKER, DEFAULT_SUCCESS_SUFFIX, DEFAULT_UNREGISTERED_MARKER,
};
use crate::service::ResponseMarkers;

/// Prefix for environment variable overrides.
pub const ENV_PREFIX: &str = "GATEPASS_";

/// Application configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Access service URL.
    pub endpoint: String,
    /// How worker-IDs are entered.
    pub input_mode: InputMode,
    /// Scanner device for [`InputMode::Device`].
    pub scanner_device: Option<PathBuf>,
    /// Text-to-speech command; the text is appended as the last argument.
    pub speech_command: Vec<String>,
    /// Prefix of a successful login response.
    pub login_success_marker: String,
    /// Substring of a scan response for an unknown badge.
    pub unregistered_marker: String,
    /// Spoken after the result of a registered badge.
    pub success_suffix: String,
    /// HTTP timeout; the client default applies when unset.
    pub request_timeout_secs: Option<u64>,
    /// Preferred TUI theme.
    pub theme: ThemeArg,
    /// Session file; the platform data directory is used when unset.
    pub session_file: Option<PathBuf>,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            endpoint: String::new(),
            input_mode: InputMode::Manual,
            scanner_device: None,
            speech_command: Vec::new(),
            login_success_marker: DEFAULT_LOGIN_SUCCESS_MARKER.to_string(),
            unregistered_marker: DEFAULT_UNREGISTERED_MARKER.to_string(),
            success_suffix: DEFAULT_SUCCESS_SUFFIX.to_string(),
            request_timeout_secs: None,
            theme: ThemeArg::Auto,
            session_file: None,
        }
    }
}

impl Config {
    /// Load from `path` if given, else from the default platform path.
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    anyhow::bail!("Config file not found: {}", path.display());
                }
                Self::load_from_path(path)
            }
            None => match Self::default_path() {
                Some(path) => Self::load_from_path(&path),
                None => Self::figment(None)
                    .extract()
                    .context("Invalid configuration"),
            },
        }
    }

    /// Load with `path` as the file layer. A missing file is skipped.
    pub fn load_from_path(path: &Path) -> Result<Self> {
        log::debug!("Loading configuration from {}", path.display());
        Self::figment(Some(path))
            .extract()
            .with_context(|| format!("Invalid configuration in {}", path.display()))
    }

    fn figment(path: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Config::default()));
        if let Some(path) = path {
            figment = figment.merge(Toml::file(path));
        }
        figment.merge(Env::prefixed(ENV_PREFIX))
    }

    /// The default platform-specific configuration path.
    #[must_use]
    pub fn default_path() -> Option<PathBuf> {
        ProjectDirs::from("com", "gatepass", "gatepass")
            .map(|dirs| dirs.config_dir().join("config.toml"))
    }

    /// Apply CLI flags, the highest priority layer.
    pub fn apply_cli(&mut self, cli: &Cli) {
        if let Some(endpoint) = &cli.endpoint {
            self.endpoint = endpoint.clone();
        }
        if let Some(session_file) = &cli.session_file {
            self.session_file = Some(session_file.clone());
        }
        if let Some(Commands::Kiosk(args)) = &cli.command {
            if let Some(input) = args.input {
                self.input_mode = input;
            }
            if let Some(device) = &args.scanner_device {
                self.scanner_device = Some(device.clone());
            }
            if let Some(theme) = args.theme {
                self.theme = theme;
            }
        }
    }

    /// Check settings that cannot be defaulted.
    pub fn validate(&self) -> Result<()> {
        if self.endpoint.trim().is_empty() {
            anyhow::bail!(
                "No access service endpoint configured. Set `endpoint` in the config file, \
                 {}ENDPOINT, or pass --endpoint.",
                ENV_PREFIX
            );
        }
        if !self.endpoint.starts_with("http://") && !self.endpoint.starts_with("https://") {
            anyhow::bail!("Endpoint must be an http(s) URL, got: {}", self.endpoint);
        }
        if self.login_success_marker.is_empty() {
            anyhow::bail!("login_success_marker must not be empty");
        }
        if self.unregistered_marker.is_empty() {
            anyhow::bail!("unregistered_marker must not be empty");
        }
        Ok(())
    }

    /// Response markers for interpreting service answers.
    #[must_use]
    pub fn markers(&self) -> ResponseMarkers {
        ResponseMarkers {
            login_success: self.login_success_marker.clone(),
            unregistered: self.unregistered_marker.clone(),
            success_suffix: self.success_suffix.clone(),
        }
    }

    #[must_use]
    pub fn request_timeout(&self) -> Option<Duration> {
        self.request_timeout_secs.map(Duration::from_secs)
    }
}
