//! Worker-ID input.
//!
//! A worker-ID reaches the Scanner screen one of two ways:
//!
//! - [`device`]: a badge scanner device that emits one decoded code per line
//!   (USB/serial scanners, or a FIFO fed by a camera decoder).
//! - [`manual`]: the guard types the code and submits it.
//!
//! Both implement [`ScanInputProvider`]; configuration picks one.

pub mod device;
pub mod manual;

use std::path::PathBuf;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::flow::field::TextEdit;

pub use device::{DeviceScanner, PermissionState};
pub use manual::ManualEntry;

/// How worker-IDs are entered.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Default, Hash, ValueEnum, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum InputMode {
    /// Continuous decoding from a scanner device.
    #[serde(alias = "camera")]
    #[value(alias = "camera")]
    Device,
    /// Typed into a text field.
    #[default]
    Manual,
}

impl std::fmt::Display for InputMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Device => write!(f, "device"),
            Self::Manual => write!(f, "manual"),
        }
    }
}

/// Input validation failures.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InputError {
    /// Manual entry submitted with nothing typed.
    #[error("Please enter the QR code data")]
    Empty,
}

/// A source of worker-IDs for the Scanner screen.
///
/// The Scanner screen calls [`focus`](Self::focus) each time it is entered,
/// then [`poll`](Self::poll) every frame and forwards key input.
pub trait ScanInputProvider: Send {
    /// Which variant this is.
    fn mode(&self) -> InputMode;

    /// The Scanner screen gained focus. Re-arms the provider for one capture.
    fn focus(&mut self);

    /// Apply an edit from the keyboard. Ignored by providers without a text field.
    fn edit(&mut self, edit: TextEdit);

    /// The guard pressed submit.
    ///
    /// Returns the worker-ID to forward, `Ok(None)` when there is nothing to
    /// forward yet, or a validation error to show.
    fn submit(&mut self) -> Result<Option<String>, InputError>;

    /// Check for a worker-ID captured without a key press.
    fn poll(&mut self) -> Option<String>;

    /// Whether a capture has already been forwarded during this focus.
    fn scanned(&self) -> bool;

    /// Current text for providers with a text field.
    fn text(&self) -> Option<&str> {
        None
    }

    /// Access state for providers backed by a device.
    fn permission(&self) -> Option<&PermissionState> {
        None
    }
}

/// Build the provider selected by configuration.
#[must_use]
pub fn from_config(mode: InputMode, device: Option<PathBuf>) -> Box<dyn ScanInputProvider> {
    match (mode, device) {
        (InputMode::Device, Some(path)) => Box::new(DeviceScanner::new(path)),
        (InputMode::Device, None) => {
            log::warn!("Device input selected but no scanner_device configured, using manual entry");
            Box::new(ManualEntry::new())
        }
        (InputMode::Manual, _) => Box::new(ManualEntry::new()),
    }
}
