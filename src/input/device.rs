//! Badge scanner device input.
//!
//! Access is requested when the Scanner screen is focused. A reader thread
//! opens the device, decodes lines and hands them over a channel, so a device
//! that blocks on open (a FIFO waiting for its decoder) never stalls the UI.
//! When the device reaches end of input or fails, access drops back to
//! denied and the next focus or Enter reopens it.
//!
//! Only the first decode after each focus is forwarded: the `scanned` flag
//! swallows the rest until the Scanner screen is entered again.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{self, Receiver, TryRecvError};
use std::thread;

use super::{InputError, InputMode, ScanInputProvider};
use crate::flow::field::TextEdit;

/// Reason shown once the device stops delivering input.
pub const DEVICE_CLOSED: &str = "scanner disconnected";

/// Access state for the scanner device.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PermissionState {
    /// Access has not been requested yet.
    #[default]
    Unrequested,
    /// The device is being opened.
    Requesting,
    /// The device is open and being read.
    Granted,
    /// Opening or reading the device failed.
    Denied(String),
}

impl PermissionState {
    #[must_use]
    pub fn is_granted(&self) -> bool {
        matches!(self, Self::Granted)
    }
}

/// Messages from the reader thread.
#[derive(Debug)]
enum DeviceEvent {
    Opened,
    OpenFailed(String),
    Decoded(String),
    Closed(String),
}

/// Worker-IDs decoded from a line-oriented scanner device.
#[derive(Debug)]
pub struct DeviceScanner {
    path: PathBuf,
    permission: PermissionState,
    events: Option<Receiver<DeviceEvent>>,
    scanned: bool,
}

impl DeviceScanner {
    /// Scanner reading from `path`. Nothing is opened until [`focus`](ScanInputProvider::focus).
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            permission: PermissionState::Unrequested,
            events: None,
            scanned: false,
        }
    }

    /// Path of the device.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Start opening the device unless it is already open or being opened.
    ///
    /// The outcome arrives later and is applied by [`poll`](ScanInputProvider::poll).
    pub fn request_permission(&mut self) -> &PermissionState {
        if matches!(
            self.permission,
            PermissionState::Unrequested | PermissionState::Denied(_)
        ) {
            log::debug!("Requesting access to scanner device {}", self.path.display());
            self.events = Some(spawn_reader(self.path.clone()));
            self.permission = PermissionState::Requesting;
        }
        &self.permission
    }

    /// Apply pending reader events. Returns the first decode when `forward`
    /// is set and nothing has been captured during this focus yet.
    fn process_events(&mut self, forward: bool) -> Option<String> {
        let mut captured = None;
        let mut stale = 0usize;

        loop {
            let Some(rx) = self.events.as_ref() else {
                break;
            };
            let event = match rx.try_recv() {
                Ok(event) => event,
                Err(TryRecvError::Empty) => break,
                Err(TryRecvError::Disconnected) => DeviceEvent::Closed(DEVICE_CLOSED.to_string()),
            };

            match event {
                DeviceEvent::Opened => {
                    log::info!("Scanner device {} opened", self.path.display());
                    self.permission = PermissionState::Granted;
                }
                DeviceEvent::OpenFailed(reason) => {
                    log::warn!("Scanner device {} unavailable: {}", self.path.display(), reason);
                    self.permission = PermissionState::Denied(reason);
                    self.events = None;
                }
                DeviceEvent::Closed(reason) => {
                    log::warn!("Scanner device {} closed: {}", self.path.display(), reason);
                    self.permission = PermissionState::Denied(reason);
                    self.events = None;
                }
                DeviceEvent::Decoded(code) => {
                    if forward && !self.scanned {
                        self.scanned = true;
                        log::info!("Decoded worker-ID from scanner device");
                        captured = Some(code);
                    } else {
                        // Debounced, or arrived while unfocused.
                        stale += 1;
                    }
                }
            }
        }

        if stale > 0 {
            log::debug!("Discarded {} decodes", stale);
        }
        captured
    }
}

/// Open `path` and read trimmed, non-empty lines on a background thread.
fn spawn_reader(path: PathBuf) -> Receiver<DeviceEvent> {
    let (tx, rx) = mpsc::channel();
    thread::spawn(move || {
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) => {
                let _ = tx.send(DeviceEvent::OpenFailed(e.to_string()));
                return;
            }
        };
        if tx.send(DeviceEvent::Opened).is_err() {
            return;
        }

        for line in BufReader::new(file).lines() {
            match line {
                Ok(line) => {
                    let code = line.trim();
                    if code.is_empty() {
                        continue;
                    }
                    if tx.send(DeviceEvent::Decoded(code.to_string())).is_err() {
                        // Receiver dropped: the scanner was discarded.
                        return;
                    }
                }
                Err(e) => {
                    let _ = tx.send(DeviceEvent::Closed(e.to_string()));
                    return;
                }
            }
        }
        let _ = tx.send(DeviceEvent::Closed(DEVICE_CLOSED.to_string()));
    });
    rx
}

impl ScanInputProvider for DeviceScanner {
    fn mode(&self) -> InputMode {
        InputMode::Device
    }

    fn focus(&mut self) {
        self.scanned = false;
        self.process_events(false);
        self.request_permission();
    }

    fn edit(&mut self, _edit: TextEdit) {}

    /// Submit doubles as "grant access" while the device is unavailable.
    fn submit(&mut self) -> Result<Option<String>, InputError> {
        self.process_events(false);
        self.request_permission();
        Ok(None)
    }

    fn poll(&mut self) -> Option<String> {
        self.process_events(true)
    }

    fn scanned(&self) -> bool {
        self.scanned
    }

    fn permission(&self) -> Option<&PermissionState> {
        Some(&self.permission)
    }
}
