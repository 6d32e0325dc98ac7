//! Scripted commands that run the login and check-in calls without the kiosk.
//!
//! These follow the same rules as the interactive flow: the login marker
//! decides success, the stored session guards every scan, and scan results
//! are spoken.

use std::sync::mpsc;
use std::sync::Arc;
use std::thread;
use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use serde::Serialize;
use thiserror::Error;
use yansi::Paint;

use crate::error::{ExitCode, StructuredError};
use crate::flow::controller::{guard_scan, ScanGuardError};
use crate::service::{self, AccessService, LoginOutcome, ResponseMarkers, ServiceError};
use crate::session::{ScanRequest, Session, SessionStore, StoreError};
use crate::signal::ShutdownHandler;
use crate::speech::SpeechNotifier;

/// How often a waiting command checks for Ctrl+C.
const INTERRUPT_POLL: Duration = Duration::from_millis(100);

/// Failures of scripted commands.
#[derive(Debug, Error)]
pub enum HeadlessError {
    #[error("login rejected: {0}")]
    LoginRejected(String),

    #[error(transparent)]
    Guard(#[from] ScanGuardError),

    #[error("unable to connect to the server: {0}")]
    Service(#[from] ServiceError),

    #[error(transparent)]
    Store(#[from] StoreError),

    #[error("interrupted")]
    Interrupted,
}

impl HeadlessError {
    /// Exit code for an expected failure. `None` for failures that are bugs
    /// or environment problems and should surface as a general error.
    #[must_use]
    pub fn exit_code(&self) -> Option<ExitCode> {
        match self {
            Self::LoginRejected(_) => Some(ExitCode::LoginRejected),
            Self::Guard(_) => Some(ExitCode::NoSession),
            Self::Service(_) => Some(ExitCode::Connectivity),
            Self::Interrupted => Some(ExitCode::Interrupted),
            Self::Store(_) => None,
        }
    }

    /// Render for stderr, as a `StructuredError` when `json` is set.
    pub fn render(&self, code: ExitCode, json: bool) -> serde_json::Result<String> {
        if json {
            serde_json::to_string_pretty(&StructuredError::new(self, code))
        } else {
            Ok(format!("[{}] {}", code.code_prefix(), self.to_string().red()))
        }
    }
}

/// Outcome of a scripted check-in.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckInReport {
    pub worker_id: String,
    pub username: String,
    /// First line of the service response.
    pub result: String,
    pub registered: bool,
    pub spoken: String,
}

/// Runs blocking service calls off-thread so Ctrl+C can interrupt the wait.
pub struct Runner {
    shutdown: ShutdownHandler,
    spinner: bool,
}

impl Runner {
    #[must_use]
    pub fn new(shutdown: ShutdownHandler, spinner: bool) -> Self {
        Self { shutdown, spinner }
    }

    fn wait<T, F>(&self, message: &str, job: F) -> Result<T, HeadlessError>
    where
        T: Send + 'static,
        F: FnOnce() -> T + Send + 'static,
    {
        let spinner = self.spinner.then(|| {
            let pb = ProgressBar::new_spinner();
            if let Ok(style) = ProgressStyle::with_template("{spinner} {msg}") {
                pb.set_style(style);
            }
            pb.set_message(message.to_string());
            pb.enable_steady_tick(Duration::from_millis(100));
            pb
        });

        let (tx, rx) = mpsc::channel();
        thread::spawn(move || {
            let _ = tx.send(job());
        });

        let outcome = loop {
            if self.shutdown.is_shutdown_requested() {
                break Err(HeadlessError::Interrupted);
            }
            match rx.recv_timeout(INTERRUPT_POLL) {
                Ok(value) => break Ok(value),
                Err(mpsc::RecvTimeoutError::Timeout) => continue,
                Err(mpsc::RecvTimeoutError::Disconnected) => break Err(HeadlessError::Interrupted),
            }
        };

        if let Some(pb) = spinner {
            pb.finish_and_clear();
        }
        outcome
    }

    /// Log in and persist the session on success.
    pub fn login(
        &self,
        store: &dyn SessionStore,
        service: Arc<dyn AccessService>,
        markers: &ResponseMarkers,
        username: &str,
        password: &str,
    ) -> Result<Session, HeadlessError> {
        let (user, pass) = (username.to_string(), password.to_string());
        let body = self.wait("Signing in...", move || {
            service::login(service.as_ref(), &user, &pass)
        })??;

        match markers.parse_login(&body) {
            LoginOutcome::Accepted => {
                log::info!("Login accepted for {}", username);
                Ok(store.set(username)?)
            }
            LoginOutcome::Rejected { message } => Err(HeadlessError::LoginRejected(message)),
        }
    }

    /// Submit a scan for `worker_id` and speak the result.
    ///
    /// `username` defaults to the stored session's username.
    pub fn check_in(
        &self,
        store: &dyn SessionStore,
        service: Arc<dyn AccessService>,
        markers: &ResponseMarkers,
        speech: &dyn SpeechNotifier,
        worker_id: &str,
        username: Option<&str>,
    ) -> Result<CheckInReport, HeadlessError> {
        let username = match username {
            Some(name) => name.to_string(),
            None => store
                .get()
                .map(|s| s.username)
                .ok_or(ScanGuardError::NoSession)?,
        };
        let request = ScanRequest::new(worker_id, username);
        guard_scan(store, &request)?;

        let sent = request.clone();
        let body = self.wait("Checking...", move || service::scan(service.as_ref(), &sent))??;

        let result = markers.parse_scan(&body);
        let spoken = markers.speech_text(&result);
        speech.speak(&spoken);

        Ok(CheckInReport {
            worker_id: request.worker_id,
            username: request.username,
            registered: !markers.is_unregistered(&result),
            result: result.display_text,
            spoken,
        })
    }
}
