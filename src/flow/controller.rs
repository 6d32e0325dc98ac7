//! The screen flow state machine.
//!
//! `FlowController` owns every screen's state, the focus scope of the current
//! screen, and handles to the session store, access service, speech notifier
//! and scan input provider. It is driven from a single thread: actions and
//! [`pump`](FlowController::pump) both take `&mut self`, so screen state is
//! never touched concurrently. Network calls run on the executor and come
//! back through a channel.

use std::sync::mpsc::{self, Receiver, Sender};
use std::sync::Arc;

use thiserror::Error;

use super::messages;
use super::scope::ScreenScope;
use super::screens::{ConfirmationState, LoginField, LoginState, ScannerState};
use super::tasks::{Completion, Executor, Outcome, ThreadExecutor};
use super::{Action, Dialog, Screen};
use crate::input::ScanInputProvider;
use crate::service::{self, AccessService, LoginOutcome, ResponseMarkers, ServiceError};
use crate::session::{ScanRequest, Session, SessionStore};
use crate::speech::SpeechNotifier;

/// Why a scan request may not be sent.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanGuardError {
    #[error("no logged-in user found")]
    NoSession,

    #[error("logged-in user {session} does not match scan username {request}")]
    UserMismatch { session: String, request: String },
}

/// Check that the persisted session allows `request` to be sent.
pub fn guard_scan(store: &dyn SessionStore, request: &ScanRequest) -> Result<Session, ScanGuardError> {
    let session = store.get().ok_or(ScanGuardError::NoSession)?;
    if session.authorizes(request) {
        Ok(session)
    } else {
        Err(ScanGuardError::UserMismatch {
            session: session.username,
            request: request.username.clone(),
        })
    }
}

/// Drives the Login → Scanner → Confirmation flow.
pub struct FlowController {
    scope: ScreenScope,
    login: LoginState,
    scanner: ScannerState,
    confirmation: Option<ConfirmationState>,
    dialog: Option<Dialog>,
    quitting: bool,
    store: Arc<dyn SessionStore>,
    service: Arc<dyn AccessService>,
    speech: Box<dyn SpeechNotifier>,
    input: Box<dyn ScanInputProvider>,
    markers: ResponseMarkers,
    executor: Box<dyn Executor>,
    completions_tx: Sender<Completion>,
    completions_rx: Receiver<Completion>,
}

impl FlowController {
    /// Create a controller on the Login screen. Requests run on background threads.
    pub fn new(
        store: Arc<dyn SessionStore>,
        service: Arc<dyn AccessService>,
        speech: Box<dyn SpeechNotifier>,
        input: Box<dyn ScanInputProvider>,
        markers: ResponseMarkers,
    ) -> Self {
        let (completions_tx, completions_rx) = mpsc::channel();
        Self {
            scope: ScreenScope::enter(Screen::Login),
            login: LoginState::default(),
            scanner: ScannerState::default(),
            confirmation: None,
            dialog: None,
            quitting: false,
            store,
            service,
            speech,
            input,
            markers,
            executor: Box::new(ThreadExecutor),
            completions_tx,
            completions_rx,
        }
    }

    /// Replace the executor used for network calls.
    #[must_use]
    pub fn with_executor(mut self, executor: Box<dyn Executor>) -> Self {
        self.executor = executor;
        self
    }

    // ==================== Accessors ====================

    #[must_use]
    pub fn screen(&self) -> Screen {
        self.scope.screen()
    }

    #[must_use]
    pub fn login(&self) -> &LoginState {
        &self.login
    }

    #[must_use]
    pub fn scanner(&self) -> &ScannerState {
        &self.scanner
    }

    #[must_use]
    pub fn confirmation(&self) -> Option<&ConfirmationState> {
        self.confirmation.as_ref()
    }

    #[must_use]
    pub fn dialog(&self) -> Option<&Dialog> {
        self.dialog.as_ref()
    }

    #[must_use]
    pub fn input(&self) -> &dyn ScanInputProvider {
        self.input.as_ref()
    }

    /// Whether the current screen is waiting on the service.
    #[must_use]
    pub fn is_loading(&self) -> bool {
        match self.screen() {
            Screen::Login => self.login.loading,
            Screen::Scanner => false,
            Screen::Confirmation => self.confirmation.as_ref().is_some_and(|c| c.loading),
        }
    }

    #[must_use]
    pub fn should_quit(&self) -> bool {
        self.quitting
    }

    // ==================== Actions ====================

    /// Apply a user action. Returns whether it changed anything.
    pub fn handle_action(&mut self, action: Action) -> bool {
        if self.dialog.is_some() {
            return self.handle_dialog_action(action);
        }

        match action {
            Action::Quit => {
                self.dialog = Some(Dialog::ConfirmExit);
                true
            }
            Action::Back => self.handle_back(),
            _ => match self.screen() {
                Screen::Login => self.handle_login_action(action),
                Screen::Scanner => self.handle_scanner_action(action),
                Screen::Confirmation => self.handle_confirmation_action(action),
            },
        }
    }

    fn handle_dialog_action(&mut self, action: Action) -> bool {
        let Some(dialog) = self.dialog.take() else {
            return false;
        };
        let (confirms_exit, dismisses) = match dialog {
            Dialog::ConfirmExit => (
                matches!(action, Action::Confirm | Action::Submit | Action::Quit),
                matches!(action, Action::Cancel | Action::Back),
            ),
            Dialog::Alert { .. } => (
                false,
                matches!(
                    action,
                    Action::Confirm | Action::Cancel | Action::Submit | Action::Back
                ),
            ),
        };

        if confirms_exit {
            log::info!("Exit confirmed");
            self.quitting = true;
        } else if !dismisses {
            self.dialog = Some(dialog);
        }
        confirms_exit || dismisses
    }

    fn handle_back(&mut self) -> bool {
        match self.screen() {
            Screen::Login => {
                self.dialog = Some(Dialog::ConfirmExit);
                true
            }
            screen => {
                log::trace!("Back suppressed on {}", screen);
                false
            }
        }
    }

    fn handle_login_action(&mut self, action: Action) -> bool {
        if self.login.loading {
            return false;
        }
        match action {
            Action::Edit(edit) => {
                self.login.edit(edit);
                true
            }
            Action::NextField | Action::PreviousField => {
                self.login.toggle_focus();
                true
            }
            Action::Submit => {
                if self.login.focus == LoginField::Username {
                    self.login.focus = LoginField::Password;
                } else {
                    self.start_login();
                }
                true
            }
            _ => false,
        }
    }

    fn handle_scanner_action(&mut self, action: Action) -> bool {
        match action {
            Action::Edit(edit) => {
                self.input.edit(edit);
                true
            }
            Action::Submit => {
                match self.input.submit() {
                    Ok(Some(worker_id)) => self.forward_scan(worker_id),
                    Ok(None) => {}
                    Err(e) => {
                        log::debug!("Scanner input rejected: {}", e);
                        self.dialog = Some(Dialog::alert(messages::ERROR_TITLE, e.to_string()));
                    }
                }
                true
            }
            _ => false,
        }
    }

    fn handle_confirmation_action(&mut self, action: Action) -> bool {
        match action {
            Action::Rescan => {
                if self.is_loading() {
                    log::info!("Pending check abandoned, returning to Scanner");
                }
                self.go_to_scanner(None);
                true
            }
            Action::Submit if !self.is_loading() => {
                self.go_to_scanner(None);
                true
            }
            _ => false,
        }
    }

    // ==================== Background work ====================

    /// Apply finished requests and poll the scan input. Call once per frame.
    pub fn pump(&mut self) {
        while let Ok(completion) = self.completions_rx.try_recv() {
            if completion.token.is_cancelled() {
                log::debug!("Discarding result for a screen that was left: {:?}", completion.outcome);
                continue;
            }
            match completion.outcome {
                Outcome::Login { username, result } => self.finish_login(username, result),
                Outcome::Scan { request, result } => self.finish_scan(&request, result),
            }
        }

        if self.screen() == Screen::Scanner {
            if let Some(worker_id) = self.input.poll() {
                self.speech.chime();
                self.forward_scan(worker_id);
            }
        }
    }

    fn start_login(&mut self) {
        let username = self.login.username.value().to_string();
        let password = self.login.password.value().to_string();
        self.login.loading = true;
        log::info!("Submitting login for {}", username);

        let service = Arc::clone(&self.service);
        let tx = self.completions_tx.clone();
        let token = self.scope.token();
        self.executor.spawn(Box::new(move || {
            let result = service::login(service.as_ref(), &username, &password);
            let _ = tx.send(Completion {
                token,
                outcome: Outcome::Login { username, result },
            });
        }));
    }

    fn finish_login(&mut self, username: String, result: Result<String, ServiceError>) {
        self.login.loading = false;
        let body = match result {
            Ok(body) => body,
            Err(e) => {
                log::error!("Login request failed: {}", e);
                self.dialog = Some(Dialog::alert(messages::ERROR_TITLE, messages::CONNECTIVITY));
                return;
            }
        };

        match self.markers.parse_login(&body) {
            LoginOutcome::Accepted => match self.store.set(&username) {
                Ok(_) => {
                    log::info!("Login accepted for {}", username);
                    self.login.password.clear();
                    self.go_to_scanner(Some(username));
                }
                Err(e) => {
                    log::error!("Failed to persist session: {}", e);
                    self.dialog = Some(Dialog::alert(
                        messages::ERROR_TITLE,
                        format!("Unable to save the session: {e}"),
                    ));
                }
            },
            LoginOutcome::Rejected { message } => {
                log::info!("Login rejected for {}: {}", username, message);
                self.dialog = Some(Dialog::alert(
                    messages::LOGIN_FAILED_TITLE,
                    messages::LOGIN_REJECTED,
                ));
            }
        }
    }

    fn forward_scan(&mut self, worker_id: String) {
        let request = ScanRequest::new(worker_id, self.scanner.username.clone());
        self.go_to_confirmation(request);
    }

    fn start_scan(&mut self, request: ScanRequest) {
        log::info!("Submitting scan of {} for {}", request.worker_id, request.username);
        let service = Arc::clone(&self.service);
        let tx = self.completions_tx.clone();
        let token = self.scope.token();
        self.executor.spawn(Box::new(move || {
            let result = service::scan(service.as_ref(), &request);
            let _ = tx.send(Completion {
                token,
                outcome: Outcome::Scan { request, result },
            });
        }));
    }

    fn finish_scan(&mut self, request: &ScanRequest, result: Result<String, ServiceError>) {
        let Some(state) = self.confirmation.as_mut() else {
            return;
        };
        state.loading = false;

        match result {
            Ok(body) => {
                let scan = self.markers.parse_scan(&body);
                let spoken = self.markers.speech_text(&scan);
                log::info!("Scan of {}: {}", request.worker_id, scan.display_text);
                state.result = Some(scan.display_text);
                self.speech.speak(&spoken);
            }
            Err(e) => {
                log::error!("Scan request for {} failed: {}", request.worker_id, e);
                state.result = Some(messages::REQUEST_FAILED.to_string());
                self.dialog = Some(Dialog::alert(messages::ERROR_TITLE, messages::CONNECTIVITY));
            }
        }
    }

    // ==================== Navigation ====================

    /// Leave the current screen (cancelling its work) and focus `screen`.
    fn enter(&mut self, screen: Screen) {
        log::debug!("Navigate: {} -> {}", self.screen(), screen);
        self.scope = ScreenScope::enter(screen);
    }

    fn go_to_login(&mut self) {
        self.enter(Screen::Login);
        self.confirmation = None;
        self.login.loading = false;
    }

    fn go_to_scanner(&mut self, username: Option<String>) {
        self.enter(Screen::Scanner);
        self.confirmation = None;
        if let Some(name) = self.store.get().map(|s| s.username).or(username) {
            self.scanner.username = name;
        }
        self.input.focus();
    }

    fn go_to_confirmation(&mut self, request: ScanRequest) {
        self.enter(Screen::Confirmation);
        self.confirmation = Some(ConfirmationState::new(request.clone()));

        match guard_scan(self.store.as_ref(), &request) {
            Ok(_) => self.start_scan(request),
            Err(ScanGuardError::NoSession) => {
                log::warn!("No session on Confirmation, returning to Login");
                self.dialog = Some(Dialog::alert(messages::ERROR_TITLE, messages::NO_SESSION));
                self.go_to_login();
            }
            Err(e) => {
                log::warn!("Scan aborted: {}", e);
                self.dialog = Some(Dialog::alert(messages::ERROR_TITLE, messages::USER_MISMATCH));
                self.go_to_login();
            }
        }
    }
}
