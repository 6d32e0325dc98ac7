//! Screen flow for the check-in kiosk.
//!
//! # Overview
//!
//! Three screens, one forward path:
//!
//! ```text
//! Login --(credentials accepted)--> Scanner --(worker-ID)--> Confirmation
//!   ^                                  ^                          |
//!   |                                  +-------(rescan)-----------+
//!   +------------(no session / username mismatch)-----------------+
//! ```
//!
//! The flow knows nothing about terminals. Front-ends translate input into
//! [`Action`]s, feed them to [`FlowController::handle_action`], call
//! [`FlowController::pump`] every frame, and render from the accessors.
//!
//! # Example
//!
//! ```
//! use std::sync::Arc;
//! use gatepass::flow::{Action, FlowController, Screen};
//! use gatepass::flow::field::TextEdit;
//! use gatepass::input::ManualEntry;
//! use gatepass::service::{AccessService, Action as ServiceAction, ResponseMarkers, ServiceError};
//! use gatepass::session::MemorySessionStore;
//! use gatepass::speech::SilentSpeech;
//!
//! struct AlwaysOk;
//! impl AccessService for AlwaysOk {
//!     fn submit(&self, _: ServiceAction, _: &[(&str, &str)]) -> Result<String, ServiceError> {
//!         Ok("登入成功".to_string())
//!     }
//! }
//!
//! let mut flow = FlowController::new(
//!     Arc::new(MemorySessionStore::new()),
//!     Arc::new(AlwaysOk),
//!     Box::new(SilentSpeech),
//!     Box::new(ManualEntry::new()),
//!     ResponseMarkers::default(),
//! )
//! .with_executor(Box::new(gatepass::flow::InlineExecutor));
//!
//! flow.handle_action(Action::Edit(TextEdit::Insert('A')));
//! flow.handle_action(Action::NextField);
//! flow.handle_action(Action::Submit);
//! flow.pump();
//! assert_eq!(flow.screen(), Screen::Scanner);
//! ```

pub mod controller;
pub mod field;
pub mod scope;
pub mod screens;
pub mod tasks;

pub use controller::FlowController;
pub use scope::{CancelToken, ScreenScope};
pub use screens::{ConfirmationState, LoginField, LoginState, ScannerState};
pub use tasks::{Executor, InlineExecutor, ThreadExecutor};

use field::TextEdit;

/// The screens of the kiosk.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Screen {
    #[default]
    Login,
    Scanner,
    Confirmation,
}

impl std::fmt::Display for Screen {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Login => write!(f, "Login"),
            Self::Scanner => write!(f, "Scanner"),
            Self::Confirmation => write!(f, "Confirmation"),
        }
    }
}

/// User intent, independent of how it was entered.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    /// Edit the focused text field
    Edit(TextEdit),
    /// Move focus to the next field
    NextField,
    /// Move focus to the previous field
    PreviousField,
    /// Submit the current screen (login, submit code, or rescan)
    Submit,
    /// Return from Confirmation to Scanner
    Rescan,
    /// Hardware/system back
    Back,
    /// Ask to leave the application
    Quit,
    /// Accept the open dialog
    Confirm,
    /// Dismiss the open dialog
    Cancel,
}

/// A modal dialog.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Dialog {
    /// Informational alert, dismissed by any confirm/cancel.
    Alert { title: String, message: String },
    /// "Are you sure you want to exit?"
    ConfirmExit,
}

impl Dialog {
    pub fn alert(title: impl Into<String>, message: impl Into<String>) -> Self {
        Self::Alert {
            title: title.into(),
            message: message.into(),
        }
    }
}

/// User-facing messages.
pub mod messages {
    pub const ERROR_TITLE: &str = "Error";
    pub const LOGIN_FAILED_TITLE: &str = "Login failed";
    pub const LOGIN_REJECTED: &str = "Please check your username and password";
    pub const CONNECTIVITY: &str = "Unable to connect to the server";
    pub const NO_SESSION: &str = "No logged-in user found, please log in again";
    pub const USER_MISMATCH: &str =
        "The logged-in account does not match the username in the scan data";
    pub const REQUEST_FAILED: &str = "Data request failed";
}
