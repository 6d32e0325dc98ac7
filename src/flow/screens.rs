//! Per-screen state containers.

use super::field::{TextEdit, TextField};
use crate::session::ScanRequest;

/// Which login field has focus.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LoginField {
    #[default]
    Username,
    Password,
}

/// Login screen state.
#[derive(Debug, Clone, Default)]
pub struct LoginState {
    pub username: TextField,
    pub password: TextField,
    pub focus: LoginField,
    pub loading: bool,
}

impl LoginState {
    /// Apply an edit to the focused field.
    pub fn edit(&mut self, edit: TextEdit) {
        match self.focus {
            LoginField::Username => self.username.apply(edit),
            LoginField::Password => self.password.apply(edit),
        }
    }

    pub fn toggle_focus(&mut self) {
        self.focus = match self.focus {
            LoginField::Username => LoginField::Password,
            LoginField::Password => LoginField::Username,
        };
    }
}

/// Scanner screen state. The input provider holds the rest.
#[derive(Debug, Clone, Default)]
pub struct ScannerState {
    /// Guard on whose behalf worker-IDs are submitted.
    pub username: String,
}

/// Confirmation screen state.
#[derive(Debug, Clone)]
pub struct ConfirmationState {
    pub request: ScanRequest,
    pub loading: bool,
    /// First line of the scan response, or a failure notice.
    pub result: Option<String>,
}

impl ConfirmationState {
    #[must_use]
    pub fn new(request: ScanRequest) -> Self {
        Self {
            request,
            loading: true,
            result: None,
        }
    }
}
