//! Structured error handling, exit codes, and support reports.

use serde::Serialize;

/// Exit codes for the gatepass application.
///
/// - 0: Success
/// - 1: General error (unexpected failure)
/// - 2: Login rejected by the access service
/// - 3: No logged-in user (or the stored user does not match)
/// - 4: The access service could not be reached
/// - 130: Interrupted by user (Ctrl+C)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ExitCode {
    /// Completed normally.
    Success = 0,
    /// An unexpected error occurred.
    GeneralError = 1,
    /// The service rejected the supplied credentials.
    LoginRejected = 2,
    /// No usable session was found.
    NoSession = 3,
    /// The service could not be reached or answered with an error status.
    Connectivity = 4,
    /// Interrupted by user (Ctrl+C).
    Interrupted = 130,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "GP000",
            Self::GeneralError => "GP001",
            Self::LoginRejected => "GP002",
            Self::NoSession => "GP003",
            Self::Connectivity => "GP004",
            Self::Interrupted => "GP130",
        }
    }
}

/// Structured error information for JSON output.
#[derive(Debug, Serialize)]
pub struct StructuredError {
    /// The error code (e.g., "GP004")
    pub code: String,
    /// The exit code number
    pub exit_code: i32,
    /// Human-readable error message
    pub message: String,
    /// Whether the operation was interrupted
    pub interrupted: bool,
}

impl StructuredError {
    /// Create a new structured error from an error and an exit code.
    #[must_use]
    pub fn new(err: &impl std::fmt::Display, exit_code: ExitCode) -> Self {
        Self {
            code: exit_code.code_prefix().to_string(),
            exit_code: exit_code.as_i32(),
            message: err.to_string(),
            interrupted: exit_code == ExitCode::Interrupted,
        }
    }
}

/// Format an error as a message the user can copy and send to support.
///
/// The full cause chain is included, one cause per line.
#[must_use]
pub fn support_report(err: &anyhow::Error) -> String {
    let mut message = format!("An error occurred: {err}");
    for cause in err.chain().skip(1) {
        message.push_str(&format!("\n  caused by: {cause}"));
    }
    message.push_str("\nPlease copy this message and send it to technical support.");
    message
}
