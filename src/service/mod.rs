//! Remote access service client.
//!
//! The access service is a spreadsheet macro behind one URL. Every call is a
//! form-encoded POST carrying an `action` field; every answer is plain text.
//!
//! # Architecture
//!
//! * [`http`]: The reqwest-backed [`HttpAccessService`].
//! * [`response`]: Interpretation of the plain text answers.
//!
//! The [`AccessService`] trait is the seam the flow controller talks to, so
//! tests can substitute a scripted service.

pub mod http;
pub mod response;

use thiserror::Error;

use crate::session::ScanRequest;

pub use http::HttpAccessService;
pub use response::{LoginOutcome, ResponseMarkers};

/// The `action` discriminator sent with every request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Login,
    Scan,
}

impl Action {
    /// Wire value of the `action` field.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Login => "login",
            Self::Scan => "scan",
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Errors from talking to the access service.
///
/// All variants are connectivity failures from the user's point of view.
#[derive(Debug, Error)]
pub enum ServiceError {
    /// The request could not be sent or the response could not be read.
    #[error("request to access service failed: {0}")]
    Transport(String),

    /// The service answered with a non-success HTTP status.
    #[error("access service returned HTTP {0}")]
    Status(u16),

    /// The HTTP client could not be constructed.
    #[error("failed to build HTTP client: {0}")]
    Client(String),
}

/// A remote access service.
pub trait AccessService: Send + Sync {
    /// Send one form POST with `action` plus `fields`, returning the raw text body.
    fn submit(&self, action: Action, fields: &[(&str, &str)]) -> Result<String, ServiceError>;
}

/// Submit a login request.
pub fn login(
    service: &dyn AccessService,
    username: &str,
    password: &str,
) -> Result<String, ServiceError> {
    service.submit(
        Action::Login,
        &[("username", username), ("password", password)],
    )
}

/// Submit a scan request.
pub fn scan(service: &dyn AccessService, request: &ScanRequest) -> Result<String, ServiceError> {
    service.submit(
        Action::Scan,
        &[
            ("userId", request.worker_id.as_str()),
            ("username", request.username.as_str()),
        ],
    )
}
