//! Data structures for sessions and scans.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Current version of the session file format.
pub const SESSION_VERSION: u32 = 1;

/// The logged-in guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    /// Format version.
    pub version: u32,
    /// Username accepted by the access service.
    pub username: String,
    /// When the login happened.
    pub logged_in_at: DateTime<Utc>,
}

impl Session {
    /// Create a session for `username` stamped with the current time.
    pub fn new(username: impl Into<String>) -> Self {
        Self {
            version: SESSION_VERSION,
            username: username.into(),
            logged_in_at: Utc::now(),
        }
    }

    /// Whether a scan request may be issued on behalf of this session.
    ///
    /// The request's username must contain the session username.
    #[must_use]
    pub fn authorizes(&self, request: &ScanRequest) -> bool {
        request.username.contains(&self.username)
    }
}

/// A worker-ID submitted for check-in, together with the guard that scanned it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScanRequest {
    pub worker_id: String,
    pub username: String,
}

impl ScanRequest {
    pub fn new(worker_id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            worker_id: worker_id.into(),
            username: username.into(),
        }
    }
}

/// The human-readable outcome of a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ScanResult {
    /// First line of the service response: name and permission status.
    pub display_text: String,
}
