//! Interpretation of access service responses.

use serde::{Deserialize, Serialize};

use crate::session::ScanResult;

/// Default prefix of a successful login response.
pub const DEFAULT_LOGIN_SUCCESS_MARKER: &str = "登入成功";

/// Default substring of a scan response for an unknown badge.
pub const DEFAULT_UNREGISTERED_MARKER: &str = "工作證未註冊";

/// Default phrase appended to the spoken result of a registered badge.
pub const DEFAULT_SUCCESS_SUFFIX: &str = "登記成功";

/// Result of a login attempt as reported by the service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginOutcome {
    Accepted,
    Rejected { message: String },
}

impl LoginOutcome {
    #[must_use]
    pub fn is_accepted(&self) -> bool {
        matches!(self, Self::Accepted)
    }
}

/// The literal strings the service uses to signal outcomes.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResponseMarkers {
    pub login_success: String,
    pub unregistered: String,
    pub success_suffix: String,
}

impl Default for ResponseMarkers {
    fn default() -> Self {
        Self {
            login_success: DEFAULT_LOGIN_SUCCESS_MARKER.to_string(),
            unregistered: DEFAULT_UNREGISTERED_MARKER.to_string(),
            success_suffix: DEFAULT_SUCCESS_SUFFIX.to_string(),
        }
    }
}

impl ResponseMarkers {
    /// Interpret a login response body.
    #[must_use]
    pub fn parse_login(&self, body: &str) -> LoginOutcome {
        if body.starts_with(&self.login_success) {
            LoginOutcome::Accepted
        } else {
            LoginOutcome::Rejected {
                message: body.trim().to_string(),
            }
        }
    }

    /// Interpret a scan response body. Everything after the first line break is ignored.
    #[must_use]
    pub fn parse_scan(&self, body: &str) -> ScanResult {
        let first_line = body.split('\n').next().unwrap_or_default();
        ScanResult {
            display_text: first_line.trim_end_matches('\r').to_string(),
        }
    }

    /// What to say aloud for a scan result.
    #[must_use]
    pub fn speech_text(&self, result: &ScanResult) -> String {
        if self.is_unregistered(result) {
            result.display_text.clone()
        } else {
            format!("{} {}", result.display_text, self.success_suffix)
        }
    }

    /// Whether the result reports an unregistered badge.
    #[must_use]
    pub fn is_unregistered(&self, result: &ScanResult) -> bool {
        result.display_text.contains(&self.unregistered)
    }
}
