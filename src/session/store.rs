//! Session stores.
//!
//! The file store writes the session as JSON wrapped in an envelope with a
//! SHA256 checksum. Anything that cannot be read back intact counts as "no
//! session": the guard is simply asked to log in again.

use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use thiserror::Error;

use super::data::{Session, SESSION_VERSION};

/// File name used inside the platform data directory.
pub const SESSION_FILE_NAME: &str = "session.json";

/// Errors raised while persisting a session.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The platform data directory could not be determined.
    #[error("failed to determine the application data directory")]
    NoDataDir,

    /// Filesystem failure while writing the session.
    #[error("failed to write session file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The session could not be serialized.
    #[error("failed to serialize session: {0}")]
    Serialize(#[from] serde_json::Error),
}

/// Read/write access to the persisted session.
///
/// `get` never fails: an unavailable store reads as "absent".
pub trait SessionStore: Send + Sync {
    /// The stored session, if any.
    fn get(&self) -> Option<Session>;

    /// Replace the stored session with one for `username`.
    fn set(&self, username: &str) -> Result<Session, StoreError>;
}

/// Envelope for session files to include integrity checks.
#[derive(Debug, Serialize, Deserialize)]
struct SessionEnvelope {
    /// SHA256 checksum of the compact serialized session.
    checksum: String,
    session: Session,
}

fn checksum(session: &Session) -> Result<String, serde_json::Error> {
    let json = serde_json::to_string(session)?;
    let mut hasher = Sha256::new();
    hasher.update(json.as_bytes());
    Ok(format!("{:x}", hasher.finalize()))
}

/// Session store backed by a JSON file.
#[derive(Debug, Clone)]
pub struct FileSessionStore {
    path: PathBuf,
}

impl FileSessionStore {
    /// Store at an explicit path.
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Store in the platform-specific data directory.
    pub fn default_location() -> Result<Self, StoreError> {
        let dirs = ProjectDirs::from("com", "gatepass", "gatepass").ok_or(StoreError::NoDataDir)?;
        Ok(Self::new(dirs.data_dir().join(SESSION_FILE_NAME)))
    }

    /// Path of the backing file.
    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    fn read(&self) -> anyhow::Result<Option<Session>> {
        if !self.path.exists() {
            return Ok(None);
        }
        let content = fs::read_to_string(&self.path)?;
        let envelope: SessionEnvelope = serde_json::from_str(&content)?;

        if checksum(&envelope.session)? != envelope.checksum {
            anyhow::bail!("checksum mismatch");
        }
        if envelope.session.version != SESSION_VERSION {
            anyhow::bail!(
                "unsupported session version {} (expected {})",
                envelope.session.version,
                SESSION_VERSION
            );
        }
        Ok(Some(envelope.session))
    }
}

impl SessionStore for FileSessionStore {
    fn get(&self) -> Option<Session> {
        match self.read() {
            Ok(session) => session,
            Err(e) => {
                log::warn!(
                    "Ignoring unreadable session file {}: {}",
                    self.path.display(),
                    e
                );
                None
            }
        }
    }

    fn set(&self, username: &str) -> Result<Session, StoreError> {
        let session = Session::new(username);
        let envelope = SessionEnvelope {
            checksum: checksum(&session)?,
            session: session.clone(),
        };
        let json = serde_json::to_string_pretty(&envelope)?;

        let io_err = |source| StoreError::Io {
            path: self.path.clone(),
            source,
        };
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent).map_err(io_err)?;
        }
        fs::write(&self.path, json).map_err(io_err)?;

        log::debug!("Session for {} saved to {}", username, self.path.display());
        Ok(session)
    }
}

/// Session store that lives only as long as the process.
#[derive(Debug, Default)]
pub struct MemorySessionStore {
    session: Mutex<Option<Session>>,
}

impl MemorySessionStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Store pre-populated with `username`.
    #[must_use]
    pub fn with_user(username: &str) -> Self {
        Self {
            session: Mutex::new(Some(Session::new(username))),
        }
    }
}

impl SessionStore for MemorySessionStore {
    fn get(&self) -> Option<Session> {
        self.session.lock().ok().and_then(|s| s.clone())
    }

    fn set(&self, username: &str) -> Result<Session, StoreError> {
        let session = Session::new(username);
        if let Ok(mut slot) = self.session.lock() {
            *slot = Some(session.clone());
        }
        Ok(session)
    }
}
