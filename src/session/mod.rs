//! Local session persistence.
//!
//! Holds the one piece of state that survives restarts: the username of the
//! guard who last logged in. Scan requests and results are ephemeral and live
//! here only as types.
//!
//! # Architecture
//!
//! * [`data`]: Session, scan request, and scan result models.
//! * [`store`]: The [`SessionStore`] trait with file-backed and in-memory stores.

pub mod data;
pub mod store;

pub use data::{ScanRequest, ScanResult, Session, SESSION_VERSION};
pub use store::{FileSessionStore, MemorySessionStore, SessionStore, StoreError};
