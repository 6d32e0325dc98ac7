//! Session persistence across store instances (process restarts).

use gatepass::session::{FileSessionStore, SessionStore, SESSION_VERSION};
use std::fs;
use tempfile::tempdir;

#[test]
fn test_session_survives_restart() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("state").join("session.json");

    let first = FileSessionStore::new(&path);
    assert!(first.get().is_none());
    first.set("A1").unwrap();
    drop(first);

    let second = FileSessionStore::new(&path);
    let session = second.get().unwrap();
    assert_eq!(session.username, "A1");
    assert_eq!(session.version, SESSION_VERSION);
}

#[test]
fn test_session_file_is_json() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    FileSessionStore::new(&path).set("guard-07").unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
    assert!(raw.contains("guard-07"));
    assert!(value.is_object());
}

#[test]
fn test_truncated_session_reads_as_logged_out() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("session.json");
    let store = FileSessionStore::new(&path);
    store.set("A1").unwrap();

    let raw = fs::read_to_string(&path).unwrap();
    fs::write(&path, &raw[..raw.len() / 2]).unwrap();

    assert!(FileSessionStore::new(&path).get().is_none());

    // A fresh login repairs the file
    store.set("A1").unwrap();
    assert_eq!(store.get().unwrap().username, "A1");
}
