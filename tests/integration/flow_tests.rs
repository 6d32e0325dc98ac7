//! End-to-end tests of the Login → Scanner → Confirmation flow with
//! scripted services.

use std::sync::Arc;
use std::time::{Duration, Instant};

use gatepass::flow::messages;
use gatepass::flow::{Action, Dialog, Screen};
use gatepass::input::{DeviceScanner, ManualEntry};
use gatepass::service::{Action as ServiceAction, ServiceError};
use gatepass::session::{MemorySessionStore, SessionStore};
use tempfile::tempdir;

use super::support::{
    kiosk, log_in, type_text, DeferredExecutor, ForgetfulStore, RecordingSpeech, ScriptedService,
    LOGIN_OK,
};

fn fields(pairs: &[(&str, &str)]) -> Vec<(String, String)> {
    pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect()
}

fn alert_message(dialog: Option<&Dialog>) -> Option<&str> {
    match dialog {
        Some(Dialog::Alert { message, .. }) => Some(message.as_str()),
        _ => None,
    }
}

// =============================================================================
// Login
// =============================================================================

#[test]
fn test_login_accepted_persists_and_opens_scanner() {
    let store = Arc::new(MemorySessionStore::new());
    let service = ScriptedService::replying(&["登入成功，歡迎使用"]);
    let mut flow = kiosk(
        store.clone(),
        service.clone(),
        RecordingSpeech::default(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "secret");

    assert_eq!(flow.screen(), Screen::Scanner);
    assert_eq!(flow.scanner().username, "A1");
    assert_eq!(store.get().unwrap().username, "A1");
    assert!(flow.login().password.is_empty());
    assert!(flow.dialog().is_none());

    let calls = service.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].0, ServiceAction::Login);
    assert_eq!(calls[0].1, fields(&[("username", "A1"), ("password", "secret")]));
}

#[test]
fn test_login_rejected_keeps_store_and_screen() {
    let store = Arc::new(MemorySessionStore::new());
    let service = ScriptedService::replying(&["密碼錯誤"]);
    let mut flow = kiosk(
        store.clone(),
        service,
        RecordingSpeech::default(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "wrong");

    assert_eq!(flow.screen(), Screen::Login);
    assert!(store.get().is_none());
    assert!(!flow.login().loading);
    match flow.dialog() {
        Some(Dialog::Alert { title, message }) => {
            assert_eq!(title, messages::LOGIN_FAILED_TITLE);
            assert_eq!(message, messages::LOGIN_REJECTED);
        }
        other => panic!("expected login failure alert, got {:?}", other),
    }
}

#[test]
fn test_login_marker_must_be_prefix() {
    let store = Arc::new(MemorySessionStore::new());
    let service = ScriptedService::replying(&["錯誤：登入成功"]);
    let mut flow = kiosk(
        store.clone(),
        service,
        RecordingSpeech::default(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "pw");

    assert_eq!(flow.screen(), Screen::Login);
    assert!(store.get().is_none());
}

#[test]
fn test_login_connectivity_failure() {
    let service = ScriptedService::new(vec![Err(ServiceError::Transport(
        "connection refused".to_string(),
    ))]);
    let mut flow = kiosk(
        Arc::new(MemorySessionStore::new()),
        service,
        RecordingSpeech::default(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "pw");

    assert_eq!(flow.screen(), Screen::Login);
    assert!(!flow.is_loading());
    assert_eq!(alert_message(flow.dialog()), Some(messages::CONNECTIVITY));

    // Dismissing the alert leaves the form usable
    assert!(flow.handle_action(Action::Confirm));
    assert!(flow.dialog().is_none());
    assert_eq!(flow.login().username.value(), "A1");
}

// =============================================================================
// Scanning
// =============================================================================

#[test]
fn test_manual_scan_registered_worker() {
    let store = Arc::new(MemorySessionStore::new());
    let speech = RecordingSpeech::default();
    let service = ScriptedService::replying(&[LOGIN_OK, "王小明 允許進入\n第二行"]);
    let mut flow = kiosk(
        store,
        service.clone(),
        speech.clone(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "pw");
    type_text(&mut flow, "W-0042");
    flow.handle_action(Action::Submit);
    flow.pump();

    assert_eq!(flow.screen(), Screen::Confirmation);
    let confirmation = flow.confirmation().unwrap();
    assert!(!confirmation.loading);
    assert_eq!(confirmation.result.as_deref(), Some("王小明 允許進入"));
    assert_eq!(speech.spoken(), vec!["王小明 允許進入 登記成功".to_string()]);

    assert_eq!(service.count(ServiceAction::Scan), 1);
    let scan = &service.calls()[1];
    assert_eq!(scan.1, fields(&[("userId", "W-0042"), ("username", "A1")]));
}

#[test]
fn test_manual_scan_unregistered_worker() {
    let speech = RecordingSpeech::default();
    let service = ScriptedService::replying(&[LOGIN_OK, "工作證未註冊"]);
    let mut flow = kiosk(
        Arc::new(MemorySessionStore::new()),
        service,
        speech.clone(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "pw");
    type_text(&mut flow, "W-9");
    flow.handle_action(Action::Submit);
    flow.pump();

    assert_eq!(
        flow.confirmation().unwrap().result.as_deref(),
        Some("工作證未註冊")
    );
    assert_eq!(speech.spoken(), vec!["工作證未註冊".to_string()]);
}

#[test]
fn test_scan_request_failure_shows_notice() {
    let speech = RecordingSpeech::default();
    let service = ScriptedService::new(vec![Ok(LOGIN_OK.to_string()), Err(ServiceError::Status(500))]);
    let mut flow = kiosk(
        Arc::new(MemorySessionStore::new()),
        service,
        speech.clone(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "pw");
    type_text(&mut flow, "W-1");
    flow.handle_action(Action::Submit);
    flow.pump();

    assert_eq!(flow.screen(), Screen::Confirmation);
    assert_eq!(
        flow.confirmation().unwrap().result.as_deref(),
        Some(messages::REQUEST_FAILED)
    );
    assert_eq!(alert_message(flow.dialog()), Some(messages::CONNECTIVITY));
    assert!(speech.spoken().is_empty());
}

#[test]
fn test_empty_manual_entry_is_not_sent() {
    let service = ScriptedService::replying(&[LOGIN_OK]);
    let mut flow = kiosk(
        Arc::new(MemorySessionStore::new()),
        service.clone(),
        RecordingSpeech::default(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "pw");
    type_text(&mut flow, "   ");
    flow.handle_action(Action::Submit);

    assert_eq!(flow.screen(), Screen::Scanner);
    assert_eq!(alert_message(flow.dialog()), Some("Please enter the QR code data"));
    assert_eq!(service.count(ServiceAction::Scan), 0);
}

#[test]
fn test_manual_entry_sent_as_typed() {
    let service = ScriptedService::replying(&[LOGIN_OK, "王小明 允許進入"]);
    let mut flow = kiosk(
        Arc::new(MemorySessionStore::new()),
        service.clone(),
        RecordingSpeech::default(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "pw");
    type_text(&mut flow, " W-0042 ");
    flow.handle_action(Action::Submit);
    flow.pump();

    let scan = &service.calls()[1];
    assert_eq!(scan.1, fields(&[("userId", " W-0042 "), ("username", "A1")]));
}

#[test]
fn test_username_mismatch_returns_to_login() {
    let store = Arc::new(MemorySessionStore::new());
    let service = ScriptedService::replying(&[LOGIN_OK]);
    let mut flow = kiosk(
        store.clone(),
        service.clone(),
        RecordingSpeech::default(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "pw");
    // Another login replaced the stored session
    store.set("B2").unwrap();

    type_text(&mut flow, "W-1");
    flow.handle_action(Action::Submit);
    flow.pump();

    assert_eq!(flow.screen(), Screen::Login);
    assert_eq!(alert_message(flow.dialog()), Some(messages::USER_MISMATCH));
    assert_eq!(service.count(ServiceAction::Scan), 0);
}

#[test]
fn test_session_username_substring_authorizes() {
    let store = Arc::new(MemorySessionStore::new());
    let service = ScriptedService::replying(&[LOGIN_OK, "李四"]);
    let mut flow = kiosk(
        store.clone(),
        service.clone(),
        RecordingSpeech::default(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "guard-01", "pw");
    store.set("guard").unwrap();

    type_text(&mut flow, "W-1");
    flow.handle_action(Action::Submit);
    flow.pump();

    assert_eq!(flow.screen(), Screen::Confirmation);
    assert_eq!(service.count(ServiceAction::Scan), 1);
}

#[test]
fn test_missing_session_returns_to_login() {
    let service = ScriptedService::replying(&[LOGIN_OK]);
    let mut flow = kiosk(
        Arc::new(ForgetfulStore),
        service.clone(),
        RecordingSpeech::default(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "pw");
    assert_eq!(flow.screen(), Screen::Scanner);
    assert_eq!(flow.scanner().username, "A1");

    type_text(&mut flow, "W-1");
    flow.handle_action(Action::Submit);
    flow.pump();

    assert_eq!(flow.screen(), Screen::Login);
    assert_eq!(alert_message(flow.dialog()), Some(messages::NO_SESSION));
    assert_eq!(service.count(ServiceAction::Scan), 0);
}

// =============================================================================
// Rescan and cancellation
// =============================================================================

#[test]
fn test_rescan_rearms_scanner() {
    let service = ScriptedService::replying(&[LOGIN_OK, "張三", "李四"]);
    let speech = RecordingSpeech::default();
    let mut flow = kiosk(
        Arc::new(MemorySessionStore::new()),
        service.clone(),
        speech.clone(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "pw");
    type_text(&mut flow, "W-1");
    flow.handle_action(Action::Submit);
    flow.pump();
    assert!(flow.input().scanned());

    assert!(flow.handle_action(Action::Submit));
    assert_eq!(flow.screen(), Screen::Scanner);
    assert!(flow.confirmation().is_none());
    assert!(!flow.input().scanned());
    assert_eq!(flow.input().text(), Some(""));

    type_text(&mut flow, "W-2");
    flow.handle_action(Action::Submit);
    flow.pump();

    assert_eq!(service.count(ServiceAction::Scan), 2);
    assert_eq!(
        speech.spoken(),
        vec!["張三 登記成功".to_string(), "李四 登記成功".to_string()]
    );
}

#[test]
fn test_result_after_leaving_confirmation_is_discarded() {
    let executor = DeferredExecutor::default();
    let speech = RecordingSpeech::default();
    let service = ScriptedService::replying(&[LOGIN_OK, "張三"]);
    let mut flow = kiosk(
        Arc::new(MemorySessionStore::new()),
        service.clone(),
        speech.clone(),
        Box::new(ManualEntry::new()),
    )
    .with_executor(Box::new(executor.clone()));

    type_text(&mut flow, "A1");
    flow.handle_action(Action::NextField);
    type_text(&mut flow, "pw");
    flow.handle_action(Action::Submit);
    assert!(flow.is_loading());
    executor.run_all();
    flow.pump();
    assert_eq!(flow.screen(), Screen::Scanner);

    type_text(&mut flow, "W-1");
    flow.handle_action(Action::Submit);
    assert_eq!(flow.screen(), Screen::Confirmation);
    assert!(flow.is_loading());

    // Enter is ignored while checking, rescan abandons the check
    assert!(!flow.handle_action(Action::Submit));
    assert!(flow.handle_action(Action::Rescan));
    assert_eq!(flow.screen(), Screen::Scanner);

    executor.run_all();
    flow.pump();

    assert_eq!(service.count(ServiceAction::Scan), 1);
    assert_eq!(flow.screen(), Screen::Scanner);
    assert!(flow.confirmation().is_none());
    assert!(flow.dialog().is_none());
    assert!(speech.spoken().is_empty());
}

#[test]
fn test_device_capture_chimes_and_forwards_once() {
    let dir = tempdir().unwrap();
    let device = dir.path().join("scanner");
    std::fs::write(&device, "W-0001\n").unwrap();

    let speech = RecordingSpeech::default();
    let service = ScriptedService::replying(&[LOGIN_OK, "張三"]);
    let mut flow = kiosk(
        Arc::new(MemorySessionStore::new()),
        service.clone(),
        speech.clone(),
        Box::new(DeviceScanner::new(&device)),
    );

    log_in(&mut flow, "A1", "pw");
    assert_eq!(flow.screen(), Screen::Scanner);

    let deadline = Instant::now() + Duration::from_secs(2);
    while flow.screen() == Screen::Scanner && Instant::now() < deadline {
        flow.pump();
        std::thread::sleep(Duration::from_millis(5));
    }
    flow.pump();

    assert_eq!(flow.screen(), Screen::Confirmation);
    assert_eq!(speech.chimes(), 1);
    assert_eq!(service.count(ServiceAction::Scan), 1);
    assert_eq!(
        service.calls()[1].1,
        fields(&[("userId", "W-0001"), ("username", "A1")])
    );
    assert_eq!(speech.spoken(), vec!["張三 登記成功".to_string()]);
}

// =============================================================================
// Exit handling
// =============================================================================

#[test]
fn test_quit_requires_confirmation() {
    let mut flow = kiosk(
        Arc::new(MemorySessionStore::new()),
        ScriptedService::replying(&[]),
        RecordingSpeech::default(),
        Box::new(ManualEntry::new()),
    );

    flow.handle_action(Action::Quit);
    assert_eq!(flow.dialog(), Some(&Dialog::ConfirmExit));
    flow.handle_action(Action::Cancel);
    assert!(flow.dialog().is_none());
    assert!(!flow.should_quit());

    flow.handle_action(Action::Back);
    assert_eq!(flow.dialog(), Some(&Dialog::ConfirmExit));
    flow.handle_action(Action::Confirm);
    assert!(flow.should_quit());
}

#[test]
fn test_back_suppressed_after_login() {
    let mut flow = kiosk(
        Arc::new(MemorySessionStore::new()),
        ScriptedService::replying(&[LOGIN_OK]),
        RecordingSpeech::default(),
        Box::new(ManualEntry::new()),
    );

    log_in(&mut flow, "A1", "pw");
    assert!(!flow.handle_action(Action::Back));
    assert_eq!(flow.screen(), Screen::Scanner);
    assert!(flow.dialog().is_none());
}
