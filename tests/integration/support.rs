//! Test doubles shared by the integration tests.

#![allow(dead_code)]

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use gatepass::flow::field::TextEdit;
use gatepass::flow::tasks::Job;
use gatepass::flow::{Action, Executor, FlowController, InlineExecutor};
use gatepass::input::ScanInputProvider;
use gatepass::service::{AccessService, Action as ServiceAction, ResponseMarkers, ServiceError};
use gatepass::session::{Session, SessionStore, StoreError};
use gatepass::speech::SpeechNotifier;

pub const LOGIN_OK: &str = "登入成功";

/// One recorded request: the action and its form fields.
pub type Call = (ServiceAction, Vec<(String, String)>);

/// Answers from a script and records every request.
#[derive(Default)]
pub struct ScriptedService {
    replies: Mutex<VecDeque<Result<String, ServiceError>>>,
    calls: Mutex<Vec<Call>>,
}

impl ScriptedService {
    pub fn new(replies: Vec<Result<String, ServiceError>>) -> Arc<Self> {
        Arc::new(Self {
            replies: Mutex::new(replies.into()),
            calls: Mutex::default(),
        })
    }

    /// Successful bodies, in order.
    pub fn replying(bodies: &[&str]) -> Arc<Self> {
        Self::new(bodies.iter().map(|b| Ok(b.to_string())).collect())
    }

    pub fn calls(&self) -> Vec<Call> {
        self.calls.lock().unwrap().clone()
    }

    pub fn count(&self, action: ServiceAction) -> usize {
        self.calls().iter().filter(|(a, _)| *a == action).count()
    }
}

impl AccessService for ScriptedService {
    fn submit(&self, action: ServiceAction, fields: &[(&str, &str)]) -> Result<String, ServiceError> {
        self.calls.lock().unwrap().push((
            action,
            fields
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
        ));
        self.replies
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(ServiceError::Transport("no scripted reply".to_string())))
    }
}

/// Records what would have been spoken.
#[derive(Clone, Default)]
pub struct RecordingSpeech {
    spoken: Arc<Mutex<Vec<String>>>,
    chimes: Arc<AtomicUsize>,
}

impl RecordingSpeech {
    pub fn spoken(&self) -> Vec<String> {
        self.spoken.lock().unwrap().clone()
    }

    pub fn chimes(&self) -> usize {
        self.chimes.load(Ordering::SeqCst)
    }
}

impl SpeechNotifier for RecordingSpeech {
    fn speak(&self, text: &str) {
        self.spoken.lock().unwrap().push(text.to_string());
    }

    fn chime(&self) {
        self.chimes.fetch_add(1, Ordering::SeqCst);
    }
}

/// Holds jobs until the test releases them.
#[derive(Clone, Default)]
pub struct DeferredExecutor {
    jobs: Arc<Mutex<Vec<Job>>>,
}

impl DeferredExecutor {
    pub fn run_all(&self) {
        let jobs: Vec<Job> = std::mem::take(&mut *self.jobs.lock().unwrap());
        for job in jobs {
            job();
        }
    }
}

impl Executor for DeferredExecutor {
    fn spawn(&self, job: Job) {
        self.jobs.lock().unwrap().push(job);
    }
}

/// Accepts every login but never remembers it.
#[derive(Default)]
pub struct ForgetfulStore;

impl SessionStore for ForgetfulStore {
    fn get(&self) -> Option<Session> {
        None
    }

    fn set(&self, username: &str) -> Result<Session, StoreError> {
        Ok(Session::new(username))
    }
}

/// A controller running requests inline on the test thread.
pub fn kiosk(
    store: Arc<dyn SessionStore>,
    service: Arc<ScriptedService>,
    speech: RecordingSpeech,
    input: Box<dyn ScanInputProvider>,
) -> FlowController {
    FlowController::new(
        store,
        service,
        Box::new(speech),
        input,
        ResponseMarkers::default(),
    )
    .with_executor(Box::new(InlineExecutor))
}

pub fn type_text(flow: &mut FlowController, text: &str) {
    for c in text.chars() {
        flow.handle_action(Action::Edit(TextEdit::Insert(c)));
    }
}

/// Fill in both login fields, submit, and apply the answer.
pub fn log_in(flow: &mut FlowController, username: &str, password: &str) {
    type_text(flow, username);
    flow.handle_action(Action::NextField);
    type_text(flow, password);
    flow.handle_action(Action::Submit);
    flow.pump();
}
