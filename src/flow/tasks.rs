//! Background work for the flow controller.
//!
//! Network calls must not stall the UI loop, so they run through an
//! [`Executor`] and report back as a [`Completion`] over a channel.

use std::thread;

use super::scope::CancelToken;
use crate::service::ServiceError;
use crate::session::ScanRequest;

/// A unit of background work.
pub type Job = Box<dyn FnOnce() + Send + 'static>;

/// Runs jobs.
pub trait Executor: Send + Sync {
    fn spawn(&self, job: Job);
}

/// Runs each job on its own thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadExecutor;

impl Executor for ThreadExecutor {
    fn spawn(&self, job: Job) {
        thread::spawn(job);
    }
}

/// Runs each job immediately on the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct InlineExecutor;

impl Executor for InlineExecutor {
    fn spawn(&self, job: Job) {
        job();
    }
}

/// Finished work, tagged with the token of the visit that started it.
#[derive(Debug)]
pub struct Completion {
    pub token: CancelToken,
    pub outcome: Outcome,
}

/// What finished.
#[derive(Debug)]
pub enum Outcome {
    Login {
        username: String,
        result: Result<String, ServiceError>,
    },
    Scan {
        request: ScanRequest,
        result: Result<String, ServiceError>,
    },
}
