#![allow(dead_code)]

use async_trait::async_trait;
use std::sync::{Arc, Mutex};
use warehouse_fleet::common::{AuthError, SubmitError};
use warehouse_fleet::domains::logger::DomainLogger;
use warehouse_fleet::domains::scanner_agent::{Credentials, ScanReport, WarehouseBackend};

type LoginFn = dyn Fn(&Credentials, usize) -> Result<String, AuthError> + Send + Sync;
type SubmitFn = dyn Fn(&str, &ScanReport, usize) -> Result<(), SubmitError> + Send + Sync;

#[derive(Default)]
struct Calls {
    logins: Vec<String>,
    submits: Vec<(String, ScanReport)>,
}

/// In-memory backend. Replies come from the given closures, which receive the
/// zero-based index of the call; every call is recorded for assertions.
pub struct MockBackend {
    login_fn: Box<LoginFn>,
    submit_fn: Box<SubmitFn>,
    calls: Mutex<Calls>,
}

impl MockBackend {
    pub fn new<L, S>(login_fn: L, submit_fn: S) -> Self
    where
        L: Fn(&Credentials, usize) -> Result<String, AuthError> + Send + Sync + 'static,
        S: Fn(&str, &ScanReport, usize) -> Result<(), SubmitError> + Send + Sync + 'static,
    {
        Self {
            login_fn: Box::new(login_fn),
            submit_fn: Box::new(submit_fn),
            calls: Mutex::new(Calls::default()),
        }
    }

    /// Every login succeeds with a distinct token, every report is accepted.
    pub fn always_ok() -> Self {
        Self::new(|creds, n| Ok(format!("token-{}-{}", creds.email, n)), |_, _, _| Ok(()))
    }

    pub fn with_submit<S>(submit_fn: S) -> Self
    where
        S: Fn(&str, &ScanReport, usize) -> Result<(), SubmitError> + Send + Sync + 'static,
    {
        Self::new(|creds, n| Ok(format!("token-{}-{}", creds.email, n)), submit_fn)
    }

    pub fn total_logins(&self) -> usize {
        self.calls.lock().unwrap().logins.len()
    }

    pub fn total_submits(&self) -> usize {
        self.calls.lock().unwrap().submits.len()
    }

    pub fn logins_for(&self, agent_id: &str) -> usize {
        let email = format!("{}@robots.local", agent_id.to_lowercase());
        self.calls.lock().unwrap().logins.iter().filter(|e| **e == email).count()
    }

    pub fn submits_for(&self, agent_id: &str) -> usize {
        self.calls
            .lock()
            .unwrap()
            .submits
            .iter()
            .filter(|(_, report)| report.robot_id == agent_id)
            .count()
    }

    pub fn submitted(&self) -> Vec<(String, ScanReport)> {
        self.calls.lock().unwrap().submits.clone()
    }
}

#[async_trait]
impl WarehouseBackend for MockBackend {
    async fn login(&self, credentials: &Credentials) -> Result<String, AuthError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.logins.push(credentials.email.clone());
            calls.logins.len() - 1
        };
        (self.login_fn)(credentials, n)
    }

    async fn submit_report(&self, token: &str, report: &ScanReport) -> Result<(), SubmitError> {
        let n = {
            let mut calls = self.calls.lock().unwrap();
            calls.submits.push((token.to_string(), report.clone()));
            calls.submits.len() - 1
        };
        (self.submit_fn)(token, report, n)
    }
}

pub struct BridgeCapture {
    pub messages: Arc<Mutex<Vec<String>>>,
}

impl BridgeCapture {
    pub fn new() -> Self {
        Self { messages: Arc::new(Mutex::new(Vec::new())) }
    }

    pub fn contains(&self, needle: &str) -> bool {
        self.messages.lock().unwrap().iter().any(|m| m.contains(needle))
    }
}

impl DomainLogger for BridgeCapture {
    fn info(&self, msg: &str) { self.messages.lock().unwrap().push(format!("INFO:{}", msg)); }
    fn warn(&self, msg: &str) { self.messages.lock().unwrap().push(format!("WARN:{}", msg)); }
    fn error(&self, msg: &str) { self.messages.lock().unwrap().push(format!("ERR:{}", msg)); }
}
