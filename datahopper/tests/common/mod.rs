//! Shared types for executor integration tests: `Probe` state and `ProbeNode`.
//!
//! `Probe` has three overwrite fields (`a`, `b`, `c`) and one append field (`log`).
//! `ProbeNode` records when its body starts and ends in a shared `Recorder`, so
//! tests can check ordering and how many bodies overlapped.

#![allow(dead_code)]

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use async_trait::async_trait;
use datahopper::{FieldWrite, Node, NodeError, Reducible};

#[derive(Debug, Clone, Default, PartialEq)]
pub struct Probe {
    pub a: Option<String>,
    pub b: Option<String>,
    pub c: Option<String>,
    pub log: Vec<String>,
}

#[derive(Debug, Default)]
pub struct ProbeUpdate {
    pub a: Option<String>,
    pub b: Option<String>,
    pub c: Option<String>,
    pub log: Vec<String>,
}

impl Reducible for Probe {
    type Update = ProbeUpdate;

    fn written_fields(update: &ProbeUpdate) -> Vec<FieldWrite> {
        let mut fields = Vec::new();
        if update.a.is_some() {
            fields.push(FieldWrite::overwrite("a"));
        }
        if update.b.is_some() {
            fields.push(FieldWrite::overwrite("b"));
        }
        if update.c.is_some() {
            fields.push(FieldWrite::overwrite("c"));
        }
        if !update.log.is_empty() {
            fields.push(FieldWrite::append("log"));
        }
        fields
    }

    fn apply(&mut self, update: ProbeUpdate) {
        if update.a.is_some() {
            self.a = update.a;
        }
        if update.b.is_some() {
            self.b = update.b;
        }
        if update.c.is_some() {
            self.c = update.c;
        }
        self.log.extend(update.log);
    }
}

/// Start/end trace plus the peak number of overlapping node bodies.
#[derive(Default)]
pub struct Recorder {
    trace: Mutex<Vec<String>>,
    running: AtomicUsize,
    peak: AtomicUsize,
}

impl Recorder {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    fn start(&self, id: &str) {
        self.trace.lock().unwrap().push(format!("start:{}", id));
        let now = self.running.fetch_add(1, Ordering::SeqCst) + 1;
        self.peak.fetch_max(now, Ordering::SeqCst);
    }

    fn finish(&self, id: &str) {
        self.running.fetch_sub(1, Ordering::SeqCst);
        self.trace.lock().unwrap().push(format!("end:{}", id));
    }

    pub fn trace(&self) -> Vec<String> {
        self.trace.lock().unwrap().clone()
    }

    pub fn position(&self, entry: &str) -> Option<usize> {
        self.trace().iter().position(|e| e == entry)
    }

    pub fn count(&self, entry: &str) -> usize {
        self.trace().iter().filter(|e| *e == entry).count()
    }

    pub fn peak(&self) -> usize {
        self.peak.load(Ordering::SeqCst)
    }
}

/// What a `ProbeNode` writes.
#[derive(Debug, Clone)]
pub enum Action {
    /// Appends its own id to `log`.
    Log,
    SetA(&'static str),
    SetB(&'static str),
    SetC(&'static str),
    /// Appends `"<id>:<snapshot a>"` to `log`.
    ReadA,
    Fail,
}

pub struct ProbeNode {
    id: &'static str,
    delay: Duration,
    action: Action,
    recorder: Arc<Recorder>,
}

impl ProbeNode {
    pub fn new(id: &'static str, delay_ms: u64, action: Action, recorder: &Arc<Recorder>) -> Arc<Self> {
        Arc::new(Self {
            id,
            delay: Duration::from_millis(delay_ms),
            action,
            recorder: Arc::clone(recorder),
        })
    }
}

#[async_trait]
impl Node<Probe> for ProbeNode {
    fn id(&self) -> &str {
        self.id
    }

    async fn run(&self, state: Arc<Probe>) -> Result<ProbeUpdate, NodeError> {
        self.recorder.start(self.id);
        tokio::time::sleep(self.delay).await;
        self.recorder.finish(self.id);
        let mut update = ProbeUpdate::default();
        match &self.action {
            Action::Log => update.log.push(self.id.to_string()),
            Action::SetA(v) => update.a = Some(v.to_string()),
            Action::SetB(v) => update.b = Some(v.to_string()),
            Action::SetC(v) => update.c = Some(v.to_string()),
            Action::ReadA => update.log.push(format!("{}:{:?}", self.id, state.a)),
            Action::Fail => {
                return Err(NodeError::ExecutionFailed(format!("{} failed", self.id)))
            }
        }
        Ok(update)
    }
}
