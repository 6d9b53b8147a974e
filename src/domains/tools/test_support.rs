//! In-crate fakes for the travel collaborators.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde_json::{Map, Value, json};
use tokio::sync::Notify;

use crate::domains::travel::{
    CollaboratorError, Collaborators, PipelineState, SearchEngine, TravelPipeline,
};

pub fn collaborators(pipeline: FakePipeline, search: FakeSearch) -> Collaborators {
    Collaborators::new(Arc::new(pipeline), Arc::new(search))
}

#[derive(Clone)]
enum PipelineMode {
    Echo,
    WithoutAnswer,
    Failing(String),
}

/// Fake pipeline that records what it receives.
///
/// `Echo` fills `final_answer` with `"Answer to: <question>"` and returns the
/// state; `WithoutAnswer` returns the state untouched.
#[derive(Clone)]
pub struct FakePipeline {
    mode: PipelineMode,
    delay: Option<Duration>,
    calls: Arc<AtomicUsize>,
    last_state: Arc<Mutex<Option<PipelineState>>>,
    started: Arc<Notify>,
    gate: Option<Arc<Mutex<mpsc::Receiver<()>>>>,
}

impl FakePipeline {
    fn with_mode(mode: PipelineMode) -> Self {
        Self {
            mode,
            delay: None,
            calls: Arc::new(AtomicUsize::new(0)),
            last_state: Arc::new(Mutex::new(None)),
            started: Arc::new(Notify::new()),
            gate: None,
        }
    }

    pub fn echo() -> Self {
        Self::with_mode(PipelineMode::Echo)
    }

    pub fn without_answer() -> Self {
        Self::with_mode(PipelineMode::WithoutAnswer)
    }

    pub fn failing(message: &str) -> Self {
        Self::with_mode(PipelineMode::Failing(message.to_string()))
    }

    /// An echo pipeline that blocks until the returned sender fires.
    pub fn gated() -> (Self, mpsc::Sender<()>) {
        let (tx, rx) = mpsc::channel();
        let mut pipeline = Self::echo();
        pipeline.gate = Some(Arc::new(Mutex::new(rx)));
        (pipeline, tx)
    }

    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = Some(delay);
        self
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    pub fn last_state(&self) -> Option<PipelineState> {
        self.last_state.lock().unwrap().clone()
    }

    /// Resolves once `invoke` has been entered.
    pub async fn wait_started(&self) {
        self.started.notified().await
    }
}

impl TravelPipeline for FakePipeline {
    fn invoke(&self, state: PipelineState) -> Result<Map<String, Value>, CollaboratorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_state.lock().unwrap() = Some(state.clone());
        self.started.notify_one();

        if let Some(gate) = &self.gate {
            gate.lock().unwrap().recv().unwrap();
        }
        if let Some(delay) = self.delay {
            std::thread::sleep(delay);
        }

        let mut state = state;
        match &self.mode {
            PipelineMode::Failing(message) => return Err(CollaboratorError::other(message)),
            PipelineMode::Echo => {
                state.final_answer = Some(format!("Answer to: {}", state.user_question))
            }
            PipelineMode::WithoutAnswer => {}
        }

        match serde_json::to_value(state).unwrap() {
            Value::Object(map) => Ok(map),
            _ => unreachable!("PipelineState serializes to an object"),
        }
    }
}

/// Fake search engine that records `(query, engine)` pairs.
#[derive(Clone, Default)]
pub struct FakeSearch {
    queries: Arc<Mutex<Vec<(String, String)>>>,
    failure: Option<String>,
}

impl FakeSearch {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn failing(message: &str) -> Self {
        Self {
            failure: Some(message.to_string()),
            ..Self::default()
        }
    }

    pub fn queries(&self) -> Vec<(String, String)> {
        self.queries.lock().unwrap().clone()
    }
}

impl SearchEngine for FakeSearch {
    fn search(&self, query: &str, engine: &str) -> Result<Value, CollaboratorError> {
        self.queries
            .lock()
            .unwrap()
            .push((query.to_string(), engine.to_string()));

        if let Some(message) = &self.failure {
            return Err(CollaboratorError::other(message));
        }

        Ok(json!({
            "organic": [
                { "title": "Cheap flights", "link": "https://flights.example.com" }
            ]
        }))
    }
}
