// SPDX-License-Identifier: MIT
// Copyright 2026 Roland Dreier <roland@rolandd.dev>

use async_trait::async_trait;
use chrono::NaiveDate;
use lenscraft::config::Config;
use lenscraft::error::{AppError, Result};
use lenscraft::routes::create_router;
use lenscraft::services::{
    AppController, CaptionBackend, CaptionOrchestrator, CaptionRequest, MockIdentityProvider,
    SimulatedLatency,
};
use lenscraft::store::{KeyValueStore, MemoryStore};
use lenscraft::time_utils::FixedClock;
use lenscraft::AppState;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

/// A small valid base64 image payload.
#[allow(dead_code)]
pub const TEST_IMAGE: &str = "data:image/png;base64,iVBORw0KGgo=";

/// Day the test clock starts on.
#[allow(dead_code)]
pub fn test_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2026, 10, 19).unwrap()
}

/// Scripted result of one backend call.
#[allow(dead_code)]
#[derive(Debug, Clone)]
pub enum Outcome {
    Text(&'static str),
    Empty,
    Fail,
}

/// Caption backend that replays outcomes and records calls.
///
/// Once the script runs out every call succeeds with "A test caption.".
#[derive(Default)]
pub struct FakeBackend {
    script: Mutex<VecDeque<Outcome>>,
    calls: Mutex<Vec<(String, CaptionRequest)>>,
}

#[allow(dead_code)]
impl FakeBackend {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn scripted(outcomes: Vec<Outcome>) -> Arc<Self> {
        Arc::new(Self {
            script: Mutex::new(outcomes.into()),
            calls: Mutex::default(),
        })
    }

    pub fn call_count(&self) -> usize {
        self.calls.lock().unwrap().len()
    }

    pub fn calls(&self) -> Vec<(String, CaptionRequest)> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl CaptionBackend for FakeBackend {
    async fn generate(
        &self,
        _api_key: &str,
        model: &str,
        request: &CaptionRequest,
    ) -> Result<Option<String>> {
        self.calls
            .lock()
            .unwrap()
            .push((model.to_string(), request.clone()));

        let outcome = self
            .script
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Outcome::Text("A test caption."));

        match outcome {
            Outcome::Text(text) => Ok(Some(text.to_string())),
            Outcome::Empty => Ok(None),
            Outcome::Fail => Err(AppError::GeminiApi("HTTP 500: scripted failure".to_string())),
        }
    }
}

/// Everything a controller test needs to poke at.
#[allow(dead_code)]
pub struct TestHarness {
    pub controller: AppController,
    pub store: Arc<MemoryStore>,
    pub backend: Arc<FakeBackend>,
    pub clock: Arc<FixedClock>,
}

/// Controller over an in-memory store with an API key configured.
#[allow(dead_code)]
pub fn test_harness(backend: Arc<FakeBackend>) -> TestHarness {
    let store = Arc::new(MemoryStore::new());
    let (controller, clock) = build_controller(store.clone(), backend.clone(), Some("test-key"));
    TestHarness {
        controller,
        store,
        backend,
        clock,
    }
}

/// Controller without an API key.
#[allow(dead_code)]
pub fn test_harness_without_key(backend: Arc<FakeBackend>) -> TestHarness {
    let store = Arc::new(MemoryStore::new());
    let (controller, clock) = build_controller(store.clone(), backend.clone(), None);
    TestHarness {
        controller,
        store,
        backend,
        clock,
    }
}

/// Controller over any store, with no artificial delays.
#[allow(dead_code)]
pub fn build_controller(
    store: Arc<dyn KeyValueStore>,
    backend: Arc<FakeBackend>,
    api_key: Option<&str>,
) -> (AppController, Arc<FixedClock>) {
    let clock = Arc::new(FixedClock::at_date(test_day()));
    let identity = Arc::new(MockIdentityProvider::new(
        clock.clone(),
        SimulatedLatency::NONE,
    ));
    let captions = CaptionOrchestrator::new(api_key.map(String::from), backend);

    let controller = AppController::new(store, identity, captions, clock.clone())
        .with_min_caption_latency(std::time::Duration::ZERO);

    (controller, clock)
}

/// Create a test app with in-memory dependencies.
/// Returns the router and the shared state.
#[allow(dead_code)]
pub fn create_test_app(backend: Arc<FakeBackend>) -> (axum::Router, Arc<AppState>) {
    let harness = test_harness(backend);
    let state = Arc::new(AppState {
        config: Config::test_default(),
        controller: harness.controller,
    });

    (create_router(state.clone()), state)
}
