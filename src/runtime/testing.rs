//! Mock implementations for testing
//!
//! These mocks enable engine and API tests without real I/O.

use super::traits::ModelClient;
use crate::checkpoint::{CheckpointStore, MemoryCheckpointStore, StoreError};
use crate::llm::LlmError;
use crate::state_machine::{ConversationState, Message};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;
use tokio::sync::watch;

// ============================================================================
// Mock Model Client
// ============================================================================

/// Mock model that returns queued outcomes and records every history it saw
pub struct MockModelClient {
    outcomes: Mutex<VecDeque<Result<String, LlmError>>>,
    model_id: String,
    requests: Mutex<Vec<Vec<Message>>>,
}

impl MockModelClient {
    pub fn new(model_id: impl Into<String>) -> Self {
        Self {
            outcomes: Mutex::new(VecDeque::new()),
            model_id: model_id.into(),
            requests: Mutex::new(Vec::new()),
        }
    }

    /// Queue a successful reply
    pub fn queue_reply(&self, text: impl Into<String>) {
        self.outcomes.lock().unwrap().push_back(Ok(text.into()));
    }

    /// Queue a generation failure
    pub fn queue_error(&self, error: LlmError) {
        self.outcomes.lock().unwrap().push_back(Err(error));
    }

    /// Histories passed to `generate`, in call order
    pub fn recorded_requests(&self) -> Vec<Vec<Message>> {
        self.requests.lock().unwrap().clone()
    }
}

#[async_trait]
impl ModelClient for MockModelClient {
    async fn generate(&self, messages: &[Message]) -> Result<String, LlmError> {
        self.requests.lock().unwrap().push(messages.to_vec());
        self.outcomes
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Err(LlmError::network("No mock response queued")))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Gated Model Client (for concurrency testing)
// ============================================================================

/// Mock model whose calls block until the gate is opened, tracking how many
/// calls were in flight at once
pub struct GatedModelClient {
    model_id: String,
    gate: watch::Sender<bool>,
    in_flight: AtomicUsize,
    max_in_flight: AtomicUsize,
}

impl GatedModelClient {
    pub fn new(model_id: impl Into<String>) -> Self {
        let (gate, _) = watch::channel(false);
        Self {
            model_id: model_id.into(),
            gate,
            in_flight: AtomicUsize::new(0),
            max_in_flight: AtomicUsize::new(0),
        }
    }

    /// Let all current and future calls complete
    pub fn open(&self) {
        self.gate.send_replace(true);
    }

    pub fn max_in_flight(&self) -> usize {
        self.max_in_flight.load(Ordering::SeqCst)
    }

    /// Wait until at least `count` calls are blocked on the gate
    pub async fn wait_for_in_flight(&self, count: usize) {
        let wait = async {
            while self.in_flight.load(Ordering::SeqCst) < count {
                tokio::time::sleep(Duration::from_millis(5)).await;
            }
        };
        tokio::time::timeout(Duration::from_secs(5), wait)
            .await
            .expect("calls never reached the gate");
    }
}

#[async_trait]
impl ModelClient for GatedModelClient {
    async fn generate(&self, messages: &[Message]) -> Result<String, LlmError> {
        let now = self.in_flight.fetch_add(1, Ordering::SeqCst) + 1;
        self.max_in_flight.fetch_max(now, Ordering::SeqCst);

        let mut gate = self.gate.subscribe();
        let _ = gate.wait_for(|open| *open).await;
        // give other turns a chance to overlap if locking were broken
        tokio::time::sleep(Duration::from_millis(2)).await;

        self.in_flight.fetch_sub(1, Ordering::SeqCst);
        Ok(format!("reply to {} messages", messages.len()))
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

// ============================================================================
// Failing Store
// ============================================================================

/// Store standing in for a broken durable backend. Saves always fail;
/// loads fail too unless built with [`FailingStore::failing_saves`], in
/// which case they read from an inner memory store that never changes.
#[derive(Debug, Default)]
pub struct FailingStore {
    inner: MemoryCheckpointStore,
    loads_succeed: bool,
}

impl FailingStore {
    /// Fails every load and every save
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads succeed, saves fail
    pub fn failing_saves() -> Self {
        Self {
            inner: MemoryCheckpointStore::new(),
            loads_succeed: true,
        }
    }

    /// The backing store, to check that nothing was written
    pub fn inner(&self) -> &MemoryCheckpointStore {
        &self.inner
    }
}

#[async_trait]
impl CheckpointStore for FailingStore {
    async fn load(&self, conversation_id: &str) -> Result<ConversationState, StoreError> {
        if self.loads_succeed {
            return self.inner.load(conversation_id).await;
        }
        Err(StoreError::Storage(format!(
            "cannot read checkpoint for {conversation_id}"
        )))
    }

    async fn save(
        &self,
        conversation_id: &str,
        _state: &ConversationState,
    ) -> Result<(), StoreError> {
        Err(StoreError::Storage(format!(
            "cannot write checkpoint for {conversation_id}"
        )))
    }
}
