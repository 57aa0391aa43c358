//! Checkpoint storage for conversation state
//!
//! A checkpoint is the full [`ConversationState`] of a conversation after
//! its most recent turn. Saves always replace the whole record; there is no
//! partial-update API.

use crate::state_machine::ConversationState;
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use thiserror::Error;
use tokio::sync::RwLock;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Storage error: {0}")]
    Storage(String),
}

/// Keyed storage of the latest state per conversation id
#[async_trait]
pub trait CheckpointStore: Send + Sync {
    /// Stored state for `conversation_id`, or a fresh empty state if unseen
    async fn load(&self, conversation_id: &str) -> Result<ConversationState, StoreError>;

    /// Replace the stored state for `conversation_id` unconditionally
    async fn save(&self, conversation_id: &str, state: &ConversationState)
        -> Result<(), StoreError>;
}

#[async_trait]
impl<T: CheckpointStore + ?Sized> CheckpointStore for Arc<T> {
    async fn load(&self, conversation_id: &str) -> Result<ConversationState, StoreError> {
        (**self).load(conversation_id).await
    }

    async fn save(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), StoreError> {
        (**self).save(conversation_id, state).await
    }
}

/// Process-lifetime checkpoint store. Entries are never evicted.
#[derive(Debug, Default)]
pub struct MemoryCheckpointStore {
    states: RwLock<HashMap<String, ConversationState>>,
}

impl MemoryCheckpointStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of conversations with a checkpoint
    pub async fn len(&self) -> usize {
        self.states.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.states.read().await.is_empty()
    }

    pub async fn contains(&self, conversation_id: &str) -> bool {
        self.states.read().await.contains_key(conversation_id)
    }
}

#[async_trait]
impl CheckpointStore for MemoryCheckpointStore {
    async fn load(&self, conversation_id: &str) -> Result<ConversationState, StoreError> {
        let states = self.states.read().await;
        Ok(states
            .get(conversation_id)
            .cloned()
            .unwrap_or_else(|| ConversationState::new(conversation_id)))
    }

    async fn save(
        &self,
        conversation_id: &str,
        state: &ConversationState,
    ) -> Result<(), StoreError> {
        self.states
            .write()
            .await
            .insert(conversation_id.to_string(), state.clone());
        Ok(())
    }
}
