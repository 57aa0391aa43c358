//! Conversation turn executor

use super::traits::ModelClient;
use crate::checkpoint::{CheckpointStore, StoreError};
use crate::state_machine::{
    admit_input, apply_reply, plan_reply, refresh_metadata, ConversationState, Graph, Metadata,
    Node, ReplyPlan, StateUpdate, Step,
};
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::{Mutex, OwnedMutexGuard};

/// One async mutex per conversation id, created on first use
#[derive(Debug, Default)]
struct TurnLocks {
    locks: Mutex<HashMap<String, Arc<Mutex<()>>>>,
}

impl TurnLocks {
    async fn acquire(&self, conversation_id: &str) -> OwnedMutexGuard<()> {
        let lock = {
            let mut locks = self.locks.lock().await;
            locks
                .entry(conversation_id.to_string())
                .or_default()
                .clone()
        };
        lock.lock_owned().await
    }
}

/// Runs turns: load checkpoint, walk the step graph, save checkpoint.
///
/// Turns on the same conversation id are serialised; different ids run
/// concurrently.
pub struct ConversationEngine<S, M>
where
    S: CheckpointStore,
    M: ModelClient,
{
    store: S,
    model: M,
    graph: Graph,
    turn_locks: TurnLocks,
}

impl<S, M> ConversationEngine<S, M>
where
    S: CheckpointStore,
    M: ModelClient,
{
    pub fn new(store: S, model: M) -> Self {
        Self {
            store,
            model,
            graph: Graph::linear(),
            turn_locks: TurnLocks::default(),
        }
    }

    /// Replace the step graph. Only callers that want non-linear routing
    /// need this.
    #[must_use]
    pub fn with_graph(mut self, graph: Graph) -> Self {
        self.graph = graph;
        self
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn model(&self) -> &M {
        &self.model
    }

    pub fn graph(&self) -> &Graph {
        &self.graph
    }

    /// Run one full turn and return a copy of the checkpointed state.
    ///
    /// Model failures are folded into the reply; only store failures abort
    /// the turn.
    pub async fn run_turn(
        &self,
        conversation_id: &str,
        user_input: &str,
    ) -> Result<ConversationState, StoreError> {
        let _turn = self.turn_locks.acquire(conversation_id).await;
        let start = Instant::now();

        let mut state = self.store.load(conversation_id).await?;
        let prior_messages = state.messages.len();
        state.user_input = user_input.to_string();

        let mut node = Node::Step(self.graph.entry());
        while let Node::Step(step) = node {
            let update = self.run_step(step, &state).await;
            if update.is_empty() {
                tracing::debug!(conv_id = %conversation_id, step = %step, "Step left state unchanged");
            } else {
                tracing::debug!(
                    conv_id = %conversation_id,
                    step = %step,
                    fields = ?update.touched_fields(),
                    "Step completed"
                );
                state.apply(update);
            }
            node = self.graph.next(step, &state);
        }

        if let Err(e) = self.store.save(conversation_id, &state).await {
            tracing::error!(conv_id = %conversation_id, error = %e, "Failed to save checkpoint");
            return Err(e);
        }

        tracing::info!(
            conv_id = %conversation_id,
            graph = self.graph.name(),
            prior_messages,
            message_count = state.messages.len(),
            duration_ms = %start.elapsed().as_millis(),
            "Turn completed"
        );

        Ok(state)
    }

    /// Current checkpoint for a conversation, without running a turn
    pub async fn state(&self, conversation_id: &str) -> Result<ConversationState, StoreError> {
        self.store.load(conversation_id).await
    }

    /// Current statistics for a conversation; zero counts if unseen
    pub async fn stats(&self, conversation_id: &str) -> Result<Metadata, StoreError> {
        let state = self.store.load(conversation_id).await?;
        Ok(Metadata::from_messages(&state.messages))
    }

    async fn run_step(&self, step: Step, state: &ConversationState) -> StateUpdate {
        match step {
            Step::AdmitInput => admit_input(state),
            Step::GenerateReply => self.generate_reply(state).await,
            Step::RefreshMetadata => refresh_metadata(state),
        }
    }

    async fn generate_reply(&self, state: &ConversationState) -> StateUpdate {
        match plan_reply(state) {
            ReplyPlan::Respond(update) => update,
            ReplyPlan::Generate => {
                let outcome = self.model.generate(&state.messages).await;
                if let Err(e) = &outcome {
                    tracing::warn!(
                        conv_id = %state.conversation_id,
                        model = %self.model.model_id(),
                        error = %e,
                        "Generation failed, recording fallback reply"
                    );
                }
                apply_reply(state, outcome)
            }
        }
    }
}
