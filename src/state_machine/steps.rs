//! Pipeline step functions
//!
//! Input admission and metadata refresh are pure. Reply generation is split
//! into a pure plan and a pure fold of the model outcome; the runtime owns
//! the model call in between.

use super::state::{ConversationState, Message, Metadata};
use super::update::StateUpdate;
use crate::llm::LlmError;
use crate::system_prompt::{generation_failure_reply, EMPTY_INPUT_PROMPT, GREETING, SYSTEM_PROMPT};

/// Step 1: trim the utterance and append it to the history.
///
/// Blank input leaves `messages` untouched and answers with a prompt for
/// input. The persona message is injected only while the history is empty.
pub fn admit_input(state: &ConversationState) -> StateUpdate {
    let trimmed = state.user_input.trim();

    if trimmed.is_empty() {
        return StateUpdate::new()
            .with_user_input("")
            .with_assistant_response(EMPTY_INPUT_PROMPT);
    }

    let mut messages = state.messages.clone();
    if messages.is_empty() {
        messages.push(Message::system(SYSTEM_PROMPT));
    }
    messages.push(Message::user(trimmed));

    StateUpdate::new()
        .with_messages(messages)
        .with_user_input(trimmed)
}

/// What step 2 has to do for the current state
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ReplyPlan {
    /// Nothing to send to the model; apply this update as-is
    Respond(StateUpdate),
    /// Call the model with the full history
    Generate,
}

/// Step 2, first half: decide whether the model gets called.
///
/// Empty history greets. Blank admitted input keeps the admission's
/// prompt so the history stays unchanged.
pub fn plan_reply(state: &ConversationState) -> ReplyPlan {
    if state.messages.is_empty() {
        ReplyPlan::Respond(StateUpdate::new().with_assistant_response(GREETING))
    } else if state.user_input.is_empty() {
        ReplyPlan::Respond(StateUpdate::new())
    } else {
        ReplyPlan::Generate
    }
}

/// Step 2, second half: fold the model outcome into the history.
///
/// A failure becomes an assistant message too, so it stays visible in the
/// history and the turn still completes.
pub fn apply_reply(state: &ConversationState, outcome: Result<String, LlmError>) -> StateUpdate {
    let reply = match outcome {
        Ok(text) => text,
        Err(e) => generation_failure_reply(&e.message),
    };

    let mut messages = state.messages.clone();
    messages.push(Message::assistant(reply.clone()));

    StateUpdate::new()
        .with_messages(messages)
        .with_assistant_response(reply)
}

/// Step 3: recompute metadata from the history.
pub fn refresh_metadata(state: &ConversationState) -> StateUpdate {
    StateUpdate::new().with_metadata(Metadata::from_messages(&state.messages))
}
