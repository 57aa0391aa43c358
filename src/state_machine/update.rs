//! Partial state updates returned by pipeline steps
//!
//! A step names only the fields it changed. The executor folds each update
//! into the running state with one reducer per field; every field currently
//! reduces by overwrite.

use super::state::{ConversationState, Message, Metadata};

/// Fields a step wants to replace. `None` leaves the field untouched.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateUpdate {
    pub messages: Option<Vec<Message>>,
    pub user_input: Option<String>,
    pub assistant_response: Option<String>,
    pub metadata: Option<Metadata>,
}

impl StateUpdate {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_messages(mut self, messages: Vec<Message>) -> Self {
        self.messages = Some(messages);
        self
    }

    pub fn with_user_input(mut self, user_input: impl Into<String>) -> Self {
        self.user_input = Some(user_input.into());
        self
    }

    pub fn with_assistant_response(mut self, response: impl Into<String>) -> Self {
        self.assistant_response = Some(response.into());
        self
    }

    pub fn with_metadata(mut self, metadata: Metadata) -> Self {
        self.metadata = Some(metadata);
        self
    }

    pub fn is_empty(&self) -> bool {
        self.messages.is_none()
            && self.user_input.is_none()
            && self.assistant_response.is_none()
            && self.metadata.is_none()
    }

    /// Names of the fields this update touches, for logging
    pub fn touched_fields(&self) -> Vec<&'static str> {
        let mut fields = Vec::new();
        if self.messages.is_some() {
            fields.push("messages");
        }
        if self.user_input.is_some() {
            fields.push("user_input");
        }
        if self.assistant_response.is_some() {
            fields.push("assistant_response");
        }
        if self.metadata.is_some() {
            fields.push("metadata");
        }
        fields
    }
}

/// Field reducer: the update replaces the current value when present.
fn overwrite<T>(slot: &mut T, update: Option<T>) {
    if let Some(value) = update {
        *slot = value;
    }
}

impl ConversationState {
    /// Merge a step's partial update into this state.
    ///
    /// `conversation_id` is not part of [`StateUpdate`] and therefore can
    /// never be changed by a step.
    pub fn apply(&mut self, update: StateUpdate) {
        let StateUpdate {
            messages,
            user_input,
            assistant_response,
            metadata,
        } = update;

        overwrite(&mut self.messages, messages);
        overwrite(&mut self.user_input, user_input);
        overwrite(&mut self.assistant_response, assistant_response);
        overwrite(&mut self.metadata, metadata);
    }
}
