//! Conversation state types

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Who produced a message
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Role {
    System,
    User,
    Assistant,
}

impl Role {
    pub fn as_str(self) -> &'static str {
        match self {
            Role::System => "system",
            Role::User => "user",
            Role::Assistant => "assistant",
        }
    }
}

/// One utterance in a conversation. Never mutated once appended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Message {
    pub role: Role,
    pub content: String,
    pub created_at: DateTime<Utc>,
}

impl Message {
    pub fn new(role: Role, content: impl Into<String>) -> Self {
        Self {
            role,
            content: content.into(),
            created_at: Utc::now(),
        }
    }

    pub fn system(content: impl Into<String>) -> Self {
        Self::new(Role::System, content)
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self::new(Role::User, content)
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self::new(Role::Assistant, content)
    }
}

/// Statistics derived from the message history.
///
/// Always recomputed wholesale from `messages`, so it can be compared for
/// equality and never drifts from the history it describes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Metadata {
    pub total_messages: usize,
    pub user_messages: usize,
    pub assistant_messages: usize,
    /// Creation time of the newest message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_updated: Option<DateTime<Utc>>,
}

impl Metadata {
    pub fn from_messages(messages: &[Message]) -> Self {
        let count = |role: Role| messages.iter().filter(|m| m.role == role).count();
        Self {
            total_messages: messages.len(),
            user_messages: count(Role::User),
            assistant_messages: count(Role::Assistant),
            last_updated: messages.last().map(|m| m.created_at),
        }
    }
}

/// The record threaded through every step of a turn and checkpointed
/// under its conversation id between turns.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ConversationState {
    pub conversation_id: String,
    pub messages: Vec<Message>,
    /// Raw utterance for the current turn
    pub user_input: String,
    /// Reply for the current turn; empty means no reply yet
    pub assistant_response: String,
    pub metadata: Metadata,
}

impl ConversationState {
    /// Fresh state for a conversation that has never run a turn
    pub fn new(conversation_id: impl Into<String>) -> Self {
        Self {
            conversation_id: conversation_id.into(),
            messages: Vec::new(),
            user_input: String::new(),
            assistant_response: String::new(),
            metadata: Metadata::default(),
        }
    }

    pub fn has_system_message(&self) -> bool {
        self.messages.iter().any(|m| m.role == Role::System)
    }

    /// At most one system message, and only at index 0.
    pub fn system_message_well_placed(&self) -> bool {
        self.messages
            .iter()
            .enumerate()
            .all(|(idx, m)| m.role != Role::System || idx == 0)
    }
}
