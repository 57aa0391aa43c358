//! Fixed texts the pipeline injects into conversations

/// Persona instruction placed at the head of every new conversation
pub const SYSTEM_PROMPT: &str = "You are a helpful and friendly AI assistant. \
You have access to the conversation history and should provide contextual, \
intelligent responses. Be concise but informative, and maintain a conversational tone.";

/// Reply used when the user submits blank input
pub const EMPTY_INPUT_PROMPT: &str = "Please provide a message to continue our conversation.";

/// Reply used when there is no history to send to the model
pub const GREETING: &str = "Hello! How can I help you today?";

/// User-visible reply substituted for a failed model call
pub fn generation_failure_reply(detail: &str) -> String {
    format!("Sorry, I encountered an error: {detail}")
}
