//! threadline - multi-turn conversational agent
//!
//! A small step pipeline over checkpointed, per-conversation state:
//! input admission, reply generation and metadata refresh run in order for
//! every turn, and the resulting state is stored under the conversation id
//! so later turns resume with full history.

pub mod api;
pub mod checkpoint;
pub mod cli;
pub mod config;
pub mod llm;
pub mod runtime;
pub mod state_machine;
pub mod system_prompt;
