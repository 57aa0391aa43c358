//! Interactive terminal session and scripted demo
//!
//! Both drive the engine purely through `run_turn` and `stats`.

use crate::checkpoint::CheckpointStore;
use crate::runtime::{ConversationEngine, ModelClient};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt};

/// Conversation id used by single-shot callers that supply none
pub const DEFAULT_CONVERSATION_ID: &str = "default";

/// Conversation id used by the scripted demo
pub const DEMO_CONVERSATION_ID: &str = "test_conversation";

pub const DEMO_MESSAGES: [&str; 3] = [
    "Hello! What's your name?",
    "What's the weather like today?",
    "Can you remember what I asked you first?",
];

const RULE: &str = "--------------------------------------------------";

/// A line typed at the prompt
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    Quit,
    NewConversation,
    Stats,
    Help,
    Blank,
    Say(String),
}

impl Command {
    pub fn parse(line: &str) -> Self {
        let trimmed = line.trim();
        match trimmed.to_lowercase().as_str() {
            "quit" | "exit" | "bye" => Command::Quit,
            "clear" | "new" => Command::NewConversation,
            "stats" => Command::Stats,
            "help" => Command::Help,
            "" => Command::Blank,
            _ => Command::Say(trimmed.to_string()),
        }
    }
}

pub fn new_conversation_id() -> String {
    uuid::Uuid::new_v4().to_string()
}

/// Run the prompt loop until quit or end of input
pub async fn run_interactive<S, M, R, W>(
    engine: &ConversationEngine<S, M>,
    input: R,
    mut out: W,
) -> anyhow::Result<()>
where
    S: CheckpointStore,
    M: ModelClient,
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut conversation_id = new_conversation_id();
    tracing::info!(conv_id = %conversation_id, "Interactive session started");

    let banner = format!(
        "\n{RULE}\nthreadline - conversational agent\n{RULE}\n\
         Type 'quit', 'exit', or 'bye' to end the conversation.\n\
         Type 'clear' to start a new conversation.\n\
         Type 'stats' to see conversation statistics.\n{RULE}\n"
    );
    out.write_all(banner.as_bytes()).await?;

    let mut lines = input.lines();
    loop {
        out.write_all(b"\nYou: ").await?;
        out.flush().await?;

        let Some(line) = lines.next_line().await? else {
            out.write_all(b"\nGoodbye! Thanks for chatting!\n").await?;
            break;
        };

        match Command::parse(&line) {
            Command::Quit => {
                out.write_all(b"Goodbye! Thanks for chatting!\n").await?;
                break;
            }
            Command::NewConversation => {
                conversation_id = new_conversation_id();
                tracing::info!(conv_id = %conversation_id, "Started new conversation");
                out.write_all(b"Conversation cleared. Starting fresh!\n").await?;
            }
            Command::Stats => {
                let stats = engine.stats(&conversation_id).await?;
                let text = format!(
                    "Conversation {conversation_id}\n  Total: {}\n  You: {}\n  Assistant: {}\n",
                    stats.total_messages, stats.user_messages, stats.assistant_messages
                );
                out.write_all(text.as_bytes()).await?;
            }
            Command::Help => {
                out.write_all(b"Commands: quit | exit | bye, clear | new, stats, help\n")
                    .await?;
            }
            Command::Blank => {
                out.write_all(b"Please enter a message.\n").await?;
            }
            Command::Say(text) => {
                out.write_all(b"Assistant: ").await?;
                out.flush().await?;
                let text = match engine.run_turn(&conversation_id, &text).await {
                    Ok(state) => format!(
                        "{}\n   (Messages in conversation: {})\n",
                        state.assistant_response, state.metadata.total_messages
                    ),
                    Err(e) => {
                        tracing::error!(conv_id = %conversation_id, error = %e, "Turn failed");
                        format!("\nError: {e}\nPlease try again or type 'quit' to exit.\n")
                    }
                };
                out.write_all(text.as_bytes()).await?;
            }
        }
    }

    out.flush().await?;
    Ok(())
}

/// Run the fixed three-message conversation and print each turn
pub async fn run_demo<S, M, W>(engine: &ConversationEngine<S, M>, mut out: W) -> anyhow::Result<()>
where
    S: CheckpointStore,
    M: ModelClient,
    W: AsyncWrite + Unpin,
{
    out.write_all(b"Running test conversation...\n").await?;

    for (i, message) in DEMO_MESSAGES.iter().enumerate() {
        let state = engine.run_turn(DEMO_CONVERSATION_ID, message).await?;
        let text = format!(
            "\n--- Test {} ---\nUser: {message}\nAssistant: {}\nTotal messages: {}\n",
            i + 1,
            state.assistant_response,
            state.metadata.total_messages
        );
        out.write_all(text.as_bytes()).await?;
    }

    out.flush().await?;
    Ok(())
}
