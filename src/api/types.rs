//! API request and response types

use serde::{Deserialize, Serialize};

/// Request to run one turn
#[derive(Debug, Deserialize)]
pub struct TurnRequest {
    #[serde(default)]
    pub user_input: String,
}

/// Response to conversation creation
#[derive(Debug, Serialize)]
pub struct NewConversationResponse {
    pub conversation_id: String,
}

/// Version info
#[derive(Debug, Serialize)]
pub struct VersionResponse {
    pub name: &'static str,
    pub version: &'static str,
    pub model: String,
}

/// Error body
#[derive(Debug, Serialize)]
pub struct ErrorResponse {
    pub error: String,
}
