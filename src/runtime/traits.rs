//! Trait abstractions for runtime I/O
//!
//! These traits enable testing the engine with mock implementations.

use crate::llm::{LlmError, LlmRequest, LlmService};
use crate::state_machine::Message;
use async_trait::async_trait;
use std::sync::Arc;

/// The model capability: ordered history in, reply text out
#[async_trait]
pub trait ModelClient: Send + Sync {
    async fn generate(&self, messages: &[Message]) -> Result<String, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

#[async_trait]
impl<T: ModelClient + ?Sized> ModelClient for Arc<T> {
    async fn generate(&self, messages: &[Message]) -> Result<String, LlmError> {
        (**self).generate(messages).await
    }

    fn model_id(&self) -> &str {
        (**self).model_id()
    }
}

// ============================================================================
// Production Adapters
// ============================================================================

/// Adapter to use an [`LlmService`] as the model capability
pub struct ServiceModelClient {
    service: Arc<dyn LlmService>,
}

impl ServiceModelClient {
    pub fn new(service: Arc<dyn LlmService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl ModelClient for ServiceModelClient {
    async fn generate(&self, messages: &[Message]) -> Result<String, LlmError> {
        let request = LlmRequest::from_history(messages);
        let response = self.service.complete(&request).await?;
        Ok(response.text)
    }

    fn model_id(&self) -> &str {
        self.service.model_id()
    }
}
