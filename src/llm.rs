//! LLM provider abstraction
//!
//! Provides a common interface for the language model behind reply generation.

mod error;
mod openrouter;
mod types;

pub use error::{LlmError, LlmErrorKind};
pub use openrouter::OpenRouterService;
pub use types::*;

use async_trait::async_trait;
use std::sync::Arc;

/// Common interface for LLM providers
#[async_trait]
pub trait LlmService: Send + Sync {
    /// Make a completion request
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError>;

    /// Get the model ID
    fn model_id(&self) -> &str;
}

/// Logging wrapper for LLM services
pub struct LoggingService {
    inner: Arc<dyn LlmService>,
    model_id: String,
}

impl LoggingService {
    pub fn new(inner: Arc<dyn LlmService>) -> Self {
        let model_id = inner.model_id().to_string();
        Self { inner, model_id }
    }
}

#[async_trait]
impl LlmService for LoggingService {
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse, LlmError> {
        let start = std::time::Instant::now();
        let result = self.inner.complete(request).await;
        let duration = start.elapsed();

        match &result {
            Ok(response) => {
                tracing::info!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    message_count = request.messages.len(),
                    input_tokens = response.usage.input_tokens,
                    output_tokens = response.usage.output_tokens,
                    total_tokens = response.usage.total(),
                    "LLM request completed"
                );
            }
            Err(e) => {
                tracing::error!(
                    model = %self.model_id,
                    duration_ms = %duration.as_millis(),
                    error = %e.message,
                    kind = e.kind.as_str(),
                    retryable = e.kind.is_retryable(),
                    "LLM request failed"
                );
            }
        }

        result
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct ScriptedService {
        outcome: Result<LlmResponse, LlmError>,
        calls: Mutex<usize>,
    }

    #[async_trait]
    impl LlmService for ScriptedService {
        async fn complete(&self, _request: &LlmRequest) -> Result<LlmResponse, LlmError> {
            *self.calls.lock().unwrap() += 1;
            self.outcome.clone()
        }

        fn model_id(&self) -> &str {
            "scripted"
        }
    }

    fn wrapped(outcome: Result<LlmResponse, LlmError>) -> (Arc<ScriptedService>, LoggingService) {
        let inner = Arc::new(ScriptedService {
            outcome,
            calls: Mutex::new(0),
        });
        let logging = LoggingService::new(inner.clone());
        (inner, logging)
    }

    fn request() -> LlmRequest {
        LlmRequest::from_history(&[crate::state_machine::Message::user("hi")])
    }

    #[tokio::test]
    async fn test_logging_passes_success_through() {
        let (inner, logging) = wrapped(Ok(LlmResponse {
            text: "hello".to_string(),
            finish_reason: Some("stop".to_string()),
            usage: Usage {
                input_tokens: 12,
                output_tokens: 3,
            },
        }));

        let response = logging.complete(&request()).await.unwrap();

        assert_eq!(response.text, "hello");
        assert_eq!(response.finish_reason.as_deref(), Some("stop"));
        assert_eq!(response.usage.total(), 15);
        assert_eq!(logging.model_id(), "scripted");
        assert_eq!(*inner.calls.lock().unwrap(), 1);
    }

    #[tokio::test]
    async fn test_logging_passes_error_through() {
        let (inner, logging) = wrapped(Err(LlmError::rate_limit("slow down")
            .with_retry_after(std::time::Duration::from_secs(3))));

        let err = logging.complete(&request()).await.unwrap_err();

        assert_eq!(err.kind, LlmErrorKind::RateLimit);
        assert_eq!(err.message, "slow down");
        assert_eq!(err.retry_after, Some(std::time::Duration::from_secs(3)));
        assert_eq!(*inner.calls.lock().unwrap(), 1);
    }
}
