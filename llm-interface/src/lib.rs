pub mod api;
pub mod retry;

pub use api::{ChatMessage, ChatRequest, OpenAiClient};
pub use retry::{RetryConfig, RetryExecutor};

use async_trait::async_trait;
use scribebot_core::CoreError;

/// Chat-completion collaborator. A provider may legitimately return an
/// empty completion; callers decide whether that is an error.
#[async_trait]
pub trait ChatCompletion: Send + Sync {
    async fn complete(&self, request: ChatRequest) -> Result<Option<String>, CoreError>;
}
