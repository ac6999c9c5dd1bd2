use crate::ChatCompletion;
use async_trait::async_trait;
use reqwest::Client;
use scribebot_core::{CoreError, LlmError, Role};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::{debug, error, warn};

const OPENAI_API_BASE: &str = "https://api.openai.com/v1";
const PROVIDER: &str = "openai";

#[derive(Debug, Clone, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// One chat-completion request: model, ordered messages, sampling
/// temperature and an optional output-token cap.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
}

impl ChatRequest {
    pub fn new(model: impl Into<String>, messages: Vec<ChatMessage>, temperature: f64) -> Self {
        Self {
            model: model.into(),
            messages,
            temperature,
            max_tokens: None,
        }
    }

    pub fn with_max_tokens(mut self, max_tokens: u32) -> Self {
        self.max_tokens = Some(max_tokens);
        self
    }
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: ChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Clone)]
pub struct OpenAiClient {
    http_client: Client,
    auth_header: String,
}

impl OpenAiClient {
    pub fn new(api_key: &str) -> Self {
        let http_client = Client::builder()
            .timeout(Duration::from_secs(120))
            .build()
            .expect("Failed to create HTTP client");

        Self {
            http_client,
            auth_header: format!("Bearer {}", api_key),
        }
    }
}

#[async_trait]
impl ChatCompletion for OpenAiClient {
    async fn complete(&self, request: ChatRequest) -> Result<Option<String>, CoreError> {
        let url = format!("{}/chat/completions", OPENAI_API_BASE);

        debug!(
            "Requesting chat completion from {} ({} messages)",
            request.model,
            request.messages.len()
        );
        let response = match self
            .http_client
            .post(&url)
            .header("Authorization", &self.auth_header)
            .json(&request)
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                error!("Network error during chat completion: {}", e);
                if e.is_timeout() {
                    return Err(CoreError::Llm(LlmError::RequestTimeout {
                        provider: PROVIDER.to_string(),
                    }));
                }
                return Err(CoreError::Network(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!("Chat completion failed with status: {}", status);

            if status.as_u16() == 401 {
                return Err(CoreError::Llm(LlmError::InvalidApiKey {
                    provider: PROVIDER.to_string(),
                }));
            } else if status.as_u16() == 429 {
                let retry_after = response
                    .headers()
                    .get("retry-after")
                    .and_then(|v| v.to_str().ok())
                    .and_then(|v| v.parse::<u64>().ok())
                    .unwrap_or(60);
                warn!("Rate limited, retry after {} seconds", retry_after);
                return Err(CoreError::Llm(LlmError::RateLimitExceeded {
                    provider: PROVIDER.to_string(),
                    retry_after,
                }));
            } else if status.is_server_error() {
                return Err(CoreError::Llm(LlmError::ServiceUnavailable {
                    provider: PROVIDER.to_string(),
                    status_code: status.as_u16(),
                }));
            }

            let body = response.text().await.unwrap_or_default();
            return Err(CoreError::Llm(LlmError::RequestRejected {
                provider: PROVIDER.to_string(),
                status_code: status.as_u16(),
                body,
            }));
        }

        let completion: ChatCompletionResponse = response.json().await.map_err(|e| {
            error!("Failed to parse chat completion: {}", e);
            CoreError::Llm(LlmError::InvalidResponseFormat {
                provider: PROVIDER.to_string(),
                details: e.to_string(),
            })
        })?;

        let content = completion
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content);

        if content.is_none() {
            warn!("Chat completion contained no content");
        }

        Ok(content)
    }
}
