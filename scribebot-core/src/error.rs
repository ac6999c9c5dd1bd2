use thiserror::Error;

#[derive(Error, Debug)]
pub enum CoreError {
    #[error("LLM error: {0}")]
    Llm(#[from] LlmError),

    #[error("Webflow API error: {0}")]
    WebflowApi(#[from] WebflowApiError),

    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("Invalid input: {message}")]
    InvalidInput { message: String },

    #[error("Content validation failed for \"{title}\"")]
    ContentValidation { title: String },

    #[error("Internal error: {message}")]
    Internal { message: String },
}

#[derive(Error, Debug, Clone)]
pub enum LlmError {
    #[error("API key invalid or missing for {provider}")]
    InvalidApiKey { provider: String },

    #[error("Authentication failed for {provider}: {reason}")]
    AuthenticationFailed { provider: String, reason: String },

    #[error("Rate limit exceeded for {provider}. Retry after {retry_after} seconds")]
    RateLimitExceeded { provider: String, retry_after: u64 },

    #[error("Request rejected by {provider}: {status_code} - {body}")]
    RequestRejected {
        provider: String,
        status_code: u16,
        body: String,
    },

    #[error("Provider service unavailable: {provider} ({status_code})")]
    ServiceUnavailable { provider: String, status_code: u16 },

    #[error("Request timeout for {provider}")]
    RequestTimeout { provider: String },

    #[error("Invalid response format from {provider}: {details}")]
    InvalidResponseFormat { provider: String, details: String },

    #[error("Provider returned an empty completion")]
    EmptyCompletion,
}

#[derive(Error, Debug, Clone)]
pub enum WebflowApiError {
    #[error("Invalid API token")]
    InvalidToken,

    #[error("Publish request failed with status {status_code}: {body}")]
    RequestFailed { status_code: u16, body: String },

    #[error("Invalid API response: {details}")]
    InvalidResponse { details: String },

    #[error("Request timeout")]
    RequestTimeout,
}

#[derive(Error, Debug, Clone)]
pub enum ConfigError {
    #[error("Configuration file not found: {path}")]
    FileNotFound { path: String },

    #[error("Invalid configuration format: {details}")]
    InvalidFormat { details: String },

    #[error("Environment variable not set: {var_name}")]
    MissingEnvironmentVariable { var_name: String },

    #[error("Unknown bot profile: {profile}")]
    UnknownProfile { profile: String },
}
