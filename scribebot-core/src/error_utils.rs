use crate::error::*;
use tracing::{error, warn};

pub trait ErrorExt {
    fn log_error(&self) -> &Self;
    fn log_warn(&self) -> &Self;
    fn user_friendly_message(&self) -> String;
    fn error_code(&self) -> String;
}

impl ErrorExt for CoreError {
    fn log_error(&self) -> &Self {
        error!("CoreError: {}", self);
        match self {
            CoreError::Llm(e) => {
                error!("LLM error details: {:?}", e);
            }
            CoreError::WebflowApi(e) => {
                error!("Webflow API error details: {:?}", e);
            }
            CoreError::Config(e) => {
                error!("Configuration error details: {:?}", e);
            }
            _ => {}
        }
        self
    }

    fn log_warn(&self) -> &Self {
        warn!("CoreError (warning): {}", self);
        self
    }

    fn user_friendly_message(&self) -> String {
        match self {
            CoreError::Llm(LlmError::InvalidApiKey { provider }) => {
                format!("The {} API key is invalid or missing.", provider)
            }
            CoreError::Llm(LlmError::RateLimitExceeded { .. }) => {
                "The language model is rate limited. Please wait before trying again.".to_string()
            }
            CoreError::Llm(LlmError::EmptyCompletion) => {
                "The language model returned no content. Please try again.".to_string()
            }
            CoreError::Llm(_) => {
                "The language model could not complete the request. Please try again.".to_string()
            }
            CoreError::WebflowApi(_) => {
                "Publishing to Webflow failed. Please check the collection settings and try again."
                    .to_string()
            }
            CoreError::Config(ConfigError::MissingEnvironmentVariable { var_name }) => {
                format!("Missing required environment variable: {}", var_name)
            }
            CoreError::Config(_) => "The configuration file is missing or invalid.".to_string(),
            CoreError::Network(_) => {
                "Network connection error. Please check your internet connection.".to_string()
            }
            CoreError::ContentValidation { .. } => {
                "The generated draft did not meet the publication rules and was discarded."
                    .to_string()
            }
            CoreError::InvalidInput { .. } => {
                "Invalid input provided. Please check your input and try again.".to_string()
            }
            _ => "An unexpected error occurred. Please try again later.".to_string(),
        }
    }

    fn error_code(&self) -> String {
        match self {
            CoreError::Llm(_) => "LLM",
            CoreError::WebflowApi(_) => "WEBFLOW_API",
            CoreError::Config(_) => "CONFIG",
            CoreError::Io(_) => "IO",
            CoreError::Serialization(_) => "SERIALIZATION",
            CoreError::Network(_) => "NETWORK",
            CoreError::InvalidInput { .. } => "INVALID_INPUT",
            CoreError::ContentValidation { .. } => "CONTENT_VALIDATION",
            CoreError::Internal { .. } => "INTERNAL",
        }
        .to_string()
    }
}
