use scribebot_core::{ConfigError, CoreError, ErrorExt, LlmError, WebflowApiError};

#[test]
fn test_error_codes() {
    let llm_error = CoreError::Llm(LlmError::InvalidApiKey {
        provider: "openai".to_string(),
    });
    assert_eq!(llm_error.error_code(), "LLM");

    let webflow_error = CoreError::WebflowApi(WebflowApiError::InvalidToken);
    assert_eq!(webflow_error.error_code(), "WEBFLOW_API");

    let config_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "OPENAI_API_KEY".to_string(),
    });
    assert_eq!(config_error.error_code(), "CONFIG");

    let validation_error = CoreError::ContentValidation {
        title: "Test Post".to_string(),
    };
    assert_eq!(validation_error.error_code(), "CONTENT_VALIDATION");
}

#[test]
fn test_user_friendly_messages() {
    let llm_error = CoreError::Llm(LlmError::InvalidApiKey {
        provider: "openai".to_string(),
    });
    let message = llm_error.user_friendly_message();
    assert!(!message.is_empty());
    assert!(message.contains("openai"));

    let config_error = CoreError::Config(ConfigError::MissingEnvironmentVariable {
        var_name: "WEBFLOW_API_TOKEN".to_string(),
    });
    let message = config_error.user_friendly_message();
    assert!(message.contains("WEBFLOW_API_TOKEN"));

    let validation_error = CoreError::ContentValidation {
        title: "Test Post".to_string(),
    };
    let message = validation_error.user_friendly_message();
    assert!(!message.is_empty());
}

#[test]
fn test_publish_failure_carries_status_and_body() {
    let error = CoreError::WebflowApi(WebflowApiError::RequestFailed {
        status_code: 422,
        body: "{\"msg\":\"slug already exists\"}".to_string(),
    });

    let rendered = error.to_string();
    assert!(rendered.contains("422"));
    assert!(rendered.contains("slug already exists"));
}

#[test]
fn test_logging_helpers_do_not_panic() {
    let error = CoreError::Llm(LlmError::EmptyCompletion);
    error.log_error();
    error.log_warn();
}
