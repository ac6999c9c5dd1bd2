use axum::extract::State;
use axum::http::StatusCode;
use axum::routing::post;
use axum::{Json, Router};
use content_engine::ConversationAgent;
use llm_interface::OpenAiClient;
use scribebot_core::{CoreError, ErrorExt};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::info;
use webflow_client::WebflowClient;

/// The one agent instance shared by every handler.
pub type SharedAgent = Arc<ConversationAgent<OpenAiClient, WebflowClient>>;

#[derive(Clone)]
struct ApiState {
    agent: SharedAgent,
}

#[derive(Debug, Deserialize)]
pub struct ChatBody {
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ChatReply {
    pub response: String,
}

#[derive(Debug, Deserialize)]
pub struct GeneratePostBody {
    #[serde(default)]
    pub title: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct GeneratePostReply {
    pub success: bool,
    pub message: String,
}

#[derive(Debug, Serialize)]
pub struct ApiError {
    pub error: String,
}

pub fn router(agent: SharedAgent) -> Router {
    Router::new()
        .route("/chat", post(chat))
        .route("/generate-post", post(generate_post))
        .with_state(ApiState { agent })
}

/// Bind and serve until the process exits.
pub async fn serve(port: u16, agent: SharedAgent) -> Result<(), CoreError> {
    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("HTTP API listening on {}", addr);
    axum::serve(listener, router(agent)).await?;
    Ok(())
}

async fn chat(
    State(state): State<ApiState>,
    Json(body): Json<ChatBody>,
) -> Result<Json<ChatReply>, (StatusCode, Json<ChatReply>)> {
    match state.agent.handle(&body.message).await {
        Ok(response) => Ok(Json(ChatReply { response })),
        Err(e) => {
            e.log_error();
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ChatReply {
                    response: "An error occurred while processing your request.".to_string(),
                }),
            ))
        }
    }
}

async fn generate_post(
    State(state): State<ApiState>,
    Json(body): Json<GeneratePostBody>,
) -> Result<Json<GeneratePostReply>, (StatusCode, Json<ApiError>)> {
    match state
        .agent
        .pipeline()
        .generate_and_publish(body.title.as_deref())
        .await
    {
        Ok(_) => Ok(Json(GeneratePostReply {
            success: true,
            message: "Blog post generated and published!".to_string(),
        })),
        Err(e) => {
            e.log_error();
            Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(ApiError {
                    error: "Failed to generate post".to_string(),
                }),
            ))
        }
    }
}
