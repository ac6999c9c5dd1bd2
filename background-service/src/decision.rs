use serde::Deserialize;
use tracing::warn;

/// Structured verdict from the decision collaborator.
#[derive(Debug, Clone, PartialEq)]
pub enum PostingDecision {
    Evaluated {
        should_post: bool,
        topic: Option<String>,
        reasoning: Option<String>,
    },
    /// The reply was not valid JSON; treated as "do not post".
    Malformed,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct DecisionPayload {
    should_post: bool,
    #[serde(default)]
    topic: Option<String>,
    #[serde(default)]
    reasoning: Option<String>,
}

/// Parse the collaborator's reply. A malformed reply is not an error;
/// the scheduler just skips the tick.
pub fn parse_decision(reply: &str) -> PostingDecision {
    match serde_json::from_str::<DecisionPayload>(reply) {
        Ok(payload) => PostingDecision::Evaluated {
            should_post: payload.should_post,
            topic: payload.topic,
            reasoning: payload.reasoning,
        },
        Err(e) => {
            warn!("Decision reply was not valid JSON: {}", e);
            PostingDecision::Malformed
        }
    }
}
