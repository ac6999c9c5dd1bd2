use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Everything the prompt builder needs for one generation request.
/// Built fresh per request and never mutated.
#[derive(Debug, Clone)]
pub struct ContentSpec {
    pub title: String,
    pub persona: String,
    pub audience: String,
    pub tone: String,
    /// Comma-joined list of main points to cover.
    pub main_points: String,
    /// Comma-joined list of keyphrases to weave in.
    pub keyphrases: String,
    pub call_to_action: String,
}

/// Publication rules applied to every generated draft.
#[derive(Debug, Clone)]
pub struct ValidationRules {
    pub min_word_count: usize,
    pub required_sections: Vec<String>,
    pub forbidden_phrases: Vec<String>,
}

impl Default for ValidationRules {
    fn default() -> Self {
        Self {
            min_word_count: 900,
            required_sections: vec!["introduction".to_string(), "conclusion".to_string()],
            forbidden_phrases: vec!["lorem ipsum".to_string(), "click here".to_string()],
        }
    }
}

/// Optional hero image attached to a published post.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostImage {
    pub url: String,
    pub alt: String,
    pub caption: String,
}

#[derive(Debug, Clone)]
pub struct PublishedPost {
    /// Identifier assigned by the CMS; treated as opaque.
    pub external_id: String,
    pub title: String,
    pub publish_date: DateTime<Utc>,
}

#[derive(Debug, Clone)]
pub struct PostAnalytics {
    pub post_id: String,
    pub title: String,
    pub publish_date: DateTime<Utc>,
    pub word_count: usize,
    /// Occurrence count per configured keyphrase; zero counts are kept.
    pub keyphrase_count: HashMap<String, usize>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
    Assistant,
}

#[derive(Debug, Clone)]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
    pub timestamp: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentPreferences {
    pub topics: Vec<String>,
    pub style: String,
    pub tone: String,
    pub target_audience: String,
}

/// The pipeline's most recent successful output.
#[derive(Debug, Clone)]
pub struct GeneratedContent {
    pub title: String,
    pub content: String,
    pub analytics: PostAnalytics,
}

#[derive(Debug, Clone)]
pub struct TopicPerformance {
    pub views: u64,
    pub engagement: f64,
    /// Placeholder numbers, not measured analytics.
    pub simulated: bool,
}

#[derive(Debug, Clone)]
pub struct TopicRecord {
    pub name: String,
    pub confidence: f64,
    pub last_used: DateTime<Utc>,
    pub performance: TopicPerformance,
}

#[derive(Debug, Clone)]
pub struct AutonomyState {
    pub last_post_time: DateTime<Utc>,
    pub topic_history: Vec<TopicRecord>,
}

impl AutonomyState {
    pub fn new() -> Self {
        Self {
            last_post_time: Utc::now(),
            topic_history: Vec::new(),
        }
    }
}

impl Default for AutonomyState {
    fn default() -> Self {
        Self::new()
    }
}

/// Process-wide mutable state shared by the conversation agent, the
/// generation pipeline and the autonomous scheduler. Created at startup
/// and dropped at process exit; nothing is persisted.
#[derive(Debug)]
pub struct BotMemory {
    pub conversation_history: Vec<ConversationTurn>,
    pub content_preferences: ContentPreferences,
    pub last_generated_content: Option<GeneratedContent>,
    pub autonomy: AutonomyState,
}

impl BotMemory {
    pub fn new(preferences: ContentPreferences) -> Self {
        Self {
            conversation_history: Vec::new(),
            content_preferences: preferences,
            last_generated_content: None,
            autonomy: AutonomyState::new(),
        }
    }

    pub fn push_turn(&mut self, role: Role, content: impl Into<String>) {
        self.conversation_history.push(ConversationTurn {
            role,
            content: content.into(),
            timestamp: Utc::now(),
        });
    }

    /// The most recent `count` turns, oldest first. The full history stays
    /// in memory; only this window is sent to the provider.
    pub fn recent_turns(&self, count: usize) -> &[ConversationTurn] {
        let start = self.conversation_history.len().saturating_sub(count);
        &self.conversation_history[start..]
    }
}
