use crate::analyzer::analyze;
use crate::prompt::build_prompt;
use crate::validator::is_valid;
use llm_interface::{ChatCompletion, ChatMessage, ChatRequest, RetryExecutor};
use scribebot_core::{
    BotMemory, BotProfile, ContentSpec, CoreError, GeneratedContent, LlmError, ModelConfig,
    PostAnalytics, ValidationRules,
};
use serde::Deserialize;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::{info, warn};
use webflow_client::ContentPublisher;

const DRAFTING_SYSTEM_PROMPT: &str = "You are a direct content creator. Generate only the \
     blog post content, without any meta-commentary or suggestions. The content will be \
     published directly to Webflow.";
const RESEARCH_SYSTEM_PROMPT: &str = "You are a research expert. Return only JSON data.";
const DEFAULT_CALL_TO_ACTION: &str = "Start implementing these strategies today";
const DRAFT_MAX_TOKENS: u32 = 2048;
const DRAFT_TEMPERATURE: f64 = 0.7;
const RESEARCH_TEMPERATURE: f64 = 0.3;

/// Structured reply from the research step. The collaborator returns a
/// richer document; only the key points feed the prompt.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct ResearchBrief {
    #[serde(default)]
    key_points: Vec<String>,
}

impl ResearchBrief {
    fn fallback(topic: &str) -> Self {
        Self {
            key_points: vec![topic.to_string()],
        }
    }
}

/// Title-case a phrase word by word.
pub fn format_title(raw: &str) -> String {
    raw.split_whitespace()
        .map(|word| {
            let mut chars = word.chars();
            match chars.next() {
                Some(first) => {
                    first.to_uppercase().collect::<String>() + &chars.as_str().to_lowercase()
                }
                None => String::new(),
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Drives one generation request end to end: research, draft (with
/// retries), validate, publish, analyze, remember.
///
/// Retry wraps only the drafting call. Publishing is attempted exactly
/// once and its failures travel up verbatim.
pub struct GenerationPipeline<C, P> {
    chat: C,
    publisher: P,
    retry: RetryExecutor,
    memory: Arc<RwLock<BotMemory>>,
    profile: BotProfile,
    models: ModelConfig,
    rules: ValidationRules,
    /// Serializes manual and scheduled runs; only one generation is in
    /// flight at a time.
    run_guard: Mutex<()>,
}

impl<C, P> GenerationPipeline<C, P>
where
    C: ChatCompletion,
    P: ContentPublisher,
{
    pub fn new(
        chat: C,
        publisher: P,
        retry: RetryExecutor,
        memory: Arc<RwLock<BotMemory>>,
        profile: BotProfile,
        models: ModelConfig,
    ) -> Self {
        Self {
            chat,
            publisher,
            retry,
            memory,
            profile,
            models,
            rules: ValidationRules::default(),
            run_guard: Mutex::new(()),
        }
    }

    pub fn with_rules(mut self, rules: ValidationRules) -> Self {
        self.rules = rules;
        self
    }

    pub async fn generate_and_publish(
        &self,
        custom_title: Option<&str>,
    ) -> Result<PostAnalytics, CoreError> {
        let _running = self.run_guard.lock().await;

        info!(
            "Starting content generation{}",
            custom_title
                .map(|t| format!(" for: {}", t))
                .unwrap_or_default()
        );

        let (topics, target_audience) = {
            let memory = self.memory.read().await;
            (
                memory.content_preferences.topics.clone(),
                memory.content_preferences.target_audience.clone(),
            )
        };

        let topic = custom_title
            .map(str::to_string)
            .or_else(|| topics.first().cloned())
            .unwrap_or_else(|| "content strategy".to_string());

        let brief = self.gather_research(&topic).await;

        let default_title = format!("{} Guide", topic);
        let spec = ContentSpec {
            title: format_title(custom_title.unwrap_or(&default_title)),
            persona: self.profile.domain.clone(),
            audience: target_audience,
            tone: self.profile.writing_style.tone.clone(),
            main_points: brief.key_points.join(", "),
            keyphrases: topics.join(", "),
            call_to_action: self
                .profile
                .call_to_action
                .clone()
                .unwrap_or_else(|| DEFAULT_CALL_TO_ACTION.to_string()),
        };

        info!("Generating blog content for \"{}\"", spec.title);
        let prompt = build_prompt(&spec);
        let draft = self
            .retry
            .execute("draft_blog_post", || {
                let request = ChatRequest::new(
                    self.models.drafting.clone(),
                    vec![
                        ChatMessage::system(DRAFTING_SYSTEM_PROMPT),
                        ChatMessage::user(prompt.clone()),
                    ],
                    DRAFT_TEMPERATURE,
                )
                .with_max_tokens(DRAFT_MAX_TOKENS);
                self.chat.complete(request)
            })
            .await?
            .ok_or(CoreError::Llm(LlmError::EmptyCompletion))?;

        if !is_valid(&draft, &self.rules) {
            warn!(
                "Draft for \"{}\" failed validation; nothing was published",
                spec.title
            );
            return Err(CoreError::ContentValidation { title: spec.title });
        }

        info!("Content generated, publishing \"{}\"", spec.title);
        let published = self.publisher.publish(&spec.title, &draft, None).await?;

        let analytics = analyze(&draft, &published.title, &published.external_id, &topics);
        {
            let mut memory = self.memory.write().await;
            memory.last_generated_content = Some(GeneratedContent {
                title: published.title.clone(),
                content: draft,
                analytics: analytics.clone(),
            });
        }

        info!(
            "Successfully published \"{}\" as item {}",
            published.title, published.external_id
        );
        Ok(analytics)
    }

    /// Ask the collaborator for supplementary key points. Any failure falls
    /// back to a single-element list containing the topic itself.
    async fn gather_research(&self, topic: &str) -> ResearchBrief {
        let request = ChatRequest::new(
            self.models.research.clone(),
            vec![
                ChatMessage::system(RESEARCH_SYSTEM_PROMPT),
                ChatMessage::user(format!(
                    "Research {} and return: {{ \"keyPoints\": string[], \
                     \"supportingFacts\": string[], \"audienceQuestions\": string[] }}",
                    topic
                )),
            ],
            RESEARCH_TEMPERATURE,
        );

        match self.chat.complete(request).await {
            Ok(Some(reply)) => match serde_json::from_str::<ResearchBrief>(&reply) {
                Ok(brief) if !brief.key_points.is_empty() => brief,
                Ok(_) => ResearchBrief::fallback(topic),
                Err(e) => {
                    warn!("Research reply was not valid JSON: {}", e);
                    ResearchBrief::fallback(topic)
                }
            },
            Ok(None) => ResearchBrief::fallback(topic),
            Err(e) => {
                warn!("Research call failed: {}", e);
                ResearchBrief::fallback(topic)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use llm_interface::RetryConfig;
    use scribebot_core::{BotProfile, ContentPreferences, PostImage, PublishedPost, WritingStyle};
    use std::collections::VecDeque;
    use std::sync::Mutex as StdMutex;

    #[derive(Clone, Default)]
    struct MockChat {
        state: Arc<MockChatState>,
    }

    #[derive(Default)]
    struct MockChatState {
        replies: StdMutex<VecDeque<Option<String>>>,
        requests: StdMutex<Vec<ChatRequest>>,
    }

    impl MockChat {
        fn scripted(replies: Vec<Option<String>>) -> Self {
            Self {
                state: Arc::new(MockChatState {
                    replies: StdMutex::new(replies.into()),
                    requests: StdMutex::new(Vec::new()),
                }),
            }
        }
    }

    #[async_trait]
    impl ChatCompletion for MockChat {
        async fn complete(&self, request: ChatRequest) -> Result<Option<String>, CoreError> {
            self.state.requests.lock().unwrap().push(request);
            Ok(self
                .state
                .replies
                .lock()
                .unwrap()
                .pop_front()
                .unwrap_or(None))
        }
    }

    #[derive(Clone, Default)]
    struct MockPublisher {
        publish_count: Arc<StdMutex<usize>>,
    }

    impl MockPublisher {
        fn publish_count(&self) -> usize {
            *self.publish_count.lock().unwrap()
        }
    }

    #[async_trait]
    impl ContentPublisher for MockPublisher {
        async fn publish(
            &self,
            title: &str,
            _body: &str,
            _image: Option<&PostImage>,
        ) -> Result<PublishedPost, CoreError> {
            *self.publish_count.lock().unwrap() += 1;
            Ok(PublishedPost {
                external_id: "item-test".to_string(),
                title: title.to_string(),
                publish_date: chrono::Utc::now(),
            })
        }
    }

    fn profile() -> BotProfile {
        BotProfile {
            name: "Sage".to_string(),
            domain: "an AI content strategist and writer".to_string(),
            writing_style: WritingStyle {
                tone: "friendly".to_string(),
            },
            call_to_action: None,
        }
    }

    fn memory() -> Arc<RwLock<BotMemory>> {
        Arc::new(RwLock::new(BotMemory::new(ContentPreferences {
            topics: vec!["content marketing".to_string()],
            style: "professional".to_string(),
            tone: "friendly".to_string(),
            target_audience: "general".to_string(),
        })))
    }

    fn pipeline(
        chat: MockChat,
        publisher: MockPublisher,
    ) -> GenerationPipeline<MockChat, MockPublisher> {
        GenerationPipeline::new(
            chat,
            publisher,
            RetryExecutor::new(RetryConfig {
                max_attempts: 1,
                base_delay_ms: 1,
            }),
            memory(),
            profile(),
            ModelConfig::default(),
        )
    }

    /// Draft that passes the default rules: 900 words with both sections.
    fn valid_draft() -> String {
        let filler = vec!["word"; 898].join(" ");
        format!("Introduction {} conclusion", filler)
    }

    #[test]
    fn test_format_title() {
        assert_eq!(format_title("composting guide"), "Composting Guide");
        assert_eq!(format_title("ADVANCED seo TIPS"), "Advanced Seo Tips");
        assert_eq!(format_title(""), "");
    }

    #[tokio::test]
    async fn test_successful_run_stores_last_result() {
        // Reply order: research, then draft.
        let chat = MockChat::scripted(vec![Some("not json".to_string()), Some(valid_draft())]);
        let publisher = MockPublisher::default();
        let pipeline = pipeline(chat.clone(), publisher.clone());

        let analytics = pipeline
            .generate_and_publish(Some("rust content"))
            .await
            .unwrap();

        assert_eq!(publisher.publish_count(), 1);
        assert_eq!(analytics.post_id, "item-test");
        assert_eq!(analytics.title, "Rust Content");
        assert_eq!(analytics.word_count, 900);

        // Configured keyphrase is tracked even when absent from the draft.
        assert_eq!(analytics.keyphrase_count["content marketing"], 0);

        let memory = pipeline.memory.read().await;
        let last = memory.last_generated_content.as_ref().unwrap();
        assert_eq!(last.title, "Rust Content");
        assert_eq!(last.analytics.post_id, "item-test");
    }

    #[tokio::test]
    async fn test_validation_failure_never_publishes() {
        let chat = MockChat::scripted(vec![
            Some("not json".to_string()),
            Some("too short to publish".to_string()),
        ]);
        let publisher = MockPublisher::default();
        let pipeline = pipeline(chat, publisher.clone());

        let result = pipeline.generate_and_publish(Some("rust content")).await;

        assert!(matches!(result, Err(CoreError::ContentValidation { .. })));
        assert_eq!(publisher.publish_count(), 0);
    }

    #[tokio::test]
    async fn test_empty_completion_is_an_error() {
        let chat = MockChat::scripted(vec![Some("not json".to_string()), None]);
        let publisher = MockPublisher::default();
        let pipeline = pipeline(chat, publisher.clone());

        let result = pipeline.generate_and_publish(None).await;

        assert!(matches!(
            result,
            Err(CoreError::Llm(LlmError::EmptyCompletion))
        ));
        assert_eq!(publisher.publish_count(), 0);
    }

    #[tokio::test]
    async fn test_default_title_derived_from_topic_list() {
        let chat = MockChat::scripted(vec![Some("not json".to_string()), Some(valid_draft())]);
        let publisher = MockPublisher::default();
        let pipeline = pipeline(chat, publisher);

        let analytics = pipeline.generate_and_publish(None).await.unwrap();
        assert_eq!(analytics.title, "Content Marketing Guide");
    }

    #[tokio::test]
    async fn test_research_reply_feeds_main_points() {
        let research = r#"{ "keyPoints": ["soil biology", "kitchen scraps"] }"#;
        let chat = MockChat::scripted(vec![Some(research.to_string()), Some(valid_draft())]);
        let publisher = MockPublisher::default();
        let pipeline = pipeline(chat.clone(), publisher);

        pipeline
            .generate_and_publish(Some("composting"))
            .await
            .unwrap();

        // Second request is the drafting call; its prompt embeds the
        // research key points.
        let requests = chat.state.requests.lock().unwrap();
        assert_eq!(requests.len(), 2);
        let draft_prompt = &requests[1].messages[1].content;
        assert!(draft_prompt.contains("soil biology, kitchen scraps"));
    }
}
