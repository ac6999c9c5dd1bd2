use crate::pipeline::GenerationPipeline;
use llm_interface::{ChatCompletion, ChatMessage, ChatRequest};
use scribebot_core::{BotMemory, CoreError, ErrorExt, Role};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;
use webflow_client::ContentPublisher;

const FALLBACK_REPLY: &str = "I'm not sure how to respond to that.";
const GENERATE_COMMAND: &str = "generate blog post";
const SET_TOPIC_COMMAND: &str = "set topic";
const CHAT_TEMPERATURE: f64 = 0.7;
/// How many history turns accompany each chat request.
const HISTORY_WINDOW: usize = 5;

/// Conversational front end. Recognized commands are side-channel actions
/// and leave no trace in the conversation history; everything else is
/// free-form chat against the provider.
pub struct ConversationAgent<C, P> {
    chat: C,
    pipeline: Arc<GenerationPipeline<C, P>>,
    memory: Arc<RwLock<BotMemory>>,
    system_prompt: String,
    conversation_model: String,
}

impl<C, P> ConversationAgent<C, P>
where
    C: ChatCompletion,
    P: ContentPublisher,
{
    pub fn new(
        chat: C,
        pipeline: Arc<GenerationPipeline<C, P>>,
        memory: Arc<RwLock<BotMemory>>,
        system_prompt: String,
        conversation_model: String,
    ) -> Self {
        Self {
            chat,
            pipeline,
            memory,
            system_prompt,
            conversation_model,
        }
    }

    pub fn pipeline(&self) -> &Arc<GenerationPipeline<C, P>> {
        &self.pipeline
    }

    /// Route one line of user input to a command or the chat path.
    pub async fn handle(&self, input: &str) -> Result<String, CoreError> {
        let command = input.to_lowercase();

        if command.contains(GENERATE_COMMAND) {
            info!("Manual blog post generation requested");
            let title = command.replace(GENERATE_COMMAND, "").trim().to_string();
            let title = if title.is_empty() { None } else { Some(title) };

            let reply = match self.pipeline.generate_and_publish(title.as_deref()).await {
                Ok(_) => "Blog post has been generated and published to Webflow!".to_string(),
                Err(e) => {
                    e.log_error();
                    "Sorry, there was an error generating the blog post.".to_string()
                }
            };
            return Ok(reply);
        }

        if command.contains(SET_TOPIC_COMMAND) {
            let topic = command.replace(SET_TOPIC_COMMAND, "").trim().to_string();
            info!("Topic updated to: {}", topic);
            let mut memory = self.memory.write().await;
            memory.content_preferences.topics = vec![topic.clone()];
            return Ok(format!("Topic updated to: {}", topic));
        }

        let messages = {
            let mut memory = self.memory.write().await;
            memory.push_turn(Role::User, input);

            let mut messages = vec![
                ChatMessage::system(self.system_prompt.clone()),
                ChatMessage::system(format!(
                    "Current topics: {}\nTone: {}",
                    memory.content_preferences.topics.join(", "),
                    memory.content_preferences.tone
                )),
            ];
            messages.extend(memory.recent_turns(HISTORY_WINDOW).iter().map(|turn| {
                ChatMessage {
                    role: turn.role,
                    content: turn.content.clone(),
                }
            }));
            messages
        };

        let request = ChatRequest::new(self.conversation_model.clone(), messages, CHAT_TEMPERATURE);
        let reply = self
            .chat
            .complete(request)
            .await?
            .unwrap_or_else(|| FALLBACK_REPLY.to_string());

        self.memory
            .write()
            .await
            .push_turn(Role::Assistant, reply.clone());

        Ok(reply)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use llm_interface::{RetryConfig, RetryExecutor};
    use scribebot_core::{
        BotProfile, ContentPreferences, ModelConfig, PostImage, PublishedPost, WritingStyle,
    };
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

    fn agent(chat: MockChat) -> ConversationAgent<MockChat, MockPublisher> {
        let memory = Arc::new(RwLock::new(BotMemory::new(ContentPreferences {
            topics: vec!["content marketing".to_string()],
            style: "professional".to_string(),
            tone: "friendly".to_string(),
            target_audience: "general".to_string(),
        })));
        let pipeline = Arc::new(GenerationPipeline::new(
            chat.clone(),
            MockPublisher::default(),
            RetryExecutor::new(RetryConfig {
                max_attempts: 1,
                base_delay_ms: 1,
            }),
            memory.clone(),
            BotProfile {
                name: "Sage".to_string(),
                domain: "an AI content strategist and writer".to_string(),
                writing_style: WritingStyle {
                    tone: "friendly".to_string(),
                },
                call_to_action: None,
            },
            ModelConfig::default(),
        ));

        ConversationAgent::new(
            chat,
            pipeline,
            memory,
            "You are Sage, an AI content strategist and writer".to_string(),
            "gpt-4-turbo-preview".to_string(),
        )
    }

    #[tokio::test]
    async fn test_chat_path_appends_turns_and_sends_window() {
        let chat = MockChat::scripted(vec![Some("Happy to help!".to_string())]);
        let agent = agent(chat.clone());

        let reply = agent.handle("What should I write about?").await.unwrap();
        assert_eq!(reply, "Happy to help!");

        let memory = agent.memory.read().await;
        assert_eq!(memory.conversation_history.len(), 2);
        assert_eq!(memory.conversation_history[0].role, Role::User);
        assert_eq!(memory.conversation_history[1].role, Role::Assistant);

        // Two system messages plus the just-appended user turn.
        let requests = chat.state.requests.lock().unwrap();
        assert_eq!(requests.len(), 1);
        assert_eq!(requests[0].messages.len(), 3);
        assert_eq!(requests[0].messages[0].role, Role::System);
        assert_eq!(
            requests[0].messages[2].content,
            "What should I write about?"
        );
    }

    #[tokio::test]
    async fn test_chat_path_substitutes_fallback_on_empty_reply() {
        let chat = MockChat::scripted(vec![None]);
        let agent = agent(chat);

        let reply = agent.handle("hello?").await.unwrap();
        assert_eq!(reply, FALLBACK_REPLY);

        // The fallback still becomes an assistant turn.
        let memory = agent.memory.read().await;
        assert_eq!(memory.conversation_history[1].content, FALLBACK_REPLY);
    }

    #[tokio::test]
    async fn test_set_topic_mutates_preferences_without_history() {
        let agent = agent(MockChat::default());

        let reply = agent.handle("Set Topic urban beekeeping").await.unwrap();
        assert_eq!(reply, "Topic updated to: urban beekeeping");

        let memory = agent.memory.read().await;
        assert_eq!(
            memory.content_preferences.topics,
            vec!["urban beekeeping".to_string()]
        );
        assert!(memory.conversation_history.is_empty());
    }

    #[tokio::test]
    async fn test_generate_command_bypasses_history() {
        // Research reply, then a draft too short to validate: generation
        // fails, but the command still returns an acknowledgment.
        let chat = MockChat::scripted(vec![
            Some("not json".to_string()),
            Some("short draft".to_string()),
        ]);
        let agent = agent(chat);

        let reply = agent.handle("generate blog post rust tips").await.unwrap();
        assert_eq!(reply, "Sorry, there was an error generating the blog post.");

        let memory = agent.memory.read().await;
        assert!(memory.conversation_history.is_empty());
    }

    #[tokio::test]
    async fn test_generate_command_reports_success() {
        let filler = vec!["word"; 898].join(" ");
        let draft = format!("Introduction {} conclusion", filler);
        let chat = MockChat::scripted(vec![Some("not json".to_string()), Some(draft)]);
        let agent = agent(chat);

        let reply = agent.handle("GENERATE BLOG POST seo basics").await.unwrap();
        assert_eq!(reply, "Blog post has been generated and published to Webflow!");

        let memory = agent.memory.read().await;
        let last = memory.last_generated_content.as_ref().unwrap();
        assert_eq!(last.title, "Seo Basics");
    }
}
