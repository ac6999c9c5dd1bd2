pub mod decision;

pub use decision::{parse_decision, PostingDecision};

use chrono::{DateTime, Utc};
use content_engine::GenerationPipeline;
use llm_interface::{ChatCompletion, ChatMessage, ChatRequest};
use scribebot_core::{
    AutonomyConfig, BotMemory, CoreError, ErrorExt, TopicPerformance, TopicRecord,
};
use std::sync::Arc;
use std::time::Duration;
use tokio::sync::RwLock;
use tokio::time::interval;
use tracing::{debug, info, warn};
use webflow_client::ContentPublisher;

const DECISION_SYSTEM_PROMPT: &str =
    "You are a strategic content planning AI. Make data-driven decisions.";
const DECISION_TEMPERATURE: f64 = 0.7;

/// Timer-driven autonomy loop. Wraps a shared generation pipeline rather
/// than extending the conversation agent, so scheduling state stays apart
/// from conversational state.
pub struct AutonomousScheduler<C, P> {
    chat: C,
    pipeline: Arc<GenerationPipeline<C, P>>,
    memory: Arc<RwLock<BotMemory>>,
    config: AutonomyConfig,
    decision_model: String,
}

impl<C, P> AutonomousScheduler<C, P>
where
    C: ChatCompletion,
    P: ContentPublisher,
{
    pub fn new(
        chat: C,
        pipeline: Arc<GenerationPipeline<C, P>>,
        memory: Arc<RwLock<BotMemory>>,
        config: AutonomyConfig,
        decision_model: String,
    ) -> Self {
        Self {
            chat,
            pipeline,
            memory,
            config,
            decision_model,
        }
    }

    /// Timer loop. Tick failures are logged and never escape; the process
    /// keeps running.
    pub async fn run(self) {
        let period = Duration::from_secs(self.config.check_interval_minutes * 60);
        let mut ticker = interval(period);
        // The interval yields immediately once; consume that so the first
        // real check happens one full period after startup.
        ticker.tick().await;

        info!(
            "Autonomous mode active, checking every {} minutes",
            self.config.check_interval_minutes
        );

        loop {
            ticker.tick().await;
            if let Err(e) = self.tick().await {
                e.log_error();
            }
        }
    }

    /// One autonomous check: cool-down gate, decision call, generation.
    pub async fn tick(&self) -> Result<(), CoreError> {
        let now = Utc::now();

        let (last_post_time, topic_names, first_preference) = {
            let memory = self.memory.read().await;
            (
                memory.autonomy.last_post_time,
                memory
                    .autonomy
                    .topic_history
                    .iter()
                    .map(|t| t.name.clone())
                    .collect::<Vec<_>>(),
                memory.content_preferences.topics.first().cloned(),
            )
        };

        let hours_since_last_post = (now - last_post_time).num_minutes() as f64 / 60.0;
        info!(
            "Checking if a post is due; hours since last post: {:.1}",
            hours_since_last_post
        );

        if hours_since_last_post < self.config.cooldown_hours as f64 {
            debug!("Too soon to post again, waiting");
            return Ok(());
        }

        let decision = self
            .evaluate_posting_decision(now, hours_since_last_post, &topic_names)
            .await?;

        let (should_post, topic) = match decision {
            PostingDecision::Evaluated {
                should_post,
                topic,
                reasoning,
            } => {
                if let Some(reasoning) = reasoning {
                    info!("Decision reasoning: {}", reasoning);
                }
                (should_post, topic)
            }
            PostingDecision::Malformed => (false, None),
        };

        info!(
            "Decision made: {}",
            if should_post { "will post" } else { "will wait" }
        );
        if !should_post {
            return Ok(());
        }

        let topic = topic
            .filter(|t| !t.trim().is_empty())
            .unwrap_or_else(|| synthesize_topic(topic_names.first().or(first_preference.as_ref())));

        info!("Generating autonomous post about: {}", topic);
        match self.pipeline.generate_and_publish(Some(&topic)).await {
            Ok(_) => {
                let mut memory = self.memory.write().await;
                memory.autonomy.last_post_time = now;
                memory.autonomy.topic_history.push(TopicRecord {
                    name: topic,
                    confidence: fastrand::f64(),
                    last_used: now,
                    performance: TopicPerformance {
                        views: fastrand::u64(0..1000),
                        engagement: fastrand::f64(),
                        simulated: true,
                    },
                });
                info!("Autonomous post published");
            }
            Err(e) => {
                // last_post_time stays untouched; the next attempt happens
                // when a later tick passes the cool-down gate again.
                warn!("Autonomous generation failed: {}", e);
            }
        }

        Ok(())
    }

    async fn evaluate_posting_decision(
        &self,
        now: DateTime<Utc>,
        hours_since_last_post: f64,
        topic_names: &[String],
    ) -> Result<PostingDecision, CoreError> {
        let prompt = format!(
            "As an AI content strategist, analyze the following:\n\
             - Last post was {:.1} hours ago\n\
             - Current time: {}\n\
             - Past successful topics: {}\n\
             - Current trends in content marketing\n\n\
             Should I create a new blog post now? If yes, suggest a topic.\n\
             Respond in JSON format: {{ \"shouldPost\": boolean, \"topic\": string, \"reasoning\": string }}",
            hours_since_last_post,
            now.format("%H:%M:%S"),
            topic_names.join(", ")
        );

        let request = ChatRequest::new(
            self.decision_model.clone(),
            vec![
                ChatMessage::system(DECISION_SYSTEM_PROMPT),
                ChatMessage::user(prompt),
            ],
            DECISION_TEMPERATURE,
        );

        Ok(match self.chat.complete(request).await? {
            Some(reply) => parse_decision(&reply),
            None => PostingDecision::Malformed,
        })
    }
}

/// Fallback topic when the collaborator approves posting without naming one.
fn synthesize_topic(seed: Option<&String>) -> String {
    match seed {
        Some(seed) => format!("Advanced {} Strategies", seed),
        None => "Content Strategy Trends".to_string(),
    }
}
