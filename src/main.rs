use background_service::AutonomousScheduler;
use content_engine::{ConversationAgent, GenerationPipeline};
use llm_interface::{OpenAiClient, RetryConfig, RetryExecutor};
use scribebot_core::{
    require_env, BotConfig, BotMemory, CoreError, ErrorExt, DEFAULT_CONFIG_PATH,
};
use std::sync::Arc;
use tokio::io::AsyncBufReadExt;
use tokio::sync::RwLock;
use webflow_client::WebflowClient;

type Agent = Arc<ConversationAgent<OpenAiClient, WebflowClient>>;

#[tokio::main]
async fn main() -> Result<(), CoreError> {
    tracing_subscriber::fmt()
        .with_env_filter(
            "scribebot=debug,content_engine=debug,background_service=debug,http_api=debug",
        )
        .init();

    tracing::info!("Starting Scribebot - Autonomous Content Publisher");

    // Missing credentials are fatal: there is nothing useful to do without
    // both collaborators.
    let openai_api_key = match require_env("OPENAI_API_KEY") {
        Ok(key) => key,
        Err(e) => {
            eprintln!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    };
    let webflow_api_token = match require_env("WEBFLOW_API_TOKEN") {
        Ok(token) => token,
        Err(e) => {
            eprintln!("{}", e.user_friendly_message());
            std::process::exit(1);
        }
    };

    let config_path =
        std::env::var("SCRIBEBOT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
    let config = BotConfig::load(&config_path)?;
    let profile = config.active_profile().clone();

    let memory = Arc::new(RwLock::new(BotMemory::new(
        config.content_preferences.clone(),
    )));

    let chat = OpenAiClient::new(&openai_api_key);
    let publisher = WebflowClient::new(&webflow_api_token, config.publishing.collection_id.clone());

    let pipeline = Arc::new(GenerationPipeline::new(
        chat.clone(),
        publisher,
        RetryExecutor::new(RetryConfig::default()),
        memory.clone(),
        profile.clone(),
        config.models.clone(),
    ));

    let agent: Agent = Arc::new(ConversationAgent::new(
        chat.clone(),
        pipeline.clone(),
        memory.clone(),
        format!("You are {}, {}", profile.name, profile.domain),
        config.models.conversation.clone(),
    ));

    let scheduler = AutonomousScheduler::new(
        chat,
        pipeline,
        memory,
        config.autonomy.clone(),
        config.models.decision.clone(),
    );
    tokio::spawn(scheduler.run());

    if std::env::args().any(|arg| arg == "--serve") {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse().ok())
            .unwrap_or(3002);
        return http_api::serve(port, agent).await;
    }

    run_repl(agent, &profile.name).await
}

/// Interactive loop: recognized commands and free-form chat, until `exit`.
async fn run_repl(agent: Agent, bot_name: &str) -> Result<(), CoreError> {
    println!(
        "{}: I'm now running autonomously, but you can still chat with me!",
        bot_name
    );
    println!("Commands: 'generate blog post [title]' or 'set topic [topic]' ('exit' to quit)");

    let stdin = tokio::io::BufReader::new(tokio::io::stdin());
    let mut lines = stdin.lines();

    while let Some(line) = lines.next_line().await? {
        let input = line.trim();
        if input.is_empty() {
            continue;
        }
        if input.eq_ignore_ascii_case("exit") {
            println!("Goodbye!");
            break;
        }

        match agent.handle(input).await {
            Ok(reply) => println!("{}: {}", bot_name, reply),
            Err(e) => {
                e.log_error();
                println!("{}: {}", bot_name, e.user_friendly_message());
            }
        }
    }

    Ok(())
}
