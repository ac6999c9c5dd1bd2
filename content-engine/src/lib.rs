pub mod agent;
pub mod analyzer;
pub mod pipeline;
pub mod prompt;
pub mod validator;

pub use agent::ConversationAgent;
pub use analyzer::analyze;
pub use pipeline::{format_title, GenerationPipeline};
pub use prompt::build_prompt;
pub use validator::is_valid;
