use crate::error::{ConfigError, CoreError};
use crate::types::ContentPreferences;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;
use tracing::info;

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

/// Top-level configuration document, read once at startup.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotConfig {
    pub bot_identity: BotIdentity,
    pub content_preferences: ContentPreferences,
    pub publishing: PublishingConfig,
    #[serde(default)]
    pub autonomy: AutonomyConfig,
    #[serde(default)]
    pub models: ModelConfig,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotIdentity {
    pub current_profile: String,
    pub profiles: HashMap<String, BotProfile>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BotProfile {
    pub name: String,
    pub domain: String,
    pub writing_style: WritingStyle,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub call_to_action: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WritingStyle {
    pub tone: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublishingConfig {
    pub collection_id: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AutonomyConfig {
    /// How often the scheduler wakes up to consider posting.
    #[serde(default = "default_check_interval_minutes")]
    pub check_interval_minutes: u64,
    /// Minimum elapsed time between two autonomous publishes.
    #[serde(default = "default_cooldown_hours")]
    pub cooldown_hours: i64,
}

impl Default for AutonomyConfig {
    fn default() -> Self {
        Self {
            check_interval_minutes: default_check_interval_minutes(),
            cooldown_hours: default_cooldown_hours(),
        }
    }
}

fn default_check_interval_minutes() -> u64 {
    5
}

fn default_cooldown_hours() -> i64 {
    24
}

/// Model selection per call site.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    #[serde(default = "default_model")]
    pub conversation: String,
    #[serde(default = "default_model")]
    pub drafting: String,
    #[serde(default = "default_model")]
    pub research: String,
    #[serde(default = "default_model")]
    pub decision: String,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            conversation: default_model(),
            drafting: default_model(),
            research: default_model(),
            decision: default_model(),
        }
    }
}

fn default_model() -> String {
    "gpt-4-turbo-preview".to_string()
}

impl BotConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, CoreError> {
        let path = path.as_ref();
        let raw = std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
            path: path.display().to_string(),
        })?;
        let config: BotConfig =
            serde_json::from_str(&raw).map_err(|e| ConfigError::InvalidFormat {
                details: e.to_string(),
            })?;
        config.validate()?;

        info!(
            "Loaded configuration from {} (profile: {})",
            path.display(),
            config.bot_identity.current_profile
        );
        Ok(config)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        if !self
            .bot_identity
            .profiles
            .contains_key(&self.bot_identity.current_profile)
        {
            return Err(ConfigError::UnknownProfile {
                profile: self.bot_identity.current_profile.clone(),
            });
        }
        Ok(())
    }

    /// The profile selected by `currentProfile`. Checked during `load`.
    pub fn active_profile(&self) -> &BotProfile {
        &self.bot_identity.profiles[&self.bot_identity.current_profile]
    }
}

/// Read a required credential from the environment. Missing credentials are
/// fatal at startup, so callers surface this as a process exit.
pub fn require_env(var_name: &str) -> Result<String, CoreError> {
    std::env::var(var_name).map_err(|_| {
        ConfigError::MissingEnvironmentVariable {
            var_name: var_name.to_string(),
        }
        .into()
    })
}
