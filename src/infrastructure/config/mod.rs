use figment::providers::{Env, Format, Serialized, Toml};
use figment::Figment;
use serde::{Deserialize, Serialize};

use crate::domain::error::Result;
use crate::domain::llm_config::LLMConfig;

pub const CONFIG_PATH_ENV: &str = "QA_CANVAS_CONFIG";
pub const DEFAULT_CONFIG_FILE: &str = "qa-canvas.toml";
pub const ENV_PREFIX: &str = "QA_CANVAS_";

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 3001,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerationSettings {
    /// Serve a minimal document instead of an error when model output fails validation.
    pub fallback_to_minimal: bool,
    /// Most recent comments included in the prompt.
    pub max_comments: usize,
    /// Token budget for the ticket description inside the prompt.
    pub description_token_budget: usize,
}

impl Default for GenerationSettings {
    fn default() -> Self {
        Self {
            fallback_to_minimal: true,
            max_comments: 10,
            description_token_budget: 1500,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub llm: LLMConfig,
    pub generation: GenerationSettings,
    pub log_filter: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            server: ServerSettings::default(),
            llm: LLMConfig::default(),
            generation: GenerationSettings::default(),
            log_filter: "info".to_string(),
        }
    }
}

impl Settings {
    /// Defaults, then the TOML file, then `QA_CANVAS_*` environment variables.
    pub fn figment() -> Figment {
        let path = std::env::var(CONFIG_PATH_ENV).unwrap_or_else(|_| DEFAULT_CONFIG_FILE.to_string());
        Figment::from(Serialized::defaults(Settings::default()))
            .merge(Toml::file(path))
            .merge(Env::prefixed(ENV_PREFIX).split("__"))
    }

    pub fn load() -> Result<Self> {
        Ok(Self::figment().extract()?)
    }
}
