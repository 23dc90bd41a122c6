use std::collections::HashMap;
use std::path::Path;

use config::{Config as ConfigLoader, ConfigError, Environment, File, Value};
use serde::Deserialize;
use switchboard_persist::StorageBackend;

#[derive(Debug, Clone, Deserialize)]
pub struct Config {
    pub server: ServerConfig,
    pub cors: CorsConfig,
    pub storage: StorageConfig,
    pub llm: LlmConfig,
    pub logging: LoggingConfig,

    // Secrets (from ENV only)
    #[serde(default)]
    pub openai_api_key: String,
    #[serde(default)]
    pub mongodb_uri: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerConfig {
    pub host: String,
    pub port: u16,
    /// Upper bound for a whole HTTP request, completion included
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,
}

fn default_request_timeout() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize)]
pub struct CorsConfig {
    pub enabled: bool,
    #[serde(default)]
    pub origins: Vec<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct StorageConfig {
    /// `memory` or `mongodb`
    pub backend: String,
    pub database: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct LlmConfig {
    pub model: String,
    pub temperature: f32,
    #[serde(default)]
    pub max_tokens: Option<u32>,
    /// Deadline for one completion call
    #[serde(default)]
    pub request_timeout_secs: Option<u64>,
    /// OpenAI-compatible endpoint, e.g. a local gateway
    #[serde(default)]
    pub base_url: Option<String>,
}

impl From<&LlmConfig> for switchboard_types::LLMConfig {
    fn from(config: &LlmConfig) -> Self {
        Self {
            model: config.model.clone(),
            temperature: Some(config.temperature),
            max_tokens: config.max_tokens,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
    pub format: String,
}

/// Env prefix → config section it overrides
const ENV_SECTIONS: [(&str, &str); 5] = [
    ("SERVER", "server"),
    ("STORAGE", "storage"),
    ("LLM", "llm"),
    ("LOG", "logging"),
    ("CORS", "cors"),
];

impl Config {
    /// Load configuration from TOML files and environment variables
    ///
    /// Hierarchy (weakest to strongest):
    /// 1. config/default.toml
    /// 2. config/{ENV}.toml (if ENV is set, `dev` otherwise)
    /// 3. Environment variables: `SERVER_PORT` → `server.port`,
    ///    `LOG_LEVEL` → `logging.level`, `CORS_ORIGINS=a,b` → `cors.origins`
    ///
    /// `OPENAI_API_KEY` is mandatory; without it the server must not start.
    pub fn load() -> Result<Self, ConfigError> {
        let env = std::env::var("ENV").unwrap_or_else(|_| "dev".to_string());

        let mut builder = ConfigLoader::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name(&format!("config/{}", env)).required(false));

        for (prefix, section) in ENV_SECTIONS {
            for (key, value) in env_overrides(prefix)? {
                builder = builder.set_override(format!("{}.{}", section, key), value)?;
            }
        }

        let mut cfg: Config = builder.build()?.try_deserialize()?;
        cfg.apply_secrets(|name| std::env::var(name).ok())?;

        Ok(cfg)
    }

    /// Load config from a specific path (useful for testing)
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let builder = ConfigLoader::builder().add_source(File::from(path.as_ref()));

        let config = builder.build()?;
        config.try_deserialize()
    }

    /// Fill secrets and check the ones the selected backends need
    pub fn apply_secrets<F>(&mut self, lookup: F) -> Result<(), ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let present = |name: &str| lookup(name).filter(|v| !v.trim().is_empty());

        self.openai_api_key = present("OPENAI_API_KEY").ok_or_else(|| {
            ConfigError::Message("OPENAI_API_KEY environment variable is required".to_string())
        })?;

        self.mongodb_uri = present("MONGODB_URI").unwrap_or_default();
        if self.storage_backend()? == StorageBackend::MongoDb && self.mongodb_uri.is_empty() {
            return Err(ConfigError::Message(
                "MONGODB_URI environment variable is required for the mongodb backend".to_string(),
            ));
        }

        Ok(())
    }

    pub fn storage_backend(&self) -> Result<StorageBackend, ConfigError> {
        self.storage
            .backend
            .parse()
            .map_err(|e| ConfigError::Message(format!("storage.backend: {}", e)))
    }
}

/// Variables under one prefix, keys lowercased with the prefix stripped
fn env_overrides(prefix: &str) -> Result<HashMap<String, Value>, ConfigError> {
    ConfigLoader::builder()
        .add_source(
            Environment::with_prefix(prefix)
                .try_parsing(true)
                .list_separator(",")
                .with_list_parse_key("origins"),
        )
        .build()?
        .try_deserialize()
}
