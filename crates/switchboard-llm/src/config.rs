// Configuration layer for creating the completion client from settings

use anyhow::Result;
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use std::time::Duration;

use crate::openai::OpenAIClient;
use crate::traits::ChatClient;

/// Configuration for an OpenAI-compatible provider
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OpenAIConfig {
    pub api_key: String,
    /// Base URL for the API (defaults to https://api.openai.com/v1)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    /// Deadline applied to every completion request
    #[serde(skip_serializing_if = "Option::is_none")]
    pub timeout_secs: Option<u64>,
}

impl OpenAIConfig {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            base_url: None,
            timeout_secs: None,
        }
    }

    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    pub fn with_timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = Some(secs);
        self
    }
}

/// Factory for creating chat clients from configuration
pub struct ClientFactory;

impl ClientFactory {
    /// Create a chat client; fails when the credentials are unusable
    pub fn create_chat_client(config: OpenAIConfig) -> Result<Arc<dyn ChatClient>> {
        let base_url = config
            .base_url
            .unwrap_or_else(|| "https://api.openai.com/v1".to_string());
        let timeout = config.timeout_secs.map(Duration::from_secs);

        let client = OpenAIClient::with_settings(config.api_key, base_url, timeout)?;
        Ok(Arc::new(client))
    }
}
