use std::sync::Arc;
use std::time::Duration;

use switchboard_llm::ChatClient;
use switchboard_persist::PersistenceClient;
use switchboard_types::LLMConfig;

use crate::agent::ChatAgent;
use crate::assembler::ConversationAssembler;
use crate::error::{ChatError, Result};
use crate::extractor::{PatternExtractor, PersonaExtractor};
use crate::persona::PersonaCatalog;
use crate::router::ThreadRouter;

/// Builder for [`ChatAgent`]
///
/// Store and chat client are required. Everything else has a default: the
/// regex extractor, the built-in persona catalog and [`LLMConfig::default`].
pub struct ChatAgentBuilder {
    store: Option<Arc<dyn PersistenceClient>>,
    chat_client: Option<Arc<dyn ChatClient>>,
    llm_config: LLMConfig,
    extractor: Option<Arc<dyn PersonaExtractor>>,
    catalog: PersonaCatalog,
    completion_timeout: Option<Duration>,
}

impl ChatAgentBuilder {
    pub fn new() -> Self {
        Self {
            store: None,
            chat_client: None,
            llm_config: LLMConfig::default(),
            extractor: None,
            catalog: PersonaCatalog::default(),
            completion_timeout: None,
        }
    }

    /// Set the thread/message store
    pub fn store(mut self, store: Arc<dyn PersistenceClient>) -> Self {
        self.store = Some(store);
        self
    }

    /// Set the completion backend
    pub fn chat_client(mut self, client: Arc<dyn ChatClient>) -> Self {
        self.chat_client = Some(client);
        self
    }

    pub fn llm_config(mut self, config: LLMConfig) -> Self {
        self.llm_config = config;
        self
    }

    /// Replace the regex extractor, e.g. with a classifier
    pub fn extractor(mut self, extractor: Arc<dyn PersonaExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    pub fn catalog(mut self, catalog: PersonaCatalog) -> Self {
        self.catalog = catalog;
        self
    }

    pub fn completion_timeout(mut self, timeout: Duration) -> Self {
        self.completion_timeout = Some(timeout);
        self
    }

    pub fn build(self) -> Result<ChatAgent> {
        let store = self
            .store
            .ok_or_else(|| ChatError::Configuration("Store is required".to_string()))?;
        let chat_client = self
            .chat_client
            .ok_or_else(|| ChatError::Configuration("Chat client is required".to_string()))?;
        let extractor = self
            .extractor
            .unwrap_or_else(|| Arc::new(PatternExtractor::new()) as Arc<dyn PersonaExtractor>);

        let router = ThreadRouter::new(Arc::clone(&store), extractor, self.catalog);

        let mut assembler = ConversationAssembler::new(Arc::clone(&store), chat_client, self.llm_config);
        if let Some(timeout) = self.completion_timeout {
            assembler = assembler.with_timeout(timeout);
        }

        Ok(ChatAgent::new(router, assembler, store))
    }
}

impl Default for ChatAgentBuilder {
    fn default() -> Self {
        Self::new()
    }
}
